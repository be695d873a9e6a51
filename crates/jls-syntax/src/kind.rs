//! The flat token/node kind alphabet for the Java CST.

#![allow(non_camel_case_types)]

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Trivia
    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // Literals
    INT_LIT,
    FLOAT_LIT,
    CHAR_LIT,
    STRING_LIT,
    TEXT_BLOCK,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    // Identifiers
    IDENT,

    // Keywords
    ABSTRACT_KW,
    ASSERT_KW,
    BOOLEAN_KW,
    BREAK_KW,
    BYTE_KW,
    CASE_KW,
    CATCH_KW,
    CHAR_KW,
    CLASS_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DO_KW,
    DOUBLE_KW,
    ELSE_KW,
    ENUM_KW,
    EXTENDS_KW,
    FINAL_KW,
    FINALLY_KW,
    FLOAT_KW,
    FOR_KW,
    GOTO_KW,
    IF_KW,
    IMPLEMENTS_KW,
    IMPORT_KW,
    INSTANCEOF_KW,
    INT_KW,
    INTERFACE_KW,
    LONG_KW,
    NATIVE_KW,
    NEW_KW,
    PACKAGE_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    RECORD_KW,
    RETURN_KW,
    SHORT_KW,
    STATIC_KW,
    STRICTFP_KW,
    SUPER_KW,
    SWITCH_KW,
    SYNCHRONIZED_KW,
    THIS_KW,
    THROW_KW,
    THROWS_KW,
    TRANSIENT_KW,
    TRY_KW,
    VAR_KW,
    VOID_KW,
    VOLATILE_KW,
    WHILE_KW,
    YIELD_KW,
    SEALED_KW,
    PERMITS_KW,
    NON_SEALED_KW,

    // Punctuation
    L_PAREN,
    R_PAREN,
    L_BRACE,
    R_BRACE,
    L_BRACK,
    R_BRACK,
    SEMICOLON,
    COMMA,
    DOT,
    ELLIPSIS,
    AT,
    COLON_COLON,
    COLON,
    EQ,
    LT,
    GT,
    BANG,
    TILDE,
    QUESTION,
    ARROW,
    EQEQ,
    LTEQ,
    GTEQ,
    BANGEQ,
    AMPAMP,
    PIPEPIPE,
    PLUSPLUS,
    MINUSMINUS,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    AMP,
    PIPE,
    CARET,
    PERCENT,
    LTLT,
    GTGT,
    GTGTGT,
    PLUSEQ,
    MINUSEQ,
    STAREQ,
    SLASHEQ,
    AMPEQ,
    PIPEEQ,
    CARETEQ,
    PERCENTEQ,
    LTLTEQ,
    GTGTEQ,
    GTGTGTEQ,

    ERROR_TOKEN,

    // Nodes
    COMPILATION_UNIT,
    PACKAGE_DECL,
    IMPORT_DECL,
    MODIFIER_LIST,
    ANNOTATION,
    ANNOTATION_ARG_LIST,
    TYPE_PARAM_LIST,
    TYPE_PARAM,
    CLASS_DECL,
    INTERFACE_DECL,
    ENUM_DECL,
    RECORD_DECL,
    ENUM_BODY,
    ENUM_CONSTANT,
    RECORD_HEADER,
    RECORD_COMPONENT,
    EXTENDS_CLAUSE,
    IMPLEMENTS_CLAUSE,
    PERMITS_CLAUSE,
    CLASS_BODY,
    FIELD_DECL,
    VARIABLE_DECLARATOR,
    METHOD_DECL,
    CONSTRUCTOR_DECL,
    PARAM_LIST,
    PARAM,
    THROWS_CLAUSE,
    BLOCK,
    TYPE_REF,
    TYPE_ARG_LIST,
    ARRAY_DIMS,
    NAME_REF,
    QUALIFIED_NAME,

    // Statements
    LOCAL_VAR_DECL,
    EXPR_STMT,
    IF_STMT,
    WHILE_STMT,
    DO_WHILE_STMT,
    FOR_STMT,
    FOR_EACH_STMT,
    RETURN_STMT,
    THROW_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    YIELD_STMT,
    ASSERT_STMT,
    TRY_STMT,
    CATCH_CLAUSE,
    FINALLY_CLAUSE,
    RESOURCE_LIST,
    SWITCH_STMT,
    SWITCH_ARM,
    SYNCHRONIZED_STMT,
    EMPTY_STMT,
    LABELED_STMT,

    // Expressions
    LITERAL_EXPR,
    NAME_EXPR,
    THIS_EXPR,
    SUPER_EXPR,
    PAREN_EXPR,
    BINARY_EXPR,
    UNARY_EXPR,
    POSTFIX_EXPR,
    ASSIGN_EXPR,
    CALL_EXPR,
    ARG_LIST,
    FIELD_ACCESS_EXPR,
    ARRAY_ACCESS_EXPR,
    NEW_EXPR,
    NEW_ARRAY_EXPR,
    ARRAY_INIT,
    CAST_EXPR,
    INSTANCEOF_EXPR,
    CONDITIONAL_EXPR,
    LAMBDA_EXPR,
    LAMBDA_PARAM_LIST,
    METHOD_REF_EXPR,
    CLASS_LITERAL_EXPR,

    ERROR_NODE,
    EOF,
}

use SyntaxKind::*;

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | LINE_COMMENT | BLOCK_COMMENT)
    }

    pub fn is_keyword(self) -> bool {
        (ABSTRACT_KW as u16..=NON_SEALED_KW as u16).contains(&(self as u16))
    }
}

pub fn keyword_from_str(s: &str) -> Option<SyntaxKind> {
    Some(match s {
        "abstract" => ABSTRACT_KW,
        "assert" => ASSERT_KW,
        "boolean" => BOOLEAN_KW,
        "break" => BREAK_KW,
        "byte" => BYTE_KW,
        "case" => CASE_KW,
        "catch" => CATCH_KW,
        "char" => CHAR_KW,
        "class" => CLASS_KW,
        "const" => CONST_KW,
        "continue" => CONTINUE_KW,
        "default" => DEFAULT_KW,
        "do" => DO_KW,
        "double" => DOUBLE_KW,
        "else" => ELSE_KW,
        "enum" => ENUM_KW,
        "extends" => EXTENDS_KW,
        "final" => FINAL_KW,
        "finally" => FINALLY_KW,
        "float" => FLOAT_KW,
        "for" => FOR_KW,
        "goto" => GOTO_KW,
        "if" => IF_KW,
        "implements" => IMPLEMENTS_KW,
        "import" => IMPORT_KW,
        "instanceof" => INSTANCEOF_KW,
        "int" => INT_KW,
        "interface" => INTERFACE_KW,
        "long" => LONG_KW,
        "native" => NATIVE_KW,
        "new" => NEW_KW,
        "package" => PACKAGE_KW,
        "private" => PRIVATE_KW,
        "protected" => PROTECTED_KW,
        "public" => PUBLIC_KW,
        "record" => RECORD_KW,
        "return" => RETURN_KW,
        "short" => SHORT_KW,
        "static" => STATIC_KW,
        "strictfp" => STRICTFP_KW,
        "super" => SUPER_KW,
        "switch" => SWITCH_KW,
        "synchronized" => SYNCHRONIZED_KW,
        "this" => THIS_KW,
        "throw" => THROW_KW,
        "throws" => THROWS_KW,
        "transient" => TRANSIENT_KW,
        "try" => TRY_KW,
        "var" => VAR_KW,
        "void" => VOID_KW,
        "volatile" => VOLATILE_KW,
        "while" => WHILE_KW,
        "yield" => YIELD_KW,
        "sealed" => SEALED_KW,
        "permits" => PERMITS_KW,
        "true" => TRUE_KW,
        "false" => FALSE_KW,
        "null" => NULL_KW,
        _ => return None,
    })
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaLang {}

impl rowan::Language for JavaLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::EOF as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}
