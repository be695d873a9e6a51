//! Hand-written Java lexer. Produces every byte of the input as a token
//! (including trivia) so the parser can build a fully lossless tree.

use crate::kind::{keyword_from_str, SyntaxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub len: u32,
}

pub fn lex(text: &str) -> Vec<Token> {
    let mut lexer = Lexer { bytes: text.as_bytes(), text, pos: 0, tokens: Vec::new() };
    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    bytes: &'a [u8],
    text: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            self.lex_one();
            debug_assert!(self.pos > start, "lexer made no progress");
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_char_at(&self, ahead: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(ahead)
    }

    fn bump_char(&mut self) -> char {
        let c = self.peek_char().expect("bump past eof");
        self.pos += c.len_utf8();
        c
    }

    fn push(&mut self, kind: SyntaxKind, start: usize) {
        self.tokens.push(Token { kind, len: (self.pos - start) as u32 });
    }

    fn starts_with(&self, s: &str) -> bool {
        self.text[self.pos..].starts_with(s)
    }

    fn lex_one(&mut self) {
        let start = self.pos;
        let c = self.peek_char().unwrap();

        if c.is_whitespace() {
            while self.peek_char().is_some_and(|c| c.is_whitespace()) {
                self.bump_char();
            }
            self.push(SyntaxKind::WHITESPACE, start);
            return;
        }

        if self.starts_with("//") {
            while self.peek_char().is_some_and(|c| c != '\n') {
                self.bump_char();
            }
            self.push(SyntaxKind::LINE_COMMENT, start);
            return;
        }

        if self.starts_with("/*") {
            self.pos += 2;
            while self.pos < self.bytes.len() && !self.starts_with("*/") {
                self.bump_char();
            }
            if self.starts_with("*/") {
                self.pos += 2;
            }
            self.push(SyntaxKind::BLOCK_COMMENT, start);
            return;
        }

        if self.starts_with(r#"""""#) {
            self.lex_text_block(start);
            return;
        }

        if c == '"' {
            self.lex_string(start);
            return;
        }

        if c == '\'' {
            self.lex_char(start);
            return;
        }

        if c.is_ascii_digit() || (c == '.' && self.peek_char_at(1).is_some_and(|n| n.is_ascii_digit())) {
            self.lex_number(start);
            return;
        }

        if unicode_ident::is_xid_start(c) || c == '_' || c == '$' {
            self.lex_ident_or_keyword(start);
            return;
        }

        self.lex_punct(start);
    }

    fn lex_text_block(&mut self, start: usize) {
        self.pos += 3;
        while self.pos < self.bytes.len() && !self.starts_with(r#"""""#) {
            self.bump_char();
        }
        if self.starts_with(r#"""""#) {
            self.pos += 3;
        }
        self.push(SyntaxKind::TEXT_BLOCK, start);
    }

    fn lex_string(&mut self, start: usize) {
        self.bump_char();
        while let Some(c) = self.peek_char() {
            if c == '\\' {
                self.bump_char();
                if self.peek_char().is_some() {
                    self.bump_char();
                }
                continue;
            }
            if c == '"' || c == '\n' {
                break;
            }
            self.bump_char();
        }
        if self.peek_char() == Some('"') {
            self.bump_char();
        }
        self.push(SyntaxKind::STRING_LIT, start);
    }

    fn lex_char(&mut self, start: usize) {
        self.bump_char();
        while let Some(c) = self.peek_char() {
            if c == '\\' {
                self.bump_char();
                if self.peek_char().is_some() {
                    self.bump_char();
                }
                continue;
            }
            if c == '\'' || c == '\n' {
                break;
            }
            self.bump_char();
        }
        if self.peek_char() == Some('\'') {
            self.bump_char();
        }
        self.push(SyntaxKind::CHAR_LIT, start);
    }

    fn lex_number(&mut self, start: usize) {
        let mut is_float = false;
        if self.starts_with("0x") || self.starts_with("0X") {
            self.pos += 2;
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit() || c == '_') {
                self.bump_char();
            }
        } else if self.starts_with("0b") || self.starts_with("0B") {
            self.pos += 2;
            while self.peek_char().is_some_and(|c| c == '0' || c == '1' || c == '_') {
                self.bump_char();
            }
        } else {
            while self.peek_char().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                self.bump_char();
            }
            if self.peek_char() == Some('.') {
                is_float = true;
                self.bump_char();
                while self.peek_char().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                    self.bump_char();
                }
            }
            if matches!(self.peek_char(), Some('e') | Some('E')) {
                is_float = true;
                self.bump_char();
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.bump_char();
                }
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump_char();
                }
            }
        }
        if matches!(self.peek_char(), Some('f') | Some('F') | Some('d') | Some('D')) {
            is_float = true;
            self.bump_char();
        } else if matches!(self.peek_char(), Some('l') | Some('L')) {
            self.bump_char();
        }
        self.push(if is_float { SyntaxKind::FLOAT_LIT } else { SyntaxKind::INT_LIT }, start);
    }

    fn lex_ident_or_keyword(&mut self, start: usize) {
        self.bump_char();
        while self.peek_char().is_some_and(|c| unicode_ident::is_xid_continue(c) || c == '_' || c == '$') {
            self.bump_char();
        }
        let text = &self.text[start..self.pos];
        let kind = keyword_from_str(text).unwrap_or(SyntaxKind::IDENT);
        self.push(kind, start);
    }

    fn lex_punct(&mut self, start: usize) {
        use SyntaxKind::*;
        const THREE: &[(&str, SyntaxKind)] = &[
            (">>>=", GTGTGTEQ),
            ("...", ELLIPSIS),
            ("<<=", LTLTEQ),
            (">>=", GTGTEQ),
            (">>>", GTGTGT),
        ];
        const TWO: &[(&str, SyntaxKind)] = &[
            ("::", COLON_COLON),
            ("->", ARROW),
            ("==", EQEQ),
            ("<=", LTEQ),
            (">=", GTEQ),
            ("!=", BANGEQ),
            ("&&", AMPAMP),
            ("||", PIPEPIPE),
            ("++", PLUSPLUS),
            ("--", MINUSMINUS),
            ("+=", PLUSEQ),
            ("-=", MINUSEQ),
            ("*=", STAREQ),
            ("/=", SLASHEQ),
            ("&=", AMPEQ),
            ("|=", PIPEEQ),
            ("^=", CARETEQ),
            ("%=", PERCENTEQ),
            ("<<", LTLT),
            (">>", GTGT),
        ];

        for (s, kind) in THREE {
            if self.starts_with(s) {
                self.pos += s.len();
                self.push(*kind, start);
                return;
            }
        }
        for (s, kind) in TWO {
            if self.starts_with(s) {
                self.pos += s.len();
                self.push(*kind, start);
                return;
            }
        }

        let c = self.bump_char();
        let kind = match c {
            '(' => L_PAREN,
            ')' => R_PAREN,
            '{' => L_BRACE,
            '}' => R_BRACE,
            '[' => L_BRACK,
            ']' => R_BRACK,
            ';' => SEMICOLON,
            ',' => COMMA,
            '.' => DOT,
            '@' => AT,
            ':' => COLON,
            '=' => EQ,
            '<' => LT,
            '>' => GT,
            '!' => BANG,
            '~' => TILDE,
            '?' => QUESTION,
            '+' => PLUS,
            '-' => MINUS,
            '*' => STAR,
            '/' => SLASH,
            '&' => AMP,
            '|' => PIPE,
            '^' => CARET,
            '%' => PERCENT,
            _ => ERROR_TOKEN,
        };
        self.push(kind, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        lex(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_package_decl() {
        assert_eq!(
            kinds("package a.b;"),
            vec![
                SyntaxKind::PACKAGE_KW,
                SyntaxKind::WHITESPACE,
                SyntaxKind::IDENT,
                SyntaxKind::DOT,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON,
            ]
        );
    }

    #[test]
    fn lexes_three_char_operators_before_two_char_prefixes() {
        assert_eq!(kinds(">>>="), vec![SyntaxKind::GTGTGTEQ]);
        assert_eq!(kinds(">>>"), vec![SyntaxKind::GTGTGT]);
        assert_eq!(kinds(">>"), vec![SyntaxKind::GTGT]);
    }

    #[test]
    fn token_lengths_cover_the_whole_input() {
        let text = "class Foo { int x = 1 + 2; }";
        let total: u32 = lex(text).iter().map(|t| t.len).sum();
        assert_eq!(total as usize, text.len());
    }

    #[test]
    fn lexes_text_block() {
        assert_eq!(kinds("\"\"\"\nhi\n\"\"\""), vec![SyntaxKind::TEXT_BLOCK]);
    }
}
