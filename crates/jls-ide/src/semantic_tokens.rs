//! `textDocument/semanticTokens/full` (spec.md §4.5a): a token stream
//! classified straight off [`SyntaxKind`], delta-encoded the way the LSP
//! wire format wants it. Kept LSP-agnostic — the dispatcher maps
//! [`TokenType`] onto `lsp_types`' token legend.

use jls_core::LineIndex;
use jls_syntax::{parse_java, SyntaxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Keyword,
    Identifier,
    Comment,
    String,
    Number,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticToken {
    pub delta_line: u32,
    pub delta_start: u32,
    pub length: u32,
    pub token_type: TokenType,
    pub token_modifiers: u32,
}

pub fn semantic_tokens(text: &str) -> Vec<SemanticToken> {
    let root = parse_java(text).syntax();
    let line_index = LineIndex::new(text);

    let mut out = Vec::new();
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for token in root.descendants_with_tokens().filter_map(|e| e.into_token()) {
        let Some(token_type) = classify(token.kind()) else { continue };
        let pos = line_index.position(text, token.text_range().start());

        let delta_line = pos.line - prev_line;
        let delta_start = if delta_line == 0 { pos.character - prev_start } else { pos.character };

        out.push(SemanticToken {
            delta_line,
            delta_start,
            length: u32::from(token.text_range().len()),
            token_type,
            token_modifiers: 0,
        });
        prev_line = pos.line;
        prev_start = pos.character;
    }
    out
}

fn classify(kind: SyntaxKind) -> Option<TokenType> {
    use SyntaxKind::*;
    if kind.is_keyword() || matches!(kind, TRUE_KW | FALSE_KW | NULL_KW) {
        return Some(TokenType::Keyword);
    }
    match kind {
        LINE_COMMENT | BLOCK_COMMENT => Some(TokenType::Comment),
        STRING_LIT | TEXT_BLOCK | CHAR_LIT => Some(TokenType::String),
        INT_LIT | FLOAT_LIT => Some(TokenType::Number),
        IDENT => Some(TokenType::Identifier),
        PLUS | MINUS | STAR | SLASH | PERCENT | AMP | PIPE | CARET | EQ | EQEQ | BANGEQ | LT | GT | LTEQ | GTEQ
        | AMPAMP | PIPEPIPE | BANG | TILDE | QUESTION | COLON | ARROW | PLUSPLUS | MINUSMINUS | PLUSEQ | MINUSEQ
        | STAREQ | SLASHEQ | AMPEQ | PIPEEQ | CARETEQ | PERCENTEQ | LTLT | GTGT | GTGTGT | LTLTEQ | GTGTEQ | GTGTGTEQ => {
            Some(TokenType::Operator)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_keywords_identifiers_and_comments() {
        let text = "// greeting\nclass A {}\n";
        let tokens = semantic_tokens(text);
        assert_eq!(tokens[0].token_type, TokenType::Comment);
        assert!(tokens.iter().any(|t| t.token_type == TokenType::Keyword));
        assert!(tokens.iter().any(|t| t.token_type == TokenType::Identifier));
    }

    #[test]
    fn delta_encodes_positions_relative_to_the_previous_token() {
        let text = "int a;\nint b;\n";
        let tokens = semantic_tokens(text);
        let second_line_token = tokens.iter().find(|t| t.delta_line == 1).unwrap();
        assert_eq!(second_line_token.delta_start, 0);
    }
}
