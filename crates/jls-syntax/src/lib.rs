//! A lossless Java CST (spec.md §4.3a): a hand-written lexer/parser building
//! a `rowan` green tree. There is no real `javac` binding available to wrap,
//! so this crate is the from-scratch front end `jls-hir` lowers from and
//! providers in `jls-ide` walk directly for syntax-only queries (folding,
//! simple completion prefixes).
//!
//! Tokenization is intentionally forgiving: malformed input becomes an
//! `ERROR_NODE` rather than aborting the parse, since one broken method
//! anywhere in a file must never block diagnostics for the rest of it.

mod kind;
mod lexer;
mod parser;

pub use kind::{JavaLang, SyntaxKind};
pub use parser::{parse_java, Parse, ParseError, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::NodeOrToken;

    fn dump(node: &SyntaxNode) -> String {
        fn go(node: &SyntaxNode, indent: usize, out: &mut String) {
            use std::fmt::Write;
            let _ = writeln!(out, "{:indent$}{:?}", "", node.kind(), indent = indent);
            for child in node.children_with_tokens() {
                match child {
                    NodeOrToken::Node(n) => go(&n, indent + 2, out),
                    NodeOrToken::Token(t) if t.kind().is_trivia() => {}
                    NodeOrToken::Token(t) => {
                        let _ = writeln!(out, "{:indent$}{:?} {:?}", "", t.kind(), t.text(), indent = indent + 2);
                    }
                }
            }
        }
        let mut out = String::new();
        go(node, 0, &mut out);
        out
    }

    #[test]
    fn parses_minimal_class_with_no_errors() {
        let parsed = parse_java("package p;\n\nclass Foo {\n    int x;\n}\n");
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let text = dump(&parsed.syntax());
        assert!(text.contains("PACKAGE_DECL"));
        assert!(text.contains("CLASS_DECL"));
        assert!(text.contains("FIELD_DECL"));
    }

    #[test]
    fn tree_is_lossless() {
        let source = "package p; // trailing\nclass Foo { /* c */ int x = 1; }\n";
        let parsed = parse_java(source);
        assert_eq!(parsed.syntax().text().to_string(), source);
    }

    #[test]
    fn recovers_from_a_broken_member_and_keeps_parsing_the_rest() {
        let source = "class Foo {\n    @$$$ broken;\n    int ok;\n}\n";
        let parsed = parse_java(source);
        assert!(!parsed.errors.is_empty());
        let text = dump(&parsed.syntax());
        assert!(text.contains("FIELD_DECL"));
    }

    #[test]
    fn parses_a_method_with_a_body() {
        let source = "class Foo {\n    int bar(int a, String b) {\n        if (a > 0) {\n            return a + 1;\n        }\n        return 0;\n    }\n}\n";
        let parsed = parse_java(source);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let text = dump(&parsed.syntax());
        assert!(text.contains("METHOD_DECL"));
        assert!(text.contains("IF_STMT"));
        assert!(text.contains("RETURN_STMT"));
    }

    #[test]
    fn parses_generics_lambdas_and_try_with_resources() {
        let source = r#"
class Foo<T extends Comparable<T>> {
    void bar() {
        List<String> xs = new ArrayList<>();
        Runnable r = () -> System.out.println("hi");
        try (AutoCloseable c = open()) {
            xs.forEach(x -> x.length());
        } catch (Exception e) {
            throw e;
        } finally {
            cleanup();
        }
    }
}
"#;
        let parsed = parse_java(source);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let text = dump(&parsed.syntax());
        assert!(text.contains("LAMBDA_EXPR"));
        assert!(text.contains("TRY_STMT"));
        assert!(text.contains("TYPE_PARAM_LIST"));
    }

    #[test]
    fn parses_enum_and_record() {
        let source = "enum Color { RED, GREEN, BLUE }\nrecord Point(int x, int y) {}\n";
        let parsed = parse_java(source);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let text = dump(&parsed.syntax());
        assert!(text.contains("ENUM_DECL"));
        assert!(text.contains("RECORD_DECL"));
    }

    #[test]
    fn parses_switch_expression_arrow_arms() {
        let source = "class Foo {\n    int bar(int x) {\n        return switch (x) {\n            case 1 -> 1;\n            default -> 0;\n        };\n    }\n}\n";
        let parsed = parse_java(source);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert!(dump(&parsed.syntax()).contains("SWITCH_STMT"));
    }
}
