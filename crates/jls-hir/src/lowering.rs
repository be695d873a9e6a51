//! Lowers a `BLOCK` (or single top-level statement) syntax node into a
//! [`Body`]. Anything the lowering doesn't recognize becomes
//! [`Expr::Error`]/[`Stmt::Error`] rather than panicking — a malformed
//! method body must still let sibling members lower cleanly.

use crate::hir::{Body, CatchClause, Expr, ExprId, LambdaBody, LiteralKind, Stmt, StmtId};
use jls_syntax::{SyntaxKind::*, SyntaxNode, SyntaxToken};
use rowan::NodeOrToken;

struct Lower {
    body: Body,
}

pub fn lower_body(block: &SyntaxNode) -> Body {
    let mut lower = Lower { body: Body { exprs: Default::default(), stmts: Default::default(), root: placeholder_stmt_id() } };
    let root = lower.lower_stmt(block);
    lower.body.root = root;
    lower.body
}

/// A placeholder `StmtId` used only until the real root is allocated one
/// line later; never observed by a caller.
fn placeholder_stmt_id() -> StmtId {
    let mut arena = crate::arena::Arena::<Stmt>::new();
    arena.alloc(Stmt::Missing)
}

fn children(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    node.children()
}

fn child_of_kind(node: &SyntaxNode, kind: jls_syntax::SyntaxKind) -> Option<SyntaxNode> {
    children(node).find(|n| n.kind() == kind)
}

fn children_of_kind(node: &SyntaxNode, kind: jls_syntax::SyntaxKind) -> impl Iterator<Item = SyntaxNode> {
    children(node).filter(move |n| n.kind() == kind)
}

fn direct_token_of_kind(node: &SyntaxNode, kind: jls_syntax::SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens().find_map(|c| match c {
        NodeOrToken::Token(t) if t.kind() == kind => Some(t),
        _ => None,
    })
}

/// Text of the first direct operator-ish token among `kinds`, used to
/// recover which binary/unary/assignment operator a node represents without
/// a dedicated per-operator node kind.
fn operator_text(node: &SyntaxNode, kinds: &[jls_syntax::SyntaxKind]) -> String {
    node.children_with_tokens()
        .find_map(|c| match c {
            NodeOrToken::Token(t) if kinds.contains(&t.kind()) => Some(t.text().to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

const BINARY_OPS: &[jls_syntax::SyntaxKind] = &[
    PIPEPIPE, AMPAMP, PIPE, CARET, AMP, EQEQ, BANGEQ, LT, GT, LTEQ, GTEQ, LTLT, GTGT, GTGTGT, PLUS, MINUS, STAR, SLASH,
    PERCENT,
];
const ASSIGN_OPS: &[jls_syntax::SyntaxKind] =
    &[EQ, PLUSEQ, MINUSEQ, STAREQ, SLASHEQ, AMPEQ, PIPEEQ, CARETEQ, PERCENTEQ, LTLTEQ, GTGTEQ, GTGTGTEQ];
const UNARY_OPS: &[jls_syntax::SyntaxKind] = &[PLUS, MINUS, BANG, TILDE, PLUSPLUS, MINUSMINUS];

/// Reconstructs a dotted type/qualified name from a `TYPE_REF`/
/// `QUALIFIED_NAME` node by concatenating its identifier tokens.
fn type_name_of(node: &SyntaxNode) -> String {
    let mut out = String::new();
    for tok in node.descendants_with_tokens().filter_map(|e| e.into_token()) {
        if tok.kind() == IDENT || tok.kind() == DOT {
            out.push_str(tok.text());
        }
    }
    out
}

impl Lower {
    fn lower_stmt(&mut self, node: &SyntaxNode) -> StmtId {
        let range = node.text_range();
        let stmt = match node.kind() {
            BLOCK => {
                let statements = children(node).filter(|n| Self::is_stmt_kind(n.kind())).map(|n| self.lower_stmt(&n)).collect();
                Stmt::Block { statements, range }
            }
            EXPR_STMT => {
                let expr = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Stmt::Expr { expr, range }
            }
            LOCAL_VAR_DECL => {
                let type_name = child_of_kind(node, TYPE_REF).map(|n| type_name_of(&n)).unwrap_or_default();
                let declarators = children_of_kind(node, VARIABLE_DECLARATOR)
                    .map(|decl| {
                        let name = direct_token_of_kind(&decl, IDENT).map(|t| t.text().to_string()).unwrap_or_default();
                        let init = children(&decl).find(|n| !matches!(n.kind(), ARRAY_DIMS)).map(|n| self.lower_expr(&n));
                        (name, init)
                    })
                    .collect();
                Stmt::LocalVarDecl { type_name, declarators, range }
            }
            IF_STMT => {
                let mut conds_and_branches = children(node);
                let cond = conds_and_branches.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let branches: Vec<SyntaxNode> = children(node).filter(|n| Self::is_stmt_kind(n.kind())).collect();
                let then_branch = branches.first().map(|n| self.lower_stmt(n)).unwrap_or_else(|| self.missing_stmt());
                let else_branch = branches.get(1).map(|n| self.lower_stmt(n));
                Stmt::If { cond, then_branch, else_branch, range }
            }
            WHILE_STMT => {
                let cond = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let body = children(node).find(|n| Self::is_stmt_kind(n.kind())).map(|n| self.lower_stmt(&n)).unwrap_or_else(|| self.missing_stmt());
                Stmt::While { cond, body, range }
            }
            DO_WHILE_STMT => {
                let body = children(node).find(|n| Self::is_stmt_kind(n.kind())).map(|n| self.lower_stmt(&n)).unwrap_or_else(|| self.missing_stmt());
                let cond = children(node).find(|n| Self::is_expr_kind(n.kind())).map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Stmt::DoWhile { body, cond, range }
            }
            // Expression-list `for` inits (`for (i = 0; ...)` as opposed to
            // `for (int i = 0; ...)`) are approximated: their first
            // expression is treated as the condition. Providers only need
            // names in scope, not a precise AST here.
            FOR_STMT => {
                let init: Vec<StmtId> = child_of_kind(node, LOCAL_VAR_DECL).map(|n| vec![self.lower_stmt(&n)]).unwrap_or_default();
                let mut expr_children = children(node).filter(|n| Self::is_expr_kind(n.kind()));
                let cond = if init.is_empty() { expr_children.next() } else { None }.map(|n| self.lower_expr(&n));
                let update: Vec<ExprId> = expr_children.map(|n| self.lower_expr(&n)).collect();
                let body = children(node).last().filter(|n| Self::is_stmt_kind(n.kind())).map(|n| self.lower_stmt(&n)).unwrap_or_else(|| self.missing_stmt());
                Stmt::For { init, cond, update, body, range }
            }
            FOR_EACH_STMT => {
                let var_name = direct_token_of_kind(node, IDENT).map(|t| t.text().to_string()).unwrap_or_default();
                let iterable = children(node).find(|n| Self::is_expr_kind(n.kind())).map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let body = children(node).last().filter(|n| Self::is_stmt_kind(n.kind())).map(|n| self.lower_stmt(&n)).unwrap_or_else(|| self.missing_stmt());
                Stmt::ForEach { var_name, iterable, body, range }
            }
            RETURN_STMT => {
                let value = children(node).next().map(|n| self.lower_expr(&n));
                Stmt::Return { value, range }
            }
            THROW_STMT => {
                let value = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Stmt::Throw { value, range }
            }
            BREAK_STMT => Stmt::Break { label: direct_token_of_kind(node, IDENT).map(|t| t.text().to_string()), range },
            CONTINUE_STMT => Stmt::Continue { label: direct_token_of_kind(node, IDENT).map(|t| t.text().to_string()), range },
            YIELD_STMT => {
                let value = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Stmt::Yield { value, range }
            }
            ASSERT_STMT => {
                let mut exprs = children(node).filter(|n| Self::is_expr_kind(n.kind()));
                let cond = exprs.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let message = exprs.next().map(|n| self.lower_expr(&n));
                Stmt::Assert { cond, message, range }
            }
            TRY_STMT => {
                let resources = child_of_kind(node, RESOURCE_LIST)
                    .map(|list| children(&list).map(|n| self.lower_resource(&n)).collect())
                    .unwrap_or_default();
                let body = child_of_kind(node, BLOCK).map(|n| self.lower_stmt(&n)).unwrap_or_else(|| self.missing_stmt());
                let catches = children_of_kind(node, CATCH_CLAUSE).map(|n| self.lower_catch(&n)).collect();
                let finally = child_of_kind(node, FINALLY_CLAUSE).and_then(|n| child_of_kind(&n, BLOCK)).map(|n| self.lower_stmt(&n));
                Stmt::Try { resources, body, catches, finally, range }
            }
            LABELED_STMT => {
                let label = direct_token_of_kind(node, IDENT).map(|t| t.text().to_string()).unwrap_or_default();
                let body = children(node).find(|n| Self::is_stmt_kind(n.kind())).map(|n| self.lower_stmt(&n)).unwrap_or_else(|| self.missing_stmt());
                Stmt::Labeled { label, body, range }
            }
            SYNCHRONIZED_STMT => {
                // Modeled as its guarded block; the monitor expression isn't
                // needed by any provider today.
                let body = child_of_kind(node, BLOCK).map(|n| self.lower_stmt(&n)).unwrap_or_else(|| self.missing_stmt());
                return body;
            }
            EMPTY_STMT => Stmt::Empty { range },
            SWITCH_STMT => {
                // Arm bodies are lowered so names inside them still resolve;
                // the switch's own control structure is left coarse.
                for arm in children_of_kind(node, SWITCH_ARM) {
                    for child in children(&arm) {
                        if Self::is_stmt_kind(child.kind()) {
                            self.lower_stmt(&child);
                        } else if Self::is_expr_kind(child.kind()) {
                            self.lower_expr(&child);
                        }
                    }
                }
                Stmt::Block { statements: Vec::new(), range }
            }
            ERROR_NODE => Stmt::Error { range },
            _ => Stmt::Error { range },
        };
        self.body.stmts.alloc(stmt)
    }

    fn lower_resource(&mut self, node: &SyntaxNode) -> StmtId {
        if node.kind() == LOCAL_VAR_DECL {
            self.lower_stmt(node)
        } else {
            let expr = self.lower_expr(node);
            self.body.stmts.alloc(Stmt::Expr { expr, range: node.text_range() })
        }
    }

    fn lower_catch(&mut self, node: &SyntaxNode) -> CatchClause {
        let type_names = children_of_kind(node, TYPE_REF).map(|n| type_name_of(&n)).collect();
        let binding = direct_token_of_kind(node, IDENT).map(|t| t.text().to_string()).unwrap_or_default();
        let body = child_of_kind(node, BLOCK).map(|n| self.lower_stmt(&n)).unwrap_or_else(|| self.missing_stmt());
        CatchClause { type_names, binding, body, range: node.text_range() }
    }

    fn lower_expr(&mut self, node: &SyntaxNode) -> ExprId {
        let range = node.text_range();
        let expr = match node.kind() {
            LITERAL_EXPR => {
                let tok = node.children_with_tokens().find_map(|e| e.into_token());
                let (kind, text) = match tok {
                    Some(t) => (
                        match t.kind() {
                            INT_LIT => LiteralKind::Int,
                            FLOAT_LIT => LiteralKind::Float,
                            CHAR_LIT => LiteralKind::Char,
                            STRING_LIT => LiteralKind::String,
                            TEXT_BLOCK => LiteralKind::TextBlock,
                            TRUE_KW | FALSE_KW => LiteralKind::Bool,
                            _ => LiteralKind::Null,
                        },
                        t.text().to_string(),
                    ),
                    None => (LiteralKind::Null, String::new()),
                };
                Expr::Literal { kind, text, range }
            }
            NAME_EXPR => {
                let name = direct_token_of_kind(node, IDENT).map(|t| t.text().to_string()).unwrap_or_default();
                Expr::Name { name, range }
            }
            THIS_EXPR => Expr::This { range },
            SUPER_EXPR => Expr::Super { range },
            PAREN_EXPR => {
                let inner = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Expr::Paren { inner, range }
            }
            FIELD_ACCESS_EXPR => {
                let receiver = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let name = node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .filter(|t| t.kind() == IDENT || t.kind() == THIS_KW || t.kind() == SUPER_KW || t.kind() == CLASS_KW)
                    .last()
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                Expr::FieldAccess { receiver, name, range }
            }
            ARRAY_ACCESS_EXPR => {
                let mut it = children(node);
                let receiver = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let index = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Expr::ArrayAccess { receiver, index, range }
            }
            CALL_EXPR => {
                let callee_node = children(node).find(|n| n.kind() != ARG_LIST);
                let callee = callee_node.map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let args = child_of_kind(node, ARG_LIST).map(|list| children(&list).map(|n| self.lower_expr(&n)).collect()).unwrap_or_default();
                Expr::Call { callee, args, range }
            }
            NEW_EXPR => {
                let type_name = direct_token_of_kind(node, IDENT).map(|t| t.text().to_string()).unwrap_or_default();
                let args = child_of_kind(node, ARG_LIST).map(|list| children(&list).map(|n| self.lower_expr(&n)).collect()).unwrap_or_default();
                Expr::New { type_name, args, range }
            }
            NEW_ARRAY_EXPR => {
                let type_name = direct_token_of_kind(node, IDENT).map(|t| t.text().to_string()).unwrap_or_default();
                let dims = children(node).filter(|n| Self::is_expr_kind(n.kind())).map(|n| Some(self.lower_expr(&n))).collect();
                let init = child_of_kind(node, ARRAY_INIT).map(|n| self.lower_expr(&n));
                Expr::NewArray { type_name, dims, init, range }
            }
            ARRAY_INIT => {
                let elements = children(node).map(|n| self.lower_expr(&n)).collect();
                Expr::ArrayInit { elements, range }
            }
            UNARY_EXPR => {
                let op = operator_text(node, UNARY_OPS);
                let operand = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Expr::Unary { op, operand, range }
            }
            POSTFIX_EXPR => {
                let op = operator_text(node, &[PLUSPLUS, MINUSMINUS]);
                let operand = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Expr::Postfix { op, operand, range }
            }
            BINARY_EXPR => {
                let op = operator_text(node, BINARY_OPS);
                let mut it = children(node);
                let lhs = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let rhs = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Expr::Binary { op, lhs, rhs, range }
            }
            ASSIGN_EXPR => {
                let op = operator_text(node, ASSIGN_OPS);
                let mut it = children(node);
                let target = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let value = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Expr::Assign { op, target, value, range }
            }
            CONDITIONAL_EXPR => {
                let mut it = children(node);
                let cond = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let then_branch = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let else_branch = it.next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Expr::Conditional { cond, then_branch, else_branch, range }
            }
            CAST_EXPR => {
                let type_name = child_of_kind(node, TYPE_REF).map(|n| type_name_of(&n)).unwrap_or_default();
                let operand = children(node).find(|n| Self::is_expr_kind(n.kind())).map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                Expr::Cast { type_name, operand, range }
            }
            INSTANCEOF_EXPR => {
                let operand = children(node).find(|n| Self::is_expr_kind(n.kind())).map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let type_name = child_of_kind(node, TYPE_REF).map(|n| type_name_of(&n)).unwrap_or_default();
                let binding = direct_token_of_kind(node, IDENT).map(|t| t.text().to_string());
                Expr::InstanceOf { operand, type_name, binding, range }
            }
            LAMBDA_EXPR => {
                let params = child_of_kind(node, LAMBDA_PARAM_LIST)
                    .map(|list| {
                        list.children_with_tokens()
                            .filter_map(|e| e.into_token())
                            .filter(|t| t.kind() == IDENT)
                            .map(|t| t.text().to_string())
                            .collect()
                    })
                    .unwrap_or_default();
                let body = if let Some(block) = child_of_kind(node, BLOCK) {
                    LambdaBody::Block(self.lower_stmt(&block))
                } else if let Some(expr_node) = children(node).find(|n| n.kind() != LAMBDA_PARAM_LIST) {
                    LambdaBody::Expr(self.lower_expr(&expr_node))
                } else {
                    LambdaBody::Expr(self.missing_expr())
                };
                Expr::Lambda { params, body, range }
            }
            METHOD_REF_EXPR => {
                let receiver = children(node).next().map(|n| self.lower_expr(&n)).unwrap_or_else(|| self.missing_expr());
                let member = direct_token_of_kind(node, IDENT).or_else(|| direct_token_of_kind(node, NEW_KW)).map(|t| t.text().to_string()).unwrap_or_default();
                Expr::MethodRef { receiver, member, range }
            }
            CLASS_LITERAL_EXPR => Expr::ClassLiteral { type_name: type_name_of(node), range },
            SWITCH_STMT => Expr::Switch { range },
            ERROR_NODE => Expr::Error { range },
            _ => Expr::Error { range },
        };
        self.body.exprs.alloc(expr)
    }

    fn missing_expr(&mut self) -> ExprId {
        self.body.exprs.alloc(Expr::Missing)
    }

    fn missing_stmt(&mut self) -> StmtId {
        self.body.stmts.alloc(Stmt::Missing)
    }

    fn is_stmt_kind(kind: jls_syntax::SyntaxKind) -> bool {
        matches!(
            kind,
            BLOCK | EXPR_STMT
                | LOCAL_VAR_DECL
                | IF_STMT
                | WHILE_STMT
                | DO_WHILE_STMT
                | FOR_STMT
                | FOR_EACH_STMT
                | RETURN_STMT
                | THROW_STMT
                | BREAK_STMT
                | CONTINUE_STMT
                | YIELD_STMT
                | ASSERT_STMT
                | TRY_STMT
                | LABELED_STMT
                | SYNCHRONIZED_STMT
                | EMPTY_STMT
                | SWITCH_STMT
                | ERROR_NODE
        )
    }

    fn is_expr_kind(kind: jls_syntax::SyntaxKind) -> bool {
        matches!(
            kind,
            LITERAL_EXPR
                | NAME_EXPR
                | THIS_EXPR
                | SUPER_EXPR
                | PAREN_EXPR
                | FIELD_ACCESS_EXPR
                | ARRAY_ACCESS_EXPR
                | CALL_EXPR
                | NEW_EXPR
                | NEW_ARRAY_EXPR
                | ARRAY_INIT
                | UNARY_EXPR
                | POSTFIX_EXPR
                | BINARY_EXPR
                | ASSIGN_EXPR
                | CONDITIONAL_EXPR
                | CAST_EXPR
                | INSTANCEOF_EXPR
                | LAMBDA_EXPR
                | METHOD_REF_EXPR
                | CLASS_LITERAL_EXPR
                | SWITCH_STMT
                | ERROR_NODE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jls_syntax::parse_java;

    fn parse_block_src(src: &str) -> SyntaxNode {
        let wrapped = format!("class X {{ void m() {src} }}");
        let parsed = parse_java(&wrapped);
        parsed.syntax().descendants().find(|n| n.kind() == BLOCK).expect("a block")
    }

    #[test]
    fn lowers_explicit_constructor_invocation_this() {
        let block = parse_block_src("{ this(1); }");
        let body = lower_body(&block);
        let Stmt::Block { statements, .. } = &body.stmts[body.root] else { panic!("expected block root") };
        assert_eq!(statements.len(), 1);
        let Stmt::Expr { expr, .. } = &body.stmts[statements[0]] else { panic!("expected expr stmt") };
        let Expr::Call { callee, args, .. } = &body.exprs[*expr] else { panic!("expected call") };
        assert_eq!(args.len(), 1);
        assert!(matches!(&body.exprs[*callee], Expr::This { .. }));
    }

    #[test]
    fn lowers_explicit_constructor_invocation_super() {
        let block = parse_block_src("{ super(); }");
        let body = lower_body(&block);
        let Stmt::Block { statements, .. } = &body.stmts[body.root] else { panic!("expected block root") };
        let Stmt::Expr { expr, .. } = &body.stmts[statements[0]] else { panic!("expected expr stmt") };
        let Expr::Call { callee, args, .. } = &body.exprs[*expr] else { panic!("expected call") };
        assert!(args.is_empty());
        assert!(matches!(&body.exprs[*callee], Expr::Super { .. }));
    }

    #[test]
    fn lowers_field_access_chain() {
        let block = parse_block_src("{ a.b.c(); }");
        let body = lower_body(&block);
        let Stmt::Block { statements, .. } = &body.stmts[body.root] else { panic!() };
        let Stmt::Expr { expr, .. } = &body.stmts[statements[0]] else { panic!() };
        let Expr::Call { callee, .. } = &body.exprs[*expr] else { panic!("expected call") };
        let Expr::FieldAccess { receiver, name, .. } = &body.exprs[*callee] else { panic!("expected field access") };
        assert_eq!(name, "c");
        assert!(matches!(&body.exprs[*receiver], Expr::FieldAccess { name, .. } if name == "b"));
    }

    #[test]
    fn lowers_if_else_and_local_var_decl() {
        let block = parse_block_src("{ int x = 1; if (x > 0) { return; } else { throw new RuntimeException(); } }");
        let body = lower_body(&block);
        let Stmt::Block { statements, .. } = &body.stmts[body.root] else { panic!() };
        assert_eq!(statements.len(), 2);
        assert!(matches!(&body.stmts[statements[0]], Stmt::LocalVarDecl { declarators, .. } if declarators.len() == 1));
        let Stmt::If { else_branch, .. } = &body.stmts[statements[1]] else { panic!("expected if") };
        assert!(else_branch.is_some());
    }

    #[test]
    fn lowers_lambda_with_block_body() {
        let block = parse_block_src("{ Runnable r = () -> { System.out.println(1); }; }");
        let body = lower_body(&block);
        let Stmt::Block { statements, .. } = &body.stmts[body.root] else { panic!() };
        let Stmt::LocalVarDecl { declarators, .. } = &body.stmts[statements[0]] else { panic!("expected decl") };
        let (_, init) = &declarators[0];
        let Expr::Lambda { body: lambda_body, .. } = &body.exprs[init.unwrap()] else { panic!("expected lambda") };
        assert!(matches!(lambda_body, LambdaBody::Block(_)));
    }
}
