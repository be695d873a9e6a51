//! The body-level HIR: `Expr`/`Stmt` arenas addressed by stable `Idx`s,
//! lowered from a `BLOCK` syntax node (spec.md §4.3a). Desugaring is
//! intentionally shallow — enough structure for name resolution and
//! providers, not a full control-flow graph.

use crate::arena::{Arena, Idx};
use jls_core::TextRange;

pub type ExprId = Idx<Expr>;
pub type StmtId = Idx<Stmt>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind {
    Int,
    Float,
    Char,
    String,
    TextBlock,
    Bool,
    Null,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Missing,
    Literal { kind: LiteralKind, text: String, range: TextRange },
    Name { name: String, range: TextRange },
    This { range: TextRange },
    Super { range: TextRange },
    Paren { inner: ExprId, range: TextRange },
    FieldAccess { receiver: ExprId, name: String, range: TextRange },
    ArrayAccess { receiver: ExprId, index: ExprId, range: TextRange },
    Call { callee: ExprId, args: Vec<ExprId>, range: TextRange },
    New { type_name: String, args: Vec<ExprId>, range: TextRange },
    NewArray { type_name: String, dims: Vec<Option<ExprId>>, init: Option<ExprId>, range: TextRange },
    ArrayInit { elements: Vec<ExprId>, range: TextRange },
    Unary { op: String, operand: ExprId, range: TextRange },
    Postfix { op: String, operand: ExprId, range: TextRange },
    Binary { op: String, lhs: ExprId, rhs: ExprId, range: TextRange },
    Assign { op: String, target: ExprId, value: ExprId, range: TextRange },
    Conditional { cond: ExprId, then_branch: ExprId, else_branch: ExprId, range: TextRange },
    Cast { type_name: String, operand: ExprId, range: TextRange },
    InstanceOf { operand: ExprId, type_name: String, binding: Option<String>, range: TextRange },
    Lambda { params: Vec<String>, body: LambdaBody, range: TextRange },
    MethodRef { receiver: ExprId, member: String, range: TextRange },
    ClassLiteral { type_name: String, range: TextRange },
    Switch { range: TextRange },
    Error { range: TextRange },
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(ExprId),
    Block(StmtId),
}

impl Expr {
    pub fn range(&self) -> TextRange {
        match self {
            Expr::Missing => TextRange::empty(0.into()),
            Expr::Literal { range, .. }
            | Expr::Name { range, .. }
            | Expr::This { range }
            | Expr::Super { range }
            | Expr::Paren { range, .. }
            | Expr::FieldAccess { range, .. }
            | Expr::ArrayAccess { range, .. }
            | Expr::Call { range, .. }
            | Expr::New { range, .. }
            | Expr::NewArray { range, .. }
            | Expr::ArrayInit { range, .. }
            | Expr::Unary { range, .. }
            | Expr::Postfix { range, .. }
            | Expr::Binary { range, .. }
            | Expr::Assign { range, .. }
            | Expr::Conditional { range, .. }
            | Expr::Cast { range, .. }
            | Expr::InstanceOf { range, .. }
            | Expr::Lambda { range, .. }
            | Expr::MethodRef { range, .. }
            | Expr::ClassLiteral { range, .. }
            | Expr::Switch { range }
            | Expr::Error { range } => *range,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Missing,
    Block { statements: Vec<StmtId>, range: TextRange },
    Expr { expr: ExprId, range: TextRange },
    LocalVarDecl { type_name: String, declarators: Vec<(String, Option<ExprId>)>, range: TextRange },
    If { cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId>, range: TextRange },
    While { cond: ExprId, body: StmtId, range: TextRange },
    DoWhile { body: StmtId, cond: ExprId, range: TextRange },
    For { init: Vec<StmtId>, cond: Option<ExprId>, update: Vec<ExprId>, body: StmtId, range: TextRange },
    ForEach { var_name: String, iterable: ExprId, body: StmtId, range: TextRange },
    Return { value: Option<ExprId>, range: TextRange },
    Throw { value: ExprId, range: TextRange },
    Break { label: Option<String>, range: TextRange },
    Continue { label: Option<String>, range: TextRange },
    Yield { value: ExprId, range: TextRange },
    Assert { cond: ExprId, message: Option<ExprId>, range: TextRange },
    Try { resources: Vec<StmtId>, body: StmtId, catches: Vec<CatchClause>, finally: Option<StmtId>, range: TextRange },
    Labeled { label: String, body: StmtId, range: TextRange },
    Empty { range: TextRange },
    Error { range: TextRange },
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub type_names: Vec<String>,
    pub binding: String,
    pub body: StmtId,
    pub range: TextRange,
}

impl Stmt {
    pub fn range(&self) -> TextRange {
        match self {
            Stmt::Missing => TextRange::empty(0.into()),
            Stmt::Block { range, .. }
            | Stmt::Expr { range, .. }
            | Stmt::LocalVarDecl { range, .. }
            | Stmt::If { range, .. }
            | Stmt::While { range, .. }
            | Stmt::DoWhile { range, .. }
            | Stmt::For { range, .. }
            | Stmt::ForEach { range, .. }
            | Stmt::Return { range, .. }
            | Stmt::Throw { range, .. }
            | Stmt::Break { range, .. }
            | Stmt::Continue { range, .. }
            | Stmt::Yield { range, .. }
            | Stmt::Assert { range, .. }
            | Stmt::Try { range, .. }
            | Stmt::Labeled { range, .. }
            | Stmt::Empty { range }
            | Stmt::Error { range } => *range,
        }
    }
}

/// The full set of expressions and statements inside a method/constructor
/// body or field initializer, plus the root statement.
#[derive(Debug, Clone)]
pub struct Body {
    pub exprs: Arena<Expr>,
    pub stmts: Arena<Stmt>,
    pub root: StmtId,
}
