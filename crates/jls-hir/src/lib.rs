//! The stable-id semantic tree lowered from `jls-syntax`'s CST (spec.md
//! §4.3a): an item tree of classes/fields/methods, lazily-lowered method
//! bodies, and Lombok synthetic-member metadata.

pub mod arena;
pub mod hir;
pub mod item_tree;
pub mod lombok;
pub mod lowering;
pub mod queries;

pub use hir::{Body, CatchClause, Expr, ExprId, LambdaBody, LiteralKind, Stmt, StmtId};
pub use item_tree::{ClassItem, ClassKind, FieldItem, ImportItem, ItemId, ItemTree, MethodItem, ParamItem, lower_item_tree};
pub use lombok::{LombokMetadata, SyntheticMember, SyntheticMemberKind};
pub use lowering::lower_body;
pub use queries::HirDatabase;
