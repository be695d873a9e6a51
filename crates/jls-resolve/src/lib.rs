//! Name resolution and semantic queries (spec.md §4.3): simple-name lookup
//! through the scopes the JLS defines, "what's the element/type/members at
//! this point", accessibility, and erasure. This crate answers those
//! questions syntactically and off cached classpath/JDK metadata — it does
//! not run a real type checker, so anything requiring full type inference
//! (overload resolution, generic substitution) is out of scope.

mod access;
mod context;
mod element;
mod erasure;
mod members;
mod scope;
mod types;

pub use access::{accessibility_of, is_accessible, Accessibility};
pub use context::ResolveContext;
pub use element::{element_at_offset, Element};
pub use erasure::erase;
pub use members::{members_of_jdk_class, members_of_source_class, MemberInfo, MemberKind, MembersError};
pub use scope::Scope;
pub use types::ResolvedType;
