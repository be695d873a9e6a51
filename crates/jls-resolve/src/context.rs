//! The seam between name resolution and whatever owns the rest of the
//! workspace's source set (spec.md §4.3: resolution needs to see every
//! other file's top-level classes, not just the one being edited). Kept as
//! a trait, the same way [`jls_hir::HirDatabase`] keeps HIR lowering
//! decoupled from the file store, so this crate never has to depend on the
//! compiler façade.

use jls_classpath::Universe;

pub trait ResolveContext {
    fn classpath(&self) -> &Universe;

    /// Binary names of every source class belonging to `package` across the
    /// whole workspace, not just the file currently being resolved.
    fn source_classes_in_package(&self, package: &str) -> Vec<String>;
}
