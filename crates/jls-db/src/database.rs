//! The incremental, salsa-backed source database: file text is the one
//! `#[salsa::input]`; everything else (item trees today, type-checking once
//! `jls-resolve` grows a real checker) is a derived query that salsa memoizes
//! and invalidates on its own.

use std::sync::Arc;

use jls_core::FileId;
use jls_hir::ItemTree;

#[ra_salsa::query_group(SourceDatabaseStorage)]
pub trait SourceDatabase: ra_salsa::Database {
    #[ra_salsa::input]
    fn file_text(&self, file: FileId) -> Arc<str>;

    fn item_tree(&self, file: FileId) -> Arc<ItemTree>;
}

fn item_tree(db: &dyn SourceDatabase, file: FileId) -> Arc<ItemTree> {
    Arc::new(jls_hir::lower_item_tree(&db.file_text(file)))
}

#[ra_salsa::database(SourceDatabaseStorage)]
#[derive(Default)]
pub struct RootDatabase {
    storage: ra_salsa::Storage<RootDatabase>,
}

impl ra_salsa::Database for RootDatabase {}

impl ra_salsa::ParallelDatabase for RootDatabase {
    fn snapshot(&self) -> ra_salsa::Snapshot<Self> {
        ra_salsa::Snapshot::new(RootDatabase { storage: self.storage.snapshot() })
    }
}

impl jls_hir::HirDatabase for RootDatabase {
    fn file_text(&self, file: FileId) -> Arc<str> {
        SourceDatabase::file_text(self, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_tree_is_memoized_until_the_input_changes() {
        let mut db = RootDatabase::default();
        let file = FileId(0);
        db.set_file_text(file, Arc::from("class A {}"));
        let first = db.item_tree(file);
        let second = db.item_tree(file);
        assert!(Arc::ptr_eq(&first, &second));

        db.set_file_text(file, Arc::from("class B {}"));
        let third = db.item_tree(file);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.classes[0].name, "B");
    }
}
