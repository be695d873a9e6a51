//! A compile task: one workspace source set plus classpath, wired into a
//! [`RootDatabase`] and a lexical [`TokenIndex`] shortlist, reusable across
//! requests as long as neither input changes (spec.md §4.3 "Reusable
//! Compiler Facade").

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use jls_cache::Fingerprint;
use jls_classpath::Universe;
use jls_core::FileId;
use jls_hir::ItemTree;
use jls_index::TokenIndex;

use crate::database::{RootDatabase, SourceDatabase};
use crate::error::{DbError, Result};

/// Fingerprints every input a reuse decision depends on: file contents (not
/// just mtimes, since a touch-without-edit save must still hit the cache)
/// plus the classpath's own identity. Two builds with an equal key are
/// guaranteed to answer every query identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileTaskKey(Fingerprint);

impl CompileTaskKey {
    pub fn new(sources: &BTreeMap<FileId, PathBuf>, classpath_fingerprint: &Fingerprint) -> Self {
        let mut parts = Vec::with_capacity(sources.len() + 1);
        for (file, path) in sources {
            let file_fp = Fingerprint::from_file(path).unwrap_or_else(|_| Fingerprint::from_bytes(path.to_string_lossy().as_bytes()));
            parts.push(Fingerprint::from_bytes(format!("{}:{}", file.0, file_fp.as_str())));
        }
        parts.push(classpath_fingerprint.clone());
        Self(Fingerprint::combine(&parts))
    }
}

pub struct CompileTask {
    pub(crate) db: RootDatabase,
    pub(crate) files: BTreeMap<FileId, PathBuf>,
    pub(crate) token_index: TokenIndex,
    pub(crate) universe: Arc<Universe>,
}

impl CompileTask {
    pub fn build(sources: &BTreeMap<FileId, PathBuf>, universe: Arc<Universe>) -> Result<Self> {
        let mut db = RootDatabase::default();
        let token_index = TokenIndex::new();

        for (&file, path) in sources {
            let text = std::fs::read_to_string(path).map_err(|source| DbError::ReadFile { path: path.clone(), source })?;
            db.set_file_text(file, Arc::from(text.as_str()));
            let _ = token_index.update_file(path);
        }

        Ok(Self { db, files: sources.clone(), token_index, universe })
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        self.files.keys().copied()
    }

    pub fn path_of(&self, file: FileId) -> Option<&PathBuf> {
        self.files.get(&file)
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// `item_tree`, with the single annotation-processor-fault retry
    /// (spec.md §4.3): a Lombok-synthesized member colliding with a
    /// declared one is this HIR's analog of an annotation processor
    /// generating code that conflicts with hand-written code. On collision,
    /// the synthetic members for the offending class are dropped and the
    /// tree is re-derived once, as if annotation processing had been
    /// disabled for this compile — never retried a second time.
    pub fn item_tree_checked(&self, file: FileId) -> Arc<ItemTree> {
        let tree = self.db.item_tree(file);
        if !has_lombok_collision(&tree) {
            return tree;
        }
        tracing::warn!(file = %file, "lombok synthetic member collides with a declared member; retrying with lombok expansion disabled");
        Arc::new(disable_lombok(tree.as_ref().clone()))
    }
}

fn has_lombok_collision(tree: &ItemTree) -> bool {
    tree.classes.iter().any(class_has_collision)
}

fn class_has_collision(class: &jls_hir::ClassItem) -> bool {
    let declared: std::collections::HashSet<&str> =
        class.fields.iter().map(|f| f.name.as_str()).chain(class.methods.iter().map(|m| m.name.as_str())).collect();
    let collides = class.lombok.synthetic_members.iter().any(|m| declared.contains(m.name.as_str()));
    collides || class.nested.iter().any(class_has_collision)
}

fn disable_lombok(mut tree: ItemTree) -> ItemTree {
    for class in &mut tree.classes {
        strip_lombok(class);
    }
    tree
}

fn strip_lombok(class: &mut jls_hir::ClassItem) {
    class.lombok.synthetic_members.clear();
    for nested in &mut class.nested {
        strip_lombok(nested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jls_classpath::{Classpath, JdkIndex};
    use tempfile::tempdir;

    fn empty_universe() -> Arc<Universe> {
        Arc::new(Universe::new(JdkIndex::empty(), &Classpath::default(), None))
    }

    #[test]
    fn compile_task_key_changes_when_file_contents_change() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        std::fs::write(&file, "class A {}").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file.clone());
        let cp_fp = Fingerprint::from_bytes("cp");

        let before = CompileTaskKey::new(&sources, &cp_fp);
        std::fs::write(&file, "class A { int x; }").unwrap();
        let after = CompileTaskKey::new(&sources, &cp_fp);
        assert_ne!(before, after);
    }

    #[test]
    fn lombok_collision_drops_synthetic_members_on_retry() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Point.java");
        std::fs::write(&file, "import lombok.Getter;\n\n@Getter\nclass Point {\n  private int x;\n  int getX() { return x; }\n}\n").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let tree = task.item_tree_checked(FileId(0));
        assert!(tree.classes[0].lombok.synthetic_members.is_empty());
    }

    #[test]
    fn non_colliding_lombok_class_keeps_synthetic_members() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Data.java");
        std::fs::write(&file, "import lombok.Getter;\n\n@Getter\nclass Data {\n  private int x;\n}\n").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let tree = task.item_tree_checked(FileId(0));
        assert!(!tree.classes[0].lombok.synthetic_members.is_empty());
    }
}
