//! The process-wide entry point (spec.md §4.3 "Reusable Compiler Facade"):
//! exactly one [`CompileTask`] is ever live at a time, leased out from
//! behind a mutex so two overlapping requests never race to build two
//! divergent compilations of the same workspace.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use jls_cache::Fingerprint;
use jls_classpath::Universe;
use jls_core::FileId;
use parking_lot::Mutex;

use crate::compile_task::{CompileTask, CompileTaskKey};
use crate::error::Result;

#[derive(Default)]
pub struct CompilerFacade {
    current: Mutex<Option<(CompileTaskKey, Arc<CompileTask>)>>,
}

impl CompilerFacade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached task if `sources`/`classpath_fingerprint` match the
    /// live one exactly, otherwise builds and leases a new one. Only one
    /// `CompileTask` is ever kept alive — building a new one always drops the
    /// previous lease, per spec.md §4.3's "single in-flight compile" model.
    pub fn compile(
        &self,
        sources: &BTreeMap<FileId, PathBuf>,
        universe: Arc<Universe>,
        classpath_fingerprint: &Fingerprint,
    ) -> Result<Arc<CompileTask>> {
        let key = CompileTaskKey::new(sources, classpath_fingerprint);
        let mut guard = self.current.lock();

        if let Some((cached_key, task)) = guard.as_ref() {
            if cached_key == &key {
                return Ok(task.clone());
            }
        }

        let task = Arc::new(CompileTask::build(sources, universe)?);
        *guard = Some((key, task.clone()));
        Ok(task)
    }

    pub fn current(&self) -> Option<Arc<CompileTask>> {
        self.current.lock().as_ref().map(|(_, task)| task.clone())
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
    fn reuses_the_same_task_for_an_unchanged_source_set() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        std::fs::write(&file, "class A {}").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let cp_fp = Fingerprint::from_bytes("cp");

        let facade = CompilerFacade::new();
        let first = facade.compile(&sources, empty_universe(), &cp_fp).unwrap();
        let second = facade.compile(&sources, empty_universe(), &cp_fp).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn rebuilds_when_a_source_file_changes() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        std::fs::write(&file, "class A {}").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file.clone());
        let cp_fp = Fingerprint::from_bytes("cp");

        let facade = CompilerFacade::new();
        let first = facade.compile(&sources, empty_universe(), &cp_fp).unwrap();
        std::fs::write(&file, "class A { int x; }").unwrap();
        let second = facade.compile(&sources, empty_universe(), &cp_fp).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
