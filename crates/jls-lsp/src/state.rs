//! Everything the dispatcher needs between requests: the open-file store,
//! the single leased [`CompilerFacade`] task, and the effective config.

use std::path::PathBuf;
use std::sync::Arc;

use jls_cache::Fingerprint;
use jls_classpath::Universe;
use jls_config::JlsConfig;
use jls_db::CompilerFacade;
use jls_vfs::FileStore;

/// One world per server process: spec.md §4.3 keeps exactly one live
/// [`jls_db::CompileTask`] at a time, and this is the state it's recreated
/// from whenever a document or a build file changes underneath it.
pub struct WorldState {
    pub workspace_root: PathBuf,
    pub files: FileStore,
    pub config: JlsConfig,
    pub facade: CompilerFacade,
    /// The classpath universe built on the last classpath inference,
    /// reused as-is whenever [`build_fingerprint`] is unchanged.
    universe: Option<Arc<Universe>>,
    classpath_fingerprint: Fingerprint,
    /// Fingerprint of everything that would make a previously-inferred
    /// classpath stale: the relevant config keys plus the workspace build
    /// file's mtime, if any (spec.md §4.6 "recreate the compiler when build
    /// files or settings go stale").
    build_fingerprint: Option<Fingerprint>,
}

impl WorldState {
    pub fn new(workspace_root: PathBuf, config: JlsConfig) -> Self {
        Self {
            workspace_root,
            files: FileStore::new(),
            config,
            facade: CompilerFacade::new(),
            universe: None,
            classpath_fingerprint: Fingerprint::from_bytes(""),
            build_fingerprint: None,
        }
    }

    pub fn cached_universe(&self) -> Option<Arc<Universe>> {
        self.universe.clone()
    }

    pub fn classpath_fingerprint(&self) -> &Fingerprint {
        &self.classpath_fingerprint
    }

    pub fn is_classpath_stale(&self, settings_fingerprint: &Fingerprint) -> bool {
        self.universe.is_none() || self.build_fingerprint.as_ref() != Some(settings_fingerprint)
    }

    pub fn store_classpath(&mut self, universe: Arc<Universe>, classpath_fingerprint: Fingerprint, settings_fingerprint: Fingerprint) {
        self.universe = Some(universe);
        self.classpath_fingerprint = classpath_fingerprint;
        self.build_fingerprint = Some(settings_fingerprint);
    }
}
