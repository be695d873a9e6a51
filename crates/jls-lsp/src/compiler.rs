//! Compiler-facade recreation (spec.md §4.3, §4.6): rebuilds the classpath
//! only when the build files or classpath-related settings have actually
//! gone stale, otherwise hands back the last [`jls_db::CompileTask`] the
//! [`jls_db::CompilerFacade`] already has leased.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use jls_cache::Fingerprint;
use jls_classpath::{Classpath, JdkIndex, JdkInstallation, Universe};
use jls_core::FileId;
use jls_db::CompileTask;

use crate::progress::ProgressReporter;
use crate::state::WorldState;

pub fn recompile(state: &mut WorldState, reporter: &mut ProgressReporter<'_>) -> anyhow::Result<Arc<CompileTask>> {
    reporter.phase("Configure javac");
    let sources = collect_sources(state);

    reporter.phase("Finding source roots");
    let _source_roots = state.files.source_roots();

    let settings_fingerprint = build_settings_fingerprint(state);

    let universe = if state.is_classpath_stale(&settings_fingerprint) {
        reporter.phase("Inferring class path");
        let build_config = jls_build::BuildConfig {
            explicit_classpath: explicit_paths(&state.config.class_path),
            explicit_docpath: explicit_paths(&state.config.doc_path),
            bazel_target: None,
        };
        let cache_dir = state.config.cache.resolve_root(&state.workspace_root).ok();
        let runner = jls_build::DefaultCommandRunner::default();
        let build_result = jls_build::infer_build_result(&state.workspace_root, &build_config, &runner, cache_dir.as_deref())?;

        reporter.phase("Inferring doc path");
        let jdk = discover_jdk();
        let classpath = Classpath::new(build_result.classpath.clone());
        let universe = Arc::new(Universe::new(jdk, &classpath, cache_dir.as_deref()));

        let classpath_fingerprint = Fingerprint::combine(
            build_result.classpath.iter().chain(build_result.docpath.iter()).filter_map(|p| Fingerprint::from_file_metadata(p).ok()).collect::<Vec<_>>().iter(),
        );

        state.store_classpath(universe.clone(), classpath_fingerprint, settings_fingerprint);
        universe
    } else {
        reporter.phase("Using cached classpath");
        state.cached_universe().expect("checked by is_classpath_stale")
    };

    Ok(state.facade.compile(&sources, universe, state.classpath_fingerprint())?)
}

fn collect_sources(state: &WorldState) -> BTreeMap<FileId, PathBuf> {
    state.files.all_files().into_iter().filter_map(|id| state.files.path(id).map(|path| (id, path.to_path_buf()))).collect()
}

fn explicit_paths(configured: &[String]) -> Option<Vec<PathBuf>> {
    if configured.is_empty() {
        None
    } else {
        Some(configured.iter().map(PathBuf::from).collect())
    }
}

/// Everything that would make a previously-inferred classpath stale: the
/// classpath-related config keys plus the detected build file's mtime, if
/// any. Cheap on purpose — this runs on every recompile to decide whether
/// the expensive build-tool invocation below it is needed at all.
fn build_settings_fingerprint(state: &WorldState) -> Fingerprint {
    let mut parts = vec![Fingerprint::from_bytes(format!(
        "{:?}|{:?}|{:?}",
        state.config.class_path, state.config.doc_path, state.config.external_dependencies
    ))];

    if let Some((_, build_file)) = jls_build::BuildSystemKind::detect(&state.workspace_root) {
        if let Ok(fp) = Fingerprint::from_file_metadata(&build_file) {
            parts.push(fp);
        }
    }

    Fingerprint::combine(&parts)
}

fn discover_jdk() -> JdkIndex {
    match JdkInstallation::discover(None) {
        Ok(install) => JdkIndex::from_jdk_root(install.root()).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to index discovered JDK; continuing without one");
            JdkIndex::empty()
        }),
        Err(err) => {
            tracing::warn!(error = %err, "no JDK installation found; continuing without one");
            JdkIndex::empty()
        }
    }
}
