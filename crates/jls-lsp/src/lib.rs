//! Java language server binary (spec.md §4.6, §6): an `lsp-server`
//! connection wired to the `jls-ide` providers through [`state::WorldState`].

pub mod capabilities;
pub mod compiler;
pub mod convert;
pub mod dispatcher;
pub mod progress;
pub mod state;

use std::path::PathBuf;

use jls_core::AbsPathBuf;
use lsp_server::Connection;
use lsp_types::InitializeParams;

use state::WorldState;

/// Runs the server to completion over an already-established stdio
/// connection: the `initialize`/`initialized` handshake, then the
/// dispatch loop until `shutdown`/`exit`.
pub fn run(connection: Connection) -> anyhow::Result<()> {
    let (initialize_id, initialize_params) = connection.initialize_start()?;
    let initialize_params: InitializeParams = serde_json::from_value(initialize_params)?;

    let server_capabilities = serde_json::to_value(capabilities::server_capabilities())?;
    connection.initialize_finish(initialize_id, serde_json::json!({ "capabilities": server_capabilities }))?;

    let state = build_world_state(&initialize_params)?;
    dispatcher::main_loop(&connection, state)
}

fn build_world_state(params: &InitializeParams) -> anyhow::Result<WorldState> {
    let workspace_root = workspace_root(params)?;
    let options = params.initialization_options.clone().unwrap_or(serde_json::Value::Null);
    let (config, diagnostics) = jls_config::JlsConfig::from_init_options(&options);
    if !diagnostics.is_empty() {
        tracing::warn!(?diagnostics, "initializationOptions produced config diagnostics");
    }

    let mut state = WorldState::new(workspace_root.clone(), config);
    let root = AbsPathBuf::new(workspace_root)?;
    state.files.set_workspace_roots(vec![root])?;
    Ok(state)
}

/// `rootUri` is what every client still sends; `workspaceFolders` is
/// preferred when present since it's the only one multi-root clients fill
/// in (spec.md §6 models a single workspace root, so only the first folder
/// is used).
fn workspace_root(params: &InitializeParams) -> anyhow::Result<PathBuf> {
    if let Some(folders) = &params.workspace_folders {
        if let Some(first) = folders.first() {
            return Ok(jls_core::lsp_uri_to_path(&first.uri)?.into_path_buf());
        }
    }
    if let Some(uri) = &params.root_uri {
        return Ok(jls_core::lsp_uri_to_path(uri)?.into_path_buf());
    }
    std::env::current_dir().map_err(Into::into)
}
