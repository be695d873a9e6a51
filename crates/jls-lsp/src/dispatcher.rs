//! The request/notification dispatch loop (spec.md §4.6): owns the
//! [`WorldState`], recompiles it whenever a document or build file goes
//! stale, and translates every `jls-ide` provider answer to and from the
//! wire format. A provider panic never brings the server down — it's
//! caught and reported back to the client as request failure (spec.md §7).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use jls_core::{FileId, TextSize};
use lsp_server::{Connection, ErrorCode, Message, Notification, Request, RequestId, Response};
use lsp_types::notification::Notification as LspNotification;
use serde::Serialize;

use crate::convert;
use crate::progress::ProgressReporter;
use crate::state::WorldState;

/// How long a burst of `didChange` edits to one file has to go quiet before
/// it's re-linted (spec.md §4.6 "debounced re-lint").
const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn main_loop(connection: &Connection, mut state: WorldState) -> anyhow::Result<()> {
    let mut pending_lints: HashMap<FileId, Instant> = HashMap::new();

    loop {
        match connection.receiver.recv_timeout(POLL_INTERVAL) {
            Ok(Message::Request(req)) => {
                if connection.handle_shutdown(&req)? {
                    return Ok(());
                }
                handle_request(connection, &mut state, req);
            }
            Ok(Message::Notification(not)) => {
                if not.method == lsp_types::notification::Exit::METHOD {
                    return Ok(());
                }
                handle_notification(connection, &mut state, &mut pending_lints, not);
            }
            Ok(Message::Response(_)) => {}
            Err(RecvTimeoutError::Timeout) => flush_debounced(connection, &mut state, &mut pending_lints),
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

fn flush_debounced(connection: &Connection, state: &mut WorldState, pending: &mut HashMap<FileId, Instant>) {
    let now = Instant::now();
    let due: Vec<FileId> = pending.iter().filter(|(_, deadline)| **deadline <= now).map(|(file, _)| *file).collect();
    if due.is_empty() {
        return;
    }
    for file in &due {
        pending.remove(file);
    }
    relint_files(connection, state, &due);
}

fn relint_files(connection: &Connection, state: &mut WorldState, files: &[FileId]) {
    let task = match ensure_compiled(connection, state) {
        Ok(task) => task,
        Err(err) => {
            tracing::warn!(error = %err, "recompile failed; skipping lint");
            return;
        }
    };

    for &file in files {
        publish_diagnostics(connection, state, &task, file);
    }
}

fn publish_diagnostics(connection: &Connection, state: &WorldState, task: &jls_db::CompileTask, file: FileId) {
    let Some(path) = task.path_of(file) else { return };
    let Ok(text) = state.files.contents(file) else { return };
    let Ok(uri) = convert::path_to_uri(path) else { return };
    let index = jls_core::LineIndex::new(&text);

    let diagnostics = match catch_panic(|| jls_ide::lint(task, file)) {
        Ok(diagnostics) => diagnostics,
        Err(msg) => {
            tracing::error!(panic = %msg, "lint panicked; publishing no diagnostics for this file");
            Vec::new()
        }
    };

    let lsp_diagnostics: Vec<lsp_types::Diagnostic> = diagnostics.iter().map(|d| convert::diagnostic(&index, &text, d)).collect();
    notify(connection, lsp_types::notification::PublishDiagnostics::METHOD, lsp_types::PublishDiagnosticsParams { uri, diagnostics: lsp_diagnostics, version: None });
}

fn handle_notification(connection: &Connection, state: &mut WorldState, pending: &mut HashMap<FileId, Instant>, not: Notification) {
    use lsp_types::notification::*;

    match not.method.as_str() {
        DidOpenTextDocument::METHOD => {
            let Ok(params) = serde_json::from_value::<lsp_types::DidOpenTextDocumentParams>(not.params) else { return };
            let Ok(path) = convert::uri_to_path(&params.text_document.uri) else { return };
            if let Ok(file) = state.files.open(path, params.text_document.text, params.text_document.version) {
                relint_files(connection, state, &[file]);
            }
        }
        DidChangeTextDocument::METHOD => {
            let Ok(params) = serde_json::from_value::<lsp_types::DidChangeTextDocumentParams>(not.params) else { return };
            let Ok(path) = convert::uri_to_path(&params.text_document.uri) else { return };
            let Some(file) = state.files.file_id(&path) else { return };
            let changes = params
                .content_changes
                .into_iter()
                .map(|c| match c.range {
                    Some(range) => jls_vfs::ChangeEvent::Ranged { start: range.start.into(), end: range.end.into(), text: c.text },
                    None => jls_vfs::ChangeEvent::Full(c.text),
                })
                .collect();
            if state.files.change(file, changes, params.text_document.version).is_ok() {
                pending.insert(file, Instant::now() + DEBOUNCE_DELAY);
            }
        }
        DidCloseTextDocument::METHOD => {
            let Ok(params) = serde_json::from_value::<lsp_types::DidCloseTextDocumentParams>(not.params) else { return };
            if let Ok(path) = convert::uri_to_path(&params.text_document.uri) {
                if let Some(file) = state.files.file_id(&path) {
                    state.files.close(file);
                    pending.remove(&file);
                }
            }
        }
        DidSaveTextDocument::METHOD => {
            let Ok(params) = serde_json::from_value::<lsp_types::DidSaveTextDocumentParams>(not.params) else { return };
            if let Ok(path) = convert::uri_to_path(&params.text_document.uri) {
                if let Some(file) = state.files.file_id(&path) {
                    pending.remove(&file);
                }
            }
            // Re-lint every open file, not just the saved one: recompiling
            // the shared CompileTask can change diagnostics anywhere in the
            // workspace that referenced what just changed (spec.md §4.6
            // "save-triggered transitive re-lint").
            let open_files: Vec<FileId> = state.files.all_files().into_iter().filter(|f| state.files.is_open(*f)).collect();
            relint_files(connection, state, &open_files);
        }
        DidChangeConfiguration::METHOD => {
            let Ok(params) = serde_json::from_value::<lsp_types::DidChangeConfigurationParams>(not.params) else { return };
            let (config, diagnostics) = jls_config::JlsConfig::from_init_options(&params.settings);
            if !diagnostics.is_ok() {
                tracing::warn!(?diagnostics, "configuration has validation warnings/errors");
            }
            state.config = config;
        }
        _ => {}
    }
}

fn handle_request(connection: &Connection, state: &mut WorldState, req: Request) {
    use lsp_types::request::{
        CodeActionRequest, CodeLensRequest, Completion, DocumentSymbolRequest, Formatting, FoldingRangeRequest, GotoDefinition, HoverRequest, InlayHintRequest, PrepareRenameRequest, References,
        Rename, Request as _, SemanticTokensFullRequest, SignatureHelpRequest, WorkspaceSymbolRequest,
    };

    let id = req.id.clone();
    let method = req.method.clone();

    let outcome: Result<Option<anyhow::Result<serde_json::Value>>, String> = catch_panic(|| {
        if method == Completion::METHOD {
            return Some(parse_and_run(req.params, |p| handle_completion(connection, state, p)));
        }
        if method == HoverRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_hover(connection, state, p)));
        }
        if method == GotoDefinition::METHOD {
            return Some(parse_and_run(req.params, |p| handle_definition(connection, state, p)));
        }
        if method == References::METHOD {
            return Some(parse_and_run(req.params, |p| handle_references(connection, state, p)));
        }
        if method == CodeActionRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_code_action(connection, state, p)));
        }
        if method == CodeLensRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_code_lens(connection, state, p)));
        }
        if method == Rename::METHOD {
            return Some(parse_and_run(req.params, |p| handle_rename(connection, state, p)));
        }
        if method == PrepareRenameRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_prepare_rename(connection, state, p)));
        }
        if method == FoldingRangeRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_folding_range(state, p)));
        }
        if method == InlayHintRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_inlay_hint(connection, state, p)));
        }
        if method == DocumentSymbolRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_document_symbol(connection, state, p)));
        }
        if method == WorkspaceSymbolRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_workspace_symbol(connection, state, p)));
        }
        if method == Formatting::METHOD {
            return Some(parse_and_run(req.params, |p| handle_formatting(state, p)));
        }
        if method == SemanticTokensFullRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_semantic_tokens(state, p)));
        }
        if method == SignatureHelpRequest::METHOD {
            return Some(parse_and_run(req.params, |p| handle_signature_help(connection, state, p)));
        }
        None
    });

    match outcome {
        Ok(Some(Ok(value))) => send(connection, Message::Response(Response::new_ok(id, value))),
        Ok(Some(Err(err))) => send_error(connection, id, ErrorCode::InternalError, err.to_string()),
        Ok(None) => send_error(connection, id, ErrorCode::MethodNotFound, format!("unsupported method: {method}")),
        Err(panic_message) => {
            tracing::error!(panic = %panic_message, "request provider panicked; reporting as not supported");
            send_error(connection, id, ErrorCode::InternalError, "not supported".to_string());
        }
    }
}

/// Deserializes a request's params and runs `f`, wrapping both the
/// deserialization failure and `f`'s own result into one `anyhow::Result`
/// so every call site in [`handle_request`] reduces to the same shape.
fn parse_and_run<P, R, F>(params: serde_json::Value, f: F) -> anyhow::Result<serde_json::Value>
where
    P: serde::de::DeserializeOwned,
    R: Serialize,
    F: FnOnce(P) -> anyhow::Result<R>,
{
    let params: P = serde_json::from_value(params)?;
    let result = f(params)?;
    Ok(serde_json::to_value(result)?)
}

fn ensure_compiled(connection: &Connection, state: &mut WorldState) -> anyhow::Result<std::sync::Arc<jls_db::CompileTask>> {
    let mut reporter = ProgressReporter::new(connection, "jls/recompile");
    crate::compiler::recompile(state, &mut reporter)
}

fn handle_completion(connection: &Connection, state: &mut WorldState, params: lsp_types::CompletionParams) -> anyhow::Result<lsp_types::CompletionResponse> {
    let task = ensure_compiled(connection, state)?;
    let (file, offset, text) = resolve_position(state, &task, &params.text_document_position.text_document.uri, params.text_document_position.position)?;
    let items = jls_ide::complete(&task, file, offset, &text);
    let items = items
        .into_iter()
        .map(|item| lsp_types::CompletionItem {
            label: item.label,
            kind: Some(match item.kind {
                jls_ide::CompletionItemKind::Field => lsp_types::CompletionItemKind::FIELD,
                jls_ide::CompletionItemKind::Method => lsp_types::CompletionItemKind::METHOD,
                jls_ide::CompletionItemKind::Class => lsp_types::CompletionItemKind::CLASS,
                jls_ide::CompletionItemKind::Keyword => lsp_types::CompletionItemKind::KEYWORD,
            }),
            detail: item.detail,
            ..Default::default()
        })
        .collect();
    Ok(lsp_types::CompletionResponse::Array(items))
}

fn handle_hover(connection: &Connection, state: &mut WorldState, params: lsp_types::HoverParams) -> anyhow::Result<Option<lsp_types::Hover>> {
    let task = ensure_compiled(connection, state)?;
    let (file, offset, text) = resolve_position(state, &task, &params.text_document_position_params.text_document.uri, params.text_document_position_params.position)?;
    let Some(info) = jls_ide::hover(&task, file, offset) else { return Ok(None) };
    let index = jls_core::LineIndex::new(&text);
    Ok(Some(lsp_types::Hover {
        contents: lsp_types::HoverContents::Scalar(lsp_types::MarkedString::String(info.signature)),
        range: Some(convert::lsp_range(&index, &text, info.range)),
    }))
}

fn handle_definition(connection: &Connection, state: &mut WorldState, params: lsp_types::GotoDefinitionParams) -> anyhow::Result<Option<lsp_types::GotoDefinitionResponse>> {
    let task = ensure_compiled(connection, state)?;
    let (file, offset, _text) = resolve_position(state, &task, &params.text_document_position_params.text_document.uri, params.text_document_position_params.position)?;
    let locations: Vec<lsp_types::Location> = jls_ide::definition(&task, file, offset).iter().filter_map(|loc| convert::location(&task, loc)).collect();
    if locations.is_empty() {
        return Ok(None);
    }
    Ok(Some(lsp_types::GotoDefinitionResponse::Array(locations)))
}

fn handle_references(connection: &Connection, state: &mut WorldState, params: lsp_types::ReferenceParams) -> anyhow::Result<Option<Vec<lsp_types::Location>>> {
    let task = ensure_compiled(connection, state)?;
    let (file, offset, _text) = resolve_position(state, &task, &params.text_document_position.text_document.uri, params.text_document_position.position)?;
    let locations: Vec<lsp_types::Location> = jls_ide::find_references(&task, file, offset, params.context.include_declaration)
        .iter()
        .filter_map(|loc| convert::location(&task, loc))
        .collect();
    Ok(Some(locations))
}

fn handle_code_action(connection: &Connection, state: &mut WorldState, params: lsp_types::CodeActionParams) -> anyhow::Result<Option<lsp_types::CodeActionResponse>> {
    let task = ensure_compiled(connection, state)?;
    let path = convert::uri_to_path(&params.text_document.uri)?;
    let Some(file) = state.files.file_id(&path) else { return Ok(None) };
    let text = state.files.contents(file)?;
    let index = jls_core::LineIndex::new(&text);
    let Some(start) = convert::offset_of(&index, &text, params.range.start) else { return Ok(None) };
    let Some(end) = convert::offset_of(&index, &text, params.range.end) else { return Ok(None) };
    let range = jls_core::TextRange::new(start, end);

    let diagnostics = jls_ide::lint(&task, file);
    let mut actions: Vec<lsp_types::CodeActionOrCommand> = jls_ide::code_actions_for_diagnostics(file, &diagnostics, range)
        .into_iter()
        .map(|action| code_action_to_lsp(&task, action))
        .collect();

    if let Some(action) = jls_ide::generate_constructor(&task, file, start, &state.config.code_actions) {
        actions.push(code_action_to_lsp(&task, action));
    }

    if actions.is_empty() {
        return Ok(None);
    }
    Ok(Some(actions))
}

fn code_action_to_lsp(task: &jls_db::CompileTask, action: jls_ide::CodeAction) -> lsp_types::CodeActionOrCommand {
    lsp_types::CodeActionOrCommand::CodeAction(lsp_types::CodeAction {
        title: action.title,
        kind: Some(lsp_types::CodeActionKind::QUICKFIX),
        edit: Some(convert::workspace_edit(task, &action.edit)),
        ..Default::default()
    })
}

fn handle_code_lens(connection: &Connection, state: &mut WorldState, params: lsp_types::CodeLensParams) -> anyhow::Result<Option<Vec<lsp_types::CodeLens>>> {
    let task = ensure_compiled(connection, state)?;
    let path = convert::uri_to_path(&params.text_document.uri)?;
    let Some(file) = state.files.file_id(&path) else { return Ok(None) };
    let text = state.files.contents(file)?;
    let index = jls_core::LineIndex::new(&text);
    let lenses = jls_ide::code_lenses(&task, file)
        .into_iter()
        .map(|lens| lsp_types::CodeLens { range: convert::lsp_range(&index, &text, lens.range), command: Some(lsp_types::Command { title: lens.title, command: String::new(), arguments: None }), data: None })
        .collect();
    Ok(Some(lenses))
}

fn handle_rename(connection: &Connection, state: &mut WorldState, params: lsp_types::RenameParams) -> anyhow::Result<Option<lsp_types::WorkspaceEdit>> {
    let task = ensure_compiled(connection, state)?;
    let (file, offset, _text) = resolve_position(state, &task, &params.text_document_position.text_document.uri, params.text_document_position.position)?;
    let Some(edit) = jls_ide::rename(&task, file, offset, &params.new_name) else { return Ok(None) };
    Ok(Some(convert::workspace_edit(&task, &edit)))
}

fn handle_prepare_rename(connection: &Connection, state: &mut WorldState, params: lsp_types::TextDocumentPositionParams) -> anyhow::Result<Option<lsp_types::PrepareRenameResponse>> {
    let task = ensure_compiled(connection, state)?;
    let (file, offset, text) = resolve_position(state, &task, &params.text_document.uri, params.position)?;
    let Some(result) = jls_ide::prepare_rename(&task, file, offset) else { return Ok(None) };
    let index = jls_core::LineIndex::new(&text);
    Ok(Some(lsp_types::PrepareRenameResponse::RangeWithPlaceholder { range: convert::lsp_range(&index, &text, result.range), placeholder: result.placeholder }))
}

fn handle_folding_range(state: &mut WorldState, params: lsp_types::FoldingRangeParams) -> anyhow::Result<Option<Vec<lsp_types::FoldingRange>>> {
    let path = convert::uri_to_path(&params.text_document.uri)?;
    let Some(file) = state.files.file_id(&path) else { return Ok(None) };
    let text = state.files.contents(file)?;
    let index = jls_core::LineIndex::new(&text);
    let ranges = jls_ide::folding_ranges(&text)
        .into_iter()
        .map(|fold| {
            let range = convert::lsp_range(&index, &text, fold.range);
            lsp_types::FoldingRange {
                start_line: range.start.line,
                start_character: Some(range.start.character),
                end_line: range.end.line,
                end_character: Some(range.end.character),
                kind: Some(match fold.kind {
                    jls_ide::FoldKind::Braces => lsp_types::FoldingRangeKind::Region,
                    jls_ide::FoldKind::Imports => lsp_types::FoldingRangeKind::Imports,
                    jls_ide::FoldKind::Comment => lsp_types::FoldingRangeKind::Comment,
                }),
                collapsed_text: None,
            }
        })
        .collect();
    Ok(Some(ranges))
}

fn handle_inlay_hint(connection: &Connection, state: &mut WorldState, params: lsp_types::InlayHintParams) -> anyhow::Result<Option<Vec<lsp_types::InlayHint>>> {
    if !state.config.features.inlay_hints {
        return Ok(None);
    }
    let task = ensure_compiled(connection, state)?;
    let path = convert::uri_to_path(&params.text_document.uri)?;
    let Some(file) = state.files.file_id(&path) else { return Ok(None) };
    let text = state.files.contents(file)?;
    let index = jls_core::LineIndex::new(&text);
    let hints = jls_ide::inlay_hints(&task, file)
        .into_iter()
        .map(|hint| lsp_types::InlayHint {
            position: convert::lsp_range(&index, &text, jls_core::TextRange::new(hint.position, hint.position)).start,
            label: lsp_types::InlayHintLabel::String(hint.label),
            kind: Some(lsp_types::InlayHintKind::PARAMETER),
            text_edits: None,
            tooltip: None,
            padding_left: None,
            padding_right: Some(true),
            data: None,
        })
        .collect();
    Ok(Some(hints))
}

fn handle_document_symbol(connection: &Connection, state: &mut WorldState, params: lsp_types::DocumentSymbolParams) -> anyhow::Result<Option<lsp_types::DocumentSymbolResponse>> {
    let task = ensure_compiled(connection, state)?;
    let path = convert::uri_to_path(&params.text_document.uri)?;
    let Some(file) = state.files.file_id(&path) else { return Ok(None) };
    let text = state.files.contents(file)?;
    let index = jls_core::LineIndex::new(&text);
    let symbols = jls_ide::document_symbols(&task, file).into_iter().map(|sym| to_lsp_document_symbol(&index, &text, sym)).collect();
    Ok(Some(lsp_types::DocumentSymbolResponse::Nested(symbols)))
}

fn to_lsp_document_symbol(index: &jls_core::LineIndex, text: &str, sym: jls_ide::DocumentSymbol) -> lsp_types::DocumentSymbol {
    lsp_types::DocumentSymbol {
        name: sym.name,
        detail: None,
        kind: symbol_kind(sym.kind),
        tags: None,
        deprecated: None,
        range: convert::lsp_range(index, text, sym.range),
        selection_range: convert::lsp_range(index, text, sym.selection_range),
        children: if sym.children.is_empty() { None } else { Some(sym.children.into_iter().map(|c| to_lsp_document_symbol(index, text, c)).collect()) },
    }
}

fn symbol_kind(kind: jls_ide::SymbolKind) -> lsp_types::SymbolKind {
    match kind {
        jls_ide::SymbolKind::Class => lsp_types::SymbolKind::CLASS,
        jls_ide::SymbolKind::Interface => lsp_types::SymbolKind::INTERFACE,
        jls_ide::SymbolKind::Enum => lsp_types::SymbolKind::ENUM,
        jls_ide::SymbolKind::Record => lsp_types::SymbolKind::STRUCT,
        jls_ide::SymbolKind::Method => lsp_types::SymbolKind::METHOD,
        jls_ide::SymbolKind::Field => lsp_types::SymbolKind::FIELD,
    }
}

fn handle_workspace_symbol(connection: &Connection, state: &mut WorldState, params: lsp_types::WorkspaceSymbolParams) -> anyhow::Result<Option<Vec<lsp_types::SymbolInformation>>> {
    let task = ensure_compiled(connection, state)?;
    let symbols = jls_ide::workspace_symbols(&task, &params.query)
        .into_iter()
        .filter_map(|sym| {
            let path = task.path_of(sym.file)?;
            let text = state.files.contents(sym.file).ok()?;
            let index = jls_core::LineIndex::new(&text);
            let uri = convert::path_to_uri(path).ok()?;
            Some(lsp_types::SymbolInformation {
                name: sym.name,
                kind: symbol_kind(sym.kind),
                tags: None,
                deprecated: None,
                location: lsp_types::Location { uri, range: convert::lsp_range(&index, &text, sym.range) },
                container_name: None,
            })
        })
        .collect();
    Ok(Some(symbols))
}

fn handle_formatting(state: &mut WorldState, params: lsp_types::DocumentFormattingParams) -> anyhow::Result<Option<Vec<lsp_types::TextEdit>>> {
    let path = convert::uri_to_path(&params.text_document.uri)?;
    let Some(file) = state.files.file_id(&path) else { return Ok(None) };
    let text = state.files.contents(file)?;
    let index = jls_core::LineIndex::new(&text);
    let edits = jls_ide::format_document(&text);
    Ok(Some(convert::file_edits_to_lsp(&index, &text, &edits)))
}

fn handle_semantic_tokens(state: &mut WorldState, params: lsp_types::SemanticTokensParams) -> anyhow::Result<Option<lsp_types::SemanticTokensResult>> {
    if !state.config.features.semantic_tokens {
        return Ok(None);
    }
    let path = convert::uri_to_path(&params.text_document.uri)?;
    let Some(file) = state.files.file_id(&path) else { return Ok(None) };
    let text = state.files.contents(file)?;
    let tokens = jls_ide::semantic_tokens(&text)
        .into_iter()
        .map(|t| lsp_types::SemanticToken { delta_line: t.delta_line, delta_start: t.delta_start, length: t.length, token_type: convert::semantic_token_type_index(t.token_type), token_modifiers_bitset: t.token_modifiers })
        .collect();
    Ok(Some(lsp_types::SemanticTokensResult::Tokens(lsp_types::SemanticTokens { result_id: None, data: tokens })))
}

fn handle_signature_help(connection: &Connection, state: &mut WorldState, params: lsp_types::SignatureHelpParams) -> anyhow::Result<Option<lsp_types::SignatureHelp>> {
    let task = ensure_compiled(connection, state)?;
    let (file, offset, _text) = resolve_position(state, &task, &params.text_document_position_params.text_document.uri, params.text_document_position_params.position)?;
    let Some(info) = jls_ide::signature_help(&task, file, offset) else { return Ok(None) };
    Ok(Some(lsp_types::SignatureHelp {
        signatures: vec![lsp_types::SignatureInformation {
            label: info.label,
            documentation: None,
            parameters: Some(info.params.into_iter().map(|p| lsp_types::ParameterInformation { label: lsp_types::ParameterLabel::Simple(p), documentation: None }).collect()),
            active_parameter: Some(info.active_param as u32),
        }],
        active_signature: Some(0),
        active_parameter: Some(info.active_param as u32),
    }))
}

/// Resolves a `textDocument`/`position` pair to a file tracked by this
/// compile task, reading its current on-disk text to turn the wire position
/// into a byte offset.
fn resolve_position(state: &mut WorldState, _task: &jls_db::CompileTask, uri: &lsp_types::Uri, position: lsp_types::Position) -> anyhow::Result<(FileId, TextSize, String)> {
    let path = convert::uri_to_path(uri)?;
    let file = state.files.file_id(&path).ok_or_else(|| anyhow::anyhow!("unknown document: {}", path.display()))?;
    let text = state.files.contents(file)?;
    let index = jls_core::LineIndex::new(&text);
    let offset = convert::offset_of(&index, &text, position).ok_or_else(|| anyhow::anyhow!("position out of range"))?;
    Ok((file, offset, text))
}

fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with no message".to_string())
    })
}

fn send_error(connection: &Connection, id: RequestId, code: ErrorCode, message: String) {
    send(connection, Message::Response(Response::new_err(id, code as i32, message)));
}

fn notify<P: Serialize>(connection: &Connection, method: &str, params: P) {
    send(connection, Message::Notification(Notification::new(method.to_string(), params)));
}

fn send(connection: &Connection, message: Message) {
    if connection.sender.send(message).is_err() {
        tracing::warn!("failed to send message: client channel closed");
    }
}
