//! jls-core/jls-ide value <-> `lsp_types` wire value conversions. Kept in
//! one place so no provider ever has to know `lsp_types` exists (spec.md
//! §4.5/§4.5a: providers speak `jls_core`, the dispatcher speaks LSP).

use std::path::Path;

use jls_core::{AbsPathBuf, Diagnostic, FileId, LineIndex, Location, Severity, TextEdit, TextRange, TextSize, WorkspaceEdit};

pub fn path_to_uri(path: &Path) -> anyhow::Result<lsp_types::Uri> {
    let abs = AbsPathBuf::new(path.to_path_buf())?;
    Ok(jls_core::path_to_lsp_uri(&abs)?)
}

pub fn uri_to_path(uri: &lsp_types::Uri) -> anyhow::Result<std::path::PathBuf> {
    Ok(jls_core::lsp_uri_to_path(uri)?.into_path_buf())
}

pub fn offset_of(index: &LineIndex, text: &str, position: lsp_types::Position) -> Option<TextSize> {
    index.offset_of_position(text, jls_core::Position::from(position))
}

pub fn lsp_range(index: &LineIndex, text: &str, range: TextRange) -> lsp_types::Range {
    index.range(text, range).into()
}

pub fn text_edit(index: &LineIndex, text: &str, edit: &TextEdit) -> lsp_types::TextEdit {
    lsp_types::TextEdit { range: lsp_range(index, text, edit.range), new_text: edit.replacement.clone() }
}

pub fn severity(severity: Severity) -> lsp_types::DiagnosticSeverity {
    match severity {
        Severity::Error => lsp_types::DiagnosticSeverity::ERROR,
        Severity::Warning => lsp_types::DiagnosticSeverity::WARNING,
        Severity::Info => lsp_types::DiagnosticSeverity::INFORMATION,
        Severity::Hint => lsp_types::DiagnosticSeverity::HINT,
    }
}

pub fn diagnostic(index: &LineIndex, text: &str, d: &Diagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: lsp_range(index, text, d.range),
        severity: Some(severity(d.severity)),
        code: d.code.clone().map(lsp_types::NumberOrString::String),
        code_description: None,
        source: Some("jls".to_string()),
        message: d.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Looks up a [`Location`]'s containing file path and converts it into an
/// LSP location, skipping it rather than failing the whole response if the
/// path or its text has since disappeared (spec.md §7: a provider surfaces
/// partial results, not a hard error, when one referenced file goes away).
pub fn location(task: &jls_db::CompileTask, loc: &Location) -> Option<lsp_types::Location> {
    let path = task.path_of(loc.file)?;
    let text = std::fs::read_to_string(path).ok()?;
    let index = LineIndex::new(&text);
    let uri = path_to_uri(path).ok()?;
    Some(lsp_types::Location { uri, range: lsp_range(&index, &text, loc.range) })
}

pub fn workspace_edit(task: &jls_db::CompileTask, edit: &WorkspaceEdit) -> lsp_types::WorkspaceEdit {
    let mut changes = std::collections::HashMap::new();
    for (file, edits) in &edit.changes {
        let Some(path) = task.path_of(*file) else { continue };
        let Ok(text) = std::fs::read_to_string(path) else { continue };
        let index = LineIndex::new(&text);
        let Ok(uri) = path_to_uri(path) else { continue };
        changes.insert(uri, edits.iter().map(|e| text_edit(&index, &text, e)).collect());
    }
    lsp_types::WorkspaceEdit { changes: Some(changes), document_changes: None, change_annotations: None }
}

pub fn file_edits_to_lsp(index: &LineIndex, text: &str, edits: &[TextEdit]) -> Vec<lsp_types::TextEdit> {
    edits.iter().map(|e| text_edit(index, text, e)).collect()
}

/// Order here is the wire legend: a [`jls_ide::TokenType`]'s LSP token-type
/// index is its position in this list.
pub fn semantic_token_legend() -> lsp_types::SemanticTokensLegend {
    lsp_types::SemanticTokensLegend {
        token_types: vec![
            lsp_types::SemanticTokenType::KEYWORD,
            lsp_types::SemanticTokenType::VARIABLE,
            lsp_types::SemanticTokenType::COMMENT,
            lsp_types::SemanticTokenType::STRING,
            lsp_types::SemanticTokenType::NUMBER,
            lsp_types::SemanticTokenType::OPERATOR,
        ],
        token_modifiers: Vec::new(),
    }
}

pub fn semantic_token_type_index(token_type: jls_ide::TokenType) -> u32 {
    match token_type {
        jls_ide::TokenType::Keyword => 0,
        jls_ide::TokenType::Identifier => 1,
        jls_ide::TokenType::Comment => 2,
        jls_ide::TokenType::String => 3,
        jls_ide::TokenType::Number => 4,
        jls_ide::TokenType::Operator => 5,
    }
}

pub fn file_id_for_uri(files: &mut jls_vfs::FileStore, uri: &lsp_types::Uri) -> anyhow::Result<FileId> {
    let path = uri_to_path(uri)?;
    if let Some(id) = files.file_id(&path) {
        return Ok(id);
    }
    Ok(files.external_create(path)?)
}
