//! Editor-facing request providers (spec.md §4.5, §4.5a): pure functions
//! from a [`jls_db::CompileTask`] (plus, for a few syntax-only providers, raw
//! source text) to the answer for one LSP request. Nothing here talks to an
//! editor directly — `jls-lsp` owns the wire protocol and calls into these.

pub mod code_actions;
pub mod code_lens;
pub mod completion;
pub mod definition;
pub mod diagnostics;
pub mod element_ext;
pub mod folding;
pub mod formatting;
pub mod hover;
pub mod inlay_hints;
pub mod references;
pub mod rename;
pub mod resolve_ctx;
pub mod semantic_tokens;
pub mod signature_help;
pub mod symbols;
pub mod syntax_util;

pub use code_actions::{code_actions_for_diagnostics, generate_constructor, CodeAction};
pub use code_lens::{code_lenses, CodeLens};
pub use completion::{complete, CompletionItem, CompletionItemKind};
pub use definition::definition;
pub use diagnostics::lint;
pub use folding::{folding_ranges, FoldKind, FoldingRange};
pub use formatting::format_document;
pub use hover::{hover, HoverInfo};
pub use inlay_hints::{inlay_hints, InlayHint};
pub use references::find_references;
pub use rename::{prepare_rename, rename, PrepareRenameResult};
pub use semantic_tokens::{semantic_tokens, SemanticToken, TokenType};
pub use signature_help::{signature_help, SignatureInfo};
pub use symbols::{document_symbols, workspace_symbols, DocumentSymbol, SymbolKind, WorkspaceSymbol};
