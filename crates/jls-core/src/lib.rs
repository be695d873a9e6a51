//! Shared types for the Java language server core: identifiers, text
//! positions, paths/URIs, diagnostics, and text edits.
//!
//! Kept dependency-light on purpose: every other crate in the workspace
//! depends on this one, so anything heavy here is a tax paid everywhere.

mod diagnostic;
mod edit;
mod ids;
mod name;
mod path;
mod text;

pub use diagnostic::{Diagnostic, Location, RelatedDiagnostic, Severity};
pub use edit::{EditError, TextEdit, WorkspaceEdit};
pub use ids::{ClassId, FileId, PackageName, QualifiedName, TypeName};
pub use name::{InternedName, Name, NameInterner};
pub use path::{
    file_uri_to_path, path_to_file_uri, AbsPathBuf, AbsPathError, PathToUriError, UriToPathError,
};
pub use text::{LineCol, LineIndex, Position, Range, TextRange, TextSize};

#[cfg(feature = "lsp")]
pub use path::{lsp_uri_to_path, path_to_lsp_uri};

/// Recursively collect files under `root` with the given `extension`.
///
/// Missing directories are treated as empty rather than an error, since
/// callers frequently scan optional source roots.
pub fn collect_files_with_extension(
    root: &std::path::Path,
    extension: &str,
) -> std::io::Result<Vec<std::path::PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err),
        };

        for entry in entries {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();

            if file_type.is_symlink() {
                continue;
            }

            if file_type.is_dir() {
                if is_excluded_dir_name(&entry.file_name()) {
                    continue;
                }
                pending.push(path);
                continue;
            }

            if file_type.is_file() && path.extension().is_some_and(|ext| ext == extension) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Directory names excluded from workspace file discovery (spec.md §3).
pub const EXCLUDED_DIR_NAMES: &[&str] = &[
    ".git",
    ".idea",
    ".gradle",
    "node_modules",
    "target",
    "build",
    "dist",
    "out",
];

pub fn is_excluded_dir_name(name: &std::ffi::OsStr) -> bool {
    EXCLUDED_DIR_NAMES.iter().any(|excluded| name == *excluded)
}

/// Whether `c` can start a Java identifier, per `Character.isJavaIdentifierStart`.
#[inline]
pub fn is_java_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

/// Whether `c` can continue a Java identifier, per `Character.isJavaIdentifierPart`.
#[inline]
pub fn is_java_identifier_part(c: char) -> bool {
    is_java_identifier_start(c) || c.is_ascii_digit() || c.is_numeric()
}

/// Lexically tokenize `text` into the set of maximal Java-identifier runs it
/// contains, character-class based (spec.md §3 Token Index Entry). No
/// semantic analysis, no deduplication by the caller needed — this already
/// returns a de-duplicated set per call is left to the caller since
/// lightweight callers may prefer to stream tokens without allocating a set.
pub fn lex_identifiers(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let rest = &text[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };
        if is_java_identifier_start(c) {
            let start = i;
            let mut j = i + c.len_utf8();
            while j < bytes.len() {
                let Some(c2) = text[j..].chars().next() else {
                    break;
                };
                if !is_java_identifier_part(c2) {
                    break;
                }
                j += c2.len_utf8();
            }
            out.push(&text[start..j]);
            i = j;
        } else {
            i += c.len_utf8();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_identifiers_skips_punctuation() {
        let tokens = lex_identifiers("class Foo$Bar { int x_1 = 0; }");
        assert_eq!(tokens, vec!["class", "Foo$Bar", "int", "x_1"]);
    }

    #[test]
    fn lex_identifiers_counts_duplicates() {
        // Callers that need a set should dedup themselves; the lexer just reports
        // every occurrence so indexes can decide.
        let tokens = lex_identifiers("a a a");
        assert_eq!(tokens, vec!["a", "a", "a"]);
    }
}
