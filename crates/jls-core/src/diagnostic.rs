//! Diagnostics primitives shared by the compiler façade and every provider.

use crate::{FileId, TextRange};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Location {
    pub file: FileId,
    pub range: TextRange,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RelatedDiagnostic {
    pub location: Location,
    pub message: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Diagnostic {
    pub range: TextRange,
    pub severity: Severity,
    /// A stable code (e.g. `unused_import`) so code actions can be attached
    /// by identity rather than by matching message text.
    pub code: Option<String>,
    pub message: String,
    pub related: Vec<RelatedDiagnostic>,
}

impl Diagnostic {
    pub fn new(range: TextRange, severity: Severity, message: impl Into<String>) -> Self {
        Self { range, severity, code: None, message: message.into(), related: Vec::new() }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn add_related(&mut self, location: Location, message: impl Into<String>) {
        self.related.push(RelatedDiagnostic { location, message: message.into() });
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Sort key matching spec.md §4.5: `(severity, line, column)`. Callers sort
/// with a `LineIndex` already available to translate `range.start()` into a
/// line/column before comparing, since `TextRange` alone only orders by byte
/// offset (which agrees with line/column order for a single file, but the
/// explicit key keeps the ordering intention legible at call sites).
pub fn diagnostic_sort_key(d: &Diagnostic) -> (u8, u32, u32) {
    let severity_rank = match d.severity {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
        Severity::Hint => 3,
    };
    (severity_rank, u32::from(d.range.start()), u32::from(d.range.end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_orders_errors_before_warnings() {
        let err = Diagnostic::new(TextRange::new(10.into(), 10.into()), Severity::Error, "e");
        let warn = Diagnostic::new(TextRange::new(0.into(), 0.into()), Severity::Warning, "w");
        let mut diags = vec![warn.clone(), err.clone()];
        diags.sort_by_key(diagnostic_sort_key);
        assert_eq!(diags[0].severity, Severity::Error);
    }
}
