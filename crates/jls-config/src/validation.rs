//! Semantic config validation beyond what serde's schema alone can express
//! (spec.md §6 doesn't mandate any of this, but the teacher's config crates
//! always pair a schema with a best-effort semantic validation pass).

use std::path::Path;

use regex::Regex;

use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::JlsConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidationContext<'a> {
    /// Workspace root used to resolve `mavenSettings` when it's a relative path.
    pub workspace_root: Option<&'a Path>,
}

impl JlsConfig {
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        self.validate_with_context(ConfigValidationContext::default())
    }

    #[must_use]
    pub fn validate_with_context(&self, ctx: ConfigValidationContext<'_>) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_generate_constructor_patterns(self, &mut out);
        validate_external_dependencies(self, &mut out);
        validate_maven_settings(self, ctx, &mut out);
        validate_import_order(self, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_generate_constructor_patterns(config: &JlsConfig, out: &mut ValidationDiagnostics) {
    for pattern in &config.code_actions.generate_constructor.include {
        if let Err(err) = Regex::new(pattern) {
            out.errors.push(ConfigValidationError::InvalidGenerateConstructorPattern { pattern: pattern.clone(), message: err.to_string() });
        }
    }
}

fn validate_external_dependencies(config: &JlsConfig, out: &mut ValidationDiagnostics) {
    for coordinate in &config.external_dependencies {
        let parts: Vec<&str> = coordinate.split(':').collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            out.errors.push(ConfigValidationError::InvalidExternalDependencyCoordinate { coordinate: coordinate.clone() });
        }
    }
}

fn validate_maven_settings(config: &JlsConfig, ctx: ConfigValidationContext<'_>, out: &mut ValidationDiagnostics) {
    let Some(path) = &config.maven_settings else { return };
    let resolved = if path.is_absolute() {
        path.clone()
    } else if let Some(root) = ctx.workspace_root {
        root.join(path)
    } else {
        path.clone()
    };

    if !resolved.exists() {
        out.warnings.push(ConfigWarning::MavenSettingsNotFound { path: resolved.to_string_lossy().into_owned() });
    }
}

fn validate_import_order(config: &JlsConfig, out: &mut ValidationDiagnostics) {
    if config.import_order.trim().is_empty() {
        out.warnings.push(ConfigWarning::ImportOrderEmpty);
    }
}

fn validate_logging(config: &JlsConfig, out: &mut ValidationDiagnostics) {
    let normalized = crate::logging::LoggingConfig::normalize_level_directives(&config.logging.level);
    if config.logging.level.trim().is_empty() {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid { value: config.logging.level.clone(), normalized });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn invalid_regex_in_generate_constructor_include_is_an_error() {
        let mut config = JlsConfig::default();
        config.code_actions.generate_constructor.include.push("(unterminated".to_string());
        let diags = config.validate();
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn malformed_coordinate_is_an_error() {
        let mut config = JlsConfig::default();
        config.external_dependencies.push("not-a-coordinate".to_string());
        let diags = config.validate();
        assert!(matches!(diags.errors[0], ConfigValidationError::InvalidExternalDependencyCoordinate { .. }));
    }

    #[test]
    fn missing_maven_settings_file_is_a_warning() {
        let dir = tempdir().unwrap();
        let mut config = JlsConfig::default();
        config.maven_settings = Some(dir.path().join("missing-settings.xml"));
        let diags = config.validate();
        assert_eq!(diags.warnings.len(), 1);
    }

    #[test]
    fn default_config_validates_cleanly() {
        let diags = JlsConfig::default().validate();
        assert!(diags.errors.is_empty());
        assert!(diags.warnings.is_empty());
    }
}
