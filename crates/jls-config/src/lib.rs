//! Configuration keys accepted in `initializationOptions` and
//! `workspace/didChangeConfiguration`, nested under either `jls` or `java`
//! (spec.md §6), plus the ambient logging/schema/validation machinery that
//! goes with any config crate in this corpus.

mod diagnostics;
mod logging;
mod schema;
mod validation;

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use diagnostics::{ConfigDiagnostics, ConfigValidationError, ConfigWarning, ValidationDiagnostics};
pub use logging::LoggingConfig;
pub use schema::json_schema;
pub use validation::ConfigValidationContext;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path} as TOML: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("config file {path} could not be converted to JSON: {source}")]
    Convert { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverityOverride {
    Off,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Master switch for `textDocument/publishDiagnostics` (spec.md §6
    /// `diagnostics.enable`).
    #[serde(default = "default_diagnostics_enable")]
    pub enable: bool,

    /// Severity for the unused-import diagnostic.
    #[serde(default = "default_unused_imports")]
    pub unused_imports: DiagnosticSeverityOverride,
}

fn default_diagnostics_enable() -> bool {
    true
}

fn default_unused_imports() -> DiagnosticSeverityOverride {
    DiagnosticSeverityOverride::Warning
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { enable: default_diagnostics_enable(), unused_imports: default_unused_imports() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(deny_unknown_fields)]
pub struct FeaturesConfig {
    /// Whether to advertise/serve `textDocument/inlayHint`.
    #[serde(default = "default_feature_enabled")]
    pub inlay_hints: bool,

    /// Whether to advertise/serve `textDocument/semanticTokens`.
    #[serde(default = "default_feature_enabled")]
    pub semantic_tokens: bool,
}

fn default_feature_enabled() -> bool {
    true
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self { inlay_hints: default_feature_enabled(), semantic_tokens: default_feature_enabled() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct GenerateConstructorConfig {
    /// Regex patterns; only fields whose name matches at least one pattern
    /// are offered in the generated constructor (empty = no filter, include
    /// every field).
    #[serde(default)]
    pub include: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(deny_unknown_fields)]
pub struct CodeActionsConfig {
    #[serde(default)]
    pub generate_constructor: GenerateConstructorConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct CacheConfig {
    /// Overrides the cache directory (spec.md §6 `cache.dir`); otherwise
    /// `jls-cache` resolves it from `$XDG_CACHE_HOME`/`$HOME/.cache`.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Resolves (and creates) the cache root for `workspace_root`, honoring
    /// this config's `dir` override (spec.md §6 `cache.dir`).
    pub fn resolve_root(&self, workspace_root: &std::path::Path) -> Result<PathBuf, jls_cache::CacheDirError> {
        jls_cache::cache_root_for_workspace(workspace_root, self.dir.as_deref())
    }
}

fn default_import_order() -> String {
    "java,javax,*,static".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(deny_unknown_fields)]
/// Every configuration key spec.md §6 lists, nested under either `jls` or
/// `java` in `initializationOptions`.
///
/// ```json
/// {
///   "jls": {
///     "classPath": ["/abs/path/to/lib.jar"],
///     "diagnostics": { "enable": true, "unusedImports": "warning" },
///     "cache": { "dir": "/tmp/jls-cache" }
///   }
/// }
/// ```
pub struct JlsConfig {
    /// Explicit classpath; bypasses build-tool inference entirely.
    #[serde(default)]
    pub class_path: Vec<String>,

    /// Explicit sources/javadoc jars.
    #[serde(default)]
    pub doc_path: Vec<String>,

    /// Coordinates (`g:a:[packaging:[classifier:]]v[:scope]`) resolved from
    /// local Maven/Gradle caches.
    #[serde(default)]
    pub external_dependencies: Vec<String>,

    /// Forwarded to the compiler as `--add-exports …=ALL-UNNAMED`.
    #[serde(default)]
    pub add_exports: Vec<String>,

    /// Maven user settings file.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub maven_settings: Option<PathBuf>,

    /// Name of the auto-import ordering strategy.
    #[serde(default = "default_import_order")]
    pub import_order: String,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    #[serde(default)]
    pub features: FeaturesConfig,

    #[serde(default)]
    pub code_actions: CodeActionsConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for JlsConfig {
    fn default() -> Self {
        Self {
            class_path: Vec::new(),
            doc_path: Vec::new(),
            external_dependencies: Vec::new(),
            add_exports: Vec::new(),
            maven_settings: None,
            import_order: default_import_order(),
            diagnostics: DiagnosticsConfig::default(),
            features: FeaturesConfig::default(),
            code_actions: CodeActionsConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl JlsConfig {
    /// Loads config from an `initializationOptions`/
    /// `workspace/didChangeConfiguration` payload. spec.md §6 allows either
    /// a `jls` or `java` top-level section; `jls` wins if both are present.
    /// A payload with neither section (as sent by some clients that scope
    /// the whole params object to one section already) is treated as the
    /// section body itself.
    pub fn from_init_options(options: &serde_json::Value) -> (Self, ConfigDiagnostics) {
        let section = options.get("jls").or_else(|| options.get("java")).unwrap_or(options);
        Self::from_value(section.clone())
    }

    /// Loads config from a `jls.toml` file in the workspace root, for users
    /// who'd rather commit their settings than configure them per-editor.
    /// Not spec.md-mandated; `initializationOptions` always takes precedence
    /// when both are present (callers merge by calling this first and then
    /// layering [`JlsConfig::from_init_options`] on top of the result, field
    /// by field, if desired).
    pub fn from_toml_file(path: &std::path::Path) -> Result<(Self, ConfigDiagnostics), ConfigFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read { path: path.to_path_buf(), source })?;
        let value: toml::Value = toml::from_str(&text).map_err(|source| ConfigFileError::Parse { path: path.to_path_buf(), source })?;
        let json = serde_json::to_value(value).map_err(|source| ConfigFileError::Convert { path: path.to_path_buf(), source })?;
        Ok(Self::from_value(json))
    }

    fn from_value(value: serde_json::Value) -> (Self, ConfigDiagnostics) {
        let mut unknown = Vec::new();
        let config = match serde_ignored::deserialize(value, |path| unknown.push(diagnostics::normalize_ignored_path(path))) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse configuration; falling back to defaults");
                Self::default()
            }
        };
        unknown.sort();
        unknown.dedup();

        let mut diagnostics = ConfigDiagnostics { unknown_keys: unknown, ..ConfigDiagnostics::default() };
        diagnostics.extend_validation(config.validate());
        (config, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_spec_defaults() {
        let config = JlsConfig::default();
        assert!(config.diagnostics.enable);
        assert_eq!(config.diagnostics.unused_imports, DiagnosticSeverityOverride::Warning);
        assert!(config.features.inlay_hints);
        assert!(config.cache.dir.is_none());
    }

    #[test]
    fn jls_section_wins_over_java_section() {
        let options = json!({
            "jls": { "importOrder": "from-jls" },
            "java": { "importOrder": "from-java" },
        });
        let (config, _) = JlsConfig::from_init_options(&options);
        assert_eq!(config.import_order, "from-jls");
    }

    #[test]
    fn falls_back_to_java_section_when_jls_is_absent() {
        let options = json!({ "java": { "importOrder": "from-java" } });
        let (config, _) = JlsConfig::from_init_options(&options);
        assert_eq!(config.import_order, "from-java");
    }

    #[test]
    fn unknown_keys_are_collected_with_full_path() {
        let options = json!({ "jls": { "diagnostics": { "enable": true, "unusedImportss": "error" } } });
        let (_, diags) = JlsConfig::from_init_options(&options);
        assert_eq!(diags.unknown_keys, vec!["diagnostics.unusedImportss"]);
    }

    #[test]
    fn camel_case_keys_deserialize_into_snake_case_fields() {
        let options = json!({ "jls": { "classPath": ["/a.jar"], "docPath": ["/a-sources.jar"] } });
        let (config, _) = JlsConfig::from_init_options(&options);
        assert_eq!(config.class_path, vec!["/a.jar".to_string()]);
        assert_eq!(config.doc_path, vec!["/a-sources.jar".to_string()]);
    }

    #[test]
    fn loads_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jls.toml");
        std::fs::write(&path, "importOrder = \"custom\"\n\n[diagnostics]\nenable = false\n").unwrap();

        let (config, diags) = JlsConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.import_order, "custom");
        assert!(!config.diagnostics.enable);
        assert!(diags.unknown_keys.is_empty());
    }

    #[test]
    fn cache_config_resolves_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        let override_dir = dir.path().join("cache-override");
        let config = CacheConfig { dir: Some(override_dir.clone()) };
        let root = config.resolve_root(dir.path()).unwrap();
        assert_eq!(root, override_dir);
    }
}
