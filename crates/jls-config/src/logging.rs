//! Global logging settings (ambient — not a spec.md-named config key, but
//! `tracing`/`tracing-subscriber` are this corpus's standard logging stack,
//! so the config crate publishes the knobs for it the way the teacher does).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`trace`/`debug`/`info`/`warn`/`error`) or a full
    /// `tracing_subscriber::EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines instead of the default human-readable format.
    #[serde(default)]
    pub json: bool,

    /// LSP `trace.server` verbosity (`off`/`messages`/`verbose`), controlling
    /// whether raw JSON-RPC traffic is logged.
    #[serde(default)]
    pub trace_server: Option<String>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::default().add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()))
    }

    /// The effective `EnvFilter`, merging `RUST_LOG` over the configured
    /// level when both are present.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG").ok().map(|value| value.trim().to_owned()).filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined).or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives)).unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: Self::default_level(), json: false, trace_server: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_warning_synonym() {
        assert_eq!(LoggingConfig::normalize_level_directives("WARNING"), "warn");
    }

    #[test]
    fn passes_through_directive_strings_unchanged() {
        assert_eq!(LoggingConfig::normalize_level_directives("jls_resolve=debug"), "jls_resolve=debug");
    }

    #[test]
    fn empty_level_falls_back_to_info() {
        assert_eq!(LoggingConfig::normalize_level_directives("   "), "info");
    }
}
