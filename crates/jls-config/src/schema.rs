use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::JlsConfig;

/// JSON Schema for `initializationOptions`/`workspace/didChangeConfiguration`
/// payloads (spec.md §6), published for editor tooling.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(JlsConfig)
}
