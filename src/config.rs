use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Server settings supplied by the client, re-read at the start of every
/// completion request so reconfiguration takes effect without a restart.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Identifier names treated as aliases for `this` when locally bound,
    /// following the `var self = this;` convention.
    pub this_var_names: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            this_var_names: vec![
                "self".to_string(),
                "that".to_string(),
                "me".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Deserializes settings from client-provided JSON, accepting either the
    /// bare settings object or one nested under a `jsthis` section (the shape
    /// `workspace/didChangeConfiguration` delivers).
    pub fn from_value(value: &Value) -> Option<ServerConfig> {
        let section = value.get("jsthis").unwrap_or(value);
        match serde_json::from_value(section.clone()) {
            Ok(config) => Some(config),
            Err(err) => {
                debug!("Ignoring malformed configuration: {}", err);
                None
            }
        }
    }
}
