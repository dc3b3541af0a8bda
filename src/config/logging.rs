use serde::Deserialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingStyle {
    #[default]
    Compact,
    Full,
    Json,
}

#[derive(Debug, Default, Deserialize)]
pub struct Logging {
    /// **Environment variables**:
    /// - `VENUEHUB_LOGGING_STYLE`
    #[serde(default)]
    pub style: LoggingStyle,
    /// Filter directives in `RUST_LOG` syntax. `RUST_LOG` itself wins
    /// when both are set.
    ///
    /// **Environment variables**:
    /// - `VENUEHUB_LOGGING_TARGETS`
    #[serde(default)]
    pub targets: Option<String>,
}
