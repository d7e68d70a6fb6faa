//! Configuration loading and validation errors.

/// Errors raised while loading deployment configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {name}")]
    MissingVariable { name: &'static str },

    #[error("invalid address in {name}: {value}")]
    InvalidAddress { name: String, value: String },

    #[error("unknown network: {network}")]
    UnknownNetwork { network: String },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
