use std::path::PathBuf;
use thiserror::Error;

/// Failure to write grants to the remote spreadsheet
#[derive(Debug, Error)]
pub enum AppendError {
    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("append rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid response: {0}")]
    Response(String),
}

/// Failure to deliver the report email
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

/// Failure to load startup configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid secrets file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required config: {0}")]
    Missing(&'static str),

    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid service account credentials: {0}")]
    ServiceAccount(String),
}
