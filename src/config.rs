use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::appender::HeaderMode;
use crate::error::ConfigError;

/// Environment variable naming the secrets file
pub const SECRETS_ENV: &str = "GRANT_FINDER_SECRETS";
const DEFAULT_SECRETS_PATH: &str = "secrets.toml";

/// Everything the application needs from outside the process
///
/// Loaded once at startup and handed to the components that need it.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Google service account key, field for field
    pub gcp_service_account: toml::Table,
    pub gmail: MailConfig,
    pub sheet: SheetConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub sender: String,
    pub recipient: String,
    pub app_password: String,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default)]
    pub header_mode: HeaderMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Upper bound for any single call to an external service
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from the secrets file
    ///
    /// A `.env` file is read first if present, then the path is taken from
    /// `GRANT_FINDER_SECRETS`, falling back to `secrets.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let path = std::env::var(SECRETS_ENV).unwrap_or_else(|_| DEFAULT_SECRETS_PATH.to_string());
        Self::from_path(path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            (&self.gmail.sender, "gmail.sender"),
            (&self.gmail.recipient, "gmail.recipient"),
            (&self.gmail.app_password, "gmail.app_password"),
            (&self.sheet.spreadsheet_id, "sheet.spreadsheet_id"),
            (&self.sheet.sheet_name, "sheet.sheet_name"),
        ];
        for (value, name) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }
        if self.gcp_service_account.is_empty() {
            return Err(ConfigError::Missing("gcp_service_account"));
        }
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "server.timeout_secs",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// The service account key as the JSON document Google issues
    pub fn service_account_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(&self.gcp_service_account)
            .map_err(|e| ConfigError::ServiceAccount(e.to_string()))
    }
}
