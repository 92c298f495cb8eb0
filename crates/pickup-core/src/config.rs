use crate::error::{PickupError, Result};
use crate::paths;
use crate::reminder::{DEFAULT_COUNTRY_CODE, DEFAULT_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    JsonFile {
        #[serde(default = "default_data_path")]
        path: PathBuf,
    },
    Sheets {
        spreadsheet_id: String,
        #[serde(default = "default_token_env")]
        token_env: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
}

fn default_data_path() -> PathBuf {
    PathBuf::from(paths::DATA_FILE)
}

fn default_token_env() -> String {
    "PICKUP_SHEETS_TOKEN".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::JsonFile {
            path: default_data_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_password_env")]
    pub password_env: String,
    /// Used when the environment variable is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// When true, guests may book slots; clearing stays admin-only.
    #[serde(default = "default_true")]
    pub self_service_signup: bool,
}

fn default_password_env() -> String {
    "PICKUP_ADMIN_PASSWORD".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_env: default_password_env(),
            password: None,
            self_service_signup: true,
        }
    }
}

impl AuthConfig {
    pub fn admin_secret(&self) -> Option<String> {
        std::env::var(&self.password_env)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.password.clone().filter(|s| !s.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// SessionConfig / NotifyConfig / ReminderConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Drop admin the first time a session is used on a new calendar day.
    #[serde(default)]
    pub daily_reset: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            admin_webhook_url: None,
            person_webhook_url: None,
            app_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn is_enabled(&self) -> bool {
        self.admin_webhook_url.is_some() || self.person_webhook_url.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            template: default_template(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
            session: SessionConfig::default(),
            notify: NotifyConfig::default(),
            reminder: ReminderConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(PickupError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let StorageConfig::Sheets {
            spreadsheet_id,
            token_env,
            ..
        } = &self.storage
        {
            if spreadsheet_id.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "storage.spreadsheet_id is empty".to_string(),
                });
            }
            if std::env::var(token_env).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("sheets token variable '{token_env}' is not set"),
                });
            }
        }

        if self.auth.admin_secret().is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "no admin password: set {} or auth.password",
                    self.auth.password_env
                ),
            });
        }

        for (key, url) in [
            ("notify.admin_webhook_url", &self.notify.admin_webhook_url),
            ("notify.person_webhook_url", &self.notify.person_webhook_url),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!("{key} '{url}' is not an http(s) URL"),
                    });
                }
            }
        }

        let code = &self.reminder.country_code;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("reminder.country_code '{code}' must be digits only"),
            });
        }
        if !self.reminder.template.contains("{name}") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "reminder.template has no {name} placeholder".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
