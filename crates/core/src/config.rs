use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::registrant::RegistrantType;
use crate::pagination::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub workbench: WorkbenchConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WorkbenchConfig {
    pub page_size: u32,
    pub default_registrant_type: RegistrantType,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub api_auth_token: Option<String>,
    pub page_size: Option<u32>,
    pub registrant_type: Option<RegistrantType>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.india.ambuvians.in".to_string(),
                auth_token: None,
                timeout_secs: 30,
            },
            workbench: WorkbenchConfig {
                page_size: DEFAULT_PAGE_SIZE,
                default_registrant_type: RegistrantType::Driver,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    workbench: Option<WorkbenchPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    base_url: Option<String>,
    auth_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WorkbenchPatch {
    page_size: Option<u32>,
    default_registrant_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<String>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("kycdesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(auth_token) = api.auth_token {
                self.api.auth_token = Some(auth_token.into());
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = timeout_secs;
            }
        }

        if let Some(workbench) = patch.workbench {
            if let Some(page_size) = workbench.page_size {
                self.workbench.page_size = page_size;
            }
            if let Some(raw) = workbench.default_registrant_type {
                self.workbench.default_registrant_type =
                    RegistrantType::parse(&raw).ok_or_else(|| {
                        ConfigError::Validation(format!(
                            "unsupported registrant type `{raw}` (expected DRIVER|FLEET_OWNER)"
                        ))
                    })?;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format.parse()?;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("KYCDESK_API_BASE_URL") {
            self.api.base_url = value;
        }
        if let Some(value) = read_env("KYCDESK_API_AUTH_TOKEN") {
            self.api.auth_token = Some(value.into());
        }
        if let Some(value) = read_env("KYCDESK_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_u64("KYCDESK_API_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("KYCDESK_PAGE_SIZE") {
            self.workbench.page_size = parse_u32("KYCDESK_PAGE_SIZE", &value)?;
        }
        if let Some(value) = read_env("KYCDESK_REGISTRANT_TYPE") {
            self.workbench.default_registrant_type =
                RegistrantType::parse(&value).ok_or(ConfigError::InvalidEnvOverride {
                    key: "KYCDESK_REGISTRANT_TYPE".to_string(),
                    value,
                })?;
        }
        if let Some(value) = read_env("KYCDESK_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("KYCDESK_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.api_base_url {
            self.api.base_url = base_url;
        }
        if let Some(auth_token) = overrides.api_auth_token {
            self.api.auth_token = Some(auth_token.into());
        }
        if let Some(page_size) = overrides.page_size {
            self.workbench.page_size = page_size;
        }
        if let Some(registrant_type) = overrides.registrant_type {
            self.workbench.default_registrant_type = registrant_type;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("api.base_url must not be empty".to_string()));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be an http(s) URL, got `{}`",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("api.timeout_secs must be at least 1".to_string()));
        }
        if self.workbench.page_size == 0 {
            return Err(ConfigError::Validation(
                "workbench.page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    let default = PathBuf::from("kycdesk.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
