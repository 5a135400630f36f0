#[cfg(feature = "cli")]
pub mod cli;

use crate::api::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TIMEOUT_SECONDS};
use crate::core::slip::SchoolBranding;
use crate::core::ConfigProvider;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

pub const DEFAULT_OUTPUT_DIR: &str = "./slips";
pub const DEFAULT_SESSION_FILE: &str = ".school-portal-session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    pub api: ApiConfig,
    pub school: SchoolBranding,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub token: Option<String>,
    pub session_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl PortalConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML, substituting `${VAR}` with environment values first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| PortalError::config(format!("TOML parsing error: {}", e)))
    }

    /// Configuration used when no file is given.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.to_string(),
                timeout_seconds: None,
                token: None,
                session_file: None,
            },
            school: SchoolBranding {
                name: "School".to_string(),
                ..Default::default()
            },
            output: OutputConfig::default(),
            uploads: UploadConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_positive_number("api.timeout_seconds", self.timeout_seconds(), 1)?;
        validate_non_empty_string("school.name", &self.school.name)?;
        if let Some(logo) = &self.school.logo_url {
            validate_url("school.logo_url", logo)?;
        }
        validate_path("output.directory", &self.output.directory)?;
        validate_positive_number("uploads.max_file_bytes", self.max_upload_bytes(), 1)?;
        Ok(())
    }

    /// Static token from the file, ignoring unresolved `${VAR}` placeholders.
    pub fn token(&self) -> Option<&str> {
        self.api
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !ENV_VAR_RE.is_match(t))
    }

    pub fn session_file(&self) -> &str {
        self.api
            .session_file
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_FILE)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.uploads.max_file_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl ConfigProvider for PortalConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn output_path(&self) -> &str {
        &self.output.directory
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds()
    }

    fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes()
    }
}

impl Validate for PortalConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
