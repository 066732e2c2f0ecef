use crate::core::auth::MAX_TOKEN_TTL_SECONDS;
use crate::utils::error::{PortfolioError, Result};
use crate::utils::validation::{
    validate_email_address, validate_non_empty_string, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CORS_ORIGINS: [&str; 2] =
    ["https://amolshende.vercel.app", "http://localhost:5173"];
pub const DEFAULT_IMAGE_FORMATS: [&str; 4] = ["jpg", "png", "jpeg", "gif"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub mail: MailConfig,
    pub admin: Option<AdminConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Memory,
    #[default]
    Mongo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseBackend,
    pub uri: Option<String>,
    #[serde(default = "default_database_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            uri: None,
            name: default_database_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_media_folder")]
    pub folder: String,
    #[serde(default = "default_media_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_formats")]
    pub allowed_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub api_key: String,
    /// Address that receives contact-form messages.
    pub recipient: String,
    /// Verified sender address on the relay account. Defaults to the recipient.
    pub sender_email: Option<String>,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    #[serde(default = "default_mail_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
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
    pub level: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_database_name() -> String {
    "portfolio".to_string()
}

pub(crate) fn default_media_folder() -> String {
    "portfolio_projects".to_string()
}

pub(crate) fn default_media_base_url() -> String {
    "https://api.cloudinary.com".to_string()
}

pub(crate) fn default_image_formats() -> Vec<String> {
    DEFAULT_IMAGE_FORMATS.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn default_sender_name() -> String {
    "Portfolio Contact".to_string()
}

pub(crate) fn default_mail_base_url() -> String {
    "https://api.brevo.com".to_string()
}

impl AppConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortfolioError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML content after substituting `${VAR}` placeholders.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PortfolioError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unknown variables are left untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PortfolioError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn token_ttl_seconds(&self) -> u64 {
        self.auth.token_ttl_seconds.unwrap_or(3600)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_secret("auth.jwt_secret", &self.auth.jwt_secret)?;
        if let Some(ttl) = self.auth.token_ttl_seconds {
            validate_range("auth.token_ttl_seconds", ttl, 60, MAX_TOKEN_TTL_SECONDS)?;
        }

        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validate_positive_number("server.max_upload_bytes", self.server.max_upload_bytes, 1024)?;
        for origin in &self.server.cors_origins {
            validate_url("server.cors_origins", origin)?;
        }

        if self.database.backend == DatabaseBackend::Mongo {
            let uri = validate_required_field("database.uri", &self.database.uri)?;
            validate_secret("database.uri", uri)?;
        }
        validate_non_empty_string("database.name", &self.database.name)?;

        validate_secret("media.cloud_name", &self.media.cloud_name)?;
        validate_secret("media.api_key", &self.media.api_key)?;
        validate_secret("media.api_secret", &self.media.api_secret)?;
        validate_non_empty_string("media.folder", &self.media.folder)?;
        validate_url("media.base_url", &self.media.base_url)?;
        if self.media.allowed_formats.is_empty() {
            return Err(PortfolioError::InvalidConfigValueError {
                field: "media.allowed_formats".to_string(),
                value: "[]".to_string(),
                reason: "At least one image format must be allowed".to_string(),
            });
        }

        validate_secret("mail.api_key", &self.mail.api_key)?;
        validate_config_email("mail.recipient", &self.mail.recipient)?;
        if let Some(sender) = &self.mail.sender_email {
            validate_config_email("mail.sender_email", sender)?;
        }
        validate_url("mail.base_url", &self.mail.base_url)?;

        if let Some(admin) = &self.admin {
            validate_config_email("admin.email", &admin.email)?;
            validate_secret("admin.password", &admin.password)?;
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Non-empty and not an unresolved `${VAR}` placeholder.
fn validate_secret(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains("${") {
        return Err(PortfolioError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Environment variable is not set".to_string(),
        });
    }
    Ok(())
}

fn validate_config_email(field_name: &str, value: &str) -> Result<()> {
    validate_email_address(value).map_err(|_| PortfolioError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: "Not a valid email address".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC_TOML: &str = r#"
[server]
port = 8080

[auth]
jwt_secret = "a-long-enough-development-secret"

[database]
backend = "memory"

[media]
cloud_name = "demo"
api_key = "123"
api_secret = "shh"

[mail]
api_key = "xkeysib-123"
recipient = "owner@example.com"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = AppConfig::from_toml_str(BASIC_TOML).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.cors_origins.len(), 2);
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.media.folder, "portfolio_projects");
        assert_eq!(config.media.base_url, "https://api.cloudinary.com");
        assert_eq!(config.mail.sender_name, "Portfolio Contact");
        assert_eq!(config.token_ttl_seconds(), 3600);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.admin.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PORTFOLIO_TEST_JWT_SECRET", "secret-from-the-environment");

        let toml_content = BASIC_TOML.replace(
            "a-long-enough-development-secret",
            "${PORTFOLIO_TEST_JWT_SECRET}",
        );
        let config = AppConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.auth.jwt_secret, "secret-from-the-environment");

        std::env::remove_var("PORTFOLIO_TEST_JWT_SECRET");
    }

    #[test]
    fn test_unresolved_placeholder_fails_validation() {
        let toml_content = BASIC_TOML.replace(
            "a-long-enough-development-secret",
            "${PORTFOLIO_TEST_UNSET_VARIABLE}",
        );
        let config = AppConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.auth.jwt_secret, "${PORTFOLIO_TEST_UNSET_VARIABLE}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mongo_backend_requires_uri() {
        let toml_content = BASIC_TOML.replace("backend = \"memory\"", "backend = \"mongo\"");
        let config = AppConfig::from_toml_str(&toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PortfolioError::MissingConfigError { field }) if field == "database.uri"
        ));
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let toml_content = BASIC_TOML.replace("owner@example.com", "not-an-email");
        let config = AppConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = BASIC_TOML.replace("port = 8080", "port = 8080\ncors_origins = [\"*\"]");
        let config = AppConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, PortfolioError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let toml_content = format!(
            "{}\n[admin]\nemail = \"admin@example.com\"\npassword = \"hunter22\"\n\n[logging]\nformat = \"json\"\n",
            BASIC_TOML
        );
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.admin.as_ref().unwrap().email, "admin@example.com");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_example_config_parses() {
        let config =
            AppConfig::from_toml_str(include_str!("../../portfolio.example.toml")).unwrap();
        assert_eq!(config.database.backend, DatabaseBackend::Mongo);
        assert_eq!(config.server.cors_origins.len(), 2);
        assert_eq!(config.media.allowed_formats.len(), 4);
    }
}
