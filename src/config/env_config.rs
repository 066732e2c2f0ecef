use crate::config::toml_config::{
    default_image_formats, default_mail_base_url, default_media_base_url, default_media_folder,
    default_sender_name, AdminConfig, AppConfig, AuthConfig, DatabaseBackend, DatabaseConfig,
    LogFormat, LoggingConfig, MailConfig, MediaConfig, ServerConfig,
};
use crate::utils::error::{PortfolioError, Result};
use std::env;

impl AppConfig {
    /// Builds the configuration from process environment variables, for
    /// deployments that do not ship a config file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PortfolioError::ConfigError {
                    message: format!("{} environment variable is required", key),
                })
        };

        let defaults = ServerConfig::default();
        let server = ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", lookup("PORT"), defaults.port)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                lookup("MAX_UPLOAD_BYTES"),
                defaults.max_upload_bytes,
            )?,
        };

        let mongo_uri = lookup("MONGO_URI");
        let backend = match lookup("DATABASE_BACKEND").as_deref() {
            Some("memory") => DatabaseBackend::Memory,
            Some("mongo") => DatabaseBackend::Mongo,
            Some(other) => {
                return Err(PortfolioError::InvalidConfigValueError {
                    field: "DATABASE_BACKEND".to_string(),
                    value: other.to_string(),
                    reason: "Expected `memory` or `mongo`".to_string(),
                })
            }
            None if mongo_uri.is_some() => DatabaseBackend::Mongo,
            None => DatabaseBackend::Memory,
        };

        let recipient = required("EMAIL_USER")?;

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminConfig { email, password }),
            _ => None,
        };

        let format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Ok(Self {
            server,
            auth: AuthConfig {
                jwt_secret: required("JWT_SECRET")?,
                token_ttl_seconds: lookup("TOKEN_TTL_SECONDS")
                    .map(|v| parse_or("TOKEN_TTL_SECONDS", Some(v), 3600))
                    .transpose()?,
            },
            database: DatabaseConfig {
                backend,
                uri: mongo_uri,
                name: lookup("MONGO_DB_NAME").unwrap_or_else(|| "portfolio".to_string()),
            },
            media: MediaConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
                folder: lookup("CLOUDINARY_FOLDER").unwrap_or_else(default_media_folder),
                base_url: lookup("CLOUDINARY_BASE_URL").unwrap_or_else(default_media_base_url),
                allowed_formats: default_image_formats(),
            },
            mail: MailConfig {
                api_key: required("BREVO_API_KEY")?,
                recipient,
                sender_email: lookup("EMAIL_SENDER"),
                sender_name: lookup("EMAIL_SENDER_NAME").unwrap_or_else(default_sender_name),
                base_url: lookup("BREVO_BASE_URL").unwrap_or_else(default_mail_base_url),
            },
            admin,
            logging: LoggingConfig {
                format,
                level: lookup("LOG_LEVEL"),
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| PortfolioError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}
