use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("No image file uploaded.")]
    MissingImage,

    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error("Unsupported image format: {extension}")]
    UnsupportedImage { extension: String },

    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not allowed by CORS")]
    OriginNotAllowed,

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("Media host error: {message}")]
    MediaHostError { message: String },

    #[error("Mail relay error: {message}")]
    MailerError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Password hashing failed: {message}")]
    PasswordHashError { message: String },

    #[error("Token signing failed: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl PortfolioError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn storage(message: impl ToString) -> Self {
        Self::StorageError {
            message: message.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. }
            | Self::MissingImage
            | Self::UnsupportedImage { .. }
            | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::OriginNotAllowed => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MediaHostError { .. } | Self::MailerError { .. } | Self::HttpError(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::StorageError { .. }
            | Self::PasswordHashError { .. }
            | Self::TokenError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::IoError(_)
            | Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to API clients. Upstream and server-side failures are not echoed back.
    pub fn public_message(&self) -> String {
        match self {
            Self::MediaHostError { .. } => "Image service is unavailable".to_string(),
            Self::MailerError { .. } => "Failed to send message.".to_string(),
            Self::HttpError(_) => "Upstream service is unavailable".to_string(),
            _ if self.status_code().is_server_error() => "Server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for PortfolioError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        (status, Json(json!({ "message": self.public_message() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
