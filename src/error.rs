//! Error types for Salesdesk

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Session storage unavailable: {0}")]
    Storage(String),

    #[error("Invalid CSRF token: {0}")]
    InvalidToken(String),

    #[error("CSRF token missing or mismatched")]
    TokenMismatch,

    #[error("Origin not allowed")]
    OriginNotAllowed,

    #[error("Notification {0} not found")]
    NotificationNotFound(u64),

    #[error("Config file not found. Run 'salesdesk init' first.")]
    ConfigNotFound,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::TokenMismatch | Error::OriginNotAllowed => StatusCode::FORBIDDEN,
            Error::InvalidToken(_) => StatusCode::BAD_REQUEST,
            Error::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            Error::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "success": false,
            "data": null,
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
