use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::collaboration::router::status_for;
use crate::workflows::collaboration::{CollaborationServiceError, StateCode, StateRulesImportError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    StateRules(StateRulesImportError),
    UnknownState(StateCode),
    Collaboration(CollaborationServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::StateRules(err) => write!(f, "state rules error: {}", err),
            AppError::UnknownState(code) => {
                write!(f, "no regulatory rules loaded for state {code}")
            }
            AppError::Collaboration(err) => write!(f, "collaboration error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::StateRules(err) => Some(err),
            AppError::UnknownState(_) => None,
            AppError::Collaboration(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::StateRules(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownState(_) => StatusCode::NOT_FOUND,
            AppError::Collaboration(err) => status_for(err),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StateRulesImportError> for AppError {
    fn from(value: StateRulesImportError) -> Self {
        Self::StateRules(value)
    }
}

impl From<CollaborationServiceError> for AppError {
    fn from(value: CollaborationServiceError) -> Self {
        Self::Collaboration(value)
    }
}
