use crate::cases::{ImportError, SummaryError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
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
    Import(ImportError),
    Summary(SummaryError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Import(ImportError::Io(err))
                if err.kind() == std::io::ErrorKind::NotFound =>
            {
                StatusCode::NOT_FOUND
            }
            AppError::Import(ImportError::SheetNotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Summary(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Summary(err) => write!(f, "summary error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Summary(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
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

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<SummaryError> for AppError {
    fn from(value: SummaryError) -> Self {
        Self::Summary(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::CaseField;

    #[test]
    fn import_errors_map_to_client_statuses() {
        let missing = AppError::from(ImportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        )));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let sheet = AppError::from(ImportError::SheetNotFound {
            sheet: "HSA".to_string(),
            available: vec!["Hoja1".to_string()],
        });
        assert_eq!(sheet.status_code(), StatusCode::NOT_FOUND);
        assert!(sheet.to_string().contains("available: Hoja1"));

        let header = AppError::from(ImportError::MissingHeader);
        assert_eq!(header.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn summary_and_config_errors_map_to_statuses() {
        let schema = AppError::from(SummaryError::UnsupportedSchema {
            field: CaseField::Topic,
        });
        assert_eq!(schema.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::from(ConfigError::InvalidPort).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
