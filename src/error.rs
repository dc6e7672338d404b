use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Failures at the edges: storage, input files, export, the web layer.
/// Roster operations themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Roster state is unavailable")]
    Lock,
}

impl ResponseError for RosterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RosterError::ExportInProgress => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({"success": false, "error": self.to_string()}))
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
