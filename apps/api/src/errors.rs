use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::grammar::GrammarError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not read the PDF: {0}")]
    DocumentParse(String),

    #[error("The resume contains no extractable text")]
    EmptyText,

    #[error("{0}")]
    EmptyInput(String),

    #[error("Could not compute similarity score: {0}")]
    SimilarityCompute(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Grammar check failed: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EmbeddingError> for AppError {
    fn from(e: EmbeddingError) -> Self {
        AppError::SimilarityCompute(e.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DocumentParse(_) | AppError::EmptyText => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EmptyInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Grammar(_) => StatusCode::BAD_GATEWAY,
            AppError::SimilarityCompute(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::DocumentParse(_) => "DOCUMENT_PARSE_ERROR",
            AppError::EmptyText => "EMPTY_TEXT",
            AppError::EmptyInput(_) => "EMPTY_INPUT",
            AppError::SimilarityCompute(_) => "SIMILARITY_COMPUTE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Grammar(_) => "GRAMMAR_ERROR",
            AppError::Template(_) => "TEMPLATE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message shown to the user inline. Internal details are logged, not shown.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                "The report could not be rendered".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::SimilarityCompute(msg) => {
                tracing::error!("Similarity error: {msg}");
                "Could not compute similarity score.".to_string()
            }
            AppError::Grammar(e) => {
                tracing::warn!("Grammar service error: {e}");
                "The grammar service is unavailable".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Blank-input problems are warnings the user fixes by filling the form in.
    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::EmptyInput(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}
