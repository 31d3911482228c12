#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::GatewayError;
use crate::profile::extractor::ExtractionError;

/// One message for every "the AI is not configured" surface, so the frontend
/// has a single string to recognize.
const AI_UNAVAILABLE_MESSAGE: &str = "Serviço de IA indisponível no momento.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Conversation-phase model failures never reach this type: the dialogue
/// manager absorbs them into fallback turns. Extraction failures always do.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session missing or empty")]
    SessionMissing,

    #[error("AI provider not configured")]
    AiUnavailable,

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::SessionMissing => (
                StatusCode::BAD_REQUEST,
                "SESSION_MISSING",
                "Sessão inválida ou histórico não encontrado para gerar perfil.".to_string(),
            ),
            AppError::AiUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_UNAVAILABLE",
                AI_UNAVAILABLE_MESSAGE.to_string(),
            ),
            AppError::Extraction(e) => match e {
                ExtractionError::EmptyTranscript => (
                    StatusCode::BAD_REQUEST,
                    "EMPTY_TRANSCRIPT",
                    "Histórico de conversa vazio para gerar perfil.".to_string(),
                ),
                ExtractionError::Gateway(GatewayError::Unavailable) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI_UNAVAILABLE",
                    AI_UNAVAILABLE_MESSAGE.to_string(),
                ),
                ExtractionError::Gateway(GatewayError::RequestFailed(detail)) => {
                    tracing::error!("extraction request failed: {detail}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "EXTRACTION_FAILED",
                        "Falha ao gerar o perfil via IA. Tente novamente.".to_string(),
                    )
                }
                ExtractionError::MalformedOutput { cleaned, .. } => {
                    tracing::error!("extraction produced non-JSON output: {cleaned:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "EXTRACTION_MALFORMED",
                        "Falha ao processar o perfil gerado pela IA (formato inválido).".to_string(),
                    )
                }
                ExtractionError::ModelReportedError(msg) => {
                    tracing::error!("model reported an extraction failure: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "MODEL_REPORTED_ERROR",
                        format!("IA reportou um erro na geração do perfil: {msg}"),
                    )
                }
            },
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(AppError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::SessionMissing), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::AiUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::Extraction(ExtractionError::EmptyTranscript)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Extraction(ExtractionError::Gateway(
                GatewayError::Unavailable
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::Extraction(ExtractionError::Gateway(
                GatewayError::RequestFailed("boom".into())
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Extraction(ExtractionError::ModelReportedError(
                "x".into()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let response = AppError::AiUnavailable.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["code"], "AI_UNAVAILABLE");
        assert_eq!(body["error"]["message"], AI_UNAVAILABLE_MESSAGE);
    }
}
