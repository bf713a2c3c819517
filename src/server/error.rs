use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::{api::QuoteError, models::ErrorBody, server::users::UserError};

/// Erreurs des handlers HTTP
///
/// Chaque variante devient un HTTP 500 avec un corps `{"Error": "..."}`
/// générique : le détail ne part que dans les logs.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload(String),

    #[error("Error in /api/login")]
    Login(#[source] UserError),

    #[error("Error in /api/register")]
    Register(#[source] UserError),

    #[error("Error in /api/monthly/:symbol")]
    Monthly(#[from] QuoteError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::MalformedPayload(detail) => error!(%detail, "Rejected request body"),
            AppError::Login(source) | AppError::Register(source) => {
                error!(error = %source, "{}", self)
            }
            AppError::Monthly(source) => error!(error = %source, "{}", self),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(self.to_string())),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_is_500() {
        let errors = [
            AppError::MalformedPayload("eof".to_string()),
            AppError::Login(UserError::InvalidCredentials),
            AppError::Register(UserError::UsernameTaken("ada".to_string())),
            AppError::Monthly(QuoteError::RateLimited("slow down".to_string())),
        ];

        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_message_does_not_leak_details() {
        let err = AppError::Register(UserError::UsernameTaken("ada".to_string()));
        assert_eq!(err.to_string(), "Error in /api/register");
    }
}
