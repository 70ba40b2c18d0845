use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{DomainError, NotFoundKind};
use crate::errors::ErrorCode;

/// RFC 7807-style error body returned by every failing endpoint.
#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
    },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Helper method to extract error detail from any error variant
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Internal { detail, .. } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(code: ErrorCode, detail: String) -> Self {
        Self::Validation { code, detail }
    }

    pub fn bad_request(code: ErrorCode, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn not_found(code: ErrorCode, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn conflict(code: ErrorCode, detail: String) -> Self {
        Self::Conflict { code, detail }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }
}

/// Translate core outcomes into transport errors.
///
/// Not-found maps to 404; caller-correctable preconditions and resource
/// exhaustion map to 409 so clients can distinguish "fix the request"
/// from "fix the game state".
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let detail = err.to_string();
        match err {
            DomainError::NotFound(kind, _) => {
                let code = match kind {
                    NotFoundKind::Game => ErrorCode::GameNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                    NotFoundKind::Pile => ErrorCode::PileNotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::PhaseMismatch(_) => AppError::conflict(ErrorCode::PhaseMismatch, detail),
            DomainError::RosterFull => AppError::conflict(ErrorCode::RosterFull, detail),
            DomainError::OutOfTurn => AppError::conflict(ErrorCode::OutOfTurn, detail),
            DomainError::WrongGameType(_) => {
                AppError::bad_request(ErrorCode::WrongGameType, detail)
            }
            DomainError::NotStartable(_) => {
                AppError::conflict(ErrorCode::GameNotStartable, detail)
            }
            DomainError::CardNotInHand => AppError::conflict(ErrorCode::CardNotInHand, detail),
            DomainError::DeckExhausted => AppError::conflict(ErrorCode::DeckExhausted, detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let problem = ProblemDetails {
            type_: "about:blank".to_string(),
            title: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            status: status.as_u16(),
            detail: self.detail(),
            code: self.code().to_string(),
        };
        HttpResponse::build(status).json(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_not_found_maps_to_404() {
        let err: AppError =
            DomainError::not_found(NotFoundKind::Game, "no such game").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), ErrorCode::GameNotFound);
    }

    #[test]
    fn domain_preconditions_map_to_409() {
        for err in [
            DomainError::phase_mismatch("hit while waiting"),
            DomainError::RosterFull,
            DomainError::OutOfTurn,
            DomainError::DeckExhausted,
        ] {
            let app: AppError = err.into();
            assert_eq!(app.status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn wrong_game_type_maps_to_400() {
        let err: AppError = DomainError::wrong_game_type("expected blackjack").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
