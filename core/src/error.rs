//! Crate-level error type.
//!
//! Unlike the backend this engine was adapted from, nothing here knows
//! about HTTP status codes or response bodies: a dispatcher built on top
//! of this crate maps `AppError::code()` to whatever its own transport
//! needs.

use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("validation error: {detail}")]
    Validation {
        code: ErrorCode,
        kind: ValidationKind,
        detail: String,
    },
    #[error("not found: {detail}")]
    NotFound {
        code: ErrorCode,
        kind: NotFoundKind,
        detail: String,
    },
    #[error("conflict: {detail}")]
    Conflict {
        code: ErrorCode,
        kind: ConflictKind,
        detail: String,
    },
    #[error("internal error: {detail}")]
    Internal { detail: String },
    #[error("configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn validation(code: ErrorCode, kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            kind,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            kind,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            kind,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => {
                let code = validation_kind_code(&kind);
                AppError::Validation { code, kind, detail }
            }
            DomainError::Conflict(kind, detail) => {
                let code = match &kind {
                    ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                    ConflictKind::Other(_) => ErrorCode::Internal,
                };
                AppError::Conflict { code, kind, detail }
            }
            DomainError::NotFound(kind, detail) => {
                let code = match &kind {
                    NotFoundKind::Game => ErrorCode::GameNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                    NotFoundKind::Seat => ErrorCode::SeatNotFound,
                    NotFoundKind::Other(_) => ErrorCode::GameNotFound,
                };
                AppError::NotFound { code, kind, detail }
            }
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::Config => AppError::Config { detail },
                InfraErrorKind::Other(_) => AppError::Internal { detail },
            },
        }
    }
}

fn validation_kind_code(kind: &ValidationKind) -> ErrorCode {
    match kind {
        ValidationKind::ParseCard => ErrorCode::ParseCard,
        ValidationKind::InvalidSuit => ErrorCode::InvalidSuit,
        ValidationKind::InvalidMode => ErrorCode::InvalidMode,
        ValidationKind::MissingField => ErrorCode::MissingField,
        ValidationKind::WrongPhase => ErrorCode::WrongPhase,
        ValidationKind::NotYourTurn => ErrorCode::NotYourTurn,
        ValidationKind::NotTrumper => ErrorCode::NotTrumper,
        ValidationKind::NotDealer => ErrorCode::NotDealer,
        ValidationKind::AlreadyBid => ErrorCode::AlreadyBid,
        ValidationKind::AlreadyRevealed => ErrorCode::AlreadyRevealed,
        ValidationKind::BidTooLow => ErrorCode::BidTooLow,
        ValidationKind::BidNotMonotone => ErrorCode::BidNotMonotone,
        ValidationKind::RebidNotAllowed => ErrorCode::RebidNotAllowed,
        ValidationKind::SelfOverbid => ErrorCode::SelfOverbid,
        ValidationKind::PartnerOverbid => ErrorCode::PartnerOverbid,
        ValidationKind::MustFollowSuit => ErrorCode::MustFollowSuit,
        ValidationKind::MustRevealBeforeCut => ErrorCode::MustRevealBeforeCut,
        ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
        ValidationKind::TrumpNotSelected => ErrorCode::TrumpNotSelected,
        ValidationKind::WrongExchangeCount => ErrorCode::WrongExchangeCount,
        ValidationKind::NotInExchangePhase => ErrorCode::NotInExchangePhase,
        ValidationKind::CallingSuitInHand => ErrorCode::CallingSuitInHand,
        ValidationKind::GameNotWaiting => ErrorCode::GameNotWaiting,
        ValidationKind::GameFull => ErrorCode::GameFull,
        ValidationKind::IncompleteSeats => ErrorCode::IncompleteSeats,
        ValidationKind::Other(_) => ErrorCode::Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_converts_with_matching_code() {
        let e: AppError = DomainError::validation(ValidationKind::BidTooLow, "too low").into();
        assert_eq!(e.code(), ErrorCode::BidTooLow);
    }

    #[test]
    fn conflict_maps_to_optimistic_lock() {
        let e: AppError =
            DomainError::conflict(ConflictKind::OptimisticLock, "version mismatch").into();
        assert_eq!(e.code(), ErrorCode::OptimisticLock);
    }
}
