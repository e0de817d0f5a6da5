//! Domain-level error type returned by every rule in the engine.
//!
//! `DomainError` is transport-agnostic: it carries enough structure for a
//! dispatcher to pick a wire status and a human-readable detail without the
//! engine itself knowing anything about HTTP or websockets.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Why a piece of input or a requested transition was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    ParseCard,
    InvalidSuit,
    InvalidMode,
    MissingField,
    WrongPhase,
    NotYourTurn,
    NotTrumper,
    NotDealer,
    AlreadyBid,
    AlreadyRevealed,
    BidTooLow,
    BidNotMonotone,
    RebidNotAllowed,
    SelfOverbid,
    PartnerOverbid,
    MustFollowSuit,
    MustRevealBeforeCut,
    CardNotInHand,
    TrumpNotSelected,
    WrongExchangeCount,
    NotInExchangePhase,
    CallingSuitInHand,
    GameNotWaiting,
    GameFull,
    IncompleteSeats,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Player,
    Seat,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    OptimisticLock,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Config,
    Other(String),
}

/// Central domain error type. Every rule violation in the engine resolves
/// to exactly one of these four shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    Validation(ValidationKind, String),
    Conflict(ConflictKind, String),
    NotFound(NotFoundKind, String),
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}
