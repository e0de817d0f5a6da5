//! Canonical error codes for the game engine.
//!
//! Each variant maps 1:1 to a SCREAMING_SNAKE_CASE string. Dispatchers on
//! top of this crate can forward `ErrorCode::as_str()` straight into a
//! wire payload without inventing ad-hoc strings at call sites.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Invalid input
    ParseCard,
    InvalidMode,
    InvalidSuit,
    InvalidBidAmount,
    MissingField,

    // Phase violation
    WrongPhase,

    // Permission violation
    NotYourTurn,
    NotTrumper,
    NotDealer,
    AlreadyBid,
    AlreadyRevealed,

    // Rule violation
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

    // Missing entity
    GameNotFound,
    PlayerNotFound,
    SeatNotFound,

    // Conflict / stale write
    OptimisticLock,
    GameFull,
    GameNotWaiting,
    IncompleteSeats,

    // System
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ParseCard => "PARSE_CARD",
            Self::InvalidMode => "INVALID_MODE",
            Self::InvalidSuit => "INVALID_SUIT",
            Self::InvalidBidAmount => "INVALID_BID_AMOUNT",
            Self::MissingField => "MISSING_FIELD",

            Self::WrongPhase => "WRONG_PHASE",

            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::NotTrumper => "NOT_TRUMPER",
            Self::NotDealer => "NOT_DEALER",
            Self::AlreadyBid => "ALREADY_BID",
            Self::AlreadyRevealed => "ALREADY_REVEALED",

            Self::BidTooLow => "BID_TOO_LOW",
            Self::BidNotMonotone => "BID_NOT_MONOTONE",
            Self::RebidNotAllowed => "REBID_NOT_ALLOWED",
            Self::SelfOverbid => "SELF_OVERBID",
            Self::PartnerOverbid => "PARTNER_OVERBID",
            Self::MustFollowSuit => "MUST_FOLLOW_SUIT",
            Self::MustRevealBeforeCut => "MUST_REVEAL_BEFORE_CUT",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::TrumpNotSelected => "TRUMP_NOT_SELECTED",
            Self::WrongExchangeCount => "WRONG_EXCHANGE_COUNT",
            Self::NotInExchangePhase => "NOT_IN_EXCHANGE_PHASE",
            Self::CallingSuitInHand => "CALLING_SUIT_IN_HAND",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::SeatNotFound => "SEAT_NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::GameFull => "GAME_FULL",
            Self::GameNotWaiting => "GAME_NOT_WAITING",
            Self::IncompleteSeats => "INCOMPLETE_SEATS",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        for code in [
            ErrorCode::ParseCard,
            ErrorCode::WrongPhase,
            ErrorCode::NotYourTurn,
            ErrorCode::OptimisticLock,
            ErrorCode::Internal,
        ] {
            let s = code.as_str();
            assert_eq!(s, s.to_uppercase());
            assert!(!s.contains(' '));
        }
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", ErrorCode::GameNotFound), "GAME_NOT_FOUND");
    }
}
