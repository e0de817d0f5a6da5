//! Card identifier parsing and formatting: `"<rank>_<suit>"`, e.g. `"J_hearts"`.

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::{DomainError, ValidationKind};

fn rank_token(rank: Rank) -> &'static str {
    match rank {
        Rank::Seven => "7",
        Rank::Eight => "8",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ten => "10",
        Rank::Ace => "A",
        Rank::Nine => "9",
        Rank::Jack => "J",
    }
}

fn rank_from_token(tok: &str) -> Option<Rank> {
    match tok {
        "7" => Some(Rank::Seven),
        "8" => Some(Rank::Eight),
        "Q" => Some(Rank::Queen),
        "K" => Some(Rank::King),
        "10" => Some(Rank::Ten),
        "A" => Some(Rank::Ace),
        "9" => Some(Rank::Nine),
        "J" => Some(Rank::Jack),
        _ => None,
    }
}

fn suit_token(suit: Suit) -> &'static str {
    match suit {
        Suit::Hearts => "hearts",
        Suit::Diamonds => "diamonds",
        Suit::Clubs => "clubs",
        Suit::Spades => "spades",
    }
}

fn suit_from_token(tok: &str) -> Option<Suit> {
    match tok {
        "hearts" => Some(Suit::Hearts),
        "diamonds" => Some(Suit::Diamonds),
        "clubs" => Some(Suit::Clubs),
        "spades" => Some(Suit::Spades),
        _ => None,
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", rank_token(self.rank), suit_token(self.suit))
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rank_part, suit_part) = s.split_once('_').ok_or_else(|| {
            DomainError::validation(ValidationKind::ParseCard, format!("parse card id: {s}"))
        })?;
        let rank = rank_from_token(rank_part).ok_or_else(|| {
            DomainError::validation(ValidationKind::ParseCard, format!("parse card id: {s}"))
        })?;
        let suit = suit_from_token(suit_part).ok_or_else(|| {
            DomainError::validation(ValidationKind::ParseCard, format!("parse card id: {s}"))
        })?;
        Ok(Card { suit, rank })
    }
}

/// Non-panicking helper for parsing a batch of card ids, e.g. from an
/// inbound action's `cards` field.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::{Rank, Suit};

    #[test]
    fn round_trips_every_card() {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let card = Card { suit, rank };
                let id = card.to_string();
                let parsed: Card = id.parse().unwrap();
                assert_eq!(parsed, card);
            }
        }
    }

    #[test]
    fn jack_of_hearts_matches_the_documented_id() {
        let card = Card {
            suit: Suit::Hearts,
            rank: Rank::Jack,
        };
        assert_eq!(card.to_string(), "J_hearts");
        assert_eq!("J_hearts".parse::<Card>().unwrap(), card);
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "J", "J_", "_hearts", "Z_hearts", "J_oceans", "10_spade"] {
            assert!(bad.parse::<Card>().is_err(), "expected {bad} to fail");
        }
    }

    #[test]
    fn try_parse_cards_fails_on_first_bad_token() {
        assert!(try_parse_cards(["A_spades", "Z_clubs"]).is_err());
        let ok = try_parse_cards(["A_spades", "10_clubs"]).unwrap();
        assert_eq!(ok.len(), 2);
    }
}
