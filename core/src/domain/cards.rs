//! Card model entry point: re-exports the split type/logic/parsing/serde
//! modules and the canonical 32-card deck builder.

pub use super::cards_logic::{beats, hand_has_suit, order, points};
pub use super::cards_parsing::try_parse_cards;
pub use super::cards_types::{Card, Rank, Suit};

/// The 32 distinct cards of a 304 deck, suit-major then rank-major, in a
/// fixed deterministic order. Shuffling is the caller's job.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(32);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deck_has_32_unique_cards() {
        let deck = full_deck();
        assert_eq!(deck.len(), 32);
        let mut seen = std::collections::HashSet::new();
        for card in &deck {
            assert!(seen.insert((card.suit, card.rank)));
        }
    }

    #[test]
    fn full_deck_points_sum_to_304() {
        let total: u32 = full_deck().iter().map(|c| points(c.rank)).sum();
        assert_eq!(total, 304);
    }
}
