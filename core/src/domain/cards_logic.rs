//! Point values, tie-break order, and the trick-comparison predicate.

use super::cards_types::{Card, Rank, Suit};

/// Card point value by rank. Sums to 304 over the full 32-card deck.
pub fn points(rank: Rank) -> u32 {
    match rank {
        Rank::Seven => 0,
        Rank::Eight => 0,
        Rank::Queen => 2,
        Rank::King => 3,
        Rank::Ten => 10,
        Rank::Ace => 11,
        Rank::Nine => 20,
        Rank::Jack => 30,
    }
}

/// Tie-break order, used only when two same-suit cards have equal points
/// (which never happens with this rank-to-points table, but the order is
/// kept independent of `Rank`'s `Ord` derive as a matter of intent: the
/// two tables are conceptually distinct mappings that happen to coincide
/// with declaration order today).
pub fn order(rank: Rank) -> u8 {
    match rank {
        Rank::Seven => 0,
        Rank::Eight => 1,
        Rank::Queen => 2,
        Rank::King => 3,
        Rank::Ten => 4,
        Rank::Ace => 5,
        Rank::Nine => 6,
        Rank::Jack => 7,
    }
}

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// `a` beats `b` within the context of one trick: `trump_suit` is the
/// suit chosen by the trumper, `trump_revealed` gates whether trump cards
/// may cut at all, and `calling_suit` is the suit led this trick.
///
/// Total and antisymmetric for any two distinct cards in a well-formed
/// trick (a trick never contains two equal cards).
pub fn beats(a: Card, b: Card, trump_suit: Suit, trump_revealed: bool, calling_suit: Suit) -> bool {
    if trump_revealed {
        let a_trump = a.suit == trump_suit;
        let b_trump = b.suit == trump_suit;
        if a_trump != b_trump {
            return a_trump;
        }
    }

    if a.suit == b.suit {
        let (pa, pb) = (points(a.rank), points(b.rank));
        if pa != pb {
            return pa > pb;
        }
        return order(a.rank) > order(b.rank);
    }

    let a_calls = a.suit == calling_suit;
    let b_calls = b.suit == calling_suit;
    if a_calls != b_calls {
        return a_calls;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::{Rank::*, Suit::*};

    fn c(suit: Suit, rank: Rank) -> Card {
        Card { suit, rank }
    }

    #[test]
    fn points_sum_to_304() {
        let per_suit: u32 = Rank::ALL.iter().map(|r| points(*r)).sum();
        let total = per_suit * Suit::ALL.len() as u32;
        assert_eq!(total, 304);
    }

    #[test]
    fn trump_cuts_over_non_trump() {
        let lead = c(Hearts, Ace);
        let cutter = c(Spades, Seven);
        assert!(beats(cutter, lead, Spades, true, Hearts));
        assert!(!beats(lead, cutter, Spades, true, Hearts));
    }

    #[test]
    fn concealed_trump_does_not_cut() {
        let lead = c(Spades, Jack);
        let would_be_cutter = c(Hearts, Jack);
        // trump_revealed = false: suit equality rule applies; suits differ
        // here so neither calling-suit nor trump logic kicks in for the
        // non-lead card unless it matches calling suit.
        assert!(!beats(would_be_cutter, lead, Hearts, false, Spades));
    }

    #[test]
    fn same_suit_higher_points_wins() {
        let nine = c(Hearts, Nine);
        let ace = c(Hearts, Ace);
        assert!(beats(nine, ace, Spades, true, Hearts));
        assert!(!beats(ace, nine, Spades, true, Hearts));
    }

    #[test]
    fn calling_suit_wins_over_offsuit_when_no_trump_involved() {
        let lead = c(Diamonds, Seven);
        let offsuit = c(Clubs, Ace);
        assert!(!beats(offsuit, lead, Hearts, true, Diamonds));
        assert!(beats(lead, offsuit, Hearts, true, Diamonds));
    }

    #[test]
    fn hand_has_suit_checks_membership() {
        let hand = vec![c(Clubs, Seven), c(Diamonds, Ace)];
        assert!(hand_has_suit(&hand, Clubs));
        assert!(!hand_has_suit(&hand, Hearts));
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::test_gens;

    proptest! {
        /// Two distinct cards can never both beat each other, for any
        /// trump suit / reveal state / calling suit.
        #[test]
        fn beats_is_antisymmetric(
            (a, b) in test_gens::two_distinct_cards(),
            trump_suit in test_gens::suit(),
            trump_revealed in any::<bool>(),
            calling_suit in test_gens::suit(),
        ) {
            let a_beats_b = beats(a, b, trump_suit, trump_revealed, calling_suit);
            let b_beats_a = beats(b, a, trump_suit, trump_revealed, calling_suit);
            prop_assert!(!(a_beats_b && b_beats_a));
        }

        /// A revealed trump card always beats a non-trump card, regardless
        /// of points or calling suit.
        #[test]
        fn revealed_trump_always_beats_non_trump(
            trump_suit in test_gens::suit(),
            trump_rank in test_gens::rank(),
            other_rank in test_gens::rank(),
            calling_suit in test_gens::suit(),
        ) {
            let other_suit = Suit::ALL.into_iter().find(|s| *s != trump_suit).unwrap();
            let trump_card = Card { suit: trump_suit, rank: trump_rank };
            let other_card = Card { suit: other_suit, rank: other_rank };
            prop_assert!(beats(trump_card, other_card, trump_suit, true, calling_suit));
            prop_assert!(!beats(other_card, trump_card, trump_suit, true, calling_suit));
        }
    }
}
