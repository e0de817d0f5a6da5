//! Deck construction and dealing (C2).

use super::cards::{full_deck, Card};
use super::rng::EngineRng;

/// Result of one deal: hands in seat order starting at seat 0, plus
/// whatever remains in the center pile.
pub struct Deal {
    /// `hands[seat]` is that seat's dealt cards.
    pub hands: Vec<Vec<Card>>,
    pub center_pile: Vec<Card>,
}

/// Deals a freshly shuffled 32-card deck for `seat_count` seats (2, 3, or
/// 4), starting at the seat clockwise from `dealer_seat` and proceeding
/// clockwise. Batching is mode-specific and exact:
/// - mode 4: two rounds of 4 (hands of 8, no center).
/// - mode 3: rounds of 4, 4, 2 (hands of 10, center of 2).
/// - mode 2: rounds of 4, 4, 2 (hands of 10, center of 12).
pub fn deal(seat_count: usize, dealer_seat: usize, rng: &EngineRng) -> Deal {
    let mut deck = full_deck();
    rng.shuffle(&mut deck);

    let batches: &[usize] = match seat_count {
        4 => &[4, 4],
        3 => &[4, 4, 2],
        2 => &[4, 4, 2],
        other => panic!("unsupported seat count {other}"),
    };

    let deal_order: Vec<usize> = (1..=seat_count)
        .map(|offset| (dealer_seat + offset) % seat_count)
        .collect();

    let mut hands: Vec<Vec<Card>> = vec![Vec::new(); seat_count];
    let mut cursor = 0usize;
    for &batch_size in batches {
        for &seat in &deal_order {
            let take = &deck[cursor..cursor + batch_size];
            hands[seat].extend_from_slice(take);
            cursor += batch_size;
        }
    }

    let center_pile = deck[cursor..].to_vec();

    Deal { hands, center_pile }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> EngineRng {
        EngineRng::seeded(7)
    }

    #[test]
    fn mode_four_deals_eight_each_no_center() {
        let d = deal(4, 0, &rng());
        for hand in &d.hands {
            assert_eq!(hand.len(), 8);
        }
        assert!(d.center_pile.is_empty());
    }

    #[test]
    fn mode_three_deals_ten_each_with_two_in_center() {
        let d = deal(3, 1, &rng());
        for hand in &d.hands {
            assert_eq!(hand.len(), 10);
        }
        assert_eq!(d.center_pile.len(), 2);
    }

    #[test]
    fn mode_two_deals_ten_each_with_twelve_in_center() {
        let d = deal(2, 0, &rng());
        for hand in &d.hands {
            assert_eq!(hand.len(), 10);
        }
        assert_eq!(d.center_pile.len(), 12);
    }

    #[test]
    fn every_dealt_card_is_unique_and_covers_the_full_deck() {
        let d = deal(4, 2, &rng());
        let mut all: Vec<Card> = d.hands.into_iter().flatten().collect();
        all.extend(d.center_pile);
        assert_eq!(all.len(), 32);
        let unique: std::collections::HashSet<_> =
            all.iter().map(|c| (c.suit, c.rank)).collect();
        assert_eq!(unique.len(), 32);
    }

    #[test]
    fn dealing_order_starts_left_of_dealer() {
        // Dealer at seat 2 in a 4-seat game: seat 3 is left of the dealer
        // and should receive the first four cards of the shuffled deck.
        let mut shuffled = full_deck();
        EngineRng::seeded(1).shuffle(&mut shuffled);
        let d = deal(4, 2, &EngineRng::seeded(1));
        assert_eq!(&d.hands[3][..4], &shuffled[..4]);
    }
}
