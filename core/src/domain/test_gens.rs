//! Shared `proptest` generators for domain property tests.

use proptest::prelude::*;

use super::cards_types::{Card, Rank, Suit};

pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Clubs),
        Just(Suit::Diamonds),
        Just(Suit::Hearts),
        Just(Suit::Spades),
    ]
}

pub fn rank() -> impl Strategy<Value = Rank> {
    prop_oneof![
        Just(Rank::Seven),
        Just(Rank::Eight),
        Just(Rank::Queen),
        Just(Rank::King),
        Just(Rank::Ten),
        Just(Rank::Ace),
        Just(Rank::Nine),
        Just(Rank::Jack),
    ]
}

pub fn card() -> impl Strategy<Value = Card> {
    (suit(), rank()).prop_map(|(suit, rank)| Card { suit, rank })
}

/// Two cards guaranteed not to be the same (suit, rank) pair.
pub fn two_distinct_cards() -> impl Strategy<Value = (Card, Card)> {
    (card(), card()).prop_filter("cards must be distinct", |(a, b)| a != b)
}

/// A hand of `count` distinct cards drawn from the 32-card deck.
pub fn unique_hand(count: usize) -> impl Strategy<Value = Vec<Card>> {
    let mut all = Vec::with_capacity(32);
    for &suit in Suit::ALL.iter() {
        for &rank in Rank::ALL.iter() {
            all.push(Card { suit, rank });
        }
    }
    prop::sample::subsequence(all, count)
}
