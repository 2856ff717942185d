use std::fmt;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Card {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "2")]
    Two,
}

/// Every value the shoe can produce, in the order the header game lists them.
pub const CARDS: [Card; 13] = [
    Card::Ace,
    Card::King,
    Card::Queen,
    Card::Jack,
    Card::Ten,
    Card::Nine,
    Card::Eight,
    Card::Seven,
    Card::Six,
    Card::Five,
    Card::Four,
    Card::Three,
    Card::Two,
];

impl Card {
    /// Blackjack value with the Ace counted high.
    pub fn value(self) -> u8 {
        match self {
            Card::Ace => 11,
            Card::King | Card::Queen | Card::Jack | Card::Ten => 10,
            Card::Nine => 9,
            Card::Eight => 8,
            Card::Seven => 7,
            Card::Six => 6,
            Card::Five => 5,
            Card::Four => 4,
            Card::Three => 3,
            Card::Two => 2,
        }
    }

    pub fn is_ace(self) -> bool {
        self == Card::Ace
    }

    pub fn label(self) -> &'static str {
        match self {
            Card::Ace => "A",
            Card::King => "K",
            Card::Queen => "Q",
            Card::Jack => "J",
            Card::Ten => "10",
            Card::Nine => "9",
            Card::Eight => "8",
            Card::Seven => "7",
            Card::Six => "6",
            Card::Five => "5",
            Card::Four => "4",
            Card::Three => "3",
            Card::Two => "2",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of cards for the table.
pub trait Shoe {
    fn draw(&mut self) -> Card;
}

/// Infinite shoe: every draw is uniform over [`CARDS`] and independent of
/// earlier draws.
pub struct RandomShoe {
    rng: SmallRng,
}

impl RandomShoe {
    pub fn new(seed: u64) -> Self {
        RandomShoe {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        RandomShoe {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl Shoe for RandomShoe {
    fn draw(&mut self) -> Card {
        CARDS[self.rng.gen_range(0..CARDS.len())]
    }
}

/// Deals a fixed sequence of cards, then repeats the last one.
#[cfg(test)]
pub(crate) struct StackedShoe {
    cards: std::collections::VecDeque<Card>,
    last: Card,
}

#[cfg(test)]
impl StackedShoe {
    pub(crate) fn new(cards: &[Card]) -> Self {
        StackedShoe {
            cards: cards.iter().copied().collect(),
            last: cards.last().copied().unwrap_or(Card::Two),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
impl Shoe for StackedShoe {
    fn draw(&mut self) -> Card {
        self.cards.pop_front().unwrap_or(self.last)
    }
}
