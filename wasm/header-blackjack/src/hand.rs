use serde::Serialize;

use crate::deck::Card;

/// Best total for `cards` and whether an Ace is still counted as 11.
pub fn hand_value(cards: &[Card]) -> (u32, bool) {
    let mut total = 0u32;
    let mut aces = 0u32;

    for &card in cards {
        total += u32::from(card.value());
        if card.is_ace() {
            aces += 1;
        }
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    (total, aces > 0 && total <= 21)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total(&self) -> u32 {
        hand_value(&self.cards).0
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total() == 21
    }

    pub fn is_bust(&self) -> bool {
        self.total() > 21
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Hand { cards }
    }
}

impl From<&[Card]> for Hand {
    fn from(cards: &[Card]) -> Self {
        Hand {
            cards: cards.to_vec(),
        }
    }
}
