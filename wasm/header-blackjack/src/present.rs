use serde::Serialize;

use crate::{error::PresentError, hand::Hand};

pub const DEAL_LABEL: &str = "Deal";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Seat {
    Player,
    Dealer,
}

impl Seat {
    pub fn as_str(self) -> &'static str {
        match self {
            Seat::Player => "player",
            Seat::Dealer => "dealer",
        }
    }
}

/// Face labels as the page shows them; with `hide_hole` the second card
/// reads `?`.
pub fn visible_labels(hand: &Hand, hide_hole: bool) -> Vec<&'static str> {
    hand.cards()
        .iter()
        .enumerate()
        .map(|(i, card)| if i == 1 && hide_hole { "?" } else { card.label() })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub hit: bool,
    pub stand: bool,
    pub new_game: bool,
    pub bet_input: bool,
    pub deal_label: &'static str,
}

impl Controls {
    /// Waiting for a bet.
    pub const IDLE: Controls = Controls {
        hit: false,
        stand: false,
        new_game: true,
        bet_input: true,
        deal_label: DEAL_LABEL,
    };

    pub const PLAYER_TURN: Controls = Controls {
        hit: true,
        stand: true,
        new_game: false,
        bet_input: false,
        deal_label: DEAL_LABEL,
    };

    /// Dealing, dealer drawing or game over: nothing may interleave.
    pub const LOCKED: Controls = Controls {
        hit: false,
        stand: false,
        new_game: false,
        bet_input: false,
        deal_label: DEAL_LABEL,
    };
}

/// What the page does with table state. Every method defaults to a no-op,
/// so `()` is a valid headless presenter.
pub trait Presenter {
    /// Redraw a seat. With `hide_hole` the second card is masked.
    fn render(&mut self, seat: Seat, hand: &Hand, hide_hole: bool) -> Result<(), PresentError> {
        let _ = (seat, hand, hide_hole);
        Ok(())
    }

    fn show_message(&mut self, text: &str, duration_ms: u32) -> Result<(), PresentError> {
        let _ = (text, duration_ms);
        Ok(())
    }

    fn set_controls(&mut self, controls: Controls) -> Result<(), PresentError> {
        let _ = controls;
        Ok(())
    }

    fn set_wallet(&mut self, value: i64) -> Result<(), PresentError> {
        let _ = value;
        Ok(())
    }
}

impl Presenter for () {}
