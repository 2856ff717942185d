use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::prelude::*;

mod bridge;
pub mod config;
pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
mod logger;
pub mod present;

pub use config::TableConfig;
pub use deck::{Card, RandomShoe, Shoe};
pub use error::{BetError, ConfigError, PresentError};
pub use game::{Outcome, Phase, RoundSummary, RoundToken, Table, TableSnapshot, Task, Wake};
pub use hand::{hand_value, Hand};
pub use present::{Controls, Presenter, Seat};

use bridge::{JsPresenter, SharedTable};

/// The header game as seen from the page.
#[wasm_bindgen]
pub struct HeaderBlackjack {
    table: SharedTable,
}

#[wasm_bindgen]
impl HeaderBlackjack {
    #[wasm_bindgen(constructor)]
    pub fn new(presenter: &JsValue, config: &JsValue) -> Result<HeaderBlackjack, JsValue> {
        console_error_panic_hook::set_once();
        let config = if config.is_undefined() || config.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<TableConfig>(config.clone())
                .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?
        };
        let config = config
            .validate()
            .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?;
        logger::init(config.log_filter());

        let shoe = match config.seed {
            Some(seed) => RandomShoe::new(seed),
            None => RandomShoe::from_entropy(),
        };
        let table = Table::new(config, JsPresenter::new(presenter), shoe);
        Ok(HeaderBlackjack {
            table: Rc::new(RefCell::new(table)),
        })
    }

    /// Starts a round with the raw bet field value. Returns whether the bet
    /// was accepted; a rejected bet has already been reported on the page.
    pub fn deal(&self, bet: &str) -> bool {
        match self.with_table(|table| table.start_round(bet)) {
            Some(Ok(wake)) => {
                self.follow(wake);
                true
            }
            Some(Err(_)) | None => false,
        }
    }

    pub fn hit(&self) {
        if let Some(wake) = self.with_table(|table| table.hit()) {
            self.follow(wake);
        }
    }

    pub fn stand(&self) {
        if let Some(wake) = self.with_table(|table| table.stand()) {
            self.follow(wake);
        }
    }

    pub fn reset(&self) {
        self.with_table(|table| table.reset());
    }

    /// `NaN` when asked from inside a presenter callback; use the value
    /// passed to `setWallet` there instead.
    pub fn wallet(&self) -> f64 {
        self.table
            .try_borrow()
            .map(|table| table.wallet() as f64)
            .unwrap_or(f64::NAN)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self
            .table
            .try_borrow()
            .map_err(|_| JsValue::from_str("Table busy"))?
            .snapshot();
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
    }
}

impl HeaderBlackjack {
    /// Presenter callbacks run while the table is borrowed, so a callback
    /// that calls back into the game is dropped instead of panicking.
    fn with_table<R>(
        &self,
        f: impl FnOnce(&mut Table<JsPresenter, RandomShoe>) -> R,
    ) -> Option<R> {
        match self.table.try_borrow_mut() {
            Ok(mut table) => Some(f(&mut table)),
            Err(_) => {
                log::warn!("ignoring re-entrant call from a presenter callback");
                None
            }
        }
    }

    fn follow(&self, wake: Option<Wake>) {
        if let Some(wake) = wake {
            bridge::schedule(&self.table, wake);
        }
    }
}
