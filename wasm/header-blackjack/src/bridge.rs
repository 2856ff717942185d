use std::{cell::RefCell, rc::Rc};

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

use crate::{
    deck::RandomShoe,
    error::PresentError,
    game::{Table, Wake},
    hand::Hand,
    present::{visible_labels, Controls, Presenter, Seat},
};

pub type SharedTable = Rc<RefCell<Table<JsPresenter, RandomShoe>>>;

/// Presenter backed by a plain JS object of callbacks:
/// `render(seat, cards, hideHole)`, `showMessage(text, ms)`,
/// `setControls(controls)` and `setWallet(value)`. Missing keys are no-ops.
pub struct JsPresenter {
    render: Option<Function>,
    show_message: Option<Function>,
    set_controls: Option<Function>,
    set_wallet: Option<Function>,
}

impl JsPresenter {
    pub fn new(callbacks: &JsValue) -> Self {
        JsPresenter {
            render: callback(callbacks, "render"),
            show_message: callback(callbacks, "showMessage"),
            set_controls: callback(callbacks, "setControls"),
            set_wallet: callback(callbacks, "setWallet"),
        }
    }
}

fn callback(callbacks: &JsValue, key: &str) -> Option<Function> {
    if callbacks.is_undefined() || callbacks.is_null() {
        return None;
    }
    let value = Reflect::get(callbacks, &JsValue::from_str(key)).ok()?;
    match value.dyn_into::<Function>() {
        Ok(function) => Some(function),
        Err(_) => {
            log::warn!("presenter has no {key} function");
            None
        }
    }
}

fn js_error(err: JsValue) -> PresentError {
    PresentError(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl Presenter for JsPresenter {
    fn render(&mut self, seat: Seat, hand: &Hand, hide_hole: bool) -> Result<(), PresentError> {
        let Some(render) = &self.render else {
            return Ok(());
        };
        let cards: Array = visible_labels(hand, hide_hole)
            .into_iter()
            .map(JsValue::from_str)
            .collect();
        render
            .call3(
                &JsValue::NULL,
                &JsValue::from_str(seat.as_str()),
                &cards,
                &JsValue::from_bool(hide_hole),
            )
            .map(drop)
            .map_err(js_error)
    }

    fn show_message(&mut self, text: &str, duration_ms: u32) -> Result<(), PresentError> {
        let Some(show_message) = &self.show_message else {
            log::info!("{text}");
            return Ok(());
        };
        show_message
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(text),
                &JsValue::from(duration_ms),
            )
            .map(drop)
            .map_err(js_error)
    }

    fn set_controls(&mut self, controls: Controls) -> Result<(), PresentError> {
        let Some(set_controls) = &self.set_controls else {
            return Ok(());
        };
        let value = serde_wasm_bindgen::to_value(&controls)
            .map_err(|err| PresentError(err.to_string()))?;
        set_controls
            .call1(&JsValue::NULL, &value)
            .map(drop)
            .map_err(js_error)
    }

    fn set_wallet(&mut self, value: i64) -> Result<(), PresentError> {
        let Some(set_wallet) = &self.set_wallet else {
            return Ok(());
        };
        set_wallet
            .call1(&JsValue::NULL, &JsValue::from_f64(value as f64))
            .map(drop)
            .map_err(js_error)
    }
}

/// Hands `wake` back to the table after its delay via `setTimeout`, and
/// keeps following the chain it returns. Timers hold the table weakly, so
/// a dropped game lets pending timers fall through.
pub fn schedule(table: &SharedTable, wake: Wake) {
    let handle = Rc::downgrade(table);
    let fire = Closure::once_into_js(move || {
        let Some(table) = handle.upgrade() else {
            return;
        };
        let next = match table.try_borrow_mut() {
            Ok(mut table) => table.wake(wake),
            Err(_) => {
                log::warn!("table busy, retrying {:?}", wake.task);
                Some(Wake { delay_ms: 0, ..wake })
            }
        };
        if let Some(next) = next {
            schedule(&table, next);
        }
    });

    let Some(window) = web_sys::window() else {
        log::warn!("no window, {:?} not scheduled", wake.task);
        return;
    };
    let delay = i32::try_from(wake.delay_ms).unwrap_or(i32::MAX);
    if let Err(err) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(fire.unchecked_ref(), delay)
    {
        log::warn!("setTimeout failed: {}", js_error(err));
    }
}
