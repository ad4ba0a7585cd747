#![forbid(unsafe_code)]
//! WebAssembly surface of the SpinLab engine.
//!
//! The browser UI owns sliders, charts and theming; it calls these exports
//! whenever the configuration, run count or base seed changes and renders the
//! returned numbers.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_wasm_bindgen::Serializer;
use spinlab_engine::{DrawSource, SeededRandom, SimSettings};
use wasm_bindgen::prelude::*;

pub mod bridge;

use bridge::{BatchParams, BridgeError};

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {e}")))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, BridgeError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| BridgeError::Decode(e.to_string()))
}

fn js_error(err: &BridgeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Reproducible draw source handed to JS.
#[wasm_bindgen]
pub struct SeededDraws {
    inner: SeededRandom,
}

#[wasm_bindgen]
impl SeededDraws {
    /// Next uniform value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.inner.draw()
    }

    #[wasm_bindgen(getter)]
    pub fn draws(&self) -> f64 {
        spinlab_engine::numbers::u64_to_f64(self.inner.draws())
    }
}

#[wasm_bindgen(js_name = createSeededRandom)]
pub fn create_seeded_random(seed: u32) -> SeededDraws {
    SeededDraws {
        inner: SeededRandom::new(seed),
    }
}

/// Call a JS `() => number` callback once.
fn call_draw(callback: &js_sys::Function) -> Result<f64, String> {
    let value = callback
        .call0(&JsValue::NULL)
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{e:?}")))?;
    value
        .as_f64()
        .ok_or_else(|| format!("expected a number, got {value:?}"))
}

/// Run one session. Without `draw` the session is seeded from entropy; a
/// throwing or out-of-range `draw` makes the call fail.
#[wasm_bindgen(js_name = runSimulation)]
pub fn run_simulation(settings: JsValue, draw: Option<js_sys::Function>) -> Result<JsValue, JsValue> {
    let settings: SimSettings = from_js(settings).map_err(|e| js_error(&e))?;
    let run = match draw.as_ref() {
        Some(callback) => bridge::simulate_with_draw(&settings, || call_draw(callback)),
        None => bridge::simulate(&settings, None),
    }
    .map_err(|e| js_error(&e))?;
    to_js(&run)
}

#[wasm_bindgen(js_name = runBatch)]
pub fn run_batch(params: JsValue) -> Result<JsValue, JsValue> {
    let params: BatchParams = from_js(params).map_err(|e| js_error(&e))?;
    let view = bridge::simulate_batch(params).map_err(|e| js_error(&e))?;
    to_js(&view)
}

/// Slot profile labels, roulette bet definitions and the default settings.
#[wasm_bindgen]
pub fn catalog() -> Result<JsValue, JsValue> {
    to_js(&bridge::catalog())
}

#[wasm_bindgen(js_name = defaultSettings)]
pub fn default_settings() -> Result<JsValue, JsValue> {
    to_js(&SimSettings::default())
}
