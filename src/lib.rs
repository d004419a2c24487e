pub mod dsp;
pub mod error;
pub mod params;

pub use crate::dsp::engine::ReverbEngine;
pub use crate::dsp::tank::{FreezeState, ReverbTank};
pub use crate::error::{ReverbError, ReverbResult};
pub use crate::params::{ModSetting, ReverbParams};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bounds used for engines built from the WASM surface.
const WASM_MAX_MOD_DEPTH: f32 = 16.0;
const WASM_MAX_TIME_SCALE: f32 = 4.0;
/// Longest impulse response the WASM surface will render.
const WASM_MAX_SECONDS: f32 = 60.0;

/// WASM-exposed: return the plateau-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Build an engine at `sample_rate` with `params` applied.
pub fn build_engine(params: &ReverbParams, sample_rate: f32) -> ReverbResult<ReverbEngine> {
    let mut engine = ReverbEngine::new(sample_rate, WASM_MAX_MOD_DEPTH, WASM_MAX_TIME_SCALE)?;
    params.apply(&mut engine);
    Ok(engine)
}

/// WASM-exposed: render the impulse response for a parameter object.
/// Returns interleaved stereo f32 samples for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_impulse_response(params: JsValue, sample_rate: f32, seconds: f32) -> Result<Vec<f32>, JsValue> {
    let params: ReverbParams = if params.is_undefined() || params.is_null() {
        ReverbParams::default()
    } else {
        serde_wasm_bindgen::from_value(params).map_err(|e| JsValue::from_str(&format!("{e}")))?
    };
    let mut engine = build_engine(&params, sample_rate).map_err(|e| JsValue::from_str(&format!("{e}")))?;

    let seconds = if seconds.is_finite() { seconds.clamp(0.0, WASM_MAX_SECONDS) } else { 0.0 };
    let len = (seconds * engine.sample_rate()) as usize;
    if len == 0 {
        return Ok(Vec::new());
    }
    Ok(dsp::renderer::render_interleaved(&mut engine, &[1.0], len - 1))
}

/// WASM-exposed: render an impulse response to a 16-bit stereo WAV byte array.
#[wasm_bindgen]
pub fn render_impulse_wav(params_json: &str, sample_rate: u32, seconds: f32) -> Result<Vec<u8>, JsValue> {
    let params = ReverbParams::from_json(params_json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let mut engine = build_engine(&params, sample_rate as f32).map_err(|e| JsValue::from_str(&format!("{e}")))?;

    let seconds = if seconds.is_finite() { seconds.clamp(0.0, WASM_MAX_SECONDS) } else { 0.0 };
    let len = (seconds * sample_rate as f32) as usize;
    Ok(dsp::renderer::render_wav(&mut engine, &[1.0], len.saturating_sub(1), sample_rate))
}
