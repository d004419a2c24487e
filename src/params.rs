//! Parameter schema for the plate reverb.
//!
//! One `ReverbParams` struct is shared by the native API, the WASM bindings,
//! and offline rendering. JSON keys are camelCase to match the web host.

use serde::{Deserialize, Serialize};

use crate::dsp::engine::ReverbEngine;
use crate::error::ReverbResult;

/// Pedal-style mod speed multiplier applied to a [`ModSetting`] value.
pub const MOD_SPEED_SCALE: f32 = 8.0;
/// Pedal-style mod depth multiplier applied to a [`ModSetting`] value.
pub const MOD_DEPTH_SCALE: f32 = 15.0;

/// Three-way modulation toggle of the hardware front panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModSetting {
    Fast,
    Medium,
    Slow,
}

impl ModSetting {
    /// Raw toggle value before speed/depth scaling.
    pub fn value(self) -> f32 {
        match self {
            ModSetting::Fast => 0.5,
            ModSetting::Medium => 0.25,
            ModSetting::Slow => 0.1,
        }
    }
}

/// Every user-facing reverb parameter.
///
/// Uses `#[serde(default)]` so sparse preset JSON loads correctly:
/// missing keys get default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReverbParams {
    // --- Tank ---
    pub decay: f32,
    pub tank_diffusion: f32,
    pub time_scale: f32,

    // --- Input ---
    pub input_diffusion: bool,
    /// Seconds.
    pub pre_delay: f32,

    // --- Filters (pitch 0..10, 440 Hz at 5) ---
    pub input_low_cut_pitch: f32,
    pub input_high_cut_pitch: f32,
    pub tank_low_cut_pitch: f32,
    pub tank_high_cut_pitch: f32,

    // --- Modulation ---
    pub mod_speed: f32,
    pub mod_depth: f32,
    pub mod_shape: f32,

    pub freeze: bool,

    // --- Metadata (ignored for DSP, present in presets) ---
    #[serde(rename = "_meta", default, skip_serializing)]
    pub meta: Option<serde_json::Value>,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            decay: 0.8,
            tank_diffusion: 0.85,
            time_scale: 1.0075,
            input_diffusion: true,
            pre_delay: 0.0,
            input_low_cut_pitch: 2.87,
            input_high_cut_pitch: 7.25,
            tank_low_cut_pitch: 2.87,
            tank_high_cut_pitch: 7.25,
            mod_speed: 0.8,
            mod_depth: 1.5,
            mod_shape: 0.25,
            freeze: false,
            meta: None,
        }
    }
}

impl ReverbParams {
    /// Parse from JSON string. Missing fields get default values.
    pub fn from_json(json: &str) -> ReverbResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ReverbResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the modulation from front-panel toggles.
    pub fn with_mod_settings(mut self, speed: ModSetting, depth: ModSetting, shape: ModSetting) -> Self {
        self.mod_speed = speed.value() * MOD_SPEED_SCALE;
        self.mod_depth = depth.value() * MOD_DEPTH_SCALE;
        self.mod_shape = shape.value();
        self
    }

    /// Push every parameter into `engine`. The engine clamps out-of-range values.
    pub fn apply(&self, engine: &mut ReverbEngine) {
        engine.set_time_scale(self.time_scale);
        engine.set_pre_delay(self.pre_delay);
        engine.enable_input_diffusion(self.input_diffusion);
        engine.set_decay(self.decay);
        engine.set_tank_diffusion(self.tank_diffusion);

        engine.set_input_filter_low_cutoff_pitch(self.input_low_cut_pitch);
        engine.set_input_filter_high_cutoff_pitch(self.input_high_cut_pitch);
        engine.set_tank_filter_low_cut_frequency(self.tank_low_cut_pitch);
        engine.set_tank_filter_high_cut_frequency(self.tank_high_cut_pitch);

        engine.set_tank_mod_speed(self.mod_speed);
        engine.set_tank_mod_depth(self.mod_depth);
        engine.set_tank_mod_shape(self.mod_shape);

        engine.freeze(self.freeze);
    }
}
