//! Error types for engine construction and parameter loading.
//!
//! Nothing in the per-sample path can fail; runtime setters clamp instead.
//! Only construction bounds and preset parsing surface an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReverbError {
    /// Maximum sample rate must be finite and at least 1 Hz.
    #[error("Invalid maximum sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Maximum modulation depth must be finite and non-negative.
    #[error("Invalid maximum modulation depth: {0}")]
    InvalidModDepth(f32),

    /// Maximum time scale must be finite and positive.
    #[error("Invalid maximum time scale: {0}")]
    InvalidTimeScale(f32),

    /// Parameter JSON could not be parsed.
    #[error("Invalid reverb parameters: {0}")]
    Params(#[from] serde_json::Error),
}

pub type ReverbResult<T> = Result<T, ReverbError>;

/// Validate the three construction bounds shared by the engine and the tank.
pub(crate) fn check_bounds(
    max_sample_rate: f32,
    max_mod_depth: f32,
    max_time_scale: f32,
) -> ReverbResult<()> {
    if !max_sample_rate.is_finite() || max_sample_rate < 1.0 {
        return Err(ReverbError::InvalidSampleRate(max_sample_rate));
    }
    if !max_mod_depth.is_finite() || max_mod_depth < 0.0 {
        return Err(ReverbError::InvalidModDepth(max_mod_depth));
    }
    if !max_time_scale.is_finite() || max_time_scale <= 0.0 {
        return Err(ReverbError::InvalidTimeScale(max_time_scale));
    }
    Ok(())
}
