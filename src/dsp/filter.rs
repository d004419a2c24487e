//! One-pole low-pass and high-pass filters for damping and DC blocking.
//!
//! Coefficients follow `b = exp(-2π·fc/fs)`. Recomputing them costs an
//! `exp()`, so a cutoff equal to the cached one is a no-op.

use std::f32::consts::PI;

/// Lowest and highest "pitch" accepted by the cutoff setters.
pub const MIN_PITCH: f32 = 0.0;
pub const MAX_PITCH: f32 = 10.0;

/// Map a pitch control value to Hz: `440 · 2^(pitch - 5)`.
///
/// Pitch 0 is 13.75 Hz and pitch 10 is 14.08 kHz, which gives a
/// perceptually even sweep across the knob.
#[inline]
pub fn pitch_to_frequency(pitch: f32) -> f32 {
    440.0 * (pitch - 5.0).exp2()
}

/// Clamp a pitch control value into `[MIN_PITCH, MAX_PITCH]`; NaN maps to `MIN_PITCH`.
#[inline]
pub fn clamp_pitch(pitch: f32) -> f32 {
    if pitch.is_nan() {
        MIN_PITCH
    } else {
        pitch.clamp(MIN_PITCH, MAX_PITCH)
    }
}

#[inline]
fn pole(cutoff: f32, sample_rate: f32) -> f32 {
    (-2.0 * PI * cutoff / sample_rate).exp()
}

/// `y[n] = a·x[n] + b·y[n-1]`
#[derive(Debug, Clone)]
pub struct OnePoleLowpass {
    sample_rate: f32,
    cutoff: f32,
    a: f32,
    b: f32,
    z: f32,
}

impl OnePoleLowpass {
    pub fn new(cutoff: f32, sample_rate: f32) -> Self {
        let mut f = Self {
            sample_rate: sample_rate.max(1.0),
            cutoff: cutoff.max(0.0),
            a: 1.0,
            b: 0.0,
            z: 0.0,
        };
        f.update_coefficients();
        f
    }

    fn update_coefficients(&mut self) {
        self.b = pole(self.cutoff, self.sample_rate);
        self.a = 1.0 - self.b;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.z = self.a * input + self.b * self.z;
        self.z
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set the cutoff in Hz. Skipped when it matches the cached value.
    #[inline]
    pub fn set_cutoff(&mut self, cutoff: f32) {
        let cutoff = cutoff.max(0.0);
        if cutoff == self.cutoff {
            return;
        }
        self.cutoff = cutoff;
        self.update_coefficients();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.update_coefficients();
    }

    pub fn clear(&mut self) {
        self.z = 0.0;
    }
}

/// `y[n] = a0·x[n] + a1·x[n-1] + b1·y[n-1]` with `a0 = (1 + b1) / 2`, `a1 = -a0`.
#[derive(Debug, Clone)]
pub struct OnePoleHighpass {
    sample_rate: f32,
    cutoff: f32,
    a0: f32,
    a1: f32,
    b1: f32,
    x1: f32,
    y1: f32,
}

impl OnePoleHighpass {
    pub fn new(cutoff: f32, sample_rate: f32) -> Self {
        let mut f = Self {
            sample_rate: sample_rate.max(1.0),
            cutoff: cutoff.max(0.0),
            a0: 1.0,
            a1: -1.0,
            b1: 1.0,
            x1: 0.0,
            y1: 0.0,
        };
        f.update_coefficients();
        f
    }

    fn update_coefficients(&mut self) {
        self.b1 = pole(self.cutoff, self.sample_rate);
        self.a0 = (1.0 + self.b1) * 0.5;
        self.a1 = -self.a0;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let y = self.a0 * input + self.a1 * self.x1 + self.b1 * self.y1;
        self.x1 = input;
        self.y1 = y;
        y
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set the cutoff in Hz. Skipped when it matches the cached value.
    #[inline]
    pub fn set_cutoff(&mut self, cutoff: f32) {
        let cutoff = cutoff.max(0.0);
        if cutoff == self.cutoff {
            return;
        }
        self.cutoff = cutoff;
        self.update_coefficients();
    }

    /// Changing the rate also drops the filter history.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.update_coefficients();
        self.clear();
    }

    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_mapping() {
        assert!((pitch_to_frequency(5.0) - 440.0).abs() < 1e-3);
        assert!((pitch_to_frequency(0.0) - 13.75).abs() < 1e-3);
        assert!((pitch_to_frequency(10.0) - 14080.0).abs() < 0.5);
        assert!((pitch_to_frequency(6.0) - 880.0).abs() < 1e-2);
    }

    #[test]
    fn pitch_clamps() {
        assert_eq!(clamp_pitch(-3.0), 0.0);
        assert_eq!(clamp_pitch(12.0), 10.0);
        assert_eq!(clamp_pitch(f32::NAN), 0.0);
        assert_eq!(clamp_pitch(7.25), 7.25);
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut f = OnePoleLowpass::new(1000.0, 48000.0);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = f.process(1.0);
        }
        assert!((out - 1.0).abs() < 1e-3, "Lowpass should pass DC, got {out}");
    }

    #[test]
    fn lowpass_coefficients_match_exponential() {
        let f = OnePoleLowpass::new(2000.0, 48000.0);
        let b = (-2.0 * PI * 2000.0 / 48000.0).exp();
        assert!((f.b - b).abs() < 1e-6);
        assert!((f.a - (1.0 - b)).abs() < 1e-6);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut f = OnePoleHighpass::new(20.0, 48000.0);
        let mut out = 1.0;
        for _ in 0..48000 {
            out = f.process(1.0);
        }
        assert!(out.abs() < 1e-3, "Highpass should block DC, got {out}");
    }

    #[test]
    fn highpass_passes_transient() {
        let mut f = OnePoleHighpass::new(20.0, 48000.0);
        let first = f.process(1.0);
        assert!(first > 0.99, "DC blocker should pass a step edge, got {first}");
    }

    #[test]
    fn lowpass_attenuates_high_freq() {
        let mut f = OnePoleLowpass::new(100.0, 48000.0);
        let mut max_out = 0.0f32;
        for i in 0..9600 {
            let x = (2.0 * PI * 10000.0 * i as f32 / 48000.0).sin();
            let y = f.process(x);
            if i > 4800 {
                max_out = max_out.max(y.abs());
            }
        }
        assert!(max_out < 0.02, "100 Hz lowpass left {max_out} at 10 kHz");
    }

    #[test]
    fn same_cutoff_is_cached() {
        let mut f = OnePoleLowpass::new(500.0, 48000.0);
        let b = f.b;
        f.b = 0.123;
        f.set_cutoff(500.0);
        assert_eq!(f.b, 0.123, "Equal cutoff must not recompute");
        f.set_cutoff(501.0);
        assert!((f.b - b).abs() < 1e-3 && f.b != 0.123);
    }

    #[test]
    fn sample_rate_change_recomputes() {
        let mut f = OnePoleHighpass::new(100.0, 48000.0);
        let b48 = f.b1;
        f.set_sample_rate(44100.0);
        assert!(f.b1 < b48);
        assert_eq!(f.cutoff(), 100.0);
    }

    #[test]
    fn outputs_stay_finite() {
        let mut lp = OnePoleLowpass::new(0.0, 48000.0);
        let mut hp = OnePoleHighpass::new(30000.0, 48000.0);
        for i in 0..10000 {
            let x = if i % 100 == 0 { 1.0 } else { 0.0 };
            assert!(lp.process(x).is_finite());
            assert!(hp.process(x).is_finite());
        }
    }
}
