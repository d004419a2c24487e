//! First-order all-pass section built on a fractional delay line.
//!
//! Used for diffusion: the magnitude response is flat for any `|gain| < 1`,
//! so cascades smear transients without colouring the timbre.

use super::delay::FractionalDelayLine;

/// Largest gain magnitude accepted; unity gain puts the pole on the unit circle.
pub const MAX_GAIN: f32 = 0.9999;

/// A direct-form all-pass filter whose delay length can be modulated.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: FractionalDelayLine,
    gain: f32,
    output: f32,
}

impl AllpassFilter {
    /// Create an all-pass with room for `max_delay` samples, initially
    /// delaying by `delay_time` samples.
    pub fn new(max_delay: usize, delay_time: f32, gain: f32) -> Self {
        let mut filter = Self {
            delay: FractionalDelayLine::new(max_delay, delay_time),
            gain: 0.0,
            output: 0.0,
        };
        filter.set_gain(gain);
        filter
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.output();
        let sum = input + delayed * self.gain;
        self.output = delayed - sum * self.gain;
        self.delay.process(sum);
        self.output
    }

    /// The value returned by the most recent `process` call.
    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Set the feedback/feedforward gain, clamped to `[-MAX_GAIN, MAX_GAIN]`.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = if gain.is_finite() {
            gain.clamp(-MAX_GAIN, MAX_GAIN)
        } else {
            0.0
        };
    }

    #[inline]
    pub fn set_delay_time(&mut self, delay_time: f32) {
        self.delay.set_delay_time(delay_time);
    }

    /// The embedded delay line, for reading output taps.
    #[inline]
    pub fn delay(&self) -> &FractionalDelayLine {
        &self.delay
    }

    pub fn clear(&mut self) {
        self.delay.clear();
        self.output = 0.0;
    }
}
