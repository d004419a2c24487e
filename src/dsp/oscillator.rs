//! Triangle/sawtooth modulation LFO with an adjustable reverse point.
//!
//! The phase rises from 0 to 1 each cycle. Below the reverse point the
//! output climbs; above it the output falls. Moving the reverse point
//! skews a symmetric triangle into a shark-fin or sawtooth.

/// Reverse point bounds. At exactly 0 or 1 the rise or fall slope divides by zero.
pub const MIN_REV_POINT: f32 = 0.0001;
pub const MAX_REV_POINT: f32 = 0.999;

/// Which half of the cycle the oscillator is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slope {
    Rising,
    Falling,
}

/// A shark-fin low-frequency oscillator producing values in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct ModulationOscillator {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    initial_phase: f32,
    step_size: f32,
    rev_point: f32,
    rise_rate: f32,
    fall_rate: f32,
    slope: Slope,
    output: f32,
}

impl ModulationOscillator {
    /// Create an oscillator starting at `phase` (cycles, wrapped into `[0, 1)`).
    pub fn new(sample_rate: f32, frequency: f32, phase: f32) -> Self {
        let phase = if phase.is_finite() { phase.rem_euclid(1.0) } else { 0.0 };
        let mut osc = Self {
            sample_rate: sample_rate.max(1.0),
            frequency: 0.0,
            phase,
            initial_phase: phase,
            step_size: 0.0,
            rev_point: 0.5,
            rise_rate: 2.0,
            fall_rate: -2.0,
            slope: Slope::Rising,
            output: 0.0,
        };
        osc.set_frequency(frequency);
        osc.set_rev_point(0.5);
        osc
    }

    /// Generate the next sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if self.phase > 1.0 {
            self.phase = self.phase.fract();
            self.slope = Slope::Rising;
        }
        if self.phase >= self.rev_point {
            self.slope = Slope::Falling;
        }

        let unipolar = match self.slope {
            Slope::Rising => self.phase * self.rise_rate,
            Slope::Falling => self.phase * self.fall_rate - self.fall_rate,
        };

        self.phase += self.step_size;
        self.output = unipolar * 2.0 - 1.0;
        self.output
    }

    /// The value returned by the most recent `process` call.
    pub fn output(&self) -> f32 {
        self.output
    }

    pub fn slope(&self) -> Slope {
        self.slope
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set the rate in Hz. Negative and non-finite rates stop the oscillator.
    pub fn set_frequency(&mut self, frequency: f32) {
        let frequency = if frequency.is_finite() { frequency.max(0.0) } else { 0.0 };
        if frequency == self.frequency {
            return;
        }
        self.frequency = frequency;
        self.step_size = self.frequency / self.sample_rate;
    }

    pub fn rev_point(&self) -> f32 {
        self.rev_point
    }

    /// Set where in the cycle the output turns around, clamped to
    /// `[MIN_REV_POINT, MAX_REV_POINT]`.
    pub fn set_rev_point(&mut self, rev_point: f32) {
        self.rev_point = if rev_point.is_nan() {
            0.5
        } else {
            rev_point.clamp(MIN_REV_POINT, MAX_REV_POINT)
        };
        self.rise_rate = 1.0 / self.rev_point;
        self.fall_rate = -1.0 / (1.0 - self.rev_point);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.step_size = self.frequency / self.sample_rate;
    }

    /// Return to the starting phase.
    pub fn reset(&mut self) {
        self.phase = self.initial_phase;
        self.slope = Slope::Rising;
        self.output = 0.0;
    }
}
