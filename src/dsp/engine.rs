//! Reverb Engine — input conditioning in front of the plate tank.
//!
//! Per sample: DC-block both inputs, sum to mono, low-pass then high-pass,
//! pre-delay, four cascaded diffusion all-passes, then feed the same mono
//! signal into both tank inputs.
//!
//! Everything is allocated in `new` (and again by `set_sample_rate`); the
//! per-sample path never allocates, locks, or logs.

use log::{info, warn};

use super::allpass::AllpassFilter;
use super::delay::FractionalDelayLine;
use super::filter::{OnePoleHighpass, OnePoleLowpass, clamp_pitch, pitch_to_frequency};
use super::tank::{FreezeState, REFERENCE_SAMPLE_RATE, ReverbTank};
use crate::error::{ReverbResult, check_bounds};
use crate::params::ReverbParams;

/// Smallest time scale the engine forwards to the tank.
pub const MIN_TIME_SCALE: f32 = 0.01;
/// Longest pre-delay the buffer holds, in seconds.
pub const MAX_PRE_DELAY: f32 = 4.0;

const INPUT_DC_CUTOFF: f32 = 20.0;

/// Input diffusion all-pass lengths (reference samples) and gains.
const INPUT_DIFFUSERS: [(f32, f32); 4] = [(141.0, 0.75), (107.0, 0.75), (379.0, 0.625), (277.0, 0.625)];
/// Diffuser buffers hold this many times their nominal length.
const DIFFUSER_HEADROOM: f32 = 8.0;

/// The complete plate reverb: input conditioning plus the tank.
#[derive(Debug, Clone)]
pub struct ReverbEngine {
    max_sample_rate: f32,
    sample_rate: f32,
    reference_scale: f32,

    left_dc_block: OnePoleHighpass,
    right_dc_block: OnePoleHighpass,
    input_lowpass: OnePoleLowpass,
    input_highpass: OnePoleHighpass,
    pre_delay: FractionalDelayLine,
    diffusers: [AllpassFilter; 4],
    tank: ReverbTank,

    /// Blend between the pre-diffusion (0) and diffused (1) signal.
    diffuse_input: f32,
    pre_delay_time: f32,
    input_low_cut_pitch: f32,
    input_high_cut_pitch: f32,
    tank_low_cut_pitch: f32,
    tank_high_cut_pitch: f32,

    left_out: f32,
    right_out: f32,
}

impl ReverbEngine {
    /// Create an engine whose buffers are sized for the given worst case.
    /// It starts at `max_sample_rate` with [`ReverbParams::default`] applied.
    ///
    /// # Errors
    /// Fails fast on non-finite bounds, a sample rate below 1 Hz, a negative
    /// mod depth, or a non-positive time scale.
    pub fn new(max_sample_rate: f32, max_mod_depth: f32, max_time_scale: f32) -> ReverbResult<Self> {
        check_bounds(max_sample_rate, max_mod_depth, max_time_scale)?;

        let reference_scale = max_sample_rate / REFERENCE_SAMPLE_RATE;
        let diffusers = INPUT_DIFFUSERS.map(|(time, gain)| {
            let capacity = (DIFFUSER_HEADROOM * time * reference_scale).ceil() as usize + 1;
            AllpassFilter::new(capacity, time * reference_scale, gain)
        });
        let pre_delay_capacity = (MAX_PRE_DELAY * max_sample_rate).ceil() as usize + 2;

        let mut engine = Self {
            max_sample_rate,
            sample_rate: max_sample_rate,
            reference_scale,
            left_dc_block: OnePoleHighpass::new(INPUT_DC_CUTOFF, max_sample_rate),
            right_dc_block: OnePoleHighpass::new(INPUT_DC_CUTOFF, max_sample_rate),
            input_lowpass: OnePoleLowpass::new(pitch_to_frequency(10.0), max_sample_rate),
            input_highpass: OnePoleHighpass::new(pitch_to_frequency(0.0), max_sample_rate),
            pre_delay: FractionalDelayLine::new(pre_delay_capacity, 0.0),
            diffusers,
            tank: ReverbTank::new(max_sample_rate, max_mod_depth, max_time_scale)?,
            diffuse_input: 1.0,
            pre_delay_time: 0.0,
            input_low_cut_pitch: 0.0,
            input_high_cut_pitch: 10.0,
            tank_low_cut_pitch: 0.0,
            tank_high_cut_pitch: 10.0,
            left_out: 0.0,
            right_out: 0.0,
        };
        ReverbParams::default().apply(&mut engine);

        info!(
            "Plate reverb ready: max {max_sample_rate} Hz, mod depth <= {max_mod_depth}, time scale <= {max_time_scale}"
        );
        Ok(engine)
    }

    /// Process one stereo sample and return the wet stereo output.
    #[inline]
    pub fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mono = self.left_dc_block.process(left) + self.right_dc_block.process(right);
        let filtered = self.input_highpass.process(self.input_lowpass.process(mono));
        let delayed = self.pre_delay.process(filtered);

        let mut diffused = delayed;
        for diffuser in &mut self.diffusers {
            diffused = diffuser.process(diffused);
        }
        let feed = delayed * (1.0 - self.diffuse_input) + diffused * self.diffuse_input;

        let (left_out, right_out) = self.tank.process(feed, feed);
        self.left_out = left_out;
        self.right_out = right_out;
        (left_out, right_out)
    }

    /// Process a block of stereo audio in-place.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (out_l, out_r) = self.process(*l, *r);
            *l = out_l;
            *r = out_r;
        }
    }

    /// Left output of the most recent `process` call.
    pub fn left_output(&self) -> f32 {
        self.left_out
    }

    /// Right output of the most recent `process` call.
    pub fn right_output(&self) -> f32 {
        self.right_out
    }

    /// Change the running sample rate, clamped to `[1, max_sample_rate]`.
    ///
    /// Reallocates the tank and clears every buffer. Call it outside the
    /// audio callback.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !sample_rate.is_finite() {
            warn!("Ignoring non-finite sample rate {sample_rate}");
            return;
        }
        let sample_rate = sample_rate.clamp(1.0, self.max_sample_rate);
        self.sample_rate = sample_rate;
        self.reference_scale = sample_rate / REFERENCE_SAMPLE_RATE;

        self.tank.set_sample_rate(sample_rate);
        for (diffuser, (time, _)) in self.diffusers.iter_mut().zip(INPUT_DIFFUSERS) {
            diffuser.set_delay_time(time * self.reference_scale);
        }
        self.left_dc_block.set_sample_rate(sample_rate);
        self.right_dc_block.set_sample_rate(sample_rate);
        self.input_lowpass.set_sample_rate(sample_rate);
        self.input_highpass.set_sample_rate(sample_rate);
        self.set_pre_delay(self.pre_delay_time);
        self.clear();
    }

    /// Global multiplier on every tank delay length, clamped to
    /// `[MIN_TIME_SCALE, max_time_scale]`.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        let time_scale = if time_scale.is_nan() {
            MIN_TIME_SCALE
        } else {
            time_scale.max(MIN_TIME_SCALE)
        };
        self.tank.set_time_scale(time_scale);
    }

    /// Pre-delay in seconds, clamped to `[0, MAX_PRE_DELAY]`.
    pub fn set_pre_delay(&mut self, seconds: f32) {
        self.pre_delay_time = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, MAX_PRE_DELAY)
        };
        self.pre_delay
            .set_delay_time(self.pre_delay_time * self.sample_rate);
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.tank.set_decay(decay);
    }

    pub fn set_tank_diffusion(&mut self, diffusion: f32) {
        self.tank.set_diffusion(diffusion);
    }

    /// Input high-pass cutoff as a pitch value (0..10).
    pub fn set_input_filter_low_cutoff_pitch(&mut self, pitch: f32) {
        self.input_low_cut_pitch = clamp_pitch(pitch);
        self.input_highpass
            .set_cutoff(pitch_to_frequency(self.input_low_cut_pitch));
    }

    /// Input low-pass cutoff as a pitch value (0..10).
    pub fn set_input_filter_high_cutoff_pitch(&mut self, pitch: f32) {
        self.input_high_cut_pitch = clamp_pitch(pitch);
        self.input_lowpass
            .set_cutoff(pitch_to_frequency(self.input_high_cut_pitch));
    }

    /// Tank high-pass cutoff as a pitch value (0..10).
    pub fn set_tank_filter_low_cut_frequency(&mut self, pitch: f32) {
        self.tank_low_cut_pitch = clamp_pitch(pitch);
        self.tank
            .set_low_cut_frequency(pitch_to_frequency(self.tank_low_cut_pitch));
    }

    /// Tank low-pass cutoff as a pitch value (0..10).
    pub fn set_tank_filter_high_cut_frequency(&mut self, pitch: f32) {
        self.tank_high_cut_pitch = clamp_pitch(pitch);
        self.tank
            .set_high_cut_frequency(pitch_to_frequency(self.tank_high_cut_pitch));
    }

    pub fn set_tank_mod_speed(&mut self, speed: f32) {
        self.tank.set_mod_speed(speed);
    }

    pub fn set_tank_mod_depth(&mut self, depth: f32) {
        self.tank.set_mod_depth(depth);
    }

    pub fn set_tank_mod_shape(&mut self, shape: f32) {
        self.tank.set_mod_shape(shape);
    }

    pub fn enable_input_diffusion(&mut self, enable: bool) {
        self.diffuse_input = if enable { 1.0 } else { 0.0 };
    }

    pub fn freeze(&mut self, frozen: bool) {
        self.tank.freeze(frozen);
    }

    /// Zero every buffer and accumulator so the next `process` starts silent.
    pub fn clear(&mut self) {
        self.left_dc_block.clear();
        self.right_dc_block.clear();
        self.input_lowpass.clear();
        self.input_highpass.clear();
        self.pre_delay.clear();
        for diffuser in &mut self.diffusers {
            diffuser.clear();
        }
        self.tank.clear();
        self.left_out = 0.0;
        self.right_out = 0.0;
    }

    /// Snapshot of every user-facing parameter as currently applied.
    pub fn params(&self) -> ReverbParams {
        ReverbParams {
            decay: self.tank.decay(),
            tank_diffusion: self.tank.diffusion(),
            input_diffusion: self.diffuse_input > 0.5,
            pre_delay: self.pre_delay_time,
            time_scale: self.tank.time_scale(),
            input_low_cut_pitch: self.input_low_cut_pitch,
            input_high_cut_pitch: self.input_high_cut_pitch,
            tank_low_cut_pitch: self.tank_low_cut_pitch,
            tank_high_cut_pitch: self.tank_high_cut_pitch,
            mod_speed: self.tank.mod_speed(),
            mod_depth: self.tank.mod_depth(),
            mod_shape: self.tank.mod_shape(),
            freeze: self.tank.freeze_state() == FreezeState::Frozen,
            meta: None,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn max_sample_rate(&self) -> f32 {
        self.max_sample_rate
    }

    pub fn tank(&self) -> &ReverbTank {
        &self.tank
    }
}
