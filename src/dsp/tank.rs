//! Reverb tank — the recirculating figure-eight network of the Dattorro plate.
//!
//! Each channel runs: modulated all-pass → delay → high-cut → low-cut →
//! decay → modulated all-pass → delay, and its last delay feeds the other
//! channel one sample later. The stereo output is a signed sum of taps
//! taken from both channels.
//!
//! All delay constants are tuned at 29 761 Hz and rescaled to the running
//! sample rate, so the tail keeps the same character at any rate.

use log::{debug, warn};

use super::allpass::AllpassFilter;
use super::delay::FractionalDelayLine;
use super::filter::{OnePoleHighpass, OnePoleLowpass};
use super::oscillator::ModulationOscillator;
use crate::error::{ReverbResult, check_bounds};

/// Sample rate the delay and tap constants were tuned at.
pub const REFERENCE_SAMPLE_RATE: f32 = 29761.0;
/// Smallest time scale the tank accepts; zero would collapse every delay.
pub const MIN_TIME_SCALE: f32 = 0.0001;

/// Peak all-pass excursion in reference samples at mod depth 1.
const LFO_MAX_EXCURSION: f32 = 16.0;
const OUTPUT_DC_CUTOFF: f32 = 20.0;
const DEFAULT_HIGH_CUT: f32 = 22049.0;
const DEFAULT_LOW_CUT: f32 = 10.0;

/// Delay lengths of one channel, in reference samples.
#[derive(Debug, Clone, Copy)]
struct ChannelTimes {
    apf1: f32,
    delay1: f32,
    apf2: f32,
    delay2: f32,
}

const LEFT_TIMES: ChannelTimes = ChannelTimes {
    apf1: 672.0,
    delay1: 4453.0,
    apf2: 1800.0,
    delay2: 3720.0,
};

const RIGHT_TIMES: ChannelTimes = ChannelTimes {
    apf1: 908.0,
    delay1: 4217.0,
    apf2: 2656.0,
    delay2: 3163.0,
};

/// Output tap offsets for one output channel. "Own" taps are read from
/// the channel producing the output, "other" taps from the opposite one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutputTaps {
    own_delay1: [usize; 2],
    own_apf2: usize,
    own_delay2: usize,
    other_delay1: usize,
    other_apf2: usize,
    other_delay2: usize,
}

impl OutputTaps {
    fn scaled(&self, scale: f32) -> Self {
        let s = |tap: usize| (tap as f32 * scale) as usize;
        Self {
            own_delay1: [s(self.own_delay1[0]), s(self.own_delay1[1])],
            own_apf2: s(self.own_apf2),
            own_delay2: s(self.own_delay2),
            other_delay1: s(self.other_delay1),
            other_apf2: s(self.other_apf2),
            other_delay2: s(self.other_delay2),
        }
    }

    fn max(&self) -> usize {
        [
            self.own_delay1[0],
            self.own_delay1[1],
            self.own_apf2,
            self.own_delay2,
            self.other_delay1,
            self.other_apf2,
            self.other_delay2,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

// Tap table from Dattorro (1997), in reference samples.
const LEFT_TAPS: OutputTaps = OutputTaps {
    own_delay1: [266, 2974],
    own_apf2: 1913,
    own_delay2: 1996,
    other_delay1: 1990,
    other_apf2: 187,
    other_delay2: 1066,
};

const RIGHT_TAPS: OutputTaps = OutputTaps {
    own_delay1: [353, 3627],
    own_apf2: 1228,
    own_delay2: 2673,
    other_delay1: 2111,
    other_apf2: 335,
    other_delay2: 121,
};

/// LFO rate (Hz) and starting phase for the first and second all-pass of each channel.
const LEFT_LFOS: [(f32, f32); 2] = [(0.10, 0.0), (0.15, 0.25)];
const RIGHT_LFOS: [(f32, f32); 2] = [(0.12, 0.5), (0.18, 0.75)];

/// Whether the tank is accepting new input or holding its tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeState {
    Active,
    Frozen,
}

impl FreezeState {
    /// Direction the fade coefficient moves each sample.
    fn fade_direction(self) -> f32 {
        match self {
            FreezeState::Active => 1.0,
            FreezeState::Frozen => -1.0,
        }
    }
}

/// One half of the figure-eight.
#[derive(Debug, Clone)]
struct TankChannel {
    times: ChannelTimes,
    reference_taps: OutputTaps,
    taps: OutputTaps,

    apf1: AllpassFilter,
    delay1: FractionalDelayLine,
    high_cut: OnePoleLowpass,
    low_cut: OnePoleHighpass,
    apf2: AllpassFilter,
    delay2: FractionalDelayLine,
    output_dc_block: OnePoleHighpass,
    lfos: [ModulationOscillator; 2],

    /// Unmodulated all-pass lengths at the current rate and time scale.
    apf1_time: f32,
    apf2_time: f32,
}

impl TankChannel {
    fn new(
        times: ChannelTimes,
        reference_taps: OutputTaps,
        lfos: [(f32, f32); 2],
        sample_rate: f32,
    ) -> Self {
        let lfo = |(freq, phase): (f32, f32)| {
            let mut osc = ModulationOscillator::new(sample_rate, freq, phase);
            osc.set_rev_point(0.5);
            osc
        };
        Self {
            times,
            reference_taps,
            taps: reference_taps,
            apf1: AllpassFilter::new(1, 0.0, 0.0),
            delay1: FractionalDelayLine::new(1, 0.0),
            high_cut: OnePoleLowpass::new(DEFAULT_HIGH_CUT, sample_rate),
            low_cut: OnePoleHighpass::new(DEFAULT_LOW_CUT, sample_rate),
            apf2: AllpassFilter::new(1, 0.0, 0.0),
            delay2: FractionalDelayLine::new(1, 0.0),
            output_dc_block: OnePoleHighpass::new(OUTPUT_DC_CUTOFF, sample_rate),
            lfos: [lfo(lfos[0]), lfo(lfos[1])],
            apf1_time: 0.0,
            apf2_time: 0.0,
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32, scale: f32) {
        self.high_cut.set_sample_rate(sample_rate);
        self.low_cut.set_sample_rate(sample_rate);
        self.output_dc_block.set_sample_rate(sample_rate);
        for lfo in &mut self.lfos {
            lfo.set_sample_rate(sample_rate);
        }
        self.taps = self.reference_taps.scaled(scale);
    }

    /// Replace every buffer with one sized for `scale`. Gains carry over.
    fn allocate(&mut self, scale: f32, max_time_scale: f32, padding: f32, max_tap: usize) {
        let capacity = |time: f32| {
            (scale * (time * max_time_scale + padding)).ceil() as usize + max_tap + 2
        };
        self.apf1 = AllpassFilter::new(capacity(self.times.apf1), 0.0, self.apf1.gain());
        self.delay1 = FractionalDelayLine::new(capacity(self.times.delay1), 0.0);
        self.apf2 = AllpassFilter::new(capacity(self.times.apf2), 0.0, self.apf2.gain());
        self.delay2 = FractionalDelayLine::new(capacity(self.times.delay2), 0.0);
    }

    fn rescale_times(&mut self, factor: f32) {
        self.apf1_time = self.times.apf1 * factor;
        self.apf2_time = self.times.apf2 * factor;
        self.apf1.set_delay_time(self.apf1_time);
        self.apf2.set_delay_time(self.apf2_time);
        self.delay1.set_delay_time(self.times.delay1 * factor);
        self.delay2.set_delay_time(self.times.delay2 * factor);
    }

    #[inline]
    fn tick_modulation(&mut self, excursion: f32) {
        let [lfo1, lfo2] = &mut self.lfos;
        self.apf1
            .set_delay_time(lfo1.process() * excursion + self.apf1_time);
        self.apf2
            .set_delay_time(lfo2.process() * excursion + self.apf2_time);
    }

    /// Run one sample through the channel. `fade` blends the unfiltered
    /// (0) and damped (1) delay-1 output.
    #[inline]
    fn process(&mut self, input: f32, decay: f32, fade: f32) {
        let diffused = self.apf1.process(input);
        let delayed = self.delay1.process(diffused);
        let damped = self.low_cut.process(self.high_cut.process(delayed));
        let blended = (delayed * (1.0 - fade) + damped * fade) * decay;
        let diffused = self.apf2.process(blended);
        self.delay2.process(diffused);
    }

    /// Signed tap sum for this channel's output, before DC blocking.
    #[inline]
    fn tap_sum(&self, other: &TankChannel) -> f32 {
        let t = &self.taps;
        self.apf1.output() + self.delay1.tap(t.own_delay1[0]) + self.delay1.tap(t.own_delay1[1])
            - self.apf2.delay().tap(t.own_apf2)
            + self.delay2.tap(t.own_delay2)
            - other.delay1.tap(t.other_delay1)
            - other.apf2.delay().tap(t.other_apf2)
            - other.delay2.tap(t.other_delay2)
    }

    fn set_diffusion(&mut self, diffusion: f32) {
        // The inverted first all-pass is what decorrelates the two channels.
        self.apf1.set_gain(-diffusion);
        self.apf2.set_gain(diffusion);
    }

    fn clear(&mut self) {
        self.apf1.clear();
        self.delay1.clear();
        self.high_cut.clear();
        self.low_cut.clear();
        self.apf2.clear();
        self.delay2.clear();
        self.output_dc_block.clear();
        for lfo in &mut self.lfos {
            lfo.reset();
        }
    }
}

/// The stereo plate tank.
///
/// Buffers are sized for `max_time_scale` and the maximum modulation
/// excursion at the current sample rate, so only `set_sample_rate`
/// allocates.
#[derive(Debug, Clone)]
pub struct ReverbTank {
    max_sample_rate: f32,
    max_mod_depth: f32,
    max_time_scale: f32,

    sample_rate: f32,
    sample_rate_scale: f32,
    time_scale: f32,

    decay: f32,
    diffusion: f32,
    mod_speed: f32,
    mod_depth: f32,
    mod_shape: f32,
    excursion: f32,

    left: TankChannel,
    right: TankChannel,
    left_sum: f32,
    right_sum: f32,

    freeze_state: FreezeState,
    fade: f32,
    fade_step: f32,
}

impl ReverbTank {
    /// Create a tank running at `max_sample_rate`.
    ///
    /// # Errors
    /// Fails if any bound is non-finite, the sample rate is below 1 Hz, the
    /// mod depth is negative, or the time scale is not positive.
    pub fn new(max_sample_rate: f32, max_mod_depth: f32, max_time_scale: f32) -> ReverbResult<Self> {
        check_bounds(max_sample_rate, max_mod_depth, max_time_scale)?;

        let mut tank = Self {
            max_sample_rate,
            max_mod_depth,
            max_time_scale,
            sample_rate: max_sample_rate,
            sample_rate_scale: max_sample_rate / REFERENCE_SAMPLE_RATE,
            time_scale: 1.0_f32.min(max_time_scale),
            decay: 0.5,
            diffusion: 0.7,
            mod_speed: 1.0,
            mod_depth: 0.0,
            mod_shape: 0.5,
            excursion: 0.0,
            left: TankChannel::new(LEFT_TIMES, LEFT_TAPS, LEFT_LFOS, max_sample_rate),
            right: TankChannel::new(RIGHT_TIMES, RIGHT_TAPS, RIGHT_LFOS, max_sample_rate),
            left_sum: 0.0,
            right_sum: 0.0,
            freeze_state: FreezeState::Active,
            fade: 1.0,
            fade_step: 1.0 / max_sample_rate,
        };
        tank.set_diffusion(tank.diffusion);
        tank.set_sample_rate(max_sample_rate);
        Ok(tank)
    }

    /// Process one stereo sample.
    #[inline]
    pub fn process(&mut self, left_in: f32, right_in: f32) -> (f32, f32) {
        self.left.tick_modulation(self.excursion);
        self.right.tick_modulation(self.excursion);

        // Freezing shuts off the input and pulls the loop gain up to unity,
        // both along the same fade as the damping blend.
        let fade = self.fade;
        let decay = self.decay + (1.0 - self.decay) * (1.0 - fade);

        self.left_sum += left_in * fade;
        self.right_sum += right_in * fade;

        self.left.process(self.left_sum, decay, fade);
        self.right.process(self.right_sum, decay, fade);

        // Cross-feed is consumed on the next sample.
        self.right_sum = self.left.delay2.output() * decay;
        self.left_sum = self.right.delay2.output() * decay;

        let left_taps = self.left.tap_sum(&self.right);
        let right_taps = self.right.tap_sum(&self.left);
        let left_out = self.left.output_dc_block.process(left_taps) * 0.5;
        let right_out = self.right.output_dc_block.process(right_taps) * 0.5;

        self.fade = (self.fade + self.fade_step * self.freeze_state.fade_direction()).clamp(0.0, 1.0);

        (left_out, right_out)
    }

    /// Change the running sample rate, clamped to `[1, max_sample_rate]`.
    ///
    /// Every delay buffer is reallocated for the new rate and all state is
    /// cleared; the tail is not carried across. Not real-time safe.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !sample_rate.is_finite() {
            warn!("Ignoring non-finite tank sample rate {sample_rate}");
            return;
        }
        let clamped = sample_rate.clamp(1.0, self.max_sample_rate);
        if clamped != sample_rate {
            warn!("Tank sample rate {sample_rate} Hz clamped to {clamped} Hz");
        }

        self.sample_rate = clamped;
        self.sample_rate_scale = clamped / REFERENCE_SAMPLE_RATE;
        self.fade_step = 1.0 / clamped;

        let scale = self.sample_rate_scale;
        self.left.set_sample_rate(clamped, scale);
        self.right.set_sample_rate(clamped, scale);

        let padding = self.max_mod_depth * LFO_MAX_EXCURSION;
        let max_tap = self.left.taps.max().max(self.right.taps.max());
        self.left.allocate(scale, self.max_time_scale, padding, max_tap);
        self.right.allocate(scale, self.max_time_scale, padding, max_tap);
        debug!(
            "Tank buffers reallocated for {clamped} Hz ({} + {} samples of delay)",
            self.left.delay1.capacity() + self.left.delay2.capacity(),
            self.right.delay1.capacity() + self.right.delay2.capacity(),
        );

        self.rescale_times();
        self.set_mod_depth(self.mod_depth);
        self.clear();
    }

    /// Set the global multiplier on every delay length, clamped to
    /// `[MIN_TIME_SCALE, max_time_scale]`. Does not allocate.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = if time_scale.is_nan() {
            MIN_TIME_SCALE
        } else {
            time_scale.clamp(MIN_TIME_SCALE, self.max_time_scale)
        };
        self.rescale_times();
    }

    fn rescale_times(&mut self) {
        let factor = self.time_scale * self.sample_rate_scale;
        self.left.rescale_times(factor);
        self.right.rescale_times(factor);
    }

    /// Set the loop gain, clamped to `[0, 1]`.
    pub fn set_decay(&mut self, decay: f32) {
        self.decay = if decay.is_nan() { 0.0 } else { decay.clamp(0.0, 1.0) };
    }

    /// Set the tank all-pass gain. The first all-pass of each channel gets
    /// the negated value.
    pub fn set_diffusion(&mut self, diffusion: f32) {
        self.diffusion = diffusion;
        self.left.set_diffusion(diffusion);
        self.right.set_diffusion(diffusion);
    }

    /// Multiply every LFO's base rate by `speed`.
    pub fn set_mod_speed(&mut self, speed: f32) {
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        self.mod_speed = speed;
        for (channel, bases) in [(&mut self.left, LEFT_LFOS), (&mut self.right, RIGHT_LFOS)] {
            for (lfo, (freq, _)) in channel.lfos.iter_mut().zip(bases) {
                lfo.set_frequency(freq * speed);
            }
        }
    }

    /// Set the modulation depth, clamped to `[0, max_mod_depth]`.
    pub fn set_mod_depth(&mut self, depth: f32) {
        self.mod_depth = if depth.is_nan() {
            0.0
        } else {
            depth.clamp(0.0, self.max_mod_depth)
        };
        self.excursion = self.mod_depth * LFO_MAX_EXCURSION * self.sample_rate_scale;
    }

    /// Set the LFO reverse point (0 = falling saw, 0.5 = triangle, 1 = rising saw).
    pub fn set_mod_shape(&mut self, shape: f32) {
        for lfo in self.left.lfos.iter_mut().chain(self.right.lfos.iter_mut()) {
            lfo.set_rev_point(shape);
        }
        self.mod_shape = self.left.lfos[0].rev_point();
    }

    /// Low-pass cutoff inside the loop, in Hz.
    pub fn set_high_cut_frequency(&mut self, frequency: f32) {
        self.left.high_cut.set_cutoff(frequency);
        self.right.high_cut.set_cutoff(frequency);
    }

    /// High-pass cutoff inside the loop, in Hz.
    pub fn set_low_cut_frequency(&mut self, frequency: f32) {
        self.left.low_cut.set_cutoff(frequency);
        self.right.low_cut.set_cutoff(frequency);
    }

    /// Start or stop holding the tail. The change ramps in over one second.
    pub fn freeze(&mut self, frozen: bool) {
        self.freeze_state = if frozen {
            FreezeState::Frozen
        } else {
            FreezeState::Active
        };
    }

    /// Zero every buffer, filter, and feedback accumulator, and rewind the LFOs.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.left_sum = 0.0;
        self.right_sum = 0.0;
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn max_sample_rate(&self) -> f32 {
        self.max_sample_rate
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn diffusion(&self) -> f32 {
        self.diffusion
    }

    pub fn mod_speed(&self) -> f32 {
        self.mod_speed
    }

    pub fn mod_depth(&self) -> f32 {
        self.mod_depth
    }

    /// The reverse point actually in use, after clamping.
    pub fn mod_shape(&self) -> f32 {
        self.mod_shape
    }

    pub fn freeze_state(&self) -> FreezeState {
        self.freeze_state
    }

    /// Current freeze crossfade: 1 when fully active, 0 when fully frozen.
    pub fn fade(&self) -> f32 {
        self.fade
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank(sample_rate: f32) -> ReverbTank {
        ReverbTank::new(sample_rate, 16.0, 4.0).unwrap()
    }

    fn peak(samples: &[(f32, f32)]) -> f32 {
        samples
            .iter()
            .fold(0.0f32, |m, &(l, r)| m.max(l.abs()).max(r.abs()))
    }

    fn run(tank: &mut ReverbTank, impulse_len: usize, total: usize) -> Vec<(f32, f32)> {
        (0..total)
            .map(|i| {
                let x = if i < impulse_len { 1.0 } else { 0.0 };
                tank.process(x, x)
            })
            .collect()
    }

    #[test]
    fn rejects_invalid_bounds() {
        assert!(ReverbTank::new(0.0, 16.0, 4.0).is_err());
        assert!(ReverbTank::new(48000.0, -1.0, 4.0).is_err());
        assert!(ReverbTank::new(48000.0, 16.0, 0.0).is_err());
    }

    #[test]
    fn tap_table_matches_reference() {
        assert_eq!(LEFT_TAPS.max(), 2974);
        assert_eq!(RIGHT_TAPS.max(), 3627);
        let scaled = RIGHT_TAPS.scaled(48000.0 / REFERENCE_SAMPLE_RATE);
        assert_eq!(scaled.own_delay1[1], (3627.0 * 48000.0 / 29761.0) as usize);
    }

    #[test]
    fn buffers_cover_max_delay_and_taps() {
        let t = tank(48000.0);
        let scale = 48000.0 / REFERENCE_SAMPLE_RATE;
        let need = (LEFT_TIMES.delay1 * 4.0 * scale) as usize;
        assert!(t.left.delay1.capacity() > need);
        assert!(t.left.delay1.capacity() > t.left.taps.max());
        assert!(t.right.apf2.delay().capacity() > t.left.taps.other_apf2);
    }

    #[test]
    fn time_scale_is_clamped() {
        let mut t = tank(48000.0);
        t.set_time_scale(0.0);
        assert_eq!(t.time_scale(), MIN_TIME_SCALE);
        t.set_time_scale(100.0);
        assert_eq!(t.time_scale(), 4.0);
        t.set_time_scale(2.0);
        let expected = LEFT_TIMES.delay1 * 2.0 * 48000.0 / REFERENCE_SAMPLE_RATE;
        assert!((t.left.delay1.delay_time() - expected).abs() < 1.0);
    }

    #[test]
    fn decay_and_depth_are_clamped() {
        let mut t = tank(48000.0);
        t.set_decay(1.5);
        assert_eq!(t.decay(), 1.0);
        t.set_decay(-0.5);
        assert_eq!(t.decay(), 0.0);
        t.set_mod_depth(100.0);
        assert_eq!(t.mod_depth(), 16.0);
        t.set_mod_depth(f32::NAN);
        assert_eq!(t.mod_depth(), 0.0);
    }

    #[test]
    fn diffusion_sign_convention() {
        let mut t = tank(48000.0);
        t.set_diffusion(0.6);
        assert!((t.left.apf1.gain() + 0.6).abs() < 1e-6);
        assert!((t.left.apf2.gain() - 0.6).abs() < 1e-6);
        assert!((t.right.apf1.gain() + 0.6).abs() < 1e-6);
        assert!((t.right.apf2.gain() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn gains_survive_reallocation() {
        let mut t = tank(48000.0);
        t.set_diffusion(0.55);
        t.set_sample_rate(44100.0);
        assert!((t.right.apf2.gain() - 0.55).abs() < 1e-6);
    }

    #[test]
    fn output_is_stereo_and_decorrelated() {
        let mut t = tank(48000.0);
        t.set_decay(0.7);
        let out = run(&mut t, 1, 48000);
        assert!(peak(&out) > 0.0);
        let differs = out.iter().any(|&(l, r)| (l - r).abs() > 1e-4);
        assert!(differs, "Left and right outputs should differ");
    }

    #[test]
    fn decays_when_decay_below_one() {
        let mut t = tank(48000.0);
        t.set_decay(0.6);
        t.set_mod_depth(1.0);
        let out = run(&mut t, 1, 480_000);
        let early = peak(&out[..48000]);
        let late = peak(&out[432_000..]);
        assert!(early > 0.0);
        assert!(late < early * 1e-3, "early {early}, late {late}");
        assert!(out.iter().all(|&(l, r)| l.is_finite() && r.is_finite()));
    }

    #[test]
    fn unity_decay_stays_bounded() {
        let mut t = tank(48000.0);
        t.set_decay(1.0);
        let out = run(&mut t, 1, 480_000);
        let early = peak(&out[..96000]);
        let late = peak(&out[384_000..]);
        assert!(early > 0.0);
        assert!(late <= early * 1.01, "early {early}, late {late}");
    }

    #[test]
    fn freeze_ramps_fade() {
        let mut t = tank(1000.0);
        assert_eq!(t.fade(), 1.0);
        t.freeze(true);
        assert_eq!(t.freeze_state(), FreezeState::Frozen);
        for _ in 0..500 {
            t.process(0.0, 0.0);
        }
        assert!((t.fade() - 0.5).abs() < 1e-3, "fade {}", t.fade());
        for _ in 0..600 {
            t.process(0.0, 0.0);
        }
        assert_eq!(t.fade(), 0.0);
        t.freeze(false);
        for _ in 0..1100 {
            t.process(0.0, 0.0);
        }
        assert_eq!(t.fade(), 1.0);
    }

    #[test]
    fn frozen_tank_ignores_new_input() {
        let mut t = tank(8000.0);
        t.freeze(true);
        for _ in 0..10000 {
            t.process(0.0, 0.0);
        }
        let out = run(&mut t, 100, 8000);
        assert!(peak(&out) == 0.0, "frozen tank leaked {}", peak(&out));
    }

    #[test]
    fn clear_silences_tail() {
        let mut t = tank(48000.0);
        t.set_decay(0.9);
        run(&mut t, 1, 20000);
        t.clear();
        let out = run(&mut t, 0, 20000);
        assert_eq!(peak(&out), 0.0);
    }

    #[test]
    fn sample_rate_is_clamped_to_max() {
        let mut t = tank(48000.0);
        t.set_sample_rate(96000.0);
        assert_eq!(t.sample_rate(), 48000.0);
        t.set_sample_rate(0.0);
        assert_eq!(t.sample_rate(), 1.0);
        t.set_sample_rate(f32::NAN);
        assert_eq!(t.sample_rate(), 1.0);
    }

    #[test]
    fn extreme_mod_shape_is_finite() {
        for &shape in &[0.0, 1.0] {
            let mut t = tank(48000.0);
            t.set_mod_shape(shape);
            t.set_mod_depth(8.0);
            t.set_mod_speed(8.0);
            assert!(t.mod_shape() > 0.0 && t.mod_shape() < 1.0);
            let out = run(&mut t, 1, 96000);
            assert!(out.iter().all(|&(l, r)| l.is_finite() && r.is_finite()));
        }
    }
}
