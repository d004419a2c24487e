//! Fractional delay line — circular buffer with linear-interpolated reads.
//!
//! Capacity is fixed at construction. Changing the delay time only moves
//! the read head, so nothing here ever allocates once the line exists.

/// A fixed-capacity circular delay line with a fractional read head and
/// side-effect-free taps.
#[derive(Debug, Clone)]
pub struct FractionalDelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
    /// Integer part of the delay, always in `[0, capacity - 1]`.
    delay_int: usize,
    /// Fractional part of the delay, always in `[0, 1)`.
    delay_frac: f32,
    output: f32,
}

impl FractionalDelayLine {
    /// Create a delay line holding `capacity` samples, reading `delay_time`
    /// samples behind the write head.
    pub fn new(capacity: usize, delay_time: f32) -> Self {
        let mut line = Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
            delay_int: 0,
            delay_frac: 0.0,
            output: 0.0,
        };
        line.set_delay_time(delay_time);
        line
    }

    /// Number of samples the buffer holds.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current delay in samples, after clamping.
    pub fn delay_time(&self) -> f32 {
        self.delay_int as f32 + self.delay_frac
    }

    /// Set the read delay in samples. Out-of-range (and non-finite) values
    /// clamp silently into `[0, capacity - 1]`.
    #[inline]
    pub fn set_delay_time(&mut self, delay_time: f32) {
        let max = (self.buffer.len() - 1) as f32;
        let delay_time = if delay_time.is_finite() {
            delay_time.clamp(0.0, max)
        } else {
            0.0
        };
        self.delay_int = delay_time as usize;
        self.delay_frac = delay_time - self.delay_int as f32;
    }

    /// Write one sample and return the interpolated read.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.write_pos] = input;

        let read_pos = (self.write_pos + len - self.delay_int) % len;
        self.write_pos += 1;
        if self.write_pos >= len {
            self.write_pos = 0;
        }
        let older_pos = if read_pos == 0 { len - 1 } else { read_pos - 1 };

        let s0 = self.buffer[read_pos];
        let s1 = self.buffer[older_pos];
        self.output = s0 + self.delay_frac * (s1 - s0);
        self.output
    }

    /// The value returned by the most recent `process` call.
    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Read the sample written `offset` writes ago without moving anything.
    /// `tap(1)` is the most recent input.
    #[inline]
    pub fn tap(&self, offset: usize) -> f32 {
        let len = self.buffer.len();
        self.buffer[(self.write_pos + len - offset % len) % len]
    }

    /// Zero the buffer and the held output.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.output = 0.0;
    }
}
