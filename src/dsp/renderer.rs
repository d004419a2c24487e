//! Offline renderer — runs an engine over a whole buffer and encodes WAV.

use super::engine::ReverbEngine;

/// Feed a unit impulse followed by `len - 1` zeros and collect the stereo output.
pub fn render_impulse_response(engine: &mut ReverbEngine, len: usize) -> Vec<(f32, f32)> {
    (0..len)
        .map(|i| {
            let x = if i == 0 { 1.0 } else { 0.0 };
            engine.process(x, x)
        })
        .collect()
}

/// Process a mono signal plus `tail_samples` of silence and return
/// interleaved stereo output (`L, R, L, R, ...`).
pub fn render_interleaved(engine: &mut ReverbEngine, input: &[f32], tail_samples: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity((input.len() + tail_samples) * 2);
    let silence = std::iter::repeat_n(0.0, tail_samples);
    for x in input.iter().copied().chain(silence) {
        let (l, r) = engine.process(x, x);
        out.push(l);
        out.push(r);
    }
    out
}

/// Render a mono signal through the reverb to a WAV file as bytes (16-bit stereo PCM).
pub fn render_wav(engine: &mut ReverbEngine, input: &[f32], tail_samples: usize, sample_rate: u32) -> Vec<u8> {
    let pcm: Vec<i16> = render_interleaved(engine, input, tail_samples)
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();

    encode_wav(&pcm, sample_rate, 2)
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
