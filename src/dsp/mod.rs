//! DSP — the plate reverb signal path.
//!
//! Leaf primitives (delay, all-pass, one-pole filters, LFO) compose into
//! the figure-eight tank, which the engine wraps with input conditioning.
//! The same code serves real-time hosts (via WASM) and offline rendering.

pub mod allpass;
pub mod delay;
pub mod engine;
pub mod filter;
pub mod oscillator;
pub mod renderer;
pub mod tank;
