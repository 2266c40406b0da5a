// src/lib.rs
//
// Library entry point for FFI consumers (iOS audio unit shell) and Rust users.

mod audio_buffer;
mod bridge;
mod config;
mod kernel;
mod oscillators;
mod params;
mod ramper;
mod wavetable;

pub mod ffi;

#[cfg(feature = "web")]
pub mod wasm;

// Re-export key types for Rust consumers
pub use audio_buffer::{AudioBuffer, OutputBuffer};
pub use bridge::{ControlHandle, ParamCommand, RenderHandle, create_bridge};
pub use config::{ConfigError, ConfigResult, KernelConfig};
pub use kernel::SineKernel;
pub use oscillators::{
    DirectSine, INTERPOLATED_TABLE_SIZE, InterpolatedTableSine, NEAREST_TABLE_SIZE,
    NearestTableSine, Oscillator, Synthesis, SynthesisKind,
};
pub use params::{FREQUENCY_CEILING, ParamAddress, ParamId};
pub use ramper::ParameterRamper;
pub use wavetable::WaveTable;
