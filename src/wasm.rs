//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { SineGenerator, PARAM_FREQUENCY, PARAM_AMPLITUDE, SYNTHESIS_INTERPOLATED_TABLE } from './sinegen.js';
//!
//! await init();
//!
//! // Inside an AudioWorkletProcessor
//! const gen = new SineGenerator(2, sampleRate, SYNTHESIS_INTERPOLATED_TABLE());
//! gen.set_parameter(PARAM_FREQUENCY(), 440);
//! gen.start_ramp(PARAM_AMPLITUDE(), 0.0, 4410);
//! gen.render(planarOutput, 128, 0);
//! ```

use wasm_bindgen::prelude::*;

use crate::audio_buffer::AudioBuffer;
use crate::config::KernelConfig;
use crate::kernel::SineKernel;
use crate::oscillators::SynthesisKind;
use crate::params::ParamId;

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other functions.
/// Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn sinegen_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

#[wasm_bindgen(js_name = PARAM_FREQUENCY)]
pub fn param_frequency() -> u32 {
    ParamId::Frequency as u32
}

#[wasm_bindgen(js_name = PARAM_AMPLITUDE)]
pub fn param_amplitude() -> u32 {
    ParamId::Amplitude as u32
}

#[wasm_bindgen(js_name = SYNTHESIS_DIRECT)]
pub fn synthesis_direct() -> u32 {
    SynthesisKind::Direct as u32
}

#[wasm_bindgen(js_name = SYNTHESIS_INTERPOLATED_TABLE)]
pub fn synthesis_interpolated_table() -> u32 {
    SynthesisKind::InterpolatedTable as u32
}

#[wasm_bindgen(js_name = SYNTHESIS_NEAREST_TABLE)]
pub fn synthesis_nearest_table() -> u32 {
    SynthesisKind::NearestTable as u32
}

// ═══════════════════════════════════════════════════════════════════════════
// Generator
// ═══════════════════════════════════════════════════════════════════════════

/// Sine generator for use inside an AudioWorklet.
///
/// Parameter messages are applied from the worklet's own thread, so no
/// bridge is needed here.
#[wasm_bindgen]
pub struct SineGenerator {
    kernel: SineKernel,
}

#[wasm_bindgen]
impl SineGenerator {
    #[wasm_bindgen(constructor)]
    pub fn new(channel_count: u32, sample_rate: f64, synthesis: u32) -> Result<SineGenerator, JsError> {
        let config = KernelConfig {
            channel_count: channel_count as usize,
            sample_rate,
            synthesis: SynthesisKind::from_raw(synthesis).unwrap_or_default(),
            ..KernelConfig::default()
        };
        let kernel = SineKernel::with_config(config)?;
        Ok(SineGenerator { kernel })
    }

    pub fn set_parameter(&mut self, address: u32, value: f32) {
        self.kernel.set_parameter_at(address as u64, value);
    }

    pub fn get_parameter(&self, address: u32) -> f32 {
        self.kernel.get_parameter_at(address as u64)
    }

    pub fn start_ramp(&mut self, address: u32, target: f32, duration: u32) {
        self.kernel.start_ramp_at(address as u64, target, duration);
    }

    /// Render into a planar buffer (`[ch0 frames.., ch1 frames..]`).
    ///
    /// Buffers too small for the channel count are left untouched.
    pub fn render(&mut self, output: &mut [f32], frame_count: u32, buffer_offset: u32) {
        let channels = self.kernel.channel_count();
        let frames = output.len() / channels;
        let (frame_count, buffer_offset) = (frame_count as usize, buffer_offset as usize);
        if frame_count == 0 || buffer_offset + frame_count > frames {
            return;
        }

        let mut buffer = AudioBuffer::new(output, channels);
        self.kernel.render(&mut buffer, frame_count, buffer_offset);
    }

    pub fn reset(&mut self) {
        self.kernel.reset();
    }
}
