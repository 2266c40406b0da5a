// src/kernel.rs

use log::{info, warn};

use crate::audio_buffer::OutputBuffer;
use crate::config::{ConfigResult, KernelConfig, validate_format};
use crate::oscillators::{Oscillator, Synthesis, SynthesisKind};
use crate::params::{DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY_HZ, ParamAddress, ParamId};
use crate::ramper::ParameterRamper;

/// Real-time sine generator kernel.
///
/// Owns one oscillator and one ramper per parameter. Control methods
/// (`init`, `set_parameter`, `start_ramp`) are called between renders;
/// `render` must be deterministic, allocation-free, lock-free and never fail.
pub struct SineKernel {
    oscillator: Synthesis,

    /// Normalized: fraction of `max_frequency`.
    frequency: ParameterRamper,
    amplitude: ParameterRamper,

    channel_count: usize,
    sample_rate: f64,

    /// Configured ceiling in Hz, before the Nyquist cap.
    configured_max_frequency: f32,
    max_frequency: f32,

    initialized: bool,
    frames_rendered: u64,
}

impl SineKernel {
    pub fn new(config: KernelConfig) -> Self {
        let max_frequency = config.effective_max_frequency();
        Self {
            oscillator: Synthesis::new(config.synthesis),
            frequency: ParameterRamper::new(
                ParamId::Frequency.normalize(DEFAULT_FREQUENCY_HZ, max_frequency),
            ),
            amplitude: ParameterRamper::new(DEFAULT_AMPLITUDE),
            channel_count: config.channel_count,
            sample_rate: config.sample_rate,
            configured_max_frequency: config.max_frequency,
            max_frequency,
            initialized: false,
            frames_rendered: 0,
        }
    }

    /// Build and initialize a kernel for the configured output format.
    pub fn with_config(config: KernelConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mut kernel = Self::new(config);
        kernel.init(config.channel_count, config.sample_rate)?;
        Ok(kernel)
    }

    /// One-time setup for an output format.
    ///
    /// Builds any oscillator tables and derives the frequency ceiling.
    /// Parameter goals survive re-initialization in real units.
    pub fn init(&mut self, channel_count: usize, sample_rate: f64) -> ConfigResult<()> {
        if let Err(err) = validate_format(channel_count, sample_rate) {
            warn!("SineKernel::init rejected format: {}", err);
            return Err(err);
        }

        let frequency_hz = self.get_parameter(ParamId::Frequency);

        self.channel_count = channel_count;
        self.sample_rate = sample_rate;
        self.max_frequency = self
            .configured_max_frequency
            .min((sample_rate * 0.5) as f32);
        self.frequency
            .set(ParamId::Frequency.normalize(frequency_hz, self.max_frequency));

        self.oscillator.prepare(sample_rate);
        self.initialized = true;

        info!(
            "SineKernel::init: channels={}, sample_rate={}, max_frequency={}, synthesis={}",
            channel_count,
            sample_rate,
            self.max_frequency,
            self.oscillator.kind().name()
        );
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Parameters
    // ───────────────────────────────────────────────────────────────

    /// Jump a parameter to `value` (real units), cancelling any ramp.
    ///
    /// Non-finite values are ignored.
    pub fn set_parameter(&mut self, param: ParamId, value: f32) {
        if !value.is_finite() {
            return;
        }
        let normalized = param.normalize(value, self.max_frequency);
        self.ramper_mut(param).set(normalized);
    }

    /// Ramp a parameter to `target` (real units) over `duration` samples.
    ///
    /// The ramp begins with the next rendered frame. Non-finite targets are ignored.
    pub fn start_ramp(&mut self, param: ParamId, target: f32, duration: u32) {
        if !target.is_finite() {
            return;
        }
        let normalized = param.normalize(target, self.max_frequency);
        self.ramper_mut(param).start_ramp(normalized, duration);
    }

    /// The value a parameter is heading toward, in real units.
    ///
    /// Never reports an in-flight ramp value.
    pub fn get_parameter(&self, param: ParamId) -> f32 {
        param.denormalize(self.ramper(param).goal(), self.max_frequency)
    }

    /// [`set_parameter`](Self::set_parameter) by host address; unknown addresses are ignored.
    pub fn set_parameter_at(&mut self, address: ParamAddress, value: f32) {
        if let Some(param) = ParamId::from_address(address) {
            self.set_parameter(param, value);
        }
    }

    /// [`start_ramp`](Self::start_ramp) by host address; unknown addresses are ignored.
    pub fn start_ramp_at(&mut self, address: ParamAddress, target: f32, duration: u32) {
        if let Some(param) = ParamId::from_address(address) {
            self.start_ramp(param, target, duration);
        }
    }

    /// [`get_parameter`](Self::get_parameter) by host address; unknown addresses read as 0.
    pub fn get_parameter_at(&self, address: ParamAddress) -> f32 {
        ParamId::from_address(address)
            .map(|param| self.get_parameter(param))
            .unwrap_or(0.0)
    }

    #[inline]
    fn ramper(&self, param: ParamId) -> &ParameterRamper {
        match param {
            ParamId::Frequency => &self.frequency,
            ParamId::Amplitude => &self.amplitude,
        }
    }

    #[inline]
    fn ramper_mut(&mut self, param: ParamId) -> &mut ParameterRamper {
        match param {
            ParamId::Frequency => &mut self.frequency,
            ParamId::Amplitude => &mut self.amplitude,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Rendering
    // ───────────────────────────────────────────────────────────────

    /// Render `frame_count` frames into `output`, starting at `buffer_offset`.
    ///
    /// Every channel receives the same samples. Frames outside the span are
    /// left untouched. Must not allocate or block.
    pub fn render<O: OutputBuffer + ?Sized>(
        &mut self,
        output: &mut O,
        frame_count: usize,
        buffer_offset: usize,
    ) {
        debug_assert!(self.initialized, "render called before init");
        debug_assert!(frame_count > 0, "render called with zero frames");
        debug_assert!(
            buffer_offset + frame_count <= output.frames(),
            "render span {}..{} exceeds buffer of {} frames",
            buffer_offset,
            buffer_offset + frame_count,
            output.frames()
        );
        debug_assert!(output.channels() >= self.channel_count);

        let end = (buffer_offset + frame_count).min(output.frames());
        let channels = self.channel_count.min(output.channels());

        for frame in buffer_offset..end {
            let frequency = self.frequency.get_step() * self.max_frequency;
            let amplitude = self.amplitude.get_step();
            let sample = self.oscillator.process_frame(frequency, amplitude);

            for ch in 0..channels {
                output.channel_mut(ch)[frame] = sample;
            }
        }

        self.frames_rendered += end.saturating_sub(buffer_offset) as u64;
    }

    /// Restart the waveform at phase zero. Parameters are kept.
    pub fn reset(&mut self) {
        self.oscillator.reset();
    }

    // ───────────────────────────────────────────────────────────────
    // State access
    // ───────────────────────────────────────────────────────────────

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// The frequency in Hz a normalized value of 1.0 stands for.
    #[inline]
    pub fn max_frequency(&self) -> f32 {
        self.max_frequency
    }

    #[inline]
    pub fn synthesis(&self) -> SynthesisKind {
        self.oscillator.kind()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Frames rendered since construction.
    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// True while either parameter is still ramping.
    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.frequency.is_ramping() || self.amplitude.is_ramping()
    }
}
