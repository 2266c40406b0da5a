// C-compatible FFI bindings for the audio unit shell (Swift/Objective-C).
//
// Safety requirements:
// - All handles must be created by this module and not fabricated
// - Null handles are tolerated: calls become no-ops returning defaults
// - Caller must call the corresponding _destroy function for each _create
// - The output buffer registered with `sinegen_set_output_buffer` must stay
//   valid until it is replaced or the renderer is destroyed

use std::ptr;

use log::{info, warn};
#[cfg(feature = "ios")]
use log::LevelFilter;
#[cfg(feature = "ios")]
use oslog::OsLogger;

use crate::audio_buffer::OutputBuffer;
use crate::bridge::{ControlHandle, RenderHandle, create_bridge};
use crate::config::{DEFAULT_CHANNEL_COUNT, DEFAULT_MAX_FREQUENCY, DEFAULT_SAMPLE_RATE, KernelConfig};
use crate::kernel::SineKernel;
use crate::oscillators::SynthesisKind;
use crate::params::ParamId;

// Logger subsystem identifier
#[cfg(feature = "ios")]
const LOG_SUBSYSTEM: &str = "com.sinegen.engine";

// ═══════════════════════════════════════════════════════════════════════════
// Logger Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the oslog logger.
///
/// Call once at startup before any other FFI function. Output appears in
/// Console.app and Xcode's debug console.
#[cfg(feature = "ios")]
#[unsafe(no_mangle)]
pub extern "C" fn sinegen_init_logger() {
    OsLogger::new(LOG_SUBSYSTEM)
        .level_filter(LevelFilter::Debug)
        .init()
        .ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// Opaque Handle Types
// ═══════════════════════════════════════════════════════════════════════════

/// Opaque handle to the control side (parameter tree, UI).
pub struct SinegenControl {
    inner: ControlHandle,
}

/// Opaque handle to the render side (audio thread).
pub struct SinegenRenderer {
    inner: RenderHandle,
    output: Option<RawBufferList>,
}

/// Non-owned list of per-channel sample pointers, as in an `AudioBufferList`.
struct RawBufferList {
    channels: *const *mut f32,
    channel_count: usize,
    frames: usize,
}

impl OutputBuffer for RawBufferList {
    #[inline]
    fn channels(&self) -> usize {
        self.channel_count
    }

    #[inline]
    fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    fn channel_mut(&mut self, ch: usize) -> &mut [f32] {
        debug_assert!(ch < self.channel_count);
        // Validity is guaranteed by the caller of `sinegen_set_output_buffer`.
        unsafe {
            let data = *self.channels.add(ch);
            std::slice::from_raw_parts_mut(data, self.frames)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration for creating a generator.
#[repr(C)]
pub struct SinegenConfig {
    /// Output channel count (at least 1).
    pub channel_count: u32,
    /// Sample rate in Hz (e.g., 44100.0, 48000.0).
    pub sample_rate: f64,
    /// Frequency control ceiling in Hz, capped at Nyquist.
    pub max_frequency: f32,
    /// 0 = direct, 1 = interpolated table, 2 = nearest table.
    pub synthesis: u32,
}

impl Default for SinegenConfig {
    fn default() -> Self {
        Self {
            channel_count: DEFAULT_CHANNEL_COUNT as u32,
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            synthesis: SynthesisKind::default() as u32,
        }
    }
}

impl From<&SinegenConfig> for KernelConfig {
    fn from(cfg: &SinegenConfig) -> Self {
        let synthesis = SynthesisKind::from_raw(cfg.synthesis).unwrap_or_else(|| {
            warn!("Unknown synthesis kind {}, using direct", cfg.synthesis);
            SynthesisKind::Direct
        });
        KernelConfig {
            channel_count: cfg.channel_count as usize,
            sample_rate: cfg.sample_rate,
            max_frequency: cfg.max_frequency,
            synthesis,
        }
    }
}

/// Get the default configuration values.
#[unsafe(no_mangle)]
pub extern "C" fn sinegen_default_config() -> SinegenConfig {
    SinegenConfig::default()
}

// ═══════════════════════════════════════════════════════════════════════════
// Creation / Destruction
// ═══════════════════════════════════════════════════════════════════════════

/// Create a control/renderer pair.
///
/// The kernel is initialized for the configured format. Returns null (and
/// leaves `out_renderer` untouched) if the configuration is invalid or
/// `out_renderer` is null.
///
/// # Safety
/// - `config` must be a valid pointer or NULL for defaults
/// - `out_renderer` must be a valid pointer to store the renderer handle
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_create(
    config: *const SinegenConfig,
    out_renderer: *mut *mut SinegenRenderer,
) -> *mut SinegenControl {
    let cfg = if config.is_null() {
        SinegenConfig::default()
    } else {
        unsafe { ptr::read(config) }
    };

    if out_renderer.is_null() {
        warn!("sinegen_create: out_renderer is null, nothing could render");
        return ptr::null_mut();
    }

    let kernel = match SineKernel::with_config(KernelConfig::from(&cfg)) {
        Ok(kernel) => kernel,
        Err(err) => {
            warn!("sinegen_create: {}", err);
            return ptr::null_mut();
        }
    };

    info!(
        "sinegen_create: channels={}, sample_rate={}, synthesis={}",
        cfg.channel_count,
        cfg.sample_rate,
        kernel.synthesis().name()
    );

    let (control, render) = create_bridge(kernel);

    unsafe {
        *out_renderer = Box::into_raw(Box::new(SinegenRenderer {
            inner: render,
            output: None,
        }));
    }

    Box::into_raw(Box::new(SinegenControl { inner: control }))
}

/// Destroy a control handle.
///
/// # Safety
/// `control` must be a valid pointer returned by `sinegen_create`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_control_destroy(control: *mut SinegenControl) {
    if !control.is_null() {
        unsafe { drop(Box::from_raw(control)) };
    }
}

/// Destroy a renderer handle.
///
/// # Safety
/// `renderer` must be a valid pointer returned via `sinegen_create`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_renderer_destroy(renderer: *mut SinegenRenderer) {
    if !renderer.is_null() {
        unsafe { drop(Box::from_raw(renderer)) };
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Control - Parameters
// ═══════════════════════════════════════════════════════════════════════════

/// Set a parameter instantly (applied at the next render).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_set_parameter(
    control: *const SinegenControl,
    address: u64,
    value: f32,
) {
    if control.is_null() {
        return;
    }
    unsafe { (*control).inner.set_parameter_at(address, value) };
}

/// Ramp a parameter over `duration` samples (starting at the next render).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_start_ramp(
    control: *const SinegenControl,
    address: u64,
    value: f32,
    duration: u32,
) {
    if control.is_null() {
        return;
    }
    unsafe { (*control).inner.start_ramp_at(address, value, duration) };
}

/// Get the value a parameter is heading toward. Unknown addresses read as 0.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_get_parameter(control: *const SinegenControl, address: u64) -> f32 {
    if control.is_null() {
        return 0.0;
    }
    unsafe { (*control).inner.parameter_at(address) }
}

/// Number of frames rendered so far.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_frames_rendered(control: *const SinegenControl) -> u64 {
    if control.is_null() {
        return 0;
    }
    unsafe { (*control).inner.frames_rendered() }
}

// ═══════════════════════════════════════════════════════════════════════════
// Renderer
// ═══════════════════════════════════════════════════════════════════════════

/// Re-initialize for a new output format (allocate-render-resources time).
///
/// Returns `false` if the format is invalid; the previous format is kept.
/// The registered output buffer is cleared either way.
///
/// # Safety
/// Must not be called while audio is being rendered.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_renderer_init(
    renderer: *mut SinegenRenderer,
    channel_count: u32,
    sample_rate: f64,
) -> bool {
    if renderer.is_null() {
        return false;
    }
    let renderer = unsafe { &mut *renderer };
    renderer.output = None;
    renderer
        .inner
        .init(channel_count as usize, sample_rate)
        .is_ok()
}

/// Start a ramp from a render event.
///
/// Takes effect from the next rendered frame.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_renderer_start_ramp(
    renderer: *mut SinegenRenderer,
    address: u64,
    value: f32,
    duration: u32,
) {
    if renderer.is_null() {
        return;
    }
    if let Some(param) = ParamId::from_address(address) {
        unsafe { (*renderer).inner.start_ramp(param, value, duration) };
    }
}

/// Set a parameter from a render event.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_renderer_set_parameter(
    renderer: *mut SinegenRenderer,
    address: u64,
    value: f32,
) {
    if renderer.is_null() {
        return;
    }
    if let Some(param) = ParamId::from_address(address) {
        unsafe { (*renderer).inner.set_parameter(param, value) };
    }
}

/// Register the output buffer the next render calls write into.
///
/// `channels` points at `channel_count` channel pointers, each with room for
/// `frames` floats. Passing NULL clears the buffer.
///
/// # Safety
/// The pointer array and every channel pointer must stay valid until the
/// buffer is replaced or the renderer is destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_set_output_buffer(
    renderer: *mut SinegenRenderer,
    channels: *const *mut f32,
    channel_count: u32,
    frames: u32,
) {
    if renderer.is_null() {
        return;
    }
    let renderer = unsafe { &mut *renderer };

    renderer.output = if channels.is_null() || channel_count == 0 {
        None
    } else {
        Some(RawBufferList {
            channels,
            channel_count: channel_count as usize,
            frames: frames as usize,
        })
    };
}

/// Render `frame_count` frames starting at `buffer_offset` into the
/// registered output buffer.
///
/// Pending control commands are applied first. Without a registered buffer,
/// or when the span does not fit it, this is a no-op.
///
/// # Safety
/// - Must be called from the audio thread
/// - The registered output buffer must still be valid
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_render(
    renderer: *mut SinegenRenderer,
    frame_count: u32,
    buffer_offset: u32,
) {
    if renderer.is_null() || frame_count == 0 {
        return;
    }
    let renderer = unsafe { &mut *renderer };

    let Some(output) = renderer.output.as_mut() else {
        return;
    };
    let (frame_count, buffer_offset) = (frame_count as usize, buffer_offset as usize);
    if output.channel_count < renderer.inner.kernel().channel_count()
        || buffer_offset + frame_count > output.frames
    {
        return;
    }

    renderer.inner.render(output, frame_count, buffer_offset);
}

/// Restart the waveform at phase zero.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sinegen_reset(renderer: *mut SinegenRenderer) {
    if renderer.is_null() {
        return;
    }
    unsafe { (*renderer).inner.reset() };
}
