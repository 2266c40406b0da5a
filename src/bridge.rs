//! Thread-safe bridge between the control context and the render context.
//!
//! Parameter changes arrive from configuration, UI or automation on a
//! non-real-time thread while the audio thread renders. Nothing here locks.
//!
//! # Architecture
//!
//! - **Control thread** owns [`ControlHandle`]
//! - **Audio thread** owns [`RenderHandle`] with the [`SineKernel`]
//! - Parameter commands travel over an MPSC channel, drained at the start
//!   of every render call
//! - Parameter goals are published through atomics, so the control side
//!   can always ask where a parameter is heading without touching the
//!   kernel's in-flight ramp state
//!
//! # Usage
//!
//! ```ignore
//! let (control, mut render) = create_bridge(kernel);
//!
//! // Control thread
//! control.start_ramp(ParamId::Frequency, 880.0, 4410);
//! let goal = control.parameter(ParamId::Frequency);
//!
//! // Audio thread
//! render.render(&mut buffer, frames, 0);
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
    mpsc::{self, Receiver, Sender},
};

use crate::audio_buffer::OutputBuffer;
use crate::config::ConfigResult;
use crate::kernel::SineKernel;
use crate::params::{ParamAddress, ParamId};

/// A parameter change from the control side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamCommand {
    /// Jump to a value, cancelling any ramp.
    Set { param: ParamId, value: f32 },

    /// Ramp to a target over a number of samples.
    Ramp {
        param: ParamId,
        target: f32,
        duration: u32,
    },
}

/// Lock-free state shared between the two handles.
///
/// f32 values are stored as bits (no AtomicF32 in std).
struct SharedState {
    /// Goal per parameter, in real units, indexed by `ParamId`.
    goal_bits: [AtomicU32; 2],
    max_frequency_bits: AtomicU32,
    frames_rendered: AtomicU64,
    initialized: AtomicBool,
}

impl SharedState {
    fn new(kernel: &SineKernel) -> Self {
        Self {
            goal_bits: ParamId::ALL.map(|param| AtomicU32::new(kernel.get_parameter(param).to_bits())),
            max_frequency_bits: AtomicU32::new(kernel.max_frequency().to_bits()),
            frames_rendered: AtomicU64::new(kernel.frames_rendered()),
            initialized: AtomicBool::new(kernel.is_initialized()),
        }
    }

    #[inline]
    fn store_goal(&self, param: ParamId, value: f32) {
        self.goal_bits[param as usize].store(value.to_bits(), Ordering::Release);
    }

    #[inline]
    fn goal(&self, param: ParamId) -> f32 {
        f32::from_bits(self.goal_bits[param as usize].load(Ordering::Acquire))
    }

    #[inline]
    fn max_frequency(&self) -> f32 {
        f32::from_bits(self.max_frequency_bits.load(Ordering::Acquire))
    }
}

/// Handle for the control thread.
///
/// All methods are safe to call while the audio thread renders.
pub struct ControlHandle {
    command_tx: Sender<ParamCommand>,
    shared: Arc<SharedState>,
}

/// Handle for the audio thread, owning the kernel.
pub struct RenderHandle {
    kernel: SineKernel,
    command_rx: Receiver<ParamCommand>,
    shared: Arc<SharedState>,
}

/// Create a linked pair of handles around `kernel`.
pub fn create_bridge(kernel: SineKernel) -> (ControlHandle, RenderHandle) {
    let (command_tx, command_rx) = mpsc::channel();
    let shared = Arc::new(SharedState::new(&kernel));

    let control = ControlHandle {
        command_tx,
        shared: Arc::clone(&shared),
    };

    let render = RenderHandle {
        kernel,
        command_rx,
        shared,
    };

    (control, render)
}

// ═══════════════════════════════════════════════════════════════════
// ControlHandle - Control Thread API
// ═══════════════════════════════════════════════════════════════════

impl ControlHandle {
    /// Jump a parameter to `value` at the start of the next render.
    pub fn set_parameter(&self, param: ParamId, value: f32) {
        if !value.is_finite() {
            return;
        }
        self.publish_goal(param, value);
        self.send(ParamCommand::Set { param, value });
    }

    /// Ramp a parameter to `target` over `duration` samples, starting with
    /// the next render.
    pub fn start_ramp(&self, param: ParamId, target: f32, duration: u32) {
        if !target.is_finite() {
            return;
        }
        self.publish_goal(param, target);
        self.send(ParamCommand::Ramp {
            param,
            target,
            duration,
        });
    }

    /// Where a parameter is heading, in real units.
    #[inline]
    pub fn parameter(&self, param: ParamId) -> f32 {
        self.shared.goal(param)
    }

    pub fn set_parameter_at(&self, address: ParamAddress, value: f32) {
        if let Some(param) = ParamId::from_address(address) {
            self.set_parameter(param, value);
        }
    }

    pub fn start_ramp_at(&self, address: ParamAddress, target: f32, duration: u32) {
        if let Some(param) = ParamId::from_address(address) {
            self.start_ramp(param, target, duration);
        }
    }

    /// Unknown addresses read as 0.
    pub fn parameter_at(&self, address: ParamAddress) -> f32 {
        ParamId::from_address(address)
            .map(|param| self.parameter(param))
            .unwrap_or(0.0)
    }

    /// Frames rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.shared.frames_rendered.load(Ordering::Relaxed)
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.initialized.load(Ordering::Relaxed)
    }

    fn send(&self, command: ParamCommand) {
        // A dropped render handle just means nobody is listening any more.
        let _ = self.command_tx.send(command);
    }

    /// Store the goal exactly as the kernel will clamp it.
    fn publish_goal(&self, param: ParamId, value: f32) {
        let max_frequency = self.shared.max_frequency();
        let goal = param.denormalize(param.normalize(value, max_frequency), max_frequency);
        self.shared.store_goal(param, goal);
    }
}

// ═══════════════════════════════════════════════════════════════════
// RenderHandle - Audio Thread API
// ═══════════════════════════════════════════════════════════════════

impl RenderHandle {
    /// Initialize the kernel for an output format.
    ///
    /// Not real-time safe; call while the audio thread is idle.
    pub fn init(&mut self, channel_count: usize, sample_rate: f64) -> ConfigResult<()> {
        self.process_commands();
        self.kernel.init(channel_count, sample_rate)?;

        self.shared
            .max_frequency_bits
            .store(self.kernel.max_frequency().to_bits(), Ordering::Release);
        self.publish_goals();
        self.shared.initialized.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// Apply all pending control commands. Returns how many were applied.
    ///
    /// Called at the start of every render.
    pub fn process_commands(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.command_rx.try_recv() {
            let param = match command {
                ParamCommand::Set { param, value } => {
                    self.kernel.set_parameter(param, value);
                    param
                }
                ParamCommand::Ramp {
                    param,
                    target,
                    duration,
                } => {
                    self.kernel.start_ramp(param, target, duration);
                    param
                }
            };
            // A render-side change may have published a different goal meanwhile.
            self.shared.store_goal(param, self.kernel.get_parameter(param));
            applied += 1;
        }
        applied
    }

    /// Render after applying pending commands.
    #[inline]
    pub fn render<O: OutputBuffer + ?Sized>(
        &mut self,
        output: &mut O,
        frame_count: usize,
        buffer_offset: usize,
    ) {
        self.process_commands();
        self.kernel.render(output, frame_count, buffer_offset);
        self.shared
            .frames_rendered
            .store(self.kernel.frames_rendered(), Ordering::Relaxed);
    }

    /// Set a parameter from the render context (e.g. a host render event).
    pub fn set_parameter(&mut self, param: ParamId, value: f32) {
        self.kernel.set_parameter(param, value);
        self.shared.store_goal(param, self.kernel.get_parameter(param));
    }

    /// Start a ramp from the render context (e.g. a host ramp event).
    pub fn start_ramp(&mut self, param: ParamId, target: f32, duration: u32) {
        self.kernel.start_ramp(param, target, duration);
        self.shared.store_goal(param, self.kernel.get_parameter(param));
    }

    pub fn reset(&mut self) {
        self.kernel.reset();
    }

    pub fn kernel(&self) -> &SineKernel {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut SineKernel {
        &mut self.kernel
    }

    fn publish_goals(&self) {
        for param in ParamId::ALL {
            self.shared.store_goal(param, self.kernel.get_parameter(param));
        }
    }
}
