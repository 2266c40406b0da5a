// src/main.rs

use sinegen::{AudioBuffer, KernelConfig, ParamId, SineKernel, SynthesisKind};

const SAMPLE_RATE: f64 = 44_100.0;
const BLOCK_FRAMES: usize = 512;
const CHANNELS: usize = 2;

/// ===============================
/// Main
/// ===============================

fn main() {
    println!("Starting sine generator sanity test…");

    for kind in SynthesisKind::ALL {
        let config = KernelConfig::default()
            .with_channels(CHANNELS)
            .with_sample_rate(SAMPLE_RATE)
            .with_synthesis(kind);

        let mut kernel = match SineKernel::with_config(config) {
            Ok(kernel) => kernel,
            Err(e) => {
                println!("Error creating kernel: {}", e);
                return;
            }
        };

        kernel.set_parameter(ParamId::Frequency, 440.0);
        kernel.set_parameter(ParamId::Amplitude, 1.0);

        // --------------------------------
        // Steady tone, one second
        // --------------------------------

        let (peak, crossings) = run(&mut kernel, SAMPLE_RATE as usize);
        println!(
            "[{}] steady: peak {:.4}, ~{:.1} Hz",
            kind.name(),
            peak,
            crossings as f64 / 2.0
        );

        // --------------------------------
        // Fade out over a quarter second, then hold
        // --------------------------------

        kernel.start_ramp(ParamId::Amplitude, 0.0, (SAMPLE_RATE / 4.0) as u32);
        let (fade_peak, _) = run(&mut kernel, (SAMPLE_RATE / 4.0) as usize);
        let (tail_peak, _) = run(&mut kernel, BLOCK_FRAMES * 4);
        println!(
            "[{}] fade: peak {:.4}, tail peak {:.4}",
            kind.name(),
            fade_peak,
            tail_peak
        );
    }

    println!("Sanity test completed.");
}

/// Render `total_frames` in blocks; return peak level and zero-crossing count.
fn run(kernel: &mut SineKernel, total_frames: usize) -> (f32, usize) {
    let mut data = vec![0.0f32; BLOCK_FRAMES * CHANNELS];
    let mut peak = 0.0f32;
    let mut crossings = 0;
    let mut last = 0.0f32;

    let mut offset = 0;
    while offset < total_frames {
        let chunk_frames = (total_frames - offset).min(BLOCK_FRAMES);
        let mut buffer = AudioBuffer::new(&mut data, CHANNELS);
        buffer.clear();
        kernel.render(&mut buffer, chunk_frames, 0);

        for &sample in &buffer.channel(0)[..chunk_frames] {
            peak = peak.max(sample.abs());
            if (sample < 0.0) != (last < 0.0) {
                crossings += 1;
            }
            last = sample;
        }

        offset += chunk_frames;
    }

    (peak, crossings)
}
