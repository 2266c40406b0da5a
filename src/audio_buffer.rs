// src/audio_buffer.rs

/// Caller-owned multi-channel output the kernel renders into.
///
/// Borrowed for a single render call only.
pub trait OutputBuffer {
    /// Number of channels available.
    fn channels(&self) -> usize;

    /// Frames per channel.
    fn frames(&self) -> usize;

    /// One channel's samples, `frames()` long.
    fn channel_mut(&mut self, ch: usize) -> &mut [f32];
}

#[derive(Debug)]
pub struct AudioBuffer<'a> {
    pub channels: usize,
    pub frames: usize,
    pub data: &'a mut [f32], // planar: ch0 frames, then ch1 frames, ...
}

impl<'a> AudioBuffer<'a> {
    /// Create a new AudioBuffer wrapping existing data.
    #[inline]
    pub fn new(data: &'a mut [f32], channels: usize) -> Self {
        debug_assert!(channels > 0);
        let frames = data.len() / channels.max(1);
        Self {
            channels,
            frames,
            data,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    #[inline]
    pub fn channel(&self, ch: usize) -> &[f32] {
        let start = ch * self.frames;
        &self.data[start..start + self.frames]
    }

    /// Get direct access to the planar sample data.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        self.data
    }
}

impl OutputBuffer for AudioBuffer<'_> {
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    fn channel_mut(&mut self, ch: usize) -> &mut [f32] {
        let start = ch * self.frames;
        &mut self.data[start..start + self.frames]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_layout() {
        let mut data = vec![0.0f32; 8];
        let mut buffer = AudioBuffer::new(&mut data, 2);
        assert_eq!(buffer.frames, 4);

        buffer.channel_mut(1)[0] = 1.0;
        assert_eq!(buffer.channel(0), &[0.0; 4]);
        assert_eq!(buffer.channel(1), &[1.0, 0.0, 0.0, 0.0]);

        buffer.clear();
        assert!(buffer.samples().iter().all(|&s| s == 0.0));
        assert_eq!(data[4], 0.0);
    }
}
