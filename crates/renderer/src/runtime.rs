use std::time::Instant;

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock time in seconds since the window was created.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces a time sample for the next frame.
    pub fn sample(&mut self) -> TimeSample {
        let elapsed = self.origin.elapsed();
        let sample = TimeSample::new(elapsed.as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}
