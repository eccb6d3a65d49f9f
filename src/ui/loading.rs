use std::time::{Duration, Instant};

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Spinner shown while a stream is loading. Advanced from the main loop
/// tick, so it keeps moving even when no events arrive.
pub struct LoadingAnimation {
    current: usize,
    last_advance: Instant,
}

impl LoadingAnimation {
    pub fn new() -> Self {
        Self {
            current: 0,
            last_advance: Instant::now(),
        }
    }

    pub fn tick(&mut self) {
        if self.last_advance.elapsed() >= FRAME_DURATION {
            self.current = (self.current + 1) % FRAMES.len();
            self.last_advance = Instant::now();
        }
    }

    pub fn current_frame(&self) -> &'static str {
        FRAMES[self.current]
    }
}

impl Default for LoadingAnimation {
    fn default() -> Self {
        Self::new()
    }
}
