pub use instant::Instant;

/// Per-frame timing bookkeeping.
///
/// The first tick only records a timestamp; every later tick derives the
/// frame delta and instantaneous frame rate from the previous one.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    last: Option<Instant>,
    /// Milliseconds between the last two ticks.
    pub delta_ms: f64,
    /// `1000 / delta_ms`, left unchanged when two ticks share a timestamp.
    pub frame_rate: f64,
    /// Sum of all deltas, in milliseconds.
    pub elapsed_ms: f64,
    pub frame_count: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if let Some(last) = self.last {
            let delta = now.duration_since(last).as_secs_f64() * 1000.0;
            self.delta_ms = delta;
            if delta > 0.0 {
                self.frame_rate = 1000.0 / delta;
            }
            self.elapsed_ms += delta;
        }
        self.last = Some(now);
        self.frame_count += 1;
    }
}
