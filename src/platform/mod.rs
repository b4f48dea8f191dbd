//! Platform helpers
//!
//! The host owns the frame loop. These helpers turn what the host observes
//! (timestamps) into what the simulation consumes (frame deltas).

/// Converts monotonically increasing frame timestamps into deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a timestamp in seconds and get the delta since the previous one
    ///
    /// The first sample yields 0. A timestamp older than the previous one
    /// also yields 0 and becomes the new reference.
    pub fn tick(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) if now >= last => (now - last) as f32,
            Some(last) => {
                log::warn!("Frame timestamp went backwards ({last} -> {now})");
                0.0
            }
            None => 0.0,
        };
        self.last = Some(now);
        dt
    }

    /// Forget the previous timestamp (after a pause, for example)
    pub fn reset(&mut self) {
        self.last = None;
    }
}
