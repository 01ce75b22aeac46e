//! Fixed-step frame clock
//!
//! Physics speeds are expressed per step, so updates run at a fixed rate no
//! matter how fast frames are drawn. Each frame feeds its real duration in
//! and gets back how many steps to simulate.

/// Simulation rate
pub const DEFAULT_STEP_HZ: f64 = 60.0;

/// Upper bound on steps per frame so a long stall doesn't snowball
pub const MAX_STEPS_PER_FRAME: u32 = 5;

#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f64,
    accumulator: f64,
}

impl FrameClock {
    pub fn new(step_hz: f64) -> Self {
        Self {
            step: 1.0 / step_hz.max(1.0),
            accumulator: 0.0,
        }
    }

    /// Seconds per step
    pub fn step_seconds(&self) -> f32 {
        self.step as f32
    }

    /// Add a frame's elapsed time and return the number of steps to run
    pub fn advance(&mut self, frame_time: f64) -> u32 {
        self.accumulator += frame_time.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            // Drop the backlog instead of carrying it into later frames
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_60hz_frames() {
        let mut clock = FrameClock::default();
        let total: u32 = (0..60).map(|_| clock.advance(1.0 / 60.0 + 1e-9)).sum();
        assert_eq!(total, 60);
    }

    #[test]
    fn test_fast_frames_accumulate() {
        let mut clock = FrameClock::new(60.0);
        // 240 fps: one step every fourth frame
        let steps: Vec<u32> = (0..8).map(|_| clock.advance(1.0 / 240.0 + 1e-9)).collect();
        assert_eq!(steps.iter().sum::<u32>(), 2);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut clock = FrameClock::new(60.0);
        assert_eq!(clock.advance(2.0), MAX_STEPS_PER_FRAME);
        // Backlog was dropped, next normal frame runs at most a couple of steps
        assert!(clock.advance(1.0 / 60.0) <= 2);
    }
}
