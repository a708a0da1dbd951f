//! Frame timing for the render loop.
//!
//! The driver advances one [`FrameClock`] per scene, exactly once per tick;
//! everything downstream reads the resulting elapsed time and never writes
//! it. A fixed step can replace the wall clock for deterministic runs.

use std::time::{Duration, Instant};

/// How often the fps estimate refreshes.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Monotonic per-frame clock.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frames: u64,
    fps_marker: Instant,
    fixed_step: Option<f32>,
    time_scale: f32,
}

impl FrameClock {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_marker: now,
            fixed_step: None,
            time_scale: 1.0,
        }
    }

    /// Advance the clock by one frame. Call exactly once per tick.
    ///
    /// Returns `(elapsed, delta)` in seconds.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();

        match self.fixed_step {
            Some(step) => {
                // Deterministic mode: the wall clock is out of the loop
                // entirely, elapsed time is an exact sum of steps.
                self.delta_secs = step * self.time_scale;
                self.elapsed_secs += self.delta_secs;
            }
            None => {
                self.delta_secs =
                    now.duration_since(self.last_tick).as_secs_f32() * self.time_scale;
                self.elapsed_secs = now.duration_since(self.start).as_secs_f32() * self.time_scale;
            }
        }
        self.last_tick = now;
        self.frame_count += 1;

        let window = now.duration_since(self.fps_marker);
        if window >= FPS_WINDOW {
            let frames = self.frame_count - self.fps_frames;
            self.fps = frames as f32 / window.as_secs_f32();
            self.fps_frames = self.frame_count;
            self.fps_marker = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Elapsed time in seconds as of the last tick.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total ticks so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Estimated frames per second, refreshed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Replace wall-clock timing with a fixed step per tick.
    ///
    /// Pass `None` to return to real time.
    pub fn set_fixed_step(&mut self, step: Option<f32>) {
        self.fixed_step = step;
    }

    /// Scale the advance of time (`1.0` = real time, `0.0` freezes it).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Current time scale.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Restart the clock from zero.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_tick = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frames = 0;
        self.fps_marker = now;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_clock_is_zeroed() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.time_scale(), 1.0);
    }

    #[test]
    fn test_tick_advances() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.tick();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fixed_step_is_exact() {
        let mut clock = FrameClock::new();
        clock.set_fixed_step(Some(0.25));

        for _ in 0..4 {
            thread::sleep(Duration::from_millis(1));
            clock.tick();
        }

        // Independent of wall time: four quarter-second steps.
        assert_eq!(clock.elapsed(), 1.0);
        assert_eq!(clock.delta(), 0.25);
    }

    #[test]
    fn test_time_scale_freezes_fixed_step() {
        let mut clock = FrameClock::new();
        clock.set_fixed_step(Some(0.1));
        clock.set_time_scale(0.0);
        clock.tick();
        clock.tick();
        assert_eq!(clock.elapsed(), 0.0);

        // Negative scales clamp to zero.
        clock.set_time_scale(-2.0);
        assert_eq!(clock.time_scale(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.set_fixed_step(Some(1.0));
        clock.tick();
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }
}
