//! Frame Timing
//!
//! Fixed-cadence frame scheduling and timing statistics.

use std::time::{Duration, Instant};

/// Highest frame rate a timer will schedule
pub const MAX_FPS: u32 = 1000;

/// Scoped timer that reports its duration to tracing on drop
pub struct ScopedTimer<'a> {
    name: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    /// Create a scoped timer that logs to tracing
    pub fn traced(name: &'a str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Get elapsed time so far
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        tracing::debug!(
            target: "timing",
            name = self.name,
            duration_us = duration.as_micros() as u64,
            "Timer completed"
        );
    }
}

/// Rolling average over the most recent samples
#[derive(Debug)]
pub struct RollingTimer {
    samples: Vec<f64>,
    index: usize,
    count: usize,
}

impl RollingTimer {
    /// Create a new rolling timer with the given sample count
    pub fn new(sample_count: usize) -> Self {
        Self {
            samples: vec![0.0; sample_count.max(1)],
            index: 0,
            count: 0,
        }
    }

    /// Record a new sample (in seconds)
    pub fn record(&mut self, sample: f64) {
        self.samples[self.index] = sample;
        self.index = (self.index + 1) % self.samples.len();
        self.count = (self.count + 1).min(self.samples.len());
    }

    /// Get the average sample value
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.samples.iter().take(self.count).sum::<f64>() / self.count as f64
    }

    /// Get the average as FPS
    pub fn average_fps(&self) -> f64 {
        let avg = self.average();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// Get the sample count
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Schedules frames at a fixed rate and tracks how long they actually took.
///
/// Deadlines advance by one interval from the previous deadline so the
/// cadence does not drift. If a frame runs past its deadline, the next one is
/// scheduled one interval from now rather than firing a burst of late frames.
#[derive(Debug)]
pub struct FrameTimer {
    interval: Duration,
    next_deadline: Instant,
    last_frame: Option<Instant>,
    rolling: RollingTimer,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a timer for the given frame rate, starting now
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(target_fps, Instant::now())
    }

    /// Create a timer whose first frame is due at `start`; the rate is
    /// clamped to `1..=MAX_FPS`
    pub fn starting_at(target_fps: u32, start: Instant) -> Self {
        let fps = target_fps.clamp(1, MAX_FPS);
        Self {
            interval: Duration::from_secs(1) / fps,
            next_deadline: start,
            last_frame: None,
            rolling: RollingTimer::new(fps as usize),
            frame_count: 0,
        }
    }

    /// Time between frames
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next frame is due
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Whether a frame is due at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_deadline
    }

    /// Record a frame at `now` and schedule the next; returns the time since
    /// the previous frame (zero for the first)
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        if self.last_frame.is_some() {
            self.rolling.record(delta.as_secs_f64());
        }
        self.last_frame = Some(now);
        self.frame_count += 1;

        let next = self.next_deadline + self.interval;
        self.next_deadline = if next > now { next } else { now + self.interval };
        delta
    }

    /// Record a frame now
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Get the current FPS (rolling average)
    pub fn fps(&self) -> f64 {
        self.rolling.average_fps()
    }

    /// Get the average frame time in milliseconds
    pub fn average_frame_time_ms(&self) -> f64 {
        self.rolling.average() * 1000.0
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_rolling_average() {
        let mut timer = RollingTimer::new(3);
        assert_eq!(timer.average(), 0.0);
        timer.record(1.0);
        timer.record(2.0);
        timer.record(3.0);
        timer.record(4.0);
        assert_eq!(timer.count(), 3);
        assert!((timer.average() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_interval() {
        let timer = FrameTimer::new(60);
        assert_eq!(timer.interval(), Duration::from_secs(1) / 60);
        assert_eq!(FrameTimer::new(0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_frame_rate_is_capped() {
        let timer = FrameTimer::new(4_000_000_000);
        assert_eq!(timer.interval(), Duration::from_secs(1) / MAX_FPS);
        assert_eq!(timer.rolling.samples.len(), MAX_FPS as usize);
    }

    #[test]
    fn test_deadlines_follow_fixed_cadence() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(50, start);
        let interval = timer.interval();
        assert!(timer.is_due(start));

        assert_eq!(timer.tick_at(start), Duration::ZERO);
        assert_eq!(timer.next_deadline(), start + interval);
        assert!(!timer.is_due(start + interval / 2));

        // A slightly late frame does not push the schedule back
        let late = start + interval + Duration::from_millis(3);
        assert_eq!(timer.tick_at(late), interval + Duration::from_millis(3));
        assert_eq!(timer.next_deadline(), start + interval * 2);
    }

    #[test]
    fn test_missed_frames_are_not_replayed() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(50, start);
        let interval = timer.interval();
        timer.tick_at(start);

        let stalled = start + interval * 10;
        timer.tick_at(stalled);
        assert_eq!(timer.next_deadline(), stalled + interval);
    }

    #[test]
    fn test_fps_estimate() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(50, start);
        for frame in 0..=10 {
            timer.tick_at(start + Duration::from_millis(20) * frame);
        }
        assert_eq!(timer.frame_count(), 11);
        assert!((timer.fps() - 50.0).abs() < 1e-6);
        assert!((timer.average_frame_time_ms() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_scoped_timer_elapsed() {
        let timer = ScopedTimer::traced("test");
        assert!(timer.elapsed() < Duration::from_secs(60));
    }

    /// Counts timing records that mention `timed_section`
    struct TimingRecords;

    static TIMING_RECORDS: AtomicUsize = AtomicUsize::new(0);
    static LOGGER: TimingRecords = TimingRecords;

    impl log::Log for TimingRecords {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if record.target() == "timing" && record.args().to_string().contains("timed_section") {
                TIMING_RECORDS.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn test_scoped_timer_reaches_log_facade() {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(log::LevelFilter::Trace);

        let before = TIMING_RECORDS.load(Ordering::SeqCst);
        drop(ScopedTimer::traced("timed_section"));
        assert_eq!(TIMING_RECORDS.load(Ordering::SeqCst), before + 1);
    }
}
