//! Checkpoints, ETA estimation and progress logging.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::phase::Phase;

/// Samples retained for rate estimation.
pub const ETA_HISTORY: usize = 10;

/// A suspension point reported to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    /// Overall progress in `[0, 1]`.
    pub progress: f32,
    pub description: String,
    pub phase: Phase,
}

impl Checkpoint {
    pub fn new(progress: f32, description: impl Into<String>, phase: Phase) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0),
            description: description.into(),
            phase,
        }
    }

    /// 1-based phase number (1..=12).
    pub fn phase_number(&self) -> u8 {
        self.phase.number()
    }
}

/// Remaining-time estimate from recent `(time, progress)` samples.
#[derive(Debug, Clone, Default)]
pub struct EtaEstimator {
    history: VecDeque<(Instant, f32)>,
}

impl EtaEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, progress: f32) {
        self.record_at(Instant::now(), progress);
    }

    pub fn record_at(&mut self, at: Instant, progress: f32) {
        if self.history.len() == ETA_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back((at, progress));
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Progress per second between the oldest and newest retained samples.
    pub fn rate(&self) -> Option<f64> {
        let (&(t0, p0), &(t1, p1)) = (self.history.front()?, self.history.back()?);
        let dt = t1.checked_duration_since(t0)?.as_secs_f64();
        let dp = (p1 - p0) as f64;
        if dt <= 0.0 || dp <= 0.0 {
            return None;
        }
        Some(dp / dt)
    }

    /// Estimated time to reach 1.0, or `None` while unknown.
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.rate()?;
        let &(_, latest) = self.history.back()?;
        let remaining = (1.0 - latest as f64).max(0.0) / rate;
        if remaining.is_finite() {
            Some(Duration::from_secs_f64(remaining))
        } else {
            None
        }
    }
}

/// `"42s"`, `"3m 5s"` or `"1h 2m"`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

pub fn format_eta(eta: Option<Duration>) -> String {
    eta.map(format_duration).unwrap_or_else(|| "unknown".to_string())
}

/// Logs phase transitions and coarse progress steps.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    started: Instant,
    phase: Option<(Phase, Instant)>,
    /// Last logged progress step.
    logged_step: u32,
    /// Progress steps per run (20 = every 5 %).
    log_steps: u32,
    eta: EtaEstimator,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(started: Instant) -> Self {
        Self {
            started,
            phase: None,
            logged_step: 0,
            log_steps: 20,
            eta: EtaEstimator::new(),
        }
    }

    pub fn eta(&self) -> Option<Duration> {
        self.eta.eta()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn observe(&mut self, checkpoint: &Checkpoint) {
        self.observe_at(Instant::now(), checkpoint);
    }

    pub fn observe_at(&mut self, now: Instant, checkpoint: &Checkpoint) {
        self.eta.record_at(now, checkpoint.progress);

        let changed = self.phase.map_or(true, |(phase, _)| phase != checkpoint.phase);
        if changed {
            if let Some((previous, since)) = self.phase {
                log::info!(
                    "phase {}/{} {} done in {:.2}s",
                    previous.number(),
                    Phase::COUNT,
                    previous,
                    now.saturating_duration_since(since).as_secs_f32()
                );
            }
            log::info!(
                "phase {}/{}: {}",
                checkpoint.phase_number(),
                Phase::COUNT,
                checkpoint.description
            );
            self.phase = Some((checkpoint.phase, now));
        }

        let step = (checkpoint.progress * self.log_steps as f32 + 1e-4).floor() as u32;
        if step > self.logged_step {
            self.logged_step = step;
            log::info!(
                "progress {:.0}% (elapsed {}, eta {})",
                checkpoint.progress * 100.0,
                format_duration(now.saturating_duration_since(self.started)),
                format_eta(self.eta.eta())
            );
        }
    }

    /// Logs the last phase duration and total time.
    pub fn finish(&mut self) {
        let now = Instant::now();
        if let Some((phase, since)) = self.phase.take() {
            log::info!(
                "phase {}/{} {} done in {:.2}s",
                phase.number(),
                Phase::COUNT,
                phase,
                now.saturating_duration_since(since).as_secs_f32()
            );
        }
        log::info!(
            "terrain generated in {}",
            format_duration(now.saturating_duration_since(self.started))
        );
    }

    /// Number of 5 % steps logged so far.
    pub fn logged_steps(&self) -> u32 {
        self.logged_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs_f32(42.7)), "42s");
        assert_eq!(format_duration(Duration::from_secs(185)), "3m 5s");
        assert_eq!(format_duration(Duration::from_secs(3720)), "1h 2m");
        assert_eq!(format_eta(None), "unknown");
    }

    #[test]
    fn test_eta_unknown_without_history() {
        let mut eta = EtaEstimator::new();
        assert_eq!(eta.eta(), None);
        eta.record_at(Instant::now(), 0.1);
        assert_eq!(eta.eta(), None);
    }

    #[test]
    fn test_eta_from_rate() {
        let t0 = Instant::now();
        let mut eta = EtaEstimator::new();
        eta.record_at(t0, 0.0);
        eta.record_at(t0 + Duration::from_secs(10), 0.5);
        let remaining = eta.eta().unwrap();
        assert!((remaining.as_secs_f64() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_eta_unknown_when_stalled() {
        let t0 = Instant::now();
        let mut eta = EtaEstimator::new();
        eta.record_at(t0, 0.3);
        eta.record_at(t0 + Duration::from_secs(5), 0.3);
        assert_eq!(eta.rate(), None);
        assert_eq!(eta.eta(), None);
    }

    #[test]
    fn test_history_is_bounded() {
        let t0 = Instant::now();
        let mut eta = EtaEstimator::new();
        for k in 0..25 {
            eta.record_at(t0 + Duration::from_secs(k), k as f32 * 0.01);
        }
        assert_eq!(eta.len(), ETA_HISTORY);
        // Oldest retained sample is k = 15: rate stays 0.01 per second.
        assert!((eta.rate().unwrap() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_tracker_logs_each_five_percent_once() {
        let t0 = Instant::now();
        let mut tracker = ProgressTracker::starting_at(t0);
        let samples = [0.0, 0.01, 0.049, 0.05, 0.051, 0.12, 0.5, 1.0];
        for (k, p) in samples.into_iter().enumerate() {
            let checkpoint = Checkpoint::new(p, "work", Phase::Warp);
            tracker.observe_at(t0 + Duration::from_millis(k as u64 * 10), &checkpoint);
        }
        assert_eq!(tracker.logged_steps(), 20);
    }

    #[test]
    fn test_checkpoint_clamps() {
        let c = Checkpoint::new(1.5, "done", Phase::Stats);
        assert_eq!(c.progress, 1.0);
        assert_eq!(c.phase_number(), 12);
    }
}
