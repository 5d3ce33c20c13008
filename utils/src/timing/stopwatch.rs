use std::time::{Duration, Instant};

/// Monotonic stopwatch with explicit start/stop/reset, accumulating across start-stop pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwatch {
  started_at: Option<Instant>,
  accumulated: Duration,
}

impl Stopwatch {
  /// `Instant` is backed by the platform's monotonic performance counter on every supported target.
  pub const IS_HIGH_RESOLUTION: bool = true;

  pub fn new() -> Self {
    Self::default()
  }

  pub fn start(&mut self) {
    if self.started_at.is_none() {
      self.started_at = Some(Instant::now());
    }
  }

  pub fn stop(&mut self) {
    if let Some(started_at) = self.started_at.take() {
      self.accumulated += started_at.elapsed();
    }
  }

  pub fn reset(&mut self) {
    self.started_at = None;
    self.accumulated = Duration::ZERO;
  }

  pub fn restart(&mut self) {
    self.reset();
    self.start();
  }

  pub fn is_running(&self) -> bool {
    self.started_at.is_some()
  }

  pub fn elapsed(&self) -> Duration {
    match self.started_at {
      Some(started_at) => self.accumulated + started_at.elapsed(),
      None => self.accumulated,
    }
  }
}
