use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::timer::{TickHandler, TimerSource};

#[derive(Debug, Clone)]
pub(crate) struct RecordedTick {
  pub(crate) at: Instant,
  pub(crate) source: TimerSource,
  pub(crate) elapsed: Duration,
}

/// Collects ticks delivered to a handler so tests can wait on and inspect them.
#[derive(Debug, Default)]
pub(crate) struct TickRecorder {
  ticks: Mutex<Vec<RecordedTick>>,
  condvar: Condvar,
}

impl TickRecorder {
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub(crate) fn handler(self: &Arc<Self>) -> TickHandler {
    let recorder = Arc::clone(self);
    TickHandler::new(move |source, elapsed| recorder.record(source, elapsed))
  }

  pub(crate) fn record(&self, source: &TimerSource, elapsed: Duration) {
    let mut ticks = self.ticks.lock();
    ticks.push(RecordedTick {
      at: Instant::now(),
      source: source.clone(),
      elapsed,
    });
    self.condvar.notify_all();
  }

  /// Blocks until at least `count` ticks were recorded; `false` on timeout.
  pub(crate) fn wait_for(&self, count: usize, timeout: Duration) -> bool {
    let mut ticks = self.ticks.lock();
    self
      .condvar
      .wait_while_for(&mut ticks, |ticks| ticks.len() < count, timeout);
    ticks.len() >= count
  }

  pub(crate) fn len(&self) -> usize {
    self.ticks.lock().len()
  }

  pub(crate) fn ticks(&self) -> Vec<RecordedTick> {
    self.ticks.lock().clone()
  }
}

pub(crate) fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

pub(crate) fn millis(duration: Duration) -> f64 {
  duration.as_secs_f64() * 1000.0
}
