use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;


type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Auto-repeating timer whose firings run on a tokio runtime.
///
/// Firings of one timer never overlap: the callback runs to completion before the next period is
/// awaited. Changing the period while enabled restarts the countdown with the new period. Periods
/// shorter than 1 ms are raised to 1 ms.
pub struct RecurringTimer {
  handle: Handle,
  period: watch::Sender<Duration>,
  missed_tick_behavior: MissedTickBehavior,
  callback: Callback,
  active: Mutex<Option<CancellationToken>>,
}

impl Debug for RecurringTimer {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RecurringTimer")
      .field("period", &self.period())
      .field("missed_tick_behavior", &self.missed_tick_behavior)
      .field("enabled", &self.is_enabled())
      .finish()
  }
}

impl RecurringTimer {
  pub fn new<F>(handle: Handle, period: Duration, callback: F) -> Self
  where
    F: Fn() + Send + Sync + 'static, {
    let (period, _) = watch::channel(period);
    Self {
      handle,
      period,
      missed_tick_behavior: MissedTickBehavior::Skip,
      callback: Arc::new(callback),
      active: Mutex::new(None),
    }
  }

  pub fn with_missed_tick_behavior(mut self, behavior: MissedTickBehavior) -> Self {
    self.missed_tick_behavior = behavior;
    self
  }

  pub fn period(&self) -> Duration {
    *self.period.borrow()
  }

  pub fn set_period(&self, period: Duration) {
    self.period.send_replace(period);
  }

  pub fn is_enabled(&self) -> bool {
    self.active.lock()
      .as_ref()
      .is_some_and(|token| !token.is_cancelled())
  }

  /// Starts firing every period, the first firing one period from now. No-op when enabled.
  pub fn start(&self) {
    let mut active = self.active.lock();
    if active.as_ref().is_some_and(|token| !token.is_cancelled()) {
      return;
    }
    let token = CancellationToken::new();
    *active = Some(token.clone());
    self.handle.spawn(drive(
      self.period.subscribe(),
      self.missed_tick_behavior,
      Arc::clone(&self.callback),
      token,
    ));
  }

  pub fn stop(&self) {
    if let Some(token) = self.active.lock().take() {
      token.cancel();
    }
  }
}

impl Drop for RecurringTimer {
  fn drop(&mut self) {
    self.stop();
  }
}

fn ticker(period: Duration, behavior: MissedTickBehavior) -> Interval {
  let period = period.max(MIN_PERIOD);
  let mut interval = interval_at(Instant::now() + period, period);
  interval.set_missed_tick_behavior(behavior);
  interval
}

async fn drive(
  mut period_rx: watch::Receiver<Duration>,
  behavior: MissedTickBehavior,
  callback: Callback,
  token: CancellationToken,
) {
  let mut interval = ticker(*period_rx.borrow_and_update(), behavior);
  loop {
    tokio::select! {
      biased;
      _ = token.cancelled() => break,
      changed = period_rx.changed() => {
        if changed.is_err() {
          break;
        }
        interval = ticker(*period_rx.borrow_and_update(), behavior);
      }
      _ = interval.tick() => {
        if token.is_cancelled() {
          break;
        }
        callback();
      }
    }
  }
}

static_assertions::assert_impl_all!(RecurringTimer: Send, Sync);
