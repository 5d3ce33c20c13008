use std::sync::Arc;

use nexus_timer_utils_rs::timing::Stopwatch;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::runtime::{self, RecurringTimer};
use crate::timer::timer_state::TimerState;
use crate::timer::{
  CustomTimer, Subscription, ThreadPriority, TickHandler, TimerConfig, TimerError, TimerKind,
};

#[cfg(test)]
mod tests;

/// Timer backed by a [`RecurringTimer`] firing on the shared worker pool.
///
/// Periods missed while observers run long are coalesced into one firing. Precision is bounded
/// by the runtime's timer wheel (about 1 ms), so the high-resolution flag is off.
#[derive(Debug)]
pub struct CoalescingTimer {
  shared: Arc<CoalescingShared>,
  config: TimerConfig,
  primitive: OnceCell<RecurringTimer>,
}

#[derive(Debug)]
struct CoalescingShared {
  state: TimerState,
  stopwatch: Mutex<Stopwatch>,
}

impl CoalescingShared {
  fn fire(&self) {
    let elapsed = {
      let mut stopwatch = self.stopwatch.lock();
      stopwatch.stop();
      stopwatch.elapsed()
    };
    self.state.emit_tick(elapsed);
    self.stopwatch.lock().restart();
  }
}

impl CoalescingTimer {
  pub fn new(id: &str, interval_ms: u32, priority: ThreadPriority, config: TimerConfig) -> Self {
    Self {
      shared: Arc::new(CoalescingShared {
        state: TimerState::new(TimerKind::Coalescing, id, interval_ms, priority),
        stopwatch: Mutex::new(Stopwatch::new()),
      }),
      config,
      primitive: OnceCell::new(),
    }
  }

  pub fn config(&self) -> &TimerConfig {
    &self.config
  }

  fn primitive(&self) -> Result<&RecurringTimer, TimerError> {
    self.primitive.get_or_try_init(|| {
      let pool = runtime::shared()?;
      let shared = Arc::clone(&self.shared);
      Ok(
        RecurringTimer::new(pool.handle().clone(), self.shared.state.interval(), move || shared.fire())
          .with_missed_tick_behavior(self.config.missed_tick_behavior),
      )
    })
  }
}

impl CustomTimer for CoalescingTimer {
  fn kind(&self) -> TimerKind {
    TimerKind::Coalescing
  }

  fn id(&self) -> String {
    self.shared.state.id()
  }

  fn set_id(&self, id: &str) {
    self.shared.state.set_id(id);
  }

  fn interval(&self) -> u32 {
    self.shared.state.interval_ms()
  }

  fn set_interval(&self, interval_ms: u32) -> Result<(), TimerError> {
    self.shared.state.set_interval_ms(interval_ms)?;
    if let Some(primitive) = self.primitive.get() {
      primitive.set_period(self.shared.state.interval());
    }
    Ok(())
  }

  fn priority(&self) -> ThreadPriority {
    self.shared.state.priority()
  }

  fn set_priority(&self, priority: ThreadPriority) {
    self.shared.state.set_priority(priority);
  }

  fn use_high_resolution(&self) -> bool {
    false
  }

  fn is_running(&self) -> bool {
    self.primitive.get().is_some_and(RecurringTimer::is_enabled)
  }

  fn subscribe(&self, handler: TickHandler) -> Subscription {
    self.shared.state.subscribe(handler)
  }

  fn unsubscribe(&self, subscription: &Subscription) -> bool {
    self.shared.state.unsubscribe(subscription)
  }

  fn start(&self) -> Result<(), TimerError> {
    let primitive = self.primitive()?;
    let mut stopwatch = self.shared.stopwatch.lock();
    if primitive.is_enabled() {
      tracing::trace!(timer_id = %self.shared.state.id(), "coalescing timer already running");
      return Ok(());
    }
    primitive.set_period(self.shared.state.interval());
    stopwatch.restart();
    primitive.start();
    tracing::debug!(
      timer_id = %self.shared.state.id(),
      interval_ms = self.shared.state.interval_ms(),
      "coalescing timer started"
    );
    Ok(())
  }

  fn stop(&self) {
    let Some(primitive) = self.primitive.get() else {
      return;
    };
    if primitive.is_enabled() {
      primitive.stop();
      tracing::debug!(timer_id = %self.shared.state.id(), "coalescing timer stopped");
    }
    self.shared.stopwatch.lock().stop();
  }
}

impl Drop for CoalescingTimer {
  fn drop(&mut self) {
    self.stop();
  }
}

static_assertions::assert_impl_all!(CoalescingTimer: Send, Sync);
