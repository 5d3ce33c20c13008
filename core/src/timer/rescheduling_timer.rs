use std::sync::Arc;
use std::time::Duration;

use nexus_timer_utils_rs::timing::Stopwatch;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::runtime::{self, OneShotTimer};
use crate::timer::timer_state::TimerState;
use crate::timer::{CustomTimer, Subscription, ThreadPriority, TickHandler, TimerError, TimerKind};


/// Timer backed by a [`OneShotTimer`] that is rearmed with the current period after every firing.
///
/// `start` and `set_interval` arm the primitive with a due time of zero, so a tick follows
/// immediately and then one every interval. The priority is kept for the contract only.
#[derive(Debug)]
pub struct ReschedulingTimer {
  shared: Arc<ReschedulingShared>,
  primitive: OnceCell<OneShotTimer>,
  // Serializes start, stop and interval changes so their `change` calls cannot interleave.
  running: Mutex<bool>,
}

#[derive(Debug)]
struct ReschedulingShared {
  state: TimerState,
  stopwatch: Mutex<Stopwatch>,
}

impl ReschedulingShared {
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

impl ReschedulingTimer {
  pub fn new(id: &str, interval_ms: u32, priority: ThreadPriority) -> Self {
    Self {
      shared: Arc::new(ReschedulingShared {
        state: TimerState::new(TimerKind::Rescheduling, id, interval_ms, priority),
        stopwatch: Mutex::new(Stopwatch::new()),
      }),
      primitive: OnceCell::new(),
      running: Mutex::new(false),
    }
  }

  fn primitive(&self) -> Result<&OneShotTimer, TimerError> {
    self.primitive.get_or_try_init(|| {
      let pool = runtime::shared()?;
      let shared = Arc::clone(&self.shared);
      Ok(OneShotTimer::new(pool.handle().clone(), move || shared.fire()))
    })
  }

  fn arm_now(&self) -> Result<(), TimerError> {
    self
      .primitive()?
      .change(Some(Duration::ZERO), Some(self.shared.state.interval()))
  }
}

impl CustomTimer for ReschedulingTimer {
  fn kind(&self) -> TimerKind {
    TimerKind::Rescheduling
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
    let running = self.running.lock();
    if *running {
      self.arm_now()?;
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
    *self.running.lock()
  }

  fn subscribe(&self, handler: TickHandler) -> Subscription {
    self.shared.state.subscribe(handler)
  }

  fn unsubscribe(&self, subscription: &Subscription) -> bool {
    self.shared.state.unsubscribe(subscription)
  }

  fn start(&self) -> Result<(), TimerError> {
    let mut running = self.running.lock();
    if *running {
      tracing::trace!(timer_id = %self.shared.state.id(), "rescheduling timer already running");
      return Ok(());
    }
    self.shared.stopwatch.lock().restart();
    self.arm_now()?;
    *running = true;
    tracing::debug!(
      timer_id = %self.shared.state.id(),
      interval_ms = self.shared.state.interval_ms(),
      "rescheduling timer started"
    );
    Ok(())
  }

  fn stop(&self) {
    let mut running = self.running.lock();
    if !*running {
      return;
    }
    if let Some(primitive) = self.primitive.get() {
      if let Err(error) = primitive.disarm() {
        tracing::debug!(timer_id = %self.shared.state.id(), %error, "disarm skipped");
      }
    }
    self.shared.stopwatch.lock().stop();
    *running = false;
    tracing::debug!(timer_id = %self.shared.state.id(), "rescheduling timer stopped");
  }
}

impl Drop for ReschedulingTimer {
  fn drop(&mut self) {
    self.stop();
  }
}

static_assertions::assert_impl_all!(ReschedulingTimer: Send, Sync);
