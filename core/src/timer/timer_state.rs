use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::timer::{Subscription, ThreadPriority, TickHandler, TickObservers, TimerError, TimerKind, TimerSource};

/// Attributes every strategy exposes through [`CustomTimer`](crate::CustomTimer).
///
/// The interval has its own mutex: the spin loop reads it every period while writers are rare.
#[derive(Debug)]
pub(crate) struct TimerState {
  kind: TimerKind,
  id: RwLock<String>,
  interval_ms: Mutex<u32>,
  priority: Mutex<ThreadPriority>,
  observers: TickObservers,
}

impl TimerState {
  /// A zero interval is raised to 1 ms; construction never fails.
  pub(crate) fn new(kind: TimerKind, id: &str, interval_ms: u32, priority: ThreadPriority) -> Self {
    if interval_ms == 0 {
      tracing::warn!(timer_id = id, %kind, "interval of 0 ms raised to 1 ms");
    }
    Self {
      kind,
      id: RwLock::new(id.to_string()),
      interval_ms: Mutex::new(interval_ms.max(1)),
      priority: Mutex::new(priority),
      observers: TickObservers::new(),
    }
  }

  pub(crate) fn kind(&self) -> TimerKind {
    self.kind
  }

  pub(crate) fn id(&self) -> String {
    self.id.read().clone()
  }

  pub(crate) fn set_id(&self, id: &str) {
    *self.id.write() = id.to_string();
  }

  pub(crate) fn interval_ms(&self) -> u32 {
    *self.interval_ms.lock()
  }

  pub(crate) fn interval(&self) -> Duration {
    Duration::from_millis(u64::from(self.interval_ms()))
  }

  pub(crate) fn set_interval_ms(&self, interval_ms: u32) -> Result<(), TimerError> {
    validate_interval(interval_ms)?;
    *self.interval_ms.lock() = interval_ms;
    Ok(())
  }

  pub(crate) fn priority(&self) -> ThreadPriority {
    *self.priority.lock()
  }

  pub(crate) fn set_priority(&self, priority: ThreadPriority) {
    *self.priority.lock() = priority;
  }

  pub(crate) fn subscribe(&self, handler: TickHandler) -> Subscription {
    self.observers.subscribe(handler)
  }

  pub(crate) fn unsubscribe(&self, subscription: &Subscription) -> bool {
    self.observers.unsubscribe(subscription)
  }

  pub(crate) fn source(&self) -> TimerSource {
    TimerSource::new(self.id(), self.kind)
  }

  pub(crate) fn emit_tick(&self, elapsed: Duration) {
    let source = self.source();
    tracing::trace!(timer_id = source.id(), kind = %self.kind, ?elapsed, "tick");
    self.observers.notify(&source, elapsed);
  }
}

fn validate_interval(interval_ms: u32) -> Result<(), TimerError> {
  if interval_ms == 0 {
    Err(TimerError::InvalidInterval(interval_ms))
  } else {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::thread;

  #[test]
  fn test_clamps_zero_interval_and_rejects_zero_update() {
    let state = TimerState::new(TimerKind::Coalescing, "a", 0, ThreadPriority::Normal);
    assert_eq!(state.interval_ms(), 1);
    assert_eq!(state.set_interval_ms(0), Err(TimerError::InvalidInterval(0)));
    state.set_interval_ms(7).unwrap();
    assert_eq!(state.interval(), Duration::from_millis(7));
  }

  #[test]
  fn test_state_stays_usable_after_a_panic_while_locked() {
    let state = Arc::new(TimerState::new(TimerKind::HighResolution, "a", 5, ThreadPriority::Normal));
    let cloned = Arc::clone(&state);
    let result = thread::spawn(move || {
      let _interval = cloned.interval_ms.lock();
      let _id = cloned.id.write();
      panic!("panic while holding timer state locks");
    })
    .join();
    assert!(result.is_err());

    state.set_interval_ms(9).unwrap();
    state.set_id("b");
    assert_eq!(state.interval_ms(), 9);
    assert_eq!(state.id(), "b");
  }
}
