use std::sync::{Arc, Weak};

use crate::timer::{CustomTimer, Subscription, ThreadPriority, TickHandler, TimerError, TimerKind};


/// Shared handle to a timer built by [`TimerFactory`](crate::TimerFactory).
///
/// Clones refer to the same timer. Dropping the last clone stops a running timer. A tick handler
/// that captures a clone of its own timer keeps it alive; capture a [`WeakTimerHandle`] from
/// [`downgrade`](Self::downgrade) instead.
#[derive(Debug, Clone)]
pub struct TimerHandle(Arc<dyn CustomTimer>);

/// Non-owning reference to a timer, for use inside that timer's tick handlers.
#[derive(Debug, Clone)]
pub struct WeakTimerHandle(Weak<dyn CustomTimer>);

impl WeakTimerHandle {
  pub fn upgrade(&self) -> Option<TimerHandle> {
    self.0.upgrade().map(TimerHandle)
  }
}

impl TimerHandle {
  pub fn new(timer: impl CustomTimer) -> Self {
    Self(Arc::new(timer))
  }

  pub fn downgrade(&self) -> WeakTimerHandle {
    WeakTimerHandle(Arc::downgrade(&self.0))
  }

  pub fn ptr_eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl CustomTimer for TimerHandle {
  fn kind(&self) -> TimerKind {
    self.0.kind()
  }

  fn id(&self) -> String {
    self.0.id()
  }

  fn set_id(&self, id: &str) {
    self.0.set_id(id);
  }

  fn interval(&self) -> u32 {
    self.0.interval()
  }

  fn set_interval(&self, interval_ms: u32) -> Result<(), TimerError> {
    self.0.set_interval(interval_ms)
  }

  fn priority(&self) -> ThreadPriority {
    self.0.priority()
  }

  fn set_priority(&self, priority: ThreadPriority) {
    self.0.set_priority(priority);
  }

  fn use_high_resolution(&self) -> bool {
    self.0.use_high_resolution()
  }

  fn is_running(&self) -> bool {
    self.0.is_running()
  }

  fn subscribe(&self, handler: TickHandler) -> Subscription {
    self.0.subscribe(handler)
  }

  fn unsubscribe(&self, subscription: &Subscription) -> bool {
    self.0.unsubscribe(subscription)
  }

  fn start(&self) -> Result<(), TimerError> {
    self.0.start()
  }

  fn stop(&self) {
    self.0.stop();
  }
}

static_assertions::assert_impl_all!(TimerHandle: Send, Sync);
static_assertions::assert_impl_all!(WeakTimerHandle: Send, Sync);
