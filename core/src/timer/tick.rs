use std::fmt::{Debug, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nexus_timer_utils_rs::collections::{SnapshotKey, SnapshotList};

use crate::timer::TimerKind;


static NEXT_OBSERVERS_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of the timer that produced a tick, captured when the tick fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerSource {
  id: String,
  kind: TimerKind,
}

impl TimerSource {
  pub fn new(id: impl Into<String>, kind: TimerKind) -> Self {
    Self { id: id.into(), kind }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn kind(&self) -> TimerKind {
    self.kind
  }
}

// Callback invoked with the source timer and the measured length of the completed period.
#[derive(Clone)]
pub struct TickHandler(Arc<dyn Fn(&TimerSource, Duration) + Send + Sync + 'static>);

impl TickHandler {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(&TimerSource, Duration) + Send + Sync + 'static, {
    Self(Arc::new(f))
  }

  pub fn run(&self, source: &TimerSource, elapsed: Duration) {
    (self.0)(source, elapsed)
  }
}

impl Debug for TickHandler {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "TickHandler")
  }
}

impl PartialEq for TickHandler {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for TickHandler {}

/// Token returned by `subscribe`; pass it back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
  owner: u64,
  key: SnapshotKey,
}

static_assertions::assert_impl_all!(Subscription: Send, Sync);

/// Ordered tick observers with snapshot-before-firing semantics.
#[derive(Debug)]
pub(crate) struct TickObservers {
  owner: u64,
  handlers: SnapshotList<TickHandler>,
}

impl TickObservers {
  pub(crate) fn new() -> Self {
    Self {
      owner: NEXT_OBSERVERS_ID.fetch_add(1, Ordering::Relaxed),
      handlers: SnapshotList::new(),
    }
  }

  pub(crate) fn subscribe(&self, handler: TickHandler) -> Subscription {
    let key = self.handlers.push(handler);
    tracing::trace!(observers = self.handlers.len(), "tick handler subscribed");
    Subscription { owner: self.owner, key }
  }

  pub(crate) fn unsubscribe(&self, subscription: &Subscription) -> bool {
    subscription.owner == self.owner && self.handlers.remove(subscription.key).is_some()
  }

  /// Invokes every handler registered before this call, in subscription order.
  ///
  /// A panicking handler is logged and skipped so the remaining handlers and the timer keep running.
  pub(crate) fn notify(&self, source: &TimerSource, elapsed: Duration) {
    let snapshot = self.handlers.snapshot();
    for handler in snapshot.iter() {
      if catch_unwind(AssertUnwindSafe(|| handler.run(source, elapsed))).is_err() {
        tracing::warn!(timer_id = source.id(), kind = %source.kind(), "tick handler panicked");
      }
    }
  }
}
