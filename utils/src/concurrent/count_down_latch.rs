use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Blocking latch released once `count_down` has been called `count` times.
///
/// Timer callbacks run on pool threads, so waiters block on a `Condvar` instead of awaiting.
#[derive(Clone)]
pub struct CountDownLatch {
  inner: Arc<Inner>,
}

struct Inner {
  count: Mutex<usize>,
  condvar: Condvar,
}

impl Debug for CountDownLatch {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CountDownLatch").field("count", &self.count()).finish()
  }
}

impl Eq for CountDownLatch {}

impl PartialEq for CountDownLatch {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl Default for CountDownLatch {
  fn default() -> Self {
    Self::new(0)
  }
}

impl CountDownLatch {
  pub fn new(count: usize) -> Self {
    Self {
      inner: Arc::new(Inner {
        count: Mutex::new(count),
        condvar: Condvar::new(),
      }),
    }
  }

  pub fn count_down(&self) {
    let mut count = self.inner.count.lock();
    if *count == 0 {
      return;
    }
    *count -= 1;
    tracing::trace!("count_down: count={}", *count);
    if *count == 0 {
      self.inner.condvar.notify_all();
    }
  }

  pub fn count(&self) -> usize {
    *self.inner.count.lock()
  }

  pub fn wait(&self) {
    let mut count = self.inner.count.lock();
    while *count > 0 {
      self.inner.condvar.wait(&mut count);
    }
  }

  /// Returns `true` if the latch reached zero before `timeout` elapsed.
  pub fn wait_timeout(&self, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    let mut count = self.inner.count.lock();
    while *count > 0 {
      if self.inner.condvar.wait_until(&mut count, deadline).timed_out() {
        return *count == 0;
      }
    }
    true
  }
}

static_assertions::assert_impl_all!(CountDownLatch: Send, Sync);
