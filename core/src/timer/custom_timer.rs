use std::fmt::Debug;
use std::time::Duration;

use crate::timer::{Subscription, ThreadPriority, TickHandler, TimerError, TimerKind, TimerSource};

/// Periodic callback contract shared by every timer strategy.
///
/// All operations take `&self` and may be called from any thread, including from inside a tick
/// handler of the same timer.
pub trait CustomTimer: Debug + Send + Sync + 'static {
  fn kind(&self) -> TimerKind;

  /// Caller-assigned identifier, used only for correlation.
  fn id(&self) -> String;

  fn set_id(&self, id: &str);

  /// Interval in milliseconds.
  fn interval(&self) -> u32;

  /// Changes the interval. Running spin-wait and coalescing timers use it from the next period;
  /// a running rescheduling timer fires at once and continues with the new period.
  fn set_interval(&self, interval_ms: u32) -> Result<(), TimerError>;

  fn priority(&self) -> ThreadPriority;

  /// Applied from the next `start` by thread-backed strategies; stored only by the others.
  fn set_priority(&self, priority: ThreadPriority);

  /// Whether ticks are measured and paced with a high-resolution clock.
  fn use_high_resolution(&self) -> bool;

  fn is_running(&self) -> bool;

  fn subscribe(&self, handler: TickHandler) -> Subscription;

  fn unsubscribe(&self, subscription: &Subscription) -> bool;

  /// Starts periodic delivery. Calling it on a running timer does not start a second loop.
  fn start(&self) -> Result<(), TimerError>;

  /// Requests cancellation without waiting for an in-flight tick; one trailing tick may still be
  /// delivered after this returns. Safe to call any number of times, in any state.
  fn stop(&self);

  fn on_tick<F>(&self, f: F) -> Subscription
  where
    Self: Sized,
    F: Fn(&TimerSource, Duration) + Send + Sync + 'static, {
    self.subscribe(TickHandler::new(f))
  }
}
