use crate::timer::{
  CoalescingTimer, ReschedulingTimer, SpinWaitTimer, ThreadPriority, TimerConfig, TimerHandle, TimerKind,
  DEFAULT_INTERVAL_MS,
};


/// Builds stopped timers of a given [`TimerKind`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerFactory;

impl TimerFactory {
  pub fn get_timer(kind: TimerKind, id: &str, interval_ms: u32, priority: ThreadPriority) -> TimerHandle {
    Self::get_timer_with_config(kind, id, interval_ms, priority, TimerConfig::default())
  }

  /// An `interval_ms` of 0 is raised to 1 ms.
  pub fn get_timer_with_config(
    kind: TimerKind,
    id: &str,
    interval_ms: u32,
    priority: ThreadPriority,
    config: TimerConfig,
  ) -> TimerHandle {
    tracing::debug!(%kind, timer_id = id, interval_ms, %priority, "creating timer");
    match kind {
      TimerKind::HighResolution => TimerHandle::new(SpinWaitTimer::new(id, interval_ms, priority, config)),
      TimerKind::Coalescing => TimerHandle::new(CoalescingTimer::new(id, interval_ms, priority, config)),
      TimerKind::Rescheduling => TimerHandle::new(ReschedulingTimer::new(id, interval_ms, priority)),
    }
  }

  /// Resolves `tag` with [`TimerKind::from_tag`], so unknown tags yield a high-resolution timer.
  pub fn get_timer_by_tag(tag: &str, id: &str, interval_ms: u32, priority: ThreadPriority) -> TimerHandle {
    Self::get_timer(TimerKind::from_tag(tag), id, interval_ms, priority)
  }

  pub fn get_default_timer(id: &str) -> TimerHandle {
    Self::get_timer(TimerKind::default(), id, DEFAULT_INTERVAL_MS, ThreadPriority::default())
  }
}
