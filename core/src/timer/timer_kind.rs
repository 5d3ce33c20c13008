use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Closed set of timer strategies the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum TimerKind {
  /// Busy-wait loop on a dedicated worker ([`SpinWaitTimer`](crate::SpinWaitTimer)).
  #[default]
  #[strum(to_string = "high-resolution", serialize = "high_resolution", serialize = "highreso")]
  HighResolution,
  /// Auto-repeating pool timer ([`CoalescingTimer`](crate::CoalescingTimer)).
  #[strum(to_string = "coalescing", serialize = "server")]
  Coalescing,
  /// One-shot timer rearmed on every firing ([`ReschedulingTimer`](crate::ReschedulingTimer)).
  #[strum(to_string = "rescheduling", serialize = "threading")]
  Rescheduling,
}

impl TimerKind {
  /// Parses a kind tag, falling back to [`TimerKind::HighResolution`] for unknown tags.
  pub fn from_tag(tag: &str) -> Self {
    tag.parse().unwrap_or_else(|_| {
      tracing::warn!(tag, "unknown timer kind, falling back to {}", TimerKind::HighResolution);
      TimerKind::HighResolution
    })
  }
}
