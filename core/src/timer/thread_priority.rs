use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Scheduling hint for timers that own a worker thread while running.
///
/// Only [`SpinWaitTimer`](crate::SpinWaitTimer) applies it; the pool-backed strategies store it
/// and otherwise ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ThreadPriority {
  Lowest,
  #[strum(to_string = "below_normal", serialize = "low")]
  BelowNormal,
  #[default]
  Normal,
  #[strum(to_string = "above_normal", serialize = "high")]
  AboveNormal,
  Highest,
}

impl ThreadPriority {
  /// Unix niceness applied to the worker thread (lower runs sooner).
  pub const fn niceness(self) -> i32 {
    match self {
      ThreadPriority::Lowest => 10,
      ThreadPriority::BelowNormal => 5,
      ThreadPriority::Normal => 0,
      ThreadPriority::AboveNormal => -5,
      ThreadPriority::Highest => -10,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::*;
  use strum::IntoEnumIterator;

  #[rstest]
  #[case("lowest", ThreadPriority::Lowest)]
  #[case("low", ThreadPriority::BelowNormal)]
  #[case("below_normal", ThreadPriority::BelowNormal)]
  #[case("Normal", ThreadPriority::Normal)]
  #[case("high", ThreadPriority::AboveNormal)]
  #[case("HIGHEST", ThreadPriority::Highest)]
  fn test_parse_priority_tags(#[case] tag: &str, #[case] expected: ThreadPriority) {
    assert_eq!(tag.parse::<ThreadPriority>().unwrap(), expected);
  }

  #[test]
  fn test_niceness_is_monotonic() {
    let niceness = ThreadPriority::iter().map(ThreadPriority::niceness).collect::<Vec<_>>();
    assert!(niceness.windows(2).all(|pair| pair[0] > pair[1]));
    assert_eq!(ThreadPriority::default().niceness(), 0);
  }
}
