use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::timer::ConfigOption;

pub const DEFAULT_INTERVAL_MS: u32 = 1000;
pub const DEFAULT_SPIN_SLICE: Duration = Duration::from_millis(1);
pub const DEFAULT_SPIN_CORRECTION: Duration = Duration::from_micros(800);

/// Per-timer tuning shared by all strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
  /// Sleep between elapsed-time checks in the spin-wait loop.
  pub spin_slice: Duration,
  /// Subtracted from the interval to absorb sleep overshoot in the spin-wait loop.
  pub spin_correction: Duration,
  /// How the coalescing primitive handles periods missed while a firing ran long.
  pub missed_tick_behavior: MissedTickBehavior,
}

impl Default for TimerConfig {
  fn default() -> Self {
    TimerConfig {
      spin_slice: DEFAULT_SPIN_SLICE,
      spin_correction: DEFAULT_SPIN_CORRECTION,
      missed_tick_behavior: MissedTickBehavior::Skip,
    }
  }
}

impl TimerConfig {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> TimerConfig {
    let mut config = TimerConfig::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }

  /// Elapsed time at which the spin-wait loop stops waiting for a period of `interval`.
  pub fn spin_target(&self, interval: Duration) -> Duration {
    interval.saturating_sub(self.spin_correction)
  }
}
