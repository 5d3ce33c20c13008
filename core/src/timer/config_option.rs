use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::timer::TimerConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
  SetSpinSlice(Duration),
  SetSpinCorrection(Duration),
  SetMissedTickBehavior(MissedTickBehavior),
}

impl ConfigOption {
  pub(crate) fn apply(&self, config: &mut TimerConfig) {
    match self {
      ConfigOption::SetSpinSlice(slice) => {
        config.spin_slice = *slice;
      }
      ConfigOption::SetSpinCorrection(correction) => {
        config.spin_correction = *correction;
      }
      ConfigOption::SetMissedTickBehavior(behavior) => {
        config.missed_tick_behavior = *behavior;
      }
    }
  }

  pub fn with_spin_slice(slice: Duration) -> ConfigOption {
    ConfigOption::SetSpinSlice(slice)
  }

  pub fn with_spin_correction(correction: Duration) -> ConfigOption {
    ConfigOption::SetSpinCorrection(correction)
  }

  pub fn with_missed_tick_behavior(behavior: MissedTickBehavior) -> ConfigOption {
    ConfigOption::SetMissedTickBehavior(behavior)
  }
}
