mod coalescing_timer;
mod config;
mod config_option;
mod custom_timer;
mod rescheduling_timer;
mod spin_wait_timer;
#[cfg(test)]
pub(crate) mod test_support;
mod thread_priority;
mod tick;
mod timer_error;
mod timer_factory;
mod timer_handle;
mod timer_kind;
mod timer_state;

pub use self::{
  coalescing_timer::*, config::*, config_option::*, custom_timer::*, rescheduling_timer::*, spin_wait_timer::*,
  thread_priority::*, tick::*, timer_error::*, timer_factory::*, timer_handle::*, timer_kind::*,
};
