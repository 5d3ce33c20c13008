//! Execution resources shared by the timer strategies.
//!
//! The worker pool is a process-wide tokio runtime; its blocking pool hosts normal-priority
//! spin-wait loops and its async workers drive the [`RecurringTimer`] and [`OneShotTimer`]
//! primitives. Loops at any other priority run on their own threads.

mod one_shot_timer;
mod priority;
mod recurring_timer;
mod worker_pool;

pub use self::{one_shot_timer::*, recurring_timer::*, worker_pool::*};
pub(crate) use self::priority::apply_to_current_thread;
