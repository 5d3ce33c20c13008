//! Core functionality for Nexus Timer.
//!
//! A single [`CustomTimer`] contract implemented by three strategies, built through
//! [`TimerFactory`]:
//!
//! - [`SpinWaitTimer`]: sub-millisecond busy-wait loop on a dedicated pool thread.
//! - [`CoalescingTimer`]: auto-repeating timer firing on the shared worker pool.
//! - [`ReschedulingTimer`]: one-shot timer rearmed after every firing.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use nexus_timer_core_rs::{CustomTimer, ThreadPriority, TimerFactory, TimerKind};
//!
//! # fn main() -> Result<(), nexus_timer_core_rs::TimerError> {
//! let timer = TimerFactory::get_timer(TimerKind::HighResolution, "1", 5, ThreadPriority::Highest);
//! timer.on_tick(|source, elapsed| {
//!   println!("timer-{} : {:8.4} ms", source.id(), elapsed.as_secs_f64() * 1000.0);
//! });
//! timer.start()?;
//! std::thread::sleep(Duration::from_millis(100));
//! timer.stop();
//! # Ok(())
//! # }
//! ```

pub mod runtime;
pub mod timer;

pub use timer::*;
