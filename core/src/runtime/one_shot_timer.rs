use std::fmt::{Debug, Formatter};
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

use crate::timer::TimerError;


type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Arming state of a [`OneShotTimer`]; `None` means never.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schedule {
  pub due: Option<Duration>,
  pub period: Option<Duration>,
}

impl Schedule {
  pub const DISARMED: Schedule = Schedule { due: None, period: None };

  pub fn new(due: Option<Duration>, period: Option<Duration>) -> Self {
    Self { due, period }
  }

  pub fn is_armed(&self) -> bool {
    self.due.is_some()
  }
}

/// One-shot timer rearmed by its driver after every firing.
///
/// [`change`](Self::change) sets the delay to the next firing and the period used to rearm after
/// it. The driver task is spawned on the first `change` and lives until the timer is dropped.
pub struct OneShotTimer {
  handle: Handle,
  schedule: watch::Sender<Schedule>,
  callback: Callback,
  driver: OnceCell<()>,
}

impl Debug for OneShotTimer {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OneShotTimer")
      .field("schedule", &self.schedule())
      .field("driver_started", &self.driver.get().is_some())
      .finish()
  }
}

impl OneShotTimer {
  pub fn new<F>(handle: Handle, callback: F) -> Self
  where
    F: Fn() + Send + Sync + 'static, {
    let (schedule, _) = watch::channel(Schedule::DISARMED);
    Self {
      handle,
      schedule,
      callback: Arc::new(callback),
      driver: OnceCell::new(),
    }
  }

  pub fn schedule(&self) -> Schedule {
    *self.schedule.borrow()
  }

  /// Re-arms the timer: first firing after `due`, then every `period`. A `None` due disarms it.
  pub fn change(&self, due: Option<Duration>, period: Option<Duration>) -> Result<(), TimerError> {
    self.driver.get_or_init(|| {
      self
        .handle
        .spawn(drive(self.schedule.subscribe(), Arc::clone(&self.callback)));
    });
    self
      .schedule
      .send(Schedule::new(due, period))
      .map_err(|_| TimerError::Disposed("one-shot timer driver has exited".to_string()))
  }

  pub fn disarm(&self) -> Result<(), TimerError> {
    self.change(None, None)
  }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
  match deadline {
    Some(deadline) => sleep_until(deadline).await,
    None => pending().await,
  }
}

async fn drive(mut schedule_rx: watch::Receiver<Schedule>, callback: Callback) {
  let mut deadline: Option<Instant> = None;
  let mut period: Option<Duration> = None;
  loop {
    tokio::select! {
      biased;
      changed = schedule_rx.changed() => {
        if changed.is_err() {
          break;
        }
        let schedule = *schedule_rx.borrow_and_update();
        period = schedule.period.filter(|p| !p.is_zero());
        deadline = schedule.due.map(|due| Instant::now() + due);
      }
      _ = sleep_until_deadline(deadline) => {
        let fired_at = deadline;
        callback();
        deadline = match (fired_at, period) {
          (Some(fired_at), Some(period)) => Some((fired_at + period).max(Instant::now())),
          _ => None,
        };
      }
    }
  }
}

static_assertions::assert_impl_all!(OneShotTimer: Send, Sync);
