use std::sync::Arc;
use std::thread;

use nexus_timer_utils_rs::timing::Stopwatch;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::runtime::{self, apply_to_current_thread};
use crate::timer::timer_state::TimerState;
use crate::timer::{
  CustomTimer, Subscription, ThreadPriority, TickHandler, TimerConfig, TimerError, TimerKind,
};


/// High-resolution timer driven by a sleep-and-poll loop on a dedicated worker.
///
/// Each period the loop sleeps in `spin_slice` steps until the stopwatch reaches
/// `interval - spin_correction`, then reports the measured elapsed time. Trading CPU for precision
/// keeps periods within a fraction of a millisecond of the interval, well below what plain
/// platform timers deliver.
///
/// `Normal` priority loops run on the shared pool's blocking threads (warmed up on first use);
/// any other priority gets its own thread so the priority change dies with it.
#[derive(Debug)]
pub struct SpinWaitTimer {
  shared: Arc<SpinWaitShared>,
}

#[derive(Debug)]
struct LoopToken {
  generation: u64,
  token: CancellationToken,
}

#[derive(Debug, Default)]
struct TokenSlot {
  current: Option<LoopToken>,
  next_generation: u64,
}

impl TokenSlot {
  fn is_live(&self) -> bool {
    self
      .current
      .as_ref()
      .is_some_and(|current| !current.token.is_cancelled())
  }
}

#[derive(Debug)]
struct SpinWaitShared {
  state: TimerState,
  config: TimerConfig,
  // Only start, stop and loop cleanup take this lock; the interval has its own.
  token: Mutex<TokenSlot>,
}

impl SpinWaitTimer {
  pub fn new(id: &str, interval_ms: u32, priority: ThreadPriority, config: TimerConfig) -> Self {
    Self {
      shared: Arc::new(SpinWaitShared {
        state: TimerState::new(TimerKind::HighResolution, id, interval_ms, priority),
        config,
        token: Mutex::new(TokenSlot::default()),
      }),
    }
  }

  pub fn config(&self) -> &TimerConfig {
    &self.shared.config
  }

  fn launch(&self, generation: u64, token: CancellationToken) -> Result<(), TimerError> {
    let priority = self.shared.state.priority();
    let shared = Arc::clone(&self.shared);
    if priority == ThreadPriority::Normal {
      let pool = runtime::shared()?;
      pool.warm_up();
      drop(pool.spawn_blocking(move || shared.run(generation, token, priority)));
    } else {
      thread::Builder::new()
        .name(format!("nexus-timer-spin-{}", self.shared.state.id()))
        .spawn(move || shared.run(generation, token, priority))?;
    }
    Ok(())
  }
}

impl SpinWaitShared {
  fn run(self: Arc<Self>, generation: u64, token: CancellationToken, priority: ThreadPriority) {
    if let Err(error) = apply_to_current_thread(priority) {
      tracing::debug!(timer_id = %self.state.id(), %priority, %error, "thread priority not applied");
    }
    let mut stopwatch = Stopwatch::new();
    self.spin(&token, &mut stopwatch);
    self.cleanup(generation, &mut stopwatch);
  }

  fn spin(&self, token: &CancellationToken, stopwatch: &mut Stopwatch) {
    loop {
      stopwatch.restart();
      if token.is_cancelled() {
        return;
      }

      let target = self.config.spin_target(self.state.interval());
      while stopwatch.elapsed() < target {
        thread::sleep(self.config.spin_slice);
        if token.is_cancelled() {
          return;
        }
      }

      stopwatch.stop();
      if token.is_cancelled() {
        return;
      }
      self.state.emit_tick(stopwatch.elapsed());
      if token.is_cancelled() {
        return;
      }
    }
  }

  /// Releases the token of the loop that is exiting, unless a later start already replaced it.
  fn cleanup(&self, generation: u64, stopwatch: &mut Stopwatch) {
    let mut slot = self.token.lock();
    if slot
      .current
      .as_ref()
      .is_some_and(|current| current.generation == generation && current.token.is_cancelled())
    {
      slot.current = None;
    }
    if stopwatch.is_running() {
      stopwatch.stop();
    }
    tracing::debug!(timer_id = %self.state.id(), generation, "spin loop exited");
  }
}

impl CustomTimer for SpinWaitTimer {
  fn kind(&self) -> TimerKind {
    TimerKind::HighResolution
  }

  fn id(&self) -> String {
    self.shared.state.id()
  }

  fn set_id(&self, id: &str) {
    self.shared.state.set_id(id);
  }

  fn interval(&self) -> u32 {
    self.shared.state.interval_ms()
  }

  fn set_interval(&self, interval_ms: u32) -> Result<(), TimerError> {
    self.shared.state.set_interval_ms(interval_ms)
  }

  fn priority(&self) -> ThreadPriority {
    self.shared.state.priority()
  }

  fn set_priority(&self, priority: ThreadPriority) {
    self.shared.state.set_priority(priority);
  }

  fn use_high_resolution(&self) -> bool {
    Stopwatch::IS_HIGH_RESOLUTION
  }

  fn is_running(&self) -> bool {
    self.shared.token.lock().is_live()
  }

  fn subscribe(&self, handler: TickHandler) -> Subscription {
    self.shared.state.subscribe(handler)
  }

  fn unsubscribe(&self, subscription: &Subscription) -> bool {
    self.shared.state.unsubscribe(subscription)
  }

  fn start(&self) -> Result<(), TimerError> {
    let mut slot = self.shared.token.lock();
    if slot.is_live() {
      tracing::trace!(timer_id = %self.shared.state.id(), "spin-wait timer already running");
      return Ok(());
    }
    let generation = slot.next_generation;
    slot.next_generation += 1;
    let token = CancellationToken::new();
    self.launch(generation, token.clone())?;
    // Replacing the slot drops the previous, already cancelled token.
    slot.current = Some(LoopToken { generation, token });
    tracing::debug!(
      timer_id = %self.shared.state.id(),
      interval_ms = self.shared.state.interval_ms(),
      generation,
      "spin-wait timer started"
    );
    Ok(())
  }

  fn stop(&self) {
    let slot = self.shared.token.lock();
    if let Some(current) = slot.current.as_ref() {
      if !current.token.is_cancelled() {
        current.token.cancel();
        tracing::debug!(timer_id = %self.shared.state.id(), generation = current.generation, "spin-wait timer stopped");
      }
    }
  }
}

impl Drop for SpinWaitTimer {
  fn drop(&mut self) {
    self.stop();
  }
}

static_assertions::assert_impl_all!(SpinWaitTimer: Send, Sync);
