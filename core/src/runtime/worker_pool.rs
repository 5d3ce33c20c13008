use std::sync::{Arc, Barrier};
use std::time::Duration;

use once_cell::sync::OnceCell;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::timer::TimerError;


static POOL_CONFIG: OnceCell<WorkerPoolConfig> = OnceCell::new();
static WORKER_POOL: OnceCell<WorkerPool> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPoolConfig {
  /// Async workers driving the pool-backed timer primitives.
  pub worker_threads: usize,
  /// Blocking threads created up front so the first spin-wait starts do not pay for thread creation.
  pub warm_blocking_threads: usize,
  pub max_blocking_threads: usize,
  /// How long an idle blocking thread is kept before it exits.
  pub thread_keep_alive: Duration,
  pub thread_name: String,
}

impl Default for WorkerPoolConfig {
  fn default() -> Self {
    WorkerPoolConfig {
      worker_threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
      warm_blocking_threads: 8,
      max_blocking_threads: 512,
      thread_keep_alive: Duration::from_secs(60),
      thread_name: "nexus-timer-worker".to_string(),
    }
  }
}

/// Sets the configuration used when the shared pool is first built.
///
/// Returns the rejected configuration if the pool was already configured or built.
pub fn configure(config: WorkerPoolConfig) -> Result<(), WorkerPoolConfig> {
  if WORKER_POOL.get().is_some() {
    return Err(config);
  }
  POOL_CONFIG.set(config)
}

/// Process-wide pool shared by all timers, built on first use.
pub fn shared() -> Result<&'static WorkerPool, TimerError> {
  WORKER_POOL.get_or_try_init(|| {
    let config = POOL_CONFIG.get_or_init(WorkerPoolConfig::default).clone();
    WorkerPool::new(config)
  })
}

/// Tokio runtime standing in for the platform thread pool.
#[derive(Debug)]
pub struct WorkerPool {
  runtime: Runtime,
  config: WorkerPoolConfig,
  warmed: OnceCell<()>,
}

impl WorkerPool {
  pub fn new(config: WorkerPoolConfig) -> Result<Self, TimerError> {
    let runtime = Builder::new_multi_thread()
      .worker_threads(config.worker_threads.max(1))
      .max_blocking_threads(config.max_blocking_threads.max(1))
      .thread_keep_alive(config.thread_keep_alive)
      .thread_name(config.thread_name.clone())
      .enable_all()
      .build()?;
    tracing::debug!(
      worker_threads = config.worker_threads,
      max_blocking_threads = config.max_blocking_threads,
      "worker pool started"
    );
    Ok(Self {
      runtime,
      config,
      warmed: OnceCell::new(),
    })
  }

  pub fn config(&self) -> &WorkerPoolConfig {
    &self.config
  }

  pub fn handle(&self) -> &Handle {
    self.runtime.handle()
  }

  pub fn is_warmed(&self) -> bool {
    self.warmed.get().is_some()
  }

  /// Creates `warm_blocking_threads` blocking threads, once per pool.
  ///
  /// Each warm-up task waits on a shared barrier, which forces them onto distinct threads.
  /// Concurrent callers race safely; only one performs it.
  ///
  /// The boost is not permanent: threads left idle longer than `thread_keep_alive` exit and are
  /// recreated on demand, so raise the keep-alive when timers are started after long idle gaps.
  pub fn warm_up(&self) {
    self.warmed.get_or_init(|| {
      let count = self.config.warm_blocking_threads.min(self.config.max_blocking_threads);
      if count == 0 {
        return;
      }
      let barrier = Arc::new(Barrier::new(count));
      for _ in 0..count {
        let barrier = Arc::clone(&barrier);
        drop(self.runtime.spawn_blocking(move || {
          barrier.wait();
        }));
      }
      tracing::debug!(threads = count, "worker pool warmed up");
    });
  }

  pub fn spawn_blocking<F, R>(&self, f: F) -> JoinHandle<R>
  where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static, {
    self.runtime.spawn_blocking(f)
  }
}

static_assertions::assert_impl_all!(WorkerPool: Send, Sync);
