use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
  #[error("Invalid interval: {0} ms (must be positive)")]
  InvalidInterval(u32),
  #[error("Worker pool unavailable: {0}")]
  WorkerPoolUnavailable(String),
  #[error("Timer disposed: {0}")]
  Disposed(String),
}

impl From<std::io::Error> for TimerError {
  fn from(error: std::io::Error) -> Self {
    TimerError::WorkerPoolUnavailable(error.to_string())
  }
}

static_assertions::assert_impl_all!(TimerError: Send, Sync);
