use nexus_timer_core_rs::runtime::{self, WorkerPoolConfig};
use nexus_timer_core_rs::{CustomTimer, ThreadPriority, TimerFactory, TimerKind};
use nexus_timer_utils_rs::concurrent::CountDownLatch;
use std::time::Duration;

#[test]
fn test_configured_pool_is_used_by_timers() {
  let config = WorkerPoolConfig {
    worker_threads: 2,
    warm_blocking_threads: 2,
    thread_name: "custom-timer-pool".to_string(),
    ..WorkerPoolConfig::default()
  };
  runtime::configure(config.clone()).unwrap();

  let timer = TimerFactory::get_timer(TimerKind::HighResolution, "pooled", 5, ThreadPriority::Normal);
  let ticked = CountDownLatch::new(1);
  let thread_name = std::sync::Arc::new(parking_lot::Mutex::new(None::<String>));

  let latch = ticked.clone();
  let thread_name_clone = thread_name.clone();
  timer.on_tick(move |_, _| {
    *thread_name_clone.lock() = std::thread::current().name().map(str::to_string);
    latch.count_down();
  });
  timer.start().unwrap();
  assert!(ticked.wait_timeout(Duration::from_secs(10)));
  timer.stop();

  let pool = runtime::shared().unwrap();
  assert_eq!(pool.config(), &config);
  assert!(pool.is_warmed());
  assert_eq!(thread_name.lock().as_deref(), Some("custom-timer-pool"));
  assert!(runtime::configure(WorkerPoolConfig::default()).is_err());
}
