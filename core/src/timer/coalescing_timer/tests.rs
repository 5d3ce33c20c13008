use super::*;
use crate::timer::test_support::{init_tracing, TickRecorder};
use crate::timer::TimerHandle;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(10);

fn coalescing_timer(interval_ms: u32) -> CoalescingTimer {
  CoalescingTimer::new("coalescing", interval_ms, ThreadPriority::Normal, TimerConfig::default())
}

#[test]
fn test_first_tick_after_about_one_interval() {
  init_tracing();
  let timer = coalescing_timer(50);
  let recorder = TickRecorder::new();
  timer.subscribe(recorder.handler());

  let started = Instant::now();
  timer.start().unwrap();
  assert!(timer.is_running());
  assert!(recorder.wait_for(1, WAIT));
  timer.stop();

  let first = &recorder.ticks()[0];
  assert!(first.at.duration_since(started) >= Duration::from_millis(45));
  assert!(first.elapsed >= Duration::from_millis(45));
  assert!(first.elapsed < Duration::from_millis(50) + Duration::from_millis(40));
  assert_eq!(first.source.id(), "coalescing");
  assert_eq!(first.source.kind(), TimerKind::Coalescing);
}

#[test]
fn test_interval_change_applies_within_two_periods() {
  let timer = coalescing_timer(200);
  let recorder = TickRecorder::new();
  timer.subscribe(recorder.handler());

  timer.start().unwrap();
  assert!(recorder.wait_for(1, WAIT));
  timer.set_interval(20).unwrap();
  let changed_at = Instant::now();
  let seen = recorder.len();
  assert!(recorder.wait_for(seen + 3, WAIT));
  timer.stop();

  let ticks = recorder.ticks();
  assert!(ticks[seen].at.duration_since(changed_at) < Duration::from_millis(100));
  assert!(ticks[seen + 2].elapsed < Duration::from_millis(100));
}

#[test]
fn test_interval_set_while_stopped_applies_on_start() {
  let timer = coalescing_timer(1000);
  let recorder = TickRecorder::new();
  timer.subscribe(recorder.handler());

  timer.set_interval(20).unwrap();
  assert_eq!(timer.interval(), 20);
  let started = Instant::now();
  timer.start().unwrap();
  assert!(recorder.wait_for(1, WAIT));
  timer.stop();

  assert!(recorder.ticks()[0].at.duration_since(started) < Duration::from_millis(500));
}

#[test]
fn test_stop_ends_delivery() {
  let timer = coalescing_timer(5);
  let recorder = TickRecorder::new();
  timer.subscribe(recorder.handler());

  timer.start().unwrap();
  assert!(recorder.wait_for(3, WAIT));
  timer.stop();
  assert!(!timer.is_running());
  thread::sleep(Duration::from_millis(30));
  let settled = recorder.len();
  thread::sleep(Duration::from_millis(100));
  assert_eq!(recorder.len(), settled);
}

#[test]
fn test_stop_is_harmless_in_any_state() {
  let timer = Arc::new(coalescing_timer(10));
  timer.stop();
  timer.start().unwrap();
  let stoppers = (0..8)
    .map(|_| {
      let timer = Arc::clone(&timer);
      thread::spawn(move || timer.stop())
    })
    .collect::<Vec<_>>();
  for stopper in stoppers {
    stopper.join().unwrap();
  }
  timer.stop();
  assert!(!timer.is_running());
}

#[test]
fn test_restart_after_stop() {
  let timer = coalescing_timer(10);
  let recorder = TickRecorder::new();
  timer.subscribe(recorder.handler());

  timer.start().unwrap();
  assert!(recorder.wait_for(2, WAIT));
  timer.stop();
  timer.start().unwrap();
  timer.start().unwrap();
  let seen = recorder.len();
  assert!(recorder.wait_for(seen + 2, WAIT));
  timer.stop();
}

#[test]
fn test_stop_from_inside_tick_handler() {
  let timer = TimerHandle::new(coalescing_timer(5));
  let count = Arc::new(AtomicUsize::new(0));

  let handle = timer.downgrade();
  let count_clone = Arc::clone(&count);
  timer.on_tick(move |_, _| {
    if count_clone.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
      if let Some(handle) = handle.upgrade() {
        handle.stop();
      }
    }
  });

  timer.start().unwrap();
  thread::sleep(Duration::from_millis(200));
  assert_eq!(count.load(Ordering::SeqCst), 2);
  assert!(!timer.is_running());
}

#[test]
fn test_panicking_observer_does_not_stop_the_timer() {
  let timer = coalescing_timer(5);
  let recorder = TickRecorder::new();
  timer.on_tick(|_, _| panic!("observer failure"));
  timer.subscribe(recorder.handler());

  timer.start().unwrap();
  assert!(recorder.wait_for(3, WAIT));
  timer.stop();
}

#[test]
fn test_contract_attributes() {
  let timer = coalescing_timer(1000);
  assert_eq!(timer.kind(), TimerKind::Coalescing);
  assert!(!timer.use_high_resolution());
  assert!(!timer.is_running());
  timer.set_priority(ThreadPriority::Lowest);
  assert_eq!(timer.priority(), ThreadPriority::Lowest);
  assert_eq!(timer.set_interval(0), Err(TimerError::InvalidInterval(0)));
  assert_eq!(timer.interval(), 1000);
}
