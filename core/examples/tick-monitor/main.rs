use clap::Parser;
use nexus_timer_core_rs::{CustomTimer, ThreadPriority, TimerFactory, TimerHandle, TimerKind};
use nexus_timer_utils_rs::concurrent::CountDownLatch;
use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Runs a set of timers and reports the measured tick periods", long_about = None)]
struct Args {
  /// high-resolution, coalescing or rescheduling; unknown tags fall back to high-resolution.
  #[clap(long, default_value = "high-resolution")]
  kind: String,

  #[clap(long, default_value = "4")]
  timers: usize,

  #[clap(long, default_value = "5")]
  interval: u32,

  #[clap(long, default_value = "normal")]
  priority: ThreadPriority,

  #[clap(long, default_value = "3s")]
  duration: humantime::Duration,

  /// Interval applied to every timer halfway through the run.
  #[clap(long)]
  change_interval: Option<u32>,
}

#[derive(Debug, Default)]
struct TickStats {
  count: u64,
  min: Option<Duration>,
  max: Duration,
  total: Duration,
}

impl TickStats {
  fn record(&mut self, elapsed: Duration) {
    self.count += 1;
    self.min = Some(self.min.map_or(elapsed, |min| min.min(elapsed)));
    self.max = self.max.max(elapsed);
    self.total += elapsed;
  }

  fn average(&self) -> Duration {
    if self.count == 0 {
      Duration::ZERO
    } else {
      self.total.div_f64(self.count as f64)
    }
  }
}

fn millis(duration: Duration) -> f64 {
  duration.as_secs_f64() * 1000.0
}

fn spawn_timer(
  args: &Args,
  kind: TimerKind,
  index: usize,
  first_ticks: &CountDownLatch,
) -> (TimerHandle, Arc<Mutex<TickStats>>) {
  let timer = TimerFactory::get_timer(kind, &index.to_string(), args.interval, args.priority);
  let stats = Arc::new(Mutex::new(TickStats::default()));
  let first_seen = AtomicBool::new(false);

  let cloned_stats = stats.clone();
  let latch = first_ticks.clone();
  timer.on_tick(move |source, elapsed| {
    tracing::trace!("timer-{} : {:8.4} ms", source.id(), millis(elapsed));
    cloned_stats.lock().record(elapsed);
    if !first_seen.swap(true, Ordering::SeqCst) {
      latch.count_down();
    }
  });
  (timer, stats)
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();
  let kind = TimerKind::from_tag(&args.kind);
  let run_for: Duration = args.duration.into();
  let first_ticks = CountDownLatch::new(args.timers);

  let timers = (1..=args.timers)
    .map(|index| spawn_timer(&args, kind, index, &first_ticks))
    .collect::<Vec<_>>();

  tracing::info!(%kind, timers = args.timers, interval_ms = args.interval, "starting");
  for (timer, _) in &timers {
    timer.start().unwrap();
  }
  if !first_ticks.wait_timeout(Duration::from_secs(5)) {
    tracing::warn!(pending = first_ticks.count(), "not every timer ticked within 5s");
  }

  match args.change_interval {
    Some(interval) => {
      thread::sleep(run_for / 2);
      for (timer, _) in &timers {
        timer.set_interval(interval).unwrap();
      }
      tracing::info!(interval_ms = interval, "interval changed");
      thread::sleep(run_for / 2);
    }
    None => thread::sleep(run_for),
  }

  for (timer, _) in &timers {
    timer.stop();
  }
  tracing::info!("stopped");

  println!("{:>8} {:>8} {:>10} {:>10} {:>10}", "timer", "ticks", "min ms", "avg ms", "max ms");
  for (timer, stats) in &timers {
    let stats = stats.lock();
    println!(
      "{:>8} {:>8} {:>10.4} {:>10.4} {:>10.4}",
      timer.id(),
      stats.count,
      millis(stats.min.unwrap_or_default()),
      millis(stats.average()),
      millis(stats.max)
    );
  }
}
