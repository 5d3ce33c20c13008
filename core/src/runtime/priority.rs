use std::io;

use crate::timer::ThreadPriority;

/// Applies `priority` to the calling thread.
///
/// Only call this on a thread owned by the caller: niceness cannot be lowered again without
/// privileges, so it is never applied to reusable pool threads. Only Linux supports per-thread
/// niceness; elsewhere this returns `ErrorKind::Unsupported` for anything but `Normal`.
pub(crate) fn apply_to_current_thread(priority: ThreadPriority) -> io::Result<()> {
  if priority == ThreadPriority::Normal {
    return Ok(());
  }
  imp::set_niceness(priority.niceness())
}

#[cfg(target_os = "linux")]
mod imp {
  use std::io;

  fn thread_id() -> libc::id_t {
    // SAFETY: gettid takes no arguments and cannot fail.
    unsafe { libc::syscall(libc::SYS_gettid) as libc::id_t }
  }

  #[cfg(test)]
  pub(super) fn current_niceness() -> io::Result<i32> {
    // getpriority may legitimately return -1, so errno has to be cleared and checked.
    // SAFETY: __errno_location returns the calling thread's errno slot.
    unsafe { *libc::__errno_location() = 0 };
    // SAFETY: plain syscall wrapper on the calling thread's id.
    let value = unsafe { libc::getpriority(libc::PRIO_PROCESS, thread_id()) };
    if value == -1 {
      let error = io::Error::last_os_error();
      if error.raw_os_error().unwrap_or(0) != 0 {
        return Err(error);
      }
    }
    Ok(value)
  }

  pub(super) fn set_niceness(niceness: i32) -> io::Result<()> {
    // SAFETY: plain syscall wrapper on the calling thread's id.
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, thread_id(), niceness) };
    if rc == 0 {
      Ok(())
    } else {
      Err(io::Error::last_os_error())
    }
  }
}

#[cfg(not(target_os = "linux"))]
mod imp {
  use std::io;

  pub(super) fn set_niceness(_niceness: i32) -> io::Result<()> {
    Err(io::Error::new(
      io::ErrorKind::Unsupported,
      "per-thread priority is not supported on this platform",
    ))
  }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
  use super::*;
  use std::thread;

  #[test]
  fn test_normal_priority_leaves_thread_untouched() {
    thread::spawn(|| {
      let before = imp::current_niceness().unwrap();
      apply_to_current_thread(ThreadPriority::Normal).unwrap();
      assert_eq!(imp::current_niceness().unwrap(), before);
    })
    .join()
    .unwrap();
  }

  #[test]
  fn test_lowest_priority_applies_to_calling_thread_only() {
    let outer = imp::current_niceness().unwrap();
    thread::spawn(|| {
      let before = imp::current_niceness().unwrap();
      let result = apply_to_current_thread(ThreadPriority::Lowest);
      // Raising niceness is always permitted when starting below the target.
      if before <= ThreadPriority::Lowest.niceness() {
        result.unwrap();
        assert_eq!(imp::current_niceness().unwrap(), ThreadPriority::Lowest.niceness());
      }
    })
    .join()
    .unwrap();
    assert_eq!(imp::current_niceness().unwrap(), outer);
  }
}
