use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

#[cfg(test)]
mod tests;

/// Key returned by [`SnapshotList::push`], used to remove the entry later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotKey(u64);

/// Immutable view of a [`SnapshotList`] taken at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot<T>(Arc<Vec<(SnapshotKey, T)>>);

impl<T> Snapshot<T> {
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.0.iter().map(|(_, value)| value)
  }
}

/// Ordered copy-on-write list.
///
/// Readers take a [`Snapshot`] by loading the current `Arc`; writers publish a new vector with
/// `rcu`. A snapshot never observes pushes or removals made after it was taken.
#[derive(Debug)]
pub struct SnapshotList<T> {
  entries: ArcSwap<Vec<(SnapshotKey, T)>>,
  next_key: AtomicU64,
}

impl<T> Default for SnapshotList<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> SnapshotList<T> {
  pub fn new() -> Self {
    Self {
      entries: ArcSwap::from_pointee(Vec::new()),
      next_key: AtomicU64::new(1),
    }
  }

  pub fn snapshot(&self) -> Snapshot<T> {
    Snapshot(self.entries.load_full())
  }

  pub fn len(&self) -> usize {
    self.entries.load().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl<T: Clone> SnapshotList<T> {
  pub fn push(&self, value: T) -> SnapshotKey {
    let key = SnapshotKey(self.next_key.fetch_add(1, Ordering::Relaxed));
    self.entries.rcu(|entries| {
      let mut next = Vec::clone(entries);
      next.push((key, value.clone()));
      next
    });
    key
  }

  pub fn remove(&self, key: SnapshotKey) -> Option<T> {
    let mut removed = None;
    self.entries.rcu(|entries| {
      let mut next = Vec::clone(entries);
      removed = next
        .iter()
        .position(|(k, _)| *k == key)
        .map(|index| next.remove(index).1);
      next
    });
    removed
  }
}

static_assertions::assert_impl_all!(SnapshotList<String>: Send, Sync);
