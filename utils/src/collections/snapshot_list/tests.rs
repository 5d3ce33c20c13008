use super::*;

#[test]
fn test_push_preserves_insertion_order() {
  let list = SnapshotList::new();
  list.push("a");
  list.push("b");
  list.push("c");

  let snapshot = list.snapshot();
  assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn test_snapshot_is_isolated_from_later_writes() {
  let list = SnapshotList::new();
  let first = list.push(1);
  list.push(2);

  let snapshot = list.snapshot();
  list.push(3);
  assert_eq!(list.remove(first), Some(1));

  assert_eq!(snapshot.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
  assert_eq!(list.snapshot().iter().copied().collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn test_remove_unknown_key_returns_none() {
  let list = SnapshotList::new();
  let key = list.push(10);
  assert_eq!(list.remove(key), Some(10));
  assert_eq!(list.remove(key), None);
  assert!(list.is_empty());
}

#[test]
fn test_keys_are_never_reused() {
  let list = SnapshotList::new();
  let before = list.push("x");
  assert_eq!(list.remove(before), Some("x"));
  let after = list.push("y");
  assert_ne!(before, after);
  assert_eq!(list.remove(before), None);
  assert_eq!(list.len(), 1);
}

#[test]
fn test_concurrent_pushes_are_all_kept() {
  let list = std::sync::Arc::new(SnapshotList::new());
  let writers = (0..8)
    .map(|n| {
      let list = std::sync::Arc::clone(&list);
      std::thread::spawn(move || {
        for i in 0..100 {
          list.push(n * 100 + i);
        }
      })
    })
    .collect::<Vec<_>>();
  for writer in writers {
    writer.join().unwrap();
  }
  assert_eq!(list.len(), 800);
}
