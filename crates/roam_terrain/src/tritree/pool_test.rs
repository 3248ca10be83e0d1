use super::*;

#[test]
fn test_new_pool_is_empty() {
  let pool = NodePool::new(8, PassKind::Normal);
  assert_eq!(pool.capacity(), 8);
  assert_eq!(pool.used(), 0);
  assert_eq!(pool.remaining(), 8);
  assert!(!pool.is_exhausted());
}

/// Odd capacities round up so nodes always come in pairs.
#[test]
fn test_capacity_rounds_to_pairs() {
  let pool = NodePool::new(5, PassKind::Normal);
  assert_eq!(pool.capacity(), 6);
}

#[test]
fn test_allocate_returns_consecutive_pairs() {
  let mut pool = NodePool::new(8, PassKind::Normal);

  let a = pool.allocate().expect("first pair");
  let b = pool.allocate().expect("second pair");

  assert_eq!(a.left(), NodeId::Pooled(0));
  assert_eq!(a.right(), NodeId::Pooled(1));
  assert_eq!(b.left(), NodeId::Pooled(2));
  assert_eq!(b.right(), NodeId::Pooled(3));
  assert_eq!(pool.used(), 4);
}

/// Every call past capacity fails, and failures have no side effect.
#[test]
fn test_allocate_past_capacity_is_exhausted() {
  let mut pool = NodePool::new(4, PassKind::Normal);
  assert!(pool.allocate().is_ok());
  assert!(pool.allocate().is_ok());

  for _ in 0..5 {
    assert_eq!(pool.allocate(), Err(PoolExhausted { capacity: 4 }));
    assert_eq!(pool.used(), 4, "failed allocate must not move the index");
  }
  assert!(pool.is_exhausted());
}

#[test]
fn test_reset_allows_reallocation_up_to_capacity() {
  let mut pool = NodePool::new(4, PassKind::Shadow);
  while pool.allocate().is_ok() {}
  let epoch = pool.epoch();

  pool.reset();

  assert_eq!(pool.used(), 0);
  assert_eq!(pool.epoch(), epoch + 1);
  assert!(pool.allocate().is_ok());
  assert!(pool.allocate().is_ok());
  assert!(pool.allocate().is_err());
}

/// Reallocated nodes come back cleared, whatever was written before reset.
#[test]
fn test_allocate_clears_reused_nodes() {
  let mut pool = NodePool::new(2, PassKind::Normal);
  let pair = pool.allocate().unwrap();
  if let NodeId::Pooled(i) = pair.left() {
    pool.get_mut(i).base_neighbor = Some(NodeId::Pooled(1));
    pool.get_mut(i).set_children(ChildPair::new(0));
  }

  pool.reset();
  let pair = pool.allocate().unwrap();
  if let NodeId::Pooled(i) = pair.left() {
    assert_eq!(*pool.get(i), TriNode::LEAF);
  }
}

#[test]
fn test_is_live_tracks_allocation() {
  let mut pool = NodePool::new(4, PassKind::Normal);
  assert!(!pool.is_live(NodeId::Pooled(0)));
  assert!(pool.is_live(NodeId::Root(crate::tritree::Half::Left)));

  pool.allocate().unwrap();
  assert!(pool.is_live(NodeId::Pooled(1)));
  assert!(!pool.is_live(NodeId::Pooled(2)));

  pool.reset();
  assert!(!pool.is_live(NodeId::Pooled(0)));
}

#[test]
fn test_pool_ids_are_unique() {
  let a = NodePool::new(2, PassKind::Normal);
  let b = NodePool::new(2, PassKind::Normal);
  assert_ne!(a.id(), b.id());
  assert_ne!(a.binding(), b.binding());
}
