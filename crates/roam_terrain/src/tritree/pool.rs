//! NodePool - bump allocator for triangle tree nodes.
//!
//! Trees are rebuilt from scratch every frame. Nodes are claimed in sibling
//! pairs from a pre-sized arena and only reclaimed all at once by `reset`,
//! so tessellation never touches the heap.

use std::sync::atomic::{AtomicU64, Ordering};

use super::node::{ChildPair, NodeId, TriNode};
use crate::error::PoolExhausted;

/// Atomic counter for generating unique PoolIds.
static POOL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque pool identifier, unique within the process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PoolId(u64);

impl PoolId {
  fn next() -> Self {
    Self(POOL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  /// Get the raw ID value.
  pub fn raw(&self) -> u64 {
    self.0
  }
}

/// Render pass a pool serves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PassKind {
  Normal,
  Shadow,
}

impl PassKind {
  /// Both passes.
  pub const ALL: [PassKind; 2] = [PassKind::Normal, PassKind::Shadow];

  #[inline]
  pub fn index(self) -> usize {
    match self {
      PassKind::Normal => 0,
      PassKind::Shadow => 1,
    }
  }
}

/// Which pool, and which generation of it, a tree was built from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PoolBinding {
  pub pool: PoolId,
  pub epoch: u64,
  pub pass: PassKind,
}

/// Fixed-capacity arena of triangle nodes.
pub struct NodePool {
  id: PoolId,
  pass: PassKind,
  nodes: Vec<TriNode>,
  /// Index of the next free node.
  next: usize,
  /// Bumped on every reset.
  epoch: u64,
}

impl NodePool {
  /// Create a pool holding `capacity` nodes, rounded up to whole pairs.
  pub fn new(capacity: usize, pass: PassKind) -> Self {
    let capacity = capacity + (capacity & 1);
    debug_assert!(capacity <= u32::MAX as usize, "pool too large for u32 ids");
    Self {
      id: PoolId::next(),
      pass,
      nodes: vec![TriNode::LEAF; capacity],
      next: 0,
      epoch: 0,
    }
  }

  #[inline]
  pub fn id(&self) -> PoolId {
    self.id
  }

  #[inline]
  pub fn pass(&self) -> PassKind {
    self.pass
  }

  #[inline]
  pub fn epoch(&self) -> u64 {
    self.epoch
  }

  /// Identity of the current generation of this pool.
  #[inline]
  pub fn binding(&self) -> PoolBinding {
    PoolBinding {
      pool: self.id,
      epoch: self.epoch,
      pass: self.pass,
    }
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.nodes.len()
  }

  /// Nodes handed out since the last reset.
  #[inline]
  pub fn used(&self) -> usize {
    self.next
  }

  #[inline]
  pub fn remaining(&self) -> usize {
    self.nodes.len() - self.next
  }

  /// True once no further pair can be allocated.
  #[inline]
  pub fn is_exhausted(&self) -> bool {
    self.remaining() < 2
  }

  /// Claim the next sibling pair, cleared to fresh leaves.
  ///
  /// Leaves the pool untouched on failure.
  pub fn allocate(&mut self) -> Result<ChildPair, PoolExhausted> {
    if self.is_exhausted() {
      return Err(PoolExhausted {
        capacity: self.capacity(),
      });
    }
    let first = self.next;
    self.nodes[first] = TriNode::LEAF;
    self.nodes[first + 1] = TriNode::LEAF;
    self.next += 2;
    Ok(ChildPair::new(first as u32))
  }

  /// Rewind to empty. Every node handed out before is invalid afterwards.
  pub fn reset(&mut self) {
    self.next = 0;
    self.epoch = self.epoch.wrapping_add(1);
  }

  /// True if `id` refers to a node allocated in the current epoch.
  ///
  /// Roots are never pool-allocated and always count as live.
  #[inline]
  pub fn is_live(&self, id: NodeId) -> bool {
    match id {
      NodeId::Root(_) => true,
      NodeId::Pooled(index) => (index as usize) < self.next,
    }
  }

  #[inline]
  pub(crate) fn get(&self, index: u32) -> &TriNode {
    debug_assert!((index as usize) < self.next, "read of unallocated node {index}");
    &self.nodes[index as usize]
  }

  #[inline]
  pub(crate) fn get_mut(&mut self, index: u32) -> &mut TriNode {
    debug_assert!((index as usize) < self.next, "write to unallocated node {index}");
    &mut self.nodes[index as usize]
  }
}

impl std::fmt::Debug for NodePool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NodePool")
      .field("id", &self.id)
      .field("pass", &self.pass)
      .field("used", &self.next)
      .field("capacity", &self.nodes.len())
      .field("epoch", &self.epoch)
      .finish()
  }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
