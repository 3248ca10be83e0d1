//! PoolSet - one node pool per worker per pass.
//!
//! Pools are never locked. Each worker gets exclusive `&mut` access to its
//! own pool for the duration of a frame.

use super::pool::{NodePool, PassKind};

/// Per-worker pools for both render passes.
#[derive(Debug)]
pub struct PoolSet {
  pools: [Vec<NodePool>; 2],
}

impl PoolSet {
  /// Create `workers` pools of `capacity` nodes for each pass.
  pub fn new(workers: usize, capacity: usize) -> Self {
    let workers = workers.max(1);
    let make = |pass: PassKind| -> Vec<NodePool> {
      (0..workers).map(|_| NodePool::new(capacity, pass)).collect()
    };
    log::debug!("creating {workers} node pools of {capacity} nodes per pass");
    Self {
      pools: [make(PassKind::Normal), make(PassKind::Shadow)],
    }
  }

  /// One pool per rayon worker thread.
  pub fn for_current_threads(capacity: usize) -> Self {
    Self::new(rayon::current_num_threads(), capacity)
  }

  /// Replace the pools of one pass, e.g. after the detail level changed.
  pub fn reinit(&mut self, pass: PassKind, capacity: usize) {
    let workers = self.pools[pass.index()].len();
    self.pools[pass.index()] = (0..workers).map(|_| NodePool::new(capacity, pass)).collect();
  }

  /// Number of pools per pass.
  #[inline]
  pub fn workers(&self) -> usize {
    self.pools[0].len()
  }

  /// Reset every pool of a pass. Call once per frame before tessellating.
  pub fn reset_all(&mut self, pass: PassKind) {
    for pool in &mut self.pools[pass.index()] {
      pool.reset();
    }
  }

  #[inline]
  pub fn pool(&self, pass: PassKind, worker: usize) -> Option<&NodePool> {
    self.pools[pass.index()].get(worker)
  }

  #[inline]
  pub fn pool_mut(&mut self, pass: PassKind, worker: usize) -> Option<&mut NodePool> {
    self.pools[pass.index()].get_mut(worker)
  }

  /// All pools of a pass, for handing one to each worker.
  #[inline]
  pub fn pools_mut(&mut self, pass: PassKind) -> &mut [NodePool] {
    &mut self.pools[pass.index()]
  }

  #[inline]
  pub fn pools(&self, pass: PassKind) -> &[NodePool] {
    &self.pools[pass.index()]
  }

  /// Nodes in use across all pools of a pass.
  pub fn used(&self, pass: PassKind) -> usize {
    self.pools(pass).iter().map(NodePool::used).sum()
  }

  /// True if any pool of the pass ran out.
  pub fn any_exhausted(&self, pass: PassKind) -> bool {
    self.pools(pass).iter().any(NodePool::is_exhausted)
  }
}
