//! Statistics from tessellation passes.

/// Whether the pool held out for a whole pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PoolStatus {
  /// Every requested split was performed.
  #[default]
  Sufficient,
  /// A split was refused; the mesh is coarser than requested but crack-free.
  Exhausted,
}

/// Statistics from one tile's tessellation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TessellateStats {
  /// Splits the metric asked for.
  pub requested_splits: usize,
  /// Triangles actually split, forced diamond splits included.
  pub splits_performed: usize,
  /// Pool nodes claimed by this tile.
  pub nodes_allocated: usize,
  /// Leaves in the resulting tree.
  pub leaves: usize,
  /// Deepest leaf depth reached.
  pub max_depth: u32,
  /// Pool state after the pass.
  pub pool: PoolStatus,
  /// Wall time in microseconds.
  pub time_us: u64,
}

impl TessellateStats {
  /// True if the pool never ran out.
  #[inline]
  pub fn is_complete(&self) -> bool {
    self.pool == PoolStatus::Sufficient
  }

  /// Forced diamond splits on top of the requested ones.
  #[inline]
  pub fn forced_splits(&self) -> usize {
    self.splits_performed.saturating_sub(self.requested_splits)
  }
}

/// Aggregate over all tiles tessellated in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
  pub tiles: usize,
  /// Tiles whose variance had to be rebuilt first.
  pub variance_rebuilds: usize,
  /// Tiles that hit pool exhaustion.
  pub exhausted_tiles: usize,
  pub splits_performed: usize,
  pub nodes_allocated: usize,
  pub triangles: usize,
}

impl FrameStats {
  /// Fold one tile's result into the frame totals.
  pub fn record(&mut self, tile: &TessellateStats, triangles: usize) {
    self.tiles += 1;
    if !tile.is_complete() {
      self.exhausted_tiles += 1;
    }
    self.splits_performed += tile.splits_performed;
    self.nodes_allocated += tile.nodes_allocated;
    self.triangles += triangles;
  }

  /// Combine partial results from two workers.
  pub fn merge(self, other: Self) -> Self {
    Self {
      tiles: self.tiles + other.tiles,
      variance_rebuilds: self.variance_rebuilds + other.variance_rebuilds,
      exhausted_tiles: self.exhausted_tiles + other.exhausted_tiles,
      splits_performed: self.splits_performed + other.splits_performed,
      nodes_allocated: self.nodes_allocated + other.nodes_allocated,
      triangles: self.triangles + other.triangles,
    }
  }
}
