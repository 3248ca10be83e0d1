//! Error types for tessellation and tile management.

use glam::IVec2;
use thiserror::Error;

use crate::tritree::PassKind;

/// The node pool has no room left for another sibling pair.
///
/// A resource limit, not a failure: tessellation stops refining and keeps the
/// (coarser, crack-free) tree reached so far.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("node pool exhausted ({capacity} nodes)")]
pub struct PoolExhausted {
  /// Capacity of the pool that ran out.
  pub capacity: usize,
}

/// Errors reported by [`Tile`](crate::tile::Tile) operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TerrainError {
  /// Tessellate was called on a dirty tile before `compute_variance`.
  #[error("variance of tile at {coords} is stale, compute variance before tessellating")]
  StaleVariance { coords: IVec2 },

  /// The tile has not been bound to a heightmap position yet.
  #[error("tile has not been initialized")]
  NotInitialized,

  /// The tree was built from another pool, or the pool has been reset since.
  #[error("triangle tree of tile at {coords} does not belong to the given pool epoch")]
  StaleTree { coords: IVec2 },

  /// The pool set has no pool for this pass and worker.
  #[error("no {pass:?} node pool for worker {worker}")]
  NoPool { pass: PassKind, worker: usize },

  /// Configuration values are out of range.
  #[error("invalid terrain config: {0}")]
  InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = TerrainError> = std::result::Result<T, E>;
