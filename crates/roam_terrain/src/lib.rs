//! roam_terrain - Real-time terrain level of detail with ROAM triangle trees
//!
//! Each terrain tile holds two binary triangle trees that are rebuilt every
//! frame from a fixed-capacity node pool. Trees split where the precomputed
//! height variance, attenuated by camera distance, exceeds a tolerance, and
//! diamond partners are always split together so the mesh never cracks.
//!
//! # Features
//!
//! - **Variance precomputation**: per-half upper bounds on height error,
//!   rebuilt only when heights change
//! - **Crack-free splitting**: forced splits keep every shared hypotenuse at
//!   one depth on both sides
//! - **Pool allocation**: per-worker bump allocators, reset once per frame,
//!   degrading gracefully when full
//! - **Parallel frames**: tiles tessellated on rayon's thread pool
//!
//! # Example
//!
//! ```ignore
//! use roam_terrain::{HeightMap, NodePool, PassKind, TerrainConfig, Tile};
//!
//! let config = TerrainConfig::default();
//! let map = HeightMap::flat(config.tile_size, config.tile_size, 0.0);
//!
//! let mut tile = Tile::new(config.clone())?;
//! tile.init(0, 0, &map);
//! tile.compute_variance()?;
//!
//! let mut pool = NodePool::new(config.pool_capacity, PassKind::Normal);
//! let stats = tile.tessellate(&mut pool, eye, view_radius)?;
//! tile.generate_indices(&pool)?;
//!
//! println!("{} triangles, {} splits", tile.tri_count(), stats.splits_performed);
//! ```

pub mod constants;
pub mod error;

// Re-export commonly used items
pub use constants::{
  corner_index, full_tree_depth, index_to_corner, DEFAULT_GRID_SPACING, DEFAULT_POOL_CAPACITY,
  DEFAULT_TILE_SIZE, DEFAULT_VARIANCE_DEPTH, MAX_TILE_SIZE,
};
pub use error::{PoolExhausted, Result, TerrainError};

pub mod config;
pub use config::TerrainConfig;

// Height and camera collaborators
pub mod camera;
pub mod heightmap;
pub use camera::{CameraKind, Frustum, FrustumCamera, Plane, TerrainCamera};
pub use heightmap::{GridRect, HeightMap, HeightSource};

// Triangle trees and node pools
pub mod tritree;
pub use tritree::{Half, NodeId, NodePool, PassKind, PoolBinding, PoolSet, TreeView, TriNode, TriangleRef};

// Variance and split policy
pub mod metric;
pub mod variance;
pub use metric::{DistanceLodMetric, SplitMetric, SplitQuery};
pub use variance::VarianceField;

// Tiles and frame driving
pub mod parallel;
pub mod render_mode;
pub mod stats;
pub mod tile;
pub use parallel::tessellate_tiles;
pub use render_mode::{render_mode, switch_render_mode, RenderMode};
pub use stats::{FrameStats, PoolStatus, TessellateStats};
pub use tile::{update_visibility, BorderMesh, SkirtVertex, Tile};

#[cfg(test)]
mod test_utils;
