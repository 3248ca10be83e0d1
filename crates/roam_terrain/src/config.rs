//! TerrainConfig - tile geometry, LOD parameters and pool sizing.

use crate::constants::{
  full_tree_depth, DEFAULT_GRID_SPACING, DEFAULT_POOL_CAPACITY, DEFAULT_TILE_SIZE,
  DEFAULT_VARIANCE_DEPTH, MAX_TILE_SIZE,
};
use crate::error::{Result, TerrainError};

/// Configuration shared by all tiles of a terrain.
#[derive(Clone, Debug)]
pub struct TerrainConfig {
  /// Heightmap cells per tile side. Must be a power of two.
  pub tile_size: u32,

  /// World units between adjacent heightmap samples.
  pub grid_spacing: f32,

  /// Depth of the stored variance tree per tile half.
  /// Nodes deeper than this reuse their deepest stored ancestor's variance.
  pub variance_depth: u32,

  /// Deepest tree level tessellation may reach (root = 0).
  /// Clamped to the full grid depth `2 * log2(tile_size)`.
  pub max_depth: u32,

  /// Nodes per pool.
  pub pool_capacity: usize,

  /// Largest distance-attenuated variance left unsplit.
  pub max_variance: f32,

  /// LOD falloff with camera distance.
  /// Higher values coarsen distant triangles sooner.
  pub lod_falloff: f32,

  /// Boost the variance of triangles crossing the water plane (height 0).
  pub shoreline_boost: bool,

  /// Height the border skirts extend down to.
  pub skirt_base_height: f32,
}

impl TerrainConfig {
  /// Effective maximum tree depth.
  #[inline]
  pub fn effective_max_depth(&self) -> u32 {
    self.max_depth.min(full_tree_depth(self.tile_size))
  }

  /// Number of entries in one variance field.
  #[inline]
  pub fn variance_len(&self) -> usize {
    1usize << self.variance_depth
  }

  /// World-space length of one tile side.
  #[inline]
  pub fn tile_world_size(&self) -> f32 {
    self.tile_size as f32 * self.grid_spacing
  }

  /// Corner samples per tile (`(size + 1)^2`).
  #[inline]
  pub fn corner_count(&self) -> usize {
    let n = self.tile_size as usize + 1;
    n * n
  }

  /// Check value ranges.
  pub fn validate(&self) -> Result<()> {
    if self.tile_size < 2 || !self.tile_size.is_power_of_two() {
      return Err(TerrainError::InvalidConfig(format!(
        "tile_size must be a power of two >= 2, got {}",
        self.tile_size
      )));
    }
    if self.tile_size > MAX_TILE_SIZE {
      return Err(TerrainError::InvalidConfig(format!(
        "tile_size must be at most {MAX_TILE_SIZE}, got {}",
        self.tile_size
      )));
    }
    if !(self.grid_spacing > 0.0) {
      return Err(TerrainError::InvalidConfig(format!(
        "grid_spacing must be positive, got {}",
        self.grid_spacing
      )));
    }
    if self.variance_depth == 0 || self.variance_depth > 24 {
      return Err(TerrainError::InvalidConfig(format!(
        "variance_depth must be in 1..=24, got {}",
        self.variance_depth
      )));
    }
    if self.pool_capacity < 2 {
      return Err(TerrainError::InvalidConfig(format!(
        "pool_capacity must hold at least one node pair, got {}",
        self.pool_capacity
      )));
    }
    if !(self.max_variance >= 0.0) {
      return Err(TerrainError::InvalidConfig(format!(
        "max_variance must be non-negative, got {}",
        self.max_variance
      )));
    }
    if !(self.lod_falloff >= 0.0) {
      return Err(TerrainError::InvalidConfig(format!(
        "lod_falloff must be non-negative, got {}",
        self.lod_falloff
      )));
    }
    Ok(())
  }
}

impl Default for TerrainConfig {
  fn default() -> Self {
    Self {
      tile_size: DEFAULT_TILE_SIZE,
      grid_spacing: DEFAULT_GRID_SPACING,
      variance_depth: DEFAULT_VARIANCE_DEPTH,
      max_depth: full_tree_depth(DEFAULT_TILE_SIZE),
      pool_capacity: DEFAULT_POOL_CAPACITY,
      max_variance: 1.0,
      lod_falloff: 8.0,
      shoreline_boost: false,
      skirt_base_height: -400.0,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
