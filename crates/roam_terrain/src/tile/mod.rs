//! Tile - one square of terrain with its pair of triangle trees.
//!
//! A tile caches the heights of its `(size + 1)^2` corner samples, keeps one
//! [`VarianceField`] per half and owns both tree roots. Every other node of
//! its tree lives in the [`NodePool`](crate::tritree::NodePool) handed to
//! [`Tile::tessellate`].
//!
//! # Frame lifecycle
//!
//! 1. `update_height_map` marks the tile dirty when heights change
//! 2. `compute_variance` rebuilds both variance fields
//! 3. `tessellate` rebuilds the tree against the camera
//! 4. `generate_indices` turns the leaves into vertex and index buffers
//!
//! # Module Structure
//!
//! - [`tessellate`]: split decisions and recursive refinement
//! - [`render`]: leaf traversal, index and border skirt generation
//! - [`visibility`]: per-camera-kind visibility bookkeeping

pub mod render;
pub mod tessellate;
pub mod visibility;

use std::sync::Arc;

use glam::{IVec2, Vec3};

use crate::config::TerrainConfig;
use crate::constants::{corner_index, left_root_corners, right_root_corners, CAMERA_KIND_COUNT};
use crate::error::{Result, TerrainError};
use crate::heightmap::{GridRect, HeightSource};
use crate::metric::{DistanceLodMetric, SplitMetric};
use crate::render_mode::{self, RenderMode};
use crate::tritree::{reset_roots, Half, PoolBinding, TriNode};
use crate::variance::VarianceField;

pub use render::{BorderMesh, SkirtVertex};
pub use visibility::update_visibility;

/// One terrain tile.
pub struct Tile {
  config: TerrainConfig,
  initialized: bool,
  /// Corner position in heightmap samples.
  coords: IVec2,
  /// World position of the corner at `coords`.
  origin: Vec3,
  roots: [TriNode; 2],
  variance: [VarianceField; 2],
  dirty: bool,
  max_variance: f32,
  lod_falloff: f32,
  metric: Arc<dyn SplitMetric>,
  /// Tile-local corner heights, row-major.
  heights: Vec<f32>,
  min_height: f32,
  max_height: f32,
  vertices: Vec<[f32; 3]>,
  indices: Vec<u32>,
  last_visible: [Option<u64>; CAMERA_KIND_COUNT],
  /// Pool generation the current tree was built from.
  binding: Option<PoolBinding>,
}

impl Tile {
  /// Create an uninitialized tile.
  pub fn new(config: TerrainConfig) -> Result<Self> {
    config.validate()?;
    let mut roots = [TriNode::LEAF; 2];
    reset_roots(&mut roots);
    Ok(Self {
      variance: [
        VarianceField::new(config.variance_depth),
        VarianceField::new(config.variance_depth),
      ],
      heights: vec![0.0; config.corner_count()],
      max_variance: config.max_variance,
      lod_falloff: config.lod_falloff,
      config,
      initialized: false,
      coords: IVec2::ZERO,
      origin: Vec3::ZERO,
      roots,
      dirty: true,
      metric: Arc::new(DistanceLodMetric),
      min_height: 0.0,
      max_height: 0.0,
      vertices: Vec::new(),
      indices: Vec::new(),
      last_visible: [None; CAMERA_KIND_COUNT],
      binding: None,
    })
  }

  /// Bind the tile to tile grid position `(tile_x, tile_z)` and load its
  /// heights. The tile is dirty afterwards and has no visibility stamps.
  pub fn init(&mut self, tile_x: i32, tile_z: i32, source: &impl HeightSource) {
    let size = self.config.tile_size as i32;
    self.coords = IVec2::new(tile_x * size, tile_z * size);
    self.origin = Vec3::new(
      self.coords.x as f32 * self.config.grid_spacing,
      0.0,
      self.coords.y as f32 * self.config.grid_spacing,
    );
    self.initialized = true;
    self.last_visible = [None; CAMERA_KIND_COUNT];
    self.reset();
    self.refresh_heights(source, GridRect::whole_tile(self.config.tile_size));
  }

  /// Drop the current tree and buffers.
  ///
  /// Heights, variance and visibility stamps are kept, so a tile found
  /// visible earlier in the frame stays visible after the reset.
  pub fn reset(&mut self) {
    reset_roots(&mut self.roots);
    self.binding = None;
    self.vertices.clear();
    self.indices.clear();
  }

  /// Reload the heights in a tile-local rectangle and mark the tile dirty.
  ///
  /// Returns `false` when the rectangle misses the tile entirely.
  pub fn update_height_map(&mut self, source: &impl HeightSource, rect: GridRect) -> Result<bool> {
    if !self.initialized {
      return Err(TerrainError::NotInitialized);
    }
    let Some(rect) = rect.clamp_to_tile(self.config.tile_size) else {
      return Ok(false);
    };
    self.refresh_heights(source, rect);
    Ok(true)
  }

  fn refresh_heights(&mut self, source: &impl HeightSource, rect: GridRect) {
    let size = self.config.tile_size;
    for z in rect.z1..=rect.z2 {
      for x in rect.x1..=rect.x2 {
        let h = source.height_at(self.coords.x + x, self.coords.y + z);
        self.heights[corner_index(IVec2::new(x, z), size)] = h;
      }
    }
    let (min, max) = self
      .heights
      .iter()
      .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)));
    self.min_height = min;
    self.max_height = max;
    self.dirty = true;
  }

  /// Rebuild both variance fields from the cached heights.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tile::compute_variance"))]
  pub fn compute_variance(&mut self) -> Result<()> {
    if !self.initialized {
      return Err(TerrainError::NotInitialized);
    }
    let size = self.config.tile_size;
    let boost = self.config.shoreline_boost;
    let [left, right] = &mut self.variance;
    left.compute(&self.heights, size, left_root_corners(size), boost);
    right.compute(&self.heights, size, right_root_corners(size), boost);
    self.dirty = false;
    log::trace!(
      "tile {} variance rebuilt, max {:.3}/{:.3}",
      self.coords,
      left.max_variance(),
      right.max_variance()
    );
    Ok(())
  }

  /// Replace the LOD parameters taken from the config.
  pub fn set_lod_params(&mut self, max_variance: f32, lod_falloff: f32) {
    self.max_variance = max_variance;
    self.lod_falloff = lod_falloff;
  }

  /// Replace the split policy.
  pub fn set_split_metric(&mut self, metric: Arc<dyn SplitMetric>) {
    self.metric = metric;
  }

  /// Set or cycle the process-wide render mode.
  pub fn switch_render_mode(mode: Option<RenderMode>) -> RenderMode {
    render_mode::switch_render_mode(mode)
  }

  /// Current process-wide render mode.
  pub fn render_mode() -> RenderMode {
    render_mode::render_mode()
  }

  // ---------------------------------------------------------------------------
  // Accessors
  // ---------------------------------------------------------------------------

  #[inline]
  pub fn config(&self) -> &TerrainConfig {
    &self.config
  }

  #[inline]
  pub fn is_initialized(&self) -> bool {
    self.initialized
  }

  /// True when heights changed since the last `compute_variance`.
  #[inline]
  pub fn is_dirty(&self) -> bool {
    self.dirty
  }

  #[inline]
  pub fn coords(&self) -> IVec2 {
    self.coords
  }

  #[inline]
  pub fn origin(&self) -> Vec3 {
    self.origin
  }

  #[inline]
  pub fn max_variance(&self) -> f32 {
    self.max_variance
  }

  #[inline]
  pub fn lod_falloff(&self) -> f32 {
    self.lod_falloff
  }

  /// Lowest and highest cached height.
  #[inline]
  pub fn height_range(&self) -> (f32, f32) {
    (self.min_height, self.max_height)
  }

  /// Cached height of a tile-local corner.
  #[inline]
  pub fn height(&self, local: IVec2) -> f32 {
    self.heights[corner_index(local, self.config.tile_size)]
  }

  #[inline]
  pub fn variance(&self, half: Half) -> &VarianceField {
    &self.variance[half.index()]
  }

  /// Pool generation of the current tree, if tessellated.
  #[inline]
  pub fn binding(&self) -> Option<PoolBinding> {
    self.binding
  }

  /// World-space vertices from the last `generate_indices`.
  #[inline]
  pub fn vertices(&self) -> &[[f32; 3]] {
    &self.vertices
  }

  /// Triangle list indices from the last `generate_indices`.
  #[inline]
  pub fn indices(&self) -> &[u32] {
    &self.indices
  }

  /// Triangles in the index buffer.
  #[inline]
  pub fn tri_count(&self) -> usize {
    self.indices.len() / 3
  }
}

impl std::fmt::Debug for Tile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Tile")
      .field("coords", &self.coords)
      .field("initialized", &self.initialized)
      .field("dirty", &self.dirty)
      .field("binding", &self.binding)
      .field("triangles", &self.tri_count())
      .finish()
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
