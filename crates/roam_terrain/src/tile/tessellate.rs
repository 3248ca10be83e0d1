//! Top-down tessellation of a tile against one camera position.
//!
//! Both halves are refined recursively from their roots. A triangle splits
//! when the tile's [`SplitMetric`] says so, unless its footprint lies
//! entirely beyond the view radius, it sits at the depth limit, or its
//! hypotenuse can no longer be halved on the integer grid.

use glam::{IVec2, Vec2, Vec3};
use web_time::Instant;

use super::Tile;
use crate::camera::TerrainCamera;
use crate::constants::{can_subdivide, corner_index};
use crate::error::{PoolExhausted, Result, TerrainError};
use crate::metric::{SplitMetric, SplitQuery};
use crate::stats::{PoolStatus, TessellateStats};
use crate::tritree::{reset_roots, Half, NodePool, PassKind, PoolSet, TreeView, TriTree, TriangleRef};
use crate::variance::VarianceField;

/// Read-only state shared by one tessellation pass.
struct Refiner<'a> {
  heights: &'a [f32],
  variance: &'a [VarianceField; 2],
  metric: &'a dyn SplitMetric,
  tile_size: u32,
  grid_spacing: f32,
  origin: Vec3,
  max_depth: u32,
  camera_position: Vec3,
  view_radius: f32,
  lod_falloff: f32,
  max_variance: f32,
}

impl Refiner<'_> {
  #[inline]
  fn height(&self, pos: IVec2) -> f32 {
    self.heights[corner_index(pos, self.tile_size)]
  }

  /// Metric input for one triangle.
  ///
  /// The representative point is the centroid, raised to the mean corner
  /// height.
  fn query(&self, tri: &TriangleRef) -> SplitQuery {
    let corners = [tri.left, tri.right, tri.apex];
    let centroid = corners.iter().map(|c| c.as_vec2()).sum::<Vec2>() / 3.0;
    let height = corners.iter().map(|&c| self.height(c)).sum::<f32>() / 3.0;

    let footprint_radius = corners
      .iter()
      .map(|c| c.as_vec2().distance(centroid))
      .fold(0.0f32, f32::max)
      * self.grid_spacing;

    let world = self.origin
      + Vec3::new(centroid.x * self.grid_spacing, height, centroid.y * self.grid_spacing);

    SplitQuery {
      variance: self.variance[tri.half.index()].lookup(tri.index),
      distance: world.distance(self.camera_position),
      footprint_radius,
      view_radius: self.view_radius,
      lod_falloff: self.lod_falloff,
      max_variance: self.max_variance,
    }
  }

  fn should_split(&self, tri: &TriangleRef) -> bool {
    if tri.depth() >= self.max_depth || !can_subdivide(tri.left, tri.right) {
      return false;
    }
    let query = self.query(tri);
    // Entirely out of view range: always coarse.
    if query.distance - query.footprint_radius > query.view_radius {
      return false;
    }
    self.metric.should_split(&query)
  }

  fn refine(
    &self,
    tree: &mut TriTree<'_>,
    tri: TriangleRef,
    stats: &mut TessellateStats,
  ) -> std::result::Result<(), PoolExhausted> {
    if !self.should_split(&tri) {
      return Ok(());
    }
    if tree.node(tri.id).is_leaf() {
      stats.requested_splits += 1;
    }
    tree.split(tri.id)?;

    let Some((left, right)) = tree.node(tri.id).children() else {
      return Ok(());
    };
    self.refine(tree, tri.left_child(left), stats)?;
    self.refine(tree, tri.right_child(right), stats)
  }
}

impl Tile {
  /// Rebuild the tile's tree for a camera at `camera_position`.
  ///
  /// Nodes are claimed from `pool`, which must stay untouched until the
  /// tile's indices have been generated. When the pool runs out the tree
  /// keeps the detail reached so far and the stats report
  /// [`PoolStatus::Exhausted`].
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tile::tessellate"))]
  pub fn tessellate(
    &mut self,
    pool: &mut NodePool,
    camera_position: Vec3,
    view_radius: f32,
  ) -> Result<TessellateStats> {
    if !self.initialized {
      return Err(TerrainError::NotInitialized);
    }
    if self.dirty {
      return Err(TerrainError::StaleVariance { coords: self.coords });
    }

    let start = Instant::now();
    let size = self.config.tile_size;
    reset_roots(&mut self.roots);
    self.vertices.clear();
    self.indices.clear();
    self.binding = Some(pool.binding());
    let used_before = pool.used();

    let refiner = Refiner {
      heights: &self.heights,
      variance: &self.variance,
      metric: &*self.metric,
      tile_size: size,
      grid_spacing: self.config.grid_spacing,
      origin: self.origin,
      max_depth: self.config.effective_max_depth(),
      camera_position,
      view_radius,
      lod_falloff: self.lod_falloff,
      max_variance: self.max_variance,
    };

    let mut stats = TessellateStats::default();
    let mut tree = TriTree::new(&mut self.roots, pool);
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("refine_halves").entered();
      for half in Half::ALL {
        if let Err(err) = refiner.refine(&mut tree, TriangleRef::root(half, size), &mut stats) {
          log::debug!("tile {} stopped refining: {err}", self.coords);
          stats.pool = PoolStatus::Exhausted;
          break;
        }
      }
    }
    stats.splits_performed = tree.splits();

    let view = TreeView::new(&self.roots, pool);
    for half in Half::ALL {
      view.walk(half, size, |tri, node| {
        if node.is_leaf() {
          stats.leaves += 1;
          stats.max_depth = stats.max_depth.max(tri.depth());
        }
        true
      });
    }
    stats.nodes_allocated = pool.used() - used_before;
    stats.time_us = start.elapsed().as_micros() as u64;
    Ok(stats)
  }

  /// Tessellate with the pool `worker` owns for `pass`.
  pub fn tessellate_pass(
    &mut self,
    pools: &mut PoolSet,
    pass: PassKind,
    worker: usize,
    camera_position: Vec3,
    view_radius: f32,
  ) -> Result<TessellateStats> {
    let pool = pools
      .pool_mut(pass, worker)
      .ok_or(TerrainError::NoPool { pass, worker })?;
    self.tessellate(pool, camera_position, view_radius)
  }

  /// Tessellate for the position of `camera`.
  pub fn tessellate_with(
    &mut self,
    pool: &mut NodePool,
    camera: &impl TerrainCamera,
    view_radius: f32,
  ) -> Result<TessellateStats> {
    self.tessellate(pool, camera.position(), view_radius)
  }
}

#[cfg(test)]
#[path = "tessellate_test.rs"]
mod tessellate_test;
