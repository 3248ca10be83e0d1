//! Per-camera-kind visibility bookkeeping.
//!
//! Each tile remembers, for every [`CameraKind`], the last frame it was
//! found visible in. Renderers use this to pick the tiles to tessellate and
//! draw for a pass.

use glam::Vec3;
use rayon::prelude::*;

use super::Tile;
use crate::camera::{CameraKind, TerrainCamera};

impl Tile {
  /// World-space bounding box `(min, max)` from the cached height range.
  pub fn bounds(&self) -> (Vec3, Vec3) {
    let extent = self.config.tile_world_size();
    let min = Vec3::new(self.origin.x, self.min_height, self.origin.z);
    let max = Vec3::new(self.origin.x + extent, self.max_height, self.origin.z + extent);
    (min, max)
  }

  /// True if the tile's bounding box may be seen by `camera`.
  ///
  /// Uninitialized tiles are never visible.
  pub fn is_visible(&self, camera: &impl TerrainCamera) -> bool {
    if !self.initialized {
      return false;
    }
    let (min, max) = self.bounds();
    camera.is_box_visible(min, max)
  }

  /// Record that the tile was visible to a camera kind in `frame`.
  #[inline]
  pub fn mark_visible(&mut self, kind: CameraKind, frame: u64) {
    self.last_visible[kind.index()] = Some(frame);
  }

  /// Last frame the tile was visible to a camera kind.
  #[inline]
  pub fn last_visible_frame(&self, kind: CameraKind) -> Option<u64> {
    self.last_visible[kind.index()]
  }

  #[inline]
  pub fn visible_in_frame(&self, kind: CameraKind, frame: u64) -> bool {
    self.last_visible_frame(kind) == Some(frame)
  }
}

/// Test every tile against `camera` and stamp the visible ones with `frame`.
///
/// Returns the number of visible tiles.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tile::update_visibility"))]
pub fn update_visibility<C>(camera: &C, tiles: &mut [Tile], frame: u64) -> usize
where
  C: TerrainCamera + Sync,
{
  let kind = camera.kind();
  tiles
    .par_iter_mut()
    .map(|tile| {
      let visible = tile.is_visible(camera);
      if visible {
        tile.mark_visible(kind, frame);
      }
      usize::from(visible)
    })
    .sum()
}

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;
