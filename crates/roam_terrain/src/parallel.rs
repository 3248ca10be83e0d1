//! Frame driver tessellating many tiles on rayon's thread pool.
//!
//! Tiles are cut into one contiguous chunk per pool of the pass, so each
//! worker owns its pool exclusively for the whole frame and no locking is
//! needed.
//!
//! # Usage
//!
//! ```ignore
//! let mut pools = PoolSet::for_current_threads(config.pool_capacity);
//!
//! // Every frame
//! let stats = tessellate_tiles(&mut tiles, &mut pools, PassKind::Normal, eye, view_radius);
//! for tile in &tiles {
//!     upload(tile.vertices(), tile.indices());
//! }
//! ```

use glam::Vec3;
use rayon::prelude::*;

use crate::stats::FrameStats;
use crate::tile::Tile;
use crate::tritree::{NodePool, PassKind, PoolSet};

/// Tessellate one chunk of tiles against a single pool.
fn tessellate_chunk(
  tiles: &mut [Tile],
  pool: &mut NodePool,
  camera_position: Vec3,
  view_radius: f32,
) -> FrameStats {
  let mut frame = FrameStats::default();
  for tile in tiles.iter_mut().filter(|tile| tile.is_initialized()) {
    if tile.is_dirty() {
      if let Err(err) = tile.compute_variance() {
        log::warn!("skipping tile {}: {err}", tile.coords());
        continue;
      }
      frame.variance_rebuilds += 1;
    }

    let result = tile
      .tessellate(pool, camera_position, view_radius)
      .and_then(|stats| tile.generate_indices(pool).map(|()| stats));
    match result {
      Ok(stats) => frame.record(&stats, tile.tri_count()),
      Err(err) => log::warn!("skipping tile {}: {err}", tile.coords()),
    }
  }
  frame
}

/// Reset the pass's pools, then tessellate and index every initialized tile.
///
/// Dirty tiles get their variance rebuilt first. Buffers of every processed
/// tile are ready for upload when this returns.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "parallel::tessellate_tiles"))]
pub fn tessellate_tiles(
  tiles: &mut [Tile],
  pools: &mut PoolSet,
  pass: PassKind,
  camera_position: Vec3,
  view_radius: f32,
) -> FrameStats {
  pools.reset_all(pass);
  let pools = pools.pools_mut(pass);
  if tiles.is_empty() || pools.is_empty() {
    return FrameStats::default();
  }

  let chunk_size = tiles.len().div_ceil(pools.len());
  let frame = tiles
    .par_chunks_mut(chunk_size)
    .zip(pools.par_iter_mut())
    .map(|(chunk, pool)| tessellate_chunk(chunk, pool, camera_position, view_radius))
    .reduce(FrameStats::default, FrameStats::merge);

  if frame.exhausted_tiles > 0 {
    log::warn!(
      "{} of {} tiles ran out of {pass:?} pool nodes, mesh detail reduced",
      frame.exhausted_tiles,
      frame.tiles
    );
  }
  frame
}
