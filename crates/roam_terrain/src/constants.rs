//! Terrain constants and grid indexing helpers.
//!
//! # Grid layout
//!
//! A tile of `size` cells has `size + 1` corner samples per axis. Corner
//! `(x, z)` lives at `z * (size + 1) + x` in every per-tile buffer.
//!
//! ```text
//! (0,0) ---- (size,0)
//!   |  \        |
//!   |    \  R   |      L = left root  (apex at (0,0))
//!   |  L   \    |      R = right root (apex at (size,size))
//!   |        \  |
//! (0,size) -- (size,size)
//! ```

use glam::IVec2;

/// Heightmap cells per tile side.
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Largest tile side whose full-depth heap indices fit in a `u32`.
pub const MAX_TILE_SIZE: u32 = 1 << 15;

/// Depth of the stored variance tree (heap indices `1..1 << depth`).
pub const DEFAULT_VARIANCE_DEPTH: u32 = 12;

/// Nodes reserved per pool.
///
/// Reasonable for most maps, not guaranteed to suffice at every detail
/// level.
pub const DEFAULT_POOL_CAPACITY: usize = 1 << 20;

/// World units between two adjacent heightmap samples.
pub const DEFAULT_GRID_SPACING: f32 = 8.0;

/// Heap index of both root triangles.
pub const ROOT_NODE_INDEX: u32 = 1;

/// Number of distinct camera kinds tracked for visibility.
pub const CAMERA_KIND_COUNT: usize = 4;

/// Convert tile-local corner coordinates to a linear index.
#[inline]
pub fn corner_index(pos: IVec2, tile_size: u32) -> usize {
  debug_assert!(pos.x >= 0 && pos.y >= 0, "corner outside tile: {pos}");
  pos.y as usize * (tile_size as usize + 1) + pos.x as usize
}

/// Convert a linear corner index back to tile-local coordinates.
#[inline]
pub fn index_to_corner(index: usize, tile_size: u32) -> IVec2 {
  let stride = tile_size as usize + 1;
  IVec2::new((index % stride) as i32, (index / stride) as i32)
}

/// Depth of a heap-numbered node (root = 0).
#[inline]
pub fn node_depth(node: u32) -> u32 {
  debug_assert!(node >= ROOT_NODE_INDEX);
  31 - node.leading_zeros()
}

/// Deepest tree level reachable on an integer grid of `tile_size` cells.
///
/// Two splits halve the leg length, so unit-leg leaves sit at
/// `2 * log2(tile_size)`.
#[inline]
pub fn full_tree_depth(tile_size: u32) -> u32 {
  2 * tile_size.trailing_zeros()
}

/// Root corners `(left, right, apex)` of the left half.
#[inline]
pub fn left_root_corners(tile_size: u32) -> (IVec2, IVec2, IVec2) {
  let s = tile_size as i32;
  (IVec2::new(0, s), IVec2::new(s, 0), IVec2::new(0, 0))
}

/// Root corners `(left, right, apex)` of the right half.
#[inline]
pub fn right_root_corners(tile_size: u32) -> (IVec2, IVec2, IVec2) {
  let s = tile_size as i32;
  (IVec2::new(s, 0), IVec2::new(0, s), IVec2::new(s, s))
}

/// Hypotenuse midpoint of a triangle.
#[inline]
pub fn hypotenuse_mid(left: IVec2, right: IVec2) -> IVec2 {
  IVec2::new((left.x + right.x) >> 1, (left.y + right.y) >> 1)
}

/// A triangle can be split while its hypotenuse spans more than one cell on
/// some axis.
#[inline]
pub fn can_subdivide(left: IVec2, right: IVec2) -> bool {
  let d = (left - right).abs();
  d.x > 1 || d.y > 1
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
