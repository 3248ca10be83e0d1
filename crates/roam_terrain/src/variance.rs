//! VarianceField - per-half upper bounds on height error.
//!
//! Triangle `(L, R, A)` is checked at its hypotenuse midpoint `M`:
//!
//! ```text
//!         A
//!        /|\
//!       / | \
//!      /  |  \
//!     /   |   \
//!    L----M----R
//! ```
//!
//! `deviation = |h(M) - (h(L) + h(R)) / 2|`, and the stored variance of a
//! node is the max of its own deviation and both child variances. Children
//! are `(A, L, M)` and `(R, A, M)`, the same geometry tessellation walks.

use glam::IVec2;

use crate::constants::{can_subdivide, corner_index, hypotenuse_mid, ROOT_NODE_INDEX};

/// Deviation assigned to triangles crossing the water plane at least.
const SHORELINE_MIN_VARIANCE: f32 = 20.0;
/// Multiplier applied to the deviation of shoreline triangles.
const SHORELINE_SCALE: f32 = 1.5;

/// Complete binary array of variances for one tile half.
#[derive(Clone, Debug, PartialEq)]
pub struct VarianceField {
  values: Vec<f32>,
}

impl VarianceField {
  /// Zeroed field storing nodes `1..1 << depth`.
  pub fn new(depth: u32) -> Self {
    Self {
      values: vec![0.0; 1usize << depth],
    }
  }

  /// Number of stored levels.
  #[inline]
  pub fn depth(&self) -> u32 {
    self.values.len().trailing_zeros()
  }

  /// Stored variance of a heap node, if within the stored depth.
  #[inline]
  pub fn get(&self, node: u32) -> Option<f32> {
    if node >= ROOT_NODE_INDEX {
      self.values.get(node as usize).copied()
    } else {
      None
    }
  }

  /// Variance of any node. Nodes below the stored depth use their deepest
  /// stored ancestor, which bounds their whole subtree.
  #[inline]
  pub fn lookup(&self, node: u32) -> f32 {
    let len = self.values.len() as u32;
    let mut node = node;
    while node >= len {
      node >>= 1;
    }
    self.values[node as usize]
  }

  /// Root variance, the maximum over the whole half.
  #[inline]
  pub fn max_variance(&self) -> f32 {
    self.values[ROOT_NODE_INDEX as usize]
  }

  /// Raw storage, index 0 unused.
  #[inline]
  pub fn as_slice(&self) -> &[f32] {
    &self.values
  }

  /// Rebuild the field for one half from a tile's corner heights.
  ///
  /// `heights` holds `(tile_size + 1)^2` samples in tile-local row-major
  /// order.
  pub fn compute(
    &mut self,
    heights: &[f32],
    tile_size: u32,
    corners: (IVec2, IVec2, IVec2),
    shoreline_boost: bool,
  ) {
    debug_assert_eq!(heights.len(), (tile_size as usize + 1).pow(2));
    self.values.fill(0.0);

    let (left, right, apex) = corners;
    let mut pass = VariancePass {
      heights,
      tile_size,
      shoreline_boost,
      values: &mut self.values,
    };
    let hgts = [pass.height(left), pass.height(right), pass.height(apex)];
    pass.recurse(left, right, apex, hgts, ROOT_NODE_INDEX);
  }
}

/// State of one recursive rebuild.
struct VariancePass<'a> {
  heights: &'a [f32],
  tile_size: u32,
  shoreline_boost: bool,
  values: &'a mut [f32],
}

impl VariancePass<'_> {
  #[inline]
  fn height(&self, pos: IVec2) -> f32 {
    self.heights[corner_index(pos, self.tile_size)]
  }

  /// `hgts` are the heights of `(left, right, apex)`, passed down so each
  /// sample is read once per triangle.
  fn recurse(&mut self, left: IVec2, right: IVec2, apex: IVec2, hgts: [f32; 3], node: u32) -> f32 {
    if !can_subdivide(left, right) {
      return 0.0;
    }

    let mid = hypotenuse_mid(left, right);
    let mid_height = self.height(mid);
    let [hl, hr, ha] = hgts;

    let mut variance = (mid_height - (hl + hr) * 0.5).abs();

    if self.shoreline_boost && (hl * hr < 0.0 || hl * mid_height < 0.0 || hr * mid_height < 0.0) {
      variance = (variance * SHORELINE_SCALE).max(SHORELINE_MIN_VARIANCE);
    }

    // Children that cannot split contribute nothing; skip the calls.
    if can_subdivide(apex, left) || can_subdivide(right, apex) {
      let first = self.recurse(apex, left, mid, [ha, hl, mid_height], node << 1);
      let second = self.recurse(right, apex, mid, [hr, ha, mid_height], (node << 1) + 1);
      variance = variance.max(first).max(second);
    }

    if let Some(slot) = self.values.get_mut(node as usize) {
      *slot = variance;
    }
    variance
  }
}

#[cfg(test)]
#[path = "variance_test.rs"]
mod variance_test;
