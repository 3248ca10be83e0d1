//! Views over one tile's triangle tree.
//!
//! A tree is the tile's two roots plus every node it claimed from a pool.
//! [`TriTree`] borrows both mutably for splitting, [`TreeView`] borrows them
//! shared for traversal.

use glam::IVec2;
use smallvec::SmallVec;

use super::node::{Half, NodeId, TriNode};
use super::pool::NodePool;
use crate::constants::{hypotenuse_mid, left_root_corners, right_root_corners, ROOT_NODE_INDEX};
use crate::error::PoolExhausted;

#[inline]
fn lookup<'n>(roots: &'n [TriNode; 2], pool: &'n NodePool, id: NodeId) -> &'n TriNode {
  match id {
    NodeId::Root(half) => &roots[half.index()],
    NodeId::Pooled(index) => pool.get(index),
  }
}

/// Reset both roots to a single unsplit diamond.
///
/// The roots are each other's base neighbor; their legs lie on the tile
/// border and have no neighbor.
pub fn reset_roots(roots: &mut [TriNode; 2]) {
  roots[Half::Left.index()] = TriNode::with_base(NodeId::Root(Half::Right));
  roots[Half::Right.index()] = TriNode::with_base(NodeId::Root(Half::Left));
}

// =============================================================================
// TriTree - mutable view
// =============================================================================

/// Mutable view used while tessellating.
pub struct TriTree<'a> {
  roots: &'a mut [TriNode; 2],
  pool: &'a mut NodePool,
  splits: usize,
}

impl<'a> TriTree<'a> {
  pub fn new(roots: &'a mut [TriNode; 2], pool: &'a mut NodePool) -> Self {
    Self {
      roots,
      pool,
      splits: 0,
    }
  }

  #[inline]
  pub fn node(&self, id: NodeId) -> &TriNode {
    lookup(&*self.roots, &*self.pool, id)
  }

  #[inline]
  fn node_mut(&mut self, id: NodeId) -> &mut TriNode {
    match id {
      NodeId::Root(half) => &mut self.roots[half.index()],
      NodeId::Pooled(index) => self.pool.get_mut(index),
    }
  }

  /// Triangles split through this view, forced splits included.
  #[inline]
  pub fn splits(&self) -> usize {
    self.splits
  }

  /// Shared view of the same tree.
  #[inline]
  pub fn view(&self) -> TreeView<'_> {
    TreeView {
      roots: &*self.roots,
      pool: &*self.pool,
    }
  }

  /// True when `a` and `b` name each other as base neighbor.
  #[inline]
  fn is_diamond(&self, a: NodeId, b: NodeId) -> bool {
    self.node(b).base_neighbor == Some(a)
  }

  /// Split a leaf and link its children into the mesh.
  ///
  /// Splitting a branch is a no-op. A base neighbor that is not in a diamond
  /// with `id` is force-split first, and the diamond partner is split along
  /// with `id`, so both sides of every hypotenuse end at the same depth.
  ///
  /// Room for the whole diamond is checked up front: on `PoolExhausted` the
  /// tree is unchanged at this level (forced splits that already succeeded
  /// stay, and are themselves complete diamonds).
  pub fn split(&mut self, id: NodeId) -> Result<(), PoolExhausted> {
    if self.node(id).is_branch() {
      return Ok(());
    }

    if let Some(base) = self.node(id).base_neighbor {
      if !self.is_diamond(id, base) {
        self.split(base)?;
      }
    }

    // The forced split re-pointed our base link at one of its children.
    let base = match self.node(id).base_neighbor {
      Some(base) if self.is_diamond(id, base) => Some(base),
      Some(base) => {
        log::trace!("asymmetric base link {id:?} -> {base:?}, treating edge as border");
        None
      }
      None => None,
    };

    let needed = match base {
      Some(base) if self.node(base).is_leaf() => 4,
      _ => 2,
    };
    if self.pool.remaining() < needed {
      return Err(PoolExhausted {
        capacity: self.pool.capacity(),
      });
    }

    let parent = *self.node(id);
    let pair = self.pool.allocate()?;
    let (left, right) = (pair.left(), pair.right());
    self.node_mut(id).set_children(pair);
    self.splits += 1;

    {
      let child = self.node_mut(left);
      child.base_neighbor = parent.left_neighbor;
      child.left_neighbor = Some(right);
    }
    {
      let child = self.node_mut(right);
      child.base_neighbor = parent.right_neighbor;
      child.right_neighbor = Some(left);
    }

    // Outer neighbors now border a child instead of the parent.
    if let Some(neighbor) = parent.left_neighbor {
      if !self.node_mut(neighbor).relink(id, left) {
        log::trace!("left neighbor {neighbor:?} does not link back to {id:?}");
      }
    }
    if let Some(neighbor) = parent.right_neighbor {
      if !self.node_mut(neighbor).relink(id, right) {
        log::trace!("right neighbor {neighbor:?} does not link back to {id:?}");
      }
    }

    match base {
      Some(base) => match self.node(base).children() {
        Some((base_left, base_right)) => {
          self.node_mut(base_left).right_neighbor = Some(right);
          self.node_mut(base_right).left_neighbor = Some(left);
          self.node_mut(left).right_neighbor = Some(base_right);
          self.node_mut(right).left_neighbor = Some(base_left);
        }
        // Partner is cross-linked from its own split. Room was reserved.
        None => self.split(base)?,
      },
      None => {
        self.node_mut(left).right_neighbor = None;
        self.node_mut(right).left_neighbor = None;
      }
    }

    Ok(())
  }
}

// =============================================================================
// TreeView - shared view
// =============================================================================

/// A node together with the geometry carried down from its root.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TriangleRef {
  pub id: NodeId,
  pub half: Half,
  /// Heap index within the half (root = 1).
  pub index: u32,
  pub left: IVec2,
  pub right: IVec2,
  pub apex: IVec2,
}

impl TriangleRef {
  /// Root triangle of a half.
  pub fn root(half: Half, tile_size: u32) -> Self {
    let (left, right, apex) = match half {
      Half::Left => left_root_corners(tile_size),
      Half::Right => right_root_corners(tile_size),
    };
    Self {
      id: NodeId::Root(half),
      half,
      index: ROOT_NODE_INDEX,
      left,
      right,
      apex,
    }
  }

  /// Depth below the root (root = 0).
  #[inline]
  pub fn depth(&self) -> u32 {
    crate::constants::node_depth(self.index)
  }

  /// Hypotenuse midpoint, the apex of both children.
  #[inline]
  pub fn mid(&self) -> IVec2 {
    hypotenuse_mid(self.left, self.right)
  }

  /// Left child geometry: `(apex, left, mid)`.
  #[inline]
  pub fn left_child(&self, id: NodeId) -> Self {
    Self {
      id,
      half: self.half,
      index: self.index << 1,
      left: self.apex,
      right: self.left,
      apex: self.mid(),
    }
  }

  /// Right child geometry: `(right, apex, mid)`.
  #[inline]
  pub fn right_child(&self, id: NodeId) -> Self {
    Self {
      id,
      half: self.half,
      index: (self.index << 1) + 1,
      left: self.right,
      right: self.apex,
      apex: self.mid(),
    }
  }
}

/// Read-only view used for traversal and index generation.
#[derive(Clone, Copy)]
pub struct TreeView<'a> {
  roots: &'a [TriNode; 2],
  pool: &'a NodePool,
}

impl<'a> TreeView<'a> {
  pub fn new(roots: &'a [TriNode; 2], pool: &'a NodePool) -> Self {
    Self { roots, pool }
  }

  #[inline]
  pub fn node(&self, id: NodeId) -> &'a TriNode {
    lookup(self.roots, self.pool, id)
  }

  #[inline]
  pub fn pool(&self) -> &'a NodePool {
    self.pool
  }

  /// Depth-first walk of one half, left child before right child.
  ///
  /// `visit` returns whether to descend into the node's children.
  pub fn walk(&self, half: Half, tile_size: u32, mut visit: impl FnMut(&TriangleRef, &TriNode) -> bool) {
    let mut stack: SmallVec<[TriangleRef; 64]> = SmallVec::new();
    stack.push(TriangleRef::root(half, tile_size));

    while let Some(tri) = stack.pop() {
      let node = self.node(tri.id);
      if !visit(&tri, node) {
        continue;
      }
      if let Some((left, right)) = node.children() {
        stack.push(tri.right_child(right));
        stack.push(tri.left_child(left));
      }
    }
  }

  /// Every leaf of both halves in render order.
  pub fn leaves(&self, tile_size: u32) -> Vec<TriangleRef> {
    let mut out = Vec::new();
    for half in Half::ALL {
      self.walk(half, tile_size, |tri, node| {
        if node.is_leaf() {
          out.push(*tri);
        }
        true
      });
    }
    out
  }

  /// Count nodes of both halves, `(branches, leaves)`.
  pub fn count(&self, tile_size: u32) -> (usize, usize) {
    let (mut branches, mut leaves) = (0, 0);
    for half in Half::ALL {
      self.walk(half, tile_size, |_, node| {
        if node.is_leaf() {
          leaves += 1;
        } else {
          branches += 1;
        }
        true
      });
    }
    (branches, leaves)
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
