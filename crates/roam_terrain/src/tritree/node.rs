//! TriNode - one triangle of a binary triangle tree.
//!
//! Stores the tree structure only, no coordinates. Corners are carried down
//! the recursion from the tile roots.

/// Which of the tile's two root triangles.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Half {
  /// Root with its apex at the tile origin corner.
  Left,
  /// Root with its apex at the far corner.
  Right,
}

impl Half {
  /// Both halves in traversal order.
  pub const ALL: [Half; 2] = [Half::Left, Half::Right];

  /// Array slot of this half.
  #[inline]
  pub fn index(self) -> usize {
    match self {
      Half::Left => 0,
      Half::Right => 1,
    }
  }

  /// The other root.
  #[inline]
  pub fn opposite(self) -> Self {
    match self {
      Half::Left => Half::Right,
      Half::Right => Half::Left,
    }
  }
}

/// Stable identity of a node inside one tile's tree.
///
/// Roots are owned by the tile, everything else lives in the pool the tree
/// was built from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeId {
  Root(Half),
  Pooled(u32),
}

/// Handle to a sibling pair allocated together.
///
/// The left child is at `first`, the right child at `first + 1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChildPair {
  first: u32,
}

impl ChildPair {
  #[inline]
  pub(crate) fn new(first: u32) -> Self {
    debug_assert!(first % 2 == 0, "pairs start on even slots");
    Self { first }
  }

  #[inline]
  pub fn left(self) -> NodeId {
    NodeId::Pooled(self.first)
  }

  #[inline]
  pub fn right(self) -> NodeId {
    NodeId::Pooled(self.first + 1)
  }
}

/// Triangle tree node.
///
/// Children are held as one pair so a node is never half-split.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct TriNode {
  children: Option<ChildPair>,
  /// Triangle sharing this node's hypotenuse.
  pub base_neighbor: Option<NodeId>,
  /// Triangle sharing the leg between apex and left corner.
  pub left_neighbor: Option<NodeId>,
  /// Triangle sharing the leg between apex and right corner.
  pub right_neighbor: Option<NodeId>,
}

impl TriNode {
  /// A fresh leaf with no links.
  pub const LEAF: Self = Self {
    children: None,
    base_neighbor: None,
    left_neighbor: None,
    right_neighbor: None,
  };

  /// A leaf whose only link is its base neighbor.
  #[inline]
  pub const fn with_base(base: NodeId) -> Self {
    Self {
      base_neighbor: Some(base),
      ..Self::LEAF
    }
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  #[inline]
  pub fn is_branch(&self) -> bool {
    self.children.is_some()
  }

  /// `(left_child, right_child)` of a branch.
  #[inline]
  pub fn children(&self) -> Option<(NodeId, NodeId)> {
    self.children.map(|pair| (pair.left(), pair.right()))
  }

  #[inline]
  pub fn left_child(&self) -> Option<NodeId> {
    self.children.map(ChildPair::left)
  }

  #[inline]
  pub fn right_child(&self) -> Option<NodeId> {
    self.children.map(ChildPair::right)
  }

  #[inline]
  pub(crate) fn set_children(&mut self, pair: ChildPair) {
    self.children = Some(pair);
  }

  /// Replace whichever neighbor link points at `old` with `new`.
  ///
  /// Returns false when no link pointed at `old` (asymmetric adjacency).
  pub(crate) fn relink(&mut self, old: NodeId, new: NodeId) -> bool {
    for link in [
      &mut self.base_neighbor,
      &mut self.left_neighbor,
      &mut self.right_neighbor,
    ] {
      if *link == Some(old) {
        *link = Some(new);
        return true;
      }
    }
    false
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
