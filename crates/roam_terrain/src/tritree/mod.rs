//! Binary triangle trees backed by fixed-capacity node pools.
//!
//! Nodes reference each other by [`NodeId`] instead of pointers: a tile owns
//! its two roots, every other node lives in the [`NodePool`] the tree was
//! built from. Links are plain indices with `None` as the null sentinel, so
//! lateral neighbor links never create ownership cycles.
//!
//! # Module Structure
//!
//! - [`node`]: `TriNode` - children pair and three neighbor links
//! - [`pool`]: `NodePool` - bump allocator reset once per frame
//! - [`pools`]: `PoolSet` - one pool per worker per pass
//! - [`tree`]: `TriTree` / `TreeView` - split and traversal over one tile

pub mod node;
pub mod pool;
pub mod pools;
pub mod tree;

// Re-exports
pub use node::{ChildPair, Half, NodeId, TriNode};
pub use pool::{NodePool, PassKind, PoolBinding, PoolId};
pub use pools::PoolSet;
pub use tree::{reset_roots, TreeView, TriTree, TriangleRef};
