//! Leaf traversal and render buffer generation.

use glam::{IVec2, Vec3};

use super::Tile;
use crate::constants::corner_index;
use crate::error::{Result, TerrainError};
use crate::tritree::{Half, NodePool, TreeView, TriangleRef};

/// Marks a corner that has no vertex yet.
const NO_VERTEX: u32 = u32::MAX;

/// Vertex of a border skirt.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SkirtVertex {
  pub position: [f32; 3],
  /// 1.0 along the surface, 0.0 at the skirt base.
  pub alpha: f32,
}

/// Skirt geometry hanging from the tile border, as a triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BorderMesh {
  pub vertices: Vec<SkirtVertex>,
  pub indices: Vec<u32>,
}

impl BorderMesh {
  #[inline]
  pub fn tri_count(&self) -> usize {
    self.indices.len() / 3
  }
}

/// Edges of a triangle as `(a, b)` corner pairs: hypotenuse, left leg,
/// right leg.
#[inline]
fn edges(tri: &TriangleRef) -> [(IVec2, IVec2); 3] {
  [(tri.left, tri.right), (tri.apex, tri.left), (tri.right, tri.apex)]
}

#[inline]
fn is_border_edge(a: IVec2, b: IVec2, size: i32) -> bool {
  (a.x == b.x && (a.x == 0 || a.x == size)) || (a.y == b.y && (a.y == 0 || a.y == size))
}

impl Tile {
  /// Shared view of the current tree.
  ///
  /// Fails unless `pool` is the pool, and the epoch of it, the tree was
  /// built from.
  pub fn tree<'a>(&'a self, pool: &'a NodePool) -> Result<TreeView<'a>> {
    self.check_binding(pool)?;
    Ok(TreeView::new(&self.roots, pool))
  }

  fn check_binding(&self, pool: &NodePool) -> Result<()> {
    match self.binding {
      Some(binding) if binding == pool.binding() => Ok(()),
      _ => Err(TerrainError::StaleTree { coords: self.coords }),
    }
  }

  /// World position of a tile-local corner.
  #[inline]
  pub fn world_position(&self, local: IVec2) -> Vec3 {
    self.origin
      + Vec3::new(
        local.x as f32 * self.config.grid_spacing,
        self.height(local),
        local.y as f32 * self.config.grid_spacing,
      )
  }

  /// Every leaf of both halves, left child before right child.
  pub fn leaves(&self, pool: &NodePool) -> Result<Vec<TriangleRef>> {
    Ok(self.tree(pool)?.leaves(self.config.tile_size))
  }

  /// Rebuild the vertex and index buffers from the current leaves.
  ///
  /// Each leaf emits `(apex, left, right)`. Only corners used by a leaf get
  /// a vertex, numbered in first-use order.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tile::generate_indices"))]
  pub fn generate_indices(&mut self, pool: &NodePool) -> Result<()> {
    self.check_binding(pool)?;

    let size = self.config.tile_size;
    let mut slots = vec![NO_VERTEX; self.config.corner_count()];
    let mut vertices = std::mem::take(&mut self.vertices);
    let mut indices = std::mem::take(&mut self.indices);
    vertices.clear();
    indices.clear();

    {
      let view = TreeView::new(&self.roots, pool);
      for half in Half::ALL {
        view.walk(half, size, |tri, node| {
          if node.is_branch() {
            return true;
          }
          for corner in [tri.apex, tri.left, tri.right] {
            let slot = &mut slots[corner_index(corner, size)];
            if *slot == NO_VERTEX {
              *slot = vertices.len() as u32;
              vertices.push(self.world_position(corner).to_array());
            }
            indices.push(*slot);
          }
          false
        });
      }
    }

    self.vertices = vertices;
    self.indices = indices;
    Ok(())
  }

  /// Build skirts along the tile border down to the configured base height.
  ///
  /// Only triangles touching the border with a whole edge are visited; each
  /// border edge of a leaf becomes one quad.
  pub fn generate_border(&self, pool: &NodePool) -> Result<BorderMesh> {
    let view = self.tree(pool)?;
    let size = self.config.tile_size;
    let base = self.config.skirt_base_height;
    let mut mesh = BorderMesh::default();

    for half in Half::ALL {
      view.walk(half, size, |tri, node| {
        let tri_edges = edges(tri);
        let on_border = tri_edges.map(|(a, b)| is_border_edge(a, b, size as i32));
        if !on_border.contains(&true) {
          return false;
        }
        if node.is_branch() {
          return true;
        }
        for (a, b) in tri_edges.into_iter().zip(on_border).filter_map(|(e, on)| on.then_some(e)) {
          let top_a = self.world_position(a);
          let top_b = self.world_position(b);
          let first = mesh.vertices.len() as u32;
          mesh.vertices.extend([
            SkirtVertex { position: top_a.to_array(), alpha: 1.0 },
            SkirtVertex { position: top_b.to_array(), alpha: 1.0 },
            SkirtVertex { position: [top_a.x, base, top_a.z], alpha: 0.0 },
            SkirtVertex { position: [top_b.x, base, top_b.z], alpha: 0.0 },
          ]);
          mesh
            .indices
            .extend([first, first + 2, first + 1, first + 1, first + 2, first + 3]);
        }
        false
      });
    }
    Ok(mesh)
  }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
