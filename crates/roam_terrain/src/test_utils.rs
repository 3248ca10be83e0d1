//! Shared helpers for mesh invariant tests.

use std::collections::HashMap;

use glam::IVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TerrainConfig;
use crate::constants::full_tree_depth;
use crate::heightmap::{HeightMap, HeightSource};
use crate::tile::Tile;
use crate::tritree::{Half, NodeId, TreeView, TriangleRef};

/// Unordered edge key.
fn edge(a: IVec2, b: IVec2) -> (IVec2, IVec2) {
  if (a.x, a.y) <= (b.x, b.y) {
    (a, b)
  } else {
    (b, a)
  }
}

fn edges_of(tri: &TriangleRef) -> [(IVec2, IVec2); 3] {
  [
    edge(tri.left, tri.right),
    edge(tri.apex, tri.left),
    edge(tri.apex, tri.right),
  ]
}

fn on_border(e: (IVec2, IVec2), size: i32) -> bool {
  let (a, b) = e;
  (a.x == b.x && (a.x == 0 || a.x == size)) || (a.y == b.y && (a.y == 0 || a.y == size))
}

/// Check every structural and geometric invariant of a tessellated tree.
///
/// - every link points at a node allocated in the current pool epoch
/// - every leaf link points at a leaf that shares exactly that edge
/// - a missing leaf link only occurs on the tile border
/// - mutually linked base neighbors are both leaves or both branches
///
/// Returns a list of human-readable violations.
pub fn mesh_violations(view: &TreeView<'_>, tile_size: u32) -> Vec<String> {
  let mut violations = Vec::new();
  let mut geometry: HashMap<NodeId, TriangleRef> = HashMap::new();
  for half in Half::ALL {
    view.walk(half, tile_size, |tri, _| {
      geometry.insert(tri.id, *tri);
      true
    });
  }

  let pool = view.pool();
  for tri in geometry.values() {
    let node = view.node(tri.id);
    let links = [
      ("base", node.base_neighbor, edge(tri.left, tri.right)),
      ("left", node.left_neighbor, edge(tri.apex, tri.left)),
      ("right", node.right_neighbor, edge(tri.apex, tri.right)),
    ];

    for (name, link, own_edge) in links {
      if let Some(target) = link {
        if !pool.is_live(target) {
          violations.push(format!("{:?} {name} link dangles into {target:?}", tri.id));
          continue;
        }
      }
      if node.is_branch() {
        continue;
      }
      match link {
        None => {
          if !on_border(own_edge, tile_size as i32) {
            violations.push(format!("{:?} interior {name} edge has no neighbor", tri.id));
          }
        }
        Some(target) => {
          let Some(other) = geometry.get(&target) else {
            violations.push(format!("{:?} {name} link to {target:?} outside tree", tri.id));
            continue;
          };
          if view.node(target).is_branch() {
            violations.push(format!("{:?} {name} neighbor {target:?} is split", tri.id));
          }
          if !edges_of(other).contains(&own_edge) {
            violations.push(format!("{:?} {name} neighbor {target:?} shares no edge", tri.id));
          }
        }
      }
    }

    if let Some(base) = node.base_neighbor {
      if view.pool().is_live(base) && view.node(base).base_neighbor == Some(tri.id) {
        if node.is_leaf() != view.node(base).is_leaf() {
          violations.push(format!("crack between diamond {:?} and {base:?}", tri.id));
        }
      }
    }
  }

  violations
}

/// Assert [`mesh_violations`] is empty.
pub fn assert_valid_mesh(view: &TreeView<'_>, tile_size: u32) {
  let violations = mesh_violations(view, tile_size);
  assert!(
    violations.is_empty(),
    "mesh invariants violated:\n{}",
    violations.join("\n")
  );
}

/// Heightmap of one tile filled with seeded noise.
pub fn random_heightmap(tile_size: u32, seed: u64, amplitude: f32) -> HeightMap {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut map = HeightMap::flat(tile_size, tile_size, 0.0);
  for z in 0..=tile_size as i32 {
    for x in 0..=tile_size as i32 {
      map.set(x, z, rng.random_range(-amplitude..=amplitude));
    }
  }
  map
}

/// Flat heightmap with a single spike.
pub fn spike_heightmap(tile_size: u32, at: IVec2, height: f32) -> HeightMap {
  let mut map = HeightMap::flat(tile_size, tile_size, 0.0);
  map.set(at.x, at.y, height);
  map
}

/// Small tile config that refines eagerly near the camera.
pub fn test_config(tile_size: u32) -> TerrainConfig {
  TerrainConfig {
    tile_size,
    variance_depth: 10,
    max_depth: full_tree_depth(tile_size),
    pool_capacity: 1 << 16,
    max_variance: 0.5,
    lod_falloff: 1.0,
    ..Default::default()
  }
}

/// Tile at grid position (0, 0) with variance computed.
pub fn prepared_tile(config: TerrainConfig, source: &impl HeightSource) -> Tile {
  let mut tile = Tile::new(config).unwrap();
  tile.init(0, 0, source);
  tile.compute_variance().unwrap();
  tile
}
