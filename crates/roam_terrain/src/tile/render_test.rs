use std::collections::HashSet;

use glam::{IVec2, Vec3};

use super::*;
use crate::error::TerrainError;
use crate::heightmap::HeightMap;
use crate::test_utils::{prepared_tile, random_heightmap, test_config};
use crate::tritree::PassKind;

const VIEW: f32 = 1.0e5;

#[test]
fn test_generate_indices_before_tessellate_is_stale() {
  let map = HeightMap::flat(8, 8, 0.0);
  let mut tile = prepared_tile(test_config(8), &map);
  let pool = NodePool::new(16, PassKind::Normal);
  assert_eq!(
    tile.generate_indices(&pool),
    Err(TerrainError::StaleTree { coords: IVec2::ZERO })
  );
}

#[test]
fn test_generate_indices_rejects_reset_pool() {
  let map = random_heightmap(8, 1, 10.0);
  let mut tile = prepared_tile(test_config(8), &map);
  let mut pool = NodePool::new(1024, PassKind::Normal);
  tile.tessellate(&mut pool, Vec3::ZERO, VIEW).unwrap();

  pool.reset();
  assert!(matches!(tile.generate_indices(&pool), Err(TerrainError::StaleTree { .. })));
  assert!(tile.leaves(&pool).is_err());
}

#[test]
fn test_generate_indices_rejects_other_pool() {
  let map = random_heightmap(8, 1, 10.0);
  let mut tile = prepared_tile(test_config(8), &map);
  let mut pool = NodePool::new(1024, PassKind::Normal);
  let other = NodePool::new(1024, PassKind::Normal);
  tile.tessellate(&mut pool, Vec3::ZERO, VIEW).unwrap();

  assert!(tile.generate_indices(&other).is_err());
  assert!(tile.generate_indices(&pool).is_ok());
}

#[test]
fn test_flat_tile_buffers() {
  let size = 8;
  let map = HeightMap::flat(size, size, 2.0);
  let config = test_config(size);
  let spacing = config.grid_spacing;
  let mut tile = Tile::new(config).unwrap();
  tile.init(1, 0, &map);
  tile.compute_variance().unwrap();
  let mut pool = NodePool::new(16, PassKind::Normal);
  tile.tessellate(&mut pool, Vec3::ZERO, VIEW).unwrap();
  tile.generate_indices(&pool).unwrap();

  // Left root first: apex (0,0), left (0,size), right (size,0).
  let world = |x: f32, z: f32| [64.0 + x * spacing, 2.0, z * spacing];
  assert_eq!(tile.indices(), &[0, 1, 2, 3, 2, 1]);
  assert_eq!(
    tile.vertices(),
    &[world(0.0, 0.0), world(0.0, 8.0), world(8.0, 0.0), world(8.0, 8.0)]
  );
}

#[test]
fn test_indices_cover_every_leaf() {
  let size = 16;
  for seed in 0..4 {
    let map = random_heightmap(size, seed, 20.0);
    let mut tile = prepared_tile(test_config(size), &map);
    let mut pool = NodePool::new(1 << 16, PassKind::Normal);
    tile.tessellate(&mut pool, Vec3::new(40.0, 10.0, 40.0), 300.0).unwrap();
    tile.generate_indices(&pool).unwrap();

    let leaves = tile.leaves(&pool).unwrap();
    assert_eq!(tile.tri_count(), leaves.len());
    assert!(tile.indices().iter().all(|&i| (i as usize) < tile.vertices().len()));

    let corners: HashSet<IVec2> = leaves.iter().flat_map(|l| [l.left, l.right, l.apex]).collect();
    assert_eq!(tile.vertices().len(), corners.len(), "one vertex per used corner");

    for (leaf, tri) in leaves.iter().zip(tile.indices().chunks_exact(3)) {
      let expected = [leaf.apex, leaf.left, leaf.right].map(|c| tile.world_position(c).to_array());
      let actual = [0, 1, 2].map(|k| tile.vertices()[tri[k] as usize]);
      assert_eq!(actual, expected);
    }
  }
}

#[test]
fn test_leaves_cover_tile_area() {
  let size = 16;
  let map = random_heightmap(size, 8, 20.0);
  let mut tile = prepared_tile(test_config(size), &map);
  let mut pool = NodePool::new(1 << 16, PassKind::Normal);
  tile.tessellate(&mut pool, Vec3::new(100.0, 0.0, 20.0), 300.0).unwrap();

  let twice_area: i32 = tile
    .leaves(&pool)
    .unwrap()
    .iter()
    .map(|l| (l.right - l.apex).perp_dot(l.left - l.apex).abs())
    .sum();
  assert_eq!(twice_area, 2 * (size * size) as i32);
}

#[test]
fn test_flat_tile_border_has_four_quads() {
  let size = 8;
  let map = HeightMap::flat(size, size, 3.0);
  let config = test_config(size);
  let base = config.skirt_base_height;
  let mut tile = prepared_tile(config, &map);
  let mut pool = NodePool::new(16, PassKind::Normal);
  tile.tessellate(&mut pool, Vec3::ZERO, VIEW).unwrap();

  let border = tile.generate_border(&pool).unwrap();
  assert_eq!(border.vertices.len(), 16);
  assert_eq!(border.tri_count(), 8);
  for quad in border.vertices.chunks_exact(4) {
    assert_eq!(quad[0].alpha, 1.0);
    assert_eq!(quad[0].position[1], 3.0);
    assert_eq!(quad[2].alpha, 0.0);
    assert_eq!(quad[2].position[1], base);
    assert_eq!(quad[2].position[0], quad[0].position[0]);
    assert_eq!(quad[2].position[2], quad[0].position[2]);
  }
}

/// Skirt quads run along the whole border exactly once, however the tile
/// was refined.
#[test]
fn test_border_spans_tile_perimeter() {
  let size = 16;
  let map = random_heightmap(size, 3, 30.0);
  let config = test_config(size);
  let spacing = config.grid_spacing;
  let mut tile = prepared_tile(config, &map);
  let mut pool = NodePool::new(1 << 16, PassKind::Normal);
  tile.tessellate(&mut pool, Vec3::new(0.0, 0.0, 64.0), 300.0).unwrap();

  let border = tile.generate_border(&pool).unwrap();
  let length: f32 = border
    .vertices
    .chunks_exact(4)
    .map(|q| {
      let (a, b) = (q[0].position, q[1].position);
      ((a[0] - b[0]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
    })
    .sum();
  assert!((length - 4.0 * size as f32 * spacing).abs() < 1e-3, "length {length}");
}

#[test]
fn test_border_rejects_stale_tree() {
  let map = HeightMap::flat(8, 8, 0.0);
  let tile = prepared_tile(test_config(8), &map);
  let pool = NodePool::new(16, PassKind::Normal);
  assert!(tile.generate_border(&pool).is_err());
}
