use super::*;
use crate::camera::CameraKind;
use crate::heightmap::HeightMap;
use crate::test_utils::{prepared_tile, test_config};
use crate::tritree::{NodePool, PassKind};

fn ramp(x: i32, z: i32) -> f32 {
  (x * 3 - z) as f32
}

#[test]
fn test_new_rejects_invalid_config() {
  let config = TerrainConfig {
    tile_size: 12,
    ..Default::default()
  };
  assert!(matches!(Tile::new(config), Err(TerrainError::InvalidConfig(_))));
}

#[test]
fn test_new_tile_is_uninitialized_and_dirty() {
  let tile = Tile::new(test_config(16)).unwrap();
  assert!(!tile.is_initialized());
  assert!(tile.is_dirty());
  assert_eq!(tile.tri_count(), 0);
  assert_eq!(tile.binding(), None);
}

#[test]
fn test_init_positions_tile_and_loads_heights() {
  let mut tile = Tile::new(test_config(16)).unwrap();
  tile.init(1, 2, &ramp);

  assert_eq!(tile.coords(), IVec2::new(16, 32));
  assert_eq!(tile.origin(), Vec3::new(128.0, 0.0, 256.0));
  assert_eq!(tile.height(IVec2::new(3, 4)), ramp(19, 36));
  assert_eq!(tile.height(IVec2::new(16, 16)), ramp(32, 48));
  assert!(tile.is_dirty());
}

#[test]
fn test_init_tracks_height_range() {
  let mut tile = Tile::new(test_config(8)).unwrap();
  tile.init(0, 0, &ramp);
  // x in 0..=8, z in 0..=8
  assert_eq!(tile.height_range(), (-8.0, 24.0));
}

#[test]
fn test_operations_before_init_fail() {
  let mut tile = Tile::new(test_config(8)).unwrap();
  let mut pool = NodePool::new(64, PassKind::Normal);
  assert_eq!(tile.compute_variance(), Err(TerrainError::NotInitialized));
  assert_eq!(
    tile.tessellate(&mut pool, Vec3::ZERO, 100.0),
    Err(TerrainError::NotInitialized)
  );
  assert_eq!(
    tile.update_height_map(&ramp, GridRect::whole_tile(8)),
    Err(TerrainError::NotInitialized)
  );
}

#[test]
fn test_compute_variance_clears_dirty() {
  let mut tile = Tile::new(test_config(8)).unwrap();
  tile.init(0, 0, &|x: i32, z: i32| ((x * z) % 5) as f32);
  tile.compute_variance().unwrap();
  assert!(!tile.is_dirty());
  assert!(tile.variance(Half::Left).max_variance() > 0.0);
}

#[test]
fn test_update_height_map_refreshes_rect() {
  let mut map = HeightMap::flat(16, 16, 0.0);
  let mut tile = prepared_tile(test_config(16), &map);
  assert_eq!(tile.variance(Half::Right).max_variance(), 0.0);

  map.set(8, 8, 40.0);
  // Outside the changed sample, nothing visible changes.
  assert_eq!(tile.update_height_map(&map, GridRect::new(0, 0, 2, 2)), Ok(true));
  assert_eq!(tile.height(IVec2::new(8, 8)), 0.0);
  assert!(tile.is_dirty());

  assert_eq!(tile.update_height_map(&map, GridRect::new(6, 6, 9, 9)), Ok(true));
  assert_eq!(tile.height(IVec2::new(8, 8)), 40.0);
  assert_eq!(tile.height_range(), (0.0, 40.0));

  tile.compute_variance().unwrap();
  assert_eq!(tile.variance(Half::Right).max_variance(), 40.0);
}

#[test]
fn test_update_height_map_outside_tile() {
  let map = HeightMap::flat(16, 16, 1.0);
  let mut tile = prepared_tile(test_config(16), &map);
  assert_eq!(tile.update_height_map(&map, GridRect::new(20, 20, 30, 30)), Ok(false));
  assert!(!tile.is_dirty());
}

#[test]
fn test_tessellate_requires_fresh_variance() {
  let map = HeightMap::flat(8, 8, 0.0);
  let mut tile = prepared_tile(test_config(8), &map);
  let mut pool = NodePool::new(64, PassKind::Normal);
  tile.update_height_map(&map, GridRect::whole_tile(8)).unwrap();

  assert_eq!(
    tile.tessellate(&mut pool, Vec3::ZERO, 100.0),
    Err(TerrainError::StaleVariance { coords: IVec2::ZERO })
  );

  tile.compute_variance().unwrap();
  assert!(tile.tessellate(&mut pool, Vec3::ZERO, 100.0).is_ok());
}

#[test]
fn test_reset_drops_tree_and_buffers() {
  let map = HeightMap::flat(8, 8, 0.0);
  let mut tile = prepared_tile(test_config(8), &map);
  let mut pool = NodePool::new(64, PassKind::Normal);
  tile.tessellate(&mut pool, Vec3::ZERO, 100.0).unwrap();
  tile.generate_indices(&pool).unwrap();
  assert_eq!(tile.tri_count(), 2);

  tile.reset();
  assert_eq!(tile.tri_count(), 0);
  assert!(tile.vertices().is_empty());
  assert_eq!(tile.binding(), None);
  assert!(!tile.is_dirty(), "reset keeps heights and variance");
}

#[test]
fn test_init_forgets_visibility() {
  let map = HeightMap::flat(16, 16, 0.0);
  let mut tile = prepared_tile(test_config(8), &map);
  tile.mark_visible(CameraKind::Player, 9);
  tile.reset();
  assert!(tile.visible_in_frame(CameraKind::Player, 9));

  tile.init(1, 1, &map);
  assert_eq!(tile.last_visible_frame(CameraKind::Player), None);
}

#[test]
fn test_set_lod_params() {
  let mut tile = Tile::new(test_config(8)).unwrap();
  tile.set_lod_params(3.0, 0.25);
  assert_eq!(tile.max_variance(), 3.0);
  assert_eq!(tile.lod_falloff(), 0.25);
}
