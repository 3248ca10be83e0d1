//! Height lookup collaborators.
//!
//! Tiles only ever read heights through [`HeightSource`]. [`HeightMap`] is a
//! plain in-memory corner heightmap for tools and tests.

/// Height lookup at integer world grid coordinates.
pub trait HeightSource: Send + Sync {
  /// Height of the corner sample at `(x, z)`.
  ///
  /// Implementations clamp coordinates outside their extent.
  fn height_at(&self, x: i32, z: i32) -> f32;
}

impl<F> HeightSource for F
where
  F: Fn(i32, i32) -> f32 + Send + Sync,
{
  #[inline]
  fn height_at(&self, x: i32, z: i32) -> f32 {
    self(x, z)
  }
}

/// Corner heightmap with `(width + 1) x (depth + 1)` samples.
#[derive(Clone, Debug)]
pub struct HeightMap {
  width: u32,
  depth: u32,
  heights: Vec<f32>,
}

impl HeightMap {
  /// Uniform heightmap covering `width x depth` cells.
  pub fn flat(width: u32, depth: u32, height: f32) -> Self {
    let len = (width as usize + 1) * (depth as usize + 1);
    Self {
      width,
      depth,
      heights: vec![height; len],
    }
  }

  /// Build from a height function.
  pub fn from_fn(width: u32, depth: u32, mut f: impl FnMut(i32, i32) -> f32) -> Self {
    let mut map = Self::flat(width, depth, 0.0);
    for z in 0..=depth as i32 {
      for x in 0..=width as i32 {
        map.set(x, z, f(x, z));
      }
    }
    map
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  #[inline]
  fn index(&self, x: i32, z: i32) -> usize {
    let x = x.clamp(0, self.width as i32) as usize;
    let z = z.clamp(0, self.depth as i32) as usize;
    z * (self.width as usize + 1) + x
  }

  /// Set one corner sample. Out-of-range coordinates are clamped.
  pub fn set(&mut self, x: i32, z: i32, height: f32) {
    let i = self.index(x, z);
    self.heights[i] = height;
  }

  /// Add `delta` to every sample in an inclusive rectangle.
  pub fn raise(&mut self, rect: GridRect, delta: f32) {
    for z in rect.z1..=rect.z2 {
      for x in rect.x1..=rect.x2 {
        let i = self.index(x, z);
        self.heights[i] += delta;
      }
    }
  }
}

impl HeightSource for HeightMap {
  #[inline]
  fn height_at(&self, x: i32, z: i32) -> f32 {
    self.heights[self.index(x, z)]
  }
}

/// Inclusive rectangle of corner samples.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GridRect {
  pub x1: i32,
  pub z1: i32,
  pub x2: i32,
  pub z2: i32,
}

impl GridRect {
  pub fn new(x1: i32, z1: i32, x2: i32, z2: i32) -> Self {
    debug_assert!(x1 <= x2 && z1 <= z2, "GridRect min must be <= max");
    Self { x1, z1, x2, z2 }
  }

  /// Every corner of a tile of `tile_size` cells.
  pub fn whole_tile(tile_size: u32) -> Self {
    Self::new(0, 0, tile_size as i32, tile_size as i32)
  }

  /// Clamp to `[0, tile_size]` on both axes. `None` if nothing remains.
  pub fn clamp_to_tile(&self, tile_size: u32) -> Option<Self> {
    let max = tile_size as i32;
    let clamped = Self {
      x1: self.x1.max(0),
      z1: self.z1.max(0),
      x2: self.x2.min(max),
      z2: self.z2.min(max),
    };
    (clamped.x1 <= clamped.x2 && clamped.z1 <= clamped.z2).then_some(clamped)
  }

  /// Shift by an offset.
  pub fn translate(&self, dx: i32, dz: i32) -> Self {
    Self {
      x1: self.x1 + dx,
      z1: self.z1 + dz,
      x2: self.x2 + dx,
      z2: self.z2 + dz,
    }
  }
}
