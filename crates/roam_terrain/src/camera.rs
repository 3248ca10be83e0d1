//! Camera collaborator: world position, kind and a box visibility test.

use glam::{Mat4, Vec3, Vec4};

use crate::constants::CAMERA_KIND_COUNT;

/// Kind of camera looking at the terrain.
///
/// Shadow tiles are only ever seen by the shadow camera, normal tiles may be
/// seen by several kinds in one frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CameraKind {
  Player,
  Reflection,
  Shadow,
  Environment,
}

impl CameraKind {
  pub const ALL: [CameraKind; CAMERA_KIND_COUNT] = [
    CameraKind::Player,
    CameraKind::Reflection,
    CameraKind::Shadow,
    CameraKind::Environment,
  ];

  #[inline]
  pub fn index(self) -> usize {
    match self {
      CameraKind::Player => 0,
      CameraKind::Reflection => 1,
      CameraKind::Shadow => 2,
      CameraKind::Environment => 3,
    }
  }
}

/// What the tessellator needs from a camera.
pub trait TerrainCamera {
  fn position(&self) -> Vec3;

  fn kind(&self) -> CameraKind;

  /// Conservative test: false only if the box is certainly invisible.
  fn is_box_visible(&self, min: Vec3, max: Vec3) -> bool;
}

/// A plane defined by normal and distance from origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: Vec3,
  pub distance: f32,
}

impl Plane {
  /// Signed distance from point to plane (positive = in front).
  #[inline]
  pub fn distance_to_point(&self, point: Vec3) -> f32 {
    self.normal.dot(point) + self.distance
  }

  fn from_vec4(plane: Vec4) -> Self {
    let normal = plane.truncate();
    let len = normal.length();
    Self {
      normal: normal / len,
      distance: plane.w / len,
    }
  }
}

/// View frustum with 6 planes (near, far, left, right, top, bottom).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
  pub planes: [Plane; 6],
}

impl Frustum {
  /// Extract frustum planes from a view-projection matrix (OpenGL clip
  /// space, z in -w..w).
  pub fn from_view_projection(vp: &Mat4) -> Self {
    let row0 = vp.row(0);
    let row1 = vp.row(1);
    let row2 = vp.row(2);
    let row3 = vp.row(3);

    Self {
      planes: [
        Plane::from_vec4(row3 + row2),
        Plane::from_vec4(row3 - row2),
        Plane::from_vec4(row3 + row0),
        Plane::from_vec4(row3 - row0),
        Plane::from_vec4(row3 - row1),
        Plane::from_vec4(row3 + row1),
      ],
    }
  }

  /// Check if point is inside frustum.
  pub fn contains_point(&self, point: Vec3) -> bool {
    self.planes.iter().all(|plane| plane.distance_to_point(point) >= 0.0)
  }

  /// Check if an AABB intersects the frustum (conservative test).
  pub fn intersects_box(&self, min: Vec3, max: Vec3) -> bool {
    self.planes.iter().all(|plane| {
      // Corner most aligned with the plane normal (p-vertex)
      let p = Vec3::select(plane.normal.cmpge(Vec3::ZERO), max, min);
      plane.distance_to_point(p) >= 0.0
    })
  }
}

/// Camera backed by a view-projection matrix.
#[derive(Clone, Copy, Debug)]
pub struct FrustumCamera {
  pub position: Vec3,
  pub kind: CameraKind,
  pub frustum: Frustum,
}

impl FrustumCamera {
  pub fn new(position: Vec3, view_projection: &Mat4, kind: CameraKind) -> Self {
    Self {
      position,
      kind,
      frustum: Frustum::from_view_projection(view_projection),
    }
  }

  /// Right-handed perspective camera looking at `target`.
  pub fn looking_at(
    position: Vec3,
    target: Vec3,
    fov_y_radians: f32,
    aspect: f32,
    far: f32,
    kind: CameraKind,
  ) -> Self {
    let view = Mat4::look_at_rh(position, target, Vec3::Y);
    let proj = Mat4::perspective_rh_gl(fov_y_radians, aspect, 0.1, far);
    Self::new(position, &(proj * view), kind)
  }
}

impl TerrainCamera for FrustumCamera {
  #[inline]
  fn position(&self) -> Vec3 {
    self.position
  }

  #[inline]
  fn kind(&self) -> CameraKind {
    self.kind
  }

  #[inline]
  fn is_box_visible(&self, min: Vec3, max: Vec3) -> bool {
    self.frustum.intersects_box(min, max)
  }
}
