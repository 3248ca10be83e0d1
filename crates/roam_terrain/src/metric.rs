//! Split decision for one triangle.
//!
//! The decision combines the precomputed variance with the camera distance.
//! It is exposed as a trait so the policy can be tuned per terrain; any
//! implementation must split at least as eagerly when the variance grows or
//! the camera moves closer.

/// Inputs for one split decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitQuery {
  /// Variance bound of the triangle's subtree.
  pub variance: f32,
  /// Distance from the camera to the triangle's centroid.
  pub distance: f32,
  /// Radius of the triangle's bounding circle around its centroid.
  pub footprint_radius: f32,
  /// Camera view radius.
  pub view_radius: f32,
  /// Tile LOD falloff with distance.
  pub lod_falloff: f32,
  /// Tile limit on distance-attenuated variance.
  pub max_variance: f32,
}

/// Replaceable split policy.
pub trait SplitMetric: Send + Sync {
  /// True if the triangle described by `query` should be split.
  fn should_split(&self, query: &SplitQuery) -> bool;
}

/// Default policy: variance attenuated by distance relative to the view
/// radius.
///
/// ```text
/// attenuation = 1 / max(1, distance * lod_falloff / view_radius)
/// split       = variance * attenuation > max_variance
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DistanceLodMetric;

impl DistanceLodMetric {
  /// Distance attenuation in `(0, 1]`.
  #[inline]
  pub fn attenuation(distance: f32, lod_falloff: f32, view_radius: f32) -> f32 {
    if view_radius <= 0.0 {
      return 0.0;
    }
    1.0 / (distance * lod_falloff / view_radius).max(1.0)
  }
}

impl SplitMetric for DistanceLodMetric {
  #[inline]
  fn should_split(&self, query: &SplitQuery) -> bool {
    let attenuated =
      query.variance * Self::attenuation(query.distance, query.lod_falloff, query.view_radius);
    attenuated > query.max_variance
  }
}

impl<F> SplitMetric for F
where
  F: Fn(&SplitQuery) -> bool + Send + Sync,
{
  #[inline]
  fn should_split(&self, query: &SplitQuery) -> bool {
    self(query)
  }
}
