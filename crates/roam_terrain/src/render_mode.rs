//! Process-wide render style selector.
//!
//! Only forwarded to the rendering backend; tessellation output is the same
//! in every mode.

use std::sync::atomic::{AtomicU8, Ordering};

/// How the backend submits tile geometry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RenderMode {
  /// Vertex and index buffer objects.
  Vbo,
  /// Recorded display lists.
  DisplayList,
  /// Client-side vertex arrays.
  VertexArray,
}

impl RenderMode {
  pub const ALL: [RenderMode; 3] = [RenderMode::Vbo, RenderMode::DisplayList, RenderMode::VertexArray];

  /// Next mode in cycle order.
  pub fn next(self) -> Self {
    match self {
      RenderMode::Vbo => RenderMode::DisplayList,
      RenderMode::DisplayList => RenderMode::VertexArray,
      RenderMode::VertexArray => RenderMode::Vbo,
    }
  }

  fn to_raw(self) -> u8 {
    match self {
      RenderMode::Vbo => 0,
      RenderMode::DisplayList => 1,
      RenderMode::VertexArray => 2,
    }
  }

  fn from_raw(raw: u8) -> Self {
    match raw {
      1 => RenderMode::DisplayList,
      2 => RenderMode::VertexArray,
      _ => RenderMode::Vbo,
    }
  }
}

static RENDER_MODE: AtomicU8 = AtomicU8::new(0);

/// Current render mode.
#[inline]
pub fn render_mode() -> RenderMode {
  RenderMode::from_raw(RENDER_MODE.load(Ordering::Relaxed))
}

/// Set `mode`, or cycle to the next mode when `None`. Returns the new mode.
pub fn switch_render_mode(mode: Option<RenderMode>) -> RenderMode {
  let new = match mode {
    Some(mode) => {
      RENDER_MODE.store(mode.to_raw(), Ordering::Relaxed);
      mode
    }
    None => {
      let prev = RENDER_MODE
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |raw| {
          Some(RenderMode::from_raw(raw).next().to_raw())
        })
        .unwrap_or_else(|raw| raw);
      RenderMode::from_raw(prev).next()
    }
  };
  log::info!("terrain render mode set to {new:?}");
  new
}
