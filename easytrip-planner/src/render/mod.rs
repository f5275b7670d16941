//! Map rendering.
//!
//! [`MapRenderer`] exclusively owns the map surface and the handles of every
//! overlay drawn on it; nothing else in the planner touches the surface.

mod renderer;
mod surface;

pub use renderer::{MapOptions, MapRenderer, OverlaySet, route_bounds};
pub use surface::{
    HIGHLIGHT_Z_INDEX, MapSurface, MapView, MarkerColor, MarkerSpec, OverlayId, RenderError,
    SurfaceLoader,
};
