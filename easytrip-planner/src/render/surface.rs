//! The drawable map abstraction and the values passed across it.

use async_trait::async_trait;
use easytrip_core::{Coordinate, OrderedPoint, RawPath, Role};
use geo::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// z-index given to a highlighted marker.
pub const HIGHLIGHT_Z_INDEX: i32 = 1000;

/// Errors from the map surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The surface could not be loaded.
    #[error("map surface failed to load: {message}")]
    LoadFailed {
        /// Loader-provided cause.
        message: String,
    },
    /// Drawing was attempted before the surface was prepared.
    #[error("map surface is not initialised")]
    NotInitialised,
}

/// Handle of something drawn on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

/// A camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Centre of the view.
    pub center: Coordinate,
    /// Zoom level.
    pub zoom: u8,
}

impl MapView {
    /// Build a view.
    #[must_use]
    pub const fn new(center: Coordinate, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

/// Marker colour by route role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerColor {
    /// Route origin.
    Green,
    /// Intermediate stop.
    Indigo,
    /// Route destination.
    Red,
}

impl MarkerColor {
    /// Colour for a role.
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Start => Self::Green,
            Role::Waypoint => Self::Indigo,
            Role::End => Self::Red,
        }
    }

    /// CSS hex value.
    #[must_use]
    pub const fn as_hex(self) -> &'static str {
        match self {
            Self::Green => "#16a34a",
            Self::Indigo => "#4f46e5",
            Self::Red => "#dc2626",
        }
    }
}

/// Everything a surface needs to draw one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Ordinal of the point the marker stands for.
    pub ordinal: usize,
    /// Position.
    pub position: Coordinate,
    /// Short label: `A`, `B` or the waypoint ordinal.
    pub label: String,
    /// Hover title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Fill colour.
    pub color: MarkerColor,
    /// Stacking order override for highlighted markers.
    pub z_index: Option<i32>,
}

impl MarkerSpec {
    /// Describe the marker for a route point.
    #[must_use]
    pub fn for_point(point: &OrderedPoint, highlighted: bool) -> Self {
        let label = match point.role {
            Role::Start => "A".to_owned(),
            Role::End => "B".to_owned(),
            Role::Waypoint => point.ordinal.to_string(),
        };
        Self {
            ordinal: point.ordinal,
            position: point.coordinate(),
            label,
            title: point.name().to_owned(),
            description: point.point.description.clone(),
            color: MarkerColor::for_role(point.role),
            z_index: highlighted.then_some(HIGHLIGHT_Z_INDEX),
        }
    }
}

/// A live map that can hold overlays.
///
/// Implementations wrap a concrete map widget. Overlay handles returned by
/// `add_marker` and `draw_directions` stay valid until passed to
/// `remove_overlay`.
///
/// A planner commits a redraw while its state is locked, so surface methods
/// must not read planner snapshots or call back into the planner.
pub trait MapSurface: Send {
    /// Draw a marker.
    fn add_marker(&mut self, marker: &MarkerSpec) -> OverlayId;
    /// Draw a provider path payload.
    fn draw_directions(&mut self, path: &RawPath) -> OverlayId;
    /// Remove a previously drawn overlay.
    fn remove_overlay(&mut self, id: OverlayId);
    /// Move the camera.
    fn set_view(&mut self, view: &MapView);
    /// Move the camera so `bounds` is visible.
    fn fit_bounds(&mut self, bounds: Rect<f64>);
}

/// Loads the map surface; may be slow and may fail.
#[async_trait]
pub trait SurfaceLoader: Send + Sync {
    /// Load and return a fresh surface.
    async fn load(&self) -> Result<Box<dyn MapSurface>, RenderError>;
}
