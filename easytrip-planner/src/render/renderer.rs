//! Owns the map surface and keeps its overlays in step with the current route.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use easytrip_core::{ComputedRoute, Coordinate, OrderedPoint};
use geo::{BoundingRect, MultiPoint, Point, Rect};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use super::surface::{MapSurface, MapView, MarkerSpec, OverlayId, RenderError, SurfaceLoader};

/// Initial camera and focus settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Initial centre.
    pub center: Coordinate,
    /// Initial zoom.
    pub zoom: u8,
    /// Zoom used when focusing a single point.
    pub focus_zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        // Lviv city centre.
        Self {
            center: Coordinate::new(49.8397, 24.0297),
            zoom: 13,
            focus_zoom: 16,
        }
    }
}

impl MapOptions {
    /// Set the initial centre.
    #[must_use]
    pub const fn with_center(mut self, center: Coordinate) -> Self {
        self.center = center;
        self
    }

    /// Set the initial zoom.
    #[must_use]
    pub const fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the focus zoom.
    #[must_use]
    pub const fn with_focus_zoom(mut self, zoom: u8) -> Self {
        self.focus_zoom = zoom;
        self
    }
}

/// Handles of every overlay currently drawn.
#[derive(Debug, Default)]
pub struct OverlaySet {
    ids: Vec<OverlayId>,
}

impl OverlaySet {
    /// Record a new overlay.
    pub fn push(&mut self, id: OverlayId) {
        self.ids.push(id);
    }

    /// Number of live overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Hand over every handle, leaving the set empty.
    pub fn take(&mut self) -> Vec<OverlayId> {
        std::mem::take(&mut self.ids)
    }
}

struct SurfaceSlot {
    surface: Box<dyn MapSurface>,
    overlays: OverlaySet,
}

impl SurfaceSlot {
    fn clear(&mut self) {
        for id in self.overlays.take() {
            self.surface.remove_overlay(id);
        }
    }
}

/// Draws routes on a lazily loaded map surface.
///
/// The surface is loaded at most once: concurrent callers of
/// [`MapRenderer::prepare`] share a single load, and a failed load is retried
/// by the next caller. Every draw first removes everything the previous draw
/// created.
pub struct MapRenderer {
    loader: Arc<dyn SurfaceLoader>,
    options: MapOptions,
    surface: OnceCell<Mutex<SurfaceSlot>>,
}

impl std::fmt::Debug for MapRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapRenderer")
            .field("options", &self.options)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

impl MapRenderer {
    /// Renderer with default [`MapOptions`].
    #[must_use]
    pub fn new(loader: Arc<dyn SurfaceLoader>) -> Self {
        Self::with_options(loader, MapOptions::default())
    }

    /// Renderer with explicit options.
    #[must_use]
    pub fn with_options(loader: Arc<dyn SurfaceLoader>, options: MapOptions) -> Self {
        Self {
            loader,
            options,
            surface: OnceCell::new(),
        }
    }

    /// Configured options.
    #[must_use]
    pub const fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Whether the surface has been loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.surface.initialized()
    }

    /// Load the surface if it is not loaded yet.
    ///
    /// # Errors
    /// Returns [`RenderError::LoadFailed`] when the loader fails.
    pub async fn prepare(&self) -> Result<(), RenderError> {
        self.surface
            .get_or_try_init(|| async {
                debug!("loading map surface");
                let mut surface = self.loader.load().await?;
                surface.set_view(&MapView::new(self.options.center, self.options.zoom));
                Ok::<_, RenderError>(Mutex::new(SurfaceSlot {
                    surface,
                    overlays: OverlaySet::default(),
                }))
            })
            .await?;
        Ok(())
    }

    /// Replace everything drawn with `route`, optionally highlighting the
    /// point with ordinal `highlight`.
    ///
    /// Passing `None` clears the map.
    ///
    /// # Errors
    /// Returns [`RenderError::NotInitialised`] when called before
    /// [`MapRenderer::prepare`] succeeded.
    pub fn draw(
        &self,
        route: Option<&ComputedRoute>,
        highlight: Option<usize>,
    ) -> Result<(), RenderError> {
        let mut slot = self.slot()?;
        slot.clear();
        let Some(route) = route else {
            return Ok(());
        };
        for point in route.points() {
            let marker = MarkerSpec::for_point(point, highlight == Some(point.ordinal));
            let id = slot.surface.add_marker(&marker);
            slot.overlays.push(id);
        }
        if !route.raw_path().is_empty() {
            let id = slot.surface.draw_directions(route.raw_path());
            slot.overlays.push(id);
        }
        match highlight.and_then(|ordinal| route.point(ordinal)) {
            Some(point) => slot
                .surface
                .set_view(&MapView::new(point.coordinate(), self.options.focus_zoom)),
            None => {
                if let Some(bounds) = route_bounds(route) {
                    slot.surface.fit_bounds(bounds);
                }
            }
        }
        debug!("drew route with {} overlays", slot.overlays.len());
        Ok(())
    }

    /// [`prepare`](Self::prepare) then [`draw`](Self::draw).
    ///
    /// # Errors
    /// Returns [`RenderError::LoadFailed`] when the surface cannot be loaded.
    pub async fn render(
        &self,
        route: Option<&ComputedRoute>,
        highlight: Option<usize>,
    ) -> Result<(), RenderError> {
        self.prepare().await?;
        self.draw(route, highlight)
    }

    /// Centre the view on `point` without touching overlays.
    ///
    /// # Errors
    /// Returns [`RenderError::NotInitialised`] before the surface is loaded.
    pub fn focus(&self, point: &OrderedPoint) -> Result<(), RenderError> {
        let mut slot = self.slot()?;
        slot.surface
            .set_view(&MapView::new(point.coordinate(), self.options.focus_zoom));
        Ok(())
    }

    /// Number of overlays currently drawn; zero before initialisation.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.slot().map_or(0, |slot| slot.overlays.len())
    }

    fn slot(&self) -> Result<MutexGuard<'_, SurfaceSlot>, RenderError> {
        let slot = self.surface.get().ok_or(RenderError::NotInitialised)?;
        Ok(slot.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Bounding box of every point on the route in `(lng, lat)` space.
#[must_use]
pub fn route_bounds(route: &ComputedRoute) -> Option<Rect<f64>> {
    let points: Vec<Point<f64>> = route
        .points()
        .iter()
        .map(|point| Point::from(point.coordinate()))
        .collect();
    MultiPoint::from(points).bounding_rect()
}
