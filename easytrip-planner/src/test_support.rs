//! Recording map surfaces for unit and behaviour tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use easytrip_core::RawPath;
use geo::Rect;

use crate::render::{MapSurface, MapView, MarkerSpec, OverlayId, RenderError, SurfaceLoader};

/// One overlay as drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// A marker.
    Marker(MarkerSpec),
    /// A directions path.
    Path(RawPath),
}

/// Everything a [`RecordingSurface`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    /// Overlays still on the map, keyed by handle in creation order.
    pub live: BTreeMap<OverlayId, Overlay>,
    /// Number of overlays removed.
    pub removed: usize,
    /// Every view the camera was moved to.
    pub views: Vec<MapView>,
    /// Every bounds fit.
    pub fitted: Vec<Rect<f64>>,
}

impl SurfaceLog {
    /// Live markers in creation order.
    pub fn live_markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.live.values().filter_map(|overlay| match overlay {
            Overlay::Marker(marker) => Some(marker),
            Overlay::Path(_) => None,
        })
    }

    /// Number of live directions paths.
    #[must_use]
    pub fn live_paths(&self) -> usize {
        self.live
            .values()
            .filter(|overlay| matches!(overlay, Overlay::Path(_)))
            .count()
    }
}

/// Surface that records calls into a shared [`SurfaceLog`].
#[derive(Debug)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
    next_id: u64,
}

impl RecordingSurface {
    fn add(&mut self, overlay: Overlay) -> OverlayId {
        self.next_id += 1;
        let id = OverlayId(self.next_id);
        self.with_log(|log| {
            log.live.insert(id, overlay);
        });
        id
    }

    fn with_log(&self, f: impl FnOnce(&mut SurfaceLog)) {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut log);
    }
}

impl MapSurface for RecordingSurface {
    fn add_marker(&mut self, marker: &MarkerSpec) -> OverlayId {
        self.add(Overlay::Marker(marker.clone()))
    }

    fn draw_directions(&mut self, path: &RawPath) -> OverlayId {
        self.add(Overlay::Path(path.clone()))
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.with_log(|log| {
            if log.live.remove(&id).is_some() {
                log.removed += 1;
            }
        });
    }

    fn set_view(&mut self, view: &MapView) {
        let view = *view;
        self.with_log(|log| log.views.push(view));
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>) {
        self.with_log(|log| log.fitted.push(bounds));
    }
}

/// Loader handing out [`RecordingSurface`]s that share one log.
///
/// Can be told to fail a number of times before succeeding.
#[derive(Debug, Default)]
pub struct RecordingLoader {
    log: Arc<Mutex<SurfaceLog>>,
    loads: AtomicUsize,
    failures_left: AtomicUsize,
}

impl RecordingLoader {
    /// Loader whose first `failures` loads fail.
    #[must_use]
    pub fn failing_times(failures: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            ..Self::default()
        }
    }

    /// Number of `load` calls so far.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Copy of the shared surface log.
    #[must_use]
    pub fn log(&self) -> SurfaceLog {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SurfaceLoader for RecordingLoader {
    async fn load(&self) -> Result<Box<dyn MapSurface>, RenderError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(RenderError::LoadFailed {
                message: "map script unavailable".to_owned(),
            });
        }
        Ok(Box::new(RecordingSurface {
            log: Arc::clone(&self.log),
            next_id: 0,
        }))
    }
}
