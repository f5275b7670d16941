//! The route-planning state machine.
//!
//! A [`RoutePlanner`] turns a [`RouteForm`] into a rendered, persisted
//! [`ComputedRoute`] by walking the phases of [`PlannerPhase`]. Each
//! submission or restore opens a *flow*. Opening a flow cancels the previous
//! one, and every state change checks, while holding the snapshot lock, that
//! its flow is still current. A flow superseded before it draws never
//! renders or persists, and a superseded flow never notifies.
//!
//! The store write happens outside the snapshot lock. Commits are serialised
//! among themselves so the rendered route and the persisted route agree.

use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use easytrip_core::{
    AddressResolver, ComputedRoute, Coordinate, Endpoint, LocationInput, RecommendationClient,
    RouteForm, RouteOptimizer, RouteStateStore,
};
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    FailureReport, MapRenderer, Notification, NotificationLevel, PlannerPhase, PlanningError,
    RenderError,
};

/// Collaborators injected into a [`RoutePlanner`].
pub struct PlannerServices {
    /// Turns free-text addresses into coordinates.
    pub resolver: Arc<dyn AddressResolver>,
    /// Selects points of interest.
    pub recommender: Arc<dyn RecommendationClient>,
    /// Orders the selected points.
    pub optimizer: RouteOptimizer,
    /// Durable slot for the last route.
    pub store: RouteStateStore,
    /// Owner of the map surface.
    pub renderer: Arc<MapRenderer>,
}

impl std::fmt::Debug for PlannerServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerServices")
            .field("store", &self.store)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
struct Flow {
    id: u64,
    token: CancellationToken,
}

/// Observable planner state.
#[derive(Debug, Clone, Default)]
pub struct PlannerSnapshot {
    phase: PlannerPhase,
    route: Option<Arc<ComputedRoute>>,
    notification: Option<Notification>,
    has_saved_route: bool,
    last_failure: Option<FailureReport>,
    flow: Option<Flow>,
}

impl PlannerSnapshot {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PlannerPhase {
        self.phase
    }

    /// Whether a flow is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.phase.is_busy()
    }

    /// Route currently rendered.
    #[must_use]
    pub fn route(&self) -> Option<&ComputedRoute> {
        self.route.as_deref()
    }

    /// Most recent notification, expired or not.
    #[must_use]
    pub const fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Most recent notification if it is still visible at `now`.
    #[must_use]
    pub fn active_notification(&self, now: Instant) -> Option<&Notification> {
        self.notification
            .as_ref()
            .filter(|notification| !notification.is_expired(now))
    }

    /// Whether the store holds a route that can be restored.
    #[must_use]
    pub const fn has_saved_route(&self) -> bool {
        self.has_saved_route
    }

    /// Summary of the most recent failure since the last success.
    #[must_use]
    pub const fn last_failure(&self) -> Option<&FailureReport> {
        self.last_failure.as_ref()
    }

    fn owns(&self, flow: &Flow) -> bool {
        self.flow.as_ref().is_some_and(|current| current.id == flow.id)
    }

    fn close(&mut self, notification: Notification) {
        self.phase = PlannerPhase::Idle;
        self.flow = None;
        self.notification = Some(notification);
    }
}

#[derive(Debug, Clone, Copy)]
enum Commit {
    Planned,
    Restored,
}

/// Releases the flow if the owning future is dropped before finishing.
struct FlowGuard<'a> {
    planner: &'a RoutePlanner,
    flow: &'a Flow,
}

impl Drop for FlowGuard<'_> {
    fn drop(&mut self) {
        self.planner.release(self.flow);
    }
}

/// Sequences geocoding, recommendation, optimisation, persistence and
/// rendering for one user.
pub struct RoutePlanner {
    services: PlannerServices,
    state: watch::Sender<PlannerSnapshot>,
    next_flow: AtomicU64,
    commit_lock: Mutex<()>,
}

impl std::fmt::Debug for RoutePlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePlanner")
            .field("services", &self.services)
            .field("phase", &self.state.borrow().phase)
            .finish_non_exhaustive()
    }
}

impl RoutePlanner {
    /// Build a planner, checking the store for a restorable route.
    #[must_use]
    pub fn new(services: PlannerServices) -> Self {
        let has_saved_route = services.store.contains().unwrap_or_else(|err| {
            warn!("could not check for a saved route: {err}");
            false
        });
        let (state, _) = watch::channel(PlannerSnapshot {
            has_saved_route,
            ..PlannerSnapshot::default()
        });
        Self {
            services,
            state,
            next_flow: AtomicU64::new(0),
            commit_lock: Mutex::new(()),
        }
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlannerSnapshot> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> PlannerSnapshot {
        self.state.borrow().clone()
    }

    /// The renderer this planner draws with.
    #[must_use]
    pub fn renderer(&self) -> &MapRenderer {
        &self.services.renderer
    }

    /// Plan, persist and render a route for `form`.
    ///
    /// Any flow already in progress is superseded.
    ///
    /// # Errors
    /// Returns the [`PlanningError`] of the failing stage, or
    /// [`PlanningError::Superseded`] when a newer flow or [`cancel`]
    /// replaced this one. On error the previous route stays rendered and
    /// persisted.
    ///
    /// [`cancel`]: Self::cancel
    pub async fn submit(&self, form: RouteForm) -> Result<Arc<ComputedRoute>, PlanningError> {
        let flow = self.begin_flow(PlannerPhase::Validating);
        let _guard = FlowGuard {
            planner: self,
            flow: &flow,
        };
        let outcome = tokio::select! {
            biased;
            () = flow.token.cancelled() => Err(PlanningError::Superseded),
            result = self.plan(&flow, form) => result,
        };
        self.settle(&flow, outcome)
    }

    /// Render the persisted route without contacting any service.
    ///
    /// Returns `Ok(None)` when nothing is saved; state is left untouched
    /// apart from an informational notification.
    ///
    /// # Errors
    /// Returns [`PlanningError::Restore`] when the saved entry is unreadable,
    /// [`PlanningError::Render`] when the map cannot load, or
    /// [`PlanningError::Superseded`].
    pub async fn restore_last_route(&self) -> Result<Option<Arc<ComputedRoute>>, PlanningError> {
        let flow = self.begin_flow(PlannerPhase::Restoring);
        let _guard = FlowGuard {
            planner: self,
            flow: &flow,
        };
        let outcome = tokio::select! {
            biased;
            () = flow.token.cancelled() => Err(PlanningError::Superseded),
            result = self.restore(&flow) => result,
        };
        self.settle(&flow, outcome)
    }

    /// Abandon the flow in progress, if any.
    ///
    /// Pending service calls are dropped and their results never applied.
    pub fn cancel(&self) {
        self.state.send_if_modified(|state| match state.flow.take() {
            Some(flow) => {
                flow.token.cancel();
                state.phase = PlannerPhase::Idle;
                debug!("flow {} cancelled", flow.id);
                true
            }
            None => false,
        });
    }

    /// Centre the map on the current route's point with `ordinal`.
    ///
    /// Returns `false` when there is no such point.
    ///
    /// # Errors
    /// Returns [`RenderError::NotInitialised`] if the map was never loaded.
    pub fn focus(&self, ordinal: usize) -> Result<bool, RenderError> {
        let point = self
            .state
            .borrow()
            .route
            .as_ref()
            .and_then(|route| route.point(ordinal).cloned());
        match point {
            Some(point) => {
                self.services.renderer.focus(&point)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn plan(
        &self,
        flow: &Flow,
        form: RouteForm,
    ) -> Result<Arc<ComputedRoute>, PlanningError> {
        let form = form.validate()?;

        self.advance(flow, PlannerPhase::Geocoding)?;
        let (start, end) = tokio::try_join!(
            self.locate(Endpoint::Start, form.from()),
            self.locate(Endpoint::End, form.to()),
        )?;

        self.advance(flow, PlannerPhase::Recommending)?;
        let request = form.into_request(start, end);
        let points = self.services.recommender.recommend(&request).await?;
        if points.is_empty() {
            return Err(PlanningError::InsufficientPoints);
        }
        debug!("flow {} received {} recommended points", flow.id, points.len());

        self.advance(flow, PlannerPhase::Optimizing)?;
        let route = self
            .services
            .optimizer
            .compute_route(start, end, &points, request.transport())
            .await?;

        self.advance(flow, PlannerPhase::Persisting)?;
        self.services.renderer.prepare().await?;
        self.commit(flow, route, Commit::Planned)
    }

    async fn restore(&self, flow: &Flow) -> Result<Option<Arc<ComputedRoute>>, PlanningError> {
        let Some(route) = self
            .services
            .store
            .load()
            .map_err(PlanningError::Restore)?
        else {
            self.conclude_empty(flow)?;
            return Ok(None);
        };
        self.services.renderer.prepare().await?;
        self.commit(flow, route, Commit::Restored).map(Some)
    }

    async fn locate(
        &self,
        endpoint: Endpoint,
        input: &LocationInput,
    ) -> Result<Coordinate, PlanningError> {
        match input {
            LocationInput::Coordinate(coordinate) => Ok(*coordinate),
            LocationInput::Address(address) => self
                .services
                .resolver
                .resolve(address)
                .await
                .map_err(|source| PlanningError::Geocode { endpoint, source }),
        }
    }

    fn begin_flow(&self, phase: PlannerPhase) -> Flow {
        let flow = Flow {
            id: self.next_flow.fetch_add(1, Ordering::SeqCst) + 1,
            token: CancellationToken::new(),
        };
        self.state.send_modify(|state| {
            if let Some(previous) = state.flow.replace(flow.clone()) {
                previous.token.cancel();
                debug!("flow {} superseded by flow {}", previous.id, flow.id);
            }
            state.phase = phase;
        });
        debug!("flow {} entered {phase}", flow.id);
        flow
    }

    fn advance(&self, flow: &Flow, phase: PlannerPhase) -> Result<(), PlanningError> {
        let owned = self.state.send_if_modified(|state| {
            if !state.owns(flow) {
                return false;
            }
            state.phase = phase;
            true
        });
        if owned {
            debug!("flow {} entered {phase}", flow.id);
            Ok(())
        } else {
            warn!("discarding result of superseded flow {}", flow.id);
            Err(PlanningError::Superseded)
        }
    }

    fn commit(
        &self,
        flow: &Flow,
        route: ComputedRoute,
        kind: Commit,
    ) -> Result<Arc<ComputedRoute>, PlanningError> {
        let route = Arc::new(route);
        let _commit = self
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // The ownership check and the redraw share one critical section.
        let mut drawn = Err(PlanningError::Superseded);
        self.state.send_if_modified(|state| {
            if !state.owns(flow) {
                return false;
            }
            if let Err(err) = self.services.renderer.draw(Some(&route), None) {
                drawn = Err(err.into());
                return false;
            }
            state.route = Some(Arc::clone(&route));
            drawn = Ok(());
            true
        });
        if let Err(err) = drawn {
            if matches!(err, PlanningError::Superseded) {
                warn!("discarding result of superseded flow {}", flow.id);
            }
            return Err(err);
        }

        let saved = match kind {
            Commit::Planned => match self.services.store.save(&route) {
                Ok(()) => true,
                Err(err) => {
                    warn!("route rendered but not saved: {err}");
                    false
                }
            },
            Commit::Restored => false,
        };

        let mut owned = false;
        self.state.send_if_modified(|state| {
            state.has_saved_route |= saved;
            if !state.owns(flow) {
                return saved;
            }
            owned = true;
            let message = match kind {
                Commit::Planned => "Route built",
                Commit::Restored => "Route restored",
            };
            state.last_failure = None;
            state.close(Notification::new(
                NotificationLevel::Success,
                state.phase,
                message,
            ));
            true
        });
        if owned {
            info!(
                "flow {} committed a route with {} stops",
                flow.id,
                route.waypoints().len()
            );
            Ok(route)
        } else {
            warn!("flow {} was superseded after drawing its route", flow.id);
            Err(PlanningError::Superseded)
        }
    }

    fn conclude_empty(&self, flow: &Flow) -> Result<(), PlanningError> {
        let owned = self.state.send_if_modified(|state| {
            if !state.owns(flow) {
                return false;
            }
            state.has_saved_route = false;
            state.close(Notification::new(
                NotificationLevel::Info,
                PlannerPhase::Restoring,
                "No saved route yet",
            ));
            true
        });
        if owned {
            info!("flow {} found no saved route", flow.id);
            Ok(())
        } else {
            Err(PlanningError::Superseded)
        }
    }

    fn settle<T>(
        &self,
        flow: &Flow,
        outcome: Result<T, PlanningError>,
    ) -> Result<T, PlanningError> {
        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if matches!(err, PlanningError::Superseded) {
            debug!("flow {} ended superseded", flow.id);
            return Err(err);
        }
        let report = FailureReport::from(&err);
        let owned = self.state.send_if_modified(|state| {
            if !state.owns(flow) {
                return false;
            }
            if matches!(err, PlanningError::Restore(_)) {
                state.has_saved_route = false;
            }
            state.close(Notification::new(
                NotificationLevel::Error,
                report.phase,
                report.message.clone(),
            ));
            state.last_failure = Some(report);
            true
        });
        if owned {
            warn!("flow {} failed while {}: {err}", flow.id, err.phase());
        } else {
            warn!("discarding failure of superseded flow {}: {err}", flow.id);
        }
        Err(err)
    }

    fn release(&self, flow: &Flow) {
        self.state.send_if_modified(|state| {
            if !state.owns(flow) {
                return false;
            }
            flow.token.cancel();
            state.flow = None;
            state.phase = PlannerPhase::Idle;
            debug!("flow {} dropped before finishing", flow.id);
            true
        });
    }
}
