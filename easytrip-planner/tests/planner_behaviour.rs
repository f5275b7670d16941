//! Behavioural tests for `RoutePlanner`.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use easytrip_core::test_support::{
    StubDirectionsProvider, StubRecommender, StubResolver, sample_points, sample_route,
};
use easytrip_core::{Coordinate, MemoryKeyValueStore, RouteForm, RouteOptimizer, RouteStateStore};
use easytrip_planner::test_support::RecordingLoader;
use easytrip_planner::{
    MapRenderer, NotificationLevel, PlannerPhase, PlannerServices, PlanningError, RoutePlanner,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

/// World state for planning scenarios.
#[derive(Debug)]
struct PlanningWorld {
    runtime: Runtime,
    backend: Arc<MemoryKeyValueStore>,
    resolver: Arc<StubResolver>,
    directions: Arc<StubDirectionsProvider>,
    recommended: Cell<usize>,
    recommender: RefCell<Option<Arc<StubRecommender>>>,
    planner: RefCell<Option<RoutePlanner>>,
    outcome: RefCell<Option<Result<(), PlanningError>>>,
}

impl PlanningWorld {
    fn store(&self) -> RouteStateStore {
        RouteStateStore::new(self.backend.clone())
    }

    fn ensure_planner(&self) {
        if self.planner.borrow().is_some() {
            return;
        }
        let recommender = Arc::new(StubRecommender::with_points(sample_points(
            self.recommended.get(),
        )));
        self.recommender.replace(Some(recommender.clone()));
        let planner = RoutePlanner::new(PlannerServices {
            resolver: self.resolver.clone(),
            recommender,
            optimizer: RouteOptimizer::new(self.directions.clone()),
            store: self.store(),
            renderer: Arc::new(MapRenderer::new(Arc::new(RecordingLoader::default()))),
        });
        self.planner.replace(Some(planner));
    }

    fn with_planner<T>(&self, f: impl FnOnce(&RoutePlanner) -> T) -> T {
        self.ensure_planner();
        let planner = self.planner.borrow();
        f(planner.as_ref().expect("planner should be built"))
    }

    fn submit(&self, form: RouteForm) {
        let outcome = self.with_planner(|planner| {
            self.runtime.block_on(planner.submit(form)).map(|_| ())
        });
        self.outcome.replace(Some(outcome));
    }

    fn recommender_calls(&self) -> usize {
        self.recommender
            .borrow()
            .as_ref()
            .map_or(0, |recommender| recommender.calls())
    }
}

#[fixture]
fn world() -> PlanningWorld {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    PlanningWorld {
        runtime,
        backend: Arc::new(MemoryKeyValueStore::default()),
        resolver: Arc::new(
            StubResolver::default()
                .with("Rynok Square", Coordinate::new(49.8419, 24.0315))
                .with("Stryiskyi Park", Coordinate::new(49.8244, 24.0222)),
        ),
        directions: Arc::new(StubDirectionsProvider::identity()),
        recommended: Cell::new(3),
        recommender: RefCell::new(None),
        planner: RefCell::new(None),
        outcome: RefCell::new(None),
    }
}

#[given("a recommender offering {count} points")]
fn given_recommender(world: &PlanningWorld, count: usize) {
    world.recommended.set(count);
}

#[given("a saved route through {count} recommended points")]
fn given_saved_route(world: &PlanningWorld, count: usize) {
    world
        .store()
        .save(&sample_route(count))
        .expect("seed saved route");
}

#[when("I plan a route between two known addresses")]
fn when_plan(world: &PlanningWorld) {
    world.submit(RouteForm::new("Rynok Square", "Stryiskyi Park"));
}

#[when("I plan a route to an unknown destination")]
fn when_plan_unknown(world: &PlanningWorld) {
    world.submit(RouteForm::new("Rynok Square", "Atlantis"));
}

#[when("I restore the last route")]
fn when_restore(world: &PlanningWorld) {
    let outcome = world.with_planner(|planner| {
        assert!(planner.snapshot().has_saved_route());
        world
            .runtime
            .block_on(planner.restore_last_route())
            .map(|_| ())
    });
    world.outcome.replace(Some(outcome));
}

#[then("the planner is idle")]
fn then_idle(world: &PlanningWorld) {
    world.with_planner(|planner| {
        let snapshot = planner.snapshot();
        assert_eq!(snapshot.phase(), PlannerPhase::Idle);
        assert!(!snapshot.is_loading());
    });
}

#[then("the rendered route has {count} points")]
fn then_route_len(world: &PlanningWorld, count: usize) {
    world.with_planner(|planner| {
        assert_eq!(planner.snapshot().route().map(|r| r.len()), Some(count));
    });
}

#[then("the route is saved")]
fn then_saved(world: &PlanningWorld) {
    assert!(world.store().load().expect("load").is_some());
    world.with_planner(|planner| assert!(planner.snapshot().has_saved_route()));
}

#[then("no route is saved")]
fn then_not_saved(world: &PlanningWorld) {
    assert!(world.store().load().expect("load").is_none());
}

#[then("a success notification is shown")]
fn then_success(world: &PlanningWorld) {
    world.with_planner(|planner| {
        let snapshot = planner.snapshot();
        let notification = snapshot.notification().expect("notification");
        assert_eq!(notification.level, NotificationLevel::Success);
    });
}

#[then("an error notification refers to geocoding")]
fn then_geocode_error(world: &PlanningWorld) {
    world.with_planner(|planner| {
        let snapshot = planner.snapshot();
        let notification = snapshot.notification().expect("notification");
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.stage, PlannerPhase::Geocoding);
    });
}

#[then("planning fails for lack of points")]
fn then_insufficient(world: &PlanningWorld) {
    let outcome = world.outcome.borrow();
    assert!(matches!(
        outcome.as_ref(),
        Some(Err(PlanningError::InsufficientPoints))
    ));
    assert_eq!(world.directions.calls(), 0);
}

#[then("no external service was called")]
fn then_no_calls(world: &PlanningWorld) {
    assert!(matches!(world.outcome.borrow().as_ref(), Some(Ok(()))));
    assert_eq!(world.resolver.calls(), 0);
    assert_eq!(world.recommender_calls(), 0);
    assert_eq!(world.directions.calls(), 0);
}

#[scenario(path = "tests/features/route_planning.feature", index = 0)]
fn planning_between_addresses(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_planning.feature", index = 1)]
fn unknown_destination(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_planning.feature", index = 2)]
fn no_recommended_points(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_planning.feature", index = 3)]
fn restore_last_route(world: PlanningWorld) {
    let _ = world;
}
