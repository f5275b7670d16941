//! Behavioural tests for `RouteStateStore`.

use std::cell::RefCell;
use std::sync::Arc;

use easytrip_core::test_support::{FailingKeyValueStore, sample_route};
use easytrip_core::{
    ComputedRoute, DEFAULT_STORAGE_KEY, MemoryKeyValueStore, RouteStateStore, StorageError,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// World state for route persistence scenarios.
#[derive(Debug, Default)]
struct RouteStateWorld {
    store: RefCell<Option<RouteStateStore>>,
    saved: RefCell<Option<Result<(), StorageError>>>,
    loaded: RefCell<Option<Result<Option<ComputedRoute>, StorageError>>>,
}

impl RouteStateWorld {
    fn with_store<T>(&self, f: impl FnOnce(&RouteStateStore) -> T) -> T {
        let store = self.store.borrow();
        f(store.as_ref().expect("store should be configured"))
    }
}

#[fixture]
fn world() -> RouteStateWorld {
    RouteStateWorld::default()
}

#[given("an empty route store")]
fn given_empty_store(world: &RouteStateWorld) {
    let backend = Arc::new(MemoryKeyValueStore::default());
    world.store.replace(Some(RouteStateStore::new(backend)));
}

#[given("a route store holding corrupt content")]
fn given_corrupt_store(world: &RouteStateWorld) {
    let backend = Arc::new(MemoryKeyValueStore::with_entry(
        DEFAULT_STORAGE_KEY,
        r#"{"directions": {}, "points": "nope"}"#,
    ));
    world.store.replace(Some(RouteStateStore::new(backend)));
}

#[given("a route store whose medium rejects writes")]
fn given_failing_store(world: &RouteStateWorld) {
    world
        .store
        .replace(Some(RouteStateStore::new(Arc::new(FailingKeyValueStore))));
}

#[when("I save a route through {count} recommended points")]
fn when_save(world: &RouteStateWorld, count: usize) {
    let outcome = world.with_store(|store| store.save(&sample_route(count)));
    world.saved.replace(Some(outcome));
}

#[when("I load the saved route")]
fn when_load(world: &RouteStateWorld) {
    let outcome = world.with_store(RouteStateStore::load);
    world.loaded.replace(Some(outcome));
}

#[then("the restored route has {count} points")]
fn then_point_count(world: &RouteStateWorld, count: usize) {
    let loaded = world.loaded.borrow();
    let route = loaded
        .as_ref()
        .expect("load should have run")
        .as_ref()
        .expect("load should succeed")
        .as_ref()
        .expect("a route should be restored");
    assert_eq!(route.len(), count);
}

#[then("the restored route runs from Start to End")]
fn then_endpoints(world: &RouteStateWorld) {
    let loaded = world.loaded.borrow();
    let Some(Ok(Some(route))) = loaded.as_ref() else {
        panic!("expected a restored route");
    };
    let names: Vec<&str> = route.points().iter().map(|p| p.name()).collect();
    assert_eq!(names.first().copied(), Some("Start"));
    assert_eq!(names.last().copied(), Some("End"));
}

#[then("no route is restored")]
fn then_nothing(world: &RouteStateWorld) {
    let loaded = world.loaded.borrow();
    assert!(matches!(loaded.as_ref(), Some(Ok(None))));
}

#[then("the load fails as corrupt")]
fn then_corrupt(world: &RouteStateWorld) {
    let loaded = world.loaded.borrow();
    assert!(matches!(loaded.as_ref(), Some(Err(StorageError::Corrupt { .. }))));
}

#[then("the save fails")]
fn then_save_fails(world: &RouteStateWorld) {
    let saved = world.saved.borrow();
    assert!(matches!(saved.as_ref(), Some(Err(StorageError::WriteFailed { .. }))));
}

#[scenario(path = "tests/features/route_state.feature", index = 0)]
fn saved_route_restores(world: RouteStateWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_state.feature", index = 1)]
fn nothing_saved(world: RouteStateWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_state.feature", index = 2)]
fn corrupt_content(world: RouteStateWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_state.feature", index = 3)]
fn failing_medium(world: RouteStateWorld) {
    let _ = world;
}
