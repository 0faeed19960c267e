//! Tests for nested extra caches.

mod common;

use common::{Axis, Feature, ObjectMask};
use feature_cache::telemetry::SessionSpan;
use feature_cache::{InitParams, Session};

fn parent_session() -> Session<Feature> {
    let mut session = Session::new();
    session
        .initialize(InitParams::new().with_resolution([1.0, 1.0, 3.0]), SessionSpan::new("parent"))
        .unwrap();
    session.seed(ObjectMask::rect(1, 4, 4)).unwrap();
    session
}

#[test]
fn same_id_returns_same_child() {
    let mut parent = parent_session();

    let id = {
        let child = parent.obtain_extra_cache("x").unwrap();
        child.resolve(&Feature::NumVoxels).unwrap()
    };
    let child = parent.obtain_extra_cache("x").unwrap();
    assert_eq!(child.binding_count(), 1);
    assert_eq!(child.find(&Feature::NumVoxels), Some(id));

    assert_eq!(parent.extra_cache_names().count(), 1);
}

#[test]
fn child_shares_initialization_but_not_bindings() {
    let mut parent = parent_session();
    parent.resolve(&Feature::NumVoxels).unwrap();

    let child = parent.obtain_extra_cache("x").unwrap();
    assert!(child.is_initialized());
    assert!(!child.is_seeded());
    assert_eq!(child.binding_count(), 0);
    assert_eq!(child.params().unwrap().resolution, Some([1.0, 1.0, 3.0]));
}

#[test]
fn sibling_caches_do_not_cross_contaminate() {
    let mut parent = parent_session();

    {
        let x = parent.obtain_extra_cache("x").unwrap();
        x.seed(ObjectMask::rect(10, 2, 2)).unwrap();
        assert_eq!(x.calculate_for(&Feature::NumVoxels).unwrap(), 4.0);
    }
    {
        let y = parent.obtain_extra_cache("y").unwrap();
        y.seed(ObjectMask::rect(11, 3, 3)).unwrap();
        assert_eq!(y.calculate_for(&Feature::NumVoxels).unwrap(), 9.0);
    }

    let x = parent.extra_cache("x").unwrap();
    let x_id = x.find(&Feature::NumVoxels).unwrap();
    assert_eq!(x.binding(x_id).unwrap().execution_count(), 1);

    let y = parent.extra_cache("y").unwrap();
    let y_id = y.find(&Feature::NumVoxels).unwrap();
    assert_eq!(y.binding(y_id).unwrap().execution_count(), 1);

    assert_eq!(parent.calculate_for(&Feature::NumVoxels).unwrap(), 16.0);

    let mut names: Vec<_> = parent.extra_cache_names().collect();
    names.sort_unstable();
    assert_eq!(names, ["x", "y"]);
}

#[test]
fn invalidating_parent_invalidates_every_child() {
    let mut parent = parent_session();
    parent.calculate_for(&Feature::NumVoxels).unwrap();

    for (name, id) in [("x", 20), ("y", 21)] {
        let child = parent.obtain_extra_cache(name).unwrap();
        child.seed(ObjectMask::rect(id, 2, 3)).unwrap();
        child.calculate_for(&Feature::Extent { axis: Axis::Y }).unwrap();
        let nested = child.obtain_extra_cache("inner").unwrap();
        nested.seed(ObjectMask::rect(id + 100, 1, 1)).unwrap();
        nested.calculate_for(&Feature::NumVoxels).unwrap();
    }

    parent.invalidate();

    for name in ["x", "y"] {
        let child = parent.extra_cache(name).unwrap();
        assert!(!child.is_seeded());
        let id = child.find(&Feature::Extent { axis: Axis::Y }).unwrap();
        assert!(!child.binding(id).unwrap().has_cached_result());

        let nested = child.extra_cache("inner").unwrap();
        assert!(!nested.is_seeded());
        let id = nested.find(&Feature::NumVoxels).unwrap();
        assert!(!nested.binding(id).unwrap().has_cached_result());
    }
    assert_eq!(parent.extra_cache_names().count(), 2);
}

#[test]
fn invalidating_a_child_leaves_parent_intact() {
    let mut parent = parent_session();
    parent.calculate_for(&Feature::NumVoxels).unwrap();

    let child = parent.obtain_extra_cache("x").unwrap();
    child.seed(ObjectMask::rect(2, 1, 1)).unwrap();
    child.calculate_for(&Feature::NumVoxels).unwrap();
    child.invalidate();

    let id = parent.find(&Feature::NumVoxels).unwrap();
    assert!(parent.binding(id).unwrap().has_cached_result());
    assert!(parent.is_seeded());
}
