//! Sharing one `CacheAndReuse` between worker threads.

mod common;

use std::sync::Arc;
use std::thread;

use common::{Axis, Feature, ObjectMask};
use feature_cache::{CacheAndReuse, InitParams, ReplaceStrategy, SharedSession};

const WORKERS: usize = 8;
const OBJECTS: u32 = 4;

#[test]
fn concurrent_workers_share_one_session_per_input() {
    let strategy: CacheAndReuse<Feature> = CacheAndReuse::with_capacity(InitParams::new(), 16);

    let handed_out: Vec<Vec<SharedSession<Feature>>> = thread::scope(|s| {
        let workers: Vec<_> = (0..WORKERS)
            .map(|_| {
                s.spawn(|| {
                    (0..OBJECTS)
                        .map(|id| {
                            let session =
                                strategy.create_or_reuse(ObjectMask::rect(id, 3, 2)).unwrap();
                            let value = session
                                .lock()
                                .calculate_for(&Feature::Extent { axis: Axis::X })
                                .unwrap();
                            assert_eq!(value, 3.0);
                            session
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(strategy.len(), OBJECTS as usize);
    for id in 0..OBJECTS {
        let resident = strategy.create_or_reuse(ObjectMask::rect(id, 3, 2)).unwrap();
        for sessions in &handed_out {
            assert!(
                Arc::ptr_eq(&resident, &sessions[id as usize]),
                "every worker must get the resident session for object {id}"
            );
        }

        let guard = resident.lock();
        let binding = guard.find(&Feature::Extent { axis: Axis::X }).unwrap();
        assert_eq!(guard.binding(binding).unwrap().execution_count(), 1);
    }
}

#[test]
fn strategies_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CacheAndReuse<Feature>>();
    assert_send_sync::<feature_cache::ReuseSingleton<Feature>>();
    assert_send_sync::<feature_cache::AlwaysNew<Feature>>();
    assert_send_sync::<SharedSession<Feature>>();
}
