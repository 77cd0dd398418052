//! Lookups racing with bind/unbind must see whole controllers only.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use common::FakeController;
use request_router::http::HttpMethod::Get;
use request_router::routing::Controller;
use request_router::Router;

const ROUTES_PER_CONTROLLER: usize = 16;

fn wide_controller(name: &str) -> Arc<dyn Controller> {
    (0..ROUTES_PER_CONTROLLER)
        .fold(FakeController::new(name), |c, i| {
            c.route(Get, &format!("/{name}/{i}/{{id}}"), "show")
        })
        .shared()
}

#[test]
fn test_snapshots_never_show_partial_controllers() {
    let router = Arc::new(Router::new());
    let controllers: Vec<_> = ["a", "b", "c"].into_iter().map(wide_controller).collect();
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = controllers
        .iter()
        .cloned()
        .map(|controller| {
            let router = router.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    router.bind_controller(controller.clone());
                    router.unbind_controller(&controller);
                }
                router.bind_controller(controller);
            })
        })
        .collect();

    let reader = {
        let router = router.clone();
        let controllers = controllers.clone();
        let done = done.clone();
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                let snapshot = router.routes();
                for controller in &controllers {
                    let bound = snapshot.iter().filter(|r| r.is_bound_to(controller)).count();
                    assert!(
                        bound == 0 || bound == ROUTES_PER_CONTROLLER,
                        "partial controller: {bound} routes"
                    );
                }
                let _ = router.route_for(Get, "/a/3/x");
                thread::yield_now();
            }
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    reader.join().unwrap();

    assert_eq!(router.routes().len(), controllers.len() * ROUTES_PER_CONTROLLER);
    assert!(!router.route_for(Get, "/b/15/x").is_unbound());
}

#[test]
fn test_concurrent_filter_binds_stay_deduplicated() {
    let router = Arc::new(Router::new());
    let filter = common::passthrough(0);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let router = router.clone();
            let filter = filter.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    router.bind_filter(filter.clone());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(router.filters().len(), 1);
}
