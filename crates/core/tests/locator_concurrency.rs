mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use common::{TestPublisher, as_publisher, label_of, labeled};
use lodestone_api::{ComponentType, Key};
use lodestone_core::DefaultComponentLocator;

#[test]
fn racing_lookups_build_a_type_exactly_once() {
    const THREADS: usize = 8;

    let ty = ComponentType::new("acme.Widget");
    let publisher = TestPublisher::new("counted");
    publisher.serve(&ty, labeled(None, "A"));

    let locator = Arc::new(DefaultComponentLocator::new());
    locator.add(as_publisher(&publisher), 0);

    let barrier = Arc::new(Barrier::new(THREADS));
    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let locator = locator.clone();
        let ty = ty.clone();
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || {
            let key = Key::of(ty);
            barrier.wait();
            let view = locator.locate(&key);
            let seen: Vec<_> = view.iter().map(|e| label_of(&e)).collect();
            // hold the view until every thread finished its lookup, so the
            // cache entry cannot be reclaimed mid-race
            barrier.wait();
            seen
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().expect("lookup thread panicked"), ["A"]);
    }
    assert_eq!(publisher.queries(), 1);
}

#[test]
fn racing_adds_of_the_same_publisher_register_it_once() {
    const THREADS: usize = 4;

    let publisher = as_publisher(&TestPublisher::new("contested"));
    let locator = Arc::new(DefaultComponentLocator::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let locator = locator.clone();
        let publisher = publisher.clone();
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            locator.add(publisher, 7)
        }));
    }

    let admitted = handles
        .into_iter()
        .map(|h| h.join().expect("add thread panicked"))
        .filter(|added| *added)
        .count();

    assert_eq!(admitted, 1);
    assert_eq!(locator.publishers().len(), 1);
}

#[test]
fn lookups_stay_consistent_during_publisher_churn() {
    const ROUNDS: usize = 50;

    let ty = ComponentType::new("acme.Widget");
    let steady = TestPublisher::new("steady");
    steady.serve(&ty, labeled(None, "steady"));

    let locator = Arc::new(DefaultComponentLocator::new());
    locator.add(as_publisher(&steady), 0);

    let stop = Arc::new(AtomicUsize::new(0));
    let mut readers = Vec::new();
    for _ in 0..3 {
        let locator = locator.clone();
        let ty = ty.clone();
        let stop = stop.clone();
        readers.push(thread::spawn(move || {
            let key = Key::of(ty);
            while stop.load(Ordering::SeqCst) == 0 {
                let view = locator.locate(&key);
                let seen: Vec<_> = view.iter().map(|e| label_of(&e)).collect();
                // the steady publisher is never removed, so every snapshot
                // must contain its binding exactly once
                assert_eq!(seen.iter().filter(|l| **l == "steady").count(), 1);
                assert!(seen.len() <= 2);
            }
        }));
    }

    for round in 0..ROUNDS {
        let churn = TestPublisher::new("churn");
        churn.serve(&ty, labeled(None, "churn"));
        let churn_dyn = as_publisher(&churn);
        let rank = (round % 5) as i32;
        assert!(locator.add(churn_dyn.clone(), rank));
        assert!(locator.remove(&churn_dyn));
    }
    stop.store(1, Ordering::SeqCst);

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }

    assert_eq!(locator.publishers().len(), 1);
    let key = Key::of(ty);
    let final_view = locator.locate(&key);
    let seen: Vec<_> = final_view.iter().map(|e| label_of(&e)).collect();
    assert_eq!(seen, ["steady"]);
}
