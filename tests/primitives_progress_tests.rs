use std::sync::{Arc, Mutex};

use egtf_rs::prelude::*;
use egtf_rs::primitives::progress::{ObserverSet, ProgressAggregator};

#[test]
fn test_aggregator_reports_monotonic_fractions() {
    let aggregator = ProgressAggregator::new(10);

    assert_eq!(aggregator.record(2), Some(0.2));
    assert_eq!(aggregator.record(3), Some(0.5));
    // No new maximum, no dispatch.
    assert_eq!(aggregator.record(0), None);
    assert_eq!(aggregator.record(5), Some(1.0));
    assert_eq!(aggregator.fraction(), 1.0);
}

#[test]
fn test_aggregator_clamps_to_one() {
    let aggregator = ProgressAggregator::new(4);
    assert_eq!(aggregator.record(4), Some(1.0));
    assert_eq!(aggregator.record(4), None);
    assert_eq!(aggregator.fraction(), 1.0);
}

#[test]
fn test_observer_set_notifies_in_registration_order() {
    let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let mut observers = ObserverSet::new();

    let first = Arc::clone(&seen);
    observers.register(move |_: &ProgressEvent| first.lock().unwrap().push("first"));
    let second = Arc::clone(&seen);
    observers.register(move |_: &ProgressEvent| second.lock().unwrap().push("second"));

    observers.notify(&ProgressEvent::new(0.5, None));
    assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn test_observer_panic_is_isolated() {
    let seen: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
    let mut observers = ObserverSet::new();

    observers.register(|_: &ProgressEvent| panic!("misbehaving observer"));
    let sink = Arc::clone(&seen);
    observers.register(move |event: &ProgressEvent| sink.lock().unwrap().push(event.fraction()));

    observers.notify(&ProgressEvent::new(0.25, None));
    observers.notify(&ProgressEvent::new(0.75, None));

    assert_eq!(*seen.lock().unwrap(), vec![0.25, 0.75]);
}

#[test]
fn test_progress_event_accessors() {
    let event = ProgressEvent::new(0.5, Some(3..5));
    assert_eq!(event.fraction(), 0.5);
    assert_eq!(event.completed_locations(), Some(&(3..5)));

    let event = ProgressEvent::new(1.0, None);
    assert_eq!(event.completed_locations(), None);
}

#[test]
fn test_cancellation_token_is_shared() {
    let token = CancellationToken::new();
    let clone = token.clone();

    assert!(!token.is_cancelled());
    clone.cancel();
    assert!(token.is_cancelled());

    token.reset();
    assert!(!clone.is_cancelled());
}
