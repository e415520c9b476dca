use approx::assert_relative_eq;
use egtf_rs::algorithms::estimator::{Candidate, RegimeEstimator, WeightedMean};
use egtf_rs::prelude::*;

#[test]
fn test_weighted_mean_accumulation() {
    let mut mean = WeightedMean::new();
    mean.add(10.0, 1.0);
    mean.add(20.0, 3.0);
    assert_relative_eq!(mean.mean().unwrap(), 17.5, max_relative = 1e-12);
    assert_eq!(mean.weight_sum(), 4.0);
}

#[test]
fn test_weighted_mean_zero_weight_is_missing() {
    let mean = WeightedMean::<f64>::new();
    assert_eq!(mean.mean(), None);
    assert_eq!(mean.weight_sum(), 0.0);

    // Adding only zero weights still yields no estimate.
    let mut mean = WeightedMean::new();
    mean.add(42.0, 0.0);
    assert_eq!(mean.mean(), None);
}

#[test]
fn test_estimate_single_point_reproduction() {
    let kernel = Kernel::uniform(150.0, 15.0).unwrap();
    let quantities = [Quantity::speed()];
    let estimator = RegimeEstimator::new(&kernel, &quantities);

    let values = [(Quantity::speed(), 25.0)];
    let candidates = [Candidate { dx: 0.0, dt: 0.0, values: &values }];

    let estimate = estimator.estimate(&candidates, 0.0);
    assert_eq!(estimate.value(0), Some(25.0));
    assert_eq!(estimate.weight_sum(0), 1.0);
}

#[test]
fn test_estimate_weighted_average_over_candidates() {
    // Exponential decay in space only; both points on the time axis.
    let kernel = Kernel::exponential(100.0, 10.0, 1000.0, 100.0).unwrap();
    let quantities = [Quantity::speed()];
    let estimator = RegimeEstimator::new(&kernel, &quantities);

    let near = [(Quantity::speed(), 10.0)];
    let far = [(Quantity::speed(), 20.0)];
    let candidates = [
        Candidate { dx: 0.0, dt: 0.0, values: &near },
        Candidate { dx: 100.0, dt: 0.0, values: &far },
    ];

    // c = 1 m/s: far point sits 100 s off the wave, weight
    // exp(-1 - 10) versus weight 1 for the near point.
    let estimate = estimator.estimate(&candidates, 1.0);
    let w_far = (-1.0_f64 - 10.0).exp();
    let expected = (10.0 + 20.0 * w_far) / (1.0 + w_far);
    assert_relative_eq!(estimate.value(0).unwrap(), expected, max_relative = 1e-12);
}

#[test]
fn test_estimate_ignores_unrequested_quantities() {
    let kernel = Kernel::uniform(100.0, 10.0).unwrap();
    let quantities = [Quantity::speed()];
    let estimator = RegimeEstimator::new(&kernel, &quantities);

    let values = [(Quantity::density(), 0.02), (Quantity::speed(), 25.0)];
    let candidates = [Candidate { dx: 0.0, dt: 0.0, values: &values }];

    let estimate = estimator.estimate(&candidates, 0.0);
    assert_eq!(estimate.len(), 1);
    assert_eq!(estimate.value(0), Some(25.0));
}

#[test]
fn test_estimate_missing_quantity_has_no_value() {
    let kernel = Kernel::uniform(100.0, 10.0).unwrap();
    let quantities = [Quantity::speed(), Quantity::density()];
    let estimator = RegimeEstimator::new(&kernel, &quantities);

    let values = [(Quantity::speed(), 25.0)];
    let candidates = [Candidate { dx: 0.0, dt: 0.0, values: &values }];

    let estimate = estimator.estimate(&candidates, 0.0);
    assert_eq!(estimate.value(0), Some(25.0));
    assert_eq!(estimate.value(1), None);
}

#[test]
fn test_estimate_empty_candidates() {
    let kernel = Kernel::uniform(100.0, 10.0).unwrap();
    let quantities = [Quantity::speed()];
    let estimator = RegimeEstimator::new(&kernel, &quantities);

    let estimate = estimator.estimate(&[], 0.0);
    assert_eq!(estimate.value(0), None);
}

#[test]
fn test_estimate_duplicate_samples_both_contribute() {
    let kernel = Kernel::uniform(100.0, 10.0).unwrap();
    let quantities = [Quantity::speed()];
    let estimator = RegimeEstimator::new(&kernel, &quantities);

    let values = [(Quantity::speed(), 10.0), (Quantity::speed(), 30.0)];
    let candidates = [Candidate { dx: 0.0, dt: 0.0, values: &values }];

    let estimate = estimator.estimate(&candidates, 0.0);
    assert_relative_eq!(estimate.value(0).unwrap(), 20.0, max_relative = 1e-12);
    assert_eq!(estimate.weight_sum(0), 2.0);
}
