use approx::assert_relative_eq;
use egtf_rs::prelude::*;

#[test]
fn test_builder_defaults_match_literature_values() {
    let egtf: Egtf<f64> = Egtf::builder().build().unwrap();
    let config = egtf.config();

    assert_relative_eq!(config.congested_wave_speed, -18.0 / 3.6, max_relative = 1e-12);
    assert_relative_eq!(config.free_flow_wave_speed, 80.0 / 3.6, max_relative = 1e-12);
    assert_relative_eq!(config.critical_speed, 80.0 / 3.6, max_relative = 1e-12);
    assert_relative_eq!(config.speed_range, 10.0 / 3.6, max_relative = 1e-12);
    assert_eq!(config.reference_quantity, Quantity::speed());
    assert_eq!(config.batch_size, 1);
}

#[test]
fn test_builder_rejects_duplicate_parameter() {
    let err = Egtf::<f64>::builder()
        .critical_speed(20.0)
        .critical_speed(22.0)
        .build()
        .unwrap_err();
    assert!(matches!(err, EgtfError::DuplicateParameter { parameter: "critical_speed" }));
}

#[test]
fn test_builder_rejects_non_finite_speeds() {
    let err = Egtf::<f64>::builder().free_flow_wave_speed(f64::NAN).build().unwrap_err();
    assert!(matches!(
        err,
        EgtfError::NonFiniteParameter { name: "free_flow_wave_speed", .. }
    ));

    let err = Egtf::<f64>::builder().congested_wave_speed(f64::INFINITY).build().unwrap_err();
    assert!(matches!(
        err,
        EgtfError::NonFiniteParameter { name: "congested_wave_speed", .. }
    ));
}

#[test]
fn test_builder_rejects_invalid_speed_range_and_batch() {
    let err = Egtf::<f64>::builder().speed_range(-1.0).build().unwrap_err();
    assert!(matches!(err, EgtfError::NonPositiveParameter { name: "speed_range", .. }));

    let err = Egtf::<f64>::builder().batch_size(0).build().unwrap_err();
    assert!(matches!(err, EgtfError::InvalidBatchSize(0)));
}

#[test]
fn test_invalid_grid_axes_rejected() {
    assert!(matches!(
        Grid::<f64>::new(vec![], vec![0.0]).unwrap_err(),
        EgtfError::EmptyGridAxis { axis: "location" }
    ));
    assert!(matches!(
        Grid::new(vec![0.0, 0.0], vec![0.0]).unwrap_err(),
        EgtfError::NonAscendingGridAxis { axis: "location", index: 1 }
    ));
    assert!(matches!(
        Grid::new(vec![0.0, 100.0], vec![10.0, 5.0]).unwrap_err(),
        EgtfError::NonAscendingGridAxis { axis: "time", index: 1 }
    ));
    assert!(matches!(
        Grid::new(vec![0.0, f64::NAN], vec![0.0]).unwrap_err(),
        EgtfError::NonFiniteAxisValue { axis: "location", index: 1, .. }
    ));
}

#[test]
fn test_unknown_quantity_lookup_fails() {
    let grid = Grid::new(vec![0.0], vec![0.0]).unwrap();
    let index = DataPointIndex::new();
    let kernel = Kernel::uniform(100.0, 100.0).unwrap();
    let egtf = Egtf::with_defaults();

    let result =
        egtf.run(&grid, &index, &kernel, &[Quantity::speed()]).unwrap().into_result().unwrap();
    let err = result.values(&Quantity::flow()).unwrap_err();
    assert!(matches!(err, EgtfError::UnknownQuantity { .. }));
    assert!(result.contains(&Quantity::speed()));
    assert!(!result.contains(&Quantity::flow()));
}

#[test]
fn test_identity_converter_round_trip() {
    let grid = Grid::new(vec![0.0, 100.0], vec![0.0, 10.0]).unwrap();
    let mut index = DataPointIndex::new();
    index.insert_point(&Quantity::speed(), 50.0, 5.0, 25.0).unwrap();
    let kernel = Kernel::uniform(500.0, 500.0).unwrap();
    let egtf = Egtf::with_defaults();

    let result =
        egtf.run(&grid, &index, &kernel, &[Quantity::speed()]).unwrap().into_result().unwrap();
    let converted = result.converted(&Quantity::speed(), &IdentityConverter).unwrap();
    assert_eq!(&converted, result.values(&Quantity::speed()).unwrap());
}

#[test]
fn test_closure_converter() {
    let grid = Grid::new(vec![0.0], vec![0.0]).unwrap();
    let mut index = DataPointIndex::new();
    index.insert_point(&Quantity::speed(), 0.0, 0.0, 20.0).unwrap();
    let kernel = Kernel::uniform(100.0, 100.0).unwrap();
    let egtf = Egtf::with_defaults();

    let result =
        egtf.run(&grid, &index, &kernel, &[Quantity::speed()]).unwrap().into_result().unwrap();

    // Convert m/s to km/h row by row.
    let to_kmh = FnConverter(|values: &GridData<f64>| -> Vec<Vec<f64>> {
        values.to_rows().into_iter().map(|row| row.into_iter().map(|v| v * 3.6).collect()).collect()
    });
    let kmh = result.converted(&Quantity::speed(), &to_kmh).unwrap();
    assert_relative_eq!(kmh[0][0], 72.0, max_relative = 1e-12);
}

#[test]
fn test_f32_pipeline() {
    let grid = Grid::new(vec![0.0_f32, 100.0], vec![0.0, 10.0]).unwrap();
    let mut index = DataPointIndex::new();
    index.insert_point(&Quantity::speed(), 50.0_f32, 5.0, 25.0).unwrap();
    let kernel = Kernel::uniform(500.0_f32, 500.0).unwrap();
    let egtf: Egtf<f32> = Egtf::builder().build().unwrap();

    let result =
        egtf.run(&grid, &index, &kernel, &[Quantity::speed()]).unwrap().into_result().unwrap();
    let values = result.values(&Quantity::speed()).unwrap();
    assert_relative_eq!(values.get(0, 0), 25.0_f32, max_relative = 1e-5);
}

#[test]
fn test_quantity_identity() {
    assert_eq!(Quantity::speed(), Quantity::speed());
    assert_ne!(Quantity::speed(), Quantity::flow());
    assert!(Quantity::speed().is_speed());
    assert!(!Quantity::density().is_speed());
    assert_eq!(Quantity::new("occupancy").name(), "occupancy");
    assert!(Quantity::new_speed("probe_speed").is_speed());
}

#[test]
fn test_engine_reuse_across_runs() {
    let kernel = Kernel::uniform(500.0, 500.0).unwrap();
    let mut index = DataPointIndex::new();
    index.insert_point(&Quantity::speed(), 50.0, 5.0, 25.0).unwrap();
    let egtf = Egtf::with_defaults();

    let grid_a = Grid::new(vec![0.0, 100.0], vec![0.0, 10.0]).unwrap();
    let grid_b = Grid::new(vec![25.0, 75.0], vec![5.0]).unwrap();

    let a = egtf.run(&grid_a, &index, &kernel, &[Quantity::speed()]).unwrap();
    let b = egtf.run(&grid_b, &index, &kernel, &[Quantity::speed()]).unwrap();
    assert!(!a.is_cancelled());
    assert!(!b.is_cancelled());

    // New data may arrive between runs of the same engine.
    index.insert_point(&Quantity::speed(), 60.0, 6.0, 27.0).unwrap();
    let c = egtf.run(&grid_a, &index, &kernel, &[Quantity::speed()]).unwrap();
    assert!(!c.is_cancelled());
}
