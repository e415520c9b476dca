use approx::assert_relative_eq;
use egtf_rs::prelude::*;

#[test]
fn test_exp_shape_maximal_at_zero_offsets() {
    let shape = ExpKernelShape::new(300.0, 30.0).unwrap();
    assert_eq!(shape.weight(22.2, 0.0, 0.0), 1.0);
    assert!(shape.weight(22.2, 50.0, 5.0) < 1.0);
    assert!(shape.weight(-5.0, -50.0, 5.0) < 1.0);
}

#[test]
fn test_exp_shape_formula() {
    let shape = ExpKernelShape::new(300.0, 30.0).unwrap();
    // dx = 100 m travels in 10 s at c = 10 m/s, so dt = 0 is 10 s off the
    // wave: exp(-100/300 - 10/30).
    let expected = (-100.0 / 300.0_f64 - 10.0 / 30.0).exp();
    assert_relative_eq!(shape.weight(10.0, 100.0, 0.0), expected, max_relative = 1e-12);
    // On the wave the temporal term vanishes: exp(-100/300).
    let expected = (-100.0 / 300.0_f64).exp();
    assert_relative_eq!(shape.weight(10.0, 100.0, 10.0), expected, max_relative = 1e-12);
}

#[test]
fn test_exp_shape_zero_propagation_speed() {
    let shape = ExpKernelShape::new(300.0, 30.0).unwrap();
    // With c = 0 the moving frame collapses: any dx != 0 is infinitely far.
    assert_eq!(shape.weight(0.0, 100.0, 0.0), 0.0);
    assert_eq!(shape.weight(0.0, -100.0, 5.0), 0.0);
    // At dx = 0 the shape is purely temporal.
    let expected = (-15.0 / 30.0_f64).exp();
    assert_relative_eq!(shape.weight(0.0, 0.0, 15.0), expected, max_relative = 1e-12);
}

#[test]
fn test_gauss_shape_formula() {
    let shape = GaussKernelShape::new(300.0, 30.0).unwrap();
    assert_eq!(shape.weight(10.0, 0.0, 0.0), 1.0);
    let expected = (-(100.0 / 300.0_f64).powi(2) / 2.0 - (10.0 / 30.0_f64).powi(2) / 2.0).exp();
    assert_relative_eq!(shape.weight(10.0, 100.0, 0.0), expected, max_relative = 1e-12);
}

#[test]
fn test_shape_symmetry() {
    let shape = ExpKernelShape::new(300.0, 30.0).unwrap();
    // Mirroring both offsets preserves the moving-frame distance.
    assert_relative_eq!(
        shape.weight(10.0, 100.0, 4.0),
        shape.weight(10.0, -100.0, -4.0),
        max_relative = 1e-12
    );
}

#[test]
fn test_invalid_shape_scales_rejected() {
    assert!(matches!(
        ExpKernelShape::new(0.0, 30.0).unwrap_err(),
        EgtfError::InvalidKernelRange { name: "sigma", .. }
    ));
    assert!(matches!(
        ExpKernelShape::new(300.0, -1.0).unwrap_err(),
        EgtfError::InvalidKernelRange { name: "tau", .. }
    ));
    assert!(matches!(
        GaussKernelShape::new(f64::NAN, 30.0).unwrap_err(),
        EgtfError::InvalidKernelRange { name: "sigma", .. }
    ));
}

#[test]
fn test_kernel_clamps_outside_support() {
    let kernel = Kernel::uniform(150.0, 15.0).unwrap();
    // Inside and exactly on the boundary.
    assert_eq!(kernel.weight(0.0, 150.0, 15.0), 1.0);
    assert_eq!(kernel.weight(0.0, -150.0, -15.0), 1.0);
    // Outside on either axis.
    assert_eq!(kernel.weight(0.0, 150.0 + 1e-9, 0.0), 0.0);
    assert_eq!(kernel.weight(0.0, 0.0, 15.0 + 1e-9), 0.0);
}

#[test]
fn test_kernel_query_rectangle() {
    let kernel = Kernel::exponential(300.0, 30.0, 1500.0, 150.0).unwrap();
    assert_eq!(kernel.from_location(2000.0), 500.0);
    assert_eq!(kernel.to_location(2000.0), 3500.0);
    assert_eq!(kernel.from_time(200.0), 50.0);
    assert_eq!(kernel.to_time(200.0), 350.0);
}

#[test]
fn test_default_kernel_is_unbounded() {
    let kernel = Kernel::<f64>::with_defaults();
    assert_eq!(kernel.x_max(), f64::INFINITY);
    assert_eq!(kernel.t_max(), f64::INFINITY);
    // Far data still carries (tiny) weight.
    assert!(kernel.weight(22.2, 1e5, 1e4) >= 0.0);
}

#[test]
fn test_invalid_kernel_ranges_rejected() {
    assert!(matches!(
        Kernel::uniform(0.0, 15.0).unwrap_err(),
        EgtfError::InvalidKernelRange { name: "x_max", .. }
    ));
    assert!(matches!(
        Kernel::uniform(150.0, f64::NAN).unwrap_err(),
        EgtfError::InvalidKernelRange { name: "t_max", .. }
    ));
}

#[test]
fn test_custom_shape_plugs_in() {
    // Triangular decay in space, flat in time.
    #[derive(Debug)]
    struct Triangle {
        x_scale: f64,
    }

    impl KernelShape<f64> for Triangle {
        fn weight(&self, _c: f64, dx: f64, _dt: f64) -> f64 {
            (1.0 - dx.abs() / self.x_scale).max(0.0)
        }
    }

    let kernel = Kernel::new(100.0, 10.0, Box::new(Triangle { x_scale: 100.0 })).unwrap();
    assert_eq!(kernel.weight(0.0, 0.0, 0.0), 1.0);
    assert_relative_eq!(kernel.weight(0.0, 50.0, 0.0), 0.5, max_relative = 1e-12);
    assert_eq!(kernel.weight(0.0, 100.0, 0.0), 0.0);
}
