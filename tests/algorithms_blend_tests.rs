use approx::assert_relative_eq;
use egtf_rs::algorithms::blend::CongestionBlend;
use egtf_rs::prelude::*;

fn blend() -> CongestionBlend<f64> {
    // v_crit = 80 km/h, delta_v = 10 km/h in SI.
    CongestionBlend::new(80.0 / 3.6, 10.0 / 3.6).unwrap()
}

#[test]
fn test_mixing_weight_sigmoid() {
    let blend = blend();

    // Deep congestion: reference speed far below critical.
    let w = blend.mixing_weight(Some(2.0), Some(2.5));
    assert!(w > 0.999);

    // Free flow: reference speed far above critical.
    let w = blend.mixing_weight(Some(40.0), Some(41.0));
    assert!(w < 0.001);

    // At the flip-over point the weight is one half.
    let v_crit = 80.0 / 3.6;
    let w = blend.mixing_weight(Some(v_crit), Some(v_crit));
    assert_relative_eq!(w, 0.5, max_relative = 1e-12);
}

#[test]
fn test_mixing_weight_uses_lower_regime_estimate() {
    let blend = blend();
    // The congested estimate is lower and must drive the sigmoid.
    let expected = blend.mixing_weight(Some(10.0), Some(10.0));
    assert_eq!(blend.mixing_weight(Some(10.0), Some(40.0)), expected);
    assert_eq!(blend.mixing_weight(Some(40.0), Some(10.0)), expected);
}

#[test]
fn test_mixing_weight_one_sided_reference() {
    let blend = blend();
    let both = blend.mixing_weight(Some(10.0), Some(10.0));
    assert_eq!(blend.mixing_weight(Some(10.0), None), both);
    assert_eq!(blend.mixing_weight(None, Some(10.0)), both);
}

#[test]
fn test_mixing_weight_no_reference_data() {
    let blend = blend();
    assert_eq!(blend.mixing_weight(None, None), 0.5);
}

#[test]
fn test_mixing_weight_in_unit_interval() {
    let blend = blend();
    for u in [-100.0, -1.0, 0.0, 5.0, 22.0, 50.0, 1000.0] {
        let w = blend.mixing_weight(Some(u), Some(u));
        assert!((0.0..=1.0).contains(&w), "w = {} for u = {}", w, u);
    }
}

#[test]
fn test_blend_value_mixes_regimes() {
    let blend = blend();
    let value = blend.blend_value(0.25, Some(8.0), Some(32.0));
    assert_relative_eq!(value, 0.25 * 8.0 + 0.75 * 32.0, max_relative = 1e-12);
}

#[test]
fn test_blend_value_degrades_to_regime_with_data() {
    let blend = blend();
    assert_eq!(blend.blend_value(0.9, Some(8.0), None), 8.0);
    assert_eq!(blend.blend_value(0.9, None, Some(32.0)), 32.0);
}

#[test]
fn test_blend_value_missing_when_no_data() {
    let blend = blend();
    let value = blend.blend_value(0.5, None, None);
    assert!(GridData::<f64>::is_missing_value(value));
}

#[test]
fn test_blend_degenerates_when_regimes_coincide() {
    // When both regime estimates agree, the mixing weight is irrelevant.
    let blend = blend();
    for w in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let value = blend.blend_value(w, Some(25.0), Some(25.0));
        assert_relative_eq!(value, 25.0, max_relative = 1e-12);
    }
}

#[test]
fn test_invalid_blend_parameters_rejected() {
    assert!(matches!(
        CongestionBlend::new(f64::NAN, 2.0).unwrap_err(),
        EgtfError::NonFiniteParameter { name: "critical_speed", .. }
    ));
    assert!(matches!(
        CongestionBlend::new(20.0, 0.0).unwrap_err(),
        EgtfError::NonPositiveParameter { name: "speed_range", .. }
    ));
    assert!(matches!(
        CongestionBlend::new(20.0, f64::INFINITY).unwrap_err(),
        EgtfError::NonPositiveParameter { name: "speed_range", .. }
    ));
}
