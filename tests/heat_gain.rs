//! 고정점 열취득 계산: 기준 사례, 정체, 수렴, 바이패스, 단조성.
use bipvt_collector::bipvt::heat_gain::{
    bypass_to_setpoint, evaluate, mixed_outlet, BoundaryConditions, ConditioningMode,
    SolverOverrides, SolverSettings,
};
use bipvt_collector::bipvt::ChannelGeometry;

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

/// 1 m × 2 m, 채널 깊이 0.05 m, 0.05 kg/s, 법선 입사 1000 W/m², 목표 30 °C 가열
fn sunny_wall() -> BoundaryConditions {
    BoundaryConditions {
        inlet_temp_c: 22.0,
        inlet_humidity_ratio: 0.00578,
        ambient_temp_c: 22.0,
        sky_temp_c: 10.0,
        wind_speed: 0.9,
        surface_temp_c: 22.0,
        beam_solar: 1000.0,
        sky_diffuse_solar: 0.0,
        ground_diffuse_solar: 0.0,
        incidence_angle_deg: 0.0,
        pv_efficiency: 0.15,
        mass_flow: 0.05,
        setpoint_c: 30.0,
        mode: ConditioningMode::Heating,
    }
}

#[test]
fn sunny_wall_heats_without_overshoot() {
    let geom = ChannelGeometry::default();
    let r = evaluate(&geom, &sunny_wall(), 22.0, &SolverSettings::default());
    assert!(r.converged, "iterations {}", r.iterations);
    assert!(r.iterations <= 50);
    assert!(r.heat_rate_w > 0.0);
    assert!(r.outlet_temp_c <= 30.0 + 1e-9, "outlet {}", r.outlet_temp_c);
    assert_close("q", r.heat_rate_w, 347.86, 0.02);
    assert_close("outlet", r.outlet_temp_c, 28.85, 0.01);
    assert_close("efficiency", r.thermal_efficiency, 0.174, 0.01);
    assert_eq!(r.bypass_fraction, 0.0);
    // 가열 시 PV 셀이 가장 뜨겁고 유리는 외기보다 뜨겁다
    assert!(r.pv_cell_temp_c > r.absorber_temp_c);
    assert!(r.glass_temp_c > 22.0);
}

#[test]
fn bypass_brings_outlet_to_setpoint() {
    let geom = ChannelGeometry::default();
    let mut b = sunny_wall();
    b.setpoint_c = 25.0;
    let r = evaluate(&geom, &b, 22.0, &SolverSettings::default());
    assert!(r.converged);
    assert!(r.bypass_fraction > 0.0 && r.bypass_fraction < 1.0);
    assert_close("outlet", r.outlet_temp_c, 25.0, 1e-3);
    assert_close("bypass", r.bypass_fraction, 0.649, 0.02);
    assert!(r.channel_outlet_temp_c > r.outlet_temp_c);
}

#[test]
fn large_flow_bypass_converges_on_setpoint() {
    let geom = ChannelGeometry::default();
    let mut b = sunny_wall();
    b.mass_flow = 0.5;
    b.setpoint_c = 23.0;
    let r = evaluate(&geom, &b, 22.0, &SolverSettings::default());
    assert!(r.converged, "iterations {}", r.iterations);
    assert_close("outlet", r.outlet_temp_c, 23.0, 1e-3);
    assert_close("bypass", r.bypass_fraction, 0.816, 0.02);
}

#[test]
fn zero_flow_outlet_equals_inlet() {
    let geom = ChannelGeometry::default();
    let mut b = sunny_wall();
    b.mass_flow = 0.0;
    let r = evaluate(&geom, &b, 22.0, &SolverSettings::default());
    assert_eq!(r.outlet_temp_c, b.inlet_temp_c);
    assert_eq!(r.heat_rate_w, 0.0);
    assert!(r.converged);
    // 정체 공기는 건물 표면보다 뜨거워진다
    assert!(r.channel_temp_c > b.surface_temp_c);
    assert_close("stagnant air", r.channel_temp_c, 40.45, 0.02);
}

#[test]
fn zero_flow_override_forces_stagnation() {
    let geom = ChannelGeometry::default();
    let settings = SolverSettings {
        overrides: SolverOverrides {
            mass_flow: Some(0.0),
            ..SolverOverrides::default()
        },
        ..SolverSettings::default()
    };
    let r = evaluate(&geom, &sunny_wall(), 22.0, &settings);
    assert_eq!(r.outlet_temp_c, 22.0);
    assert_eq!(r.channel_mass_flow, 0.0);
}

#[test]
fn evaluate_is_repeatable() {
    let geom = ChannelGeometry::default();
    let settings = SolverSettings::default();
    let a = evaluate(&geom, &sunny_wall(), 31.5, &settings);
    let b = evaluate(&geom, &sunny_wall(), 31.5, &settings);
    assert_eq!(a, b);
}

#[test]
fn converged_result_meets_tolerance() {
    let geom = ChannelGeometry::default();
    let settings = SolverSettings::default();
    let r = evaluate(&geom, &sunny_wall(), 22.0, &settings);
    assert!(r.converged);
    assert!(r.max_relative_change < settings.tolerance);
}

#[test]
fn iteration_cap_reports_non_convergence() {
    let geom = ChannelGeometry::default();
    let settings = SolverSettings {
        max_iterations: 1,
        ..SolverSettings::default()
    };
    let r = evaluate(&geom, &sunny_wall(), 22.0, &settings);
    assert!(!r.converged);
    assert_eq!(r.iterations, 1);
    assert!(r.outlet_temp_c.is_finite() && r.heat_rate_w.is_finite());
}

#[test]
fn heat_rate_does_not_drop_with_more_sun() {
    let geom = ChannelGeometry::default();
    let settings = SolverSettings::default();
    let mut prev = f64::NEG_INFINITY;
    for g in [0.0, 100.0, 200.0, 400.0, 600.0, 800.0, 1000.0] {
        let mut b = sunny_wall();
        b.beam_solar = g;
        b.setpoint_c = 80.0;
        let r = evaluate(&geom, &b, 22.0, &settings);
        assert!(r.converged, "g = {g}");
        assert!(r.heat_rate_w >= prev, "g = {g}: {} < {prev}", r.heat_rate_w);
        prev = r.heat_rate_w;
    }
}

#[test]
fn bypass_and_mixed_outlet_stay_bounded() {
    for setpoint in [20.0, 24.0, 26.0, 28.0, 35.0] {
        let geom = ChannelGeometry::default();
        let mut b = sunny_wall();
        b.setpoint_c = setpoint;
        let r = evaluate(&geom, &b, 22.0, &SolverSettings::default());
        assert!((0.0..=1.0).contains(&r.bypass_fraction));
        let lo = b.inlet_temp_c.min(r.channel_outlet_temp_c) - 1e-9;
        let hi = b.inlet_temp_c.max(r.channel_outlet_temp_c) + 1e-9;
        assert!(r.outlet_temp_c >= lo && r.outlet_temp_c <= hi, "setpoint {setpoint}");
    }
}

#[test]
fn bypass_helpers() {
    assert_eq!(bypass_to_setpoint(25.0, 20.0, 30.0), 0.5);
    assert_eq!(bypass_to_setpoint(35.0, 20.0, 30.0), 0.0);
    assert_eq!(bypass_to_setpoint(15.0, 20.0, 30.0), 1.0);
    assert!((0.0..=1.0).contains(&bypass_to_setpoint(25.0, 20.0, 20.0)));
    assert_eq!(mixed_outlet(0.5, 20.0, 30.0), 25.0);
    assert_eq!(mixed_outlet(1.0, 20.0, 30.0), 20.0);
}

#[test]
fn night_sky_cools_warm_air() {
    let geom = ChannelGeometry::default();
    let b = BoundaryConditions {
        inlet_temp_c: 30.0,
        ambient_temp_c: 5.0,
        sky_temp_c: -10.0,
        surface_temp_c: 18.0,
        beam_solar: 0.0,
        setpoint_c: 20.0,
        mode: ConditioningMode::Cooling,
        ..sunny_wall()
    };
    let r = evaluate(&geom, &b, 23.0, &SolverSettings::default());
    assert!(r.converged);
    assert!(r.heat_rate_w < 0.0);
    assert_close("q", r.heat_rate_w, -418.0, 0.02);
    assert_close("outlet", r.outlet_temp_c, 21.77, 0.01);
    assert_eq!(r.thermal_efficiency, 0.0);
}

#[test]
fn heating_that_loses_heat_is_fully_bypassed() {
    let geom = ChannelGeometry::default();
    let b = BoundaryConditions {
        inlet_temp_c: 30.0,
        ambient_temp_c: 5.0,
        sky_temp_c: -10.0,
        surface_temp_c: 18.0,
        beam_solar: 0.0,
        setpoint_c: 35.0,
        ..sunny_wall()
    };
    let r = evaluate(&geom, &b, 23.0, &SolverSettings::default());
    assert_eq!(r.heat_rate_w, 0.0);
    assert_eq!(r.bypass_fraction, 1.0);
    assert_eq!(r.outlet_temp_c, 30.0);
}

#[test]
fn solar_override_replaces_geometry_optics() {
    let geom = ChannelGeometry::default();
    let settings = SolverSettings {
        overrides: SolverOverrides {
            incident_solar: Some(0.0),
            ..SolverOverrides::default()
        },
        ..SolverSettings::default()
    };
    let mut b = sunny_wall();
    b.setpoint_c = 80.0;
    let dark = evaluate(&geom, &b, 22.0, &settings);
    let lit = evaluate(&geom, &b, 22.0, &SolverSettings::default());
    assert!(dark.heat_rate_w < lit.heat_rate_w);
}

#[test]
fn cold_sunny_stagnation_stays_bounded() {
    let geom = ChannelGeometry::default();
    let b = BoundaryConditions {
        inlet_temp_c: -4.0,
        ambient_temp_c: -4.0,
        sky_temp_c: -14.0,
        surface_temp_c: 0.0,
        beam_solar: 800.0,
        mass_flow: 0.0,
        ..sunny_wall()
    };
    for prior in [-4.0, 23.0] {
        let r = evaluate(&geom, &b, prior, &SolverSettings::default());
        assert!(r.converged, "prior {prior}: iterations {}", r.iterations);
        assert!(r.max_relative_change.is_finite());
        for (label, v) in [
            ("glass", r.glass_temp_c),
            ("pv", r.pv_cell_temp_c),
            ("absorber", r.absorber_temp_c),
            ("channel", r.channel_temp_c),
            ("h_conv", r.channel_conv_coeff),
            ("h_rad", r.absorber_rad_coeff),
        ] {
            assert!(v.is_finite(), "prior {prior}: {label} = {v}");
        }
        // 정체 공기는 건물 표면과 흡수층 사이
        assert!(r.channel_temp_c >= b.surface_temp_c && r.channel_temp_c <= r.absorber_temp_c);
        assert_close("channel", r.channel_temp_c, 15.7, 0.02);
        assert_eq!(r.outlet_temp_c, b.inlet_temp_c);
        assert_eq!(r.heat_rate_w, 0.0);
    }
}

#[test]
fn non_finite_input_returns_last_finite_iterate() {
    let geom = ChannelGeometry::default();
    let b = BoundaryConditions {
        surface_temp_c: f64::NAN,
        ..sunny_wall()
    };
    let r = evaluate(&geom, &b, 22.0, &SolverSettings::default());
    assert!(!r.converged);
    assert_eq!(r.iterations, 1);
    assert!(r.heat_rate_w.is_finite() && r.outlet_temp_c.is_finite());
    assert_eq!(r.channel_temp_c, 22.0);
}

#[test]
fn warm_wall_at_night_has_zero_efficiency() {
    let geom = ChannelGeometry::default();
    let b = BoundaryConditions {
        inlet_temp_c: 10.0,
        ambient_temp_c: 10.0,
        surface_temp_c: 30.0,
        beam_solar: 0.0,
        setpoint_c: 20.0,
        ..sunny_wall()
    };
    let r = evaluate(&geom, &b, 23.0, &SolverSettings::default());
    assert!(r.heat_rate_w > 0.0, "q {}", r.heat_rate_w);
    assert_eq!(r.thermal_efficiency, 0.0);
}

#[test]
fn invalid_geometry_passes_air_through() {
    let geom = ChannelGeometry {
        channel_depth_m: 0.0,
        ..ChannelGeometry::default()
    };
    let r = evaluate(&geom, &sunny_wall(), 22.0, &SolverSettings::default());
    assert!(!r.converged);
    assert_eq!(r.iterations, 0);
    assert_eq!(r.heat_rate_w, 0.0);
    assert_eq!(r.bypass_fraction, 1.0);
    assert_eq!(r.outlet_temp_c, 22.0);
}

#[test]
fn pv_module_area_sets_layer_split() {
    let geom = ChannelGeometry::default();
    assert_close("pv area", geom.pv_area(), 1.7, 1e-12);
    let full = ChannelGeometry {
        pv_module_area_fraction: 1.0,
        ..ChannelGeometry::default()
    };
    let mut b = sunny_wall();
    b.setpoint_c = 80.0;
    let settings = SolverSettings::default();
    let partial = evaluate(&geom, &b, 22.0, &settings);
    let covered = evaluate(&full, &b, 22.0, &settings);
    // PV 모듈이 벽 전체를 덮으면 전력으로 빠지는 몫만큼 열취득이 줄어든다
    assert!(covered.heat_rate_w < partial.heat_rate_w);
}
