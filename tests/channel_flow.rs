//! 채널 에너지 적분: 강제유동 해석해와 정체 상태.
use bipvt_collector::bipvt::channel::{integrate_forced, stagnation, ForcedChannelInput};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn input() -> ForcedChannelInput {
    ForcedChannelInput {
        width_m: 1.0,
        length_m: 2.0,
        mass_flow: 0.05,
        cp: 1000.0,
        h_absorber: 10.0,
        h_surface: 0.0,
        t_absorber_c: 50.0,
        t_surface_c: 22.0,
        t_inlet_c: 20.0,
    }
}

#[test]
fn forced_flow_matches_closed_form() {
    // a·L = -W·h·L/(m·cp) = -0.4, 평형온도 50 °C
    let t = integrate_forced(&input());
    assert_close("outlet", t.outlet_c, 29.890_398_618_930_82, 1e-9);
    assert_close("average", t.average_c, 25.274_003_452_672_947, 1e-9);
}

#[test]
fn forced_flow_approaches_weighted_equilibrium() {
    let mut i = input();
    i.h_surface = 10.0;
    i.mass_flow = 1.0e-4;
    let t = integrate_forced(&i);
    // 유량이 매우 작으면 출구는 (h1·T1 + h2·T2)/(h1 + h2)에 수렴
    assert_close("outlet", t.outlet_c, 36.0, 1e-6);
    assert!(t.average_c > i.t_inlet_c && t.average_c < 36.0);
}

#[test]
fn forced_flow_without_convection_keeps_inlet() {
    let mut i = input();
    i.h_absorber = 0.0;
    let t = integrate_forced(&i);
    assert_eq!(t.outlet_c, i.t_inlet_c);
    assert_eq!(t.average_c, i.t_inlet_c);
}

#[test]
fn stagnant_channel_outlet_is_inlet() {
    let t = stagnation(120.0, 3.0, 22.0, 18.0);
    assert_eq!(t.outlet_c, 18.0);
    assert_close("average", t.average_c, 62.0, 1e-12);
}

#[test]
fn stagnant_channel_with_zero_coefficient_stays_finite() {
    let t = stagnation(0.0, 0.0, 22.0, 18.0);
    assert_close("average", t.average_c, 22.0, 1e-12);
}
