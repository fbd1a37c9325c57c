use bipvt_collector::app::simulate_scenario;
use bipvt_collector::bipvt::coefficients::ExteriorConvectionModel;
use bipvt_collector::bipvt::OperatingMode;
use bipvt_collector::config::{parse_config, Config};
use bipvt_collector::scenario::{parse_scenario, Scenario, ScenarioError};
use bipvt_collector::ui_cli::render_step;
use bipvt_collector::units::{HeatTransferUnit, TemperatureUnit};

#[test]
fn empty_config_uses_defaults() {
    let cfg = parse_config("").expect("empty config");
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.solver.max_iterations, 50);
    assert_eq!(cfg.control.min_irradiance, 0.3);
    assert!(cfg.solver.overrides.bypass_fraction.is_none());
}

#[test]
fn config_sections_override_defaults() {
    let cfg = parse_config(
        r#"
[output_units]
temperature = "Fahrenheit"
heat_transfer = "BtuPerHourSquareFootF"

[solver]
relaxation = 0.5
exterior_convection = "ForcedNaturalBlend"

[solver.overrides]
wind_speed = 2.0
"#,
    )
    .expect("config");
    assert_eq!(cfg.output_units.temperature, TemperatureUnit::Fahrenheit);
    assert_eq!(cfg.output_units.heat_transfer, HeatTransferUnit::BtuPerHourSquareFootF);
    assert_eq!(cfg.solver.relaxation, 0.5);
    assert_eq!(cfg.solver.tolerance, 1e-3);
    assert_eq!(cfg.solver.exterior_convection, ExteriorConvectionModel::ForcedNaturalBlend);
    assert_eq!(cfg.solver.overrides.wind_speed, Some(2.0));
}

#[test]
fn default_config_round_trips_through_toml() {
    let text = toml::to_string_pretty(&Config::default()).expect("serialize");
    assert_eq!(parse_config(&text).expect("parse"), Config::default());
}

#[test]
fn scenario_with_relative_humidity() {
    let s = parse_scenario(
        r#"
name = "west wall"

[geometry]
width_m = 1.5
tilt_deg = 60.0

[step]
inlet_temp_c = 20.0
beam_solar = 600.0
incidence_angle_deg = 35.0
"#,
    )
    .expect("scenario");
    assert_eq!(s.name, "west wall");
    assert_eq!(s.inlet_relative_humidity_pct, None);
    assert_eq!(s.geometry.width_m, 1.5);
    assert_eq!(s.geometry.height_m, 2.0);

    let humid = parse_scenario(
        r#"
inlet_relative_humidity_pct = 60.0
[step]
inlet_temp_c = 20.0
"#,
    )
    .expect("scenario");
    assert!(humid.step.inlet_humidity_ratio > 0.008 && humid.step.inlet_humidity_ratio < 0.010);
}

#[test]
fn scenario_rejects_bad_geometry() {
    let err = parse_scenario("[geometry]\nheight_m = -1.0\n").unwrap_err();
    assert!(matches!(err, ScenarioError::Geometry(_)));
    let err = parse_scenario("name = 3").unwrap_err();
    assert!(matches!(err, ScenarioError::Parse(_)));
}

#[test]
fn demo_scenario_runs_and_renders() {
    let cfg = Config::default();
    let outputs = simulate_scenario(&cfg, &Scenario::demo(), 3).expect("run");
    assert_eq!(outputs.len(), 3);
    assert!(outputs.iter().all(|o| o.report.mode == OperatingMode::Heating));
    let text = render_step(1, &outputs[0], &cfg.output_units);
    assert!(text.contains("가열"));
    assert!(text.contains("°C"));
    assert!(text.contains("표면 경계조건"));
    assert!(text.ends_with('\n'));
}
