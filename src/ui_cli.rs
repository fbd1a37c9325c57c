use crate::bipvt::{CollectorOutput, OperatingMode};
use crate::config::OutputUnits;
use crate::scenario::Scenario;
use crate::units::{convert_heat_transfer, convert_temperature, HeatTransferUnit, TemperatureUnit};

/// 시나리오 머리말을 출력한다.
pub fn print_header(scenario: &Scenario) {
    let g = &scenario.geometry;
    println!("\n=== {} ===", scenario.name);
    println!(
        "집열기: {:.2} m × {:.2} m, 채널 깊이 {:.3} m, 경사 {:.1}°",
        g.width_m, g.height_m, g.channel_depth_m, g.tilt_deg
    );
}

/// 한 시간 간격 결과를 출력한다.
pub fn print_step(step: usize, output: &CollectorOutput, units: &OutputUnits) {
    print!("{}", render_step(step, output, units));
}

fn mode_label(mode: OperatingMode) -> &'static str {
    match mode {
        OperatingMode::Idle => "정지",
        OperatingMode::Heating => "가열",
        OperatingMode::Cooling => "냉각",
    }
}

fn temp(value_c: f64, unit: TemperatureUnit) -> String {
    format!(
        "{:.2} {}",
        convert_temperature(value_c, TemperatureUnit::Celsius, unit),
        unit.symbol()
    )
}

fn coeff(value: f64, unit: HeatTransferUnit) -> String {
    format!(
        "{:.3} {}",
        convert_heat_transfer(value, HeatTransferUnit::WPerSquareMeterK, unit),
        unit.symbol()
    )
}

/// 한 시간 간격 결과를 설정된 단위로 문자열화한다.
pub fn render_step(step: usize, output: &CollectorOutput, units: &OutputUnits) -> String {
    let r = &output.report;
    let mut lines = vec![
        format!("\n-- 시간 간격 {step} : {} --", mode_label(r.mode)),
        format!(
            "열출력: {:.2} W (가열 {:.2} W / 냉각 {:.2} W)",
            r.thermal_power_w, r.heat_gain_w, r.heat_loss_w
        ),
        format!("열에너지: {:.1} kJ", r.thermal_energy_j / 1000.0),
        format!("열효율: {:.3}", r.thermal_efficiency),
        format!(
            "입구/출구 온도: {} / {}",
            temp(r.inlet_temp_c, units.temperature),
            temp(r.outlet_temp_c, units.temperature)
        ),
        format!(
            "질량유량: {:.4} kg/s, 바이패스 비율: {:.3}",
            r.mass_flow, r.bypass_fraction
        ),
        format!("출구 비엔탈피: {:.1} J/kg", output.outlet.enthalpy_j_per_kg),
    ];
    if let Some(hg) = &output.heat_gain {
        lines.push(format!(
            "유리/PV/흡수층 온도: {} / {} / {}",
            temp(hg.glass_temp_c, units.temperature),
            temp(hg.pv_cell_temp_c, units.temperature),
            temp(hg.absorber_temp_c, units.temperature)
        ));
        lines.push(format!(
            "반복: {}회, 수렴: {}",
            hg.iterations,
            if hg.converged { "예" } else { "아니오" }
        ));
    }
    if let Some(bc) = &output.boundary_update {
        lines.push(format!(
            "표면 경계조건: 대류 {} / {}, 복사 {} / {}",
            temp(bc.conv_temp_c, units.temperature),
            coeff(bc.conv_coeff, units.heat_transfer),
            temp(bc.rad_temp_c, units.temperature),
            coeff(bc.rad_coeff, units.heat_transfer)
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}
