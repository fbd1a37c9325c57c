//! BIPVT 집열기 인스턴스. 시간 간격마다 모드를 판정하고 열취득을 계산해
//! 보고값, 출구 공기 노드 상태, 건물 표면 경계조건(OSCM) 갱신값을 만든다.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::air::humid_air::{self, STANDARD_PRESSURE_KPA};
use crate::bipvt::control::{decide_mode, ControlInput, ControlSettings, OperatingMode};
use crate::bipvt::geometry::{ChannelGeometry, GeometryError};
use crate::bipvt::heat_gain::{
    evaluate, BoundaryConditions, ConditioningMode, HeatGainResult, SolverSettings,
};

/// 시뮬레이션 시작 시 집열기 온도 [°C]
pub const INITIAL_COLLECTOR_TEMP_C: f64 = 23.0;

/// 노점 제한을 적용하는 최소 (입구 - 노점) 차 [°C]
const DEW_POINT_MARGIN: f64 = 0.1;

/// 한 시간 간격 동안 외부에서 주어지는 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorStepInput {
    /// 가용 스케줄 활성 여부
    pub schedule_active: bool,
    /// 입구 공기온도 [°C]
    pub inlet_temp_c: f64,
    /// 입구 습도비 [kg/kg]
    pub inlet_humidity_ratio: f64,
    /// 전체 공기 질량유량 [kg/s]
    pub mass_flow: f64,
    /// 출구 노드 목표온도 [°C]
    pub setpoint_c: f64,
    /// 외기 건구온도 [°C]
    pub ambient_temp_c: f64,
    /// 하늘 온도 [°C]
    pub sky_temp_c: f64,
    /// 풍속 [m/s]
    pub wind_speed: f64,
    /// 건물 표면 온도 [°C]
    pub surface_temp_c: f64,
    /// 직달/천공/지면 입사일사 [W/m²]
    pub beam_solar: f64,
    pub sky_diffuse_solar: f64,
    pub ground_diffuse_solar: f64,
    /// 직달 입사각 [deg]
    pub incidence_angle_deg: f64,
    /// PV 모듈 전기효율 [-]
    pub pv_efficiency: f64,
    /// 외기압 [kPa]
    pub barometric_pressure_kpa: f64,
    /// 시간 간격 [s]
    pub timestep_s: f64,
}

impl Default for CollectorStepInput {
    fn default() -> Self {
        Self {
            schedule_active: true,
            inlet_temp_c: 22.0,
            inlet_humidity_ratio: 0.00578,
            mass_flow: 0.05,
            setpoint_c: 30.0,
            ambient_temp_c: 22.0,
            sky_temp_c: 10.0,
            wind_speed: 0.9,
            surface_temp_c: 22.0,
            beam_solar: 1000.0,
            sky_diffuse_solar: 0.0,
            ground_diffuse_solar: 0.0,
            incidence_angle_deg: 0.0,
            pv_efficiency: 0.15,
            barometric_pressure_kpa: STANDARD_PRESSURE_KPA,
            timestep_s: 600.0,
        }
    }
}

impl CollectorStepInput {
    /// 입사 일사 합계 [W/m²]
    pub fn total_incident_solar(&self) -> f64 {
        self.beam_solar + self.sky_diffuse_solar + self.ground_diffuse_solar
    }

    /// 주어진 공조 방향과 목표온도로 열취득 계산 경계조건을 만든다.
    pub fn boundary(&self, mode: ConditioningMode, setpoint_c: f64) -> BoundaryConditions {
        BoundaryConditions {
            inlet_temp_c: self.inlet_temp_c,
            inlet_humidity_ratio: self.inlet_humidity_ratio,
            ambient_temp_c: self.ambient_temp_c,
            sky_temp_c: self.sky_temp_c,
            wind_speed: self.wind_speed,
            surface_temp_c: self.surface_temp_c,
            beam_solar: self.beam_solar,
            sky_diffuse_solar: self.sky_diffuse_solar,
            ground_diffuse_solar: self.ground_diffuse_solar,
            incidence_angle_deg: self.incidence_angle_deg,
            pv_efficiency: self.pv_efficiency,
            mass_flow: self.mass_flow,
            setpoint_c,
            mode,
        }
    }
}

/// 시간 간격 보고값.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorReport {
    pub mode: OperatingMode,
    /// 열효율 [-]
    pub thermal_efficiency: f64,
    /// 공기 가열량 [W]
    pub heat_gain_w: f64,
    /// 공기 냉각량 [W]
    pub heat_loss_w: f64,
    /// 열출력 [W], 양수 = 가열
    pub thermal_power_w: f64,
    /// 시간 간격 동안의 열에너지 [J]
    pub thermal_energy_j: f64,
    pub inlet_temp_c: f64,
    pub outlet_temp_c: f64,
    /// 작동 공기 질량유량 [kg/s]
    pub mass_flow: f64,
    /// 바이패스 비율 [-]
    pub bypass_fraction: f64,
    pub converged: bool,
}

/// 출구 공기 노드 상태. 온도 외에는 입구값을 그대로 넘긴다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutletNode {
    pub temperature_c: f64,
    pub humidity_ratio: f64,
    /// 비엔탈피 [J/kg]
    pub enthalpy_j_per_kg: f64,
    pub mass_flow: f64,
}

/// 건물 표면 반대편 경계조건 모델(OSCM) 갱신값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OtherSideConditions {
    /// 대류 기준온도 = 플레넘 평균 공기온도 [°C]
    pub conv_temp_c: f64,
    /// 플레넘 대류계수 [W/m²·K]
    pub conv_coeff: f64,
    /// 복사 기준온도 = 흡수층 온도 [°C]
    pub rad_temp_c: f64,
    /// 플레넘 복사계수 [W/m²·K]
    pub rad_coeff: f64,
}

impl OtherSideConditions {
    /// 네 값이 모두 유한한지 여부.
    pub fn is_finite(&self) -> bool {
        [self.conv_temp_c, self.conv_coeff, self.rad_temp_c, self.rad_coeff]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl From<&HeatGainResult> for OtherSideConditions {
    fn from(r: &HeatGainResult) -> Self {
        Self {
            conv_temp_c: r.channel_temp_c,
            conv_coeff: r.channel_conv_coeff,
            rad_temp_c: r.absorber_temp_c,
            rad_coeff: r.absorber_rad_coeff,
        }
    }
}

/// `simulate` 한 번의 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorOutput {
    pub report: CollectorReport,
    pub outlet: OutletNode,
    /// 정지 상태면 `None` (경계조건은 이전 값을 유지한다)
    pub boundary_update: Option<OtherSideConditions>,
    /// 열취득 계산 상세. 정지 상태면 `None`.
    pub heat_gain: Option<HeatGainResult>,
}

/// BIPVT 집열기 한 대.
#[derive(Debug, Clone)]
pub struct BipvtCollector {
    pub name: String,
    geometry: ChannelGeometry,
    solver: SolverSettings,
    control: ControlSettings,
    last_collector_temp_c: f64,
}

impl BipvtCollector {
    /// 형상을 검증하고 집열기를 만든다.
    pub fn new(
        name: impl Into<String>,
        geometry: ChannelGeometry,
        solver: SolverSettings,
        control: ControlSettings,
    ) -> Result<Self, GeometryError> {
        geometry.validate()?;
        Ok(Self {
            name: name.into(),
            geometry,
            solver,
            control,
            last_collector_temp_c: INITIAL_COLLECTOR_TEMP_C,
        })
    }

    pub fn geometry(&self) -> &ChannelGeometry {
        &self.geometry
    }

    /// 다음 시간 간격의 초기값으로 쓰일 집열기 온도 [°C]
    pub fn last_collector_temp_c(&self) -> f64 {
        self.last_collector_temp_c
    }

    /// 유한한 온도만 다음 간격으로 넘기고, 아니면 이전 값을 유지한다.
    fn carry_forward(&mut self, temp_c: f64) {
        if temp_c.is_finite() {
            self.last_collector_temp_c = temp_c;
        } else {
            warn!(
                collector = %self.name,
                kept = self.last_collector_temp_c,
                "유한하지 않은 집열기 온도는 이월하지 않습니다."
            );
        }
    }

    /// 새 시뮬레이션 기간 시작 시 초기화한다.
    pub fn reset(&mut self) {
        self.last_collector_temp_c = INITIAL_COLLECTOR_TEMP_C;
    }

    /// 한 시간 간격을 계산한다.
    pub fn simulate(&mut self, input: &CollectorStepInput) -> CollectorOutput {
        let mode = decide_mode(
            &ControlInput {
                schedule_active: input.schedule_active,
                setpoint_c: input.setpoint_c,
                inlet_temp_c: input.inlet_temp_c,
                incident_solar: input.total_incident_solar(),
                mass_flow: input.mass_flow,
            },
            &self.control,
        );

        let (report, heat_gain) = match mode {
            OperatingMode::Idle => (self.idle_report(input), None),
            OperatingMode::Heating => {
                let r = self.run(input, ConditioningMode::Heating, input.setpoint_c);
                (self.heating_report(input, &r), Some(r))
            }
            OperatingMode::Cooling => {
                let (r, outlet) = self.cool(input);
                (self.cooling_report(input, &r, outlet), Some(r))
            }
        };

        let outlet = OutletNode {
            temperature_c: report.outlet_temp_c,
            humidity_ratio: input.inlet_humidity_ratio,
            enthalpy_j_per_kg: humid_air::enthalpy(
                report.outlet_temp_c,
                input.inlet_humidity_ratio,
            ),
            mass_flow: input.mass_flow,
        };
        let boundary_update = heat_gain
            .as_ref()
            .map(OtherSideConditions::from)
            .filter(OtherSideConditions::is_finite);

        debug!(
            collector = %self.name,
            ?mode,
            power = report.thermal_power_w,
            outlet = report.outlet_temp_c,
            "BIPVT 시간 간격 계산"
        );

        CollectorOutput {
            report,
            outlet,
            boundary_update,
            heat_gain,
        }
    }

    fn run(
        &self,
        input: &CollectorStepInput,
        mode: ConditioningMode,
        target_c: f64,
    ) -> HeatGainResult {
        evaluate(
            &self.geometry,
            &input.boundary(mode, target_c),
            self.last_collector_temp_c,
            &self.solver,
        )
    }

    /// 냉각 계산. 출구가 입구 노점 아래로 내려가면 노점을 목표로 다시 계산한다.
    fn cool(&self, input: &CollectorStepInput) -> (HeatGainResult, f64) {
        let r = self.run(input, ConditioningMode::Cooling, input.setpoint_c);
        let outlet = r.outlet_temp_c;
        if r.heat_rate_w >= 0.0 {
            return (r, outlet);
        }
        let dew_point =
            humid_air::dew_point_c(input.inlet_humidity_ratio, input.barometric_pressure_kpa);
        if outlet < dew_point && input.inlet_temp_c - dew_point > DEW_POINT_MARGIN {
            info!(
                collector = %self.name,
                dew_point,
                "냉각 출구온도가 노점보다 낮아 노점으로 제한합니다."
            );
            let limited = self.run(input, ConditioningMode::Cooling, dew_point);
            return (limited, dew_point);
        }
        (r, outlet)
    }

    fn idle_report(&mut self, input: &CollectorStepInput) -> CollectorReport {
        self.carry_forward(input.inlet_temp_c);
        CollectorReport {
            mode: OperatingMode::Idle,
            thermal_efficiency: 0.0,
            heat_gain_w: 0.0,
            heat_loss_w: 0.0,
            thermal_power_w: 0.0,
            thermal_energy_j: 0.0,
            inlet_temp_c: input.inlet_temp_c,
            outlet_temp_c: input.inlet_temp_c,
            mass_flow: input.mass_flow,
            bypass_fraction: 1.0,
            converged: true,
        }
    }

    fn heating_report(
        &mut self,
        input: &CollectorStepInput,
        r: &HeatGainResult,
    ) -> CollectorReport {
        self.carry_forward(r.pv_cell_temp_c);
        CollectorReport {
            mode: OperatingMode::Heating,
            thermal_efficiency: r.thermal_efficiency,
            heat_gain_w: r.heat_rate_w,
            heat_loss_w: 0.0,
            thermal_power_w: r.heat_rate_w,
            thermal_energy_j: r.heat_rate_w * input.timestep_s,
            inlet_temp_c: input.inlet_temp_c,
            outlet_temp_c: r.outlet_temp_c,
            mass_flow: input.mass_flow,
            bypass_fraction: r.bypass_fraction,
            converged: r.converged,
        }
    }

    fn cooling_report(
        &mut self,
        input: &CollectorStepInput,
        r: &HeatGainResult,
        outlet_temp_c: f64,
    ) -> CollectorReport {
        if r.heat_rate_w < 0.0 {
            self.carry_forward(r.pv_cell_temp_c);
        }
        CollectorReport {
            mode: OperatingMode::Cooling,
            thermal_efficiency: 0.0,
            heat_gain_w: 0.0,
            heat_loss_w: -r.heat_rate_w,
            thermal_power_w: r.heat_rate_w,
            thermal_energy_j: r.heat_rate_w * input.timestep_s,
            inlet_temp_c: input.inlet_temp_c,
            outlet_temp_c,
            mass_flow: input.mass_flow,
            bypass_fraction: r.bypass_fraction,
            converged: r.converged,
        }
    }
}
