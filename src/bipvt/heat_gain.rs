//! 최대 열취득 계산. 유리/PV 셀/흡수층 3절점 열수지와 채널 에너지 적분을
//! 완화 고정점 반복으로 결합하고, 목표 출구온도에 맞추어 바이패스 비율을 정한다.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::air::humid_air::specific_heat_from_humidity_ratio;
use crate::air::properties::AirProperties;
use crate::bipvt::channel::{self, ChannelTemperatures, ForcedChannelInput};
use crate::bipvt::coefficients::{
    channel_convection, exterior_convection, radiative_coefficient, surroundings_temperature_c,
    two_surface_emissivity, ExteriorConvectionModel,
};
use crate::bipvt::geometry::ChannelGeometry;
use crate::bipvt::linear_solver::{self, Matrix3, Vector3};
use crate::bipvt::optics::{
    ground_diffuse_equivalent_angle, sky_diffuse_equivalent_angle, GlazingOptics,
};
use crate::units::celsius_to_kelvin;

const SMALL: f64 = 1.0e-10;
/// 이보다 약한 입사 일사 [W/m²]에서는 열효율을 0으로 본다. 운전 판정의 주간 기준과 같다.
const MIN_EFFICIENCY_IRRADIANCE: f64 = 0.3;

/// 바이패스 판단에 쓰는 공조 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditioningMode {
    Heating,
    Cooling,
}

/// 디버그/검증용 강제 입력. 모두 `None`이 기본이며 기본 동작에는 관여하지 않는다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOverrides {
    /// 풍속 고정 [m/s]
    pub wind_speed: Option<f64>,
    /// IAM 적용 후 흡수 일사 고정 [W/m²]
    pub incident_solar: Option<f64>,
    /// 직달 입사각 고정 [deg]
    pub incidence_angle_deg: Option<f64>,
    /// 바이패스 비율 고정 [-]
    pub bypass_fraction: Option<f64>,
    /// 전체 질량유량 고정 [kg/s]
    pub mass_flow: Option<f64>,
}

/// 고정점 반복 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// 상대 변화량 수렴 기준
    pub tolerance: f64,
    /// 최대 반복 횟수
    pub max_iterations: usize,
    /// 완화계수 (0, 1]
    pub relaxation: f64,
    pub exterior_convection: ExteriorConvectionModel,
    pub overrides: SolverOverrides,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-3,
            max_iterations: 50,
            relaxation: 0.75,
            exterior_convection: ExteriorConvectionModel::LinearWind,
            overrides: SolverOverrides::default(),
        }
    }
}

/// 한 번의 계산에 주어지는 외부 경계조건.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConditions {
    /// 입구 공기온도 [°C]
    pub inlet_temp_c: f64,
    /// 입구 습도비 [kg/kg]
    pub inlet_humidity_ratio: f64,
    /// 외기 건구온도 [°C]
    pub ambient_temp_c: f64,
    /// 하늘 온도 [°C]
    pub sky_temp_c: f64,
    /// 풍속 [m/s]
    pub wind_speed: f64,
    /// 채널 반대편 건물 표면 온도 [°C]
    pub surface_temp_c: f64,
    /// 직달 입사일사 [W/m²]
    pub beam_solar: f64,
    /// 천공 산란 입사일사 [W/m²]
    pub sky_diffuse_solar: f64,
    /// 지면 반사 입사일사 [W/m²]
    pub ground_diffuse_solar: f64,
    /// 직달 입사각 [deg]
    pub incidence_angle_deg: f64,
    /// PV 모듈 전기효율 [-]
    pub pv_efficiency: f64,
    /// 전체 공기 질량유량 [kg/s], 0 가능
    pub mass_flow: f64,
    /// 목표 출구온도 [°C]
    pub setpoint_c: f64,
    pub mode: ConditioningMode,
}

impl BoundaryConditions {
    /// 입사 일사 합계 [W/m²]
    pub fn total_incident_solar(&self) -> f64 {
        self.beam_solar + self.sky_diffuse_solar + self.ground_diffuse_solar
    }
}

/// 계산 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatGainResult {
    /// 공기로 전달된 열량 [W], 양수 = 가열
    pub heat_rate_w: f64,
    /// 열효율 [-], 가열이 아니면 0
    pub thermal_efficiency: f64,
    /// 바이패스 혼합 후 출구온도 [°C]
    pub outlet_temp_c: f64,
    /// 바이패스 전 채널 출구온도 [°C]
    pub channel_outlet_temp_c: f64,
    /// 바이패스 비율 [0, 1]
    pub bypass_fraction: f64,
    /// 채널 질량유량 [kg/s]
    pub channel_mass_flow: f64,
    /// 채널(플레넘) 평균 공기온도 [°C]
    pub channel_temp_c: f64,
    /// 채널측 대류계수 [W/m²·K]
    pub channel_conv_coeff: f64,
    /// 흡수층-건물 표면 복사계수 [W/m²·K]
    pub absorber_rad_coeff: f64,
    /// 흡수층 온도 [°C]
    pub absorber_temp_c: f64,
    /// PV 셀 온도 [°C]
    pub pv_cell_temp_c: f64,
    /// 커버 유리 온도 [°C]
    pub glass_temp_c: f64,
    pub iterations: usize,
    /// 마지막 반복의 최대 상대 변화량
    pub max_relative_change: f64,
    pub converged: bool,
}

impl HeatGainResult {
    /// 계산 없이 공기를 그대로 통과시킨 결과. 열량 0, 전량 바이패스, 출구 = 입구.
    fn pass_through(boundary: &BoundaryConditions) -> Self {
        let t_in = boundary.inlet_temp_c;
        Self {
            heat_rate_w: 0.0,
            thermal_efficiency: 0.0,
            outlet_temp_c: t_in,
            channel_outlet_temp_c: t_in,
            bypass_fraction: 1.0,
            channel_mass_flow: 0.0,
            channel_temp_c: t_in,
            channel_conv_coeff: 0.0,
            absorber_rad_coeff: 0.0,
            absorber_temp_c: t_in,
            pv_cell_temp_c: t_in,
            glass_temp_c: t_in,
            iterations: 0,
            max_relative_change: f64::INFINITY,
            converged: false,
        }
    }
}

/// 반복 중 변하는 상태. 호출마다 새로 만들고 결과 추출 후 버린다.
#[derive(Debug, Clone, Copy)]
struct IterationState {
    t_glass: f64,
    t_pv: f64,
    t_absorber: f64,
    channel_mass_flow: f64,
    bypass_fraction: f64,
    t_fluid: f64,
}

/// 반복 동안 고정인 열원/물성.
struct Fixed {
    cp: f64,
    wind_speed: f64,
    total_mass_flow: f64,
    s_pv: f64,
    s_absorber: f64,
    h_glass_pv: f64,
    h_pv_absorber: f64,
    t_surroundings: f64,
    emissivity_12: f64,
}

fn relative_change(new: f64, old: f64) -> f64 {
    ((new - old) / (old.abs() + SMALL)).abs()
}

/// 혼합 출구온도가 목표에 정확히 맞는 바이패스 비율, [0, 1]로 제한.
pub fn bypass_to_setpoint(setpoint_c: f64, inlet_c: f64, channel_outlet_c: f64) -> f64 {
    let d = inlet_c - channel_outlet_c;
    let denom = if d.abs() < SMALL { SMALL.copysign(d) } else { d };
    ((setpoint_c - channel_outlet_c) / denom).clamp(0.0, 1.0)
}

/// 바이패스 혼합 출구온도.
pub fn mixed_outlet(bypass_fraction: f64, inlet_c: f64, channel_outlet_c: f64) -> f64 {
    bypass_fraction * inlet_c + (1.0 - bypass_fraction) * channel_outlet_c
}

fn absorbed_solar(
    geometry: &ChannelGeometry,
    boundary: &BoundaryConditions,
    settings: &SolverSettings,
) -> f64 {
    if let Some(g) = settings.overrides.incident_solar {
        return g;
    }
    let optics = GlazingOptics {
        thickness_m: geometry.glass_thickness_m,
        refractive_index: geometry.glass_refractive_index,
        extinction_coeff: geometry.glass_extinction_coeff,
    };
    let theta_beam = settings
        .overrides
        .incidence_angle_deg
        .unwrap_or(boundary.incidence_angle_deg)
        .to_radians();
    let theta_sky = sky_diffuse_equivalent_angle(geometry.tilt_deg);
    let theta_ground = ground_diffuse_equivalent_angle(geometry.tilt_deg);
    boundary.beam_solar * optics.incidence_angle_modifier(theta_beam)
        + boundary.sky_diffuse_solar * optics.incidence_angle_modifier(theta_sky)
        + boundary.ground_diffuse_solar * optics.incidence_angle_modifier(theta_ground)
}

fn fixed_terms(
    geometry: &ChannelGeometry,
    boundary: &BoundaryConditions,
    settings: &SolverSettings,
) -> Fixed {
    let g = absorbed_solar(geometry, boundary, settings);
    let pv_ratio = geometry.pv_area() / geometry.wall_area();
    let f_cell = geometry.pv_cell_area_fraction;
    Fixed {
        cp: specific_heat_from_humidity_ratio(boundary.inlet_humidity_ratio),
        wind_speed: settings.overrides.wind_speed.unwrap_or(boundary.wind_speed),
        total_mass_flow: settings.overrides.mass_flow.unwrap_or(boundary.mass_flow).max(0.0),
        s_pv: g * (geometry.pv_cell_trans_abs * f_cell - boundary.pv_efficiency) * pv_ratio,
        s_absorber: geometry.backing_trans_abs * g * (1.0 - f_cell) * pv_ratio
            + geometry.cladding_trans_abs * g * (1.0 - pv_ratio),
        h_glass_pv: 1.0 / geometry.glass_to_pv_resistance,
        h_pv_absorber: 1.0 / geometry.pv_to_backing_resistance,
        t_surroundings: surroundings_temperature_c(
            boundary.ambient_temp_c,
            boundary.sky_temp_c,
            geometry.tilt_deg,
        ),
        emissivity_12: two_surface_emissivity(
            geometry.backing_emissivity,
            geometry.building_surface_emissivity,
        ),
    }
}

/// 집열기 한 대의 한 시간 간격 열해석.
///
/// `prior_collector_temp_c`는 직전 계산의 집열기 온도로, 첫 반복의 채널 공기 물성
/// 평가온도로만 쓰인다. 같은 입력에는 항상 같은 결과를 낸다.
/// 최대 반복에 도달하거나 반복값이 유한하지 않게 되면 경고를 남기고
/// `converged = false`로 마지막 유한 추정값을 돌려준다.
/// 형상이 유효하지 않으면 계산하지 않고 전량 바이패스 결과를 돌려준다.
pub fn evaluate(
    geometry: &ChannelGeometry,
    boundary: &BoundaryConditions,
    prior_collector_temp_c: f64,
    settings: &SolverSettings,
) -> HeatGainResult {
    if let Err(err) = geometry.validate() {
        warn!(%err, "BIPVT 형상이 유효하지 않아 열취득 계산을 건너뜁니다.");
        return HeatGainResult::pass_through(boundary);
    }
    let fx = fixed_terms(geometry, boundary, settings);
    let t_in = boundary.inlet_temp_c;
    let t_amb = boundary.ambient_temp_c;
    let t2 = boundary.surface_temp_c;
    let rf = settings.relaxation;

    let seed = 0.5 * (t_amb + t2);
    let mut st = IterationState {
        t_glass: seed,
        t_pv: seed,
        t_absorber: seed,
        channel_mass_flow: fx.total_mass_flow,
        bypass_fraction: 0.0,
        t_fluid: if prior_collector_temp_c.is_finite() {
            prior_collector_temp_c
        } else {
            seed
        },
    };
    if let Some(b) = settings.overrides.bypass_fraction {
        st.bypass_fraction = b.clamp(0.0, 1.0);
        st.channel_mass_flow = (1.0 - st.bypass_fraction) * fx.total_mass_flow;
    }

    let mut channel_temps = ChannelTemperatures {
        average_c: st.t_fluid,
        outlet_c: t_in,
    };
    let mut h_channel_surface = 0.0;
    let mut h_rad_12 = 0.0;
    let mut max_change = f64::INFINITY;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < settings.max_iterations {
        iterations += 1;

        // 1. 현재 반복값으로 계수 갱신
        let props = AirProperties::at(st.t_fluid, fx.cp);
        let h_ext = exterior_convection(
            settings.exterior_convection,
            fx.wind_speed,
            st.t_glass,
            t_amb,
            geometry,
        );
        let h_surr = radiative_coefficient(
            celsius_to_kelvin(fx.t_surroundings),
            celsius_to_kelvin(st.t_glass),
            geometry.glass_emissivity,
        );
        let h_rad_absorber = radiative_coefficient(
            celsius_to_kelvin(st.t_absorber),
            celsius_to_kelvin(t2),
            fx.emissivity_12,
        );
        let conv = channel_convection(
            st.channel_mass_flow,
            st.t_absorber,
            t2,
            st.t_fluid,
            &props,
            geometry,
        );

        // 2. 채널 평균/출구 온도
        let temps = if st.channel_mass_flow > 0.0 {
            channel::integrate_forced(&ForcedChannelInput {
                width_m: geometry.width_m,
                length_m: geometry.height_m,
                mass_flow: st.channel_mass_flow,
                cp: fx.cp,
                h_absorber: conv.fluid_to_absorber,
                h_surface: conv.fluid_to_surface,
                t_absorber_c: st.t_absorber,
                t_surface_c: t2,
                t_inlet_c: t_in,
            })
        } else {
            let net_gain = fx.s_pv
                + fx.s_absorber
                + h_ext * (t_amb - st.t_glass)
                + h_surr * (fx.t_surroundings - st.t_glass)
                + h_rad_absorber * (t2 - st.t_absorber);
            let target = channel::stagnation(net_gain, conv.fluid_to_surface, t2, t_in);
            // 정체 공기는 흡수층과 건물 표면 사이 온도를 넘지 않는다
            let bounded = target
                .average_c
                .max(t2.min(st.t_absorber))
                .min(t2.max(st.t_absorber));
            ChannelTemperatures {
                average_c: st.t_fluid + rf * (bounded - st.t_fluid),
                outlet_c: target.outlet_c,
            }
        };

        // 3. 유리 / PV 셀 / 흡수층 열수지
        let (hgp, hpa) = (fx.h_glass_pv, fx.h_pv_absorber);
        let a = Matrix3([
            [h_ext + h_surr + hgp, -hgp, 0.0],
            [hgp, -hpa - hgp, hpa],
            [0.0, hpa, -hpa - conv.fluid_to_absorber - h_rad_absorber],
        ]);
        let b = Vector3([
            h_ext * t_amb + h_surr * fx.t_surroundings,
            -fx.s_pv,
            -fx.s_absorber - conv.fluid_to_absorber * temps.average_c - h_rad_absorber * t2,
        ]);
        let y = linear_solver::solve(a, b);

        let finite = y.0.iter().all(|v| v.is_finite())
            && temps.average_c.is_finite()
            && temps.outlet_c.is_finite()
            && conv.fluid_to_surface.is_finite()
            && h_rad_absorber.is_finite();
        if !finite {
            warn!(
                iteration = iterations,
                "BIPVT 반복값이 유한하지 않아 직전 반복값으로 중단합니다."
            );
            break;
        }
        channel_temps = temps;
        st.t_fluid = temps.average_c;
        h_channel_surface = conv.fluid_to_surface;
        h_rad_12 = h_rad_absorber;

        // 4. 공기 열취득
        let q = st.channel_mass_flow * fx.cp * (channel_temps.outlet_c - t_in);

        // 5. 목표온도 초과 시 바이패스
        let t_mixed = mixed_outlet(st.bypass_fraction, t_in, channel_temps.outlet_c);
        let (useful, overshoot) = match boundary.mode {
            ConditioningMode::Heating => (q > 0.0, t_mixed > boundary.setpoint_c),
            ConditioningMode::Cooling => (q < 0.0, t_mixed < boundary.setpoint_c),
        };
        // 이미 바이패스 중이면 목표온도에 맞게 다시 조정한다
        let bypass_new = match settings.overrides.bypass_fraction {
            Some(b) => b.clamp(0.0, 1.0),
            None if useful && (overshoot || st.bypass_fraction > 0.0) => {
                bypass_to_setpoint(boundary.setpoint_c, t_in, channel_temps.outlet_c)
            }
            None => st.bypass_fraction,
        };

        // 6. 채널 유량
        let flow_new = (1.0 - bypass_new) * fx.total_mass_flow;

        // 7. 완화
        let changes = [
            relative_change(y[0], st.t_glass),
            relative_change(y[1], st.t_pv),
            relative_change(y[2], st.t_absorber),
            relative_change(flow_new, st.channel_mass_flow),
        ];
        st.t_glass += rf * (y[0] - st.t_glass);
        st.t_pv += rf * (y[1] - st.t_pv);
        st.t_absorber += rf * (y[2] - st.t_absorber);
        st.channel_mass_flow += rf * (flow_new - st.channel_mass_flow);
        st.bypass_fraction = bypass_new;

        // 8. 수렴 판정
        max_change = changes.iter().copied().fold(0.0, |acc: f64, c| {
            if acc.is_nan() || c.is_nan() {
                f64::NAN
            } else {
                acc.max(c)
            }
        });
        trace!(
            iteration = iterations,
            t_glass = st.t_glass,
            t_pv = st.t_pv,
            t_absorber = st.t_absorber,
            channel_mass_flow = st.channel_mass_flow,
            bypass = st.bypass_fraction,
            max_change,
            "BIPVT 반복"
        );
        if changes.iter().all(|c| *c < settings.tolerance) {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            max_iterations = settings.max_iterations,
            max_change,
            "BIPVT 열취득 계산이 최대 반복 횟수 안에 수렴하지 않았습니다. 현재 추정값을 사용합니다."
        );
    }

    let mut heat_rate = st.channel_mass_flow * fx.cp * (channel_temps.outlet_c - t_in);
    let mut bypass = st.bypass_fraction;
    let mut outlet = mixed_outlet(bypass, t_in, channel_temps.outlet_c);

    // 운전 방향과 반대인 열취득은 전량 바이패스로 처리
    let contradictory = match boundary.mode {
        ConditioningMode::Heating => heat_rate < 0.0,
        ConditioningMode::Cooling => heat_rate > 0.0,
    };
    if contradictory {
        debug!(heat_rate, mode = ?boundary.mode, "운전 방향과 반대인 열취득, 전량 바이패스");
        heat_rate = 0.0;
        bypass = 1.0;
        outlet = t_in;
    }

    let incident = settings
        .overrides
        .incident_solar
        .unwrap_or_else(|| boundary.total_incident_solar());
    let thermal_efficiency = if heat_rate > 0.0 && incident > MIN_EFFICIENCY_IRRADIANCE {
        heat_rate / (incident * geometry.wall_area())
    } else {
        0.0
    };

    debug!(
        iterations,
        converged, heat_rate, outlet, bypass, "BIPVT 열취득 계산 완료"
    );

    HeatGainResult {
        heat_rate_w: heat_rate,
        thermal_efficiency,
        outlet_temp_c: outlet,
        channel_outlet_temp_c: channel_temps.outlet_c,
        bypass_fraction: bypass,
        channel_mass_flow: st.channel_mass_flow,
        channel_temp_c: st.t_fluid,
        channel_conv_coeff: h_channel_surface,
        absorber_rad_coeff: h_rad_12,
        absorber_temp_c: st.t_absorber,
        pv_cell_temp_c: st.t_pv,
        glass_temp_c: st.t_glass,
        iterations,
        max_relative_change: max_change,
        converged,
    }
}
