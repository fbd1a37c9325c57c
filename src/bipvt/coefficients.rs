//! 현재 반복값 온도로 선형화한 대류/복사 열전달계수 추정.

use serde::{Deserialize, Serialize};

use crate::air::properties::AirProperties;
use crate::bipvt::geometry::ChannelGeometry;
use crate::units::{celsius_to_kelvin, kelvin_to_celsius};

/// 스테판-볼츠만 상수 [W/m²·K⁴]
pub const SIGMA: f64 = 5.67e-8;
const GRAVITY: f64 = 9.81;
const MIN_DELTA_T: f64 = 1.0e-6;
/// 채널 자연대류 상관식에 쓰는 경사각 상한 [deg]
const MAX_ENCLOSURE_TILT_DEG: f64 = 75.0;

/// 외표면 대류계수 모델.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExteriorConvectionModel {
    /// h = 4.2 + 3.5·v
    #[default]
    LinearWind,
    /// 강제대류(풍하측 지붕)와 자연대류(Duffie & Beckman)의 세제곱합 세제곱근
    ForcedNaturalBlend,
}

/// 두 회색 평행면(형상계수 1)의 유효 방사율.
pub fn two_surface_emissivity(e1: f64, e2: f64) -> f64 {
    1.0 / (1.0 / e1 + 1.0 / e2 - 1.0)
}

/// 선형화 복사 열전달계수 h = σ·ε·(T1²+T2²)(T1+T2). 온도는 K.
pub fn radiative_coefficient(t1_k: f64, t2_k: f64, emissivity: f64) -> f64 {
    SIGMA * emissivity * (t1_k.powi(2) + t2_k.powi(2)) * (t1_k + t2_k)
}

/// 경사각에 따라 하늘과 지면(외기) 온도를 4제곱 가중한 주위 복사온도 [°C].
pub fn surroundings_temperature_c(t_amb_c: f64, t_sky_c: f64, tilt_deg: f64) -> f64 {
    let cos_tilt = tilt_deg.to_radians().cos();
    let t_amb_k = celsius_to_kelvin(t_amb_c);
    let t_sky_k = celsius_to_kelvin(t_sky_c);
    let t4 = t_amb_k.powi(4) * 0.5 * (1.0 - cos_tilt) + t_sky_k.powi(4) * 0.5 * (1.0 + cos_tilt);
    kelvin_to_celsius(t4.powf(0.25))
}

/// 외표면(커버 유리) 대류계수 [W/m²·K].
pub fn exterior_convection(
    model: ExteriorConvectionModel,
    wind_speed: f64,
    t_glass_c: f64,
    t_amb_c: f64,
    geometry: &ChannelGeometry,
) -> f64 {
    match model {
        ExteriorConvectionModel::LinearWind => 4.2 + 3.5 * wind_speed,
        ExteriorConvectionModel::ForcedNaturalBlend => {
            let forced = 5.622 * wind_speed.max(0.0).powf(0.657) / geometry.height_m.powf(0.343);
            let natural = exterior_natural_convection(t_glass_c, t_amb_c, geometry);
            (forced.powi(3) + natural.powi(3)).cbrt()
        }
    }
}

fn exterior_natural_convection(t_glass_c: f64, t_amb_c: f64, geometry: &ChannelGeometry) -> f64 {
    let dh = geometry.panel_hydraulic_diameter();
    let t_film_k = celsius_to_kelvin(0.5 * (t_amb_c + t_glass_c));
    let delta_t = (t_glass_c - t_amb_c).abs().max(MIN_DELTA_T);
    let rayleigh = GRAVITY * (1.0 / t_film_k) * delta_t * dh.powi(3) / (21.7e-6 * 1.71e-5);
    0.15 * rayleigh.powf(0.333) * 0.026 / dh
}

/// 채널 내부 대류계수 쌍 [W/m²·K].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConvection {
    /// 공기 ↔ 흡수층(백킹)
    pub fluid_to_absorber: f64,
    /// 공기 ↔ 건물 표면
    pub fluid_to_surface: f64,
}

/// 채널 유량이 있으면 강제대류, 없으면 경사 밀폐공간 자연대류 상관식을 쓴다.
pub fn channel_convection(
    channel_mass_flow: f64,
    t_absorber_c: f64,
    t_surface_c: f64,
    t_fluid_c: f64,
    props: &AirProperties,
    geometry: &ChannelGeometry,
) -> ChannelConvection {
    if channel_mass_flow > 0.0 {
        forced_channel_convection(channel_mass_flow, props, geometry)
    } else {
        natural_channel_convection(t_absorber_c, t_surface_c, t_fluid_c, props, geometry)
    }
}

/// 난류 채널 유동의 Reynolds-Nusselt 상관식.
pub fn forced_channel_convection(
    channel_mass_flow: f64,
    props: &AirProperties,
    geometry: &ChannelGeometry,
) -> ChannelConvection {
    let dh = geometry.channel_hydraulic_diameter();
    let flow_area = geometry.width_m * geometry.channel_depth_m;
    let velocity = channel_mass_flow / (props.density * flow_area);
    let reynolds = props.density * velocity * dh / props.dynamic_viscosity;
    let pr_term = props.prandtl.powf(0.4);

    let nu_absorber = 0.052 * reynolds.powf(0.78) * pr_term;
    let nu_surface = 1.017 * reynolds.powf(0.471) * pr_term;
    ChannelConvection {
        fluid_to_absorber: props.conductivity * nu_absorber / dh,
        fluid_to_surface: props.conductivity * nu_surface / dh,
    }
}

/// 정체 상태. Hollands 경사 밀폐공간 상관식, 경사각은 75°로 제한.
pub fn natural_channel_convection(
    t_absorber_c: f64,
    t_surface_c: f64,
    t_fluid_c: f64,
    props: &AirProperties,
    geometry: &ChannelGeometry,
) -> ChannelConvection {
    let depth = geometry.channel_depth_m;
    let delta_t = (t_absorber_c - t_surface_c).abs().max(MIN_DELTA_T);
    let rayleigh = GRAVITY * (1.0 / celsius_to_kelvin(t_fluid_c)) * delta_t * depth.powi(3)
        / (props.diffusivity * props.kinematic_viscosity);
    let h = props.conductivity * hollands_nusselt(rayleigh, geometry.tilt_deg) / depth;
    ChannelConvection {
        fluid_to_absorber: h,
        fluid_to_surface: h,
    }
}

/// 경사 밀폐공간 Nusselt 수 (Hollands et al.).
pub fn hollands_nusselt(rayleigh: f64, tilt_deg: f64) -> f64 {
    let beta = tilt_deg.min(MAX_ENCLOSURE_TILT_DEG).to_radians();
    let ra_cos = rayleigh * beta.cos();
    1.0 + 1.44
        * (1.0 - 1708.0 * (1.8 * beta).sin().powf(1.6) / ra_cos)
        * (1.0 - 1708.0 / ra_cos).max(0.0)
        + ((ra_cos / 5830.0).powf(1.0 / 3.0) - 1.0).max(0.0)
}
