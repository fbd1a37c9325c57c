//! 채널 내부 대류 상관식에 쓰는 건공기 전달물성. 모두 채널 평균 공기온도(°C)의 함수이다.

use crate::units::celsius_to_kelvin;

/// 평균 공기온도에서 평가한 공기 물성.
#[derive(Debug, Clone, Copy)]
pub struct AirProperties {
    /// 점성계수 [Pa·s]
    pub dynamic_viscosity: f64,
    /// 열전도율 [W/m·K]
    pub conductivity: f64,
    /// 프란틀 수 [-]
    pub prandtl: f64,
    /// 밀도 [kg/m³]
    pub density: f64,
    /// 열확산율 [m²/s]
    pub diffusivity: f64,
    /// 동점성계수 [m²/s]
    pub kinematic_viscosity: f64,
}

impl AirProperties {
    /// 평균 공기온도(°C)와 정압비열(J/kg·K)로 물성을 계산한다.
    pub fn at(mean_temp_c: f64, cp: f64) -> Self {
        let t_k = celsius_to_kelvin(mean_temp_c);
        let dynamic_viscosity = sutherland_viscosity(t_k);
        let conductivity = 1.5207e-11 * t_k.powi(3) - 4.8574e-8 * t_k.powi(2) + 1.0184e-4 * t_k
            - 3.9333e-4;
        let t = mean_temp_c;
        let prandtl = -2.1415e-12 * t.powi(4) + 1.6785e-9 * t.powi(3) + 4.8260e-8 * t.powi(2)
            - 2.4939e-4 * t
            + 7.3506e-1;
        // 이상기체, 101.3 kPa
        let density = 101.3 / (0.287 * t_k);
        Self {
            dynamic_viscosity,
            conductivity,
            prandtl,
            density,
            diffusivity: conductivity / (cp * density),
            kinematic_viscosity: dynamic_viscosity / density,
        }
    }
}

fn sutherland_viscosity(t_k: f64) -> f64 {
    let t0 = 273.0;
    let mu0 = 1.71e-5;
    let s = 110.4;
    mu0 * (t_k / t0).powf(1.5) * (t0 + s) / (t_k + s)
}
