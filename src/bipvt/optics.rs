//! 커버 유리의 입사각 광학. 투과-흡수곱(τα)과 입사각 보정계수(IAM).
//!
//! τα(θ) = exp(-K·L / cos θr) · (1 - ½(r∥ + r⊥)), θr은 스넬 법칙의 굴절각.

use std::f64::consts::FRAC_PI_2;

/// θ = 0 에서 프레넬 항의 0/0 을 피하기 위한 대체 입사각 [rad]
const NORMAL_INCIDENCE_EPS: f64 = 1.0e-9;

/// 90° 이상(면 뒤쪽)의 입사는 이 각도로 클램프한다. [rad]
pub const MAX_INCIDENCE_RAD: f64 = FRAC_PI_2 - 1.0e-3;

/// 커버 유리(두께, 굴절률, 소광계수)의 광학 특성.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlazingOptics {
    pub thickness_m: f64,
    pub refractive_index: f64,
    pub extinction_coeff: f64,
}

impl GlazingOptics {
    /// 입사각(rad)에서의 τα.
    pub fn trans_abs(&self, angle_rad: f64) -> f64 {
        glazing_transmittance_absorptance(
            angle_rad,
            self.thickness_m,
            self.refractive_index,
            self.extinction_coeff,
        )
    }

    /// 입사각(rad)에서의 IAM.
    pub fn incidence_angle_modifier(&self, angle_rad: f64) -> f64 {
        incidence_angle_modifier(
            angle_rad,
            self.thickness_m,
            self.refractive_index,
            self.extinction_coeff,
        )
    }
}

/// 유리/공기 경계의 투과-흡수곱. 투과된 복사는 모두 흡수된다고 본다.
///
/// 음수 각도는 절댓값으로, 90° 이상은 [`MAX_INCIDENCE_RAD`]로 클램프한다.
pub fn glazing_transmittance_absorptance(
    angle_rad: f64,
    thickness_m: f64,
    refractive_index: f64,
    extinction_coeff: f64,
) -> f64 {
    let mut theta = angle_rad.abs().min(MAX_INCIDENCE_RAD);
    if theta == 0.0 {
        theta = NORMAL_INCIDENCE_EPS;
    }
    let theta_r = (theta.sin() / refractive_index).asin();

    let absorption = (-extinction_coeff * thickness_m / theta_r.cos()).exp();
    let r_perp = (theta_r - theta).sin().powi(2) / (theta_r + theta).sin().powi(2);
    let r_par = (theta_r - theta).tan().powi(2) / (theta_r + theta).tan().powi(2);
    absorption * (1.0 - 0.5 * (r_perp + r_par))
}

/// 수직입사 대비 비수직입사 τα 보정계수. `angle = 0` 이면 정확히 1.0 이다.
pub fn incidence_angle_modifier(
    angle_rad: f64,
    thickness_m: f64,
    refractive_index: f64,
    extinction_coeff: f64,
) -> f64 {
    let normal =
        glazing_transmittance_absorptance(0.0, thickness_m, refractive_index, extinction_coeff);
    glazing_transmittance_absorptance(angle_rad, thickness_m, refractive_index, extinction_coeff)
        / normal
}

/// 천공 산란일사의 등가 입사각 [rad]. Brandemuehl & Beckman.
pub fn sky_diffuse_equivalent_angle(tilt_deg: f64) -> f64 {
    (59.7 - 0.1388 * tilt_deg + 0.001497 * tilt_deg.powi(2)).to_radians()
}

/// 지면 반사일사의 등가 입사각 [rad]. Brandemuehl & Beckman.
pub fn ground_diffuse_equivalent_angle(tilt_deg: f64) -> f64 {
    (90.0 - 0.5788 * tilt_deg + 0.002693 * tilt_deg.powi(2)).to_radians()
}
