/// 표준 대기압 [kPa]
pub const STANDARD_PRESSURE_KPA: f64 = 101.325;

const CP_DRY_AIR: f64 = 1.00484e3; // [J/kg·K]
const CP_VAPOR: f64 = 1.85895e3; // [J/kg·K]
const LATENT_HEAT_0C: f64 = 2.50094e6; // [J/kg]
const MIN_HUMIDITY_RATIO: f64 = 1.0e-5;

/// 습도비 계산 결과.
#[derive(Debug, Clone)]
pub struct HumidAirState {
    /// 상대습도 [%]
    pub relative_humidity_pct: f64,
    /// 습도비 [kg수증기/kg건공기]
    pub humidity_ratio: f64,
    /// 수증기 분압 [kPa]
    pub vapor_pressure_kpa: f64,
}

/// 건구온도와 상대습도로 습도비를 근사 계산한다.
///
/// Tetens 식으로 포화수증기압을 추정한 후, W = 0.622 * Pv / (P - Pv) 를 사용한다.
pub fn humidity_ratio_from_rh(
    dry_bulb_c: f64,
    relative_humidity_pct: f64,
    total_pressure_kpa: f64,
) -> HumidAirState {
    let rh = (relative_humidity_pct / 100.0).clamp(0.0, 1.0);
    let p_sat = saturation_pressure_tetens_kpa(dry_bulb_c);
    let pv = rh * p_sat;
    let w = 0.622 * pv / (total_pressure_kpa.max(pv + 1e-6) - pv);
    HumidAirState {
        relative_humidity_pct: rh * 100.0,
        humidity_ratio: w,
        vapor_pressure_kpa: pv,
    }
}

/// 습도비로부터 습공기 정압비열 [J/kg·K]을 구한다.
pub fn specific_heat_from_humidity_ratio(humidity_ratio: f64) -> f64 {
    CP_DRY_AIR + humidity_ratio * CP_VAPOR
}

/// 건구온도(°C)와 습도비로 습공기 비엔탈피 [J/kg]를 구한다.
pub fn enthalpy(dry_bulb_c: f64, humidity_ratio: f64) -> f64 {
    let w = humidity_ratio.max(MIN_HUMIDITY_RATIO);
    CP_DRY_AIR * dry_bulb_c + w * (LATENT_HEAT_0C + CP_VAPOR * dry_bulb_c)
}

/// 습도비와 전압(kPa)으로 노점온도(°C)를 구한다. Tetens 식의 역함수를 사용한다.
pub fn dew_point_c(humidity_ratio: f64, total_pressure_kpa: f64) -> f64 {
    let w = humidity_ratio.max(MIN_HUMIDITY_RATIO);
    let pv = total_pressure_kpa * w / (0.622 + w);
    let alpha = (pv / 0.61078).ln();
    237.3 * alpha / (17.27 - alpha)
}

/// Tetens: Psat(kPa) = 0.61078 * exp(17.27*T / (T+237.3))
pub fn saturation_pressure_tetens_kpa(t_c: f64) -> f64 {
    0.61078 * (17.27 * t_c / (t_c + 237.3)).exp()
}
