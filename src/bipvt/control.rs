//! 운전 모드 제어. 스케줄, 목표온도-입구온도 차, 입사 일사로 가열/냉각/정지를 정한다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bipvt::heat_gain::ConditioningMode;

/// 집열기 운전 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingMode {
    /// 계산하지 않음. 열량 0, 전량 바이패스, 출구 = 입구
    Idle,
    Heating,
    Cooling,
}

impl OperatingMode {
    /// 열취득 계산에 넘길 공조 방향. 정지 상태면 `None`.
    pub fn conditioning(self) -> Option<ConditioningMode> {
        match self {
            OperatingMode::Idle => None,
            OperatingMode::Heating => Some(ConditioningMode::Heating),
            OperatingMode::Cooling => Some(ConditioningMode::Cooling),
        }
    }
}

/// 모드 판정 임계값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// 주간으로 보는 최소 입사 일사 [W/m²]
    pub min_irradiance: f64,
    /// (목표 - 입구)가 이 값보다 크면 가열 [°C]. 음수면 약간 넘는 목표도 허용한다.
    pub heating_margin: f64,
    /// (입구 - 목표)가 이 값보다 크면 냉각 [°C]
    pub cooling_margin: f64,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            min_irradiance: 0.3,
            heating_margin: -1.0,
            cooling_margin: 0.1,
        }
    }
}

/// 모드 판정 입력.
#[derive(Debug, Clone, Copy)]
pub struct ControlInput {
    pub schedule_active: bool,
    pub setpoint_c: f64,
    pub inlet_temp_c: f64,
    /// 입사 일사 합계 [W/m²]
    pub incident_solar: f64,
    /// 전체 공기 질량유량 [kg/s]
    pub mass_flow: f64,
}

/// 가열/냉각 유효 여부와 바이패스 댐퍼 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFlags {
    pub heating_useful: bool,
    pub cooling_useful: bool,
    /// 댐퍼가 닫혀 공기가 채널을 지나는 상태
    pub bypass_damper_off: bool,
}

/// 주간에는 가열을, 야간에는 복사 냉각을 우선 검토한다.
pub fn control_flags(input: &ControlInput, settings: &ControlSettings) -> ControlFlags {
    if input.incident_solar > settings.min_irradiance {
        let heating = input.setpoint_c > input.inlet_temp_c;
        ControlFlags {
            heating_useful: heating,
            cooling_useful: !heating,
            bypass_damper_off: heating,
        }
    } else {
        let cooling = input.setpoint_c < input.inlet_temp_c;
        ControlFlags {
            heating_useful: !cooling,
            cooling_useful: cooling,
            bypass_damper_off: cooling,
        }
    }
}

/// 운전 모드를 판정한다.
pub fn decide_mode(input: &ControlInput, settings: &ControlSettings) -> OperatingMode {
    if !input.schedule_active {
        return OperatingMode::Idle;
    }
    let flags = control_flags(input, settings);
    let mode = if input.setpoint_c - input.inlet_temp_c > settings.heating_margin {
        OperatingMode::Heating
    } else if flags.cooling_useful
        && flags.bypass_damper_off
        && input.mass_flow > 0.0
        && input.inlet_temp_c - input.setpoint_c > settings.cooling_margin
    {
        OperatingMode::Cooling
    } else {
        OperatingMode::Idle
    };
    debug!(?mode, ?flags, "BIPVT 운전 모드 판정");
    mode
}
