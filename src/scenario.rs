//! 계산 시나리오. 집열기 형상과 한 시간 간격의 경계값을 TOML로 읽는다.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::air::humid_air::humidity_ratio_from_rh;
use crate::bipvt::{CollectorStepInput, ChannelGeometry, GeometryError};

/// 시나리오 로드 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ScenarioError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 파싱 오류
    Parse(toml::de::Error),
    /// 형상 입력 오류
    Geometry(GeometryError),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::Io(e) => write!(f, "시나리오 파일 입출력 오류: {e}"),
            ScenarioError::Parse(e) => write!(f, "시나리오 파싱 오류: {e}"),
            ScenarioError::Geometry(e) => write!(f, "시나리오 형상 오류: {e}"),
        }
    }
}

impl std::error::Error for ScenarioError {}

impl From<std::io::Error> for ScenarioError {
    fn from(value: std::io::Error) -> Self {
        ScenarioError::Io(value)
    }
}

impl From<toml::de::Error> for ScenarioError {
    fn from(value: toml::de::Error) -> Self {
        ScenarioError::Parse(value)
    }
}

impl From<GeometryError> for ScenarioError {
    fn from(value: GeometryError) -> Self {
        ScenarioError::Geometry(value)
    }
}

/// 집열기 한 대와 한 시간 간격의 외부 조건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub geometry: ChannelGeometry,
    pub step: CollectorStepInput,
    /// 주어지면 입구 습도비를 상대습도 [%]로부터 다시 계산한다.
    pub inlet_relative_humidity_pct: Option<f64>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::demo()
    }
}

impl Scenario {
    /// 1 m × 2 m 수직 집열기, 법선 입사 1000 W/m², 목표 30 °C 가열.
    pub fn demo() -> Self {
        Self {
            name: "BIPVT 데모".to_string(),
            geometry: ChannelGeometry::default(),
            step: CollectorStepInput::default(),
            inlet_relative_humidity_pct: None,
        }
    }

    /// 상대습도 입력을 습도비로 바꾸고 형상을 검증한다.
    fn resolve(mut self) -> Result<Self, ScenarioError> {
        if let Some(rh) = self.inlet_relative_humidity_pct {
            let state = humidity_ratio_from_rh(
                self.step.inlet_temp_c,
                rh,
                self.step.barometric_pressure_kpa,
            );
            self.step.inlet_humidity_ratio = state.humidity_ratio;
        }
        self.geometry.validate()?;
        Ok(self)
    }
}

/// TOML 문자열에서 시나리오를 읽는다.
pub fn parse_scenario(content: &str) -> Result<Scenario, ScenarioError> {
    let scenario: Scenario = toml::from_str(content)?;
    scenario.resolve()
}

/// 시나리오 파일을 읽는다.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
    let content = fs::read_to_string(path)?;
    parse_scenario(&content)
}
