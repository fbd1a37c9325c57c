use tracing::info;

use crate::bipvt::{BipvtCollector, CollectorOutput, GeometryError};
use crate::config::{Config, ConfigError};
use crate::scenario::{Scenario, ScenarioError};
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(ConfigError),
    /// 시나리오 로드 오류
    Scenario(ScenarioError),
    /// 집열기 형상 오류
    Geometry(GeometryError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "입출력 오류: {e}"),
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Scenario(e) => write!(f, "시나리오 오류: {e}"),
            AppError::Geometry(e) => write!(f, "형상 오류: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<ScenarioError> for AppError {
    fn from(value: ScenarioError) -> Self {
        AppError::Scenario(value)
    }
}

impl From<GeometryError> for AppError {
    fn from(value: GeometryError) -> Self {
        AppError::Geometry(value)
    }
}

/// 시나리오를 `steps`번 연속 계산한다. 매 간격은 직전 간격의 집열기 온도에서 시작한다.
pub fn simulate_scenario(
    config: &Config,
    scenario: &Scenario,
    steps: usize,
) -> Result<Vec<CollectorOutput>, AppError> {
    let mut collector = BipvtCollector::new(
        scenario.name.clone(),
        scenario.geometry.clone(),
        config.solver.clone(),
        config.control.clone(),
    )?;
    let outputs = (0..steps.max(1))
        .map(|_| collector.simulate(&scenario.step))
        .collect::<Vec<_>>();
    info!(
        collector = %scenario.name,
        steps = outputs.len(),
        last_temp = collector.last_collector_temp_c(),
        "시나리오 계산 완료"
    );
    Ok(outputs)
}

/// CLI 애플리케이션을 실행한다.
pub fn run(config: &Config, scenario: &Scenario, steps: usize) -> Result<(), AppError> {
    ui_cli::print_header(scenario);
    for (i, output) in simulate_scenario(config, scenario, steps)?.iter().enumerate() {
        ui_cli::print_step(i + 1, output, &config.output_units);
    }
    Ok(())
}
