//! BIPVT(건물일체형 태양광·열) 공기 채널 열해석 모듈 모음.
//! 입사각 광학, 열전달계수 추정, 3x3 열수지 선형해, 채널 유동 에너지 적분,
//! 완화 고정점 반복, 운전 모드 제어, 집열기 인스턴스로 구성한다.

pub mod channel;
pub mod coefficients;
pub mod collector;
pub mod control;
pub mod geometry;
pub mod heat_gain;
pub mod linear_solver;
pub mod optics;

pub use collector::{
    BipvtCollector, CollectorOutput, CollectorReport, CollectorStepInput, OtherSideConditions,
    OutletNode,
};
pub use control::{ControlSettings, OperatingMode};
pub use geometry::{ChannelGeometry, GeometryError};
pub use heat_gain::{
    evaluate, BoundaryConditions, ConditioningMode, HeatGainResult, SolverSettings,
};
