//! BIPVT 공기 채널 집열기 열해석 로직을 라이브러리로 분리하여 CLI 외의 호출자도 쓸 수 있게 한다.

pub mod air;
pub mod app;
pub mod bipvt;
pub mod config;
pub mod scenario;
pub mod ui_cli;
pub mod units;
