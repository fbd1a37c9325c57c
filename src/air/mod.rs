//! 습공기 물성 및 채널 공기 전달물성 계산 모듈을 모아둔다.

pub mod humid_air;
pub mod properties;
