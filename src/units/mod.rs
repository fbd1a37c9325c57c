//! 단위 정의 및 변환 모듈 모음.

pub mod heat_transfer;
pub mod temperature;

pub use heat_transfer::{convert_heat_transfer, HeatTransferUnit};
pub use temperature::{celsius_to_kelvin, convert_temperature, kelvin_to_celsius, TemperatureUnit};
