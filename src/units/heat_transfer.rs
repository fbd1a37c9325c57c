use serde::{Deserialize, Serialize};

/// 열전달계수(h) 단위. 내부 기준은 W/m²·K이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatTransferUnit {
    WPerSquareMeterK,
    BtuPerHourSquareFootF,
}

const BTU_H_FT2_F_IN_W_M2K: f64 = 5.678263;

impl HeatTransferUnit {
    /// 출력용 단위 기호.
    pub fn symbol(self) -> &'static str {
        match self {
            HeatTransferUnit::WPerSquareMeterK => "W/m²·K",
            HeatTransferUnit::BtuPerHourSquareFootF => "Btu/h·ft²·°F",
        }
    }
}

/// 열전달계수를 변환한다.
pub fn convert_heat_transfer(value: f64, from: HeatTransferUnit, to: HeatTransferUnit) -> f64 {
    let base = match from {
        HeatTransferUnit::WPerSquareMeterK => value,
        HeatTransferUnit::BtuPerHourSquareFootF => value * BTU_H_FT2_F_IN_W_M2K,
    };
    match to {
        HeatTransferUnit::WPerSquareMeterK => base,
        HeatTransferUnit::BtuPerHourSquareFootF => base / BTU_H_FT2_F_IN_W_M2K,
    }
}
