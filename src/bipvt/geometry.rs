use serde::{Deserialize, Serialize};

/// 집열기 형상/물성 검증 오류를 표현한다.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// 입력값이 물리적으로 성립하지 않는 경우
    InvalidInput(&'static str),
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::InvalidInput(msg) => write!(f, "형상 입력 오류: {msg}"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// BIPVT 패널과 공기 채널의 형상 및 광학/열 물성. 집열기 인스턴스마다 고정이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelGeometry {
    /// 패널 폭 [m]
    pub width_m: f64,
    /// 패널 높이(유동 방향 길이) [m]
    pub height_m: f64,
    /// 공기 채널 깊이 [m]
    pub channel_depth_m: f64,
    /// 커버 유리 두께 [m]
    pub glass_thickness_m: f64,
    /// 커버 유리 굴절률 [-]
    pub glass_refractive_index: f64,
    /// 커버 유리 소광계수 [1/m]
    pub glass_extinction_coeff: f64,
    /// 백킹(흡수층) 방사율
    pub backing_emissivity: f64,
    /// 건물 표면 방사율
    pub building_surface_emissivity: f64,
    /// 커버 유리 방사율
    pub glass_emissivity: f64,
    /// 유리-PV 셀 층 열저항 [m²·K/W]
    pub glass_to_pv_resistance: f64,
    /// PV 셀-백킹 층 열저항 [m²·K/W]
    pub pv_to_backing_resistance: f64,
    /// PV 모듈 내 셀 면적 비율 [-]
    pub pv_cell_area_fraction: f64,
    /// 벽체 대비 PV 모듈 면적 비율 [-]
    pub pv_module_area_fraction: f64,
    /// 셀 사이 백킹 재료의 수직입사 τα
    pub backing_trans_abs: f64,
    /// 모듈 밖 클래딩의 수직입사 τα
    pub cladding_trans_abs: f64,
    /// PV 셀의 수직입사 τα
    pub pv_cell_trans_abs: f64,
    /// 표면 경사각 [deg], 0 = 수평, 90 = 수직
    pub tilt_deg: f64,
}

impl Default for ChannelGeometry {
    fn default() -> Self {
        Self {
            width_m: 1.0,
            height_m: 2.0,
            channel_depth_m: 0.05,
            glass_thickness_m: 0.002,
            glass_refractive_index: 1.526,
            glass_extinction_coeff: 4.0,
            backing_emissivity: 0.9,
            building_surface_emissivity: 0.87,
            glass_emissivity: 0.85,
            glass_to_pv_resistance: 0.0044,
            pv_to_backing_resistance: 0.0039,
            pv_cell_area_fraction: 0.9,
            pv_module_area_fraction: 0.85,
            backing_trans_abs: 0.6,
            cladding_trans_abs: 0.85,
            pv_cell_trans_abs: 0.9,
            tilt_deg: 90.0,
        }
    }
}

impl ChannelGeometry {
    /// 벽체 전체 면적 [m²]
    pub fn wall_area(&self) -> f64 {
        self.width_m * self.height_m
    }

    /// PV 모듈 면적 [m²]
    pub fn pv_area(&self) -> f64 {
        self.wall_area() * self.pv_module_area_fraction
    }

    /// 채널 수력직경 [m]
    pub fn channel_hydraulic_diameter(&self) -> f64 {
        4.0 * self.width_m * self.channel_depth_m / (2.0 * (self.width_m + self.channel_depth_m))
    }

    /// 외표면 자연대류용 특성길이(패널 수력직경) [m]
    pub fn panel_hydraulic_diameter(&self) -> f64 {
        4.0 * self.width_m * self.height_m / (2.0 * (self.width_m + self.height_m))
    }

    /// 물리적으로 성립하지 않는 형상을 거부한다.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.width_m > 0.0) || !(self.height_m > 0.0) {
            return Err(GeometryError::InvalidInput(
                "패널 폭과 높이는 0보다 커야 합니다.",
            ));
        }
        if !(self.channel_depth_m > 0.0) {
            return Err(GeometryError::InvalidInput(
                "채널 깊이는 0보다 커야 합니다.",
            ));
        }
        if !(self.glass_thickness_m > 0.0) || !(self.glass_refractive_index >= 1.0) {
            return Err(GeometryError::InvalidInput(
                "유리 두께는 0보다 크고 굴절률은 1 이상이어야 합니다.",
            ));
        }
        if !(self.glass_extinction_coeff >= 0.0) {
            return Err(GeometryError::InvalidInput(
                "유리 소광계수는 음수일 수 없습니다.",
            ));
        }
        if !(self.glass_to_pv_resistance > 0.0) || !(self.pv_to_backing_resistance > 0.0) {
            return Err(GeometryError::InvalidInput(
                "층 열저항은 0보다 커야 합니다.",
            ));
        }
        let emissivities = [
            self.backing_emissivity,
            self.building_surface_emissivity,
            self.glass_emissivity,
        ];
        if emissivities.iter().any(|e| !(*e > 0.0 && *e <= 1.0)) {
            return Err(GeometryError::InvalidInput(
                "방사율은 0 초과 1 이하여야 합니다.",
            ));
        }
        let fractions = [
            self.pv_cell_area_fraction,
            self.pv_module_area_fraction,
            self.backing_trans_abs,
            self.cladding_trans_abs,
            self.pv_cell_trans_abs,
        ];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(GeometryError::InvalidInput(
                "면적 비율과 τα 값은 0~1 범위여야 합니다.",
            ));
        }
        if !(0.0..=180.0).contains(&self.tilt_deg) {
            return Err(GeometryError::InvalidInput(
                "경사각은 0~180° 범위여야 합니다.",
            ));
        }
        Ok(())
    }
}
