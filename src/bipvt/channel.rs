//! 채널 유동 방향 1차원 에너지 적분.
//!
//! 유량이 있으면 dT/dx = a·T + b 의 해석해로 평균/출구 온도를 구하고,
//! 정체 상태에서는 흡수층 표면 에너지 수지로 평균 온도를 직접 구한다.

const SMALL: f64 = 1.0e-10;

/// 채널 공기 온도 결과 [°C].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelTemperatures {
    /// 채널 길이 평균 공기온도
    pub average_c: f64,
    /// 채널 출구 공기온도 (정체 시 입구온도와 같다)
    pub outlet_c: f64,
}

/// 유동이 있는 채널의 적분 입력.
#[derive(Debug, Clone, Copy)]
pub struct ForcedChannelInput {
    pub width_m: f64,
    pub length_m: f64,
    /// 바이패스 후 채널 질량유량 [kg/s]
    pub mass_flow: f64,
    /// 공기 정압비열 [J/kg·K]
    pub cp: f64,
    /// 공기 ↔ 흡수층 대류계수
    pub h_absorber: f64,
    /// 공기 ↔ 건물 표면 대류계수
    pub h_surface: f64,
    pub t_absorber_c: f64,
    pub t_surface_c: f64,
    pub t_inlet_c: f64,
}

/// T(x) = (Tin + b/a)·exp(a·x) − b/a, 평균은 [0, L] 적분평균.
pub fn integrate_forced(input: &ForcedChannelInput) -> ChannelTemperatures {
    let scale = input.width_m / (input.mass_flow.max(SMALL) * input.cp);
    let a = -scale * (input.h_absorber + input.h_surface);
    let b = scale * (input.h_absorber * input.t_absorber_c + input.h_surface * input.t_surface_c);
    if a.abs() < SMALL {
        // 대류가 없으면 공기는 입구온도 그대로
        return ChannelTemperatures {
            average_c: input.t_inlet_c,
            outlet_c: input.t_inlet_c,
        };
    }
    let t_eq = -b / a;
    let al = a * input.length_m;
    let offset = input.t_inlet_c - t_eq;
    ChannelTemperatures {
        average_c: offset * al.exp_m1() / al + t_eq,
        outlet_c: offset * al.exp() + t_eq,
    }
}

/// 정체 채널의 평균 공기온도.
///
/// `absorber_net_gain`은 대류(공기) 항을 뺀 흡수층 측 순열량 [W/m²]이며,
/// 공기는 건물 표면 대류계수로 그 열을 받는다고 본다. 출구온도는 입구온도로 정의한다.
pub fn stagnation(
    absorber_net_gain: f64,
    h_surface: f64,
    t_surface_c: f64,
    t_inlet_c: f64,
) -> ChannelTemperatures {
    let h = if h_surface.abs() < SMALL { SMALL } else { h_surface };
    ChannelTemperatures {
        average_c: t_surface_c + absorber_net_gain / h,
        outlet_c: t_inlet_c,
    }
}
