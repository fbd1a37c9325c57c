//! 3x3 열수지 선형계. 부분 피벗팅 가우스 소거 + 후진대입.
//!
//! 피벗이 [`PIVOT_FLOOR`]보다 작으면 실패 대신 그 값으로 대체한다.
//! 시뮬레이션 제어 루프를 멈추지 않기 위해 특이 행렬에도 유한한 결정적 해를 낸다.

use std::ops::{Index, IndexMut};

/// 피벗 하한
pub const PIVOT_FLOOR: f64 = 1.0e-10;

/// 3성분 벡터 (스택 할당).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3(pub [f64; 3]);

/// 행 우선 3x3 행렬 (스택 할당).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Matrix3(pub [[f64; 3]; 3]);

impl Index<usize> for Vector3 {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl Index<(usize, usize)> for Matrix3 {
    type Output = f64;
    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.0[r][c]
    }
}

impl IndexMut<(usize, usize)> for Matrix3 {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.0[r][c]
    }
}

impl Matrix3 {
    /// 행렬-벡터 곱. 잔차 확인용.
    pub fn mul_vec(&self, x: &Vector3) -> Vector3 {
        let mut out = Vector3::default();
        for r in 0..3 {
            out[r] = (0..3).map(|c| self[(r, c)] * x[c]).sum::<f64>();
        }
        out
    }
}

fn floor_pivot(p: f64) -> f64 {
    if p.abs() < PIVOT_FLOOR {
        PIVOT_FLOOR
    } else {
        p
    }
}

/// A·x = b 를 푼다. 입력은 값으로 받아 내부에서 소거한다.
pub fn solve(mut a: Matrix3, mut b: Vector3) -> Vector3 {
    const N: usize = 3;

    for col in 0..N - 1 {
        // 절댓값 최대 행을 피벗으로
        let pivot_row = (col..N)
            .max_by(|&i, &j| a[(i, col)].abs().total_cmp(&a[(j, col)].abs()))
            .unwrap_or(col);
        if pivot_row != col {
            a.0.swap(col, pivot_row);
            b.0.swap(col, pivot_row);
        }
        let pivot = floor_pivot(a[(col, col)]);
        a[(col, col)] = pivot;
        for row in col + 1..N {
            let factor = a[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[(row, k)] -= factor * a[(col, k)];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Vector3::default();
    for row in (0..N).rev() {
        let tail: f64 = (row + 1..N).map(|k| a[(row, k)] * x[k]).sum();
        x[row] = (b[row] - tail) / floor_pivot(a[(row, row)]);
    }
    x
}
