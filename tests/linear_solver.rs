use bipvt_collector::bipvt::linear_solver::{solve, Matrix3, Vector3};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

#[test]
fn diagonally_dominant_system_reproduces_solution() {
    let a = Matrix3([[4.0, 1.0, 0.0], [1.0, 5.0, 2.0], [0.0, 2.0, 6.0]]);
    let expected = Vector3([1.0, -2.0, 3.0]);
    let b = a.mul_vec(&expected);
    let x = solve(a, b);
    for i in 0..3 {
        assert_close(&format!("x[{i}]"), x[i], expected[i], 1e-6);
    }
}

#[test]
fn zero_leading_entry_needs_row_swap() {
    let a = Matrix3([[0.0, 2.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, 3.0]]);
    let b = Vector3([7.0, 1.0, 9.0]);
    let x = solve(a, b);
    assert_close("x0", x[0], 1.0, 1e-9);
    assert_close("x1", x[1], 2.0, 1e-9);
    assert_close("x2", x[2], 3.0, 1e-9);
}

#[test]
fn heat_balance_shaped_system() {
    // 유리/PV/흡수층 열수지와 같은 부호 구조
    let (h_out, hgp, hpa, h_in) = (12.0, 227.0, 256.0, 15.0);
    let a = Matrix3([
        [h_out + hgp, -hgp, 0.0],
        [hgp, -hpa - hgp, hpa],
        [0.0, hpa, -hpa - h_in],
    ]);
    let expected = Vector3([40.0, 42.0, 41.0]);
    let x = solve(a, a.mul_vec(&expected));
    for i in 0..3 {
        assert_close(&format!("T[{i}]"), x[i], expected[i], 1e-6);
    }
}

#[test]
fn singular_matrix_stays_finite() {
    let a = Matrix3([[0.0; 3]; 3]);
    let x = solve(a, Vector3([1.0, 1.0, 1.0]));
    for i in 0..3 {
        assert!(x[i].is_finite(), "x[{i}] = {}", x[i]);
    }
}
