use kb3d::Sign;
use kb3d::resolution::coordination::{
    break_symmetry, eps_line, horizontal_coordination, vertical_coordination,
};

fn neg3(v: [f64; 3]) -> [f64; 3] {
    [-v[0], -v[1], -v[2]]
}

#[test]
fn vertical_sign_follows_predicted_relative_altitude() {
    let s = [1_852.0, 18_520.0, 500.0];
    let v = [0.0, -293.2, -7.62];
    // 500 m above, 245 m lost by the time separation is lost: still above.
    assert_eq!(vertical_coordination(&s, &v, 32.2), Sign::Positive);
    // Crossed through by then.
    assert_eq!(vertical_coordination(&s, &v, 80.0), Sign::Negative);
    // Predicted co-altitude falls back on the current relative altitude.
    let level_off = [0.0, -293.2, -8.0];
    assert_eq!(vertical_coordination(&s, &level_off, 62.5), Sign::Positive);
}

#[test]
fn vertical_sign_is_complementary_between_aircraft() {
    let cases = [
        ([1_852.0, 18_520.0, 500.0], [0.0, -293.2, -7.62], 32.2),
        ([-5_000.0, 3_000.0, -120.0], [80.0, -10.0, 2.0], 10.0),
        // Perfectly level and co-altitude: the positional tie-break decides.
        ([-5_000.0, 3_000.0, 0.0], [80.0, -10.0, 0.0], 10.0),
        ([0.0, -4_000.0, 0.0], [0.0, 150.0, 0.0], 5.0),
    ];
    for (s, v, t) in cases {
        let own = vertical_coordination(&s, &v, t);
        let intruder = vertical_coordination(&neg3(s), &neg3(v), t);
        assert_eq!(own, -intruder, "s={s:?} v={v:?}");
    }
}

#[test]
fn break_symmetry_prefers_negative_x_then_negative_y() {
    assert_eq!(break_symmetry(-1.0, 5.0), Sign::Positive);
    assert_eq!(break_symmetry(1.0, -5.0), Sign::Negative);
    assert_eq!(break_symmetry(0.0, -1.0), Sign::Positive);
    assert_eq!(break_symmetry(0.0, 1.0), Sign::Negative);
    for (sx, sy) in [(3.0, 4.0), (-2.0, 0.0), (0.0, 7.0), (0.0, -7.0)] {
        assert_eq!(break_symmetry(sx, sy), -break_symmetry(-sx, -sy));
    }
}

#[test]
fn horizontal_sign_is_shared_between_aircraft() {
    let s = [-20_000.0, 10_500.0];
    let v = [200.0, -100.0];
    let own = horizontal_coordination(&s, &v);
    let intruder = horizontal_coordination(&[-s[0], -s[1]], &[-v[0], -v[1]]);
    assert_eq!(own, Sign::Positive);
    assert_eq!(own, intruder);
}

#[test]
fn eps_line_matches_horizontal_sign_when_approaching() {
    let s = [-20_000.0, 10_500.0];
    for v in [[200.0, -100.0], [300.0, 10.0], [50.0, -400.0]] {
        assert!(s[0] * v[0] + s[1] * v[1] < 0.0);
        assert_eq!(eps_line(&s, &v), horizontal_coordination(&s, &v));
        // Scaling along the line keeps the side.
        assert_eq!(eps_line(&s, &v), eps_line(&s, &[-2.0 * v[0], -2.0 * v[1]]));
    }
}
