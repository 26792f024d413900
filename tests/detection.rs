use kb3d::detection::{Detector, ProtectedVolume, VolumeError};

const D: f64 = 9_260.0;
const H: f64 = 304.8;
const T: f64 = 300.0;

fn detector() -> Detector {
    Detector::new(ProtectedVolume::new(D, H, T).expect("valid volume"))
}

// Ownship north of the intruder, flying head-on and descending towards it.
fn head_on() -> ([f64; 3], [f64; 3]) {
    ([1_852.0, 18_520.0, 500.0], [0.0, -293.2, -7.62])
}

#[test]
fn head_on_encounter_is_a_conflict() {
    let (s, v) = head_on();
    let detection = detector().detect(&s, &v);
    assert!(detection.conflict);
    assert!(!detection.violation);

    let timing = detection.timing.expect("interval");
    assert!((timing.t_in - 32.22).abs() < 0.05, "t_in {}", timing.t_in);
    assert!((timing.t_out - 94.11).abs() < 0.05, "t_out {}", timing.t_out);
    assert!(timing.t_in <= timing.t_out);
    assert_eq!(timing.time2los, timing.t_in);
    assert!((timing.duration - (timing.t_out - timing.t_in)).abs() < 1e-9);
    assert!((timing.time2lhs - timing.t_in).abs() < 1e-9);
    let time2lvs = timing.time2lvs.expect("vertical crossing");
    assert!((time2lvs - (H - 500.0) / -7.62).abs() < 1e-9);
    assert!(time2lvs < timing.time2lhs);
}

#[test]
fn violation_starts_loss_at_zero() {
    let s = [2_000.0, -1_000.0, 100.0];
    let v = [-50.0, 20.0, 1.0];
    let detection = detector().detect(&s, &v);
    assert!(detection.violation);
    assert!(detection.conflict);

    let timing = detection.timing.expect("interval");
    assert!(timing.t_in <= 0.0);
    assert_eq!(timing.time2los, 0.0);
    assert!((timing.duration - timing.t_out).abs() < 1e-12);
}

#[test]
fn zero_relative_velocity_inside_lasts_the_whole_lookahead() {
    let detection = detector().detect(&[1_000.0, 1_000.0, 100.0], &[0.0; 3]);
    assert!(detection.violation);
    assert!(detection.conflict);
    let timing = detection.timing.expect("interval");
    assert_eq!(timing.t_in, 0.0);
    assert_eq!(timing.t_out, T);
}

#[test]
fn vertical_only_closure_inside_the_cylinder() {
    // Horizontally inside, 2000 m below and climbing at 10 m/s.
    let detection = detector().detect(&[0.0, 1_000.0, -2_000.0], &[0.0, 0.0, 10.0]);
    assert!(detection.conflict);
    assert!(!detection.violation);
    let timing = detection.timing.expect("interval");
    assert!((timing.t_in - (2_000.0 - H) / 10.0).abs() < 1e-9);
    assert!((timing.t_out - (2_000.0 + H) / 10.0).abs() < 1e-9);
    assert!(timing.t_in < timing.t_out);

    // Same geometry but moving away.
    let away = detector().detect(&[0.0, 1_000.0, -2_000.0], &[0.0, 0.0, -10.0]);
    assert!(!away.conflict);
    assert!(away.timing.is_none());
}

#[test]
fn diverging_traffic_is_clear() {
    let detection = detector().detect(&[0.0, 20_000.0, 0.0], &[0.0, 200.0, 0.0]);
    assert!(!detection.conflict);
    assert!(!detection.violation);
}

#[test]
fn miss_distance_beyond_d_has_no_interval() {
    let detection = detector().detect(&[20_000.0, 20_000.0, 0.0], &[0.0, -200.0, 0.0]);
    assert!(!detection.conflict);
    assert!(detection.timing.is_none());
}

#[test]
fn level_pair_outside_vertical_band_never_conflicts() {
    let detection = detector().detect(&[0.0, 20_000.0, 600.0], &[0.0, -200.0, 0.0]);
    assert!(!detection.conflict);
    let timing = detection.timing.expect("horizontal interval");
    assert_eq!(timing.time2lvs, None);

    let json: serde_json::Value = serde_json::to_value(detection).expect("serialize");
    assert_eq!(json["timing"]["time2lvs"], serde_json::Value::Null);
    assert!(json["timing"]["time2lhs"].as_f64().expect("finite") > 0.0);
}

#[test]
fn level_pair_inside_vertical_band_has_already_lost_vertical_separation() {
    let detection = detector().detect(&[0.0, 20_000.0, 100.0], &[0.0, -200.0, 0.0]);
    assert!(detection.conflict);
    let timing = detection.timing.expect("interval");
    assert_eq!(timing.time2lvs, Some(0.0));

    let json: serde_json::Value = serde_json::to_value(detection).expect("serialize");
    assert_eq!(json["timing"]["time2lvs"].as_f64(), Some(0.0));
}

#[test]
fn conflict_beyond_lookahead_is_ignored() {
    // Horizontal entry after about 450 s.
    let detection = detector().detect(&[0.0, 100_000.0, 0.0], &[0.0, -200.0, 0.0]);
    assert!(!detection.conflict);
    assert!(detection.timing.expect("interval").t_in > T);
}

#[test]
fn filter_only_removes_short_conflicts() {
    let (s, v) = head_on();
    let duration = detector()
        .detect(&s, &v)
        .timing
        .expect("interval")
        .duration;

    let mut filtered = detector();
    for filter in [0.0, 1.0, duration * 0.5, duration - 1e-6] {
        filtered.set_filter(filter).expect("valid filter");
        assert!(filtered.detect(&s, &v).conflict, "filter {filter}");
    }
    for filter in [duration, duration + 1.0, 1e6] {
        filtered.set_filter(filter).expect("valid filter");
        assert!(!filtered.detect(&s, &v).conflict, "filter {filter}");
    }
}

#[test]
fn invalid_parameters_are_rejected_without_side_effects() {
    assert_eq!(
        ProtectedVolume::new(0.0, H, T),
        Err(VolumeError::Horizontal(0.0))
    );
    assert_eq!(
        ProtectedVolume::new(D, -1.0, T),
        Err(VolumeError::Vertical(-1.0))
    );
    assert!(matches!(
        ProtectedVolume::new(D, H, f64::NAN),
        Err(VolumeError::Lookahead(_))
    ));

    let mut det = detector();
    assert_eq!(
        det.configure(D, H, T, -1.0),
        Err(VolumeError::Filter(-1.0))
    );
    assert_eq!(det.filter(), 0.0);
    assert_eq!(det.volume().d(), D);

    det.configure(2.0 * D, 2.0 * H, 2.0 * T, 5.0)
        .expect("valid configuration");
    assert_eq!(det.volume().h(), 2.0 * H);
    assert_eq!(det.filter(), 5.0);
}

#[test]
fn violation_check_uses_strict_bounds() {
    let det = detector();
    assert!(det.is_violating(&[0.0, 0.0, 0.0]));
    assert!(!det.is_violating(&[D, 0.0, 0.0]));
    assert!(!det.is_violating(&[0.0, 0.0, H]));
    assert!(det.is_violating(&[D - 1.0, 0.0, H - 1.0]));
}

#[test]
fn inside_and_separating_vertically_reports_entry_first() {
    let detection = detector().detect(&[100.0, 0.0, 100.0], &[0.0, 0.0, 5.0]);
    assert!(detection.violation);
    assert!(detection.conflict);

    let timing = detection.timing.expect("interval");
    assert!((timing.t_in - (-H - 100.0) / 5.0).abs() < 1e-9, "t_in {}", timing.t_in);
    assert!((timing.t_out - (H - 100.0) / 5.0).abs() < 1e-9, "t_out {}", timing.t_out);
    assert!(timing.t_in < 0.0 && timing.t_in < timing.t_out);
    assert_eq!(timing.time2los, 0.0);
    assert_eq!(timing.time2lhs, 0.0);
    assert_eq!(timing.time2lvs, Some(0.0));
    assert!((timing.duration - timing.t_out).abs() < 1e-12);
}

#[test]
fn vertical_only_boundaries() {
    // Exactly representable band and horizon so the boundary comparisons are exact.
    let det = Detector::new(ProtectedVolume::new(D, 300.0, 300.0).expect("valid volume"));
    let climbing = [0.0, 0.0, 1.0];

    // Reaching -H exactly at T is not a loss of separation.
    let grazing = det.detect(&[0.0, 1_000.0, -600.0], &climbing);
    assert!(!grazing.conflict);
    assert!(grazing.timing.is_none());

    // One metre closer and the band is entered just before T.
    let entering = det.detect(&[0.0, 1_000.0, -599.0], &climbing);
    assert!(entering.conflict);
    let timing = entering.timing.expect("interval");
    assert_eq!(timing.t_in, 299.0);
    assert_eq!(timing.t_out, 899.0);

    // Sitting exactly on the band edge is outside it.
    let on_edge = det.detect(&[0.0, 1_000.0, 300.0], &[0.0; 3]);
    assert!(!on_edge.violation);
    assert!(!on_edge.conflict);
    assert!(on_edge.timing.is_none());

    // On the edge and closing: the loss starts now.
    let closing = det.detect(&[0.0, 1_000.0, 300.0], &[0.0, 0.0, -1.0]);
    assert!(!closing.violation);
    assert!(closing.conflict);
    let timing = closing.timing.expect("interval");
    assert_eq!(timing.t_in, 0.0);
    assert_eq!(timing.t_out, 600.0);

    // On the edge and separating.
    assert!(!det.detect(&[0.0, 1_000.0, 300.0], &climbing).conflict);
}

#[test]
fn co_altitude_without_horizontal_motion() {
    let det = Detector::new(ProtectedVolume::new(D, 300.0, 300.0).expect("valid volume"));

    let holding = det.detect(&[0.0, 1_000.0, 0.0], &[0.0; 3]);
    assert!(holding.violation);
    assert!(holding.conflict);
    let timing = holding.timing.expect("interval");
    assert_eq!((timing.t_in, timing.t_out), (0.0, 300.0));

    let climbing = det.detect(&[0.0, 1_000.0, 0.0], &[0.0, 0.0, 5.0]);
    assert!(climbing.violation);
    let timing = climbing.timing.expect("interval");
    assert_eq!((timing.t_in, timing.t_out), (-60.0, 60.0));
    assert_eq!(timing.time2los, 0.0);

    let descending = det.detect(&[0.0, 1_000.0, 0.0], &[0.0, 0.0, -5.0]);
    let timing = descending.timing.expect("interval");
    assert_eq!((timing.t_in, timing.t_out), (-60.0, 60.0));
}
