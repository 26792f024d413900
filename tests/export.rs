use csv::Reader;
use kb3d::export::{report, summary};
use serde::Serialize;

#[test]
fn summary_rows_leave_missing_values_empty() {
    let mut buffer = Vec::new();
    summary::write_header(&mut buffer).expect("header");
    summary::Record {
        encounter: "pair, one",
        distance_nm: 22.630_88,
        course_deg: 89.966,
        conflict: true,
        violation: false,
        time2los_s: Some(131.116),
        duration_s: Some(19.57),
        mode: "coordinated",
        vs_only_fpm: Some(-944.02),
        gs_only_kn: None,
        trk_only_deg: Some(97.415),
        opt_trk_deg: None,
        opt_gs_kn: None,
    }
    .write_to(&mut buffer)
    .expect("row");

    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[1],
        "\"pair, one\",22.631,90.0,true,false,131.12,19.57,coordinated,-944.0,,97.4,,"
    );

    let mut rdr = Reader::from_reader(text.as_bytes());
    let headers = rdr.headers().expect("headers").clone();
    assert_eq!(headers.len(), 13);
    let rec = rdr.records().next().expect("row").expect("record");
    assert_eq!(rec.len(), headers.len());
    assert_eq!(&rec[0], "pair, one");
    assert_eq!(rec[5].parse::<f64>().expect("time2los"), 131.12);
    assert_eq!(&rec[9], "");
}

#[derive(Serialize)]
struct Row {
    name: &'static str,
    value: f64,
}

#[test]
fn json_report_wraps_encounters() {
    let mut buffer = Vec::new();
    report::write_report(
        &mut buffer,
        "9.9.9",
        &[Row {
            name: "a",
            value: 1.5,
        }],
    )
    .expect("report");

    let json: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
    assert_eq!(json["generator"], "kb3d");
    assert_eq!(json["version"], "9.9.9");
    assert_eq!(json["encounters"][0]["name"], "a");
    assert_eq!(json["encounters"][0]["value"], 1.5);
}
