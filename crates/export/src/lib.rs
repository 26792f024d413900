//! Export helpers for CSV and JSON encounter artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// One-line-per-encounter CSV summary.
pub mod summary {
    use std::io::{self, Write};

    use csv::WriterBuilder;

    const HEADER: [&str; 13] = [
        "encounter",
        "distance_nm",
        "course_deg",
        "conflict",
        "violation",
        "time2los_s",
        "duration_s",
        "mode",
        "vs_only_fpm",
        "gs_only_kn",
        "trk_only_deg",
        "opt_trk_deg",
        "opt_gs_kn",
    ];

    fn write_fields<const N: usize>(writer: &mut dyn Write, fields: [&str; N]) -> io::Result<()> {
        let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
        csv.write_record(fields)?;
        csv.flush()
    }

    /// Write the summary CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        write_fields(writer, HEADER)
    }

    /// CSV row for a single encounter. Missing values are written as empty cells.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub encounter: &'a str,
        pub distance_nm: f64,
        pub course_deg: f64,
        pub conflict: bool,
        pub violation: bool,
        pub time2los_s: Option<f64>,
        pub duration_s: Option<f64>,
        pub mode: &'a str,
        pub vs_only_fpm: Option<f64>,
        pub gs_only_kn: Option<f64>,
        pub trk_only_deg: Option<f64>,
        pub opt_trk_deg: Option<f64>,
        pub opt_gs_kn: Option<f64>,
    }

    fn cell(value: Option<f64>, precision: usize) -> String {
        value
            .map(|v| format!("{v:.precision$}"))
            .unwrap_or_default()
    }

    impl<'a> Record<'a> {
        /// Serialize the record to CSV, matching the header ordering. Names are quoted as needed.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let distance = format!("{:.3}", self.distance_nm);
            let course = format!("{:.1}", self.course_deg);
            let time2los = cell(self.time2los_s, 2);
            let duration = cell(self.duration_s, 2);
            let vs = cell(self.vs_only_fpm, 1);
            let gs = cell(self.gs_only_kn, 1);
            let trk = cell(self.trk_only_deg, 1);
            let opt_trk = cell(self.opt_trk_deg, 1);
            let opt_gs = cell(self.opt_gs_kn, 1);
            write_fields(
                writer,
                [
                    self.encounter,
                    distance.as_str(),
                    course.as_str(),
                    if self.conflict { "true" } else { "false" },
                    if self.violation { "true" } else { "false" },
                    time2los.as_str(),
                    duration.as_str(),
                    self.mode,
                    vs.as_str(),
                    gs.as_str(),
                    trk.as_str(),
                    opt_trk.as_str(),
                    opt_gs.as_str(),
                ],
            )
        }
    }
}

/// Pretty JSON report wrapping any serializable per-encounter result.
pub mod report {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::io::{self, Write};

    #[derive(Serialize)]
    struct Envelope<'a, T: Serialize> {
        generator: &'a str,
        version: &'a str,
        encounters: &'a [T],
    }

    /// Write `encounters` as a single JSON document.
    pub fn write_report<T: Serialize>(
        writer: &mut dyn Write,
        version: &str,
        encounters: &[T],
    ) -> io::Result<()> {
        let envelope = Envelope {
            generator: "kb3d",
            version,
            encounters,
        };
        to_writer_pretty(&mut *writer, &envelope)?;
        writeln!(writer)
    }
}
