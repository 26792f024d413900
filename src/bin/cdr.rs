use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kb3d::cdr::{EncounterOutcome, run_encounter};
use kb3d::config::load_encounters;
use kb3d::export::{report, summary, writer_for_path};
use kb3d::resolution::ResolutionMode;

/// Run pairwise conflict detection and resolution on configured encounters.
#[derive(Parser, Debug)]
#[command(author, version, about = "KB3D conflict detection and resolution")]
struct Cli {
    /// Encounter file (TOML or YAML list) or directory of TOML files
    #[arg(long, default_value = "data/encounters")]
    encounters: PathBuf,

    /// Override the detection filter for every encounter (seconds)
    #[arg(long)]
    filter: Option<f64>,

    /// Write a JSON report (use '-' for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a CSV summary (use '-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Suppress the human-readable report
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut encounters = load_encounters(&cli.encounters)
        .with_context(|| format!("loading encounters from {}", cli.encounters.display()))?;
    if let Some(filter) = cli.filter {
        anyhow::ensure!(filter >= 0.0, "filter must be non-negative, got {filter}");
        for encounter in &mut encounters {
            encounter.separation.filter_s = filter;
        }
    }

    let mut outcomes = Vec::with_capacity(encounters.len());
    for encounter in &encounters {
        let outcome = run_encounter(encounter)
            .with_context(|| format!("encounter '{}'", encounter.name))?;
        if !cli.quiet {
            print_outcome(&outcome, encounter.separation.lookahead_s, encounter.separation.filter_s);
        }
        outcomes.push(outcome);
    }

    if let Some(path) = &cli.json {
        let mut writer = writer_for_path(path)?;
        report::write_report(writer.as_mut(), kb3d::version(), &outcomes)?;
        writer.flush()?;
    }

    if let Some(path) = &cli.csv {
        let mut writer = writer_for_path(path)?;
        summary::write_header(writer.as_mut())?;
        for outcome in &outcomes {
            outcome.summary_record().write_to(writer.as_mut())?;
        }
        writer.flush()?;
    }

    Ok(())
}

fn print_outcome(outcome: &EncounterOutcome, lookahead_s: f64, filter_s: f64) {
    println!("=== {} ===", outcome.name);
    println!("Distance        : {:.3} nm", outcome.distance_nm);
    println!("Course          : {:.1} deg", outcome.course_deg);

    let detection = &outcome.detection;
    let Some(timing) = detection.timing.filter(|_| detection.conflict) else {
        println!(
            "No predicted conflict in {} s (filter: {} s)",
            lookahead_s, filter_s
        );
        return;
    };

    if detection.violation {
        println!("Aircraft are in violation");
        println!("Time of entry   : {:.2} s", timing.t_in);
        println!("Time of exit    : {:.2} s", timing.t_out);
    } else {
        println!("Time to LoS     : {:.2} s", timing.time2los);
        println!("Time to LoHS    : {:.2} s", timing.time2lhs);
        match timing.time2lvs {
            Some(t) => println!("Time to LoVS    : {:.2} s", t),
            None => println!("Time to LoVS    : never (level outside the vertical band)"),
        }
        println!("Duration        : {:.2} s", timing.duration);
    }

    let advisory = &outcome.advisory;
    if advisory.mode == ResolutionMode::Skipped {
        println!("Resolution      : not available");
    }
    if let Some(trk) = advisory.track_deg {
        println!("Track only      : {:.1} deg", trk);
    }
    if let Some(gs) = advisory.ground_speed_kn {
        println!("Ground speed    : {:.1} kn", gs);
    }
    if let Some(opt) = advisory.optimal {
        println!("Optimal track   : {:.1} deg", opt.track_deg);
        println!("Optimal speed   : {:.1} kn", opt.ground_speed_kn);
    }
    if let Some(vs) = advisory.vertical_speed_fpm {
        let label = match advisory.mode {
            ResolutionMode::Recovery => "Recovery VS     ",
            _ => "Vertical speed  ",
        };
        println!("{label}: {:.0} ft/min", vs);
    }

    if let Some(locations) = &outcome.locations {
        println!("Loss locations  : [lat deg, lon deg, alt ft]");
        for (label, point) in [
            ("ownship entry", locations.ownship_entry),
            ("ownship exit ", locations.ownship_exit),
            ("traffic entry", locations.traffic_entry),
            ("traffic exit ", locations.traffic_exit),
        ] {
            println!(
                "  {label}: [{:.5}, {:.5}, {:.0}]",
                point.lat_deg, point.lon_deg, point.alt_ft
            );
        }
    }
}
