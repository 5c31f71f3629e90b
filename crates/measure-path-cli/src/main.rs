//! measure-path-cli: plan measurement labels for a scene and inspect
//! diagnostics.
//!
//! Reads a scene (view, optional configuration, shapes) from a JSON file,
//! plans the labels every shape would get on that view and prints them
//! together with per-shape diagnostics. Useful for:
//!
//! - Checking which segment labels survive a given minimum pixel distance
//! - Tuning the angle tolerance for collinear merging
//! - Comparing metric and imperial formatting
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin measure-path-cli -- [OPTIONS] <SCENE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use measure_path::diagnostics::{Clock, PlanDiagnostics, plan_with_diagnostics};
use measure_path::{
    MeasureError, MeasurementConfig, MeasurementPlan, MeasurementPlanner, Projector, Scene, Shape,
    UnitSystem,
};
use serde::Serialize;

/// Plan measurement labels for the shapes of a scene.
///
/// Prints each label's kind, text, screen position and rotation, followed
/// by planning diagnostics.
#[derive(Parser)]
#[command(name = "measure-path-cli", version)]
struct Cli {
    /// Path to the scene JSON (`view`, optional `config`, `shapes`).
    scene_path: PathBuf,

    /// Use imperial units.
    #[arg(long)]
    imperial: bool,

    /// Merge neighbouring segments whose directions differ by less than
    /// this many degrees.
    #[arg(long)]
    angle_tolerance: Option<f64>,

    /// Hide segment labels shorter than this many pixels on screen.
    #[arg(long)]
    min_pixel_distance: Option<f64>,

    /// Emit vertex markers at the ends of labelled segments.
    #[arg(long)]
    show_vertices: bool,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output plans and diagnostics as JSON instead of a human-readable
    /// report.
    #[arg(long)]
    json: bool,

    /// Full measurement config as a JSON string.
    ///
    /// When provided, the scene's config and all other configuration
    /// flags are ignored.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build the [`MeasurementConfig`] for this run.
///
/// `--config-json` wins outright. Otherwise the scene's config (or the
/// defaults) is taken and the individual flags are applied on top.
fn config_from_cli(cli: &Cli, scene: &Scene) -> Result<MeasurementConfig, MeasureError> {
    if let Some(ref json) = cli.config_json {
        return MeasurementConfig::from_json(json);
    }

    let mut config = scene.config_or_default();
    if cli.imperial {
        config.units = UnitSystem::Imperial;
    }
    if let Some(tolerance) = cli.angle_tolerance {
        config.angle_tolerance = tolerance;
    }
    if let Some(distance) = cli.min_pixel_distance {
        config.min_pixel_distance = distance;
    }
    if cli.show_vertices {
        config.show_vertices = true;
    }
    Ok(config.sanitized())
}

/// One shape's result in `--json` output.
#[derive(Serialize)]
struct ShapeReport<'a> {
    shape: &'a Shape,
    plan: &'a MeasurementPlan,
    diagnostics: &'a PlanDiagnostics,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let json = match std::fs::read_to_string(&cli.scene_path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.scene_path.display());
            return ExitCode::FAILURE;
        }
    };

    let scene = match Scene::from_json(&json) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", cli.scene_path.display());
            return ExitCode::FAILURE;
        }
    };

    let config = match config_from_cli(&cli, &scene) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error parsing --config-json: {e}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Scene: {} ({} shapes)",
        cli.scene_path.display(),
        scene.shapes.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let planner = MeasurementPlanner::default();
    let mut all_diagnostics: Vec<Vec<PlanDiagnostics>> = vec![Vec::new(); scene.shapes.len()];

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let mut reports = Vec::with_capacity(scene.shapes.len());
        for (index, shape) in scene.shapes.iter().enumerate() {
            let (plan, diagnostics) =
                plan_with_diagnostics(&planner, shape, &config, &scene.view, &StdClock);
            log::info!(
                "shape {index}: {} labels in {:?}",
                plan.labels.len(),
                diagnostics.duration,
            );
            reports.push((plan, diagnostics));
        }

        if cli.json {
            let out: Vec<ShapeReport<'_>> = scene
                .shapes
                .iter()
                .zip(&reports)
                .map(|(shape, (plan, diagnostics))| ShapeReport {
                    shape,
                    plan,
                    diagnostics,
                })
                .collect();
            match serde_json::to_string_pretty(&out) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing plans: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            for (index, (plan, diagnostics)) in reports.iter().enumerate() {
                println!("{}", plan_report(index, plan, &scene.view));
                println!("{}", diagnostics.report());
                println!();
            }
        }

        for (history, (_, diagnostics)) in all_diagnostics.iter_mut().zip(reports) {
            history.push(diagnostics);
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Human-readable label listing for one shape.
fn plan_report<P: Projector + ?Sized>(index: usize, plan: &MeasurementPlan, view: &P) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Shape #{index}: {} labels", plan.labels.len()));
    lines.push(format!(
        "{:<14} {:>12} {:>16} {:>10}  {}",
        "Kind", "Text", "Screen", "Rotation", "Title"
    ));
    lines.push("-".repeat(72));

    for label in &plan.labels {
        let at = view.project(label.anchor).round();
        let flag = if label.below_min_distance {
            " (below min distance)"
        } else {
            ""
        };
        let kind = format!("{:?}", label.kind);
        let screen = format!("({}, {})", at.x, at.y);
        lines.push(format!(
            "{kind:<14} {:>12} {screen:>16} {:>9.3}r  {}{flag}",
            label.text, label.rotation, label.title,
        ));
    }

    if !plan.vertices.is_empty() {
        let markers: Vec<String> = plan
            .vertices
            .iter()
            .map(|v| {
                let at = view.project(*v).round();
                format!("({}, {})", at.x, at.y)
            })
            .collect();
        lines.push(format!("Vertex markers: {}", markers.join(" ")));
    }

    lines.join("\n")
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Print per-shape planning time statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[Vec<PlanDiagnostics>]) {
    let runs = all_diagnostics.first().map_or(0, Vec::len);

    println!();
    println!("Summary ({runs} runs)\n{}", "=".repeat(60));

    if runs == 0 {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    println!("{:<10} {:>12} {:>12} {:>12}", "Shape", "Min (ms)", "Mean (ms)", "Max (ms)");
    println!("{}", "-".repeat(50));

    for (index, history) in all_diagnostics.iter().enumerate() {
        let durations: Vec<f64> = history
            .iter()
            .map(|d| d.duration.as_secs_f64() * 1000.0)
            .collect();
        if durations.is_empty() {
            continue;
        }

        let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
        let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
        let mean = durations.iter().sum::<f64>() / durations.len() as f64;
        let shape = format!("#{index}");
        println!("{shape:<10} {min:>10.3}ms {mean:>10.3}ms {max:>10.3}ms");
    }
}
