use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use trainplot::data::discover::{RunFilter, discover_runs};
use trainplot::data::extract::load_var_specs;
use trainplot::data::model::builtin_vars;
use trainplot::job::PlotJob;
use trainplot::render::chart::ChartOptions;

/// Plot training-run log columns as time-series charts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Comma-separated run-directory patterns; `+` matches any sequence.
    #[arg(
        short = 'd',
        long,
        value_name = "PATTERNS",
        default_value = "training_files_+"
    )]
    dirs: String,

    /// Do not draw the per-run legend.
    #[arg(long)]
    no_legend: bool,

    /// Comma-separated substrings of run names to skip.
    #[arg(short = 'n', long, value_name = "NAMES", default_value = "")]
    exclude: String,

    /// Output directory; relative names resolve under ~/public_html.
    #[arg(short = 'o', long, value_name = "DIR", default_value = "")]
    output_dir: String,

    /// Skip runs whose files are older than this many days (0 = off).
    #[arg(short = 't', long, value_name = "DAYS", default_value_t = 0)]
    max_age_days: u64,

    /// Y-axis clamp coefficient for clamp-enabled variables (< 0 = off).
    #[arg(
        short = 'y',
        long,
        value_name = "COEFF",
        default_value_t = -1.0,
        allow_negative_numbers = true
    )]
    y_coeff: f64,

    /// JSON file replacing the built-in variable table.
    #[arg(long, value_name = "FILE")]
    vars: Option<PathBuf>,

    /// Also write one CSV file per variable.
    #[arg(long)]
    export_csv: bool,

    /// Directory scanned for run directories.
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,
}

/// Relative output names land under `~/public_html`, the original
/// web-servable target; absolute paths are used as given.
fn resolve_output_dir(name: &str) -> Result<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_absolute() {
        return Ok(path);
    }
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join("public_html").join(name))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let filter = RunFilter::new(&args.dirs, &args.exclude, args.max_age_days)?;
    let runs = discover_runs(&args.root, &filter)?;
    if runs.is_empty() {
        bail!(
            "no run directories match '{}' under {}",
            args.dirs,
            args.root.display()
        );
    }
    log::info!(
        "found {} run(s): {}",
        runs.len(),
        runs.iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let vars = match &args.vars {
        Some(path) => load_var_specs(path)?,
        None => builtin_vars(),
    };

    let output_dir = resolve_output_dir(&args.output_dir)?;
    if !output_dir.exists() {
        log::info!("creating output directory {}", output_dir.display());
    }
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let job = PlotJob {
        runs,
        vars,
        output_dir: output_dir.clone(),
        chart: ChartOptions {
            show_legend: !args.no_legend,
            y_coeff: args.y_coeff,
            ..ChartOptions::default()
        },
        export_csv: args.export_csv,
    };

    let rendered = job.run()?;
    log::info!("{rendered} chart(s) written to {}", output_dir.display());
    Ok(())
}
