use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;

use trainplot::color::ColorMap;
use trainplot::data::extract::read_column;
use trainplot::data::model::{Trace, TraceSet, VarSpec};
use trainplot::render::chart::{ChartOptions, render_chart};

/// Plot one column of one log file as a PNG chart.
///
/// Unlike the multi-run plotter, a missing file or malformed token here
/// is fatal: the caller asked for exactly this file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Log file to read.
    file: PathBuf,

    /// Zero-based column index.
    #[arg(short = 'c', long, default_value_t = 0)]
    column: usize,

    /// Output image path (default: the input path with a .png extension).
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Do not draw the legend.
    #[arg(long)]
    no_legend: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let values = read_column(&args.file, args.column).with_context(|| {
        format!(
            "extracting column {} from {}",
            args.column,
            args.file.display()
        )
    })?;
    ensure!(
        !values.is_empty(),
        "{} holds no data lines",
        args.file.display()
    );

    let label = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    let output = args
        .output
        .unwrap_or_else(|| args.file.with_extension("png"));

    let var = VarSpec::new(&label, args.column, false);
    let set = TraceSet::from_traces(vec![Trace {
        run: label.clone(),
        values,
    }]);
    let colors = ColorMap::new(&[label]);
    let opts = ChartOptions {
        show_legend: !args.no_legend,
        ..ChartOptions::default()
    };

    render_chart(&output, &var, &set, &colors, &opts)?;
    println!("wrote {}", output.display());
    Ok(())
}
