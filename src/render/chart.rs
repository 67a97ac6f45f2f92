use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::color::ColorMap;
use crate::data::model::{TraceSet, VarSpec};

// ---------------------------------------------------------------------------
// Chart options
// ---------------------------------------------------------------------------

/// Rendering knobs shared by every chart of an invocation.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Draw the per-run legend box.
    pub show_legend: bool,
    /// Y-axis clamp coefficient; negative disables clamping.
    pub y_coeff: f64,
    /// Image size in pixels.
    pub size: (u32, u32),
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            show_legend: true,
            y_coeff: -1.0,
            size: (1080, 720),
        }
    }
}

// ---------------------------------------------------------------------------
// Chart rendering
// ---------------------------------------------------------------------------

/// Render one variable across all runs as a PNG line chart: x is the
/// line index within the log file, one coloured series per run.
pub fn render_chart(
    path: &Path,
    var: &VarSpec,
    set: &TraceSet,
    colors: &ColorMap,
    opts: &ChartOptions,
) -> Result<()> {
    let (x_max, y_lo, y_hi) = axis_ranges(var, set, opts);

    let root = BitMapBackend::new(path, opts.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(var.title(), ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc(var.title())
        .draw()?;

    for trace in &set.traces {
        let color = colors.color_for(&trace.run);
        let points = trace
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v));

        let annotation = chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
        if opts.show_legend {
            annotation
                .label(trace.run.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }
    }

    if opts.show_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()
        .with_context(|| format!("writing chart {}", path.display()))?;
    Ok(())
}

/// Axis ranges for a trace set.  The upper y bound is clamped to
/// `y_coeff × min(final values)` for clamp-enabled variables, so
/// converging objectives are zoomed into their tail instead of being
/// dominated by the first iterations.
fn axis_ranges(var: &VarSpec, set: &TraceSet, opts: &ChartOptions) -> (f64, f64, f64) {
    let x_max = set.max_len.saturating_sub(1).max(1) as f64;

    let (mut lo, mut hi) = (set.y_min, set.y_max);
    if !lo.is_finite() || !hi.is_finite() {
        lo = 0.0;
        hi = 1.0;
    }

    if var.clamp_y && opts.y_coeff > 0.0 {
        if let Some(best) = set.min_final() {
            let cap = best * opts.y_coeff;
            if cap > lo && cap < hi {
                hi = cap;
            }
        }
    }

    // Degenerate range (e.g. a constant metric) – widen so the chart
    // remains drawable.
    if hi <= lo {
        hi = lo + 1.0;
    }

    (x_max, lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Trace;

    fn set_of(values: &[&[f64]]) -> TraceSet {
        TraceSet::from_traces(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Trace {
                    run: format!("run_{i}"),
                    values: v.to_vec(),
                })
                .collect(),
        )
    }

    #[test]
    fn clamp_applies_only_when_flagged_and_positive() {
        let set = set_of(&[&[100.0, 10.0, 1.0], &[90.0, 9.0, 2.0]]);
        let opts = ChartOptions {
            y_coeff: 3.0,
            ..ChartOptions::default()
        };

        let clamped = VarSpec::new("obj", 0, true);
        let (_, lo, hi) = axis_ranges(&clamped, &set, &opts);
        assert_eq!(lo, 1.0);
        assert_eq!(hi, 3.0);

        let unclamped = VarSpec::new("m", 0, false);
        let (_, _, hi) = axis_ranges(&unclamped, &set, &opts);
        assert_eq!(hi, 100.0);

        let disabled = ChartOptions::default();
        let (_, _, hi) = axis_ranges(&clamped, &set, &disabled);
        assert_eq!(hi, 100.0);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let set = set_of(&[&[2.0, 2.0]]);
        let var = VarSpec::new("m", 0, false);
        let (x_max, lo, hi) = axis_ranges(&var, &set, &ChartOptions::default());
        assert_eq!(x_max, 1.0);
        assert!(hi > lo);
    }

    #[test]
    fn renders_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj.png");

        let set = set_of(&[&[3.0, 2.0, 1.0], &[2.5, 1.5, 0.5]]);
        let colors = ColorMap::new(&["run_0".to_string(), "run_1".to_string()]);
        let var = VarSpec::new("obj", 0, true);

        render_chart(&path, &var, &set, &colors, &ChartOptions::default()).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }
}
