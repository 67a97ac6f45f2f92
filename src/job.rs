use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::discover::RunDir;
use crate::data::extract::read_column;
use crate::data::model::{Trace, TraceSet, VarSpec};
use crate::render::chart::{ChartOptions, render_chart};
use crate::render::report;

// ---------------------------------------------------------------------------
// PlotJob – one resolved invocation
// ---------------------------------------------------------------------------

/// Everything a plotting pass needs, resolved from the CLI: the runs to
/// read, the variables to chart, and where the output goes.
pub struct PlotJob {
    pub runs: Vec<RunDir>,
    pub vars: Vec<VarSpec>,
    pub output_dir: PathBuf,
    pub chart: ChartOptions,
    pub export_csv: bool,
}

impl PlotJob {
    /// Extract and render every variable, then write the HTML index.
    /// Returns the number of charts rendered.
    pub fn run(&self) -> Result<usize> {
        let run_names: Vec<String> = self.runs.iter().map(|r| r.name.clone()).collect();
        let colors = ColorMap::new(&run_names);

        let mut images = Vec::new();
        for var in &self.vars {
            let set = self.collect_traces(var)?;
            if set.is_empty() {
                log::debug!("no data for {} in any run, skipping chart", var.file);
                continue;
            }

            let image = format!("{}.png", var.output_stem());
            let png = self.output_dir.join(&image);
            render_chart(&png, var, &set, &colors, &self.chart)
                .with_context(|| format!("rendering {}", var.title()))?;
            log::info!("rendered {} ({} run(s))", png.display(), set.len());

            if self.export_csv {
                let csv = self.output_dir.join(format!("{}.csv", var.output_stem()));
                report::export_csv(&csv, &set)?;
            }

            images.push(image);
        }

        report::write_html_index(&self.output_dir, &images)?;
        Ok(images.len())
    }

    /// Extract one variable from every run that emits it.  A run without
    /// the file simply does not log that metric; parse errors abort.
    fn collect_traces(&self, var: &VarSpec) -> Result<TraceSet> {
        let mut traces = Vec::new();
        for run in &self.runs {
            let path = run.path.join(&var.file);
            if !path.is_file() {
                log::debug!("{} does not emit {}", run.name, var.file);
                continue;
            }
            let values = read_column(&path, var.column)?;
            traces.push(Trace {
                run: run.name.clone(),
                values,
            });
        }
        Ok(TraceSet::from_traces(traces))
    }
}
