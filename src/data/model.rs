use serde::Deserialize;

// ---------------------------------------------------------------------------
// VarSpec – one plottable variable
// ---------------------------------------------------------------------------

/// A column selector: which log file inside a run directory to read,
/// which whitespace-separated column to extract, and whether the chart's
/// y-axis may be clamped by the y-coefficient option.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VarSpec {
    /// Path of the log file relative to a run directory,
    /// e.g. `obj` or `scores0/training_score`.
    pub file: String,
    /// Zero-based column index within each data line.
    #[serde(default)]
    pub column: usize,
    /// Whether `--y-coeff` clamps this chart's upper y bound.
    #[serde(default)]
    pub clamp_y: bool,
}

impl VarSpec {
    pub fn new(file: &str, column: usize, clamp_y: bool) -> Self {
        VarSpec {
            file: file.to_string(),
            column,
            clamp_y,
        }
    }

    /// File-system friendly stem for output files.  Slashes become
    /// underscores; a non-zero column gets a `_c<idx>` suffix so two
    /// selectors on the same file do not collide.
    pub fn output_stem(&self) -> String {
        let base = self.file.replace('/', "_");
        if self.column == 0 {
            base
        } else {
            format!("{base}_c{}", self.column)
        }
    }

    /// Human-readable chart title.
    pub fn title(&self) -> String {
        if self.column == 0 {
            self.file.clone()
        } else {
            format!("{} [col {}]", self.file, self.column)
        }
    }
}

/// The default variable table, mirroring the metric files the training
/// system writes into each run directory.
pub fn builtin_vars() -> Vec<VarSpec> {
    vec![
        VarSpec::new("scores0/training_score", 9, false),
        VarSpec::new("scores0/test_score", 9, false),
        VarSpec::new("dscore", 0, true),
        VarSpec::new("a_dscore", 0, true),
        VarSpec::new("obj", 0, true),
        VarSpec::new("m", 0, false),
        VarSpec::new("learning_rate", 0, false),
        VarSpec::new("norm_w", 0, false),
        VarSpec::new("norm_dfy", 0, false),
        VarSpec::new("loss", 0, true),
        VarSpec::new("constraint_set_card", 0, false),
        VarSpec::new("constraint_set_card", 1, false),
        VarSpec::new("autostep_learning_rate", 0, false),
        VarSpec::new("autostep_learning_rate_all_0", 1, false),
        VarSpec::new("autostep_learning_rate_all_1", 1, false),
        VarSpec::new("autostep_learning_rate_all_2", 1, false),
        VarSpec::new("autostep_linear_min", 1, false),
        VarSpec::new("autostep_quadratic_min", 1, false),
        VarSpec::new("d_slack", 0, true),
    ]
}

// ---------------------------------------------------------------------------
// Trace – one extracted series
// ---------------------------------------------------------------------------

/// One metric series extracted from one run, in file order.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Run-directory name, used for legend and colour lookup.
    pub run: String,
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// TraceSet – all traces for one variable
// ---------------------------------------------------------------------------

/// The traces of a single variable across all runs, with pre-computed
/// bounds for axis construction.
#[derive(Debug, Clone)]
pub struct TraceSet {
    pub traces: Vec<Trace>,
    /// Smallest finite value across all traces.
    pub y_min: f64,
    /// Largest finite value across all traces.
    pub y_max: f64,
    /// Length of the longest trace.
    pub max_len: usize,
}

impl TraceSet {
    /// Build a set from extracted traces, dropping empty ones and
    /// computing value bounds (non-finite values are ignored).
    pub fn from_traces(traces: Vec<Trace>) -> Self {
        let traces: Vec<Trace> = traces.into_iter().filter(|t| !t.values.is_empty()).collect();

        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        let mut max_len = 0;

        for trace in &traces {
            max_len = max_len.max(trace.values.len());
            for &v in &trace.values {
                if v.is_finite() {
                    y_min = y_min.min(v);
                    y_max = y_max.max(v);
                }
            }
        }

        TraceSet {
            traces,
            y_min,
            y_max,
            max_len,
        }
    }

    /// Number of traces.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether the set holds no data.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Smallest last value across traces – the level a converging metric
    /// settled at, used for y-axis clamping.
    pub fn min_final(&self) -> Option<f64> {
        self.traces
            .iter()
            .filter_map(|t| t.values.last().copied())
            .filter(|v| v.is_finite())
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_stem_flattens_slashes() {
        let var = VarSpec::new("scores0/training_score", 9, false);
        assert_eq!(var.output_stem(), "scores0_training_score_c9");
    }

    #[test]
    fn output_stem_omits_suffix_for_column_zero() {
        assert_eq!(VarSpec::new("obj", 0, true).output_stem(), "obj");
    }

    #[test]
    fn builtin_stems_are_unique() {
        let vars = builtin_vars();
        let mut stems: Vec<String> = vars.iter().map(VarSpec::output_stem).collect();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), vars.len());
    }

    #[test]
    fn trace_set_computes_bounds() {
        let set = TraceSet::from_traces(vec![
            Trace {
                run: "a".into(),
                values: vec![3.0, 1.0, 2.0],
            },
            Trace {
                run: "b".into(),
                values: vec![5.0, 0.5],
            },
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.y_min, 0.5);
        assert_eq!(set.y_max, 5.0);
        assert_eq!(set.max_len, 3);
        assert_eq!(set.min_final(), Some(0.5));
    }

    #[test]
    fn trace_set_drops_empty_traces() {
        let set = TraceSet::from_traces(vec![Trace {
            run: "a".into(),
            values: vec![],
        }]);
        assert!(set.is_empty());
        assert_eq!(set.min_final(), None);
    }
}
