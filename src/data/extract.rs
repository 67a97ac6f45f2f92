use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use thiserror::Error;

use super::model::VarSpec;

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

/// Failures while pulling a column out of a log file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be read (most commonly: it does not exist).
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A data line carried a token that is not a number at the requested
    /// column.
    #[error("{path}:{line}: '{token}' is not a number")]
    BadNumber {
        path: PathBuf,
        line: usize,
        token: String,
    },
}

// ---------------------------------------------------------------------------
// Column extraction
// ---------------------------------------------------------------------------

/// Extract one whitespace-separated column from a training log file.
///
/// Log files look like:
///
/// ```text
/// obj        dobj      eta
/// 1824.1031  -12.002   0.1
/// 1691.5527  -9.815    0.1
/// ```
///
/// The first line is treated as a header and skipped when its first
/// token does not parse as a float.  Extraction stops at the first blank
/// line (a live trainer may have a partially flushed tail); lines with
/// fewer tokens than the requested column are skipped.
pub fn read_column(path: &Path, column: usize) -> Result<Vec<f64>, ExtractError> {
    let text = fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    // Header check: only the very first token decides.
    let mut first_idx = 0;
    match lines[0].split_whitespace().next() {
        Some(tok) if !is_float(tok) => first_idx = 1,
        Some(_) => {}
        // Blank first line: the blank-line stop applies before any data.
        None => return Ok(Vec::new()),
    }

    let mut values = Vec::with_capacity(lines.len() - first_idx);
    for (idx, line) in lines.iter().enumerate().skip(first_idx) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            break;
        }
        if tokens.len() <= column {
            log::debug!(
                "{}:{}: {} token(s), need column {} – skipped",
                path.display(),
                idx + 1,
                tokens.len(),
                column
            );
            continue;
        }
        let token = tokens[column];
        let value: f64 = token.parse().map_err(|_| ExtractError::BadNumber {
            path: path.to_path_buf(),
            line: idx + 1,
            token: token.to_string(),
        })?;
        values.push(value);
    }

    Ok(values)
}

fn is_float(token: &str) -> bool {
    token.parse::<f64>().is_ok()
}

// ---------------------------------------------------------------------------
// Variable table loader
// ---------------------------------------------------------------------------

/// Load a variable table replacing the built-in one.
///
/// Expected JSON schema:
///
/// ```json
/// [
///   { "file": "obj", "column": 0, "clamp_y": true },
///   { "file": "scores0/training_score", "column": 9 }
/// ]
/// ```
pub fn load_var_specs(path: &Path) -> Result<Vec<VarSpec>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading variable table {}", path.display()))?;
    let vars: Vec<VarSpec> =
        serde_json::from_str(&text).context("parsing variable table JSON")?;
    if vars.is_empty() {
        bail!("variable table {} defines no variables", path.display());
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    fn write_log(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn numeric_first_line_is_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "log", "0.1 0.2 0.3\n0.4 0.5 0.6\n");
        assert_eq!(read_column(&path, 1).unwrap(), vec![0.2, 0.5]);
    }

    #[test]
    fn header_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "log", "score1 score2\n0.1 0.2\n");
        assert_eq!(read_column(&path, 0).unwrap(), vec![0.1]);
    }

    #[test]
    fn all_lines_extracted_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "log", "3.0\n1.0\n2.0\n");
        assert_eq!(read_column(&path, 0).unwrap(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_file_yields_empty_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "log", "");
        assert_eq!(read_column(&path, 0).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn stops_at_first_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "log", "1.0\n2.0\n\n3.0\n");
        assert_eq!(read_column(&path, 0).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn short_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "log", "1.0 10.0\n2.0\n3.0 30.0\n");
        assert_eq!(read_column(&path, 1).unwrap(), vec![10.0, 30.0]);
    }

    #[test]
    fn malformed_token_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "log", "1.0 2.0\n3.0 x\n");
        match read_column(&path, 1) {
            Err(ExtractError::BadNumber { line, token, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("expected BadNumber, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        match read_column(&dir.path().join("absent"), 0) {
            Err(ExtractError::Io { source, .. }) => {
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn blank_first_line_yields_empty_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "log", "\n1.0\n");
        assert_eq!(read_column(&path, 0).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn var_table_round_trips_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            &dir,
            "vars.json",
            r#"[{ "file": "obj", "clamp_y": true }, { "file": "scores0/test_score", "column": 9 }]"#,
        );
        let vars = load_var_specs(&path).unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0], VarSpec::new("obj", 0, true));
        assert_eq!(vars[1], VarSpec::new("scores0/test_score", 9, false));
    }

    #[test]
    fn empty_var_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(&dir, "vars.json", "[]");
        assert!(load_var_specs(&path).is_err());
    }
}
