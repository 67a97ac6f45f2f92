use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::data::model::TraceSet;

// ---------------------------------------------------------------------------
// HTML index
// ---------------------------------------------------------------------------

/// Write `index.html` into the output directory, one section per chart,
/// so the directory can be served as-is from a public_html tree.
pub fn write_html_index(dir: &Path, images: &[String]) -> Result<PathBuf> {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>Training curves</title>\n");
    html.push_str("</head>\n<body>\n<h1>Training curves</h1>\n");
    html.push_str(&format!(
        "<p>Generated {}</p>\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    for image in images {
        let stem = image.trim_end_matches(".png");
        html.push_str(&format!(
            "<div>\n<h2>{stem}</h2>\n<img src=\"{image}\" alt=\"{stem}\">\n</div>\n"
        ));
    }
    html.push_str("</body>\n</html>\n");

    let path = dir.join("index.html");
    fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Export one variable's traces as CSV: an `iteration` column followed
/// by one column per run.  Rows beyond a shorter trace are left empty.
pub fn export_csv(path: &Path, set: &TraceSet) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["iteration".to_string()];
    header.extend(set.traces.iter().map(|t| t.run.clone()));
    writer.write_record(&header).context("writing CSV header")?;

    for row in 0..set.max_len {
        let mut record = vec![row.to_string()];
        for trace in &set.traces {
            record.push(
                trace
                    .values
                    .get(row)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Trace;

    #[test]
    fn index_references_every_chart() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec!["obj.png".to_string(), "loss.png".to_string()];

        let path = write_html_index(dir.path(), &images).unwrap();
        let html = fs::read_to_string(path).unwrap();

        assert!(html.contains("<img src=\"obj.png\""));
        assert!(html.contains("<img src=\"loss.png\""));
        assert!(html.contains("<h2>obj</h2>"));
    }

    #[test]
    fn csv_pads_short_traces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj.csv");

        let set = TraceSet::from_traces(vec![
            Trace {
                run: "run_a".into(),
                values: vec![1.0, 2.0, 3.0],
            },
            Trace {
                run: "run_b".into(),
                values: vec![4.0],
            },
        ]);
        export_csv(&path, &set).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "iteration,run_a,run_b");
        assert_eq!(lines[1], "0,1,4");
        assert_eq!(lines[2], "1,2,");
        assert_eq!(lines[3], "2,3,");
        assert_eq!(lines.len(), 4);
    }
}
