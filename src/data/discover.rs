use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use regex::Regex;

// ---------------------------------------------------------------------------
// RunDir – one discovered training run
// ---------------------------------------------------------------------------

/// A run directory that passed all filters.
#[derive(Debug, Clone)]
pub struct RunDir {
    /// Directory name, used as the series label.
    pub name: String,
    pub path: PathBuf,
}

// ---------------------------------------------------------------------------
// RunFilter – which directories count as runs
// ---------------------------------------------------------------------------

/// Compiled directory-name predicate: include patterns, exclusion
/// substrings, and an optional maximum age.
pub struct RunFilter {
    patterns: Vec<Regex>,
    excludes: Vec<String>,
    max_age: Option<Duration>,
}

impl RunFilter {
    /// Build a filter from raw CLI values.
    ///
    /// `patterns` is a comma-separated list where `+` stands for any
    /// character sequence (`run_+lr0.1` matches `run_a_lr0.1`); matching
    /// is anchored to the whole name.  `excludes` is a comma-separated
    /// list of substrings.  `max_age_days == 0` disables the age filter.
    pub fn new(patterns: &str, excludes: &str, max_age_days: u64) -> Result<Self> {
        let patterns = compile_patterns(patterns)?;
        let excludes = split_list(excludes);
        let max_age = (max_age_days > 0).then(|| Duration::days(max_age_days as i64));
        Ok(RunFilter {
            patterns,
            excludes,
            max_age,
        })
    }

    /// Whether a directory name passes the pattern and exclusion checks.
    pub fn matches_name(&self, name: &str) -> bool {
        if !self.patterns.iter().any(|re| re.is_match(name)) {
            return false;
        }
        !self.excludes.iter().any(|ex| name.contains(ex.as_str()))
    }

    fn fresh_enough(&self, dir: &Path) -> bool {
        let Some(max_age) = self.max_age else {
            return true;
        };
        match newest_mtime(dir) {
            Some(mtime) => Local::now() - mtime <= max_age,
            // Unreadable or empty directory: nothing to plot anyway.
            None => false,
        }
    }
}

/// Translate the comma-separated pattern list into anchored regexes.
/// Everything except `+` is taken literally.
fn compile_patterns(arg: &str) -> Result<Vec<Regex>> {
    let mut patterns = Vec::new();
    for raw in split_list(arg) {
        let translated = raw
            .split('+')
            .map(|part| regex::escape(part))
            .collect::<Vec<_>>()
            .join(".*");
        let re = Regex::new(&format!("^{translated}$"))
            .with_context(|| format!("invalid directory pattern '{raw}'"))?;
        patterns.push(re);
    }
    if patterns.is_empty() {
        anyhow::bail!("no directory patterns given");
    }
    Ok(patterns)
}

fn split_list(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Most recent modification time of any file below `dir`.
fn newest_mtime(dir: &Path) -> Option<DateTime<Local>> {
    let mut newest: Option<SystemTime> = None;
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let entries = fs::read_dir(&current).ok()?;
        for entry in entries.flatten() {
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            if meta.is_dir() {
                stack.push(entry.path());
            } else if let Ok(mtime) = meta.modified() {
                newest = Some(newest.map_or(mtime, |n| n.max(mtime)));
            }
        }
    }
    newest.map(DateTime::<Local>::from)
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Scan `root` for run directories passing `filter`, sorted by name so
/// colours and legends are stable across invocations.
pub fn discover_runs(root: &Path, filter: &RunFilter) -> Result<Vec<RunDir>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("scanning {} for run directories", root.display()))?;

    let mut runs = Vec::new();
    for entry in entries {
        let entry = entry.context("reading directory entry")?;
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !filter.matches_name(&name) {
            continue;
        }
        if !filter.fresh_enough(&entry.path()) {
            log::debug!("skipping stale run {name}");
            continue;
        }
        runs.push(RunDir {
            name,
            path: entry.path(),
        });
    }

    runs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(runs)
}
