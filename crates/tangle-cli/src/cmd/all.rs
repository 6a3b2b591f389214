//! `tangle all` — analyze every dataset in a directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::cmd::run::{DatasetReport, analyze_dataset, render_report_human, render_report_text};
use crate::metrics_log::MetricsLog;
use crate::output::{CliError, OutputMode, pretty_section, render_error, render_mode};

/// Arguments for `tangle all`.
#[derive(Args, Debug, Default)]
pub struct AllArgs {
    /// Directory of `*.json` descriptors (default: `[data] dir` from config).
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DatasetFailure {
    dataset: String,
    error: CliError,
}

#[derive(Debug, Serialize)]
struct BatchOutput {
    succeeded: Vec<DatasetReport>,
    failed: Vec<DatasetFailure>,
}

/// `*.json` files directly under `dir`, sorted by file name.
///
/// # Errors
///
/// Returns an error if `dir` cannot be listed.
pub fn discover_datasets(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Execute `tangle all`.
///
/// # Errors
///
/// Returns an error if no datasets are found or every dataset fails.
pub fn run_all(
    args: &AllArgs,
    default_dir: &Path,
    output: OutputMode,
    log: Option<&MetricsLog>,
) -> anyhow::Result<()> {
    let dir = args.dir.as_deref().unwrap_or(default_dir);
    let files = if dir.is_dir() {
        discover_datasets(dir)?
    } else {
        Vec::new()
    };

    if files.is_empty() {
        render_error(
            output,
            &CliError::new(format!("no JSON datasets found in {}", dir.display())),
        )?;
        anyhow::bail!("no datasets in {}", dir.display());
    }
    info!(count = files.len(), dir = %dir.display(), "running all datasets");

    let mut batch = BatchOutput {
        succeeded: Vec::new(),
        failed: Vec::new(),
    };
    for path in &files {
        match analyze_dataset(path, log) {
            Ok(report) => batch.succeeded.push(report),
            Err(error) => {
                warn!(
                    dataset = %path.display(),
                    code = error.error_code.as_deref().unwrap_or("-"),
                    "skipping dataset: {}",
                    error.message
                );
                batch.failed.push(DatasetFailure {
                    dataset: path.display().to_string(),
                    error,
                });
            }
        }
    }

    render_mode(output, &batch, render_batch_text, render_batch_human)?;

    if batch.succeeded.is_empty() {
        anyhow::bail!("all {} datasets failed", batch.failed.len());
    }
    Ok(())
}

fn render_batch_text(batch: &BatchOutput, w: &mut dyn Write) -> io::Result<()> {
    for report in &batch.succeeded {
        render_report_text(report, w)?;
    }
    for failure in &batch.failed {
        writeln!(
            w,
            "failed dataset={} code={} {}",
            failure.dataset,
            failure.error.error_code.as_deref().unwrap_or("-"),
            failure.error.message
        )?;
    }
    Ok(())
}

fn render_batch_human(batch: &BatchOutput, w: &mut dyn Write) -> io::Result<()> {
    for report in &batch.succeeded {
        render_report_human(report, w)?;
        writeln!(w)?;
    }

    pretty_section(
        w,
        &format!(
            "Summary: {} succeeded, {} failed",
            batch.succeeded.len(),
            batch.failed.len()
        ),
    )?;
    for failure in &batch.failed {
        writeln!(w, "  ✗ {}: {}", failure.dataset, failure.error.message)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_is_sorted_and_json_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["b.json", "a.json", "notes.txt", "c.JSON.bak"] {
            fs::write(dir.path().join(name), "{}").expect("write");
        }
        fs::create_dir(dir.path().join("nested.json")).expect("mkdir");

        let files = discover_datasets(dir.path()).expect("discover");
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn all_args_parse_dir() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AllArgs,
        }

        let parsed = Wrapper::parse_from(["test", "--dir", "fixtures"]);
        assert_eq!(parsed.args.dir, Some(PathBuf::from("fixtures")));
        let parsed = Wrapper::parse_from(["test"]);
        assert!(parsed.args.dir.is_none());
    }

    #[test]
    fn summary_lists_failures() {
        let batch = BatchOutput {
            succeeded: Vec::new(),
            failed: vec![DatasetFailure {
                dataset: "data/bad.json".to_string(),
                error: CliError::new("invalid descriptor JSON"),
            }],
        };
        let mut out = Vec::new();
        render_batch_human(&batch, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("0 succeeded, 1 failed"));
        assert!(text.contains("data/bad.json"));
    }
}
