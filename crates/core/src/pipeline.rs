//! Batch driver: scan, stage, and convert every family.

use std::{fs::create_dir_all, path::Path, time::Instant};

use anyhow::{Context, Result};
use log::error;

use crate::{
    config::Workspace,
    family::{FamilyError, FamilyOutput, convert_family},
    scan::find_variable_sources,
    staging::stage_sources,
};

/// A family that could not be converted.
#[derive(Debug)]
pub struct FailedFamily {
    /// File name of the staged source.
    pub file_name: String,
    pub error: FamilyError,
}

/// Families that failed during a batch, in processing order.
#[derive(Debug, Default)]
pub struct FailureReport {
    failures: Vec<FailedFamily>,
}

impl FailureReport {
    pub fn push(&mut self, file_name: impl Into<String>, error: FamilyError) {
        self.failures.push(FailedFamily { file_name: file_name.into(), error });
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FailedFamily> {
        self.failures.iter()
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.file_name.as_str()).collect()
    }

    /// `failed on [A.glyphs, B.glyphs]`
    pub fn summary_line(&self) -> String {
        format!("failed on [{}]", self.file_names().join(", "))
    }

    /// Summary line followed by one line per failure with its step and cause.
    pub fn print(&self) {
        println!("{}", self.summary_line());
        for failure in &self.failures {
            println!("  {}: {}", failure.file_name, failure.error);
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub converted: Vec<FamilyOutput>,
    pub failures: FailureReport,
}

/// Convert every eligible family under `sources_root`.
///
/// Per-family failures are collected in the returned summary; only scanning,
/// staging and output directory errors abort the batch.
pub fn run_batch(
    sources_root: &Path,
    license_root: &Path,
    workspace: &Workspace,
) -> Result<BatchSummary> {
    println!("Scanning {} for variable font sources...", sources_root.display());
    let sources = find_variable_sources(sources_root)?;
    println!("  Found {} eligible families", sources.len());

    let staged =
        stage_sources(&sources, &workspace.scratch_dir).context("Failed to stage sources")?;
    create_dir_all(&workspace.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", workspace.output_dir.display())
    })?;

    let total = staged.len();
    let mut summary = BatchSummary::default();

    for (index, path) in staged.iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        println!("\n[{}/{total}] {file_name}", index + 1);
        let start = Instant::now();

        match convert_family(path, license_root, workspace) {
            Ok(output) => {
                println!(
                    "  ✓ {} -> {} ({:.2}s)",
                    output.family_name,
                    output.output_dir.display(),
                    start.elapsed().as_secs_f64()
                );
                summary.converted.push(output);
            }
            Err(e) => {
                error!("{file_name}: {e}");
                println!("  ✗ {file_name} ({e})");
                summary.failures.push(file_name, e);
            }
        }
    }

    println!(
        "\n{} converted, {} failed",
        summary.converted.len(),
        summary.failures.len()
    );
    summary.failures.print();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Step;

    fn failure(step: Step, message: &str) -> FamilyError {
        FamilyError { step, cause: anyhow::anyhow!(message.to_string()) }
    }

    #[test]
    fn empty_report_summary() {
        let report = FailureReport::default();
        assert!(report.is_empty());
        assert_eq!(report.summary_line(), "failed on []");
    }

    #[test]
    fn report_keeps_order() {
        let mut report = FailureReport::default();
        report.push("B.glyphs", failure(Step::Compile, "exit code 1"));
        report.push("A.glyphs", failure(Step::ResolveCategory, "missing METADATA.pb"));

        assert_eq!(report.len(), 2);
        assert_eq!(report.file_names(), vec!["B.glyphs", "A.glyphs"]);
        assert_eq!(report.summary_line(), "failed on [B.glyphs, A.glyphs]");
        let steps: Vec<Step> = report.iter().map(|f| f.error.step).collect();
        assert_eq!(steps, vec![Step::Compile, Step::ResolveCategory]);
    }

    #[test]
    fn missing_source_tree_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path());
        assert!(run_batch(&dir.path().join("missing"), dir.path(), &workspace).is_err());
    }

    #[test]
    fn empty_tree_yields_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("fonts");
        std::fs::create_dir_all(&tree).unwrap();
        let workspace = Workspace::new(dir.path().join("work"));
        std::fs::create_dir_all(&workspace.work_dir).unwrap();

        let summary = run_batch(&tree, dir.path(), &workspace).unwrap();
        assert!(summary.converted.is_empty());
        assert!(summary.failures.is_empty());
        assert!(workspace.scratch_dir.is_dir());
    }
}
