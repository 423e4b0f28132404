//! Convert one staged source into a `<family>vfbeta` directory.
//!
//! The conversion is a fixed sequence of steps. The first failing step aborts
//! the family and is reported in a [`FamilyError`]; nothing already written is
//! rolled back.

pub mod artifacts;
pub mod output;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use font_metadata::Category;
use glyphs_source::GlyphsSource;
use log::{debug, info};

use crate::{
    compiler::Compiler,
    config::{BETA_FAMILY_SUFFIX, Workspace, license_dir},
};

/// A step of the per-family conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ReadSource,
    RenameFamily,
    Compile,
    RenameBinaries,
    RelocateOutput,
    CopyLicense,
    ResolveCategory,
    WriteEarlyAccess,
    WriteDescription,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::ReadSource => "read-source",
            Step::RenameFamily => "rename-family",
            Step::Compile => "compile",
            Step::RenameBinaries => "rename-binaries",
            Step::RelocateOutput => "relocate-output",
            Step::CopyLicense => "copy-license",
            Step::ResolveCategory => "resolve-category",
            Step::WriteEarlyAccess => "write-early-access",
            Step::WriteDescription => "write-description",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A family conversion that stopped at `step`.
#[derive(Debug, thiserror::Error)]
#[error("{step}: {cause:#}")]
pub struct FamilyError {
    pub step: Step,
    pub cause: anyhow::Error,
}

/// What a successful conversion produced.
#[derive(Debug, Clone)]
pub struct FamilyOutput {
    pub family_name: String,
    pub output_dir: PathBuf,
    pub category: Category,
}

/// Family name as it should appear in the beta build.
///
/// A name that already carries the suffix is returned unchanged.
pub fn beta_family_name(family_name: &str) -> String {
    if family_name.ends_with(BETA_FAMILY_SUFFIX) {
        family_name.to_string()
    } else {
        format!("{family_name}{BETA_FAMILY_SUFFIX}")
    }
}

/// Family name without the beta suffix, used for directory lookups.
pub fn base_family_name(family_name: &str) -> &str {
    family_name.strip_suffix(BETA_FAMILY_SUFFIX).unwrap_or(family_name)
}

fn run_step<T>(step: Step, f: impl FnOnce() -> anyhow::Result<T>) -> Result<T, FamilyError> {
    debug!("  {step}");
    f().map_err(|cause| FamilyError { step, cause })
}

/// Rewrite the family name inside `source` to its beta form and save it.
pub fn rename_family(source: &mut GlyphsSource) -> anyhow::Result<()> {
    let beta_name = beta_family_name(source.family_name()?);
    source.set_family_name(&beta_name);
    source.save()?;
    Ok(())
}

/// Run every conversion step for the staged source at `source_path`.
pub fn convert_family(
    source_path: &Path,
    license_root: &Path,
    workspace: &Workspace,
) -> Result<FamilyOutput, FamilyError> {
    let (mut source, family_name) = run_step(Step::ReadSource, || {
        let source = GlyphsSource::load(source_path)?;
        let family_name = base_family_name(source.family_name()?).to_string();
        Ok((source, family_name))
    })?;
    info!("Converting {family_name} ({})", source.path().display());

    run_step(Step::RenameFamily, || rename_family(&mut source))?;

    let compiler = Compiler::new(&workspace.compiler, workspace.compiler_timeout);
    run_step(Step::Compile, || compiler.compile_variable(source_path, &workspace.work_dir))?;

    let generated = workspace.generated_dir();
    run_step(Step::RenameBinaries, || output::rename_binaries(&generated).map(drop))?;

    let dest = workspace.family_output_dir(&family_name);
    run_step(Step::RelocateOutput, || {
        output::relocate_output(&generated, &dest)?;
        output::remove_temp_dirs(&workspace.temp_dirs())
    })?;

    let license_dir = license_dir(license_root, &family_name);
    run_step(Step::CopyLicense, || artifacts::copy_license(&license_dir, &dest).map(drop))?;

    let category =
        run_step(Step::ResolveCategory, || artifacts::resolve_category(&license_dir))?;

    run_step(Step::WriteEarlyAccess, || {
        artifacts::write_early_access(&dest, category).map(drop)
    })?;

    run_step(Step::WriteDescription, || {
        artifacts::write_description(
            &dest,
            &workspace.template,
            source.designer(),
            category,
            source.copyright(),
        )
    })?;

    Ok(FamilyOutput { family_name, output_dir: dest, category })
}
