//! Copy eligible sources into a fresh scratch directory.

use std::{
    collections::BTreeMap,
    fs::copy,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::io::recreate_dir;

/// Recreate `scratch_dir` and copy every source into it by file name.
///
/// Returns the staged paths sorted by file name. Sources sharing a file
/// name collapse into a single staged copy, the last one listed.
pub fn stage_sources(sources: &[PathBuf], scratch_dir: &Path) -> Result<Vec<PathBuf>> {
    recreate_dir(scratch_dir)?;

    let mut staged: BTreeMap<PathBuf, &Path> = BTreeMap::new();
    for source in sources {
        let file_name = source
            .file_name()
            .with_context(|| format!("Source has no file name: {}", source.display()))?;
        let dest = scratch_dir.join(file_name);
        copy(source, &dest).with_context(|| {
            format!("Failed to stage {} into {}", source.display(), scratch_dir.display())
        })?;
        if let Some(previous) = staged.insert(dest, source) {
            warn!("{} replaces {} in staging", source.display(), previous.display());
        }
    }

    info!("Staged {} sources in {}", staged.len(), scratch_dir.display());
    Ok(staged.into_keys().collect())
}
