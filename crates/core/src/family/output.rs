//! Tidy up what the compiler leaves behind.

use std::{
    fs::{copy, create_dir_all, read_dir, remove_dir, remove_file, rename},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;

use crate::{
    config::BINARY_EXTENSION,
    io::{glob_files, remove_dir_if_exists},
};

/// Drop the beta/variable markers fontmake puts in file names.
pub fn release_file_name(name: &str) -> String {
    name.replace("VTBeta", "VFBeta").replace("-VF.ttf", ".ttf")
}

/// Rename every generated binary in `dir`. Returns the new paths.
pub fn rename_binaries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut renamed = Vec::new();
    for path in glob_files(dir, &format!("*.{BINARY_EXTENSION}"))? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let new_path = dir.join(release_file_name(name));
        if new_path != path {
            debug!("Renaming {name} -> {}", new_path.display());
            rename(&path, &new_path).with_context(|| {
                format!("Failed to rename {} to {}", path.display(), new_path.display())
            })?;
        }
        renamed.push(new_path);
    }
    Ok(renamed)
}

/// Move the generated directory to `dest`, merging into it if it exists.
///
/// Files already in `dest` with the same name are replaced.
pub fn relocate_output(generated: &Path, dest: &Path) -> Result<()> {
    if !generated.is_dir() {
        anyhow::bail!("Compiler output not found: {}", generated.display());
    }

    if !dest.exists() {
        match rename(generated, dest) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == ErrorKind::CrossesDevices => {
                debug!("{} is on another device, copying", dest.display());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to move {} to {}", generated.display(), dest.display())
                });
            }
        }
        create_dir_all(dest)
            .with_context(|| format!("Failed to create directory: {}", dest.display()))?;
    }

    let entries = read_dir(generated)
        .with_context(|| format!("Failed to list {}", generated.display()))?;
    for entry in entries {
        let entry = entry?;
        move_file(&entry.path(), &dest.join(entry.file_name()))?;
    }
    remove_dir(generated).with_context(|| format!("Failed to remove {}", generated.display()))
}

/// Rename `src` to `dest`, copying across filesystems.
fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            copy(src, dest).with_context(|| {
                format!("Failed to copy {} to {}", src.display(), dest.display())
            })?;
            remove_file(src).with_context(|| format!("Failed to remove {}", src.display()))
        }
        Err(e) => Err(e)
            .with_context(|| format!("Failed to move {} to {}", src.display(), dest.display())),
    }
}

/// Remove compiler intermediates; missing directories are ignored.
pub fn remove_temp_dirs(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        if remove_dir_if_exists(dir)? {
            debug!("Removed {}", dir.display());
        }
    }
    Ok(())
}
