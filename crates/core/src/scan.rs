//! Find Glyphs sources that can be built as variable fonts.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use glyphs_source::{FontSourceRecord, GLYPHS_EXTENSION, GlyphsSource};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::SOURCE_FOLDERS;

/// Whether `path` looks like a family source: a `.glyphs` file sitting
/// directly inside a `source`/`sources` folder.
pub fn is_source_candidate(path: &Path) -> bool {
    let is_glyphs = path.extension().is_some_and(|ext| ext == GLYPHS_EXTENSION);
    let in_source_folder = path
        .parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .is_some_and(|name| SOURCE_FOLDERS.contains(&name));
    is_glyphs && in_source_folder
}

/// Read a source and return its record if it is eligible for a variable build.
pub fn eligible_record(path: &Path) -> glyphs_source::Result<Option<FontSourceRecord>> {
    let record = GlyphsSource::load(path)?.record()?;
    Ok(record.is_variable_candidate().then_some(record))
}

/// Walk `root` and collect every eligible source.
///
/// Files that cannot be read or lack the expected structure are logged and
/// skipped.
pub fn find_variable_sources(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Source tree not found: {}", root.display());
    }

    let mut families = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        let path = entry.path();
        // Follows symlinks to files; directory links are not walked.
        if !path.is_file() || !is_source_candidate(path) {
            continue;
        }

        match eligible_record(path) {
            Ok(Some(record)) => {
                info!(
                    "Adding {} ({} masters, {} instances)",
                    path.display(),
                    record.master_count,
                    record.instance_count
                );
                families.push(path.to_path_buf());
            }
            Ok(None) => debug!("Not a variable candidate: {}", path.display()),
            Err(e) => warn!("Cannot add {}: {e}", path.display()),
        }
    }
    Ok(families)
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};

    use super::*;

    fn glyphs(masters: usize, instances: usize) -> String {
        let masters = vec!["{\nid = m;\n}"; masters].join(",\n");
        let instances = vec!["{\nname = i;\n}"; instances].join(",\n");
        format!("{{\nfamilyName = \"Test\";\nfontMaster = (\n{masters}\n);\ninstances = (\n{instances}\n);\n}}\n")
    }

    #[test]
    fn source_candidate_requires_source_folder() {
        assert!(is_source_candidate(Path::new("fam/source/A.glyphs")));
        assert!(is_source_candidate(Path::new("fam/sources/A.glyphs")));
        assert!(!is_source_candidate(Path::new("fam/src/A.glyphs")));
        assert!(!is_source_candidate(Path::new("fam/sources/A.ufo")));
        assert!(!is_source_candidate(Path::new("A.glyphs")));
    }

    #[test]
    fn finds_only_eligible_sources_in_source_folders() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let files = [
            ("alpha/sources/Alpha.glyphs", glyphs(2, 4)),
            ("beta/source/Beta.glyphs", glyphs(3, 9)),
            ("gamma/src/Gamma.glyphs", glyphs(2, 4)),
            ("delta/sources/Delta.glyphs", glyphs(1, 5)),
            ("epsilon/sources/Epsilon.glyphs", glyphs(3, 3)),
            ("zeta/sources/Zeta.glyphs", "{ not valid".to_string()),
            ("eta/sources/Eta.glyphs", "{familyName = Eta;}".to_string()),
            ("nested/deep/tree/sources/Theta.glyphs", glyphs(2, 6)),
        ];
        for (rel, contents) in &files {
            let path = root.join(rel);
            create_dir_all(path.parent().unwrap()).unwrap();
            write(path, contents).unwrap();
        }

        let mut found = find_variable_sources(root).unwrap();
        found.sort();
        let mut expected = vec![
            root.join("alpha/sources/Alpha.glyphs"),
            root.join("beta/source/Beta.glyphs"),
            root.join("nested/deep/tree/sources/Theta.glyphs"),
        ];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_sources_are_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shared/Linked.glyphs");
        create_dir_all(target.parent().unwrap()).unwrap();
        write(&target, glyphs(2, 4)).unwrap();
        let tree = dir.path().join("tree");
        let link = tree.join("fam/sources/Linked.glyphs");
        create_dir_all(link.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(find_variable_sources(&tree).unwrap(), vec![link]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_variable_sources(&dir.path().join("missing")).is_err());
    }
}
