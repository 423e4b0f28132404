//! Configuration constants and working paths for a batch run.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Parent directory names that mark a folder of font sources.
pub const SOURCE_FOLDERS: &[&str] = &["source", "sources"];

/// Scratch directory (under the work dir) that eligible sources are copied into.
pub const SCRATCH_DIR_NAME: &str = "mm_src";

/// Directory fontmake writes variable TTFs into, relative to its working dir.
pub const GENERATED_DIR_NAME: &str = "variable_ttf";

/// Intermediate fontmake directories removed after every family.
pub const TEMP_DIR_NAMES: &[&str] = &["master_ufo", "master_ttf_interpolatable"];

/// Extension of generated font binaries.
pub const BINARY_EXTENSION: &str = "ttf";

/// Appended to the family name inside the source before compiling.
pub const BETA_FAMILY_SUFFIX: &str = " VF Beta";

/// Appended to the normalized family name to form the output directory name.
pub const OUTPUT_DIR_SUFFIX: &str = "vfbeta";

/// License file copied from the license tree.
pub const LICENSE_FILENAME: &str = "OFL.txt";

/// Early access marker holding the category label.
pub const EARLY_ACCESS_FILENAME: &str = "EARLY_ACCESS.category";

/// Generated description document.
pub const DESCRIPTION_FILENAME: &str = "DESCRIPTION.en_us.html";

/// Default description template, looked up in the work dir.
pub const DESCRIPTION_TEMPLATE_FILENAME: &str = "DESCRIPTION.en_us_temp.html";

/// Default external compiler.
pub const DEFAULT_COMPILER: &str = "fontmake";

/// Default limit on a single compiler run.
pub const DEFAULT_COMPILER_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Every path a batch run reads from or writes to, apart from its inputs.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Working directory of the compiler; holds its generated directories.
    pub work_dir: PathBuf,
    /// Where staged copies of eligible sources are placed.
    pub scratch_dir: PathBuf,
    /// Where `<family>vfbeta` directories are created.
    pub output_dir: PathBuf,
    /// HTML template for the description document.
    pub template: PathBuf,
    /// Compiler program name or path.
    pub compiler: String,
    pub compiler_timeout: Duration,
}

impl Workspace {
    /// Defaults rooted at `work_dir`, matching the conventional fontmake layout.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        Self {
            scratch_dir: work_dir.join(SCRATCH_DIR_NAME),
            output_dir: work_dir.clone(),
            template: work_dir.join(DESCRIPTION_TEMPLATE_FILENAME),
            compiler: DEFAULT_COMPILER.to_string(),
            compiler_timeout: DEFAULT_COMPILER_TIMEOUT,
            work_dir,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    pub fn with_compiler_timeout(mut self, timeout: Duration) -> Self {
        self.compiler_timeout = timeout;
        self
    }

    /// Directory the compiler fills with variable binaries.
    pub fn generated_dir(&self) -> PathBuf {
        self.work_dir.join(GENERATED_DIR_NAME)
    }

    /// Compiler intermediates that are discarded after each family.
    pub fn temp_dirs(&self) -> Vec<PathBuf> {
        TEMP_DIR_NAMES.iter().map(|name| self.work_dir.join(name)).collect()
    }

    /// Output directory for a family, e.g. `examplesansvfbeta`.
    pub fn family_output_dir(&self, family_name: &str) -> PathBuf {
        self.output_dir.join(format!("{}{OUTPUT_DIR_SUFFIX}", normalized_family_name(family_name)))
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Lower-cased family name with spaces removed (`Example Sans` -> `examplesans`).
///
/// This is also the folder name of the family in the license tree.
pub fn normalized_family_name(family_name: &str) -> String {
    family_name.to_lowercase().replace(' ', "")
}

/// License tree folder for a family.
pub fn license_dir(license_root: &Path, family_name: &str) -> PathBuf {
    license_root.join(normalized_family_name(family_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_family_names() {
        assert_eq!(normalized_family_name("Example Sans"), "examplesans");
        assert_eq!(normalized_family_name("Noto Serif JP"), "notoserifjp");
        assert_eq!(normalized_family_name("Lato"), "lato");
    }

    #[test]
    fn workspace_paths() {
        let ws = Workspace::new("/work").with_output_dir("/out");
        assert_eq!(ws.scratch_dir, PathBuf::from("/work/mm_src"));
        assert_eq!(ws.generated_dir(), PathBuf::from("/work/variable_ttf"));
        assert_eq!(
            ws.temp_dirs(),
            vec![PathBuf::from("/work/master_ufo"), PathBuf::from("/work/master_ttf_interpolatable")]
        );
        assert_eq!(ws.family_output_dir("Example Sans"), PathBuf::from("/out/examplesansvfbeta"));
        assert_eq!(ws.template, PathBuf::from("/work/DESCRIPTION.en_us_temp.html"));
        assert_eq!(ws.compiler, "fontmake");
    }

    #[test]
    fn license_dir_is_keyed_by_normalized_name() {
        assert_eq!(
            license_dir(Path::new("ofl"), "Example Sans"),
            PathBuf::from("ofl/examplesans")
        );
    }
}
