//! Files written next to the binaries: license, early access marker and
//! description document.

use std::{
    fs::{read_to_string, write},
    io::ErrorKind,
    path::Path,
    sync::LazyLock,
};

use anyhow::{Context, Result};
use font_metadata::{Category, METADATA_FILENAME, read_category};
use log::warn;
use regex::Regex;

use crate::{
    config::{DESCRIPTION_FILENAME, EARLY_ACCESS_FILENAME, LICENSE_FILENAME},
    io::{copy_if_absent, create_if_absent},
};

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http[a-zA-Z0-9:./]{1,256}").expect("valid URL pattern"));

/// Description template shipped with vfbeta, used when the configured one
/// does not exist.
pub const BUNDLED_TEMPLATE: &str =
    include_str!("../../../../templates/DESCRIPTION.en_us_temp.html");

/// Placeholder used when a copyright notice carries no URL.
pub const NO_URL: &str = "None";

/// First URL embedded in a copyright notice, or `"None"`.
///
/// `Copyright the ABC Project Authors (https://www.github.com/mrc/sans)`
/// yields `https://www.github.com/mrc/sans`.
pub fn project_url(copyright: &str) -> &str {
    URL_PATTERN.find(copyright).map_or(NO_URL, |m| m.as_str())
}

/// Copy `OFL.txt` from the family's license folder unless `dest` has one.
pub fn copy_license(license_dir: &Path, dest: &Path) -> Result<bool> {
    copy_if_absent(&license_dir.join(LICENSE_FILENAME), &dest.join(LICENSE_FILENAME))
}

/// Category recorded in the family's `METADATA.pb`.
pub fn resolve_category(license_dir: &Path) -> Result<Category> {
    let path = license_dir.join(METADATA_FILENAME);
    read_category(&path).with_context(|| format!("No usable category in {}", path.display()))
}

/// Write `EARLY_ACCESS.category` unless `dest` already has one.
pub fn write_early_access(dest: &Path, category: Category) -> Result<bool> {
    create_if_absent(&dest.join(EARLY_ACCESS_FILENAME), category.label())
}

/// Fill the description template. Values are inserted verbatim, unescaped.
pub fn render_description(template: &str, designer: &str, category: Category, url: &str) -> String {
    template
        .replace("{{ designer }}", designer)
        .replace("{{ category }}", category.label())
        .replace("{{ git_url }}", url)
}

/// Render the template at `template_path` into `dest`, replacing any
/// existing description.
pub fn write_description(
    dest: &Path,
    template_path: &Path,
    designer: &str,
    category: Category,
    copyright: &str,
) -> Result<()> {
    let template = load_template(template_path)?;
    let html = render_description(&template, designer, category, project_url(copyright));
    let path = dest.join(DESCRIPTION_FILENAME);
    write(&path, html).with_context(|| format!("Failed to write {}", path.display()))
}

fn load_template(path: &Path) -> Result<String> {
    match read_to_string(path) {
        Ok(template) => Ok(template),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Template {} not found, using the bundled one", path.display());
            Ok(BUNDLED_TEMPLATE.to_string())
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read template {}", path.display()))
        }
    }
}
