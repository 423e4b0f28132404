//! Typed view over a `.glyphs` document.

use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;

use crate::{
    error::{Error, Result},
    plist::Plist,
};

const FAMILY_NAME_KEY: &str = "familyName";
const DESIGNER_KEY: &str = "designer";
const COPYRIGHT_KEY: &str = "copyright";
const MASTERS_KEY: &str = "fontMaster";
const INSTANCES_KEY: &str = "instances";
const PROPERTIES_KEY: &str = "properties";

/// Summary of the fields the batch pipeline needs from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSourceRecord {
    pub family_name: String,
    pub designer: String,
    pub copyright: String,
    pub master_count: usize,
    pub instance_count: usize,
}

impl FontSourceRecord {
    /// Whether the source can be built as a variable font: at least two
    /// masters, at least three instances, and not one instance per master.
    pub fn is_variable_candidate(&self) -> bool {
        self.master_count >= 2
            && self.instance_count >= 3
            && self.master_count != self.instance_count
    }
}

/// A parsed Glyphs source bound to the file it was loaded from.
#[derive(Debug, Clone)]
pub struct GlyphsSource {
    path: PathBuf,
    root: IndexMap<String, Plist>,
}

impl GlyphsSource {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        Self::parse(path, &text)
    }

    /// Parse source text as if it had been read from `path`.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        match Plist::parse(text) {
            Ok(Plist::Dictionary(root)) => Ok(Self { path, root }),
            Ok(_) => Err(Error::NotADictionary),
            Err(source) => Err(Error::Parse { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn family_name(&self) -> Result<&str> {
        self.string(FAMILY_NAME_KEY)?.ok_or(Error::MissingKey(FAMILY_NAME_KEY))
    }

    /// Designer name, or an empty string when the source does not record one.
    pub fn designer(&self) -> &str {
        self.metadata_string(DESIGNER_KEY, "designers")
    }

    /// Copyright notice, or an empty string when the source does not record one.
    pub fn copyright(&self) -> &str {
        self.metadata_string(COPYRIGHT_KEY, "copyrights")
    }

    pub fn master_count(&self) -> Result<usize> {
        self.array_len(MASTERS_KEY)
    }

    pub fn instance_count(&self) -> Result<usize> {
        self.array_len(INSTANCES_KEY)
    }

    pub fn record(&self) -> Result<FontSourceRecord> {
        Ok(FontSourceRecord {
            family_name: self.family_name()?.to_string(),
            designer: self.designer().to_string(),
            copyright: self.copyright().to_string(),
            master_count: self.master_count()?,
            instance_count: self.instance_count()?,
        })
    }

    pub fn set_family_name(&mut self, name: &str) {
        self.root.insert(FAMILY_NAME_KEY.to_string(), Plist::String(name.to_string()));
    }

    pub fn to_text(&self) -> String {
        Plist::Dictionary(self.root.clone()).to_text()
    }

    /// Write the document back to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        write(&self.path, self.to_text())
            .map_err(|source| Error::Write { path: self.path.clone(), source })
    }

    fn string(&self, key: &'static str) -> Result<Option<&str>> {
        match self.root.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or(Error::UnexpectedType { key, expected: "a string" }),
        }
    }

    fn array_len(&self, key: &'static str) -> Result<usize> {
        self.root
            .get(key)
            .ok_or(Error::MissingKey(key))?
            .as_array()
            .map(<[_]>::len)
            .ok_or(Error::UnexpectedType { key, expected: "an array" })
    }

    // Glyphs 2 stores these at the top level; Glyphs 3 moves them into the
    // `properties` array as either a single `value` or localized `values`.
    fn metadata_string(&self, key: &'static str, plural: &str) -> &str {
        if let Some(value) = self.root.get(key).and_then(Plist::as_str) {
            return value;
        }
        self.root
            .get(PROPERTIES_KEY)
            .and_then(Plist::as_array)
            .into_iter()
            .flatten()
            .find(|prop| {
                prop.get("key")
                    .and_then(Plist::as_str)
                    .is_some_and(|k| k == key || k == plural)
            })
            .and_then(|prop| {
                prop.get("value").and_then(Plist::as_str).or_else(|| {
                    prop.get("values")
                        .and_then(Plist::as_array)
                        .and_then(<[_]>::first)
                        .and_then(|v| v.get("value"))
                        .and_then(Plist::as_str)
                })
            })
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs2(masters: usize, instances: usize) -> String {
        let masters: Vec<String> =
            (0..masters).map(|i| format!("{{\nid = \"m{i}\";\nweightValue = {i}00;\n}}")).collect();
        let instances: Vec<String> =
            (0..instances).map(|i| format!("{{\nname = \"Style{i}\";\n}}")).collect();
        format!(
            "{{\n.appVersion = \"1100\";\ncopyright = \"Copyright 2017 The Example Project Authors (https://github.com/example/sans)\";\ndesigner = \"Jane <Doe>\";\nfamilyName = \"Example Sans\";\nfontMaster = (\n{}\n);\ninstances = (\n{}\n);\nunitsPerEm = 1000;\n}}\n",
            masters.join(",\n"),
            instances.join(",\n"),
        )
    }

    #[test]
    fn record_from_glyphs2_source() {
        let source = GlyphsSource::parse("Example.glyphs", &glyphs2(2, 4)).unwrap();
        let record = source.record().unwrap();
        assert_eq!(record.family_name, "Example Sans");
        assert_eq!(record.designer, "Jane <Doe>");
        assert!(record.copyright.contains("github.com/example/sans"));
        assert_eq!(record.master_count, 2);
        assert_eq!(record.instance_count, 4);
        assert!(record.is_variable_candidate());
    }

    #[test]
    fn glyphs3_properties() {
        let text = r#"{
.formatVersion = 3;
familyName = "Three";
fontMaster = ();
instances = ();
properties = (
{
key = designers;
values = (
{
language = dflt;
value = "Ada";
}
);
},
{
key = copyrights;
values = (
{
language = dflt;
value = "Copyright 2020 (http://example.com/three)";
}
);
}
);
}"#;
        let source = GlyphsSource::parse("Three.glyphs", text).unwrap();
        assert_eq!(source.designer(), "Ada");
        assert_eq!(source.copyright(), "Copyright 2020 (http://example.com/three)");
    }

    #[test]
    fn missing_designer_is_empty() {
        let source =
            GlyphsSource::parse("x.glyphs", "{familyName = X; fontMaster = (); instances = ();}")
                .unwrap();
        assert_eq!(source.designer(), "");
        assert_eq!(source.copyright(), "");
    }

    #[test]
    fn missing_instances_is_an_error() {
        let source = GlyphsSource::parse("x.glyphs", "{familyName = X; fontMaster = ();}").unwrap();
        assert!(matches!(source.instance_count(), Err(Error::MissingKey("instances"))));
    }

    #[test]
    fn non_array_masters_is_an_error() {
        let source =
            GlyphsSource::parse("x.glyphs", "{fontMaster = \"oops\"; instances = ();}").unwrap();
        assert!(matches!(source.master_count(), Err(Error::UnexpectedType { .. })));
    }

    #[test]
    fn root_must_be_a_dictionary() {
        assert!(matches!(GlyphsSource::parse("x.glyphs", "(1, 2)"), Err(Error::NotADictionary)));
    }

    #[test]
    fn variable_candidate_rules() {
        let record = |master_count, instance_count| FontSourceRecord {
            family_name: String::new(),
            designer: String::new(),
            copyright: String::new(),
            master_count,
            instance_count,
        };
        assert!(record(2, 3).is_variable_candidate());
        assert!(record(3, 8).is_variable_candidate());
        assert!(record(4, 3).is_variable_candidate());
        assert!(!record(1, 5).is_variable_candidate());
        assert!(!record(2, 2).is_variable_candidate());
        assert!(!record(3, 3).is_variable_candidate());
        assert!(!record(0, 0).is_variable_candidate());
    }

    #[test]
    fn set_family_name_survives_round_trip() {
        let mut source = GlyphsSource::parse("Example.glyphs", &glyphs2(2, 4)).unwrap();
        source.set_family_name("Example Sans VF Beta");
        let reparsed = GlyphsSource::parse("Example.glyphs", &source.to_text()).unwrap();
        assert_eq!(reparsed.family_name().unwrap(), "Example Sans VF Beta");
        assert_eq!(reparsed.designer(), "Jane <Doe>");
        assert_eq!(reparsed.master_count().unwrap(), 2);
        assert_eq!(reparsed.instance_count().unwrap(), 4);
    }
}
