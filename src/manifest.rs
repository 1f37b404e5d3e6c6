//! The parsed manifest and script lookup.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::parser::ParseError;

/// On-disk shape of the manifest. Unknown top-level keys are ignored.
#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    scripts: Option<BTreeMap<String, String>>,
}

/// Script name to shell command mapping, immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    scripts: BTreeMap<String, String>,
}

impl Manifest {
    #[must_use]
    pub fn new(scripts: BTreeMap<String, String>) -> Self {
        Self { scripts }
    }

    /// Decode already-normalized JSON text.
    ///
    /// A missing or `null` `scripts` key yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if `scripts` is not an object of strings.
    pub fn from_json_str(json: &str, filename: Option<&str>) -> Result<Self> {
        let file: ManifestFile = serde_json::from_str(json)
            .map_err(|err| Box::new(ParseError::from_json(&err, json, filename)))?;

        Ok(Self {
            scripts: file.scripts.unwrap_or_default(),
        })
    }

    /// Look up the command for `name`. Exact, case-sensitive match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScriptNotFound`] if no script has that name.
    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.scripts
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::ScriptNotFound(name.to_string()))
    }

    /// Script names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scripts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
