//! Flatmap manifest.
//!
//! The manifest is a JSON object whose `sources` list names the files a
//! flatmap is built from. Conversion replaces the `slides` source with one
//! entry per saved drawing. Unknown keys are preserved in order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value, json};

use crate::batch::BatchReport;
use crate::errors::ManifestError;
use crate::log;

pub const MANIFEST_FILE: &str = "manifest.json";
const MANIFEST_TEMP: &str = "manifest.temp";

/// Source kinds written by conversion
const SLIDES_KIND: &str = "slides";
const BASE_KIND: &str = "base";
const DETAILS_KIND: &str = "details";

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Default for Manifest {
    fn default() -> Self {
        let mut fields = Map::new();
        fields.insert("sources".to_string(), Value::Array(Vec::new()));
        Self { fields }
    }
}

impl Manifest {
    /// An empty manifest: `{ "sources": [] }`
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `manifest.json` from a map directory
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_FILE);
        let text = fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|source| ManifestError::Json { path, source })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ManifestError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(ManifestError::NotObject),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    fn sources(&self) -> Result<&Vec<Value>, ManifestError> {
        match self.fields.get("sources") {
            Some(Value::Array(sources)) => Ok(sources),
            _ => Err(ManifestError::Sources),
        }
    }

    /// `href` of the presentation the map's slides come from
    pub fn slides_source(&self) -> Result<&str, ManifestError> {
        self.sources()?
            .iter()
            .find(|source| source.get("kind").and_then(Value::as_str) == Some(SLIDES_KIND))
            .and_then(|source| source.get("href"))
            .and_then(Value::as_str)
            .ok_or(ManifestError::NoSlides)
    }

    /// Replace the slides source with the saved drawings.
    ///
    /// `id` and `models` are only filled in when the manifest has none.
    pub fn update(&mut self, report: &BatchReport) -> Result<(), ManifestError> {
        let mut sources: Vec<Value> = self
            .sources()?
            .iter()
            .filter(|source| source.get("kind").and_then(Value::as_str) != Some(SLIDES_KIND))
            .cloned()
            .collect();

        if !self.fields.contains_key("id") {
            if let Some(id) = &report.id {
                self.fields.insert("id".to_string(), Value::String(id.clone()));
            }
        }
        if !self.fields.contains_key("models") {
            if let Some(models) = &report.models {
                self.fields.insert("models".to_string(), Value::String(models.clone()));
            }
        }

        for (index, saved) in report.saved.iter().enumerate() {
            let kind = if index == 0 { BASE_KIND } else { DETAILS_KIND };
            sources.push(json!({
                "id": saved.id,
                "href": saved.filename,
                "kind": kind,
            }));
        }
        log::debug!(sources = sources.len(), "updated manifest sources");
        self.fields.insert("sources".to_string(), Value::Array(sources));
        Ok(())
    }

    /// Write `manifest.json` into `dir` via a temporary file
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ManifestError> {
        let temp = dir.join(MANIFEST_TEMP);
        let path = dir.join(MANIFEST_FILE);

        let mut text = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut text, formatter);
        self.fields
            .serialize(&mut serializer)
            .map_err(|source| ManifestError::Json { path: path.clone(), source })?;
        text.push(b'\n');

        fs::write(&temp, &text).map_err(|source| ManifestError::Write {
            path: temp.clone(),
            source,
        })?;
        fs::rename(&temp, &path).map_err(|source| ManifestError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
