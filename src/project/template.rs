use super::marker::Marker;
use crate::errors::{HighlightResult, ProjectError};
use log::debug;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// An editor project document that marker lists are inserted into.
///
/// Loaded once and handed to whatever builds output documents; the
/// template itself is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTemplate {
    document: Value,
}

impl ProjectTemplate {
    /// Load a template from a project file
    pub fn load<P: AsRef<Path>>(path: P) -> HighlightResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ProjectError::new(format!(
                "failed to read project template {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded project template {} ({} bytes)", path.display(), text.len());
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> HighlightResult<Self> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(document)
    }

    /// The document must be an object with a `timeline` object.
    pub fn from_value(document: Value) -> HighlightResult<Self> {
        match document.get("timeline") {
            Some(Value::Object(_)) => Ok(Self { document }),
            Some(_) => Err(ProjectError::new("template 'timeline' is not an object").into()),
            None => Err(ProjectError::new("template has no 'timeline' object").into()),
        }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// A copy of the template whose `timeline.parameters` holds only the
    /// marker list, at `toc.keyframes`.
    pub fn render(&self, markers: &[Marker]) -> HighlightResult<Value> {
        let keyframes = serde_json::to_value(markers)?;
        let mut document = self.document.clone();
        let timeline = document
            .get_mut("timeline")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ProjectError::new("template has no 'timeline' object"))?;
        let mut toc = Map::new();
        toc.insert("keyframes".to_string(), keyframes);
        let mut parameters = Map::new();
        parameters.insert("toc".to_string(), Value::Object(toc));
        timeline.insert("parameters".to_string(), Value::Object(parameters));
        Ok(document)
    }

    /// Render as pretty-printed JSON with two-space indentation.
    pub fn render_pretty(&self, markers: &[Marker]) -> HighlightResult<String> {
        Ok(serde_json::to_string_pretty(&self.render(markers)?)?)
    }
}
