//! On-disk template store
//!
//! One JSON file per bank, `template_<bank>.json`, in the shape the
//! comparator consumes. A template that fails to deserialize is rejected
//! at load time rather than surfacing as confusing anomalies later.

use crate::template::Template;
use crate::LayoutError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, bank: &str) -> PathBuf {
        self.dir.join(format!("template_{bank}.json"))
    }

    /// Load the template for a bank. Absent file maps to
    /// [`LayoutError::TemplateNotFound`]; a present but undecodable file
    /// maps to [`LayoutError::MalformedTemplate`].
    pub fn load(&self, bank: &str) -> Result<Template, LayoutError> {
        let path = self.path_for(bank);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LayoutError::TemplateNotFound {
                    bank: bank.to_string(),
                    path,
                })
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|e| LayoutError::MalformedTemplate {
            path,
            reason: e.to_string(),
        })
    }

    /// Persist a freshly synthesized template, creating the store
    /// directory if needed. Returns the written path.
    pub fn save(&self, bank: &str, template: &Template) -> Result<PathBuf, LayoutError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(bank);
        fs::write(&path, serde_json::to_string_pretty(template)?)?;
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
