//! Batch-run configuration
//!
//! All directory locations are passed in explicitly; nothing in the
//! engine reads ambient global paths.

use crate::store::TemplateStore;
use std::path::{Path, PathBuf};

/// Directory layout for batch operations: per-bank corpora under
/// `banks_dir/<bank>/`, field lists at `fields_dir/<bank>.txt`, and
/// templates in `templates_dir`.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub banks_dir: PathBuf,
    pub fields_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl LayoutConfig {
    pub fn new(
        banks_dir: impl Into<PathBuf>,
        fields_dir: impl Into<PathBuf>,
        templates_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            banks_dir: banks_dir.into(),
            fields_dir: fields_dir.into(),
            templates_dir: templates_dir.into(),
        }
    }

    pub fn bank_folder(&self, bank: &str) -> PathBuf {
        self.banks_dir.join(bank)
    }

    pub fn field_file(&self, bank: &str) -> PathBuf {
        self.fields_dir.join(format!("{bank}.txt"))
    }

    pub fn store(&self) -> TemplateStore {
        TemplateStore::new(&self.templates_dir)
    }

    /// Convenience for tests and simple layouts where everything lives
    /// under one root: `<root>/banks`, `<root>/fields`,
    /// `<root>/templates`.
    pub fn under_root(root: &Path) -> Self {
        Self::new(root.join("banks"), root.join("fields"), root.join("templates"))
    }
}
