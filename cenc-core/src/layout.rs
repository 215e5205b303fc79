use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CencError, Result, Stage};

/// Fixed set of members packed from an application root: loose files first,
/// then directories, each in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RootLayout {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

impl Default for RootLayout {
    fn default() -> Self {
        Self {
            files: vec!["init.lua".into(), "otclientrc.lua".into()],
            dirs: vec!["data".into()],
        }
    }
}

impl RootLayout {
    /// Input paths for `root`, ready for discovery.
    pub fn expand(&self, root: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .chain(&self.dirs)
            .map(|member| root.join(member))
            .collect()
    }

    /// Load a layout from a JSON file of the form `{"files": [...], "dirs": [...]}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read(path).map_err(|e| CencError::io(Stage::Discovery, path, e))?;
        serde_json::from_slice(&text)
            .map_err(|e| CencError::Config(format!("layout {}: {e}", path.display())))
    }
}
