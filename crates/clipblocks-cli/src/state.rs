//! Previous document and id mapping kept between runs.

use anyhow::{Context, Result};
use clipblocks_engine::{Document, IdMapping, Reconciliation};
use std::path::{Path, PathBuf};

const DOCUMENT_FILE: &str = "document.json";
const MAPPING_FILE: &str = "id_mapping.json";

pub struct State {
    dir: PathBuf,
    pub document: Option<Document>,
    pub id_mapping: Option<IdMapping>,
}

impl State {
    /// Reads whatever state exists in `dir`. Missing files are not an error.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            dir: dir.to_path_buf(),
            document: read_json(&dir.join(DOCUMENT_FILE))?,
            id_mapping: read_json(&dir.join(MAPPING_FILE))?,
        })
    }

    pub fn save(&self, reconciliation: &Reconciliation) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create state dir {}", self.dir.display()))?;
        write_json(&self.dir.join(DOCUMENT_FILE), &reconciliation.document)?;
        write_json(&self.dir.join(MAPPING_FILE), &reconciliation.id_mapping)?;
        log::debug!("saved state to {}", self.dir.display());
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
