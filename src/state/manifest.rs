//! JSON gallery manifests
//!
//! A manifest lists cards explicitly instead of deriving them from a folder:
//!
//! ```json
//! { "cards": [ { "category": "nature", "src": "img/lake.jpg",
//!                "title": "Lake", "description": "Early morning" } ] }
//! ```
//!
//! Relative `src` paths resolve against the manifest's own directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::catalog::{Catalog, InsertOutcome, NewCard};
use super::import::ImportResult;
use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub cards: Vec<ManifestCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCard {
    pub category: String,
    #[serde(rename = "src")]
    pub source: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| CatalogError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert to catalog cards, resolving relative sources against `base_dir`
    pub fn to_new_cards(&self, base_dir: &Path) -> Vec<NewCard> {
        self.cards
            .iter()
            .map(|card| NewCard {
                category: card.category.trim().to_string(),
                source: resolve(base_dir, &card.source).to_string_lossy().to_string(),
                title: card.title.clone(),
                description: card.description.clone(),
            })
            .collect()
    }
}

/// Import every card of the manifest at `path` into the catalog
pub fn import_manifest(catalog: &Catalog, path: &Path) -> Result<ImportResult, CatalogError> {
    let manifest = Manifest::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut result = ImportResult::default();
    for card in manifest.to_new_cards(base_dir) {
        match catalog.insert_card(&card)? {
            InsertOutcome::Inserted(_) => result.imported_count += 1,
            InsertOutcome::Duplicate => result.skipped_count += 1,
        }
    }

    log::info!(
        "Manifest {} imported: {} new, {} skipped",
        path.display(),
        result.imported_count,
        result.skipped_count
    );
    Ok(result)
}

/// Async wrapper for the UI, same connection rules as folder import
pub async fn import_manifest_async(path: PathBuf, db_path: PathBuf) -> Result<ImportResult, String> {
    tokio::task::spawn_blocking(move || {
        let catalog = Catalog::open(&db_path)?;
        import_manifest(&catalog, &path)
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
    .map_err(|e| e.to_string())
}

fn resolve(base_dir: &Path, source: &str) -> PathBuf {
    let source = Path::new(source);
    if source.is_absolute() {
        source.to_path_buf()
    } else {
        base_dir.join(source)
    }
}
