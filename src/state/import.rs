//! Folder import
//!
//! Walks a folder recursively and stores every image file as a card.
//! The first folder below the import root names the card's category.

use std::path::{Component, Path};
use walkdir::WalkDir;

use super::catalog::{Catalog, InsertOutcome, NewCard};
use crate::error::CatalogError;

/// Category for images directly inside the import root
pub const UNCATEGORIZED: &str = "uncategorized";

/// Supported image file extensions
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Result of an import operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported_count: usize,
    pub skipped_count: usize,
}

/// Import all images under `folder` into the catalog
pub fn import_folder(catalog: &Catalog, folder: &Path) -> Result<ImportResult, CatalogError> {
    let mut result = ImportResult::default();

    log::info!("Scanning folder: {}", folder.display());

    let mut entries: Vec<_> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_image(e.path()))
        .map(|e| e.into_path())
        .collect();
    // Stable order regardless of the filesystem
    entries.sort();

    for path in entries {
        let card = card_for_path(folder, &path);

        match catalog.insert_card(&card)? {
            InsertOutcome::Inserted(_) => {
                result.imported_count += 1;
                if result.imported_count % 100 == 0 {
                    log::info!("Imported {} files...", result.imported_count);
                }
            }
            InsertOutcome::Duplicate => result.skipped_count += 1,
        }
    }

    log::info!(
        "Import complete: {} new, {} skipped",
        result.imported_count,
        result.skipped_count
    );

    Ok(result)
}

/// Async wrapper for the UI: opens its own connection on a blocking thread,
/// since a rusqlite Connection can't be shared with the UI thread.
pub async fn import_folder_async(
    folder: std::path::PathBuf,
    db_path: std::path::PathBuf,
) -> Result<ImportResult, String> {
    tokio::task::spawn_blocking(move || {
        let catalog = Catalog::open(&db_path)?;
        import_folder(&catalog, &folder)
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
    .map_err(|e| e.to_string())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn card_for_path(root: &Path, path: &Path) -> NewCard {
    let relative = path.strip_prefix(root).unwrap_or(path);

    // Only a file nested in a folder has a category
    let category = match relative.parent().and_then(|p| p.components().next()) {
        Some(Component::Normal(name)) => name.to_string_lossy().to_string(),
        _ => UNCATEGORIZED.to_string(),
    };

    let stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    NewCard {
        category,
        source: path.to_string_lossy().to_string(),
        title: title_from_stem(&stem),
        description: read_sidecar(path),
    }
}

/// "sunset_over-lake" -> "sunset over lake"
fn title_from_stem(stem: &str) -> String {
    stem.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description from a `<stem>.txt` file next to the image
fn read_sidecar(path: &Path) -> String {
    std::fs::read_to_string(path.with_extension("txt"))
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}
