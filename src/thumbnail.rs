use image::imageops::FilterType;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ThumbnailError;
use crate::state::catalog::Catalog;

/// Outcome of one background thumbnail batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailBatch {
    /// (card id, thumbnail path) for every thumbnail written
    pub generated: Vec<(i64, String)>,
    /// Cards whose source could not be decoded
    pub failed: Vec<i64>,
    /// More cards may be waiting
    pub more_pending: bool,
}

/// Root of the thumbnail cache.
/// Returns ~/.cache/image-gallery/thumbnails on Linux
pub fn thumbnail_root() -> Result<PathBuf, ThumbnailError> {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .ok_or(ThumbnailError::NoCacheDir)?;

    path.push("image-gallery");
    path.push("thumbnails");
    Ok(path)
}

/// Cache subdirectory owned by the catalog at `db_path`.
///
/// Card IDs are only unique within one catalog, so each catalog gets its own
/// directory named after a hash of its canonical path.
pub fn catalog_cache_dir(root: &Path, db_path: &Path) -> PathBuf {
    let canonical = db_path
        .canonicalize()
        .unwrap_or_else(|_| db_path.to_path_buf());
    let hash = blake3::hash(canonical.to_string_lossy().as_bytes()).to_hex();
    root.join(&hash.as_str()[..16])
}

/// Get the thumbnail cache directory for a catalog, creating it if needed
pub fn thumbnail_cache_dir(db_path: &Path) -> Result<PathBuf, ThumbnailError> {
    let path = catalog_cache_dir(&thumbnail_root()?, db_path);

    fs::create_dir_all(&path).map_err(|source| ThumbnailError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Expected thumbnail path for a card (doesn't generate anything)
pub fn thumbnail_path(cache_dir: &Path, card_id: i64) -> PathBuf {
    cache_dir.join(format!("{}.jpg", card_id))
}

/// Generate a square-bounded JPEG thumbnail for `source`.
/// Aspect ratio is preserved; the longer side becomes `size` pixels.
pub fn generate_thumbnail(
    source: &Path,
    card_id: i64,
    size: u32,
    cache_dir: &Path,
) -> Result<PathBuf, ThumbnailError> {
    let img = image::open(source).map_err(|e| ThumbnailError::Image {
        path: source.to_path_buf(),
        source: e,
    })?;

    let thumbnail = img.resize(size, size, FilterType::Lanczos3);

    // JPEG has no alpha channel
    let path = thumbnail_path(cache_dir, card_id);
    thumbnail
        .to_rgb8()
        .save(&path)
        .map_err(|e| ThumbnailError::Image {
            path: path.clone(),
            source: e,
        })?;

    log::debug!("Generated thumbnail: {}", path.display());
    Ok(path)
}

/// Generate up to `limit` pending thumbnails and record them in the catalog.
/// Cards listed in `skip` already failed once and are not retried.
pub fn generate_batch(
    catalog: &Catalog,
    cache_dir: &Path,
    size: u32,
    limit: usize,
    skip: &[i64],
) -> Result<ThumbnailBatch, crate::error::CatalogError> {
    let pending: Vec<_> = catalog
        .pending_thumbnails(limit + skip.len() + 1)?
        .into_iter()
        .filter(|card| !skip.contains(&card.id))
        .collect();

    let mut batch = ThumbnailBatch {
        more_pending: pending.len() > limit,
        ..ThumbnailBatch::default()
    };

    for card in pending.into_iter().take(limit) {
        match generate_thumbnail(Path::new(&card.source), card.id, size, cache_dir) {
            Ok(path) => {
                let path = path.to_string_lossy().to_string();
                catalog.set_thumbnail(card.id, &path, size)?;
                batch.generated.push((card.id, path));
            }
            Err(e) => {
                log::warn!("Thumbnail failed for {}: {}", card.source, e);
                batch.failed.push(card.id);
            }
        }
    }

    Ok(batch)
}

/// Async wrapper for the UI. Decoding is CPU-bound, so it runs on a blocking thread
/// with its own catalog connection.
pub async fn generate_batch_async(
    db_path: PathBuf,
    size: u32,
    limit: usize,
    skip: Vec<i64>,
) -> Result<ThumbnailBatch, String> {
    tokio::task::spawn_blocking(move || {
        let cache_dir = thumbnail_cache_dir(&db_path).map_err(|e| e.to_string())?;
        let catalog = Catalog::open(&db_path).map_err(|e| e.to_string())?;
        generate_batch(&catalog, &cache_dir, size, limit, &skip).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::catalog::NewCard;
    use image::{Rgba, RgbaImage};

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 128]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_generate_thumbnail_preserves_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wide.png");
        write_png(&source, 400, 200);

        let path = generate_thumbnail(&source, 7, 100, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("7.jpg"));

        let thumb = image::open(&path).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (100, 50));
    }

    #[test]
    fn test_generate_thumbnail_bad_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.png");
        fs::write(&source, b"not an image").unwrap();

        let err = generate_thumbnail(&source, 1, 64, dir.path()).unwrap_err();
        assert!(matches!(err, ThumbnailError::Image { .. }));
    }

    #[test]
    fn test_batch_records_thumbnails_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        write_png(&good, 50, 50);

        let catalog = Catalog::open_in_memory().unwrap();
        for source in [good.to_string_lossy().to_string(), "/missing/file.png".to_string()] {
            catalog
                .insert_card(&NewCard {
                    category: "x".to_string(),
                    source,
                    title: "t".to_string(),
                    description: String::new(),
                })
                .unwrap();
        }

        let batch = generate_batch(&catalog, dir.path(), 32, 10, &[]).unwrap();
        assert_eq!(batch.generated.len(), 1);
        assert_eq!(batch.failed.len(), 1);
        assert!(!batch.more_pending);

        // Failed cards stay pending but are skipped on the next pass
        let again = generate_batch(&catalog, dir.path(), 32, 10, &batch.failed).unwrap();
        assert!(again.generated.is_empty());
        assert!(again.failed.is_empty());
    }

    #[test]
    fn test_catalogs_keep_separate_thumbnails() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cache");

        let red = dir.path().join("red.png");
        let blue = dir.path().join("blue.png");
        RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 255])).save(&red).unwrap();
        RgbaImage::from_pixel(40, 40, Rgba([0, 0, 255, 255])).save(&blue).unwrap();

        let mut recorded = Vec::new();
        for (name, source) in [("a.db", &red), ("b.db", &blue)] {
            let db_path = dir.path().join(name);
            let catalog = Catalog::open(&db_path).unwrap();
            catalog
                .insert_card(&NewCard {
                    category: "x".to_string(),
                    source: source.to_string_lossy().to_string(),
                    title: name.to_string(),
                    description: String::new(),
                })
                .unwrap();

            let cache_dir = catalog_cache_dir(&root, &db_path);
            fs::create_dir_all(&cache_dir).unwrap();
            let batch = generate_batch(&catalog, &cache_dir, 16, 10, &[]).unwrap();
            // Both catalogs number their first card 1
            assert_eq!(batch.generated[0].0, 1);
            recorded.push(batch.generated[0].1.clone());
        }

        assert_ne!(recorded[0], recorded[1]);

        let first = image::open(&recorded[0]).unwrap().to_rgb8();
        let pixel = first.get_pixel(8, 8);
        assert!(pixel[0] > 200 && pixel[2] < 50, "catalog a shows {:?}", pixel);
    }

    #[test]
    fn test_catalog_cache_dir_is_stable() {
        let root = Path::new("/cache");
        let a = catalog_cache_dir(root, Path::new("/nowhere/a.db"));
        assert_eq!(a, catalog_cache_dir(root, Path::new("/nowhere/a.db")));
        assert_ne!(a, catalog_cache_dir(root, Path::new("/nowhere/b.db")));
        assert!(a.starts_with(root));
    }
}
