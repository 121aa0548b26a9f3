use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};

use super::data::ImageCard;
use crate::error::CatalogError;

/// A card that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub category: String,
    pub source: String,
    pub title: String,
    pub description: String,
}

/// Outcome of inserting a card into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored with this ID
    Inserted(i64),
    /// A card with the same source already exists
    Duplicate,
}

/// The Catalog manages the SQLite database of gallery cards.
/// Cards keep the order in which they were inserted.
pub struct Catalog {
    conn: Connection,
    db_path: PathBuf,
}

impl Catalog {
    /// Open (or create) the catalog at `db_path` and initialize the schema.
    pub fn open(db_path: &Path) -> Result<Self, CatalogError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(db_path)?;
        log::info!("Catalog opened at: {}", db_path.display());

        let catalog = Catalog {
            conn,
            db_path: db_path.to_path_buf(),
        };
        catalog.init_schema()?;
        Ok(catalog)
    }

    /// Open a throwaway catalog in memory
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let catalog = Catalog {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        catalog.init_schema()?;
        Ok(catalog)
    }

    /// Get the default catalog location:
    /// - Linux: ~/.local/share/image-gallery/gallery.db
    /// - macOS: ~/Library/Application Support/image-gallery/gallery.db
    /// - Windows: %APPDATA%\image-gallery\gallery.db
    pub fn default_path() -> Result<PathBuf, CatalogError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(CatalogError::NoDataDir)?;

        path.push("image-gallery");
        path.push("gallery.db");
        Ok(path)
    }

    /// Create all tables and indexes if they don't exist
    fn init_schema(&self) -> Result<(), CatalogError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS cards (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                source          TEXT NOT NULL UNIQUE,
                category        TEXT NOT NULL,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL DEFAULT '',
                thumbnail_path  TEXT,
                thumbnail_size  INTEGER,
                position        INTEGER NOT NULL,
                imported_at     INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cards_position ON cards(position)",
            [],
        )?;

        // Catalogs created before thumbnail sizes were recorded.
        // Fails harmlessly if the column already exists.
        let _ = self.conn.execute(
            "ALTER TABLE cards ADD COLUMN thumbnail_size INTEGER",
            [],
        );

        log::debug!("Catalog schema initialized");
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Count the cards in the catalog
    pub fn card_count(&self) -> Result<i64, CatalogError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a card at the end of the catalog.
    /// A card whose source is already stored is reported as a duplicate.
    pub fn insert_card(&self, card: &NewCard) -> Result<InsertOutcome, CatalogError> {
        let last: Option<i64> = self
            .conn
            .query_row("SELECT MAX(position) FROM cards", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .flatten();
        let position = last.map_or(0, |p| p + 1);

        let result = self.conn.execute(
            "INSERT INTO cards (source, category, title, description, position, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &card.source,
                &card.category,
                &card.title,
                &card.description,
                position,
                Utc::now().timestamp(),
            ],
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted(self.conn.last_insert_rowid())),
            // UNIQUE constraint on source
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get all cards in catalog order
    pub fn all_cards(&self) -> Result<Vec<ImageCard>, CatalogError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, source, thumbnail_path, title, description
             FROM cards ORDER BY position, id",
        )?;

        let cards = stmt
            .query_map([], Self::card_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    /// Get cards that have no thumbnail yet
    pub fn pending_thumbnails(&self, limit: usize) -> Result<Vec<ImageCard>, CatalogError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, source, thumbnail_path, title, description
             FROM cards
             WHERE thumbnail_path IS NULL
             ORDER BY position, id
             LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cards = stmt
            .query_map([limit], Self::card_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    /// Record the thumbnail generated for a card and the size it was made at
    pub fn set_thumbnail(
        &self,
        card_id: i64,
        thumbnail_path: &str,
        size: u32,
    ) -> Result<(), CatalogError> {
        self.conn.execute(
            "UPDATE cards SET thumbnail_path = ?1, thumbnail_size = ?2 WHERE id = ?3",
            params![thumbnail_path, size, card_id],
        )?;
        Ok(())
    }

    /// Verify cached thumbnails still exist on disk and were made at `size`.
    /// Missing or stale ones are cleared so they get regenerated.
    pub fn verify_thumbnails(&self, size: u32) -> Result<usize, CatalogError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, thumbnail_path, thumbnail_size FROM cards WHERE thumbnail_path IS NOT NULL",
        )?;

        let cached: Vec<(i64, String, Option<u32>)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut reset_count = 0;
        for (id, thumbnail_path, thumbnail_size) in cached {
            if thumbnail_size != Some(size) || !Path::new(&thumbnail_path).exists() {
                self.conn.execute(
                    "UPDATE cards SET thumbnail_path = NULL, thumbnail_size = NULL WHERE id = ?1",
                    params![id],
                )?;
                reset_count += 1;
            }
        }

        if reset_count > 0 {
            log::info!("Reset {} missing or stale thumbnails", reset_count);
        }

        Ok(reset_count)
    }

    fn card_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImageCard> {
        Ok(ImageCard {
            id: row.get(0)?,
            category: row.get(1)?,
            source: row.get(2)?,
            thumbnail: row.get(3)?,
            title: row.get(4)?,
            description: row.get(5)?,
        })
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("db_path", &self.db_path)
            .finish()
    }
}
