//! Gallery application: message routing between iced and the gallery controller

use iced::keyboard::{self, key::Named, Key};
use iced::widget::{column, container, stack};
use iced::{Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

use crate::config::{GalleryConfig, ThemeChoice};
use crate::error::CatalogError;
use crate::state::catalog::Catalog;
use crate::state::import::{self, ImportResult};
use crate::state::manifest;
use crate::state::{Direction, Filter, Gallery, ImageCard, NavigationKey};
use crate::thumbnail::{self, ThumbnailBatch};
use crate::ui;

/// Thumbnails generated per background task
const THUMBNAIL_BATCH_SIZE: usize = 32;

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked a filter button
    FilterSelected(Filter),
    /// User clicked a card in the grid
    CardPressed(i64),
    /// User clicked the lightbox close button
    LightboxClosed,
    /// User clicked outside the lightbox panel
    BackdropPressed,
    /// User clicked the prev/next lightbox buttons
    Navigate(Direction),
    /// Key the lightbox reacts to
    KeyPressed(NavigationKey),
    /// User clicked the "Import Folder" button
    ImportFolder,
    /// User clicked the "Import Manifest" button
    ImportManifest,
    /// Background import finished
    ImportComplete(Result<ImportResult, String>),
    /// Catalog reload finished
    CardsLoaded(Result<Vec<ImageCard>, String>),
    /// Background thumbnail batch finished
    ThumbnailsGenerated(Result<ThumbnailBatch, String>),
}

/// Work requested on the command line, run once the window is up
#[derive(Debug, Clone, Default)]
pub struct StartupImports {
    pub folder: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

/// Main application state
pub struct GalleryApp {
    gallery: Gallery,
    config: GalleryConfig,
    /// Catalog location; background tasks open their own connection
    db_path: PathBuf,
    /// Status message shown in the header
    status: String,
    /// Cards whose thumbnail failed this session
    failed_thumbnails: Vec<i64>,
    thumbnails_running: bool,
    /// A batch was asked for while one was running; start another when it ends
    thumbnails_requested: bool,
}

impl GalleryApp {
    /// Open the catalog, build the gallery and queue startup work
    pub fn new(
        config: GalleryConfig,
        db_path: PathBuf,
        imports: StartupImports,
    ) -> Result<(Self, Task<Message>), CatalogError> {
        let catalog = Catalog::open(&db_path)?;
        catalog.verify_thumbnails(config.thumbnail_size)?;
        let cards = catalog.all_cards()?;

        log::info!("Gallery initialized with {} images", cards.len());
        let status = format!("{} images", cards.len());

        let mut gallery = Gallery::new(cards);
        gallery.filter_images(config.default_filter());

        let mut app = GalleryApp {
            gallery,
            config,
            db_path,
            status,
            failed_thumbnails: Vec::new(),
            thumbnails_running: false,
            thumbnails_requested: false,
        };

        let mut tasks = vec![app.start_thumbnails()];
        if let Some(folder) = imports.folder {
            tasks.push(app.start_folder_import(folder));
        }
        if let Some(path) = imports.manifest {
            tasks.push(app.start_manifest_import(path));
        }

        Ok((app, Task::batch(tasks)))
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FilterSelected(filter) => {
                self.gallery.filter_images(filter);
                Task::none()
            }
            Message::CardPressed(card_id) => {
                if let Err(e) = self.gallery.open_lightbox(card_id) {
                    log::warn!("Cannot open lightbox: {}", e);
                }
                Task::none()
            }
            Message::LightboxClosed => {
                self.gallery.close_lightbox();
                Task::none()
            }
            Message::BackdropPressed => {
                self.gallery.click_backdrop();
                Task::none()
            }
            Message::Navigate(direction) => {
                self.gallery.navigate_image(direction);
                Task::none()
            }
            Message::KeyPressed(key) => {
                self.gallery.handle_key(key);
                Task::none()
            }
            Message::ImportFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Folder with Images")
                    .pick_folder();

                match folder {
                    Some(folder) => self.start_folder_import(folder),
                    None => Task::none(),
                }
            }
            Message::ImportManifest => {
                let file = FileDialog::new()
                    .set_title("Select Gallery Manifest")
                    .add_filter("JSON manifest", &["json"])
                    .pick_file();

                match file {
                    Some(path) => self.start_manifest_import(path),
                    None => Task::none(),
                }
            }
            Message::ImportComplete(Ok(result)) => {
                self.status = format!(
                    "Import complete! Added {} images, skipped {} duplicates.",
                    result.imported_count, result.skipped_count
                );
                self.reload_cards()
            }
            Message::ImportComplete(Err(e)) => {
                log::error!("Import failed: {}", e);
                self.status = format!("Import failed: {}", e);
                Task::none()
            }
            Message::CardsLoaded(Ok(cards)) => {
                self.gallery.set_cards(cards);
                self.start_thumbnails()
            }
            Message::CardsLoaded(Err(e)) => {
                log::error!("Catalog reload failed: {}", e);
                self.status = format!("Catalog reload failed: {}", e);
                Task::none()
            }
            Message::ThumbnailsGenerated(Ok(batch)) => {
                self.thumbnails_running = false;
                let progressed = !batch.generated.is_empty() || !batch.failed.is_empty();

                for (card_id, path) in batch.generated {
                    self.gallery.set_thumbnail(card_id, path);
                }
                self.failed_thumbnails.extend(batch.failed);

                // The finished batch may have queried the catalog before
                // newer cards were inserted
                if (batch.more_pending && progressed) || self.thumbnails_requested {
                    self.start_thumbnails()
                } else {
                    Task::none()
                }
            }
            Message::ThumbnailsGenerated(Err(e)) => {
                self.thumbnails_running = false;
                log::warn!("Thumbnail generation failed: {}", e);
                if self.thumbnails_requested {
                    self.start_thumbnails()
                } else {
                    Task::none()
                }
            }
        }
    }

    /// Build the user interface
    pub fn view(&self) -> Element<'_, Message> {
        let grid = column![
            ui::grid::header(&self.status),
            ui::grid::filter_bar(&self.gallery),
            ui::grid::card_grid(&self.gallery, self.config.card_width),
        ]
        .spacing(20)
        .padding(24);

        let base = container(grid).width(Length::Fill).height(Length::Fill);

        match self.gallery.lightbox_view() {
            Some(lightbox) if self.gallery.scroll_locked() => {
                stack![base, ui::lightbox::view(lightbox)].into()
            }
            _ => base.into(),
        }
    }

    /// Keyboard shortcuts; the gallery itself ignores them while the lightbox is closed
    pub fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| navigation_key(&key).map(Message::KeyPressed))
    }

    pub fn theme(&self) -> Theme {
        match self.config.theme {
            ThemeChoice::Dark => Theme::Dark,
            ThemeChoice::Light => Theme::Light,
        }
    }

    fn start_folder_import(&mut self, folder: PathBuf) -> Task<Message> {
        self.status = format!("Importing from {}...", folder.display());
        Task::perform(
            import::import_folder_async(folder, self.db_path.clone()),
            Message::ImportComplete,
        )
    }

    fn start_manifest_import(&mut self, path: PathBuf) -> Task<Message> {
        self.status = format!("Importing manifest {}...", path.display());
        Task::perform(
            manifest::import_manifest_async(path, self.db_path.clone()),
            Message::ImportComplete,
        )
    }

    fn reload_cards(&self) -> Task<Message> {
        Task::perform(
            load_cards_async(self.db_path.clone()),
            Message::CardsLoaded,
        )
    }

    fn start_thumbnails(&mut self) -> Task<Message> {
        if self.thumbnails_running {
            self.thumbnails_requested = true;
            return Task::none();
        }
        self.thumbnails_running = true;
        self.thumbnails_requested = false;
        Task::perform(
            thumbnail::generate_batch_async(
                self.db_path.clone(),
                self.config.thumbnail_size,
                THUMBNAIL_BATCH_SIZE,
                self.failed_thumbnails.clone(),
            ),
            Message::ThumbnailsGenerated,
        )
    }
}

/// Map an iced key to the keys the lightbox understands
pub fn navigation_key(key: &Key) -> Option<NavigationKey> {
    match key {
        Key::Named(Named::Escape) => Some(NavigationKey::Escape),
        Key::Named(Named::ArrowLeft) => Some(NavigationKey::ArrowLeft),
        Key::Named(Named::ArrowRight) => Some(NavigationKey::ArrowRight),
        _ => None,
    }
}

async fn load_cards_async(db_path: PathBuf) -> Result<Vec<ImageCard>, String> {
    tokio::task::spawn_blocking(move || {
        let catalog = Catalog::open(&db_path)?;
        catalog.all_cards()
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
    .map_err(|e| e.to_string())
}
