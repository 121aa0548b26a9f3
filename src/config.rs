//! Gallery configuration
//!
//! Settings come from `config.toml` in the user's config directory (defaults
//! if the file is absent), then command-line flags override them.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::state::Filter;

const APP_NAME: &str = "image-gallery";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_THUMBNAIL_SIZE: u32 = 256;
pub const MIN_THUMBNAIL_SIZE: u32 = 32;
pub const MAX_THUMBNAIL_SIZE: u32 = 1024;
pub const DEFAULT_CARD_WIDTH: f32 = 220.0;

pub const HELP: &str = "\
image-gallery

USAGE:
  image-gallery [OPTIONS]

OPTIONS:
  --config <FILE>     Read settings from FILE instead of the default location
  --catalog <FILE>    Use FILE as the catalog database
  --import <DIR>      Import images from DIR before showing the gallery
  --manifest <FILE>   Import cards from a JSON manifest before showing the gallery
  --filter <NAME>     Start with a category filter (\"all\" shows everything)
  -h, --help          Print this help
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Catalog database; None means the platform data directory
    pub catalog_path: Option<PathBuf>,
    /// Longest thumbnail side in pixels
    pub thumbnail_size: u32,
    /// Width of a grid card in logical pixels
    pub card_width: f32,
    /// Filter applied at startup
    pub default_filter: String,
    pub theme: ThemeChoice,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            card_width: DEFAULT_CARD_WIDTH,
            default_filter: "all".to_string(),
            theme: ThemeChoice::Dark,
        }
    }
}

impl GalleryConfig {
    pub fn default_filter(&self) -> Filter {
        Filter::parse(&self.default_filter)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_THUMBNAIL_SIZE..=MAX_THUMBNAIL_SIZE).contains(&self.thumbnail_size) {
            return Err(ConfigError::Invalid {
                field: "thumbnail_size",
                reason: format!(
                    "{} is outside {}..={}",
                    self.thumbnail_size, MIN_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE
                ),
            });
        }
        if !self.card_width.is_finite() || self.card_width <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "card_width",
                reason: format!("{} is not a positive width", self.card_width),
            });
        }
        Ok(())
    }
}

/// Parsed command-line flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub help: bool,
    pub config: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub import: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub filter: Option<String>,
}

impl CliArgs {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vec(std::env::args_os().skip(1).collect())
    }

    pub fn from_vec(args: Vec<OsString>) -> Result<Self, ConfigError> {
        let mut args = pico_args::Arguments::from_vec(args);
        let cli = CliArgs {
            help: args.contains(["-h", "--help"]),
            config: args.opt_value_from_str("--config")?,
            catalog: args.opt_value_from_str("--catalog")?,
            import: args.opt_value_from_str("--import")?,
            manifest: args.opt_value_from_str("--manifest")?,
            filter: args.opt_value_from_str("--filter")?,
        };

        let remaining = args.finish();
        if !remaining.is_empty() {
            return Err(ConfigError::Invalid {
                field: "arguments",
                reason: format!("unexpected {:?}", remaining),
            });
        }
        Ok(cli)
    }

    /// Flags win over the config file
    pub fn apply(&self, config: &mut GalleryConfig) {
        if let Some(catalog) = &self.catalog {
            config.catalog_path = Some(catalog.clone());
        }
        if let Some(filter) = &self.filter {
            config.default_filter = filter.clone();
        }
    }
}

/// Default config file location, e.g. ~/.config/image-gallery/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Load the config for the given flags: `--config` if given, the default
/// location otherwise. A missing file yields the defaults.
pub fn load(cli: &CliArgs) -> Result<GalleryConfig, ConfigError> {
    let path = cli.config.clone().or_else(default_config_path);

    let mut config = match path {
        Some(path) if path.exists() => load_from_path(&path)?,
        Some(path) if cli.config.is_some() => {
            return Err(ConfigError::Io {
                path,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        _ => GalleryConfig::default(),
    };

    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}

pub fn load_from_path(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GalleryConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}
