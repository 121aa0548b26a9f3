use image_gallery::app::{GalleryApp, StartupImports};
use image_gallery::config::{self, CliArgs};
use image_gallery::state::catalog::Catalog;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match CliArgs::from_env() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}\n\n{}", e, config::HELP);
            return ExitCode::FAILURE;
        }
    };
    if cli.help {
        print!("{}", config::HELP);
        return ExitCode::SUCCESS;
    }

    let config = match config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let db_path = match config.catalog_path.clone().map_or_else(Catalog::default_path, Ok) {
        Ok(path) => path,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let imports = StartupImports {
        folder: cli.import.clone(),
        manifest: cli.manifest.clone(),
    };

    // The app cannot function without its catalog, so fail before opening a window
    let (app, startup) = match GalleryApp::new(config, db_path, imports) {
        Ok(initialized) => initialized,
        Err(e) => {
            log::error!("Failed to open the catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = iced::application("Image Gallery", GalleryApp::update, GalleryApp::view)
        .theme(GalleryApp::theme)
        .subscription(GalleryApp::subscription)
        .centered()
        .run_with(move || (app, startup));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
