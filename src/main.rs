use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use photofeed::application::PhotoFeed;
use photofeed::domain::entities::{LoadingState, Photo};
use photofeed::infrastructure::{
    ApiClient, AppConfig, CliArgs, ImageLoader, ImageSlot, StorageManager, UnsplashPhotoFetcher,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_args(&args);
    Ok(config)
}

fn report(state: &LoadingState<Photo>) {
    match state {
        LoadingState::Idle => info!("Feed idle"),
        LoadingState::Loading => info!("Feed loading"),
        LoadingState::Loaded(photos) => {
            info!(count = photos.len(), "Feed loaded");
            for photo in photos.iter().take(5) {
                info!(
                    id = %photo.id,
                    likes = photo.likes,
                    by = %photo.user.username,
                    "{}",
                    photo.display_description()
                );
            }
        }
        LoadingState::Empty => info!("Feed empty"),
        LoadingState::Error(err) => warn!(error = %err, "Feed failed"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let config = load_config()?;
    init_logging(&config)?;

    info!(version = photofeed::VERSION, "Starting photofeed");

    let access_key = config.access_key.clone().ok_or_else(|| {
        eyre!("no access key configured; set UNSPLASH_ACCESS_KEY or add access_key to config.toml")
    })?;

    let api = Arc::new(match &config.base_url {
        Some(base) => ApiClient::with_base_url(base, &access_key)?,
        None => ApiClient::new(&access_key)?,
    });
    let fetcher = Arc::new(UnsplashPhotoFetcher::new(api));
    let feed = Arc::new(PhotoFeed::new(fetcher));

    let mut states = feed.subscribe();
    let observer = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            report(&state);
        }
    });

    feed.load().await;

    // Pull the first thumbnail through the cache pipeline.
    if let LoadingState::Loaded(photos) = feed.state()
        && let Some(photo) = photos.first()
    {
        let loader = ImageLoader::with_config(&config.loader_config())?;
        let slot = ImageSlot::new();
        match loader.load(&slot, &photo.urls.thumb).await {
            Some(Ok(loaded)) => info!(
                key = %loaded.key,
                source = %loaded.source,
                width = loaded.image.width(),
                height = loaded.image.height(),
                "Thumbnail ready"
            ),
            Some(Err(err)) => warn!(error = %err, "Thumbnail failed"),
            None => {}
        }
        info!(stats = %loader.cache_stats(), "Image cache");
    }

    drop(feed);
    let _ = observer.await;

    Ok(())
}
