use std::sync::Arc;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::{Fetch, HttpFetcher};
use crate::config;
use crate::error::CatalogResult;
use crate::player::{LoadTokens, TransportController};

use super::loader::CatalogLoader;

/// Everything the event loop drives, wired together from settings.
pub struct Components {
    pub app: App,
    pub controller: TransportController<AudioPlayer>,
    pub loader: CatalogLoader,
}

/// Build the fetcher, audio thread, controller and loader, and start
/// loading the album directory in the background.
pub fn start(settings: &config::Settings) -> CatalogResult<Components> {
    let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(&settings.server)?);
    tracing::info!(base_url = %settings.server.base_url, "music server");

    let tokens = LoadTokens::new();
    let audio = AudioPlayer::new(fetcher.clone(), tokens.clone());
    let controller = TransportController::new(audio, tokens, settings.audio.initial_volume);

    let loader = CatalogLoader::new(fetcher, &settings.catalog);
    loader.spawn_albums();

    Ok(Components {
        app: App::new(&settings.ui),
        controller,
        loader,
    })
}
