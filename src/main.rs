use std::{io, sync::Arc, sync::mpsc, time::Duration};

use crate::{
    app::state::App,
    catalog::Catalog,
    events::types::AppEvent,
    player::probe::HttpProbe,
    ui::{
        artwork::{ImageCache, LogoFetcher, LogoMessage},
        loading::LoadingAnimation,
    },
};

mod app;
mod catalog;
mod config;
mod events;
mod input;
mod platform;
mod player;
mod ui;

fn main() -> io::Result<()> {
    let config = config::load_or_create_config();
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            panic!("Failed to load config: {}", err);
        }
    };

    ui::theme::init_theme(config.theme);

    let catalog = match config.catalog_path {
        Some(ref path) => match Catalog::load(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                panic!("Failed to load catalog: {:#}", err);
            }
        },
        None => Catalog::builtin(),
    };

    let mut terminal = ratatui::init();
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();

    let _input_handle = input::thread::spawn(event_tx.clone());

    let mut app = App::new(
        catalog,
        config.platform,
        config.cors_proxy,
        Arc::new(HttpProbe::new()),
        event_tx,
    );

    let mut spinner = LoadingAnimation::new();
    let mut image_cache = ImageCache::new();
    let logo_fetcher = LogoFetcher::new();
    let mut last_channel_id: Option<String> = None;

    loop {
        while let Ok(msg) = logo_fetcher.try_recv() {
            match msg {
                LogoMessage::Loaded { channel_id, data } => {
                    if let Err(e) = image_cache.load_logo(&channel_id, &data) {
                        app.notifications.warning(format!("Logo: {}", e));
                    }
                }
                LogoMessage::Error { .. } => {
                    // A missing logo is cosmetic; the channel name renders
                    // in its place.
                }
            }
        }

        let tuned = app
            .player
            .as_ref()
            .and_then(|_| app.active_channel())
            .map(|c| (c.id.clone(), c.logo.clone()));
        match tuned {
            Some((channel_id, logo)) => {
                if last_channel_id.as_ref() != Some(&channel_id) {
                    if let Some(logo) = logo {
                        logo_fetcher.fetch(channel_id.clone(), logo);
                    }
                    last_channel_id = Some(channel_id);
                }
            }
            None => {
                if last_channel_id.is_some() {
                    last_channel_id = None;
                    image_cache.clear();
                }
            }
        }

        spinner.tick();
        app.notifications.tick();

        terminal.draw(|f| ui::render::render(f, &app, &spinner, &mut image_cache))?;

        match event_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(event) => match event {
                AppEvent::Input(key_event) => app.handle_input(key_event),
                AppEvent::Resize(_width, _height) => {}
                AppEvent::Playback { generation, event } => {
                    app.on_playback_event(generation, event)
                }
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                panic!("Event channel disconnected");
            }
        }

        if app.should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}
