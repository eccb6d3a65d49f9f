use std::sync::Arc;
use std::sync::mpsc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{decrement, increment};
use crate::catalog::{Catalog, Channel, SearchHit};
use crate::events::types::AppEvent;
use crate::platform::PlatformCapabilities;
use crate::player::events::PlaybackEvent;
use crate::player::probe::StreamProbe;
use crate::player::source::StreamSource;
use crate::player::widget::StreamPlaybackWidget;
use crate::ui::notifications::NotificationManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Guide,
    Search,
    LiveTv,
}

pub struct MenuEntry {
    pub title: &'static str,
    pub screen: Option<Screen>,
}

/// Main menu of the home screen. Entries without a screen are part of the
/// boxed offer but not available in this build.
pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        title: "DIRECT TV",
        screen: Some(Screen::LiveTv),
    },
    MenuEntry {
        title: "GUIDE TV",
        screen: Some(Screen::Guide),
    },
    MenuEntry {
        title: "RECHERCHE",
        screen: Some(Screen::Search),
    },
    MenuEntry {
        title: "REPLAY",
        screen: None,
    },
    MenuEntry {
        title: "ENREGISTREMENTS",
        screen: None,
    },
    MenuEntry {
        title: "RADIOS",
        screen: None,
    },
    MenuEntry {
        title: "MES VOD",
        screen: None,
    },
    MenuEntry {
        title: "MEDIA CENTER",
        screen: None,
    },
    MenuEntry {
        title: "RÉGLAGES",
        screen: None,
    },
];

pub struct App {
    pub screen: Screen,
    pub catalog: Catalog,

    // Home
    pub selected_menu_index: usize,

    // Guide
    pub guide_channel_index: usize,
    pub guide_program_index: usize,

    // Search
    pub search_query: String,
    pub search_hits: Vec<SearchHit>,
    pub selected_hit_index: usize,

    // Live TV
    pub selected_channel_index: usize,
    pub active_channel_index: usize,
    pub show_info: bool,
    pub player: Option<StreamPlaybackWidget>,

    // Injected once at the boundary
    caps: PlatformCapabilities,
    cors_proxy: String,
    probe: Arc<dyn StreamProbe>,
    event_tx: mpsc::Sender<AppEvent>,

    pub notifications: NotificationManager,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        catalog: Catalog,
        caps: PlatformCapabilities,
        cors_proxy: String,
        probe: Arc<dyn StreamProbe>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            screen: Screen::Home,
            catalog,

            selected_menu_index: 0,

            guide_channel_index: 0,
            guide_program_index: 0,

            search_query: String::new(),
            search_hits: Vec::new(),
            selected_hit_index: 0,

            selected_channel_index: 0,
            active_channel_index: 0,
            show_info: false,
            player: None,

            caps,
            cors_proxy,
            probe,
            event_tx,

            notifications: NotificationManager::new(),
            should_quit: false,
        }
    }

    pub fn active_channel(&self) -> Option<&Channel> {
        self.catalog.channels.get(self.active_channel_index)
    }

    pub fn on_playback_event(&mut self, generation: u64, event: PlaybackEvent) {
        // An event from a superseded handle must not touch anything the
        // user sees, the toast log included.
        let current = self.player.as_ref().map(|p| p.generation());
        if current != Some(generation) {
            return;
        }

        if let PlaybackEvent::Error { ref message } = event {
            self.notifications
                .error(format!("Erreur de lecture: {}", message));
        }
        if let Some(player) = self.player.as_mut() {
            player.on_playback_event(generation, event);
        }
    }

    /// Tune the player to the channel at `index` and announce the active
    /// channel change.
    pub fn tune(&mut self, index: usize) {
        let Some(channel) = self.catalog.channels.get(index) else {
            return;
        };
        let source = StreamSource::new(channel.url.clone());
        let name = channel.name.clone();
        let show = channel.current_show.clone();

        self.active_channel_index = index;
        self.selected_channel_index = index;

        match self.player.as_mut() {
            Some(player) => player.set_source(source),
            None => {
                self.player = Some(StreamPlaybackWidget::new(
                    source,
                    self.caps,
                    self.cors_proxy.clone(),
                    self.probe.clone(),
                    self.event_tx.clone(),
                ));
            }
        }

        match show {
            Some(show) => self.notifications.info(format!("{} — {}", name, show)),
            None => self.notifications.info(name),
        }
    }

    fn zap(&mut self, forward: bool) {
        let len = self.catalog.channels.len();
        let next = if forward {
            increment(self.active_channel_index, len, true)
        } else {
            decrement(self.active_channel_index, len, true)
        };
        self.tune(next);
    }

    fn enter_screen(&mut self, screen: Screen) {
        self.screen = screen;
        match screen {
            Screen::LiveTv => {
                if self.player.is_none() {
                    self.tune(self.selected_channel_index);
                }
            }
            Screen::Search => {
                self.selected_hit_index = 0;
            }
            _ => {}
        }
    }

    /// Leaving Live TV unmounts the playback widget, which releases its
    /// handle from whatever state it was in.
    fn leave_live_tv(&mut self) {
        self.player = None;
        self.show_info = false;
    }

    pub fn handle_input(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::Home => self.handle_home_input(key),
            Screen::Guide => self.handle_guide_input(key),
            Screen::Search => self.handle_search_input(key),
            Screen::LiveTv => self.handle_live_tv_input(key),
        }
    }

    fn handle_home_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected_menu_index = increment(self.selected_menu_index, MENU.len(), true);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_menu_index = decrement(self.selected_menu_index, MENU.len(), true);
            }
            KeyCode::Enter => match MENU[self.selected_menu_index].screen {
                Some(screen) => self.enter_screen(screen),
                None => self
                    .notifications
                    .warning("Bientôt disponible dans cette offre"),
            },
            _ => {}
        }
    }

    fn handle_guide_input(&mut self, key: KeyEvent) {
        let channel_count = self.catalog.channels.len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.screen = Screen::Home,
            KeyCode::Char('j') | KeyCode::Down => {
                self.guide_channel_index = increment(self.guide_channel_index, channel_count, true);
                self.guide_program_index = 0;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.guide_channel_index = decrement(self.guide_channel_index, channel_count, true);
                self.guide_program_index = 0;
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let programs = self.guide_programs_len();
                self.guide_program_index = increment(self.guide_program_index, programs, false);
            }
            KeyCode::Char('h') | KeyCode::Left => {
                let programs = self.guide_programs_len();
                self.guide_program_index = decrement(self.guide_program_index, programs, false);
            }
            KeyCode::Enter => {
                self.selected_channel_index = self.guide_channel_index;
                self.enter_screen(Screen::LiveTv);
                self.tune(self.guide_channel_index);
            }
            _ => {}
        }
    }

    fn guide_programs_len(&self) -> usize {
        self.catalog
            .channels
            .get(self.guide_channel_index)
            .map(|c| self.catalog.programs_for(&c.id).len())
            .unwrap_or(0)
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Home;
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.refresh_search();
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.refresh_search();
            }
            KeyCode::Down => {
                self.selected_hit_index =
                    increment(self.selected_hit_index, self.search_hits.len(), true);
            }
            KeyCode::Up => {
                self.selected_hit_index =
                    decrement(self.selected_hit_index, self.search_hits.len(), true);
            }
            KeyCode::Enter => {
                if let Some(hit) = self.search_hits.get(self.selected_hit_index) {
                    let index = self
                        .catalog
                        .channels
                        .iter()
                        .position(|c| c.id == hit.channel_id);
                    if let Some(index) = index {
                        self.enter_screen(Screen::LiveTv);
                        self.tune(index);
                    }
                }
            }
            _ => {}
        }
    }

    fn refresh_search(&mut self) {
        self.search_hits = self.catalog.search(&self.search_query);
        self.selected_hit_index = 0;
    }

    fn handle_live_tv_input(&mut self, key: KeyEvent) {
        let channel_count = self.catalog.channels.len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                self.leave_live_tv();
                self.screen = Screen::Home;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected_channel_index =
                    increment(self.selected_channel_index, channel_count, true);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_channel_index =
                    decrement(self.selected_channel_index, channel_count, true);
            }
            KeyCode::Enter => self.tune(self.selected_channel_index),
            KeyCode::Char('n') | KeyCode::PageUp => self.zap(true),
            KeyCode::Char('p') | KeyCode::PageDown => self.zap(false),
            KeyCode::Char(' ') => {
                if let Some(player) = self.player.as_mut() {
                    player.toggle_play_pause();
                }
            }
            KeyCode::Char('m') => {
                if let Some(player) = self.player.as_mut() {
                    player.toggle_mute();
                }
            }
            KeyCode::Char('f') => {
                if let Some(player) = self.player.as_mut() {
                    player.toggle_full_screen();
                }
            }
            KeyCode::Char('i') => {
                self.show_info = !self.show_info;
            }
            _ => {}
        }
    }
}
