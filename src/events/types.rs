use crossterm::event::KeyEvent;

use crate::player::events::PlaybackEvent;

#[derive(Debug, Clone)]
pub enum AppEvent {
    // From input thread
    Input(KeyEvent),
    Resize(u16, u16),

    // From a player handle worker, tagged with the handle generation so
    // events from a released handle can be discarded.
    Playback {
        generation: u64,
        event: PlaybackEvent,
    },
}
