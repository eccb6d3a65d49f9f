/// Event emitted asynchronously by a player handle's worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Ready,
    Error { message: String },
}

/// Where the widget is in its lifecycle. `Error` keeps the message around
/// for display; recovery only happens through a source change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackPhase {
    Uninitialized,
    Loading,
    Ready,
    Paused,
    Error(PlaybackError),
    /// Live playback is categorically unavailable here; no handle was ever
    /// acquired and this is not an error state.
    Unsupported,
}

impl PlaybackPhase {
    pub fn is_error(&self) -> bool {
        matches!(self, PlaybackPhase::Error(_))
    }

    /// Playback controls are only shown once a stream has loaded.
    pub fn shows_controls(&self) -> bool {
        matches!(self, PlaybackPhase::Ready | PlaybackPhase::Paused)
    }
}

/// What went wrong, split by when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackErrorKind {
    /// The handle failed before ever reaching `Ready`: network failure,
    /// 404, codec rejection.
    SourceUnreachable,
    /// The stream dropped after playback had started.
    PlaybackInterrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackError {
    pub kind: PlaybackErrorKind,
    pub message: String,
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Playback Error: {}", self.message)
    }
}
