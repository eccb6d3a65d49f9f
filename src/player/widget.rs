use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::events::types::AppEvent;
use crate::platform::PlatformCapabilities;
use crate::player::events::{PlaybackError, PlaybackErrorKind, PlaybackEvent, PlaybackPhase};
use crate::player::handle::{PlayerHandle, Subscription};
use crate::player::probe::StreamProbe;
use crate::player::source::StreamSource;

/// Renders a single live or on-demand stream and owns its player handle.
///
/// The widget is a pure function of the injected capabilities and the
/// current source: it never inspects the host runtime. Playback errors are
/// absorbed into display state and never escape to the container.
pub struct StreamPlaybackWidget {
    caps: PlatformCapabilities,
    proxy_base: String,
    probe: Arc<dyn StreamProbe>,
    event_tx: Sender<AppEvent>,

    source: StreamSource,
    normalized: StreamSource,
    handle: Option<PlayerHandle>,
    subscription: Option<Subscription>,
    generation: u64,

    phase: PlaybackPhase,
    is_full_screen: bool,
}

impl StreamPlaybackWidget {
    pub fn new(
        source: StreamSource,
        caps: PlatformCapabilities,
        proxy_base: impl Into<String>,
        probe: Arc<dyn StreamProbe>,
        event_tx: Sender<AppEvent>,
    ) -> Self {
        let normalized = source.clone();
        let mut widget = Self {
            caps,
            proxy_base: proxy_base.into(),
            probe,
            event_tx,
            source,
            normalized,
            handle: None,
            subscription: None,
            generation: 0,
            phase: PlaybackPhase::Uninitialized,
            is_full_screen: false,
        };
        widget.construct();
        widget
    }

    /// The construction contract: normalize the URI, acquire a handle bound
    /// to it, apply the autoplay policy, loop, and start playing.
    fn construct(&mut self) {
        if !self.caps.supports_live_playback {
            self.phase = PlaybackPhase::Unsupported;
            return;
        }

        self.normalized = self.source.normalized(&self.caps, &self.proxy_base);
        self.generation += 1;

        let (handle, subscription) = PlayerHandle::acquire(
            self.normalized.clone(),
            self.probe.clone(),
            self.event_tx.clone(),
            self.generation,
        );

        // Browsers refuse audible autoplay without a prior user gesture;
        // starting muted is the only way playback begins immediately.
        if self.caps.blocks_autoplay_audio {
            handle.set_muted(true);
        } else {
            handle.set_muted(false);
            handle.set_volume(1.0);
        }
        handle.set_looping(true);
        handle.set_paused(false);

        self.handle = Some(handle);
        self.subscription = Some(subscription);
        self.phase = PlaybackPhase::Loading;
    }

    /// Cancel the subscription, then release the handle. Order matters:
    /// the token must be dead before the handle goes stale so no in-flight
    /// event lands in between.
    fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
    }

    /// Tear down the current handle and restart the construction contract
    /// with a new source. Clears any prior error.
    pub fn set_source(&mut self, source: StreamSource) {
        self.teardown();
        self.source = source;
        self.is_full_screen = false;
        self.construct();
    }

    /// React to an event from a handle worker. Events from any generation
    /// other than the current one come from a released handle and are
    /// discarded.
    pub fn on_playback_event(&mut self, generation: u64, event: PlaybackEvent) {
        if generation != self.generation || self.handle.is_none() {
            return;
        }

        match event {
            PlaybackEvent::Ready => {
                if self.phase == PlaybackPhase::Loading {
                    self.phase = PlaybackPhase::Ready;
                }
            }
            PlaybackEvent::Error { message } => {
                let kind = match self.phase {
                    PlaybackPhase::Ready | PlaybackPhase::Paused => {
                        PlaybackErrorKind::PlaybackInterrupted
                    }
                    _ => PlaybackErrorKind::SourceUnreachable,
                };
                self.teardown();
                self.phase = PlaybackPhase::Error(PlaybackError { kind, message });
            }
        }
    }

    pub fn toggle_play_pause(&mut self) {
        let Some(handle) = self.handle.as_ref() else {
            return;
        };
        handle.set_paused(!handle.paused());
        self.phase = match self.phase {
            PlaybackPhase::Ready => PlaybackPhase::Paused,
            PlaybackPhase::Paused => PlaybackPhase::Ready,
            ref other => other.clone(),
        };
    }

    pub fn toggle_mute(&mut self) {
        if let Some(handle) = self.handle.as_ref() {
            handle.set_muted(!handle.muted());
        }
    }

    /// On platforms without native fullscreen this is visual-only; either
    /// way it never touches playback state.
    pub fn toggle_full_screen(&mut self) {
        if self.handle.is_some() {
            self.is_full_screen = !self.is_full_screen;
        }
    }

    pub fn phase(&self) -> &PlaybackPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &StreamSource {
        &self.source
    }

    pub fn normalized_source(&self) -> &StreamSource {
        &self.normalized
    }

    pub fn is_full_screen(&self) -> bool {
        self.is_full_screen
    }

    pub fn is_paused(&self) -> bool {
        self.handle.as_ref().map(|h| h.paused()).unwrap_or(false)
    }

    pub fn is_muted(&self) -> bool {
        self.handle.as_ref().map(|h| h.muted()).unwrap_or(false)
    }

    pub fn volume(&self) -> f32 {
        self.handle.as_ref().map(|h| h.volume()).unwrap_or(0.0)
    }

    pub fn error(&self) -> Option<&PlaybackError> {
        match &self.phase {
            PlaybackPhase::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl Drop for StreamPlaybackWidget {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::player::probe::{ProbeError, StreamInfo};

    /// Never resolves within a test's lifetime, so the phase the widget is
    /// in is exactly the phase the test put it in.
    struct PendingProbe;

    impl StreamProbe for PendingProbe {
        fn open(&self, _source: &StreamSource) -> Result<StreamInfo, ProbeError> {
            std::thread::sleep(Duration::from_secs(60));
            Err(ProbeError::BadPlaylist)
        }

        fn keepalive(&self, _source: &StreamSource) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    fn widget_with_caps(
        uri: &str,
        caps: PlatformCapabilities,
    ) -> (StreamPlaybackWidget, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let widget = StreamPlaybackWidget::new(
            StreamSource::new(uri),
            caps,
            crate::player::source::DEFAULT_CORS_PROXY,
            Arc::new(PendingProbe),
            tx,
        );
        (widget, rx)
    }

    #[test]
    fn secure_browser_context_proxies_and_mutes() {
        let (widget, _rx) = widget_with_caps(
            "http://example.com/stream.m3u8",
            PlatformCapabilities::secure_browser(),
        );
        assert_eq!(
            widget.normalized_source().as_str(),
            "https://corsproxy.io/http://example.com/stream.m3u8"
        );
        assert!(widget.is_muted());
        assert_eq!(*widget.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn native_context_plays_unmuted_at_full_volume() {
        let (widget, _rx) = widget_with_caps(
            "http://example.com/stream.m3u8",
            PlatformCapabilities::native(),
        );
        assert_eq!(
            widget.normalized_source().as_str(),
            "http://example.com/stream.m3u8"
        );
        assert!(!widget.is_muted());
        assert_eq!(widget.volume(), 1.0);
        assert!(!widget.is_paused());
    }

    #[test]
    fn unsupported_environment_acquires_nothing() {
        let (mut widget, _rx) = widget_with_caps(
            "https://example.com/stream.m3u8",
            PlatformCapabilities::unsupported(),
        );
        assert_eq!(*widget.phase(), PlaybackPhase::Unsupported);
        assert!(widget.error().is_none());

        // Controls are no-ops without a handle.
        widget.toggle_play_pause();
        widget.toggle_mute();
        widget.toggle_full_screen();
        assert!(!widget.is_paused());
        assert!(!widget.is_muted());
        assert!(!widget.is_full_screen());
    }

    #[test]
    fn play_pause_alternates_strictly() {
        let (mut widget, _rx) = widget_with_caps(
            "https://example.com/stream.m3u8",
            PlatformCapabilities::native(),
        );
        let generation = widget.generation();
        widget.on_playback_event(generation, PlaybackEvent::Ready);
        assert_eq!(*widget.phase(), PlaybackPhase::Ready);

        widget.toggle_play_pause();
        assert!(widget.is_paused());
        assert_eq!(*widget.phase(), PlaybackPhase::Paused);

        widget.toggle_play_pause();
        assert!(!widget.is_paused());
        assert_eq!(*widget.phase(), PlaybackPhase::Ready);

        widget.toggle_play_pause();
        assert!(widget.is_paused());
    }

    #[test]
    fn error_while_loading_is_source_unreachable() {
        let (mut widget, _rx) = widget_with_caps(
            "https://example.com/stream.m3u8",
            PlatformCapabilities::native(),
        );
        let generation = widget.generation();
        widget.on_playback_event(
            generation,
            PlaybackEvent::Error {
                message: "404".into(),
            },
        );

        let error = widget.error().expect("widget should be in error phase");
        assert_eq!(error.kind, PlaybackErrorKind::SourceUnreachable);
        assert_eq!(error.to_string(), "Playback Error: 404");
        assert!(!widget.phase().shows_controls());
    }

    #[test]
    fn error_after_ready_is_playback_interrupted() {
        let (mut widget, _rx) = widget_with_caps(
            "https://example.com/stream.m3u8",
            PlatformCapabilities::native(),
        );
        let generation = widget.generation();
        widget.on_playback_event(generation, PlaybackEvent::Ready);
        widget.on_playback_event(
            generation,
            PlaybackEvent::Error {
                message: "stream dropped".into(),
            },
        );

        let error = widget.error().expect("widget should be in error phase");
        assert_eq!(error.kind, PlaybackErrorKind::PlaybackInterrupted);
    }

    #[test]
    fn source_change_clears_error_and_reloads() {
        let (mut widget, _rx) = widget_with_caps(
            "https://example.com/stream.m3u8",
            PlatformCapabilities::native(),
        );
        let generation = widget.generation();
        widget.on_playback_event(
            generation,
            PlaybackEvent::Error {
                message: "404".into(),
            },
        );
        assert!(widget.phase().is_error());

        widget.set_source(StreamSource::new("https://other/stream.m3u8"));
        assert_eq!(*widget.phase(), PlaybackPhase::Loading);
        assert!(widget.error().is_none());
        assert_eq!(widget.normalized_source().as_str(), "https://other/stream.m3u8");
        assert!(widget.generation() > generation);
    }

    #[test]
    fn stale_handle_events_are_discarded() {
        let (mut widget, _rx) = widget_with_caps(
            "https://example.com/stream.m3u8",
            PlatformCapabilities::native(),
        );
        let old_gen = widget.generation();
        widget.set_source(StreamSource::new("https://other/stream.m3u8"));

        // The superseded handle reports ready; the new widget state must
        // not move off Loading.
        widget.on_playback_event(old_gen, PlaybackEvent::Ready);
        assert_eq!(*widget.phase(), PlaybackPhase::Loading);

        widget.on_playback_event(
            old_gen,
            PlaybackEvent::Error {
                message: "late failure".into(),
            },
        );
        assert!(!widget.phase().is_error());
    }

    #[test]
    fn fullscreen_is_visual_only_without_native_support() {
        let (mut widget, _rx) = widget_with_caps(
            "http://example.com/stream.m3u8",
            PlatformCapabilities::secure_browser(),
        );
        let generation = widget.generation();
        widget.on_playback_event(generation, PlaybackEvent::Ready);
        let paused_before = widget.is_paused();

        widget.toggle_full_screen();
        assert!(widget.is_full_screen());
        assert_eq!(widget.is_paused(), paused_before);
        assert_eq!(*widget.phase(), PlaybackPhase::Ready);

        widget.toggle_full_screen();
        assert!(!widget.is_full_screen());
    }
}
