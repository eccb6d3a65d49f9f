use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::events::types::AppEvent;
use crate::player::events::PlaybackEvent;
use crate::player::probe::StreamProbe;
use crate::player::source::StreamSource;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(3);
const IDLE_TICK: Duration = Duration::from_millis(100);

/// Cancellation token handed out when subscribing to a handle's events.
/// Cancelling it guarantees no further event reaches the channel, even if
/// the worker thread is mid-flight.
#[derive(Clone)]
pub struct Subscription {
    cancelled: Arc<AtomicBool>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Flag block shared between the owning widget and the worker thread.
/// Exactly one writer per flag direction, so plain atomics suffice.
struct HandleShared {
    paused: AtomicBool,
    muted: AtomicBool,
    looping: AtomicBool,
    volume_bits: AtomicU32,
    is_loaded: AtomicBool,
    /// Set synchronously at release time, before the worker has actually
    /// wound down. The worker discards itself on the next check.
    stale: AtomicBool,
}

/// The live playback resource bound to one stream source.
///
/// Exclusively owned by one widget; acquired on mount or source change and
/// released on teardown. At most one non-stale handle exists per widget.
pub struct PlayerHandle {
    shared: Arc<HandleShared>,
    generation: u64,
    _worker: Option<JoinHandle<()>>,
}

impl PlayerHandle {
    /// Bind a handle to a (normalized) source and begin loading it.
    ///
    /// The returned subscription must be cancelled before the handle is
    /// released. Events arrive on `event_tx` tagged with `generation` so a
    /// receiver can discard anything from a superseded handle.
    pub fn acquire(
        source: StreamSource,
        probe: Arc<dyn StreamProbe>,
        event_tx: Sender<AppEvent>,
        generation: u64,
    ) -> (Self, Subscription) {
        let shared = Arc::new(HandleShared {
            paused: AtomicBool::new(false),
            muted: AtomicBool::new(false),
            looping: AtomicBool::new(false),
            volume_bits: AtomicU32::new(1.0f32.to_bits()),
            is_loaded: AtomicBool::new(false),
            stale: AtomicBool::new(false),
        });
        let subscription = Subscription {
            cancelled: Arc::new(AtomicBool::new(false)),
        };

        let worker = {
            let shared = shared.clone();
            let subscription = subscription.clone();
            std::thread::spawn(move || {
                run_worker(source, probe, event_tx, generation, shared, subscription)
            })
        };

        (
            Self {
                shared,
                generation,
                _worker: Some(worker),
            },
            subscription,
        )
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn paused(&self) -> bool {
        self.shared.paused.load(Ordering::Relaxed)
    }

    pub fn set_paused(&self, paused: bool) {
        self.shared.paused.store(paused, Ordering::Relaxed);
    }

    pub fn muted(&self) -> bool {
        self.shared.muted.load(Ordering::Relaxed)
    }

    pub fn set_muted(&self, muted: bool) {
        self.shared.muted.store(muted, Ordering::Relaxed);
    }

    pub fn looping(&self) -> bool {
        self.shared.looping.load(Ordering::Relaxed)
    }

    pub fn set_looping(&self, looping: bool) {
        self.shared.looping.store(looping, Ordering::Relaxed);
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.shared.volume_bits.load(Ordering::Relaxed))
    }

    pub fn set_volume(&self, volume: f32) {
        self.shared
            .volume_bits
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn is_loaded(&self) -> bool {
        self.shared.is_loaded.load(Ordering::Relaxed)
    }

    pub fn is_stale(&self) -> bool {
        self.shared.stale.load(Ordering::SeqCst)
    }

    /// Flag the handle stale. Synchronous: after this returns, the worker
    /// will not mutate anything a live widget displays, even though its
    /// actual teardown finishes asynchronously.
    pub fn release(&self) {
        self.shared.stale.store(true, Ordering::SeqCst);
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

fn run_worker(
    source: StreamSource,
    probe: Arc<dyn StreamProbe>,
    event_tx: Sender<AppEvent>,
    generation: u64,
    shared: Arc<HandleShared>,
    subscription: Subscription,
) {
    let emit = |event: PlaybackEvent| {
        // A released handle or cancelled subscription must never surface
        // an in-flight event.
        if shared.stale.load(Ordering::SeqCst) || subscription.is_cancelled() {
            return false;
        }
        event_tx
            .send(AppEvent::Playback { generation, event })
            .is_ok()
    };

    let info = match probe.open(&source) {
        Ok(info) => info,
        Err(e) => {
            emit(PlaybackEvent::Error {
                message: e.to_string(),
            });
            return;
        }
    };

    shared.is_loaded.store(true, Ordering::Relaxed);
    if !emit(PlaybackEvent::Ready) {
        return;
    }

    // Non-live sources have nothing to watch; just hold the handle until
    // it is released.
    let mut since_keepalive = Duration::ZERO;
    loop {
        std::thread::sleep(IDLE_TICK);
        if shared.stale.load(Ordering::SeqCst) || subscription.is_cancelled() {
            break;
        }
        if !info.live || shared.paused.load(Ordering::Relaxed) {
            continue;
        }

        since_keepalive += IDLE_TICK;
        if since_keepalive < KEEPALIVE_INTERVAL {
            continue;
        }
        since_keepalive = Duration::ZERO;

        if let Err(e) = probe.keepalive(&source) {
            emit(PlaybackEvent::Error {
                message: e.to_string(),
            });
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::mpsc::{self, Receiver};

    use super::*;
    use crate::player::probe::{ProbeError, StreamInfo};

    /// Resolves immediately with a non-live stream.
    struct InstantProbe;

    impl StreamProbe for InstantProbe {
        fn open(&self, _source: &StreamSource) -> Result<StreamInfo, ProbeError> {
            Ok(StreamInfo {
                content_type: Some("application/vnd.apple.mpegurl".into()),
                live: false,
            })
        }

        fn keepalive(&self, _source: &StreamSource) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    struct FailingProbe;

    impl StreamProbe for FailingProbe {
        fn open(&self, _source: &StreamSource) -> Result<StreamInfo, ProbeError> {
            Err(ProbeError::Http(404))
        }

        fn keepalive(&self, _source: &StreamSource) -> Result<(), ProbeError> {
            Err(ProbeError::Http(404))
        }
    }

    /// Blocks in `open` until the test lets it through, so the test can
    /// cancel or release while the probe is mid-flight.
    struct GatedProbe {
        gate: Mutex<Receiver<()>>,
    }

    impl StreamProbe for GatedProbe {
        fn open(&self, _source: &StreamSource) -> Result<StreamInfo, ProbeError> {
            let gate = self.gate.lock().unwrap();
            let _ = gate.recv_timeout(Duration::from_secs(5));
            Ok(StreamInfo::default())
        }

        fn keepalive(&self, _source: &StreamSource) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    fn acquire(
        probe: Arc<dyn StreamProbe>,
        generation: u64,
    ) -> (PlayerHandle, Subscription, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let (handle, subscription) = PlayerHandle::acquire(
            StreamSource::new("https://example.com/live.m3u8"),
            probe,
            tx,
            generation,
        );
        (handle, subscription, rx)
    }

    #[test]
    fn ready_event_carries_the_handle_generation() {
        let (handle, _sub, rx) = acquire(Arc::new(InstantProbe), 7);
        assert_eq!(handle.generation(), 7);

        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(AppEvent::Playback { generation, event }) => {
                assert_eq!(generation, 7);
                assert_eq!(event, PlaybackEvent::Ready);
            }
            other => panic!("expected a playback event, got {:?}", other),
        }
        assert!(handle.is_loaded());
    }

    #[test]
    fn failed_open_emits_an_error_event() {
        let (_handle, _sub, rx) = acquire(Arc::new(FailingProbe), 1);

        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(AppEvent::Playback { event, .. }) => {
                assert_eq!(
                    event,
                    PlaybackEvent::Error {
                        message: "404".into()
                    }
                );
            }
            other => panic!("expected a playback event, got {:?}", other),
        }
    }

    #[test]
    fn release_marks_the_handle_stale_synchronously() {
        let (handle, _sub, _rx) = acquire(Arc::new(InstantProbe), 1);
        assert!(!handle.is_stale());
        handle.release();
        assert!(handle.is_stale());
    }

    #[test]
    fn cancelled_subscription_suppresses_in_flight_events() {
        let (gate_tx, gate_rx) = mpsc::channel();
        let probe = Arc::new(GatedProbe {
            gate: Mutex::new(gate_rx),
        });
        let (_handle, subscription, rx) = acquire(probe, 1);

        // Cancel while the worker is still inside the probe, then let the
        // probe finish. The Ready it produces must be swallowed.
        subscription.cancel();
        assert!(subscription.is_cancelled());
        let _ = gate_tx.send(());

        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }

    #[test]
    fn flags_default_and_clamp() {
        let (handle, _sub, _rx) = acquire(Arc::new(InstantProbe), 1);
        assert!(!handle.paused());
        assert!(!handle.muted());
        assert!(!handle.looping());
        assert_eq!(handle.volume(), 1.0);

        handle.set_volume(2.5);
        assert_eq!(handle.volume(), 1.0);
        handle.set_volume(-1.0);
        assert_eq!(handle.volume(), 0.0);
        handle.set_looping(true);
        assert!(handle.looping());
    }
}
