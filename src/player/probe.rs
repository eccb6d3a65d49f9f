use std::time::Duration;

use reqwest::blocking::Client;

use crate::player::source::StreamSource;

/// What the backend learned about a stream when opening it.
#[derive(Debug, Clone, Default)]
pub struct StreamInfo {
    pub content_type: Option<String>,
    pub live: bool,
}

/// The seam to the platform media backend. The production implementation
/// talks HTTP; tests substitute stubs. Decode, buffering and rendering are
/// entirely the backend's business — this trait only reports reachability.
pub trait StreamProbe: Send + Sync {
    /// Open the stream and validate it is playable.
    fn open(&self, source: &StreamSource) -> Result<StreamInfo, ProbeError>;

    /// Re-poll a live stream to detect a mid-play drop.
    fn keepalive(&self, source: &StreamSource) -> Result<(), ProbeError>;
}

#[derive(Debug)]
pub enum ProbeError {
    Network(reqwest::Error),
    Http(u16),
    BadPlaylist,
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Network(e) => write!(f, "{}", e),
            ProbeError::Http(code) => write!(f, "{}", code),
            ProbeError::BadPlaylist => write!(f, "not a valid HLS playlist"),
        }
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        ProbeError::Network(e)
    }
}

pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamProbe for HttpProbe {
    fn open(&self, source: &StreamSource) -> Result<StreamInfo, ProbeError> {
        let response = self.client.get(source.as_str()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Http(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if source.is_hls() {
            let playlist = response.text()?;
            if !playlist.trim_start().starts_with("#EXTM3U") {
                return Err(ProbeError::BadPlaylist);
            }
            // A playlist without an end marker keeps growing: a live stream.
            let live = !playlist.contains("#EXT-X-ENDLIST");
            return Ok(StreamInfo { content_type, live });
        }

        Ok(StreamInfo {
            content_type,
            live: false,
        })
    }

    fn keepalive(&self, source: &StreamSource) -> Result<(), ProbeError> {
        let response = self.client.get(source.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Http(status.as_u16()));
        }
        Ok(())
    }
}
