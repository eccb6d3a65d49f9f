use crate::platform::PlatformCapabilities;

pub const DEFAULT_CORS_PROXY: &str = "https://corsproxy.io/";

/// A stream URI handed to the playback widget. Immutable once created;
/// switching streams means constructing a new source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSource(String);

impl StreamSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_hls(&self) -> bool {
        let path = self.0.split(['?', '#']).next().unwrap_or(&self.0);
        path.ends_with(".m3u8")
    }

    /// Rewrite the URI for the execution environment.
    ///
    /// In a context that blocks mixed content, a plain-HTTP stream would
    /// fail outright, so it is routed through a CORS-capable HTTPS proxy
    /// instead. Pure function of (capabilities, URI), and idempotent: the
    /// rewritten URI is HTTPS, so normalizing it again changes nothing.
    pub fn normalized(&self, caps: &PlatformCapabilities, proxy_base: &str) -> StreamSource {
        if caps.requires_cors_proxy_for_insecure_streams && self.0.starts_with("http://") {
            StreamSource(format!("{}{}", proxy_base, self.0))
        } else {
            self.clone()
        }
    }
}

impl std::fmt::Display for StreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(uri: &str, caps: &PlatformCapabilities) -> String {
        StreamSource::new(uri)
            .normalized(caps, DEFAULT_CORS_PROXY)
            .as_str()
            .to_string()
    }

    #[test]
    fn insecure_uri_in_secure_browser_traverses_proxy() {
        let caps = PlatformCapabilities::secure_browser();
        assert_eq!(
            normalize("http://example.com/stream.m3u8", &caps),
            "https://corsproxy.io/http://example.com/stream.m3u8"
        );
    }

    #[test]
    fn secure_uri_is_left_alone() {
        let caps = PlatformCapabilities::secure_browser();
        assert_eq!(
            normalize("https://example.com/stream.m3u8", &caps),
            "https://example.com/stream.m3u8"
        );
    }

    #[test]
    fn native_context_never_rewrites() {
        let caps = PlatformCapabilities::native();
        assert_eq!(
            normalize("http://example.com/stream.m3u8", &caps),
            "http://example.com/stream.m3u8"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let caps = PlatformCapabilities::secure_browser();
        let once = StreamSource::new("http://example.com/live.m3u8")
            .normalized(&caps, DEFAULT_CORS_PROXY);
        let twice = once.normalized(&caps, DEFAULT_CORS_PROXY);
        assert_eq!(once, twice);
    }

    #[test]
    fn hls_detection_ignores_query_strings() {
        assert!(StreamSource::new("https://host/live.m3u8?token=abc").is_hls());
        assert!(!StreamSource::new("https://host/clip.mp4").is_hls());
    }
}
