use serde::{Deserialize, Serialize};

/// Capabilities of the host environment, resolved once at startup.
///
/// The playback widget never sniffs the runtime itself; everything
/// environment-specific is decided here and injected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PlatformCapabilities {
    /// The environment refuses to autoplay audible media without a prior
    /// user gesture. Starting muted is the only way to guarantee playback
    /// begins immediately.
    pub blocks_autoplay_audio: bool,
    /// Native fullscreen playback is available. Without it, fullscreen is
    /// a visual-only flag on the widget.
    pub supports_native_fullscreen: bool,
    /// A secure page loading a plain-HTTP resource gets blocked as mixed
    /// content; insecure stream URIs must be rewritten through an HTTPS
    /// proxy.
    pub requires_cors_proxy_for_insecure_streams: bool,
    /// Live stream playback works at all. When false the widget renders a
    /// static explanatory panel and acquires nothing.
    pub supports_live_playback: bool,
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::native()
    }
}

impl PlatformCapabilities {
    /// A native set-top context: audible autoplay allowed, fullscreen
    /// available, no mixed-content restrictions.
    pub const fn native() -> Self {
        Self {
            blocks_autoplay_audio: false,
            supports_native_fullscreen: true,
            requires_cors_proxy_for_insecure_streams: false,
            supports_live_playback: true,
        }
    }

    /// A secure browser-hosted context: muted autoplay only, no native
    /// fullscreen, insecure streams must traverse the CORS proxy.
    pub const fn secure_browser() -> Self {
        Self {
            blocks_autoplay_audio: true,
            supports_native_fullscreen: false,
            requires_cors_proxy_for_insecure_streams: true,
            supports_live_playback: true,
        }
    }

    /// A context where live playback is categorically unavailable.
    pub const fn unsupported() -> Self {
        Self {
            blocks_autoplay_audio: false,
            supports_native_fullscreen: false,
            requires_cors_proxy_for_insecure_streams: false,
            supports_live_playback: false,
        }
    }
}
