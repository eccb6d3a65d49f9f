use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

pub enum LogoMessage {
    Loaded { channel_id: String, data: Vec<u8> },
    Error { channel_id: String, error: String },
}

/// Fetches channel logos off the UI thread.
pub struct LogoFetcher {
    rx: Receiver<LogoMessage>,
    tx: Sender<LogoMessage>,
    client: reqwest::blocking::Client,
}

impl LogoFetcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { rx, tx, client }
    }

    /// Request a logo asynchronously; the result arrives via `try_recv`.
    pub fn fetch(&self, channel_id: String, url: String) {
        let tx = self.tx.clone();
        let client = self.client.clone();

        thread::spawn(move || {
            match client.get(&url).send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        let _ = tx.send(LogoMessage::Error {
                            channel_id,
                            error: format!("HTTP error: {}", response.status()),
                        });
                        return;
                    }

                    match response.bytes() {
                        Ok(data) => {
                            let _ = tx.send(LogoMessage::Loaded {
                                channel_id,
                                data: data.to_vec(),
                            });
                        }
                        Err(e) => {
                            let _ = tx.send(LogoMessage::Error {
                                channel_id,
                                error: format!("Read error: {}", e),
                            });
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(LogoMessage::Error {
                        channel_id,
                        error: format!("Fetch error: {}", e),
                    });
                }
            }
        });
    }

    /// Non-blocking check for fetched logo data.
    pub fn try_recv(&self) -> Result<LogoMessage, TryRecvError> {
        self.rx.try_recv()
    }
}

impl Default for LogoFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Caches the decoded logo of the active channel for rendering.
pub struct ImageCache {
    pub picker: Picker,
    pub current_image: Option<StatefulProtocol>,
    pub current_channel_id: Option<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        let picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::from_fontsize((8, 16)));

        Self {
            picker,
            current_image: None,
            current_channel_id: None,
        }
    }

    pub fn load_logo(&mut self, channel_id: &str, image_data: &[u8]) -> Result<(), String> {
        if self.current_channel_id.as_deref() == Some(channel_id) {
            return Ok(());
        }

        let img = image::load_from_memory(image_data)
            .map_err(|e| format!("Failed to decode image: {}", e))?;

        let protocol = self.picker.new_resize_protocol(img);
        self.current_image = Some(protocol);
        self.current_channel_id = Some(channel_id.to_string());

        Ok(())
    }

    pub fn clear(&mut self) {
        self.current_image = None;
        self.current_channel_id = None;
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}
