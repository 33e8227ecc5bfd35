use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the conversation extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// How long to wait for the first message to render, in seconds (default: 20)
    pub timeout_secs: u64,

    /// Extra wait after the first message appears, in milliseconds (default: 2000)
    pub settle_ms: u64,

    /// Delay between selector polls while waiting, in milliseconds (default: 250)
    pub poll_interval_ms: u64,

    /// Browser viewport width (default: 1920)
    pub window_width: u32,

    /// Browser viewport height (default: 1080)
    pub window_height: u32,

    /// User agent string presented to the share page
    pub user_agent: Option<String>,

    /// CSS selector matching message bodies
    pub message_selector: String,

    /// CSS selector matching role labels
    pub role_selector: String,

    /// Role label used when a message has no matching label
    pub unknown_role: String,

    /// Explicit Chrome/Chromium binary; autodetected when unset
    pub chrome_executable: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 20,
            settle_ms: 2000,
            poll_interval_ms: 250,
            window_width: 1920,
            window_height: 1080,
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            message_selector: "div[class*='markdown']".to_string(),
            role_selector: "div[class*='font-semibold']".to_string(),
            unknown_role: "Unknown".to_string(),
            chrome_executable: None,
        }
    }
}

impl ExtractorConfig {
    /// Get the content wait timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the settle delay as a Duration
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
