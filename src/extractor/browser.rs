//! Narrow view of a browser driver: just enough to load a page and read
//! element text.

use async_trait::async_trait;

use crate::app::Result;
use crate::extractor::ExtractorConfig;

/// A rendered element whose text can be read.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// The element's rendered text content.
    async fn text(&self) -> Result<String>;
}

/// One live browser process with a single page.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url` in the session's page.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// All elements matching `selector`, in document order.
    async fn query_all(&mut self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>>;

    /// Terminate the browser process.
    async fn close(&mut self) -> Result<()>;
}

/// Starts browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, config: &ExtractorConfig) -> Result<Box<dyn BrowserSession>>;
}
