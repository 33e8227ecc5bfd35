use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::{ChatpressError, Result};
use crate::extractor::browser::{BrowserLauncher, BrowserSession, ElementHandle};
use crate::extractor::ExtractorConfig;

/// Launches headless Chrome through chromiumoxide.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeLauncher;

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self, config: &ExtractorConfig) -> Result<Box<dyn BrowserSession>> {
        let session = ChromeSession::launch(config).await?;
        Ok(Box::new(session))
    }
}

/// A Chrome process plus the single page used for scraping.
///
/// Dropping the session kills the Chrome child process, so the process does
/// not outlive a panicking caller even when [`BrowserSession::close`] is never
/// reached.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    pub async fn launch(config: &ExtractorConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .arg("--disable-extensions")
            .window_size(config.window_width, config.window_height)
            .viewport(Viewport {
                width: config.window_width,
                height: config.window_height,
                ..Default::default()
            });

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(|e| {
            ChatpressError::Extraction(format!("Failed to build browser config: {}", e))
        })?;

        let (mut browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ChatpressError::Extraction(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Drive the CDP connection until the browser goes away
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = match Self::open_page(&browser, config).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler.abort();
                return Err(e);
            }
        };

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    async fn open_page(browser: &Browser, config: &ExtractorConfig) -> Result<Page> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ChatpressError::Extraction(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = config.user_agent {
            page.set_user_agent(ua.as_str()).await.map_err(|e| {
                ChatpressError::Extraction(format!("Failed to set user agent: {}", e))
            })?;
        }

        Ok(page)
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ChatpressError::Extraction(format!("Navigation failed: {}", e)))?;
        Ok(())
    }

    async fn query_all(&mut self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let elements = self.page.find_elements(selector).await.map_err(|e| {
            ChatpressError::Extraction(format!("Query for '{}' failed: {}", selector, e))
        })?;

        Ok(elements
            .into_iter()
            .map(|element| Box::new(ChromeElement { element }) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn close(&mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| ChatpressError::Extraction(format!("Failed to close browser: {}", e)));
        let _ = self.browser.wait().await;
        self.handler.abort();
        closed.map(|_| ())
    }
}

struct ChromeElement {
    element: Element,
}

#[async_trait]
impl ElementHandle for ChromeElement {
    async fn text(&self) -> Result<String> {
        let text = self.element.inner_text().await.map_err(|e| {
            ChatpressError::Extraction(format!("Failed to read element text: {}", e))
        })?;
        Ok(text.unwrap_or_default())
    }
}
