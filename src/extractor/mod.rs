//! Conversation extraction from shared ChatGPT pages.
//!
//! # Architecture
//!
//! ```text
//! ShareUrl → BrowserLauncher → BrowserSession (navigate, wait, query) → Conversation
//! ```
//!
//! The browser is reached only through the narrow traits in [`browser`], so
//! the pairing and waiting logic here can run against a test double.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chatpress::domain::ShareUrl;
//! use chatpress::extractor::{ConversationExtractor, Extractor, ExtractorConfig};
//!
//! let extractor = ConversationExtractor::chrome(ExtractorConfig::default());
//! let url = ShareUrl::parse("https://chatgpt.com/share/abc123")?;
//! let conversation = extractor.extract(&url).await?;
//! ```

pub mod browser;
mod chrome;
mod config;

pub use browser::{BrowserLauncher, BrowserSession, ElementHandle};
pub use chrome::{ChromeLauncher, ChromeSession};
pub use config::ExtractorConfig;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::app::{ChatpressError, Result};
use crate::domain::{Conversation, ConversationTurn, ShareUrl};

/// Anything that can turn a share link into a conversation.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract every turn shown on the shared page, in display order.
    ///
    /// All failures are reported as [`ChatpressError::Extraction`].
    async fn extract(&self, url: &ShareUrl) -> Result<Conversation>;
}

/// Scrapes role labels and message bodies from a rendered share page.
pub struct ConversationExtractor<L = ChromeLauncher> {
    launcher: L,
    config: ExtractorConfig,
}

impl ConversationExtractor<ChromeLauncher> {
    /// Extractor backed by a real headless Chrome
    pub fn chrome(config: ExtractorConfig) -> Self {
        Self::new(ChromeLauncher, config)
    }
}

impl<L: BrowserLauncher> ConversationExtractor<L> {
    pub fn new(launcher: L, config: ExtractorConfig) -> Self {
        Self { launcher, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    async fn scrape(&self, session: &mut dyn BrowserSession, url: &ShareUrl) -> Result<Conversation> {
        info!(
            "Loading shared conversation {} from {}",
            url.token(),
            url.as_url().host_str().unwrap_or_default()
        );
        session.navigate(url.as_str()).await?;

        let first_seen = self.wait_for_messages(session).await?;
        debug!("{} message elements present, settling", first_seen);
        tokio::time::sleep(self.config.settle()).await;

        // Re-query after settling so late-rendered turns are included
        let bodies = session.query_all(&self.config.message_selector).await?;
        let roles = session.query_all(&self.config.role_selector).await?;

        if roles.len() < bodies.len() {
            warn!(
                "Found {} messages but only {} role labels; using '{}' for the rest",
                bodies.len(),
                roles.len(),
                self.config.unknown_role
            );
        }

        let mut turns = Vec::with_capacity(bodies.len());
        for (idx, body) in bodies.iter().enumerate() {
            let role = match roles.get(idx) {
                Some(label) => label.text().await?.trim().to_string(),
                None => self.config.unknown_role.clone(),
            };
            let message = body.text().await?.trim().to_string();
            turns.push(ConversationTurn::new(role, message));
        }

        Ok(Conversation::new(turns))
    }

    /// Poll until at least one message body is present, bounded by the
    /// configured timeout. Returns the number of bodies seen.
    async fn wait_for_messages(&self, session: &mut dyn BrowserSession) -> Result<usize> {
        let selector = self.config.message_selector.as_str();
        let interval = self.config.poll_interval();

        let mut last_error = None;

        let poll = async {
            loop {
                match session.query_all(selector).await {
                    Ok(found) if !found.is_empty() => return found.len(),
                    Ok(_) => debug!("No messages rendered yet"),
                    Err(e) => {
                        debug!("Message poll failed: {}", e);
                        last_error = Some(e);
                    }
                }
                tokio::time::sleep(interval).await;
            }
        };

        let outcome = tokio::time::timeout(self.config.timeout(), poll).await;
        outcome.map_err(|_| {
            let mut message = format!(
                "Timed out after {}s waiting for messages matching {}",
                self.config.timeout_secs, selector
            );
            if let Some(e) = last_error {
                message.push_str(&format!(" (last error: {})", e));
            }
            ChatpressError::Extraction(message)
        })
    }
}

#[async_trait]
impl<L: BrowserLauncher> Extractor for ConversationExtractor<L> {
    async fn extract(&self, url: &ShareUrl) -> Result<Conversation> {
        info!("Initializing browser");
        let mut session = self.launcher.launch(&self.config).await.map_err(as_extraction)?;

        let outcome = self.scrape(session.as_mut(), url).await;

        if let Err(e) = session.close().await {
            warn!("Failed to shut down browser cleanly: {}", e);
        }

        match &outcome {
            Ok(conversation) => info!("Extracted {} turns from {}", conversation.len(), url.token()),
            Err(e) => error!("Extraction failed for {}: {}", url, e),
        }

        outcome.map_err(as_extraction)
    }
}

fn as_extraction(err: ChatpressError) -> ChatpressError {
    match err {
        ChatpressError::Extraction(_) => err,
        other => ChatpressError::Extraction(other.to_string()),
    }
}
