use std::sync::Arc;

use crate::config::Config;
use crate::extractor::{ConversationExtractor, Extractor};
use crate::renderer::PdfRenderer;

/// Wires the configured extractor and renderer together.
pub struct AppContext {
    pub config: Config,
    pub extractor: Arc<dyn Extractor>,
    pub renderer: PdfRenderer,
}

impl AppContext {
    /// Context backed by headless Chrome.
    pub fn new(config: Config) -> Self {
        let extractor: Arc<dyn Extractor> =
            Arc::new(ConversationExtractor::chrome(config.extractor.clone()));
        Self::with_extractor(config, extractor)
    }

    /// Context using a caller-supplied extractor.
    pub fn with_extractor(config: Config, extractor: Arc<dyn Extractor>) -> Self {
        let renderer = PdfRenderer::new(config.renderer.clone());
        Self {
            config,
            extractor,
            renderer,
        }
    }
}
