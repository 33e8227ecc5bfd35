use serde::{Deserialize, Serialize};

use crate::renderer::layout::PageSetup;

/// Configuration for PDF output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Title printed at the top of every document
    pub title: String,

    /// Print an "Extracted on" timestamp under the title (default: true)
    pub include_metadata: bool,

    /// Page width in points (default: 612, US Letter)
    pub page_width: f32,

    /// Page height in points (default: 792, US Letter)
    pub page_height: f32,

    /// Margin on every side in points (default: 72)
    pub margin: f32,

    /// Heading color as "#RRGGBB" or "#RGB"
    pub accent_color: String,

    /// Deflate page content streams (default: true)
    pub compress: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "ChatGPT Conversation".to_string(),
            include_metadata: true,
            page_width: PageSetup::LETTER.width,
            page_height: PageSetup::LETTER.height,
            margin: PageSetup::LETTER.margin,
            accent_color: "#1a73e8".to_string(),
            compress: true,
        }
    }
}

impl RendererConfig {
    /// Same settings on A4 paper.
    pub fn with_a4_paper(self) -> Self {
        Self {
            page_width: PageSetup::A4.width,
            page_height: PageSetup::A4.height,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = RendererConfig::default();
        assert_eq!(config.title, "ChatGPT Conversation");
        assert!(config.include_metadata);
        assert_eq!(config.page_width, 612.0);
        assert_eq!(config.page_height, 792.0);
        assert_eq!(config.margin, 72.0);
        assert_eq!(config.accent_color, "#1a73e8");
        assert!(config.compress);
    }

    #[test]
    fn test_a4_keeps_other_settings() {
        let config = RendererConfig {
            title: "Notes".to_string(),
            margin: 36.0,
            ..Default::default()
        }
        .with_a4_paper();

        assert_eq!(config.page_width, 595.0);
        assert_eq!(config.page_height, 842.0);
        assert_eq!(config.margin, 36.0);
        assert_eq!(config.title, "Notes");
    }
}
