//! PDF rendering of conversations.
//!
//! ```text
//! Conversation → clean_text → story (blocks) → FlowDocument (lopdf) → bytes
//! ```

mod config;
pub mod layout;
pub mod metrics;
pub mod story;
pub mod text;

pub use config::RendererConfig;
pub use layout::{DocumentInfo, FlowDocument, PageSetup, Rgb, StyleSheet};
pub use text::clean_text;

use chrono::{DateTime, Local};
use tracing::{debug, error};

use crate::app::{ChatpressError, Result};
use crate::domain::Conversation;

/// Download name for a PDF of the extracted conversation.
pub const ORIGINAL_FILENAME: &str = "chatgpt_conversation_original.pdf";

/// Download name for a PDF of the edited conversation.
pub const EDITED_FILENAME: &str = "chatgpt_conversation_edited.pdf";

pub const PDF_MIME: &str = "application/pdf";

/// Renders conversations into paginated PDF documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    config: RendererConfig,
}

impl PdfRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render `conversation`, stamping the current local time when
    /// `include_metadata` is set.
    pub fn render(&self, conversation: &Conversation, include_metadata: bool) -> Result<Vec<u8>> {
        self.render_at(conversation, include_metadata, Local::now())
    }

    /// Same as [`render`](Self::render) with an explicit timestamp.
    pub fn render_at(
        &self,
        conversation: &Conversation,
        include_metadata: bool,
        now: DateTime<Local>,
    ) -> Result<Vec<u8>> {
        let result = self.build(conversation, include_metadata, now);
        match &result {
            Ok(bytes) => debug!(
                "Rendered {} turns into {} bytes of PDF",
                conversation.len(),
                bytes.len()
            ),
            Err(e) => error!("{}", e),
        }
        result.map_err(|e| match e {
            ChatpressError::Render(_) => e,
            other => ChatpressError::Render(other.to_string()),
        })
    }

    fn build(
        &self,
        conversation: &Conversation,
        include_metadata: bool,
        now: DateTime<Local>,
    ) -> Result<Vec<u8>> {
        let accent = Rgb::from_hex(&self.config.accent_color).ok_or_else(|| {
            ChatpressError::Render(format!("Invalid accent color: {}", self.config.accent_color))
        })?;

        let metadata = include_metadata
            .then(|| format!("Extracted on: {}", now.format("%Y-%m-%d %H:%M:%S")));
        let blocks = story::build(conversation, &self.config.title, metadata.as_deref());

        let mut document = FlowDocument::new(self.page_setup(), StyleSheet::conversation(accent));
        if !self.config.compress {
            document = document.uncompressed();
        }

        let info = DocumentInfo {
            title: self.config.title.clone(),
            created: now,
        };
        document.render(&blocks, &info)
    }

    fn page_setup(&self) -> PageSetup {
        PageSetup {
            width: self.config.page_width,
            height: self.config.page_height,
            margin: self.config.margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConversationTurn;
    use chrono::TimeZone;
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    /// Every string shown with `Tj`, page by page, in drawing order.
    fn shown_text(pdf: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(pdf).expect("renderer output should parse");
        let mut lines = Vec::new();
        for (_, page_id) in doc.get_pages() {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            for op in content.operations {
                if op.operator == "Tj" {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        lines.push(bytes.iter().map(|&b| b as char).collect());
                    }
                }
            }
        }
        lines
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
    }

    fn sample() -> Conversation {
        Conversation::new(vec![
            ConversationTurn::new("User", "Hi"),
            ConversationTurn::new("ChatGPT", "Hello there"),
        ])
    }

    #[test]
    fn test_render_with_metadata() {
        let renderer = PdfRenderer::default();
        let pdf = renderer.render_at(&sample(), true, fixed_time()).unwrap();

        assert_eq!(
            shown_text(&pdf),
            [
                "ChatGPT Conversation",
                "Extracted on: 2024-05-06 07:08:09",
                "User",
                "Hi",
                "ChatGPT",
                "Hello there",
            ]
        );
    }

    #[test]
    fn test_render_without_metadata() {
        let renderer = PdfRenderer::default();
        let pdf = renderer.render_at(&sample(), false, fixed_time()).unwrap();
        assert!(!shown_text(&pdf).iter().any(|l| l.starts_with("Extracted on")));
    }

    #[test]
    fn test_empty_conversation_is_title_only() {
        let pdf = PdfRenderer::default()
            .render(&Conversation::default(), false)
            .unwrap();

        let doc = Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(shown_text(&pdf), ["ChatGPT Conversation"]);
    }

    #[test]
    fn test_edited_turn_heading() {
        let edited = sample().with_edits(vec![("User", "Hi!"), ("ChatGPT", "Hello there")]);
        let pdf = PdfRenderer::default()
            .render_at(&edited, false, fixed_time())
            .unwrap();

        let text = shown_text(&pdf);
        assert!(text.contains(&"User (Edited)".to_string()));
        assert!(text.contains(&"ChatGPT".to_string()));
        assert!(!text.contains(&"ChatGPT (Edited)".to_string()));
    }

    #[test]
    fn test_markup_characters_survive() {
        let conversation = Conversation::new(vec![ConversationTurn::new(
            "User",
            "Is 1 < 2 && 3 > 2?\n\n```\nyes\n```",
        )]);
        let pdf = PdfRenderer::default()
            .render_at(&conversation, false, fixed_time())
            .unwrap();

        assert_eq!(
            shown_text(&pdf),
            ["ChatGPT Conversation", "User", "Is 1 < 2 && 3 > 2?", "yes"]
        );
    }

    #[test]
    fn test_uncompressed_output_contains_plain_text() {
        let renderer = PdfRenderer::new(RendererConfig {
            compress: false,
            ..Default::default()
        });
        let pdf = renderer.render_at(&sample(), false, fixed_time()).unwrap();
        let raw = String::from_utf8_lossy(&pdf);
        assert!(raw.contains("(Hello there) Tj"));
    }

    #[test]
    fn test_long_conversation_spans_pages() {
        let turns = (0..60)
            .map(|i| ConversationTurn::new("User", format!("Message number {i}\nsecond line")))
            .collect();
        let pdf = PdfRenderer::default()
            .render_at(&Conversation::new(turns), true, fixed_time())
            .unwrap();

        let doc = Document::load_mem(&pdf).unwrap();
        assert!(doc.get_pages().len() > 1);
        let text = shown_text(&pdf);
        assert_eq!(text.last().map(String::as_str), Some("second line"));
    }

    #[test]
    fn test_invalid_accent_color_is_a_render_error() {
        let renderer = PdfRenderer::new(RendererConfig {
            accent_color: "blue".into(),
            ..Default::default()
        });
        let err = renderer.render(&sample(), true).unwrap_err();
        assert!(matches!(err, ChatpressError::Render(_)));
        assert!(err.to_string().starts_with("Error creating PDF"));
    }
}
