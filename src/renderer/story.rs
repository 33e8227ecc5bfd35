//! The ordered list of blocks that make up a conversation document.

use crate::domain::{Conversation, ConversationTurn};
use crate::renderer::text::{clean_text, paragraphs};

/// Vertical gap after the header and after each turn, in points.
pub const SECTION_SPACING: f32 = 12.0;

/// Suffix appended to the heading of a turn the user changed.
pub const EDITED_SUFFIX: &str = " (Edited)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Title,
    Metadata,
    Heading,
    Body,
}

/// A block-level element of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Escaped paragraph markup (see [`clean_text`]).
    Paragraph { style: TextStyle, markup: String },
    Spacer(f32),
}

impl Block {
    fn paragraph(style: TextStyle, markup: impl Into<String>) -> Self {
        Block::Paragraph {
            style,
            markup: markup.into(),
        }
    }
}

/// Heading text for a turn: the cleaned role, marked when edited.
pub fn heading_text(turn: &ConversationTurn) -> String {
    let mut heading = clean_text(&turn.role);
    if turn.edited {
        heading.push_str(EDITED_SUFFIX);
    }
    heading
}

/// Lay out the fixed document template for `conversation`.
///
/// Title, optional metadata line, a spacer, then per turn a heading, one body
/// paragraph per non-empty message line, and a spacer.
pub fn build(conversation: &Conversation, title: &str, metadata: Option<&str>) -> Vec<Block> {
    let mut blocks = vec![Block::paragraph(TextStyle::Title, clean_text(title))];

    if let Some(metadata) = metadata {
        blocks.push(Block::paragraph(TextStyle::Metadata, clean_text(metadata)));
    }
    blocks.push(Block::Spacer(SECTION_SPACING));

    for turn in conversation {
        blocks.push(Block::paragraph(TextStyle::Heading, heading_text(turn)));

        let message = clean_text(&turn.message);
        blocks.extend(paragraphs(&message).map(|line| Block::paragraph(TextStyle::Body, line)));

        blocks.push(Block::Spacer(SECTION_SPACING));
    }

    blocks
}
