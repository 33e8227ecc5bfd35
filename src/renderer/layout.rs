//! A small flowable-document engine on top of lopdf.
//!
//! Blocks are wrapped into lines using the standard font metrics and poured
//! into a single frame per page, starting a new page whenever the next line
//! would cross the bottom margin.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::app::{ChatpressError, Result};
use crate::renderer::metrics::{encode_win_ansi, Font};
use crate::renderer::story::{Block, TextStyle};
use crate::renderer::text::markup_to_plain;

/// Page dimensions and the uniform margin, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageSetup {
    /// US Letter with one-inch margins.
    pub const LETTER: PageSetup = PageSetup {
        width: 612.0,
        height: 792.0,
        margin: 72.0,
    };

    /// ISO A4 with one-inch margins.
    pub const A4: PageSetup = PageSetup {
        width: 595.0,
        height: 842.0,
        margin: 72.0,
    };

    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }

    fn bottom(&self) -> f32 {
        self.margin
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0 && self.margin >= 0.0) {
            return Err(ChatpressError::Render(format!(
                "Invalid page size {}x{} with margin {}",
                self.width, self.height, self.margin
            )));
        }
        if self.frame_width() <= 0.0 || self.top() <= self.bottom() {
            return Err(ChatpressError::Render(format!(
                "Margins of {}pt leave no room on a {}x{} page",
                self.margin, self.width, self.height
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const GRAY: Rgb = Rgb(0.5, 0.5, 0.5);

    /// Parse `#RRGGBB` or `#RGB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        let (r, g, b) = match hex.len() {
            6 => (
                u8::from_str_radix(hex.get(0..2)?, 16).ok()?,
                u8::from_str_radix(hex.get(2..4)?, 16).ok()?,
                u8::from_str_radix(hex.get(4..6)?, 16).ok()?,
            ),
            3 => {
                let r = u8::from_str_radix(hex.get(0..1)?, 16).ok()?;
                let g = u8::from_str_radix(hex.get(1..2)?, 16).ok()?;
                let b = u8::from_str_radix(hex.get(2..3)?, 16).ok()?;
                (r * 17, g * 17, b * 17)
            }
            _ => return None,
        };
        Some(Rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// How a paragraph is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font: Font,
    pub size: f32,
    /// Baseline-to-baseline distance.
    pub leading: f32,
    pub space_after: f32,
    pub color: Rgb,
    pub align: Align,
}

/// Paragraph styles keyed by the story's text roles.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    styles: HashMap<TextStyle, ParagraphStyle>,
}

impl StyleSheet {
    /// The conversation template: large centered title, accented headings,
    /// roomy body text and a small muted metadata line.
    pub fn conversation(accent: Rgb) -> Self {
        let styles = HashMap::from([
            (
                TextStyle::Title,
                ParagraphStyle {
                    font: Font::HelveticaBold,
                    size: 24.0,
                    leading: 28.8,
                    space_after: 30.0,
                    color: Rgb::BLACK,
                    align: Align::Center,
                },
            ),
            (
                TextStyle::Metadata,
                ParagraphStyle {
                    font: Font::Helvetica,
                    size: 9.0,
                    leading: 10.8,
                    space_after: 20.0,
                    color: Rgb::GRAY,
                    align: Align::Left,
                },
            ),
            (
                TextStyle::Heading,
                ParagraphStyle {
                    font: Font::HelveticaBold,
                    size: 14.0,
                    leading: 16.8,
                    space_after: 12.0,
                    color: accent,
                    align: Align::Left,
                },
            ),
            (
                TextStyle::Body,
                ParagraphStyle {
                    font: Font::Helvetica,
                    size: 11.0,
                    leading: 14.0,
                    space_after: 20.0,
                    color: Rgb::BLACK,
                    align: Align::Left,
                },
            ),
        ]);
        Self { styles }
    }

    pub fn get(&self, style: TextStyle) -> Result<&ParagraphStyle> {
        self.styles
            .get(&style)
            .ok_or_else(|| ChatpressError::Render(format!("No paragraph style for {:?}", style)))
    }
}

/// Document-level metadata written to the PDF Info dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub created: DateTime<Local>,
}

/// Break `text` into lines no wider than `width` points.
///
/// Words are split on whitespace; a word wider than the whole line is broken
/// between characters.
pub fn wrap(text: &str, font: Font, size: f32, width: f32) -> Vec<String> {
    let space = font.text_width(" ", size);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, size);

        if word_width > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let mut chunk = String::new();
            for c in word.chars() {
                let mut buf = [0u8; 4];
                let c_width = font.text_width(c.encode_utf8(&mut buf), size);
                if !chunk.is_empty() && font.text_width(&chunk, size) + c_width > width {
                    lines.push(std::mem::take(&mut chunk));
                }
                chunk.push(c);
            }
            line_width = font.text_width(&chunk, size);
            line = chunk;
            continue;
        }

        if line.is_empty() {
            line.push_str(word);
            line_width = word_width;
        } else if line_width + space + word_width <= width {
            line.push(' ');
            line.push_str(word);
            line_width += space + word_width;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
            line_width = word_width;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lays out blocks and serializes them as a PDF.
pub struct FlowDocument {
    setup: PageSetup,
    styles: StyleSheet,
    compress: bool,
}

impl FlowDocument {
    pub fn new(setup: PageSetup, styles: StyleSheet) -> Self {
        Self {
            setup,
            styles,
            compress: true,
        }
    }

    /// Leave content streams uncompressed.
    pub fn uncompressed(mut self) -> Self {
        self.compress = false;
        self
    }

    /// Pour `blocks` into pages. Each page is its list of drawing operations.
    pub fn layout(&self, blocks: &[Block]) -> Result<Vec<Vec<Operation>>> {
        self.setup.validate()?;

        let top = self.setup.top();
        let bottom = self.setup.bottom();
        let frame_width = self.setup.frame_width();

        let mut pages = Vec::new();
        let mut page: Vec<Operation> = Vec::new();
        let mut y = top;

        for block in blocks {
            match block {
                Block::Spacer(height) => {
                    // Spacers are dropped at the top of a page
                    if y < top {
                        y = (y - height).max(bottom);
                    }
                }
                Block::Paragraph { style, markup } => {
                    let style = self.styles.get(*style)?;
                    let text = markup_to_plain(markup);

                    for line in wrap(&text, style.font, style.size, frame_width) {
                        if y - style.leading < bottom && y < top {
                            pages.push(std::mem::take(&mut page));
                            y = top;
                        }
                        y -= style.leading;

                        let line_width = style.font.text_width(&line, style.size);
                        let x = match style.align {
                            Align::Left => self.setup.margin,
                            Align::Center => self.setup.margin + (frame_width - line_width) / 2.0,
                        };
                        let baseline = y + (style.leading - style.size);
                        page.extend(text_operations(&line, style, x, baseline));
                    }

                    y = (y - style.space_after).max(bottom);
                }
            }
        }

        pages.push(page);
        Ok(pages)
    }

    /// Lay out `blocks` and write the complete PDF into memory.
    pub fn render(&self, blocks: &[Block], info: &DocumentInfo) -> Result<Vec<u8>> {
        let pages = self.layout(blocks)?;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in Font::all() {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| ChatpressError::Render(format!("Failed to encode page: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let media_box: Vec<Object> = vec![
            0i64.into(),
            0i64.into(),
            self.setup.width.into(),
            self.setup.height.into(),
        ];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(&info.title)),
            "Producer" => Object::string_literal(concat!("chatpress ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(pdf_date(&info.created)),
        });
        doc.trailer.set("Info", info_id);

        if self.compress {
            doc.compress();
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| ChatpressError::Render(format!("Failed to write PDF: {}", e)))?;
        Ok(buffer)
    }
}

fn text_operations(line: &str, style: &ParagraphStyle, x: f32, baseline: f32) -> Vec<Operation> {
    let Rgb(r, g, b) = style.color;
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![style.font.resource_name().into(), style.size.into()],
        ),
        Operation::new("rg", vec![r.into(), g.into(), b.into()]),
        Operation::new("Td", vec![x.into(), baseline.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// `D:YYYYMMDDHHmmSS+HH'mm'` as used in PDF date strings.
fn pdf_date(at: &DateTime<Local>) -> String {
    let offset = at.format("%z").to_string();
    let (hours, minutes) = offset.split_at(offset.len().min(3));
    format!("D:{}{}'{}'", at.format("%Y%m%d%H%M%S"), hours, minutes)
}
