//! # chatpress
//!
//! Turns shared ChatGPT conversations into PDF documents.
//!
//! ## Architecture
//!
//! ```text
//! ShareUrl → Extractor (headless Chrome) → Conversation → edit → PdfRenderer → bytes
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Check a link
//! chatpress validate https://chatgpt.com/share/abc123
//!
//! # Straight to PDF
//! chatpress render --url https://chatgpt.com/share/abc123
//!
//! # Web UI with editing
//! chatpress serve --open
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`domain`]: Conversation turns and share links
//! - [`extractor`]: Browser-driven conversation scraping
//! - [`renderer`]: PDF layout and output
//! - [`server`]: Web UI

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires the extractor and
/// renderer to the loaded configuration.
pub mod app;

/// Command-line interface using clap.
///
/// - `serve` - Run the web UI
/// - `validate <url>` - Print the canonical share link
/// - `extract <url>` - Dump turns as JSON
/// - `render` - Write a PDF from a link or a JSON dump
pub mod cli;

/// Configuration loaded from `~/.config/chatpress/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`ConversationTurn`](domain::ConversationTurn): one role/message pair
/// - [`Conversation`](domain::Conversation): ordered turns
/// - [`ShareUrl`](domain::ShareUrl): a validated, canonical share link
pub mod domain;

/// Conversation extraction through headless Chrome.
///
/// - [`Extractor`](extractor::Extractor): Async trait for extraction
/// - [`ConversationExtractor`](extractor::ConversationExtractor): wait, settle, then query all
/// - [`ChromeLauncher`](extractor::ChromeLauncher): chromiumoxide-backed browser
pub mod extractor;

/// PDF rendering with a small flowable layout engine over lopdf.
pub mod renderer;

/// Web UI built with axum.
///
/// One page with an extract form, an editor for the extracted turns and
/// download links for the original and edited PDFs.
pub mod server;
