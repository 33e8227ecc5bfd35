use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{Conversation, ShareUrl};
use crate::renderer::{EDITED_FILENAME, ORIGINAL_FILENAME, PDF_MIME};
use crate::server::page::{self, Notice, PageView};
use crate::server::session::{SessionId, SessionState};
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/extract", post(extract))
        .route("/edit", post(edit))
        .route("/download/{kind}", get(download))
}

#[derive(Debug, Deserialize)]
pub struct ExtractForm {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub metadata: Option<bool>,
}

/// Which copy of the session's conversation to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Original,
    Edited,
}

impl DocumentKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "original" => Some(DocumentKind::Original),
            "edited" => Some(DocumentKind::Edited),
            _ => None,
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            DocumentKind::Original => ORIGINAL_FILENAME,
            DocumentKind::Edited => EDITED_FILENAME,
        }
    }

    fn pick(self, state: SessionState) -> Option<Conversation> {
        match self {
            DocumentKind::Original => state.original,
            DocumentKind::Edited => state.current,
        }
    }
}

fn page_response(session: SessionId, status: StatusCode, view: &PageView<'_>) -> Response {
    let mut response = (status, Html(page::render(view))).into_response();
    session.attach(&mut response);
    response
}

/// GET /: the form, plus the editor when a conversation is loaded.
async fn index(State(app): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = SessionId::from_headers(&headers);
    let state = app.sessions.get(session.id()).await;

    let view = PageView {
        conversation: state.current.as_ref(),
        ..Default::default()
    };
    page_response(session, StatusCode::OK, &view)
}

/// POST /extract: validate the link and scrape the conversation.
async fn extract(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ExtractForm>,
) -> Response {
    let session = SessionId::from_headers(&headers);
    let previous = app.sessions.get(session.id()).await;
    let raw = form.url.trim();

    if raw.is_empty() {
        let view = PageView {
            notices: vec![Notice::Warning("Please enter a ChatGPT share link.".into())],
            conversation: previous.current.as_ref(),
            ..Default::default()
        };
        return page_response(session, StatusCode::UNPROCESSABLE_ENTITY, &view);
    }

    let url = match ShareUrl::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            warn!("Rejected share link: {}", e);
            let view = PageView {
                url: raw,
                notices: vec![
                    Notice::Error(
                        "Invalid ChatGPT share URL format. Please check the URL and try again."
                            .into(),
                    ),
                    Notice::Info(
                        "Make sure the URL starts with 'https://' and follows the format: \
                         https://chat.openai.com/share/[ID]"
                            .into(),
                    ),
                ],
                conversation: previous.current.as_ref(),
            };
            return page_response(session, StatusCode::UNPROCESSABLE_ENTITY, &view);
        }
    };

    match app.ctx.extractor.extract(&url).await {
        Ok(conversation) => {
            info!(
                "Session {} extracted {} turns from share {}",
                session.id(),
                conversation.len(),
                url.token()
            );
            let notice = if conversation.is_empty() {
                Notice::Warning("No messages were found on that page.".into())
            } else {
                Notice::Success(format!("Extracted {} messages.", conversation.len()))
            };

            let state = SessionState::extracted(conversation);
            app.sessions.replace(session.id(), state.clone()).await;

            let view = PageView {
                url: url.as_str(),
                notices: vec![notice],
                conversation: state.current.as_ref(),
            };
            page_response(session, StatusCode::OK, &view)
        }
        Err(e) => {
            let view = PageView {
                url: url.as_str(),
                notices: vec![Notice::Error(e.to_string())],
                conversation: previous.current.as_ref(),
            };
            page_response(session, StatusCode::BAD_GATEWAY, &view)
        }
    }
}

/// POST /edit: rebuild the current conversation from the editor fields.
async fn edit(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let session = SessionId::from_headers(&headers);

    let updated = app
        .sessions
        .update(session.id(), |state| {
            let original = state.original.as_ref()?;
            state.with_edits(collect_edits(original, fields))
        })
        .await;

    let Some(state) = updated else {
        let view = PageView {
            notices: vec![Notice::Warning("Extract a conversation before editing.".into())],
            ..Default::default()
        };
        return page_response(session, StatusCode::CONFLICT, &view);
    };

    let total = state.original.as_ref().map_or(0, Conversation::len);
    let edited = state
        .current
        .as_ref()
        .map_or(0, |c| c.turns().iter().filter(|t| t.edited).count());
    let view = PageView {
        notices: vec![Notice::Success(format!(
            "Saved. {} of {} messages edited.",
            edited, total
        ))],
        conversation: state.current.as_ref(),
        ..Default::default()
    };
    page_response(session, StatusCode::OK, &view)
}

/// GET /download/{original|edited}: the conversation as a PDF attachment.
async fn download(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(kind): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let session = SessionId::from_headers(&headers);

    let Some(kind) = DocumentKind::parse(&kind) else {
        let view = PageView {
            notices: vec![Notice::Error(format!("Unknown document: {}", kind))],
            ..Default::default()
        };
        return page_response(session, StatusCode::NOT_FOUND, &view);
    };

    let Some(conversation) = kind.pick(app.sessions.get(session.id()).await) else {
        let view = PageView {
            notices: vec![Notice::Warning(
                "Extract a conversation before downloading.".into(),
            )],
            ..Default::default()
        };
        return page_response(session, StatusCode::NOT_FOUND, &view);
    };

    let include_metadata = query
        .metadata
        .unwrap_or(app.ctx.config.renderer.include_metadata);

    match app.ctx.renderer.render(&conversation, include_metadata) {
        Ok(pdf) => {
            let mut response = (
                [
                    (CONTENT_TYPE, PDF_MIME.to_string()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", kind.filename()),
                    ),
                ],
                pdf,
            )
                .into_response();
            session.attach(&mut response);
            response
        }
        Err(e) => {
            let view = PageView {
                notices: vec![Notice::Error(e.to_string())],
                conversation: Some(&conversation),
                ..Default::default()
            };
            page_response(session, StatusCode::INTERNAL_SERVER_ERROR, &view)
        }
    }
}

/// Pair up `role_{i}` / `message_{i}` fields into one edit per extracted turn.
///
/// A missing field keeps the extracted value. Textarea line endings are
/// normalized so an untouched message compares equal to the original.
fn collect_edits(original: &Conversation, fields: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut roles = BTreeMap::new();
    let mut messages = BTreeMap::new();

    for (name, value) in fields {
        if let Some(idx) = name.strip_prefix("role_").and_then(|i| i.parse::<usize>().ok()) {
            roles.insert(idx, value);
        } else if let Some(idx) = name
            .strip_prefix("message_")
            .and_then(|i| i.parse::<usize>().ok())
        {
            messages.insert(idx, value.replace("\r\n", "\n"));
        }
    }

    original
        .turns()
        .iter()
        .enumerate()
        .map(|(idx, turn)| {
            (
                roles.remove(&idx).unwrap_or_else(|| turn.role.clone()),
                messages.remove(&idx).unwrap_or_else(|| turn.message.clone()),
            )
        })
        .collect()
}
