//! HTML for the single-page web UI.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::Conversation;

/// A transient status line shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Info(_) => "info",
            Notice::Warning(_) => "warning",
            Notice::Error(_) => "error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Info(m) | Notice::Warning(m) | Notice::Error(m) => m,
        }
    }
}

/// Everything the page shows for one response.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Value to pre-fill the share link field with.
    pub url: &'a str,
    pub notices: Vec<Notice>,
    /// The session's current (possibly edited) conversation.
    pub conversation: Option<&'a Conversation>,
}

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; max-width: 1100px; margin: 0 auto; padding: 2rem; color: #262730; }
input[type=text], textarea { width: 100%; box-sizing: border-box; padding: .5rem; font: inherit; }
textarea { min-height: 100px; }
button, a.button { display: block; width: 100%; margin-top: 1rem; padding: .6rem; text-align: center; border: 1px solid #ccc; border-radius: 6px; background: #fff; color: inherit; text-decoration: none; cursor: pointer; }
.turn { display: grid; grid-template-columns: 1fr 4fr; gap: 1rem; padding: 10px 0; border-bottom: 1px solid #eee; }
.edited-message { background-color: #f0f8ff; padding: 10px; border-radius: 5px; }
.notice { padding: .75rem 1rem; border-radius: 6px; margin: .5rem 0; }
.notice.success { background: #e8f5e9; } .notice.info { background: #e3f2fd; }
.notice.warning { background: #fff8e1; } .notice.error { background: #ffebee; }
"#;

pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>ChatGPT Conversation Extractor</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Make your GPT chats a PDF</h1>\n\
         <p>Enter a ChatGPT share link to extract, edit, and download the conversation as a PDF.</p>\n"
    );

    for notice in &view.notices {
        let _ = writeln!(
            html,
            "<div class=\"notice {}\">{}</div>",
            notice.class(),
            encode_text(notice.message())
        );
    }

    let _ = write!(
        html,
        "<form method=\"post\" action=\"/extract\">\n\
         <label for=\"url\">ChatGPT Share Link</label>\n\
         <input type=\"text\" id=\"url\" name=\"url\" value=\"{}\" placeholder=\"https://chat.openai.com/share/...\">\n\
         <button type=\"submit\">Extract Conversation</button>\n</form>\n",
        encode_double_quoted_attribute(view.url)
    );

    if let Some(conversation) = view.conversation {
        render_editor(&mut html, conversation);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_editor(html: &mut String, conversation: &Conversation) {
    html.push_str(
        "<a class=\"button\" href=\"/download/original\">Download Original PDF</a>\n\
         <h2>Edit Conversation</h2>\n<form method=\"post\" action=\"/edit\">\n",
    );

    for (idx, turn) in conversation.turns().iter().enumerate() {
        let class = if turn.edited { "turn edited-message" } else { "turn" };
        let _ = write!(
            html,
            "<div class=\"{class}\">\n\
             <div><label for=\"role_{idx}\">Prompt {n}</label>\n\
             <input type=\"text\" id=\"role_{idx}\" name=\"role_{idx}\" value=\"{role}\"></div>\n\
             <div><label for=\"message_{idx}\">Response {n}</label>\n\
             <textarea id=\"message_{idx}\" name=\"message_{idx}\">{message}</textarea></div>\n\
             </div>\n",
            n = idx + 1,
            role = encode_double_quoted_attribute(&turn.role),
            message = encode_text(&turn.message),
        );
    }

    html.push_str(
        "<button type=\"submit\">Save Edits</button>\n</form>\n\
         <a class=\"button\" href=\"/download/edited\">Download Edited PDF</a>\n",
    );
}
