use std::fmt;

use url::Url;

use crate::app::{ChatpressError, Result};

/// Host every accepted link is normalized to.
pub const CANONICAL_PREFIX: &str = "https://chat.openai.com/share/";

const ALTERNATE_PREFIX: &str = "https://chatgpt.com/share/";

/// A validated, canonical ChatGPT share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareUrl {
    url: Url,
    token: String,
}

impl ShareUrl {
    /// Validate a raw user-supplied link.
    ///
    /// Accepts `https://chat.openai.com/share/<token>` and
    /// `https://chatgpt.com/share/<token>` where the token is made of ASCII
    /// letters, digits and `-`. The `chatgpt.com` form is rewritten to
    /// `chat.openai.com`. Anything else is an [`ChatpressError::InvalidUrl`].
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        let token = trimmed
            .strip_prefix(CANONICAL_PREFIX)
            .or_else(|| trimmed.strip_prefix(ALTERNATE_PREFIX))
            .filter(|token| Self::is_valid_token(token))
            .ok_or_else(|| ChatpressError::InvalidUrl(trimmed.to_string()))?;

        let url = Url::parse(&format!("{}{}", CANONICAL_PREFIX, token))
            .map_err(|e| ChatpressError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

        Ok(Self {
            url,
            token: token.to_string(),
        })
    }

    fn is_valid_token(token: &str) -> bool {
        !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// The share token, i.e. the last path segment.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for ShareUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShareUrl {
    type Err = ChatpressError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_link_is_unchanged() {
        let url = ShareUrl::parse("https://chat.openai.com/share/abc-123").unwrap();
        assert_eq!(url.as_str(), "https://chat.openai.com/share/abc-123");
        assert_eq!(url.token(), "abc-123");
    }

    #[test]
    fn test_alternate_host_is_rewritten() {
        let url = ShareUrl::parse("https://chatgpt.com/share/abc123").unwrap();
        assert_eq!(url.as_str(), "https://chat.openai.com/share/abc123");
        assert_eq!(url.token(), "abc123");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let url = ShareUrl::parse("  https://chatgpt.com/share/6f0e-11aa \n").unwrap();
        assert_eq!(url.to_string(), "https://chat.openai.com/share/6f0e-11aa");
    }

    #[test]
    fn test_rejects_malformed_links() {
        let rejected = [
            "",
            "   ",
            "not a url",
            "http://chat.openai.com/share/abc",
            "http://chatgpt.com/share/abc",
            "https://chat.openai.com/share/",
            "https://chatgpt.com/share/",
            "https://chat.openai.com/share/abc/def",
            "https://chat.openai.com/share/abc/",
            "https://chat.openai.com/share/abc?x=1",
            "https://chat.openai.com/share/abc#top",
            "https://chat.openai.com/share/abc_def",
            "https://chat.openai.com/share/ab.cd",
            "https://chat.openai.com/c/abc",
            "https://chat.openai.com:443/share/abc",
            "https://example.com/share/abc",
            "https://CHATGPT.com/share/abc",
            "https://evilchatgpt.com/share/abc",
        ];

        for raw in rejected {
            assert!(
                matches!(ShareUrl::parse(raw), Err(ChatpressError::InvalidUrl(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let url: ShareUrl = "https://chatgpt.com/share/x".parse().unwrap();
        assert_eq!(url.as_url().host_str(), Some("chat.openai.com"));
    }
}
