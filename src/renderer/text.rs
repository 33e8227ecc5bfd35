//! Text cleaning applied to every role and message before layout.

use html_escape::decode_html_entities;

/// Prepare extracted text for the paragraph markup used by the layout engine.
///
/// Steps, in order: decode HTML entities, escape `&`, `<` and `>` (ampersand
/// first), straighten curly quotes, strip literal triple backticks.
/// Applying it to already-cleaned text returns the same text.
///
/// The legacy forms `&amp`, `&lt`, `&gt` and `&quot` are decoded even without
/// a trailing semicolon, as browsers do.
pub fn clean_text(text: &str) -> String {
    decode_html_entities(&terminate_legacy_entities(text))
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace("```", "")
}

const LEGACY_ENTITIES: [&str; 4] = ["amp", "lt", "gt", "quot"];

/// Add the missing `;` to legacy entity references so they decode in one pass.
fn terminate_legacy_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..=pos]);
        rest = &rest[pos + 1..];

        if let Some(name) = LEGACY_ENTITIES.iter().find(|name| rest.starts_with(**name)) {
            out.push_str(name);
            rest = &rest[name.len()..];
            if !rest.starts_with(';') {
                out.push(';');
            }
        }
    }

    out.push_str(rest);
    out
}

/// Turn paragraph markup back into the characters to draw.
pub fn markup_to_plain(markup: &str) -> String {
    markup
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Non-empty, trimmed lines of a message body.
///
/// Runs of blank lines collapse away, so `"Hello\n\nWorld"` yields two lines.
pub fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup_characters() {
        assert_eq!(clean_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_decodes_entities_before_escaping() {
        assert_eq!(clean_text("Tom &amp; Jerry"), "Tom &amp; Jerry");
        assert_eq!(clean_text("&lt;div&gt;"), "&lt;div&gt;");
        assert_eq!(clean_text("caf&eacute;"), "café");
        assert_eq!(clean_text("it&rsquo;s"), "it's");
    }

    #[test]
    fn test_decodes_legacy_entities_without_semicolon() {
        assert_eq!(clean_text("&amp"), "&amp;");
        assert_eq!(clean_text("&lt"), "&lt;");
        assert_eq!(clean_text("a &lt b &gt c"), "a &lt; b &gt; c");
        assert_eq!(clean_text("&quotHi&quot"), "\"Hi\"");
        assert_eq!(clean_text("&ampersand"), "&amp;ersand");
        // decoded once, not twice
        assert_eq!(clean_text("&amp;lt"), "&amp;lt");
        assert_eq!(clean_text("AT&T & co"), "AT&amp;T &amp; co");
    }

    #[test]
    fn test_straightens_quotes() {
        assert_eq!(
            clean_text("\u{201c}Hi,\u{201d} she said. \u{2018}OK\u{2019}"),
            "\"Hi,\" she said. 'OK'"
        );
    }

    #[test]
    fn test_strips_code_fences() {
        assert_eq!(clean_text("```rust\nfn main() {}\n```"), "rust\nfn main() {}\n");
        assert_eq!(clean_text("`inline`"), "`inline`");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let samples = [
            "plain",
            "a & b",
            "<script>alert(1)</script>",
            "&amp;lt; already escaped",
            "&amp;amp;",
            "\u{201c}quoted\u{201d} and \u{2018}single\u{2019}",
            "&ldquo;entity quotes&rdquo;",
            "``````` seven ticks",
            "````",
            "mixed ```code``` & <tags> \"straight\"",
            "&#60;numeric&#62;",
            "&amp &lt &gt &quot",
            "&amp;lt",
            "",
        ];

        for sample in samples {
            let once = clean_text(sample);
            let twice = clean_text(&once);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_markup_round_trips_to_plain() {
        assert_eq!(markup_to_plain(&clean_text("x < y & y > z")), "x < y & y > z");
        assert_eq!(markup_to_plain(&clean_text("&amp;lt;")), "&lt;");
    }

    #[test]
    fn test_paragraphs_collapse_blank_lines() {
        let lines: Vec<_> = paragraphs("Hello\n\nWorld").collect();
        assert_eq!(lines, ["Hello", "World"]);
    }

    #[test]
    fn test_paragraphs_skip_whitespace_only_lines() {
        let lines: Vec<_> = paragraphs("  one  \r\n \t \n\n\ntwo\n   ").collect();
        assert_eq!(lines, ["one", "two"]);
        assert_eq!(paragraphs("").count(), 0);
        assert_eq!(paragraphs("\n \n").count(), 0);
    }
}
