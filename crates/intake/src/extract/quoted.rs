use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;

pub const COMMENT_LEMMA: &str = "comment";
pub const DESCRIPTION_LEMMA: &str = "description";

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(.*?)'").expect("quoted-text pattern is valid"));

/// Every single-quoted string in the message, provided some token has the
/// trigger lemma. The quotes are not tied to the trigger's position: with
/// both "comment" and "description" in one message, both fields get all of
/// them.
pub fn extract_quoted(doc: &Document, trigger_lemma: &str) -> Vec<String> {
    if !doc.tokens().iter().any(|token| token.lemma_is(trigger_lemma)) {
        return Vec::new();
    }

    QUOTED
        .captures_iter(doc.text())
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
