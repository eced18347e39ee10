//! Tag extraction: pulls `<tag>...</tag>` blocks out of free-form model text.
//!
//! The ReAct and reflection protocols are carried inside ordinary completion
//! text as pseudo-XML tags (`<thought>`, `<tool_call>`, `<response>`, ...).
//! Everything that reads those tags goes through [`extract_tag_content`], so
//! the agent loops only ever branch on a [`TagContent`] value.
//!
//! Matching is non-greedy, spans newlines, and never fails: an unclosed tag
//! simply does not match.

use regex_lite::Regex;
use tracing::warn;

/// All occurrences of one tag found in a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagContent {
    /// Trimmed inner text of every match, in document order.
    pub content: Vec<String>,
    /// Whether at least one match was found.
    pub found: bool,
}

impl TagContent {
    /// The first match, if any.
    pub fn first(&self) -> Option<&str> {
        self.content.first().map(String::as_str)
    }
}

/// Extract the contents of every `<tag>...</tag>` pair in `text`.
pub fn extract_tag_content(text: &str, tag: &str) -> TagContent {
    let tag = regex_lite::escape(tag);
    let pattern = format!("(?s)<{tag}>(.*?)</{tag}>");

    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!(tag = %tag, "Could not build tag pattern: {e}");
            return TagContent::default();
        }
    };

    let content: Vec<String> = re
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect();

    TagContent {
        found: !content.is_empty(),
        content,
    }
}

/// Wrap `content` in an opening and closing `tag`.
pub fn wrap_tag(tag: &str, content: &str) -> String {
    format!("<{tag}>{content}</{tag}>")
}
