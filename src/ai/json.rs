//! Model reply parsing

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

/// A whole reply wrapped in ```lang ... ```
static FENCE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").ok());

/// Strip a surrounding Markdown code fence, if any
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    FENCE_PATTERN
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(2))
        .map(|body| body.as_str().trim())
        .filter(|body| !body.is_empty())
        .unwrap_or(trimmed)
}

/// Parse a JSON reply, tolerating a fenced block
///
/// Returns `None` and logs the raw text when the payload is not valid JSON
/// for `T`.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Option<T> {
    match serde_json::from_str(strip_code_fence(text)) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, raw = %text, "Failed to parse JSON reply");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        name: String,
    }

    #[test]
    fn test_plain_json() {
        let reply: Reply = parse_json_reply(r#"  {"name": "plan"}  "#).unwrap();
        assert_eq!(reply.name, "plan");
    }

    #[test]
    fn test_fenced_json_with_and_without_tag() {
        let tagged = "```json\n{\"name\": \"a\"}\n```";
        let bare = "```\n{\"name\": \"b\"}\n```";
        let inline = "```{\"name\": \"c\"}```";

        assert_eq!(parse_json_reply::<Reply>(tagged).unwrap().name, "a");
        assert_eq!(parse_json_reply::<Reply>(bare).unwrap().name, "b");
        assert_eq!(parse_json_reply::<Reply>(inline).unwrap().name, "c");
    }

    #[test]
    fn test_only_outer_fence_is_stripped() {
        let text = "Here you go:\n```json\n{\"name\": \"a\"}\n```";
        assert_eq!(strip_code_fence(text), text);
        assert!(parse_json_reply::<Reply>(text).is_none());
    }

    #[test]
    fn test_invalid_json_is_none() {
        assert!(parse_json_reply::<Reply>("```json\n{name: oops}\n```").is_none());
        assert!(parse_json_reply::<Reply>("").is_none());
    }
}
