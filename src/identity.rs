/// Chat identifier extraction from the host page's log-payload attribute
use regex::Regex;
use std::sync::OnceLock;

/// Path prefix every chat identifier is built under.
pub const CHAT_PATH_PREFIX: &str = "/app/";

/// Grammar of the chat token inside the log payload: a quoted `c_` followed
/// by one or more lowercase hex digits. The payload itself is host-controlled
/// and loosely structured; nothing beyond the token is interpreted.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""(c_[0-9a-f]+)""#).expect("chat token pattern is valid"))
}

/// Extract a stable chat identifier from a chat element's identifying
/// attribute value.
///
/// Returns `None` when the payload does not contain a well-formed token —
/// typically because the host page inserted the element before populating
/// the attribute. Callers retry on the next attribute mutation, so this must
/// stay pure and cheap to call repeatedly.
///
/// Examples:
/// - `log("render", "c_4af9")` inside the payload → `/app/c_4af9`
/// - attribute missing the token → `None`
pub fn extract_chat_id(payload: &str) -> Option<String> {
    let captures = token_pattern().captures(payload)?;
    Some(format!("{}{}", CHAT_PATH_PREFIX, &captures[1]))
}
