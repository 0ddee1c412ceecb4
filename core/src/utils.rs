//! Utility functions and types.

use std::fmt::Debug;

/// Redact hides a secret in `Debug` output.
///
/// Secrets of 12 bytes or more keep their first and last three characters, which is
/// enough to tell two access tokens apart in a log. Anything shorter is hidden
/// completely and an empty secret prints as `EMPTY`.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.0;
        let len = s.len();
        if len == 0 {
            return f.write_str("EMPTY");
        }

        // Multi-byte characters at the edges are hidden too.
        match (s.get(..3), s.get(len.saturating_sub(3)..)) {
            (Some(head), Some(tail)) if len >= 12 => write!(f, "{head}***{tail}"),
            _ => f.write_str("***"),
        }
    }
}
