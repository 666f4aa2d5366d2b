//! Deep-link ids correlating modal instances with the location hash.

use core::fmt;

/// Error from validating a deep-link id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLinkError {
    /// The id (after stripping a leading `#`) was empty.
    Empty,
    /// The id contains a character that cannot appear in a lookup key.
    InvalidChar { id: String, ch: char },
}

impl fmt::Display for DeepLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "deep-link id is empty"),
            Self::InvalidChar { id, ch } => {
                write!(f, "deep-link id {id:?} contains invalid character {ch:?}")
            }
        }
    }
}

impl std::error::Error for DeepLinkError {}

/// A validated deep-link id.
///
/// Valid ids are non-empty and contain no whitespace, control characters,
/// quotes, backslashes, brackets or `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeepLinkId(String);

impl DeepLinkId {
    pub fn parse(raw: &str) -> Result<Self, DeepLinkError> {
        if raw.is_empty() {
            return Err(DeepLinkError::Empty);
        }
        if let Some(ch) = raw.chars().find(|&c| is_forbidden(c)) {
            return Err(DeepLinkError::InvalidChar {
                id: raw.to_owned(),
                ch,
            });
        }
        Ok(Self(raw.to_owned()))
    }

    /// Parse a location-hash fragment, with or without its leading `#`.
    ///
    /// `Ok(None)` means the hash is cleared.
    pub fn from_fragment(fragment: &str) -> Result<Option<Self>, DeepLinkError> {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        if id.is_empty() {
            return Ok(None);
        }
        Self::parse(id).map(Some)
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_forbidden(c: char) -> bool {
    c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '\\' | '#' | '[' | ']')
}

impl fmt::Display for DeepLinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeepLinkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_ids() {
        assert_eq!(DeepLinkId::parse("modal").map(|d| d.to_string()), Ok("modal".into()));
        assert!(DeepLinkId::parse("stock-reminder_2").is_ok());
    }

    #[test]
    fn rejects_selector_breaking_ids() {
        assert_eq!(DeepLinkId::parse(""), Err(DeepLinkError::Empty));
        for bad in ["a\"b", "a b", "x]", "back\\slash", "#twice"] {
            assert!(DeepLinkId::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn fragment_strips_hash() {
        assert_eq!(
            DeepLinkId::from_fragment("#foo"),
            Ok(Some(DeepLinkId("foo".into())))
        );
        assert_eq!(DeepLinkId::from_fragment("#"), Ok(None));
        assert_eq!(DeepLinkId::from_fragment(""), Ok(None));
        assert!(DeepLinkId::from_fragment("#\"oops").is_err());
    }
}
