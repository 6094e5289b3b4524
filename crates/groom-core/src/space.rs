//! Space references.
//!
//! A room stores a single string pointing at a Google Meet space. Older rows
//! hold the meeting code directly (`abc-mnop-xyz`); newer rows hold the
//! canonical resource name (`spaces/jQCFfuBOdN5z`). This module classifies the
//! stored string so callers can branch on the format without string sniffing.

use std::fmt;

/// Prefix of canonical Meet resource names.
pub const SPACE_NAME_PREFIX: &str = "spaces/";

/// Base URL meeting codes are joined against.
pub const MEET_JOIN_BASE_URL: &str = "https://meet.google.com/";

/// A classified space reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpaceReference {
    /// A canonical `spaces/{id}` resource name.
    Canonical(String),
    /// A legacy meeting code, already join-ready.
    Legacy(String),
    /// No space has been allocated yet.
    Empty,
}

impl SpaceReference {
    /// Classify a stored space reference.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            Self::Empty
        } else if raw.starts_with(SPACE_NAME_PREFIX) {
            Self::Canonical(raw.to_string())
        } else {
            Self::Legacy(raw.to_string())
        }
    }

    /// Returns `true` for canonical resource names.
    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        matches!(self, Self::Canonical(_))
    }

    /// Returns `true` for legacy meeting codes.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// The join URI for a legacy meeting code, built without a directory lookup.
    ///
    /// Returns `None` for canonical and empty references.
    #[must_use]
    pub fn legacy_join_uri(&self) -> Option<String> {
        match self {
            Self::Legacy(code) => Some(join_uri_for_code(code)),
            Self::Canonical(_) | Self::Empty => None,
        }
    }

    /// The provider-qualified name used to look a legacy code up.
    ///
    /// The Meet API accepts `spaces/{meeting_code}` as an alias for the space.
    #[must_use]
    pub fn provider_name(&self) -> Option<String> {
        match self {
            Self::Canonical(name) => Some(name.clone()),
            Self::Legacy(code) => Some(format!("{SPACE_NAME_PREFIX}{code}")),
            Self::Empty => None,
        }
    }

    /// The stored string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(s) | Self::Legacy(s) => s,
            Self::Empty => "",
        }
    }
}

impl fmt::Display for SpaceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a join URI from a meeting code.
#[must_use]
pub fn join_uri_for_code(code: &str) -> String {
    format!("{MEET_JOIN_BASE_URL}{code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(
            SpaceReference::parse("spaces/abc"),
            SpaceReference::Canonical("spaces/abc".into())
        );
        assert_eq!(
            SpaceReference::parse("abc-mnop-xyz"),
            SpaceReference::Legacy("abc-mnop-xyz".into())
        );
        assert_eq!(SpaceReference::parse(""), SpaceReference::Empty);
        assert_eq!(SpaceReference::parse("   "), SpaceReference::Empty);
    }

    #[test]
    fn legacy_join_uri() {
        let legacy = SpaceReference::parse("abc-mnop-xyz");
        assert_eq!(
            legacy.legacy_join_uri().unwrap(),
            "https://meet.google.com/abc-mnop-xyz"
        );
        assert!(SpaceReference::parse("spaces/abc")
            .legacy_join_uri()
            .is_none());
    }

    #[test]
    fn provider_name() {
        assert_eq!(
            SpaceReference::parse("abc-mnop-xyz").provider_name().unwrap(),
            "spaces/abc-mnop-xyz"
        );
        assert_eq!(
            SpaceReference::parse("spaces/abc").provider_name().unwrap(),
            "spaces/abc"
        );
        assert!(SpaceReference::Empty.provider_name().is_none());
    }
}
