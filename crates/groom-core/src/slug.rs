//! Room slug type.
//!
//! A slug is the path segment users type to reach a room (`/team-standup`).
//! It must never collide with the gateway's own top-level routes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 64;

/// Path segments owned by the gateway itself.
const RESERVED: &[&str] = &["api", "auth", "healthz"];

/// Errors that can occur when parsing a slug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    /// The slug is empty.
    #[error("slug must not be empty")]
    Empty,

    /// The slug exceeds the maximum length.
    #[error("slug must be at most {MAX_SLUG_LEN} characters, got {0}")]
    TooLong(usize),

    /// The slug contains a character outside `[a-z0-9_-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),

    /// The slug collides with a gateway route.
    #[error("slug {0:?} is reserved")]
    Reserved(String),
}

/// A validated room slug.
///
/// Slugs are lowercase ASCII letters, digits, hyphens and underscores.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parse and validate a slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is empty, too long, reserved, or contains
    /// characters other than lowercase letters, digits, `-` and `_`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        let len = s.chars().count();
        if len > MAX_SLUG_LEN {
            return Err(SlugError::TooLong(len));
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
        {
            return Err(SlugError::InvalidCharacter(c));
        }

        if RESERVED.contains(&s) {
            return Err(SlugError::Reserved(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }

    /// Return the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the slug and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slug({})", self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
