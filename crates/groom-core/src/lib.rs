//! Core types and utilities for groom.
//!
//! This crate provides the foundational types used throughout the groom gateway:
//!
//! - **Slugs**: Validated short names that route to a meeting room
//! - **Space references**: The two formats a room can point at (legacy meeting
//!   codes and canonical `spaces/{id}` resource names)
//!
//! # Example
//!
//! ```
//! use groom_core::{Slug, SpaceReference};
//!
//! let slug = Slug::parse("team-standup").unwrap();
//! assert_eq!(slug.as_str(), "team-standup");
//!
//! let reference = SpaceReference::parse("spaces/jQCFfuBOdN5z");
//! assert!(reference.is_canonical());
//!
//! let legacy = SpaceReference::parse("abc-mnop-xyz");
//! assert_eq!(
//!     legacy.legacy_join_uri().as_deref(),
//!     Some("https://meet.google.com/abc-mnop-xyz")
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod slug;
pub mod space;

pub use slug::{Slug, SlugError};
pub use space::{join_uri_for_code, SpaceReference, MEET_JOIN_BASE_URL, SPACE_NAME_PREFIX};
