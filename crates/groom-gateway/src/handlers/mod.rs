//! HTTP request handlers.
//!
//! This module contains all the endpoint handlers for the gateway.

pub mod auth;
pub mod directory;
pub mod health;
pub mod rooms;
