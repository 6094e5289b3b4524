//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use groom_auth::{IdentityGate, IdentityProvider};
use groom_control::RoomControl;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// This struct holds references to all services needed by the HTTP handlers.
pub struct GatewayState<C, P>
where
    C: RoomControl,
    P: IdentityProvider,
{
    /// Room resolution and management.
    pub rooms: Arc<C>,
    /// Domain-restricted login.
    pub gate: IdentityGate<P>,
    /// Gateway configuration.
    pub config: GatewayConfig,
    api_key_digest: blake3::Hash,
}

impl<C, P> GatewayState<C, P>
where
    C: RoomControl,
    P: IdentityProvider,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(rooms: Arc<C>, gate: IdentityGate<P>, config: GatewayConfig) -> Self {
        let api_key_digest = blake3::hash(config.api_key.as_bytes());
        Self {
            rooms,
            gate,
            config,
            api_key_digest,
        }
    }

    /// Check a presented API key.
    ///
    /// Keys are compared by digest; `blake3::Hash` equality is constant-time.
    #[must_use]
    pub fn api_key_matches(&self, presented: &str) -> bool {
        blake3::hash(presented.as_bytes()) == self.api_key_digest
    }
}

impl<C, P> Clone for GatewayState<C, P>
where
    C: RoomControl,
    P: IdentityProvider,
{
    fn clone(&self) -> Self {
        Self {
            rooms: Arc::clone(&self.rooms),
            gate: self.gate.clone(),
            config: self.config.clone(),
            api_key_digest: self.api_key_digest,
        }
    }
}
