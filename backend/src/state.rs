//! Application state management
//!
//! Shared resources handed to every operation: the document store, the
//! loaded configuration and the session token codec. Everything is built once
//! at startup and cheap to clone.

use crate::auth::SessionTokenCodec;
use crate::config::AppConfig;
use crate::store::{DocumentStore, SharedStore};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store backend
    pub store: SharedStore,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session token codec with pre-computed keys
    pub tokens: SessionTokenCodec,
}

impl AppState {
    /// Create a new application state, deriving the signing keys from the
    /// configured secret
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        let tokens = SessionTokenCodec::new(&config.jwt.secret, &config.jwt.issuer);

        Self {
            store,
            config: Arc::new(config),
            tokens,
        }
    }

    #[inline]
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn tokens(&self) -> &SessionTokenCodec {
        &self.tokens
    }
}
