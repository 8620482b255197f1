use std::sync::Arc;

use client_logging::client_warn;
use docparse_core::{HistoryEntry, HistoryState};
use serde_json::Value;

use crate::token::TokenStore;
use crate::transport::{RequestSpec, Transport, TransportError};

pub const HISTORY_PATH: &str = "/v1/getHistory";
/// Envelope code marking a usable history payload. Numeric, unlike the
/// session-expiry code.
pub const HISTORY_OK_CODE: i64 = 200;

/// Backend seam for the history fetch.
#[async_trait::async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Fetches prior results. The stored credential is attached by the
    /// transport's auth transform; callers short-circuit on a missing
    /// credential before getting here.
    async fn fetch_history(&self) -> Result<Value, TransportError>;
}

/// The real backend: `GET /v1/getHistory` over the shared transport.
pub struct HistoryApi {
    transport: Arc<Transport>,
}

impl HistoryApi {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait::async_trait]
impl HistoryBackend for HistoryApi {
    async fn fetch_history(&self) -> Result<Value, TransportError> {
        self.transport.send(RequestSpec::get(HISTORY_PATH)).await
    }
}

/// Owns the cached history list; the only writer of its [`HistoryState`].
pub struct HistoryStore {
    state: HistoryState,
    backend: Arc<dyn HistoryBackend>,
    tokens: Arc<dyn TokenStore>,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn HistoryBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            state: HistoryState::new(),
            backend,
            tokens,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.state.entries()
    }

    /// Refreshes the list from the backend.
    ///
    /// No credential: no-op. Envelope code other than 200, or a payload
    /// without a record list: current entries stay untouched. A failed call
    /// is logged and swallowed; the user only sees that the list did not
    /// update.
    pub async fn load(&mut self) {
        if self.tokens.get().is_none() {
            return;
        }

        match self.backend.fetch_history().await {
            Ok(envelope) => {
                if envelope.get("code").and_then(Value::as_i64) != Some(HISTORY_OK_CODE) {
                    return;
                }
                let Some(records) = envelope.get("data").and_then(Value::as_array) else {
                    return;
                };
                let entries = records
                    .iter()
                    .cloned()
                    .map(HistoryEntry::from_record)
                    .collect();
                self.state.replace(entries);
            }
            Err(err) => {
                client_warn!("Failed to fetch history: {}", err);
            }
        }
    }

    /// Empties the list. Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.state.clear();
    }
}
