use std::sync::Arc;

use docparse_core::ParseState;
use serde::Serialize;
use serde_json::Value;

use crate::token::TokenStore;
use crate::transport::{RequestSpec, Transport, TransportError, TransportErrorKind};

pub const TRANSFORM_PATH: &str = "/v1/transform";
pub const DEFAULT_COLLECTION: &str = "default";
/// Error committed when a submission starts without a stored credential.
pub const NOT_AUTHENTICATED: &str = "not authenticated";

/// Caller-supplied inputs for one parse submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseParams {
    pub id: String,
    pub url: String,
    pub user_access_token: String,
    pub with_image_download: bool,
    pub is_file: bool,
}

/// Wire shape of a parse submission. Field names match the backend exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseRequest {
    pub id: String,
    pub url: String,
    pub collection: String,
    pub access_key: String,
    pub user_access_token: String,
    pub with_image_download: bool,
    pub is_file: bool,
}

impl ParseRequest {
    /// Builds the request for one submission; the credential goes into both
    /// `access_key` and, via the explicit bearer, the Authorization header.
    pub fn from_params(params: &ParseParams, access_key: impl Into<String>) -> Self {
        Self {
            id: params.id.clone(),
            url: params.url.clone(),
            collection: DEFAULT_COLLECTION.to_string(),
            access_key: access_key.into(),
            user_access_token: params.user_access_token.clone(),
            with_image_download: params.with_image_download,
            is_file: params.is_file,
        }
    }
}

/// Backend seam for the parse operation.
#[async_trait::async_trait]
pub trait ParseBackend: Send + Sync {
    /// Submits a document-parse request and resolves to the response
    /// envelope. No validation happens here; transport errors propagate
    /// unchanged.
    async fn submit_parse(&self, request: &ParseRequest) -> Result<Value, TransportError>;
}

/// The real backend: `POST /v1/transform` over the shared transport.
pub struct DocumentApi {
    transport: Arc<Transport>,
}

impl DocumentApi {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait::async_trait]
impl ParseBackend for DocumentApi {
    async fn submit_parse(&self, request: &ParseRequest) -> Result<Value, TransportError> {
        let body = serde_json::to_value(request).map_err(|err| {
            TransportError::new(TransportErrorKind::NetworkFailure, err.to_string())
        })?;
        let spec =
            RequestSpec::post(TRANSFORM_PATH, body).with_bearer(request.access_key.clone());
        self.transport.send(spec).await
    }
}

/// Drives the parse workflow; the only writer of its [`ParseState`].
pub struct ParseOrchestrator {
    state: ParseState,
    backend: Arc<dyn ParseBackend>,
    tokens: Arc<dyn TokenStore>,
}

impl ParseOrchestrator {
    pub fn new(backend: Arc<dyn ParseBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            state: ParseState::new(),
            backend,
            tokens,
        }
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Submits one document for parsing and commits the outcome.
    ///
    /// Without a credential the submission fails locally and the backend is
    /// never called. Overlapping submissions are not guarded; a second
    /// submit restarts the cycle and the last settled call wins.
    pub async fn submit(&mut self, params: ParseParams) {
        self.state.begin();

        let Some(token) = self.tokens.get() else {
            self.state.fail(NOT_AUTHENTICATED);
            return;
        };

        let request = ParseRequest::from_params(&params, token);
        match self.backend.submit_parse(&request).await {
            Ok(envelope) => {
                let data = envelope.get("data").cloned().unwrap_or(Value::Null);
                self.state.succeed(data);
            }
            Err(err) => self.state.fail(err.to_string()),
        }
    }
}
