use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use client_logging::client_error;
use reqwest::Method;
use serde_json::Value;

use crate::redirect::LoginRedirect;
use crate::token::TokenStore;

/// Body-level code the backend uses to signal an expired session. The
/// backend sends it as a JSON string, so the comparison is strict on type.
pub const SESSION_EXPIRED_CODE: &str = "401";

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl TransportSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

/// One outbound call: method, path relative to the base URL, optional
/// explicit bearer token, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            bearer: None,
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            bearer: None,
            body: Some(body),
        }
    }

    /// Pins an explicit bearer token; the auth transform will not replace it.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    NetworkFailure,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::NetworkFailure => write!(f, "network failure"),
        }
    }
}

/// Mutates an outbound request before dispatch.
pub trait RequestTransform: Send + Sync {
    fn apply(&self, spec: &mut RequestSpec);
}

/// Attaches the stored credential as `Authorization: Bearer <token>` unless
/// the caller pinned one. With no credential the request goes out
/// unauthenticated; rejecting it is the server's job.
pub struct BearerAuth {
    tokens: Arc<dyn TokenStore>,
}

impl BearerAuth {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }
}

impl RequestTransform for BearerAuth {
    fn apply(&self, spec: &mut RequestSpec) {
        if spec.bearer.is_none() {
            spec.bearer = self.tokens.get();
        }
    }
}

/// Rewrites a normalized response body before it reaches the caller.
pub trait ResponseTransform: Send + Sync {
    fn apply(&self, body: Value) -> Value;
}

/// Parses string bodies into JSON. A body that is not valid JSON passes
/// through verbatim; a malformed response is never an error here.
pub struct JsonNormalize;

impl ResponseTransform for JsonNormalize {
    fn apply(&self, body: Value) -> Value {
        match body {
            Value::String(raw) => match serde_json::from_str(&raw) {
                Ok(parsed) => parsed,
                Err(_) => Value::String(raw),
            },
            other => other,
        }
    }
}

/// Watches normalized bodies for the session-expiry code and asks the
/// navigation layer for the login surface. The body still flows back to the
/// caller unchanged; the call itself does not fail on this signal.
pub struct SessionExpiryWatch {
    redirect: Arc<dyn LoginRedirect>,
}

impl SessionExpiryWatch {
    pub fn new(redirect: Arc<dyn LoginRedirect>) -> Self {
        Self { redirect }
    }
}

impl ResponseTransform for SessionExpiryWatch {
    fn apply(&self, body: Value) -> Value {
        if body.get("code").and_then(Value::as_str) == Some(SESSION_EXPIRED_CODE) {
            self.redirect.go_to_login();
        }
        body
    }
}

/// Configured HTTP client with an explicit interceptor pipeline: request
/// transforms run before dispatch, response transforms after.
pub struct Transport {
    http: reqwest::Client,
    settings: TransportSettings,
    request_transforms: Vec<Box<dyn RequestTransform>>,
    response_transforms: Vec<Box<dyn ResponseTransform>>,
}

impl Transport {
    pub fn new(
        settings: TransportSettings,
        tokens: Arc<dyn TokenStore>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| {
                TransportError::new(TransportErrorKind::NetworkFailure, err.to_string())
            })?;
        Ok(Self {
            http,
            settings,
            request_transforms: vec![Box::new(BearerAuth::new(tokens))],
            response_transforms: vec![
                Box::new(JsonNormalize),
                Box::new(SessionExpiryWatch::new(redirect)),
            ],
        })
    }

    /// Dispatches one request and returns the normalized body.
    ///
    /// Only true transport failures surface as errors: timeouts, network
    /// errors, and non-2xx responses whose body is not a JSON envelope.
    /// A non-2xx response carrying a parseable envelope is returned so
    /// callers can inspect its code.
    pub async fn send(&self, mut spec: RequestSpec) -> Result<Value, TransportError> {
        for transform in &self.request_transforms {
            transform.apply(&mut spec);
        }

        let url = format!("{}{}", self.settings.base_url, spec.path);
        let mut request = self.http.request(spec.method.clone(), &url);
        if let Some(token) = &spec.bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.fail(&url, map_reqwest_error(err)))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| self.fail(&url, map_reqwest_error(err)))?;

        let mut body = Value::String(text);
        for transform in &self.response_transforms {
            body = transform.apply(body);
        }

        if !status.is_success() && matches!(body, Value::String(_)) {
            return Err(self.fail(
                &url,
                TransportError::new(
                    TransportErrorKind::NetworkFailure,
                    format!("http status {status}"),
                ),
            ));
        }
        Ok(body)
    }

    /// Every transport error hits the diagnostic channel before propagating.
    fn fail(&self, url: &str, err: TransportError) -> TransportError {
        client_error!("Request to {} failed ({}): {}", url, err.kind, err);
        err
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportErrorKind::Timeout, err.to_string());
    }
    TransportError::new(TransportErrorKind::NetworkFailure, err.to_string())
}
