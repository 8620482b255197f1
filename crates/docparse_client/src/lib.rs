//! Docparse client: authenticated transport, typed backend APIs, and the
//! orchestrators that drive the parse and history workflow state.
mod document;
mod history;
mod redirect;
mod token;
mod transport;

pub use document::{
    DocumentApi, ParseBackend, ParseOrchestrator, ParseParams, ParseRequest, DEFAULT_COLLECTION,
    NOT_AUTHENTICATED, TRANSFORM_PATH,
};
pub use history::{HistoryApi, HistoryBackend, HistoryStore, HISTORY_OK_CODE, HISTORY_PATH};
pub use redirect::{LoginRedirect, NoopLoginRedirect};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{
    BearerAuth, JsonNormalize, RequestSpec, RequestTransform, ResponseTransform,
    SessionExpiryWatch, Transport, TransportError, TransportErrorKind, TransportSettings,
    SESSION_EXPIRED_CODE,
};
