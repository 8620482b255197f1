/// Navigation seam invoked when the backend signals an expired session.
///
/// Implementations must tolerate repeated signals for the same expiry;
/// deduplicating navigation to an already-current location is the
/// navigation layer's job, not this hook's.
pub trait LoginRedirect: Send + Sync {
    /// Requests navigation to the login surface.
    fn go_to_login(&self);
}

/// Redirect sink for embeddings without a navigation layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoginRedirect;

impl LoginRedirect for NoopLoginRedirect {
    fn go_to_login(&self) {}
}
