use serde_json::Value;

/// Fallback shown when a failed parse carries no usable message.
pub const PARSE_FAILED_FALLBACK: &str = "parse failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// State holder for the parse workflow.
///
/// Mutation happens only through the named transitions below; `error` and
/// `result` are never both set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseState {
    phase: ParsePhase,
    result: Option<Value>,
    error: Option<String>,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ParsePhase {
        self.phase
    }

    /// Projection of the Loading phase; not an independent flag.
    pub fn is_loading(&self) -> bool {
        self.phase == ParsePhase::Loading
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts a submission: clears any prior result and error before the
    /// asynchronous call begins. Allowed from any phase; a second submit
    /// while Loading restarts the cycle.
    pub fn begin(&mut self) {
        self.phase = ParsePhase::Loading;
        self.result = None;
        self.error = None;
    }

    /// Commits a successful parse, replacing the previous result wholesale.
    pub fn succeed(&mut self, result: Value) {
        self.phase = ParsePhase::Succeeded;
        self.result = Some(result);
        self.error = None;
    }

    /// Commits a failure message. Empty messages fall back to a generic one.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.phase = ParsePhase::Failed;
        self.result = None;
        self.error = Some(if message.is_empty() {
            PARSE_FAILED_FALLBACK.to_string()
        } else {
            message
        });
    }
}
