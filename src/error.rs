/// What went wrong, independent of the human-readable message.
///
/// Tests and callers that want to branch on failure mode should match on
/// this rather than parsing the message string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A `model_target` outside the supported `{Case, Death}` set.
    InvalidModelTarget,
    /// A malformed date range for tick generation (start >= end, zero step).
    InvalidRange,
    /// CSV ingest failures (missing file, missing columns).
    Ingest,
    /// A chart failed to draw or save.
    Render,
    /// Inconsistent or empty data discovered mid-pipeline.
    Data,
}

#[derive(Clone)]
pub struct ChartError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl ChartError {
    pub fn new(kind: ErrorKind, exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code,
            message: message.into(),
        }
    }

    pub fn invalid_model_target(given: &str) -> Self {
        Self::new(
            ErrorKind::InvalidModelTarget,
            2,
            format!("Invalid model target '{given}'. Expected one of: Case, Death"),
        )
    }

    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRange, 2, message)
    }

    pub fn ingest(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Ingest, 2, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Render, 3, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, 4, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for ChartError {}
