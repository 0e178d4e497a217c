use std::fmt;

use catalog_core::{Generation, Provider, ProviderOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ProvidersLoaded(Result<Vec<Provider>, FetchError>),
    BatchCompleted {
        generation: Generation,
        outcomes: Vec<ProviderOutcome>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            // Shown verbatim to the user.
            FailureKind::Timeout => write!(f, "timeout"),
            _ => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidPayload,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidPayload => write!(f, "invalid payload"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] std::io::Error),
}
