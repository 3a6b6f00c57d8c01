use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    /// No response was received from the remote service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote service answered with a non-success status.
    #[error("Request rejected with status {status}")]
    Rejected {
        status: u16,
        payload: Option<serde_json::Value>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KanbanError {
    pub fn is_transport(&self) -> bool {
        matches!(self, KanbanError::Transport(_))
    }

    /// Body returned by the server alongside a rejection, if it sent one.
    pub fn server_payload(&self) -> Option<&serde_json::Value> {
        match self {
            KanbanError::Rejected { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for KanbanError {
    fn from(err: serde_json::Error) -> Self {
        KanbanError::Serialization(err.to_string())
    }
}
