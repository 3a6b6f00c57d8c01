pub mod config;
pub mod error;
pub mod result;

pub use config::{ClientConfig, ReorderFailurePolicy};
pub use error::KanbanError;
pub use result::KanbanResult;
