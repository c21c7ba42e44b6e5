pub mod api;
pub mod edit;
pub mod error;
pub mod filter;
pub mod task;
pub mod user;

pub use edit::{EditDraft, EditSession};
pub use error::TodoError;
pub use filter::{CategoryFilter, StatusFilter};
pub use task::{Task, TaskId};
