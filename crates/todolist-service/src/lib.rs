mod http;
mod traits;

pub use http::HttpService;
pub use traits::{ServiceError, TaskService};
