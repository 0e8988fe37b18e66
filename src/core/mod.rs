pub mod builder;
pub mod director;
pub mod scenario;
pub mod template;

pub use crate::domain::model::{HeaderMap, HttpRequest};
pub use crate::domain::ports::{Prototype, RequestBuilder};
pub use crate::utils::error::Result;
