pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::toml_config::ScenarioConfig;
pub use crate::core::builder::{AnyRequestBuilder, BuilderKind, GraphQlRequestBuilder, RestRequestBuilder};
pub use crate::core::director::{
    build_get_request, build_mutation_request, GetRequestDirector, MutationRequestDirector,
};
pub use crate::core::scenario::{OutputFormat, RunSummary, ScenarioEngine};
pub use crate::core::template::{render_placeholders, Attachments, EmailTemplate, SmsTemplate};
pub use crate::domain::model::{HeaderMap, HttpRequest};
pub use crate::domain::ports::{Prototype, RequestBuilder};
pub use crate::utils::error::{PatternError, Result};
