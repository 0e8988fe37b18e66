use crate::core::{HttpRequest, RequestBuilder};
use crate::domain::model::{APPLICATION_JSON, CONTENT_TYPE, POST};
use crate::utils::error::{PatternError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Builder for plain REST/JSON requests.
#[derive(Debug)]
pub struct RestRequestBuilder {
    request: HttpRequest,
}

impl RestRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: HttpRequest::empty(),
        }
    }
}

impl Default for RestRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder for RestRequestBuilder {
    fn set_url(&mut self, url: &str) {
        self.request.url = url.to_string();
    }

    fn set_method(&mut self, method: &str) {
        self.request.method = method.to_string();
    }

    fn add_header(&mut self, key: &str, value: &str) {
        self.request.headers.insert(key.to_string(), value.to_string());
    }

    fn set_body(&mut self, body: &str) {
        self.request.body = Some(body.to_string());
    }

    fn finalize(mut self) -> HttpRequest {
        // caller-supplied content type wins
        self.request
            .headers
            .entry(CONTENT_TYPE.to_string())
            .or_insert_with(|| APPLICATION_JSON.to_string());
        self.request
    }
}

/// Builder for GraphQL requests: always POST, body wrapped in a
/// `{"query": ...}` envelope.
#[derive(Debug)]
pub struct GraphQlRequestBuilder {
    request: HttpRequest,
}

impl GraphQlRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: HttpRequest {
                method: POST.to_string(),
                ..HttpRequest::empty()
            },
        }
    }
}

impl Default for GraphQlRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder for GraphQlRequestBuilder {
    fn set_url(&mut self, url: &str) {
        self.request.url = url.to_string();
    }

    fn set_method(&mut self, method: &str) {
        if method != POST {
            tracing::debug!("GraphQL builder ignores method {}, using POST", method);
        }
        self.request.method = POST.to_string();
    }

    fn add_header(&mut self, key: &str, value: &str) {
        self.request.headers.insert(key.to_string(), value.to_string());
    }

    /// The query is embedded as-is; quotes and newlines are not escaped.
    fn set_body(&mut self, query: &str) {
        self.request.body = Some(format!("{{\"query\": \"{}\"}}", query));
    }

    fn finalize(mut self) -> HttpRequest {
        self.request
            .headers
            .insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        self.request
    }
}

/// The closed set of builder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderKind {
    Rest,
    #[serde(alias = "graph_ql")]
    GraphQl,
}

impl BuilderKind {
    pub fn builder(self) -> AnyRequestBuilder {
        match self {
            BuilderKind::Rest => AnyRequestBuilder::Rest(RestRequestBuilder::new()),
            BuilderKind::GraphQl => AnyRequestBuilder::GraphQl(GraphQlRequestBuilder::new()),
        }
    }
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderKind::Rest => write!(f, "rest"),
            BuilderKind::GraphQl => write!(f, "graphql"),
        }
    }
}

impl FromStr for BuilderKind {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(BuilderKind::Rest),
            "graphql" | "graph_ql" => Ok(BuilderKind::GraphQl),
            other => Err(PatternError::InvalidConfigValueError {
                field: "builder".to_string(),
                value: other.to_string(),
                reason: "Valid builders: rest, graphql".to_string(),
            }),
        }
    }
}

/// A builder whose variant is picked at runtime.
#[derive(Debug)]
pub enum AnyRequestBuilder {
    Rest(RestRequestBuilder),
    GraphQl(GraphQlRequestBuilder),
}

impl AnyRequestBuilder {
    pub fn kind(&self) -> BuilderKind {
        match self {
            AnyRequestBuilder::Rest(_) => BuilderKind::Rest,
            AnyRequestBuilder::GraphQl(_) => BuilderKind::GraphQl,
        }
    }
}

impl RequestBuilder for AnyRequestBuilder {
    fn set_url(&mut self, url: &str) {
        match self {
            AnyRequestBuilder::Rest(b) => b.set_url(url),
            AnyRequestBuilder::GraphQl(b) => b.set_url(url),
        }
    }

    fn set_method(&mut self, method: &str) {
        match self {
            AnyRequestBuilder::Rest(b) => b.set_method(method),
            AnyRequestBuilder::GraphQl(b) => b.set_method(method),
        }
    }

    fn add_header(&mut self, key: &str, value: &str) {
        match self {
            AnyRequestBuilder::Rest(b) => b.add_header(key, value),
            AnyRequestBuilder::GraphQl(b) => b.add_header(key, value),
        }
    }

    fn set_body(&mut self, body: &str) {
        match self {
            AnyRequestBuilder::Rest(b) => b.set_body(body),
            AnyRequestBuilder::GraphQl(b) => b.set_body(body),
        }
    }

    fn finalize(self) -> HttpRequest {
        match self {
            AnyRequestBuilder::Rest(b) => b.finalize(),
            AnyRequestBuilder::GraphQl(b) => b.finalize(),
        }
    }
}
