use crate::core::{HttpRequest, RequestBuilder};
use crate::domain::model::GET;
use crate::domain::model::HeaderMap;

/// Drives `builder` through the canned GET sequence.
pub fn build_get_request<B: RequestBuilder>(mut builder: B, url: &str) -> HttpRequest {
    builder.set_url(url);
    builder.set_method(GET);
    let request = builder.finalize();
    tracing::debug!("Built {} request for {}", request.method(), request.url());
    request
}

/// Drives `builder` through a mutation: the body is skipped for GET, and
/// extra headers are applied after the body but before finalize.
pub fn build_mutation_request<B: RequestBuilder>(
    mut builder: B,
    url: &str,
    method: &str,
    body: &str,
    headers: Option<&HeaderMap>,
) -> HttpRequest {
    builder.set_url(url);
    builder.set_method(method);
    if !method.eq_ignore_ascii_case(GET) {
        builder.set_body(body);
    } else if !body.is_empty() {
        tracing::debug!("Dropping body for GET request to {}", url);
    }
    if let Some(headers) = headers {
        for (key, value) in headers {
            builder.add_header(key, value);
        }
    }
    let request = builder.finalize();
    tracing::debug!(
        "Built {} request for {} with {} headers",
        request.method(),
        request.url(),
        request.headers().len()
    );
    request
}

pub struct GetRequestDirector<B: RequestBuilder> {
    builder: B,
}

impl<B: RequestBuilder> GetRequestDirector<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    pub fn build_get(self, url: &str) -> HttpRequest {
        build_get_request(self.builder, url)
    }
}

pub struct MutationRequestDirector<B: RequestBuilder> {
    builder: B,
}

impl<B: RequestBuilder> MutationRequestDirector<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    pub fn build(
        self,
        url: &str,
        method: &str,
        body: &str,
        headers: Option<&HeaderMap>,
    ) -> HttpRequest {
        build_mutation_request(self.builder, url, method, body, headers)
    }
}
