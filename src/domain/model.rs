use crate::utils::error::{PatternError, Result};
use crate::utils::validation::{self, Validate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Header name to value. Keys are compared case-sensitively and rendered in
/// sorted order so text output is stable.
pub type HeaderMap = BTreeMap<String, String>;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

pub const GET: &str = "GET";
pub const POST: &str = "POST";

/// An outbound request described as plain data. Only builders create and
/// mutate it; once finalized it is handed out read-only.
///
/// There is no public constructor, so every request seen outside the crate
/// went through a builder's `finalize`:
///
/// ```compile_fail
/// let request = small_creational::HttpRequest::default();
/// ```
///
/// ```compile_fail
/// let request: small_creational::HttpRequest =
///     serde_json::from_str(r#"{"url":"u","method":"GET","headers":{}}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpRequest {
    pub(crate) url: String,
    pub(crate) method: String,
    pub(crate) headers: HeaderMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) body: Option<String>,
}

impl HttpRequest {
    /// The blank request a builder starts from.
    pub(crate) fn empty() -> Self {
        Self {
            url: String::new(),
            method: String::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Text form of the request, one line per item.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Sending {} request to {}", self.method, self.url),
            "Headers:".to_string(),
        ];
        for (key, value) in &self.headers {
            lines.push(format!("  {}: {}", key, value));
        }
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            lines.push(format!("Body: {}", body));
        }
        lines.join("\n")
    }

    /// "Transmits" the request by writing its text form to `out`.
    pub fn send_to<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.render())?;
        tracing::debug!("Sent {} request to {}", self.method, self.url);
        Ok(())
    }

    pub fn send(&self) -> Result<()> {
        self.send_to(&mut std::io::stdout().lock())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Validate for HttpRequest {
    fn validate(&self) -> Result<()> {
        validation::validate_url("url", &self.url).map_err(|e| PatternError::InvalidRequest {
            field: "url".to_string(),
            reason: e.to_string(),
        })?;
        if self.method.trim().is_empty() {
            return Err(PatternError::InvalidRequest {
                field: "method".to_string(),
                reason: "method cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Option<&str>) -> HttpRequest {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        headers.insert("Authorization".to_string(), "Bearer abc".to_string());
        HttpRequest {
            url: "https://api.example.com/items".to_string(),
            method: POST.to_string(),
            headers,
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn test_render_with_body() {
        let rendered = request(Some("{\"a\": 1}")).render();
        assert_eq!(
            rendered,
            "Sending POST request to https://api.example.com/items\n\
             Headers:\n  Authorization: Bearer abc\n  Content-Type: application/json\n\
             Body: {\"a\": 1}"
        );
    }

    #[test]
    fn test_render_omits_missing_or_empty_body() {
        assert!(!request(None).render().contains("Body:"));
        assert!(!request(Some("")).render().contains("Body:"));
    }

    #[test]
    fn test_render_empty_request_keeps_empty_segments() {
        let rendered = HttpRequest::empty().render();
        assert_eq!(rendered, "Sending  request to \nHeaders:");
    }

    #[test]
    fn test_send_to_writer() {
        let mut out = Vec::new();
        request(None).send_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Sending POST request to https://api.example.com/items\n"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_to_json_skips_absent_body() {
        let json: serde_json::Value = serde_json::from_str(&request(None).to_json().unwrap()).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["headers"]["Content-Type"], "application/json");
        assert!(json.get("body").is_none());
    }

    #[test]
    fn test_validate() {
        assert!(request(None).validate().is_ok());

        let mut missing_method = request(None);
        missing_method.method.clear();
        assert!(matches!(
            missing_method.validate(),
            Err(PatternError::InvalidRequest { ref field, .. }) if field == "method"
        ));

        assert!(matches!(
            HttpRequest::empty().validate(),
            Err(PatternError::InvalidRequest { ref field, .. }) if field == "url"
        ));
    }
}
