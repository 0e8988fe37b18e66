use crate::domain::model::HttpRequest;

/// Capability set shared by every request builder variant.
///
/// Setters overwrite whatever was set before. `finalize` consumes the
/// builder, so each builder yields exactly one request.
pub trait RequestBuilder {
    fn set_url(&mut self, url: &str);
    fn set_method(&mut self, method: &str);
    fn add_header(&mut self, key: &str, value: &str);
    fn set_body(&mut self, body: &str);
    fn finalize(self) -> HttpRequest;
}

/// Explicit duplication for template types.
///
/// Which fields get reallocated is the only difference between the two
/// operations: `shallow_clone` shares container fields with the source,
/// `deep_copy` gives the duplicate its own containers.
pub trait Prototype: Sized {
    fn shallow_clone(&self) -> Self;
    fn deep_copy(&self) -> Self;
}
