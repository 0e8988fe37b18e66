use crate::domain::ports::Prototype;
use crate::utils::error::{PatternError, Result};
use crate::utils::validation::Validate;
use regex::{Captures, Regex};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::sync::LazyLock;

/// Key substituted with the recipient name on send, written `{{Name}}` in text.
pub const NAME_PLACEHOLDER: &str = "Name";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid")
});

/// Replaces every `{{key}}` whose key is in `vars`. Unknown keys and tokens
/// with inner whitespace such as `{{ key }}` stay as written.
pub fn render_placeholders(text: &str, vars: &HashMap<&str, &str>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => (*value).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Ordered attachment names behind a shareable handle.
///
/// Two handles either alias one list (`share`) or own separate lists
/// (`reallocate`). Nothing else copies the storage.
#[derive(Debug, Default)]
pub struct Attachments(Rc<RefCell<Vec<String>>>);

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Rc::new(RefCell::new(names.into_iter().map(Into::into).collect())))
    }

    pub fn push(&self, name: impl Into<String>) {
        self.0.borrow_mut().push(name.into());
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn join(&self, sep: &str) -> String {
        self.0.borrow().join(sep)
    }

    /// New handle to the same list.
    pub fn share(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    /// New list holding the current elements.
    pub fn reallocate(&self) -> Self {
        Self::from_names(self.to_vec())
    }

    pub fn shares_storage_with(&self, other: &Attachments) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Default)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
    pub footer: String,
    attachments: Attachments,
}

impl EmailTemplate {
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        footer: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            footer: footer.into(),
            attachments: Attachments::new(),
        }
    }

    pub fn with_attachments<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attachments = Attachments::from_names(names);
        self
    }

    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    pub fn add_attachment(&mut self, name: impl Into<String>) {
        self.attachments.push(name);
    }

    /// Copies the scalar fields and pairs them with the given container.
    fn with_container(&self, attachments: Attachments) -> Self {
        Self {
            subject: self.subject.clone(),
            body: self.body.clone(),
            footer: self.footer.clone(),
            attachments,
        }
    }

    pub fn personalized_body(&self, recipient_name: &str) -> String {
        let vars = HashMap::from([(NAME_PLACEHOLDER, recipient_name)]);
        render_placeholders(&self.body, &vars)
    }

    pub fn render(&self, recipient_email: &str, recipient_name: &str) -> String {
        format!(
            "Sent email to {}:\nSubject: {}\nBody: {}\nFooter: {}\nAttachments: {}\n",
            recipient_email,
            self.subject,
            self.personalized_body(recipient_name),
            self.footer,
            self.attachments.join(", ")
        )
    }

    pub fn send_to<W: Write>(
        &self,
        out: &mut W,
        recipient_email: &str,
        recipient_name: &str,
    ) -> Result<()> {
        writeln!(out, "{}", self.render(recipient_email, recipient_name))?;
        tracing::debug!(
            "Sent email '{}' to {} with {} attachments",
            self.subject,
            recipient_email,
            self.attachments.len()
        );
        Ok(())
    }

    pub fn send(&self, recipient_email: &str, recipient_name: &str) -> Result<()> {
        self.send_to(&mut std::io::stdout().lock(), recipient_email, recipient_name)
    }
}

impl Prototype for EmailTemplate {
    fn shallow_clone(&self) -> Self {
        self.with_container(self.attachments.share())
    }

    fn deep_copy(&self) -> Self {
        self.with_container(self.attachments.reallocate())
    }
}

impl Validate for EmailTemplate {
    fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(PatternError::InvalidTemplate {
                field: "subject".to_string(),
                reason: "subject cannot be empty".to_string(),
            });
        }
        if self.body.trim().is_empty() {
            return Err(PatternError::InvalidTemplate {
                field: "body".to_string(),
                reason: "body cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Short-message template. It owns no shared containers, so both
/// duplication operations are full value copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsTemplate {
    pub sender: String,
    pub message: String,
}

impl SmsTemplate {
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
        }
    }

    pub fn personalized_message(&self, recipient_name: &str) -> String {
        let vars = HashMap::from([(NAME_PLACEHOLDER, recipient_name)]);
        render_placeholders(&self.message, &vars)
    }

    pub fn render(&self, recipient_phone: &str, recipient_name: &str) -> String {
        format!(
            "Sent SMS from {} to {}: {}",
            self.sender,
            recipient_phone,
            self.personalized_message(recipient_name)
        )
    }

    pub fn send_to<W: Write>(
        &self,
        out: &mut W,
        recipient_phone: &str,
        recipient_name: &str,
    ) -> Result<()> {
        writeln!(out, "{}", self.render(recipient_phone, recipient_name))?;
        tracing::debug!("Sent SMS from {} to {}", self.sender, recipient_phone);
        Ok(())
    }

    pub fn send(&self, recipient_phone: &str, recipient_name: &str) -> Result<()> {
        self.send_to(&mut std::io::stdout().lock(), recipient_phone, recipient_name)
    }
}

impl Prototype for SmsTemplate {
    fn shallow_clone(&self) -> Self {
        self.clone()
    }

    fn deep_copy(&self) -> Self {
        self.clone()
    }
}
