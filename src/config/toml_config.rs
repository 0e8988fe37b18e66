use crate::core::builder::BuilderKind;
use crate::domain::model::HeaderMap;
use crate::utils::error::{PatternError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario: Option<ScenarioInfo>,
    #[serde(default)]
    pub requests: Vec<RequestSpec>,
    #[serde(default)]
    pub emails: Vec<EmailSpec>,
    #[serde(default)]
    pub sms: Vec<SmsSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub name: String,
    pub description: Option<String>,
    /// Validate every built request and template before sending it.
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectorKind {
    #[default]
    Get,
    Mutation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSpec {
    pub name: Option<String>,
    pub builder: BuilderKind,
    #[serde(default)]
    pub director: DirectorKind,
    pub url: String,
    pub method: Option<String>,
    pub body: Option<String>,
    pub headers: Option<HeaderMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSpec {
    pub name: Option<String>,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub footer: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub recipients: Vec<EmailRecipient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecipient {
    pub email: String,
    pub name: String,
    /// Deep copy the base template instead of sharing its attachments.
    #[serde(default)]
    pub deep: bool,
    pub subject: Option<String>,
    #[serde(default)]
    pub extra_attachments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsSpec {
    pub sender: String,
    pub message: String,
    #[serde(default)]
    pub recipients: Vec<SmsRecipient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsRecipient {
    pub phone: String,
    pub name: String,
}

impl ScenarioConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PatternError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PatternError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env pattern is valid"));

        ENV_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn is_strict(&self) -> bool {
        self.scenario
            .as_ref()
            .and_then(|s| s.strict)
            .unwrap_or(false)
    }

    pub fn name(&self) -> &str {
        self.scenario
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("unnamed")
    }

    /// The canonical walkthrough: one directed GET, one GraphQL mutation,
    /// and an email template duplicated shallow and deep.
    pub fn demo() -> Self {
        Self {
            scenario: Some(ScenarioInfo {
                name: "demo".to_string(),
                description: Some("Builder and prototype walkthrough".to_string()),
                strict: Some(false),
            }),
            requests: vec![
                RequestSpec {
                    name: Some("film-by-id".to_string()),
                    builder: BuilderKind::Rest,
                    director: DirectorKind::Get,
                    url: "https://film-zone.ru/Film/SearchById/64".to_string(),
                    method: None,
                    body: None,
                    headers: None,
                },
                RequestSpec {
                    name: Some("create-user".to_string()),
                    builder: BuilderKind::GraphQl,
                    director: DirectorKind::Mutation,
                    url: "https://film-zone.ru/User/Index".to_string(),
                    method: Some("POST".to_string()),
                    body: Some("{\"name\": \"John\"}".to_string()),
                    headers: None,
                },
            ],
            emails: vec![EmailSpec {
                name: Some("offer".to_string()),
                subject: "Important information".to_string(),
                body: "Dear {{Name}}, this is a personal offer for you!".to_string(),
                footer: "Best regards, Support team".to_string(),
                attachments: vec!["Presentation.pdf".to_string()],
                recipients: vec![
                    EmailRecipient {
                        email: "client_a@mail.com".to_string(),
                        name: "Ivan".to_string(),
                        deep: false,
                        subject: Some("Exclusive for you!".to_string()),
                        extra_attachments: Vec::new(),
                    },
                    EmailRecipient {
                        email: "client_b@mail.com".to_string(),
                        name: "Maria".to_string(),
                        deep: true,
                        subject: None,
                        extra_attachments: vec!["Contract.docx".to_string()],
                    },
                ],
            }],
            sms: Vec::new(),
        }
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        for (i, request) in self.requests.iter().enumerate() {
            validation::validate_url(&format!("requests[{}].url", i), &request.url)?;
            if request.director == DirectorKind::Mutation {
                let method = request.method.as_deref().unwrap_or_default();
                validation::validate_non_empty_string(&format!("requests[{}].method", i), method)?;
            }
        }

        for (i, email) in self.emails.iter().enumerate() {
            for (j, recipient) in email.recipients.iter().enumerate() {
                validation::validate_non_empty_string(
                    &format!("emails[{}].recipients[{}].email", i, j),
                    &recipient.email,
                )?;
            }
        }

        for (i, sms) in self.sms.iter().enumerate() {
            for (j, recipient) in sms.recipients.iter().enumerate() {
                validation::validate_non_empty_string(
                    &format!("sms[{}].recipients[{}].phone", i, j),
                    &recipient.phone,
                )?;
            }
        }

        Ok(())
    }
}
