use crate::config::toml_config::{
    DirectorKind, EmailRecipient, EmailSpec, RequestSpec, ScenarioConfig, SmsSpec,
};
use crate::core::director::{build_get_request, build_mutation_request};
use crate::core::template::{EmailTemplate, SmsTemplate};
use crate::core::{HttpRequest, Prototype};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub requests: usize,
    pub emails: usize,
    pub sms: usize,
}

/// Runs a scenario: builds every request through its director and sends
/// every template to its recipients, writing the results to `out`.
pub struct ScenarioEngine<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ScenarioEngine<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn run(&mut self, config: &ScenarioConfig) -> Result<RunSummary> {
        let strict = config.is_strict();
        tracing::info!(
            "🚀 Running scenario '{}' ({} requests, {} email templates, {} sms templates)",
            config.name(),
            config.requests.len(),
            config.emails.len(),
            config.sms.len()
        );

        let mut summary = RunSummary::default();

        for spec in &config.requests {
            let request = Self::build_request(spec);
            if strict {
                request.validate()?;
            }
            self.write_request(&request)?;
            summary.requests += 1;
        }

        for spec in &config.emails {
            summary.emails += self.send_emails(spec, strict)?;
        }

        for spec in &config.sms {
            summary.sms += self.send_sms(spec)?;
        }

        tracing::info!(
            "✅ Scenario '{}' done: {} requests, {} emails, {} sms",
            config.name(),
            summary.requests,
            summary.emails,
            summary.sms
        );
        Ok(summary)
    }

    fn build_request(spec: &RequestSpec) -> HttpRequest {
        let builder = spec.builder.builder();
        tracing::debug!(
            "Building {:?} request '{}' with {} builder",
            spec.director,
            spec.name.as_deref().unwrap_or(&spec.url),
            spec.builder
        );

        match spec.director {
            DirectorKind::Get => {
                if spec.headers.is_some() || spec.body.is_some() {
                    tracing::warn!(
                        "GET director ignores headers and body configured for {}",
                        spec.url
                    );
                }
                build_get_request(builder, &spec.url)
            }
            DirectorKind::Mutation => build_mutation_request(
                builder,
                &spec.url,
                spec.method.as_deref().unwrap_or_default(),
                spec.body.as_deref().unwrap_or_default(),
                spec.headers.as_ref(),
            ),
        }
    }

    fn write_request(&mut self, request: &HttpRequest) -> Result<()> {
        match self.format {
            OutputFormat::Text => request.send_to(&mut self.out),
            OutputFormat::Json => {
                writeln!(self.out, "{}", request.to_json()?)?;
                Ok(())
            }
        }
    }

    fn send_emails(&mut self, spec: &EmailSpec, strict: bool) -> Result<usize> {
        let base = EmailTemplate::new(&spec.subject, &spec.body, &spec.footer)
            .with_attachments(spec.attachments.iter().cloned());

        for recipient in &spec.recipients {
            let email = prepare_email(&base, recipient, strict)?;

            match self.format {
                OutputFormat::Text => email.send_to(&mut self.out, &recipient.email, &recipient.name)?,
                OutputFormat::Json => {
                    let record = serde_json::json!({
                        "to": recipient.email,
                        "subject": email.subject,
                        "body": email.personalized_body(&recipient.name),
                        "footer": email.footer,
                        "attachments": email.attachments().to_vec(),
                    });
                    writeln!(self.out, "{}", record)?;
                }
            }
        }

        let attachments = base.attachments().join(", ");
        tracing::info!(
            "📎 Base template '{}' attachments after sending: [{}]",
            spec.name.as_deref().unwrap_or(&base.subject),
            attachments
        );
        if self.format == OutputFormat::Text {
            writeln!(self.out, "Base template attachments: {}", attachments)?;
        }

        Ok(spec.recipients.len())
    }

    fn send_sms(&mut self, spec: &SmsSpec) -> Result<usize> {
        let base = SmsTemplate::new(&spec.sender, &spec.message);

        for recipient in &spec.recipients {
            let sms = base.shallow_clone();
            match self.format {
                OutputFormat::Text => sms.send_to(&mut self.out, &recipient.phone, &recipient.name)?,
                OutputFormat::Json => {
                    let record = serde_json::json!({
                        "from": sms.sender,
                        "to": recipient.phone,
                        "message": sms.personalized_message(&recipient.name),
                    });
                    writeln!(self.out, "{}", record)?;
                }
            }
        }

        Ok(spec.recipients.len())
    }
}

/// Duplicates `base` for one recipient. Extra attachments go in last, after
/// validation, since a shallow copy pushes them onto the base's list.
fn prepare_email(
    base: &EmailTemplate,
    recipient: &EmailRecipient,
    strict: bool,
) -> Result<EmailTemplate> {
    let mut email = if recipient.deep {
        base.deep_copy()
    } else {
        base.shallow_clone()
    };
    if let Some(subject) = &recipient.subject {
        email.subject = subject.clone();
    }
    if strict {
        email.validate()?;
    }
    for name in &recipient.extra_attachments {
        email.add_attachment(name.as_str());
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::SmsRecipient;
    use crate::core::builder::BuilderKind;
    use crate::utils::error::PatternError;

    fn run(config: &ScenarioConfig, format: OutputFormat) -> (RunSummary, String) {
        let mut engine = ScenarioEngine::new(Vec::new(), format);
        let summary = engine.run(config).unwrap();
        (summary, String::from_utf8(engine.into_inner()).unwrap())
    }

    #[test]
    fn test_demo_text_output() {
        let (summary, text) = run(&ScenarioConfig::demo(), OutputFormat::Text);

        assert_eq!(
            summary,
            RunSummary {
                requests: 2,
                emails: 2,
                sms: 0
            }
        );
        assert!(text.contains(
            "Sending GET request to https://film-zone.ru/Film/SearchById/64\nHeaders:\n  Content-Type: application/json\n"
        ));
        assert!(text.contains("Sending POST request to https://film-zone.ru/User/Index\n"));
        assert!(text.contains("Body: {\"query\": \"{\"name\": \"John\"}\"}\n"));
        assert!(text.contains("Subject: Exclusive for you!\nBody: Dear Ivan, this is a personal offer for you!\n"));
        assert!(text.contains("Attachments: Presentation.pdf, Contract.docx\n"));
        // deep copy for client B left the base alone
        assert!(text.ends_with("Base template attachments: Presentation.pdf\n"));
    }

    #[test]
    fn test_shallow_recipient_extra_attachment_leaks_into_base() {
        let mut config = ScenarioConfig::demo();
        config.requests.clear();
        config.emails[0].recipients = vec![
            EmailRecipient {
                email: "a@mail.com".to_string(),
                name: "A".to_string(),
                deep: false,
                subject: None,
                extra_attachments: vec!["shared.txt".to_string()],
            },
            EmailRecipient {
                email: "b@mail.com".to_string(),
                name: "B".to_string(),
                deep: true,
                subject: None,
                extra_attachments: Vec::new(),
            },
        ];

        let (_, text) = run(&config, OutputFormat::Text);
        assert_eq!(
            text.matches("Attachments: Presentation.pdf, shared.txt\n").count(),
            2
        );
        assert!(text.ends_with("Base template attachments: Presentation.pdf, shared.txt\n"));
    }

    #[test]
    fn test_json_output() {
        let mut config = ScenarioConfig::demo();
        config.sms.push(SmsSpec {
            sender: "Shop".to_string(),
            message: "Hi {{Name}}".to_string(),
            recipients: vec![SmsRecipient {
                phone: "+100".to_string(),
                name: "Ivan".to_string(),
            }],
        });

        let (summary, text) = run(&config, OutputFormat::Json);
        assert_eq!(summary.sms, 1);

        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0]["method"], "GET");
        assert!(lines[0].get("body").is_none());
        assert_eq!(lines[1]["method"], "POST");
        assert_eq!(lines[2]["body"], "Dear Ivan, this is a personal offer for you!");
        assert_eq!(lines[3]["attachments"], serde_json::json!(["Presentation.pdf", "Contract.docx"]));
        assert_eq!(lines[4]["message"], "Hi Ivan");
    }

    #[test]
    fn test_mutation_with_get_method_drops_body() {
        let config = ScenarioConfig {
            requests: vec![RequestSpec {
                name: None,
                builder: BuilderKind::Rest,
                director: DirectorKind::Mutation,
                url: "https://api.example.com/items".to_string(),
                method: Some("get".to_string()),
                body: Some("{\"x\": 1}".to_string()),
                headers: None,
            }],
            ..ScenarioConfig::default()
        };

        let (_, text) = run(&config, OutputFormat::Text);
        assert!(text.starts_with("Sending get request to https://api.example.com/items\n"));
        assert!(!text.contains("Body:"));
    }

    #[test]
    fn test_rejected_shallow_recipient_leaves_base_attachments_alone() {
        let base = EmailTemplate::new("Offer", "Hi {{Name}}", "").with_attachments(["a.pdf"]);
        let recipient = EmailRecipient {
            email: "a@mail.com".to_string(),
            name: "A".to_string(),
            deep: false,
            subject: Some(String::new()),
            extra_attachments: vec!["leak.txt".to_string()],
        };

        let err = prepare_email(&base, &recipient, true).unwrap_err();
        assert!(matches!(err, PatternError::InvalidTemplate { ref field, .. } if field == "subject"));
        assert_eq!(base.attachments().to_vec(), vec!["a.pdf"]);

        // lenient mode sends it and the shared list picks up the extra file
        let email = prepare_email(&base, &recipient, false).unwrap();
        assert!(email.attachments().shares_storage_with(base.attachments()));
        assert_eq!(base.attachments().to_vec(), vec!["a.pdf", "leak.txt"]);
    }

    #[test]
    fn test_strict_scenario_stops_before_bad_recipient_mutates_output() {
        let mut config = ScenarioConfig::demo();
        config.requests.clear();
        config.scenario = Some(crate::config::toml_config::ScenarioInfo {
            name: "strict-mail".to_string(),
            description: None,
            strict: Some(true),
        });
        config.emails[0].recipients[0].subject = Some("  ".to_string());
        config.emails[0].recipients[0].extra_attachments = vec!["leak.txt".to_string()];

        let mut engine = ScenarioEngine::new(Vec::new(), OutputFormat::Text);
        assert!(engine.run(&config).is_err());
        assert!(!String::from_utf8(engine.into_inner()).unwrap().contains("leak.txt"));
    }

    #[test]
    fn test_strict_mode_rejects_empty_method() {
        let mut config = ScenarioConfig::from_toml_str(
            r#"
[scenario]
name = "strict"
strict = true

[[requests]]
builder = "rest"
director = "mutation"
url = "https://api.example.com/items"
"#,
        )
        .unwrap();

        let mut engine = ScenarioEngine::new(Vec::new(), OutputFormat::Text);
        let err = engine.run(&config).unwrap_err();
        assert!(matches!(err, PatternError::InvalidRequest { ref field, .. } if field == "method"));

        config.scenario = None;
        let (summary, text) = run(&config, OutputFormat::Text);
        assert_eq!(summary.requests, 1);
        assert!(text.starts_with("Sending  request to https://api.example.com/items\n"));
    }
}
