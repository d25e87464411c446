pub mod errors;

use std::time::Duration;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use lettre::message::{header::ContentType, Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::debug;
use ureq::Agent;
use crate::models::sendgrid::{Address, Attachment as SendGridAttachment, Content, Email, Personalizations};
use crate::report::{Attachment, Document};
pub use errors::MailError;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub enum Body {
    Html(String),
    Attachment { text: String, attachment: Attachment },
}

/// A fully addressed mail, built once per run
pub struct OutgoingMail {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub body: Body,
}

/// Delivers a mail through some provider, exactly one attempt per call
pub trait MailTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

pub struct Mail {
    transport: Box<dyn MailTransport>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl Mail {
    /// Returns a new instance of the Mail struct
    ///
    /// # Arguments
    ///
    /// * 'transport' - the provider to send through
    /// * 'from' - sender email address, optionally as 'Name <address>'
    /// * 'to' - receiver email addresses, duplicates are dropped keeping the first
    pub fn new(transport: Box<dyn MailTransport>, from: &str, to: &[String]) -> Result<Self, MailError> {
        let from = parse_mailbox(from)?;

        let mut recipients: Vec<Mailbox> = Vec::with_capacity(to.len());
        for address in to {
            let mailbox = parse_mailbox(address)?;
            if !recipients.iter().any(|r| r.email == mailbox.email) {
                recipients.push(mailbox);
            }
        }

        if recipients.is_empty() {
            return Err(MailError::InvalidEmailAddress("no recipients".to_string()));
        }

        Ok(Self { transport, from, to: recipients })
    }

    pub fn recipients(&self) -> &[Mailbox] {
        &self.to
    }

    /// Sends the rendered document, HTML as the mail body and anything else as an attachment
    ///
    /// # Arguments
    ///
    /// * 'subject' - the subject of the mail
    /// * 'document' - the rendered brief
    /// * 'date' - the date the brief is for
    pub fn send_document(&self, subject: String, document: Document, date: NaiveDate) -> Result<(), MailError> {
        let body = match document {
            Document::Html(html) => Body::Html(html),
            Document::Attachment(attachment) => Body::Attachment {
                text: format!("Heat-stress slide for {} attached.", date.format("%Y-%m-%d")),
                attachment,
            },
        };

        let mail = OutgoingMail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject,
            body,
        };

        debug!("sending '{}' to {} recipient(s)", mail.subject, mail.to.len());
        self.transport.send(&mail)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidEmailAddress(address.to_string()))
}

/// Mail transport for the SendGrid v3 HTTP API
pub struct SendGrid {
    api_key: String,
    agent: Agent,
}

impl SendGrid {
    /// # Arguments
    ///
    /// * 'api_key' - the api key for sendgrid
    pub fn new(api_key: String) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();

        let agent = config.into();

        Self { api_key, agent }
    }
}

impl MailTransport for SendGrid {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let req = build_email(mail);
        let json = serde_json::to_string(&req)?;

        let _ = self.agent
            .post(SENDGRID_URL)
            .content_type("application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send(json)?;

        Ok(())
    }
}

/// Builds the SendGrid request document, attachments are base64 encoded
pub fn build_email(mail: &OutgoingMail) -> Email {
    let (content, attachments) = match &mail.body {
        Body::Html(html) => (
            vec![Content { content_type: "text/html".to_string(), value: html.clone() }],
            Vec::new(),
        ),
        Body::Attachment { text, attachment } => (
            vec![Content { content_type: "text/plain".to_string(), value: text.clone() }],
            vec![SendGridAttachment {
                content: STANDARD.encode(&attachment.bytes),
                mime_type: attachment.mime_type.to_string(),
                filename: attachment.file_name.clone(),
                disposition: "attachment".to_string(),
            }],
        ),
    };

    Email {
        personalizations: vec![Personalizations { to: mail.to.iter().map(Address::from).collect() }],
        from: Address::from(&mail.from),
        subject: mail.subject.clone(),
        content,
        attachments,
    }
}

/// Mail transport for an SMTP relay with username and password login
pub struct Smtp {
    transport: SmtpTransport,
}

impl Smtp {
    /// # Arguments
    ///
    /// * 'endpoint' - host name of the SMTP relay
    /// * 'user' - SMTP user name
    /// * 'password' - SMTP password
    pub fn new(endpoint: &str, user: String, password: String) -> Result<Self, MailError> {
        let transport = SmtpTransport::relay(endpoint)?
            .credentials(Credentials::new(user, password))
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self { transport })
    }
}

impl MailTransport for Smtp {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        self.transport.send(&message)?;

        Ok(())
    }
}

/// Builds a MIME message, HTML as a single part or text plus attachment as multipart/mixed
pub fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mail.from.clone())
        .subject(mail.subject.clone());
    for to in &mail.to {
        builder = builder.to(to.clone());
    }

    let message = match &mail.body {
        Body::Html(html) => builder.singlepart(SinglePart::html(html.clone()))?,
        Body::Attachment { text, attachment } => {
            let file = MimeAttachment::new(attachment.file_name.clone())
                .body(attachment.bytes.clone(), ContentType::parse(attachment.mime_type)?);

            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(text.clone()))
                    .singlepart(file))?
        }
    };

    Ok(message)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use crate::report::slide::MIME_TYPE;

    /// Transport that keeps what it was asked to send
    #[derive(Clone, Default)]
    pub struct RecordingTransport {
        pub sent: Rc<RefCell<Vec<(Vec<String>, String, Option<String>)>>>,
    }

    impl MailTransport for RecordingTransport {
        fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            let to = mail.to.iter().map(|m| m.email.to_string()).collect();
            let attachment = match &mail.body {
                Body::Html(_) => None,
                Body::Attachment { attachment, .. } => Some(attachment.file_name.clone()),
            };
            self.sent.borrow_mut().push((to, mail.subject.clone(), attachment));
            Ok(())
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn outgoing(body: Body) -> OutgoingMail {
        OutgoingMail {
            from: "WX Brief <wx@example.com>".parse().unwrap(),
            to: vec!["a@example.com".parse().unwrap(), "Bee <b@example.com>".parse().unwrap()],
            subject: "WX Brief — 2025-07-14".to_string(),
            body,
        }
    }

    fn slide() -> Attachment {
        Attachment { file_name: "wx_brief_2025-07-14.fodp".to_string(), mime_type: MIME_TYPE, bytes: b"slide".to_vec() }
    }

    #[test]
    fn test_recipients_are_deduplicated_in_order() {
        let to = vec!["b@example.com".to_string(), " a@example.com".to_string(), "B <b@example.com>".to_string()];
        let mail = Mail::new(Box::new(RecordingTransport::default()), "wx@example.com", &to).unwrap();

        let emails: Vec<String> = mail.recipients().iter().map(|m| m.email.to_string()).collect();
        assert_eq!(emails, vec!["b@example.com", "a@example.com"]);
    }

    #[test]
    fn test_invalid_addresses_are_rejected() {
        let bad_from = Mail::new(Box::new(RecordingTransport::default()), "not an address", &["a@example.com".to_string()]);
        assert!(matches!(bad_from, Err(MailError::InvalidEmailAddress(_))));

        let bad_to = Mail::new(Box::new(RecordingTransport::default()), "wx@example.com", &["nope".to_string()]);
        assert!(matches!(bad_to, Err(MailError::InvalidEmailAddress(_))));

        let none = Mail::new(Box::new(RecordingTransport::default()), "wx@example.com", &[]);
        assert!(matches!(none, Err(MailError::InvalidEmailAddress(_))));
    }

    #[test]
    fn test_send_document_sends_once() {
        let transport = RecordingTransport::default();
        let mail = Mail::new(Box::new(transport.clone()), "wx@example.com", &["a@example.com".to_string()]).unwrap();

        mail.send_document("subject".to_string(), Document::Attachment(slide()), date()).unwrap();

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, vec!["a@example.com"]);
        assert_eq!(sent[0].2.as_deref(), Some("wx_brief_2025-07-14.fodp"));
    }

    #[test]
    fn test_sendgrid_html_document() {
        let email = build_email(&outgoing(Body::Html("<h2>hi</h2>".to_string())));
        let json = serde_json::to_value(&email).unwrap();

        assert_eq!(json["from"]["email"], "wx@example.com");
        assert_eq!(json["from"]["name"], "WX Brief");
        assert_eq!(json["personalizations"][0]["to"][0]["email"], "a@example.com");
        assert!(json["personalizations"][0]["to"][0].get("name").is_none());
        assert_eq!(json["personalizations"][0]["to"][1]["name"], "Bee");
        assert_eq!(json["subject"], "WX Brief — 2025-07-14");
        assert_eq!(json["content"][0]["type"], "text/html");
        assert_eq!(json["content"][0]["value"], "<h2>hi</h2>");
        assert!(json.get("attachments").is_none());
    }

    #[test]
    fn test_sendgrid_attachment_document() {
        let email = build_email(&outgoing(Body::Attachment { text: "attached".to_string(), attachment: slide() }));
        let json = serde_json::to_value(&email).unwrap();

        assert_eq!(json["content"][0]["type"], "text/plain");
        assert_eq!(json["attachments"][0]["content"], "c2xpZGU=");
        assert_eq!(json["attachments"][0]["type"], MIME_TYPE);
        assert_eq!(json["attachments"][0]["filename"], "wx_brief_2025-07-14.fodp");
        assert_eq!(json["attachments"][0]["disposition"], "attachment");
    }

    #[test]
    fn test_smtp_message() {
        let html = build_message(&outgoing(Body::Html("<h2>hi</h2>".to_string()))).unwrap();
        let formatted = String::from_utf8(html.formatted()).unwrap();
        assert!(formatted.contains("a@example.com"));
        assert!(formatted.contains("<b@example.com>"));
        assert!(formatted.contains("Content-Type: text/html"));

        let slide = build_message(&outgoing(Body::Attachment { text: "attached".to_string(), attachment: slide() })).unwrap();
        let formatted = String::from_utf8(slide.formatted()).unwrap();
        assert!(formatted.contains("multipart/mixed"));
        assert!(formatted.contains("wx_brief_2025-07-14.fodp"));
        assert!(formatted.contains(MIME_TYPE));
    }
}
