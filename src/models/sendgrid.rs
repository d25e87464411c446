use lettre::message::Mailbox;
use serde::Serialize;

#[derive(Serialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Address {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct Personalizations {
    pub to: Vec<Address>,
}

#[derive(Serialize)]
pub struct Attachment {
    pub content: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub filename: String,
    pub disposition: String,
}

#[derive(Serialize)]
pub struct Email {
    pub personalizations: Vec<Personalizations>,
    pub from: Address,
    pub subject: String,
    pub content: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl From<&Mailbox> for Address {
    fn from(mailbox: &Mailbox) -> Self {
        Address {
            email: mailbox.email.to_string(),
            name: mailbox.name.clone(),
        }
    }
}
