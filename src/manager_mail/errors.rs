use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidEmailAddress(String),
    #[error("json document error: {0}")]
    Document(#[from] serde_json::Error),
    #[error("sendgrid error: {0}")]
    SendGrid(#[from] ureq::Error),
    #[error("error building message: {0}")]
    Message(String),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
impl From<lettre::error::Error> for MailError {
    fn from(e: lettre::error::Error) -> Self { MailError::Message(e.to_string()) }
}
impl From<lettre::message::header::ContentTypeErr> for MailError {
    fn from(e: lettre::message::header::ContentTypeErr) -> Self { MailError::Message(e.to_string()) }
}
