use crate::dom::{Document, NodeId};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

pub const FORM_ID: &str = "contact-form";
pub const STATUS_ID: &str = "form-status";
pub const SENDING_MESSAGE: &str = "Sending…";
pub const THANKS_MESSAGE: &str = "Thanks — I will get back to you soon.";
pub const REPLY_DELAY: Duration = Duration::from_millis(900);

const FIELDS: [&str; 3] = ["name", "email", "message"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill out all fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// `\s` plus the byte-order mark, which form inputs treat as whitespace.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

pub fn validate(name: &str, email: &str, message: &str) -> Result<ContactMessage, ContactError> {
    let (name, email, message) = (
        name.trim_matches(is_blank),
        email.trim_matches(is_blank),
        message.trim_matches(is_blank),
    );
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ContactError::MissingFields);
    }
    if !looks_like_email(email) {
        return Err(ContactError::InvalidEmail);
    }
    Ok(ContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

/// `^\S+@\S+\.\S+$`, with U+FEFF counted as whitespace.
pub fn looks_like_email(value: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s\x{FEFF}]+@[^\s\x{FEFF}]+\.[^\s\x{FEFF}]+$").expect("email pattern")
    });
    regex.is_match(value)
}

/// The mock contact form: validation plus a simulated send.
#[derive(Debug)]
pub struct ContactForm {
    form: NodeId,
    status: NodeId,
}

impl ContactForm {
    pub fn find(doc: &Document) -> Option<Self> {
        Some(Self {
            form: doc.get_element_by_id(FORM_ID)?,
            status: doc.get_element_by_id(STATUS_ID)?,
        })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    fn field(&self, doc: &Document, name: &str) -> Option<NodeId> {
        doc.descendants(self.form)
            .into_iter()
            .find(|node| doc.attr(*node, "name") == Some(name))
    }

    pub fn field_value(&self, doc: &Document, name: &str) -> String {
        self.field(doc, name)
            .and_then(|node| doc.attr(node, "value"))
            .unwrap_or_default()
            .to_string()
    }

    pub fn set_field_value(&self, doc: &mut Document, name: &str, value: &str) -> bool {
        match self.field(doc, name) {
            Some(node) => {
                doc.set_attr(node, "value", value);
                true
            }
            None => false,
        }
    }

    /// Validates the fields and updates the status line. On success the
    /// caller schedules [`ContactForm::complete`] after [`REPLY_DELAY`].
    pub fn submit(&self, doc: &mut Document) -> Result<ContactMessage, ContactError> {
        doc.set_text(self.status, "");
        let result = validate(
            &self.field_value(doc, "name"),
            &self.field_value(doc, "email"),
            &self.field_value(doc, "message"),
        );
        match &result {
            Ok(_) => {
                doc.set_text(self.status, SENDING_MESSAGE);
                doc.remove_class(self.status, "error");
            }
            Err(err) => {
                doc.set_text(self.status, &err.to_string());
                doc.add_class(self.status, "error");
            }
        }
        result
    }

    pub fn complete(&self, doc: &mut Document) {
        doc.set_text(self.status, THANKS_MESSAGE);
        for name in FIELDS {
            if let Some(node) = self.field(doc, name) {
                doc.set_attr(node, "value", "");
            }
        }
    }
}
