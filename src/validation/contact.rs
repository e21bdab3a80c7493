//! Contact message form

use serde::{Deserialize, Serialize};

use super::{email, text, trimmed, ValidationResult, Validator};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

pub struct ContactSchema;

impl Validator for ContactSchema {
    type Input = ContactInput;
    type Output = ContactMessage;

    fn check(&self, input: &ContactInput, result: &mut ValidationResult) {
        text(result, "name", &input.name, Some(2), Some(100));
        email(result, "email", &input.email);
        text(result, "subject", &input.subject, Some(5), Some(100));
        text(result, "message", &input.message, Some(10), Some(1000));
    }

    fn normalize(&self, input: ContactInput) -> ContactMessage {
        ContactMessage {
            name: trimmed(input.name),
            email: trimmed(input.email).to_lowercase(),
            subject: trimmed(input.subject),
            message: trimmed(input.message),
        }
    }
}
