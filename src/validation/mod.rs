//! Form validation
//!
//! Each form has a [`Validator`]: field rules run first, cross-field
//! refinements only once every field rule passes, and a valid payload is
//! normalized into a typed value. Failures are collected per field path so
//! they can be shown next to the offending input.

pub mod auth;
pub mod candidate;
pub mod company;
pub mod contact;
pub mod job;
pub mod search;
pub mod settings;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

pub use auth::{LoginForm, LoginSchema, RegisterForm, RegisterSchema};
pub use candidate::{Availability, CandidateProfile, CandidateSchema};
pub use company::{CompanyProfile, CompanySchema};
pub use contact::{ContactMessage, ContactSchema};
pub use job::{ContractType, JobPosting, JobSchema, WorkMode};
pub use search::{SearchFilters, SearchFiltersSchema};
pub use settings::{Language, Settings, SettingsSchema, Theme};

/// Field path used for errors that belong to the whole payload
pub const FORM_FIELD: &str = "_form";

/// A single field error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Outcome of validating one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// A failed result with one error
    pub fn single(field: &str, message: &str) -> Self {
        let mut result = Self::new();
        result.add_error(field, message);
        result
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }

    /// Messages attached to `field`
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Distinct field paths with errors, in first-seen order
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&messages.join(", "))
    }
}

/// Schema for one form
pub trait Validator {
    /// Raw submission. Missing fields deserialize to their default so they
    /// surface as field errors rather than a parse failure.
    type Input: DeserializeOwned;
    /// Normalized value handed to the caller
    type Output;

    /// Field-level rules
    fn check(&self, input: &Self::Input, result: &mut ValidationResult);

    /// Cross-field rules, run only when every field rule passed
    fn refine(&self, _input: &Self::Input, _result: &mut ValidationResult) {}

    /// Build the output from an input that passed validation
    fn normalize(&self, input: Self::Input) -> Self::Output;

    fn validate(&self, input: &Self::Input) -> ValidationResult {
        let mut result = ValidationResult::new();
        self.check(input, &mut result);
        if result.is_valid {
            self.refine(input, &mut result);
        }
        result
    }

    /// All-or-nothing validation
    fn parse(&self, input: Self::Input) -> Result<Self::Output, ValidationResult> {
        let result = self.validate(&input);
        if result.is_valid {
            Ok(self.normalize(input))
        } else {
            Err(result)
        }
    }

    /// Deserialize a JSON submission, then [`Validator::parse`] it
    fn parse_json(&self, value: serde_json::Value) -> Result<Self::Output, ValidationResult> {
        let input: Self::Input = serde_json::from_value(value).map_err(|e| {
            ValidationResult::single(FORM_FIELD, &format!("Format de données invalide: {}", e))
        })?;
        self.parse(input)
    }
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern - this is a bug in the codebase")
});

static POSTAL_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{5}$").expect("Invalid regex pattern - this is a bug in the codebase")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+33\s?|0)[1-9](?:[\s.-]?\d{2}){4}$")
        .expect("Invalid regex pattern - this is a bug in the codebase")
});

static SIRET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{14}$").expect("Invalid regex pattern - this is a bug in the codebase")
});

/// Trimmed value of a string field, `None` when blank
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Trimmed owned value, empty when absent
pub(crate) fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Trimmed owned value, `None` when blank
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Require a non-blank string, returning its trimmed value
pub(crate) fn required<'a>(
    result: &mut ValidationResult,
    field: &str,
    value: &'a Option<String>,
    message: &str,
) -> Option<&'a str> {
    let value = present(value);
    if value.is_none() {
        result.add_error(field, message);
    }
    value
}

/// Character count bounds on a present value
pub(crate) fn length(
    result: &mut ValidationResult,
    field: &str,
    value: &str,
    min: Option<usize>,
    max: Option<usize>,
) {
    let count = value.chars().count();
    if let Some(min) = min {
        if count < min {
            result.add_error(
                field,
                &format!("Doit contenir au moins {} caractères", min),
            );
            return;
        }
    }
    if let Some(max) = max {
        if count > max {
            result.add_error(
                field,
                &format!("Ne doit pas dépasser {} caractères", max),
            );
        }
    }
}

/// Required, bounded text field
pub(crate) fn text<'a>(
    result: &mut ValidationResult,
    field: &str,
    value: &'a Option<String>,
    min: Option<usize>,
    max: Option<usize>,
) -> Option<&'a str> {
    let value = required(result, field, value, "Ce champ est requis")?;
    length(result, field, value, min, max);
    Some(value)
}

/// Optional, bounded text field
pub(crate) fn optional_text(
    result: &mut ValidationResult,
    field: &str,
    value: &Option<String>,
    max: usize,
) {
    if let Some(value) = present(value) {
        length(result, field, value, None, Some(max));
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub(crate) fn email(result: &mut ValidationResult, field: &str, value: &Option<String>) {
    if let Some(value) = required(result, field, value, "L'email est requis") {
        if !is_valid_email(value) {
            result.add_error(field, "Email invalide");
        }
    }
}

pub(crate) fn postal_code(result: &mut ValidationResult, field: &str, value: &Option<String>) {
    if let Some(value) = required(result, field, value, "Le code postal est requis") {
        if !POSTAL_CODE_RE.is_match(value) {
            result.add_error(field, "Le code postal doit contenir 5 chiffres");
        }
    }
}

pub(crate) fn phone(result: &mut ValidationResult, field: &str, value: &Option<String>) {
    if let Some(value) = present(value) {
        if !PHONE_RE.is_match(value) {
            result.add_error(field, "Numéro de téléphone invalide");
        }
    }
}

pub(crate) fn siret(result: &mut ValidationResult, field: &str, value: &Option<String>) {
    if let Some(value) = present(value) {
        if !SIRET_RE.is_match(&value.replace(' ', "")) {
            result.add_error(field, "Le SIRET doit contenir 14 chiffres");
        }
    }
}

pub(crate) fn website(result: &mut ValidationResult, field: &str, value: &Option<String>) {
    if let Some(value) = present(value) {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            result.add_error(
                field,
                "L'URL doit commencer par http:// ou https://",
            );
        }
    }
}

/// Strong password: 8+ characters with upper, lower and digit
pub(crate) fn strong_password(result: &mut ValidationResult, field: &str, value: &Option<String>) {
    let Some(value) = value.as_deref().filter(|v| !v.is_empty()) else {
        result.add_error(field, "Le mot de passe est requis");
        return;
    };
    if value.chars().count() < 8 {
        result.add_error(
            field,
            "Le mot de passe doit contenir au moins 8 caractères",
        );
    }
    if !value.chars().any(|c| c.is_uppercase()) {
        result.add_error(field, "Le mot de passe doit contenir une majuscule");
    }
    if !value.chars().any(|c| c.is_lowercase()) {
        result.add_error(field, "Le mot de passe doit contenir une minuscule");
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        result.add_error(field, "Le mot de passe doit contenir un chiffre");
    }
}

/// Numeric bounds, inclusive
pub(crate) fn range<T: PartialOrd + fmt::Display + Copy>(
    result: &mut ValidationResult,
    field: &str,
    value: T,
    min: T,
    max: T,
) {
    if value < min || value > max {
        result.add_error(
            field,
            &format!("Doit être compris entre {} et {}", min, max),
        );
    }
}

/// Parse an enumerated value, recording an error when it is not allowed
pub(crate) fn choice<T>(
    result: &mut ValidationResult,
    field: &str,
    value: &Option<String>,
    parse: impl Fn(&str) -> Option<T>,
    message: &str,
) -> Option<T> {
    let value = required(result, field, value, "Ce champ est requis")?;
    let parsed = parse(value);
    if parsed.is_none() {
        result.add_error(field, message);
    }
    parsed
}

/// Non-empty list of non-blank entries
pub(crate) fn non_empty_list(
    result: &mut ValidationResult,
    field: &str,
    values: &[String],
    message: &str,
) {
    if values.iter().all(|v| v.trim().is_empty()) {
        result.add_error(field, message);
    }
}

/// Trim entries and drop blanks
pub(crate) fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
