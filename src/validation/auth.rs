//! Login and registration forms

use serde::{Deserialize, Serialize};

use super::{choice, email, optional, present, strong_password, text, trimmed, ValidationResult, Validator};
use crate::auth::models::{LoginCredentials, RegisterData, UserRole};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub remember_me: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub remember_me: bool,
}

impl From<LoginForm> for LoginCredentials {
    fn from(form: LoginForm) -> Self {
        LoginCredentials::new(form.email, form.password)
    }
}

/// Login form. Only asks for 6 characters: it must accept passwords created
/// before the registration rules tightened.
pub struct LoginSchema;

impl Validator for LoginSchema {
    type Input = LoginInput;
    type Output = LoginForm;

    fn check(&self, input: &LoginInput, result: &mut ValidationResult) {
        email(result, "email", &input.email);

        match input.password.as_deref().filter(|p| !p.is_empty()) {
            None => result.add_error("password", "Le mot de passe est requis"),
            Some(password) if password.chars().count() < 6 => result.add_error(
                "password",
                "Le mot de passe doit contenir au moins 6 caractères",
            ),
            Some(_) => {}
        }
    }

    fn normalize(&self, input: LoginInput) -> LoginForm {
        LoginForm {
            email: trimmed(input.email).to_lowercase(),
            password: input.password.unwrap_or_default(),
            remember_me: input.remember_me.unwrap_or(false),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub company_name: Option<String>,
    pub accept_terms: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub company_name: Option<String>,
}

impl From<RegisterForm> for RegisterData {
    fn from(form: RegisterForm) -> Self {
        RegisterData {
            email: form.email,
            password: form.password,
            first_name: form.first_name,
            last_name: form.last_name,
            role: form.role,
            company_name: form.company_name,
        }
    }
}

/// Registration form
pub struct RegisterSchema;

impl Validator for RegisterSchema {
    type Input = RegisterInput;
    type Output = RegisterForm;

    fn check(&self, input: &RegisterInput, result: &mut ValidationResult) {
        email(result, "email", &input.email);
        strong_password(result, "password", &input.password);
        if input.confirm_password.as_deref().unwrap_or("").is_empty() {
            result.add_error("confirmPassword", "Veuillez confirmer le mot de passe");
        }
        text(result, "firstName", &input.first_name, Some(2), Some(50));
        text(result, "lastName", &input.last_name, Some(2), Some(50));
        choice(
            result,
            "role",
            &input.role,
            |s| s.parse::<UserRole>().ok(),
            "Type de compte invalide",
        );
        if let Some(name) = present(&input.company_name) {
            super::length(result, "companyName", name, Some(2), Some(100));
        }
        if input.accept_terms != Some(true) {
            result.add_error(
                "acceptTerms",
                "Vous devez accepter les conditions d'utilisation",
            );
        }
    }

    fn refine(&self, input: &RegisterInput, result: &mut ValidationResult) {
        if input.password != input.confirm_password {
            result.add_error(
                "confirmPassword",
                "Les mots de passe ne correspondent pas",
            );
        }

        let is_company = present(&input.role) == Some(UserRole::Company.as_str());
        if is_company && present(&input.company_name).is_none() {
            result.add_error("companyName", "Le nom de l'entreprise est requis");
        }
    }

    fn normalize(&self, input: RegisterInput) -> RegisterForm {
        let role = present(&input.role)
            .and_then(|r| r.parse().ok())
            .unwrap_or(UserRole::Candidate);
        RegisterForm {
            email: trimmed(input.email).to_lowercase(),
            password: input.password.unwrap_or_default(),
            first_name: trimmed(input.first_name),
            last_name: trimmed(input.last_name),
            role,
            company_name: optional(input.company_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration(password: &str, confirm: &str) -> serde_json::Value {
        json!({
            "email": "lea.durand@example.fr",
            "password": password,
            "confirmPassword": confirm,
            "firstName": "Léa",
            "lastName": "Durand",
            "role": "candidate",
            "acceptTerms": true
        })
    }

    #[test]
    fn test_login_accepts_six_characters() {
        let form = LoginSchema
            .parse_json(json!({"email": " Ahmed.Benali@example.fr ", "password": "abcdef"}))
            .unwrap();
        assert_eq!(form.email, "ahmed.benali@example.fr");
        assert!(!form.remember_me);
    }

    #[test]
    fn test_login_rejects_five_characters() {
        let result = LoginSchema
            .parse_json(json!({"email": "a@b.fr", "password": "abcde"}))
            .unwrap_err();
        assert_eq!(result.fields(), vec!["password"]);
    }

    #[test]
    fn test_login_missing_fields() {
        let result = LoginSchema.parse_json(json!({})).unwrap_err();
        assert_eq!(result.fields(), vec!["email", "password"]);
    }

    #[test]
    fn test_register_weak_password() {
        let result = RegisterSchema
            .parse_json(registration("abc", "abc"))
            .unwrap_err();
        assert!(result.has_error("password"));
        assert!(result.messages_for("password").len() >= 2);
        assert!(!result.has_error("confirmPassword"));
    }

    #[test]
    fn test_register_mismatched_confirmation() {
        let result = RegisterSchema
            .parse_json(registration("Abcdef12", "Abcdef99"))
            .unwrap_err();
        assert_eq!(result.fields(), vec!["confirmPassword"]);
        assert_eq!(
            result.messages_for("confirmPassword"),
            vec!["Les mots de passe ne correspondent pas"]
        );
    }

    #[test]
    fn test_register_valid() {
        let form = RegisterSchema
            .parse_json(registration("Abcdef12", "Abcdef12"))
            .unwrap();
        assert_eq!(form.role, UserRole::Candidate);
        assert_eq!(form.company_name, None);
        let data: RegisterData = form.into();
        assert_eq!(data.first_name, "Léa");
    }

    #[test]
    fn test_register_requires_terms() {
        let mut payload = registration("Abcdef12", "Abcdef12");
        payload["acceptTerms"] = json!(false);
        let result = RegisterSchema.parse_json(payload).unwrap_err();
        assert_eq!(result.fields(), vec!["acceptTerms"]);
    }

    #[test]
    fn test_register_company_needs_company_name() {
        let mut payload = registration("Abcdef12", "Abcdef12");
        payload["role"] = json!("company");
        let result = RegisterSchema.parse_json(payload.clone()).unwrap_err();
        assert_eq!(result.fields(), vec!["companyName"]);

        payload["companyName"] = json!("  Acme Inclusion ");
        let form = RegisterSchema.parse_json(payload).unwrap();
        assert_eq!(form.company_name.as_deref(), Some("Acme Inclusion"));
    }

    #[test]
    fn test_register_unknown_role() {
        let mut payload = registration("Abcdef12", "Abcdef12");
        payload["role"] = json!("recruiter");
        let result = RegisterSchema.parse_json(payload).unwrap_err();
        assert_eq!(result.fields(), vec!["role"]);
    }

    #[test]
    fn test_wrong_json_type_is_form_error() {
        let result = LoginSchema
            .parse_json(json!({"email": 42, "password": "abcdef"}))
            .unwrap_err();
        assert_eq!(result.fields(), vec![super::super::FORM_FIELD]);
    }
}
