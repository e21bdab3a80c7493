//! Account settings form

use serde::{Deserialize, Serialize};

use super::{strong_password, ValidationResult, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordChangeInput {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsInput {
    pub language: Option<String>,
    pub theme: Option<String>,
    pub email_notifications: Option<bool>,
    pub job_alerts: Option<bool>,
    pub high_contrast: Option<bool>,
    pub password: Option<PasswordChangeInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: Language,
    pub theme: Theme,
    pub email_notifications: bool,
    pub job_alerts: bool,
    pub high_contrast: bool,
    pub password_change: Option<PasswordChange>,
}

fn parse_language(s: &str) -> Option<Language> {
    match s {
        "fr" => Some(Language::Fr),
        "en" => Some(Language::En),
        _ => None,
    }
}

fn parse_theme(s: &str) -> Option<Theme> {
    match s {
        "light" => Some(Theme::Light),
        "dark" => Some(Theme::Dark),
        "system" => Some(Theme::System),
        _ => None,
    }
}

pub struct SettingsSchema;

impl Validator for SettingsSchema {
    type Input = SettingsInput;
    type Output = Settings;

    fn check(&self, input: &SettingsInput, result: &mut ValidationResult) {
        if let Some(language) = input.language.as_deref() {
            if parse_language(language).is_none() {
                result.add_error("language", "Langue non prise en charge");
            }
        }
        if let Some(theme) = input.theme.as_deref() {
            if parse_theme(theme).is_none() {
                result.add_error("theme", "Thème invalide");
            }
        }

        if let Some(password) = &input.password {
            if password.current_password.as_deref().unwrap_or("").is_empty() {
                result.add_error(
                    "password.currentPassword",
                    "Le mot de passe actuel est requis",
                );
            }
            strong_password(result, "password.newPassword", &password.new_password);
            if password.confirm_password.as_deref().unwrap_or("").is_empty() {
                result.add_error(
                    "password.confirmPassword",
                    "Veuillez confirmer le mot de passe",
                );
            }
        }
    }

    fn refine(&self, input: &SettingsInput, result: &mut ValidationResult) {
        if let Some(password) = &input.password {
            if password.new_password != password.confirm_password {
                result.add_error(
                    "password.confirmPassword",
                    "Les mots de passe ne correspondent pas",
                );
            }
            if password.new_password == password.current_password {
                result.add_error(
                    "password.newPassword",
                    "Le nouveau mot de passe doit être différent de l'actuel",
                );
            }
        }
    }

    fn normalize(&self, input: SettingsInput) -> Settings {
        Settings {
            language: input
                .language
                .as_deref()
                .and_then(parse_language)
                .unwrap_or_default(),
            theme: input.theme.as_deref().and_then(parse_theme).unwrap_or_default(),
            email_notifications: input.email_notifications.unwrap_or(true),
            job_alerts: input.job_alerts.unwrap_or(true),
            high_contrast: input.high_contrast.unwrap_or(false),
            password_change: input.password.map(|p| PasswordChange {
                current_password: p.current_password.unwrap_or_default(),
                new_password: p.new_password.unwrap_or_default(),
            }),
        }
    }
}
