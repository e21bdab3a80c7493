//! CLI command implementations

use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Password};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::app::App;
use crate::auth::{AuthResponse, LoginCredentials, RegisterData, RouteGuard, UserRole};
use crate::cli::{
    format_decision, info, print_session_detail, print_validation_errors, success, warn,
    FormKind, OutputFormat, PrefsAction, RoleArg,
};
use crate::config::{self, loader::CONFIG_FILENAME};
use crate::validation::{
    CandidateSchema, CompanySchema, ContactSchema, JobSchema, LoginSchema, RegisterSchema,
    SearchFiltersSchema, SettingsSchema, ValidationResult, Validator, FORM_FIELD,
};

/// Write a default handijobs.toml
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Sign in with 'handijobs login --email <email>'");

    Ok(())
}

/// Sign in
pub async fn login(email: &str, password: Option<String>) -> Result<()> {
    let app = load_app()?;
    let password = match password {
        Some(password) => password,
        None => prompt_password(false)?,
    };

    let form = LoginSchema
        .parse_json(serde_json::json!({ "email": email, "password": password }))
        .map_err(reject_form)?;
    let credentials: LoginCredentials = form.into();

    let response = sign_in(&app, &credentials).await?;

    success(&format!(
        "Signed in as {} ({})",
        response.user.full_name(),
        response.user.role
    ));
    info(&format!(
        "Landing view: {}",
        response.user.role.landing_view().path()
    ));
    Ok(())
}

async fn sign_in(app: &App, credentials: &LoginCredentials) -> Result<AuthResponse> {
    let pb = spinner("Signing in...");
    let outcome = app.session.login(credentials).await;
    pb.finish_and_clear();
    Ok(outcome?)
}

/// Create an account
pub async fn register(
    email: &str,
    first_name: &str,
    last_name: &str,
    role: RoleArg,
    company_name: Option<String>,
    accept_terms: bool,
) -> Result<()> {
    let app = load_app()?;
    let role: UserRole = role.into();
    let password = prompt_password(true)?;

    let form = RegisterSchema
        .parse_json(serde_json::json!({
            "email": email,
            "password": password,
            "confirmPassword": password,
            "firstName": first_name,
            "lastName": last_name,
            "role": role.as_str(),
            "companyName": company_name,
            "acceptTerms": accept_terms,
        }))
        .map_err(reject_form)?;
    let data: RegisterData = form.into();

    let response = create_account(&app, data).await?;

    success(&format!("Welcome {}", response.user.full_name()));
    if let Some(company) = response.company {
        info(&format!("Company profile created: {}", company.name));
    }
    warn("Accounts are kept in memory: this session ends with the current run");
    Ok(())
}

async fn create_account(app: &App, data: RegisterData) -> Result<AuthResponse> {
    let pb = spinner("Creating account...");
    let outcome = app.session.register(data).await;
    pb.finish_and_clear();
    Ok(outcome?)
}

/// Show the signed-in user
pub async fn whoami(format: OutputFormat) -> Result<()> {
    let app = load_app()?;
    let state = app.session.initialize().await;

    match format {
        OutputFormat::Table => print_session_detail(&state),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&session_view(&state))?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&session_view(&state))?),
    }

    Ok(())
}

/// Token-free view of the session for machine-readable output
fn session_view(state: &crate::auth::SessionState) -> serde_json::Value {
    serde_json::json!({
        "isAuthenticated": state.is_authenticated,
        "user": state.user,
        "company": state.company,
    })
}

/// Sign out
pub async fn logout() -> Result<()> {
    let app = load_app()?;
    app.session.initialize().await;
    app.session.logout().await;
    success("Signed out");
    Ok(())
}

/// Re-issue the stored token
pub async fn refresh() -> Result<()> {
    let app = load_app()?;
    let token = app.session.auth().refresh_token().await?;
    success(&format!(
        "Token refreshed, valid until {}",
        token.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    Ok(())
}

/// Print the guard decision for the current session
pub async fn guard(role: Option<RoleArg>) -> Result<()> {
    let app = load_app()?;
    let state = app.session.initialize().await;

    let guard = match role {
        Some(role) => RouteGuard::role(role.into()),
        None => RouteGuard::authenticated(),
    };
    let decision = guard.check(&state);

    println!("{}", format_decision(&decision));
    Ok(())
}

/// Validate a JSON submission against a form schema
pub async fn validate(form: FormKind, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let outcome = match form {
        FormKind::Login => check(LoginSchema, value),
        FormKind::Register => check(RegisterSchema, value),
        FormKind::Job => check(JobSchema, value),
        FormKind::Candidate => check(CandidateSchema, value),
        FormKind::Company => check(CompanySchema, value),
        FormKind::Search => check(SearchFiltersSchema, value),
        FormKind::Contact => check(ContactSchema, value),
        FormKind::Settings => check(SettingsSchema, value),
    };

    match outcome {
        Ok(normalized) => {
            success("Valid");
            println!("{}", serde_json::to_string_pretty(&normalized)?);
            Ok(())
        }
        Err(result) => {
            print_validation_errors(&result);
            bail!("{} invalid field(s)", result.fields().len())
        }
    }
}

fn check<V>(schema: V, value: serde_json::Value) -> std::result::Result<serde_json::Value, ValidationResult>
where
    V: Validator,
    V::Output: Serialize,
{
    let output = schema.parse_json(value)?;
    serde_json::to_value(output).map_err(|e| ValidationResult::single(FORM_FIELD, &e.to_string()))
}

/// Read or write a UI preference
pub async fn prefs(action: PrefsAction) -> Result<()> {
    let app = load_app()?;
    match action {
        PrefsAction::Get { name } => match app.preferences.get(&name)? {
            Some(value) => println!("{}", value),
            None => info(&format!("'{}' is not set", name)),
        },
        PrefsAction::Set { name, value } => {
            app.preferences.set(&name, &value)?;
            success(&format!("{} = {}", name, value));
        }
    }
    Ok(())
}

fn load_app() -> Result<App> {
    let config = config::load_config()?;
    Ok(App::from_config(config)?)
}

fn prompt_password(confirm: bool) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut prompt = Password::with_theme(&theme).with_prompt("Mot de passe");
    if confirm {
        prompt = prompt.with_confirmation(
            "Confirmer le mot de passe",
            "Les mots de passe ne correspondent pas",
        );
    }
    Ok(prompt.interact()?)
}

fn reject_form(result: ValidationResult) -> anyhow::Error {
    print_validation_errors(&result);
    anyhow::anyhow!("{} invalid field(s)", result.fields().len())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
