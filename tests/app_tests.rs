//! Application wiring, configuration and error tests

use std::sync::Arc;

use handijobs::auth::{FileStorage, KeyValueStorage, LoginCredentials, DEMO_PASSWORD};
use handijobs::config::{self, Config, TokenFormat};
use handijobs::error::Error;
use handijobs::validation::ValidationResult;
use handijobs::App;

fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.password_cost = 4;
    config
}

#[tokio::test]
async fn test_in_memory_app_logs_in() {
    let app = App::in_memory(test_config()).unwrap();

    let response = app
        .session
        .login(&LoginCredentials::new("contact@apf-association.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.user.full_name(), "Claire Lefevre");
    assert_eq!(response.token.split('.').count(), 3); // signed by default
}

#[tokio::test]
async fn test_opaque_tokens_from_config() {
    let mut config = test_config();
    config.auth.token_format = TokenFormat::Opaque;
    let app = App::in_memory(config).unwrap();

    let response = app
        .session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    assert!(!response.token.contains('.'));
    let claims = app.session.auth().codec().decode(&response.token).unwrap();
    assert_eq!(claims.user_id, response.user.id);
}

#[tokio::test]
async fn test_token_ttl_from_config() {
    let mut config = test_config();
    config.auth.token_ttl_hours = 1;
    let app = App::in_memory(config).unwrap();

    let response = app
        .session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    let remaining = response.expires_at - chrono::Utc::now();
    assert!(remaining <= chrono::Duration::hours(1));
    assert!(remaining > chrono::Duration::minutes(59));
}

#[test]
fn test_unusable_token_ttl_is_rejected() {
    for hours in [0, -1, i64::MAX / 1000] {
        let mut config = test_config();
        config.auth.token_ttl_hours = hours;
        let err = App::in_memory(config).err().expect("bad ttl accepted");
        assert!(matches!(err, Error::Config(_)));
    }
}

#[tokio::test]
async fn test_storage_keys_are_namespaced() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.storage.path = dir.path().join("storage.json");
    config.storage.namespace = "demo".to_string();

    let app = App::from_config(config.clone()).unwrap();
    app.session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
        .await
        .unwrap();
    app.preferences.set("theme", "dark").unwrap();

    let storage = FileStorage::open(&config.storage.path).unwrap();
    assert!(storage.get("demo.auth.token").unwrap().is_some());
    assert_eq!(storage.get("demo.prefs.theme").unwrap().as_deref(), Some("dark"));
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.storage.path = dir.path().join("nested/storage.json");

    {
        let app = App::from_config(config.clone()).unwrap();
        app.session
            .login(&LoginCredentials::new("sophie.martin@handijobs.fr", DEMO_PASSWORD))
            .await
            .unwrap();
    }

    let app = App::from_config(config.clone()).unwrap();
    let state = app.session.initialize().await;
    assert!(state.is_authenticated);
    assert!(state.user.unwrap().is_admin());

    app.session.logout().await;
    let storage: Arc<dyn KeyValueStorage> =
        Arc::new(FileStorage::open(&config.storage.path).unwrap());
    assert_eq!(storage.get(&config.storage.token_key()).unwrap(), None);
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(config::loader::CONFIG_FILENAME);

    let mut config = Config::default();
    config.auth.token_format = TokenFormat::Opaque;
    config.features.insert("ai_matching".to_string(), false);
    config::save_config(&config, &path).unwrap();

    let loaded = config::load_config_from_path(&path).unwrap();
    assert_eq!(loaded.auth.token_format, TokenFormat::Opaque);
    assert!(!loaded.feature_enabled("ai_matching"));
    assert!(!loaded.feature_enabled("unknown_flag"));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = config::load_config_from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::InvalidCredentials.to_string(),
        "Email ou mot de passe incorrect"
    );
    assert!(Error::TokenExpired.is_token_error());
    assert!(!Error::InvalidCredentials.is_token_error());

    let result = ValidationResult::single("email", "Email invalide");
    let err: Error = result.into();
    assert_eq!(err.to_string(), "Validation failed: email: Email invalide");
}
