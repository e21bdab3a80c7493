//! Session lifecycle tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use handijobs::auth::{
    AuthService, Claims, Company, CredentialStore, FileStorage, InMemoryCredentialStore,
    KeyValueStorage, LoginCredentials, MemoryStorage, PreferenceStore, ProfileUpdate,
    RegisterData, SessionStore, SignedTokenCodec, User, UserRecord, UserRole, DEMO_PASSWORD,
};
use handijobs::error::{Error, Result};

const TOKEN_KEY: &str = "handijobs.auth.token";

fn service(credentials: Arc<dyn CredentialStore>, storage: Arc<dyn KeyValueStorage>) -> AuthService {
    AuthService::new(
        credentials,
        storage,
        Arc::new(SignedTokenCodec::new(b"integration-secret")),
        TOKEN_KEY,
    )
    .with_password_cost(4)
}

fn session_with(storage: Arc<dyn KeyValueStorage>) -> SessionStore {
    let credentials = InMemoryCredentialStore::with_demo_accounts().expect("demo accounts");
    SessionStore::new(service(Arc::new(credentials), storage))
}

fn session() -> SessionStore {
    session_with(Arc::new(MemoryStorage::new()))
}

/// Forwards to the demo store and counts token lookups
struct CountingStore {
    inner: InMemoryCredentialStore,
    lookups: AtomicUsize,
}

#[async_trait]
impl CredentialStore for CountingStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(user_id).await
    }

    async fn insert_user(&self, record: UserRecord) -> Result<()> {
        self.inner.insert_user(record).await
    }

    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<User> {
        self.inner.touch_last_login(user_id, at).await
    }

    async fn update_user(&self, user: User) -> Result<()> {
        self.inner.update_user(user).await
    }

    async fn find_company_by_user(&self, user_id: &str) -> Result<Option<Company>> {
        self.inner.find_company_by_user(user_id).await
    }

    async fn insert_company(&self, company: Company) -> Result<()> {
        self.inner.insert_company(company).await
    }

    async fn update_company(&self, company: Company) -> Result<()> {
        self.inner.update_company(company).await
    }
}

#[tokio::test]
async fn test_every_demo_account_can_log_in() {
    let cases = [
        ("marie.dubois@techcorp.fr", UserRole::Company, true),
        ("ahmed.benali@example.fr", UserRole::Candidate, false),
        ("sophie.martin@handijobs.fr", UserRole::Admin, false),
        ("contact@apf-association.fr", UserRole::Association, false),
    ];

    for (email, role, has_company) in cases {
        let session = session();
        let response = session
            .login(&LoginCredentials::new(email, DEMO_PASSWORD))
            .await
            .expect("demo login");

        assert_eq!(response.user.role, role);
        assert_eq!(response.company.is_some(), has_company);

        let state = session.state();
        assert!(state.is_authenticated);
        assert_eq!(state.role(), Some(role));
        assert_eq!(state.token.as_deref(), Some(response.token.as_str()));
    }
}

#[tokio::test]
async fn test_company_account_carries_oeth_profile() {
    let session = session();
    let response = session
        .login(&LoginCredentials::new("marie.dubois@techcorp.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    let company = response.company.expect("company profile");
    assert_eq!(company.name, "TechCorp Innovation");
    assert!(company.oeth_compliant);
    assert_eq!(company.oeth_rate, 8.5);
}

#[tokio::test]
async fn test_failed_login_leaves_session_anonymous() {
    let session = session();
    session.initialize().await;

    let err = session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", "wrong-password"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidCredentials));
    let state = session.state();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert!(state.user.is_none());
    assert_eq!(state.error.as_deref(), Some("Email ou mot de passe incorrect"));

    session.clear_error();
    assert!(session.state().error.is_none());
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_the_same() {
    let session = session();

    let unknown = session
        .login(&LoginCredentials::new("nobody@example.fr", DEMO_PASSWORD))
        .await
        .unwrap_err();
    let wrong = session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", "nope-nope"))
        .await
        .unwrap_err();

    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn test_initialize_runs_auth_check_once() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let counting = Arc::new(CountingStore {
        inner: InMemoryCredentialStore::with_demo_accounts().unwrap(),
        lookups: AtomicUsize::new(0),
    });

    let first = SessionStore::new(service(counting.clone(), storage.clone()));
    first
        .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    let baseline = counting.lookups.load(Ordering::SeqCst);

    let restored = SessionStore::new(service(counting.clone(), storage));
    let state = restored.initialize().await;
    assert!(state.is_authenticated);
    assert!(state.is_initialized);

    restored.initialize().await;
    restored.initialize().await;

    assert_eq!(counting.lookups.load(Ordering::SeqCst), baseline + 1);
}

#[tokio::test]
async fn test_initialize_without_token_settles_anonymous() {
    let session = session();
    assert!(!session.state().is_initialized);

    let state = session.initialize().await;

    assert!(state.is_initialized);
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_expired_token_is_purged() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let session = session_with(storage.clone());

    let now = Utc::now().timestamp_millis();
    let expired = Claims {
        user_id: "2".to_string(),
        iat: now - 10_000,
        exp: now - 1_000,
    };
    let token = session.auth().codec().encode(&expired).unwrap();
    storage.set(TOKEN_KEY, &token).unwrap();

    let state = session.initialize().await;

    assert!(!state.is_authenticated);
    assert!(state.is_initialized);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_garbage_token_is_purged() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "definitely-not-a-token").unwrap();

    let session = session_with(storage.clone());
    let state = session.check_auth().await;

    assert!(!state.is_authenticated);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_token_for_unknown_user_is_rejected() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let session = session_with(storage.clone());

    let claims = Claims::for_user("999", chrono::Duration::hours(1));
    let token = session.auth().codec().encode(&claims).unwrap();
    storage.set(TOKEN_KEY, &token).unwrap();

    assert!(session.auth().get_current_user().await.is_none());
    assert!(!session.initialize().await.is_authenticated);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let session = session_with(storage.clone());
    session.initialize().await;
    session
        .login(&LoginCredentials::new("sophie.martin@handijobs.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    let first = session.logout().await;
    let second = session.logout().await;

    assert_eq!(first, second);
    assert!(!second.is_authenticated);
    assert!(second.is_initialized);
    assert!(second.token.is_none());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_logout_keeps_preferences() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let prefs = PreferenceStore::new(storage.clone(), "handijobs.prefs.");
    prefs.set("highContrast", "true").unwrap();

    let session = session_with(storage);
    session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
        .await
        .unwrap();
    session.logout().await;

    assert!(prefs.flag("highContrast").unwrap());
}

#[tokio::test]
async fn test_concurrent_logins_are_serialized() {
    let credentials = InMemoryCredentialStore::with_demo_accounts()
        .unwrap()
        .with_latency(Duration::from_millis(20));
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let session = Arc::new(SessionStore::new(service(
        Arc::new(credentials),
        storage.clone(),
    )));

    let mut handles = vec![];
    for email in ["ahmed.benali@example.fr", "sophie.martin@handijobs.fr"] {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(async move {
            session
                .login(&LoginCredentials::new(email, DEMO_PASSWORD))
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // The committed session and the stored token come from the same login
    let state = session.state();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.token, storage.get(TOKEN_KEY).unwrap());
    let (user, _) = session
        .auth()
        .resolve_token(state.token.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(Some(user), state.user);
}

#[tokio::test]
async fn test_subscribers_see_committed_states() {
    let session = session();
    let mut rx = session.subscribe();

    session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert!(seen.is_authenticated);
    assert!(seen.user.is_some());
}

#[tokio::test]
async fn test_register_then_login() {
    let session = session();
    let data = RegisterData {
        email: "Lea.Petit@Example.fr".to_string(),
        password: "Abcdef12".to_string(),
        first_name: "Léa".to_string(),
        last_name: "Petit".to_string(),
        role: UserRole::Candidate,
        company_name: None,
    };

    let response = session.register(data).await.unwrap();
    assert_eq!(response.user.email, "lea.petit@example.fr");
    assert!(session.state().is_authenticated);

    session.logout().await;
    session
        .login(&LoginCredentials::new("lea.petit@example.fr", "Abcdef12"))
        .await
        .unwrap();
    assert_eq!(session.state().role(), Some(UserRole::Candidate));
}

#[tokio::test]
async fn test_register_duplicate_email_fails() {
    let session = session();
    let data = RegisterData {
        email: "ahmed.benali@example.fr".to_string(),
        password: "Abcdef12".to_string(),
        first_name: "Ahmed".to_string(),
        last_name: "Benali".to_string(),
        role: UserRole::Candidate,
        company_name: None,
    };

    let err = session.register(data).await.unwrap_err();
    assert!(matches!(err, Error::DuplicateAccount(_)));
    assert!(!session.state().is_authenticated);
    assert!(session.state().error.is_some());
}

#[tokio::test]
async fn test_update_user_requires_session() {
    let session = session();
    let err = session
        .update_user(ProfileUpdate {
            first_name: Some("Ahmed".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
}

#[tokio::test]
async fn test_update_user_commits_new_profile() {
    let session = session();
    session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    session
        .update_user(ProfileUpdate {
            last_name: Some("Benali-Martin".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let user = session.state().user.unwrap();
    assert_eq!(user.last_name, "Benali-Martin");
    assert_eq!(user.first_name, "Ahmed");
}

#[tokio::test]
async fn test_file_storage_restores_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(&path).unwrap());
        let session = session_with(storage);
        session
            .login(&LoginCredentials::new("marie.dubois@techcorp.fr", DEMO_PASSWORD))
            .await
            .unwrap();
    }

    let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(&path).unwrap());
    let session = session_with(storage);
    let state = session.initialize().await;

    assert!(state.is_authenticated);
    assert_eq!(state.role(), Some(UserRole::Company));
    assert!(state.company.is_some());
}

#[tokio::test]
async fn test_refresh_replaces_stored_token() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let session = session_with(storage.clone());

    let err = session.auth().refresh_token().await.unwrap_err();
    assert!(matches!(err, Error::NoTokenToRefresh));

    session
        .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
        .await
        .unwrap();

    let refreshed = session.auth().refresh_token().await.unwrap();
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), Some(refreshed.token));
    assert!(refreshed.expires_at > Utc::now());
}
