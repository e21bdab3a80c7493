//! Session store
//!
//! Single source of truth for client authentication state. The state lives
//! in a watch channel: every action computes a full next state and commits
//! it in one step, so subscribers never see a partial write. Mutating actions
//! are serialized per store, so a second `login()` waits for the first.

use serde::Serialize;
use std::future::Future;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::auth::models::{
    AuthResponse, Company, CompanyUpdate, LoginCredentials, ProfileUpdate, RegisterData, User,
};
use crate::auth::service::AuthService;
use crate::error::{Error, Result};

/// Client authentication state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user: Option<User>,
    pub company: Option<Company>,
    pub token: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_authenticated: bool,
    /// Set once the first auth check has completed
    pub is_initialized: bool,
}

impl SessionState {
    /// Logged-out state after initialization
    pub fn anonymous() -> Self {
        Self {
            is_initialized: true,
            ..Self::default()
        }
    }

    fn authenticated(user: User, company: Option<Company>, token: String) -> Self {
        Self {
            user: Some(user),
            company,
            token: Some(token),
            is_loading: false,
            error: None,
            is_authenticated: true,
            is_initialized: true,
        }
    }

    pub fn role(&self) -> Option<crate::auth::UserRole> {
        self.user.as_ref().map(|user| user.role)
    }
}

/// Session context. Create one at startup and share it by reference or `Arc`.
pub struct SessionStore {
    auth: AuthService,
    state: watch::Sender<SessionState>,
    actions: Mutex<()>,
}

impl SessionStore {
    pub fn new(auth: AuthService) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            auth,
            state,
            actions: Mutex::new(()),
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receive every committed state
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn commit(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.state.send_modify(f);
    }

    /// Run the first auth check. No-op once initialized.
    pub async fn initialize(&self) -> SessionState {
        let _guard = self.actions.lock().await;
        if self.state.borrow().is_initialized {
            return self.state();
        }

        match self.auth.stored_token() {
            Ok(Some(_)) => {
                self.update(|s| s.is_loading = true);
                self.check_auth_locked().await;
            }
            Ok(None) => self.commit(SessionState::anonymous()),
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                self.commit(SessionState::anonymous());
            }
        }
        self.state()
    }

    /// Validate the current token and load its user. Never surfaces errors.
    pub async fn check_auth(&self) -> SessionState {
        let _guard = self.actions.lock().await;
        self.check_auth_locked().await;
        self.state()
    }

    async fn check_auth_locked(&self) {
        let held = self.state.borrow().token.clone();
        let token = match held {
            Some(token) => Some(token),
            None => self.auth.stored_token().unwrap_or_else(|e| {
                warn!("Failed to read stored token: {}", e);
                None
            }),
        };

        let Some(token) = token else {
            self.commit(SessionState::anonymous());
            return;
        };

        match self.auth.resolve_token(&token).await {
            Ok((user, company)) => {
                debug!("Session restored for user {}", user.id);
                self.commit(SessionState::authenticated(user, company, token));
            }
            Err(e) => {
                debug!("Discarding stored token: {}", e);
                if let Err(e) = self.auth.clear_token() {
                    warn!("Failed to clear stored token: {}", e);
                }
                self.commit(SessionState::anonymous());
            }
        }
    }

    /// Log in and persist the token. The error is also recorded in `error`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse> {
        let _guard = self.actions.lock().await;
        self.authenticate(self.auth.login(credentials)).await
    }

    /// Register and persist the token. The error is also recorded in `error`.
    pub async fn register(&self, data: RegisterData) -> Result<AuthResponse> {
        let _guard = self.actions.lock().await;
        self.authenticate(self.auth.register(data)).await
    }

    async fn authenticate<F>(&self, action: F) -> Result<AuthResponse>
    where
        F: Future<Output = Result<AuthResponse>>,
    {
        self.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let outcome = match action.await {
            Ok(response) => self.auth.store_token(&response.token).map(|_| response),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(response) => {
                self.commit(SessionState::authenticated(
                    response.user.clone(),
                    response.company.clone(),
                    response.token.clone(),
                ));
                Ok(response)
            }
            Err(e) => {
                let message = e.to_string();
                self.update(|s| {
                    s.error = Some(message);
                    s.is_loading = false;
                    s.is_authenticated = false;
                });
                Err(e)
            }
        }
    }

    /// Log out. Always ends anonymous, keeping `is_initialized`.
    pub async fn logout(&self) -> SessionState {
        let _guard = self.actions.lock().await;
        self.update(|s| s.is_loading = true);

        self.auth.logout().await;
        if let Err(e) = self.auth.clear_token() {
            warn!("Failed to clear stored token: {}", e);
        }

        let user_id = self.state.borrow().user.as_ref().map(|user| user.id.clone());
        if let Some(user_id) = user_id {
            info!("User {} logged out", user_id);
        }
        self.commit(SessionState::anonymous());
        self.state()
    }

    pub fn clear_error(&self) {
        self.update(|s| s.error = None);
    }

    /// Apply a profile edit to the signed-in user
    pub async fn update_user(&self, update: ProfileUpdate) -> Result<User> {
        let _guard = self.actions.lock().await;
        let user_id = self.current_user_id()?;
        let user = self.auth.update_profile(&user_id, update).await?;
        let committed = user.clone();
        self.update(|s| s.user = Some(committed));
        Ok(user)
    }

    /// Apply a settings edit to the signed-in user's company
    pub async fn update_company(&self, update: CompanyUpdate) -> Result<Company> {
        let _guard = self.actions.lock().await;
        let user_id = self.current_user_id()?;
        let company = self.auth.update_company(&user_id, update).await?;
        let committed = company.clone();
        self.update(|s| s.company = Some(committed));
        Ok(company)
    }

    fn current_user_id(&self) -> Result<String> {
        let state = self.state.borrow();
        match (&state.user, state.is_authenticated) {
            (Some(user), true) => Ok(user.id.clone()),
            _ => Err(Error::Unauthenticated),
        }
    }

    /// Drop all state, including `is_initialized`. For tests.
    pub async fn reset(&self) {
        let _guard = self.actions.lock().await;
        self.commit(SessionState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::UserRole;
    use crate::auth::storage::MemoryStorage;
    use crate::auth::store::{InMemoryCredentialStore, DEMO_PASSWORD};
    use crate::auth::token::SignedTokenCodec;
    use std::sync::Arc;

    fn store() -> SessionStore {
        let credentials = InMemoryCredentialStore::with_demo_accounts().unwrap();
        let auth = AuthService::new(
            Arc::new(credentials),
            Arc::new(MemoryStorage::new()),
            Arc::new(SignedTokenCodec::new(b"test-secret")),
            "handijobs.auth.token",
        )
        .with_password_cost(4);
        SessionStore::new(auth)
    }

    #[tokio::test]
    async fn test_initialize_without_token() {
        let session = store();
        assert!(!session.state().is_initialized);

        let state = session.initialize().await;
        assert_eq!(state, SessionState::anonymous());
    }

    #[tokio::test]
    async fn test_login_sets_authenticated_state() {
        let session = store();
        session.initialize().await;
        session
            .login(&LoginCredentials::new("ahmed.benali@example.fr", DEMO_PASSWORD))
            .await
            .unwrap();

        let state = session.state();
        assert!(state.is_authenticated);
        assert!(state.is_initialized);
        assert!(!state.is_loading);
        assert_eq!(state.role(), Some(UserRole::Candidate));
        assert_eq!(session.auth().stored_token().unwrap(), state.token);
    }

    #[tokio::test]
    async fn test_failed_login_records_error() {
        let session = store();
        let err = session
            .login(&LoginCredentials::new("ahmed.benali@example.fr", "bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));

        let state = session.state();
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.error, Some(err.to_string()));

        session.clear_error();
        assert_eq!(session.state().error, None);
    }

    #[tokio::test]
    async fn test_update_requires_authentication() {
        let session = store();
        let result = session.update_user(ProfileUpdate::default()).await;
        assert!(matches!(result, Err(Error::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_update_company_commits_to_state() {
        let session = store();
        session
            .login(&LoginCredentials::new("marie.dubois@techcorp.fr", DEMO_PASSWORD))
            .await
            .unwrap();
        session
            .update_company(CompanyUpdate {
                benefits: Some(vec!["Crèche".to_string()]),
                ..Default::default()
            })
            .await
            .unwrap();
        let company = session.state().company.unwrap();
        assert_eq!(company.benefits, vec!["Crèche".to_string()]);
    }

    #[tokio::test]
    async fn test_reset_clears_initialized() {
        let session = store();
        session.initialize().await;
        session.reset().await;
        assert_eq!(session.state(), SessionState::default());
    }
}
