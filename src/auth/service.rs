//! Auth service: credential verification and token lifecycle

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::models::{
    AuthResponse, AuthToken, Company, CompanyUpdate, LoginCredentials, ProfileUpdate,
    RegisterData, User, UserRecord,
};
use crate::auth::storage::KeyValueStorage;
use crate::auth::store::CredentialStore;
use crate::auth::token::{codec_from_config, Claims, TokenCodec};
use crate::config::Config;
use crate::error::{Error, Result};

/// Verifies credentials and issues tokens. Cheap to clone.
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    storage: Arc<dyn KeyValueStorage>,
    codec: Arc<dyn TokenCodec>,
    token_key: String,
    token_ttl: chrono::Duration,
    password_cost: u32,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        storage: Arc<dyn KeyValueStorage>,
        codec: Arc<dyn TokenCodec>,
        token_key: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            storage,
            codec,
            token_key: token_key.into(),
            token_ttl: chrono::Duration::hours(24),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Build a service from configuration
    pub fn from_config(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self> {
        Ok(Self::new(
            credentials,
            storage,
            codec_from_config(&config.auth),
            config.storage.token_key(),
        )
        .with_token_ttl(config.token_ttl()?)
        .with_password_cost(config.auth.password_cost))
    }

    pub fn with_token_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// Storage key of the bearer token
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    pub fn codec(&self) -> &Arc<dyn TokenCodec> {
        &self.codec
    }

    /// Token currently held in durable storage
    pub fn stored_token(&self) -> Result<Option<String>> {
        self.storage.get(&self.token_key)
    }

    pub fn store_token(&self, token: &str) -> Result<()> {
        self.storage.set(&self.token_key, token)
    }

    pub fn clear_token(&self) -> Result<()> {
        self.storage.remove(&self.token_key)
    }

    fn issue_token(&self, user_id: &str) -> Result<AuthToken> {
        let claims = Claims::for_user(user_id, self.token_ttl);
        Ok(AuthToken {
            token: self.codec.encode(&claims)?,
            expires_at: claims.expires_at(),
        })
    }

    /// Verify email and password
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse> {
        let email = normalize_email(&credentials.email);
        let record = self
            .credentials
            .find_by_email(&email)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if !record.user.is_active || !bcrypt::verify(&credentials.password, &record.password_hash)? {
            debug!("Rejected login for user {}", record.user.id);
            return Err(Error::InvalidCredentials);
        }

        let user = self
            .credentials
            .touch_last_login(&record.user.id, Utc::now())
            .await?;
        let company = self.company_for(&user).await?;
        let token = self.issue_token(&user.id)?;

        info!("User {} logged in as {}", user.id, user.role);

        Ok(AuthResponse {
            user,
            company,
            token: token.token,
            expires_at: token.expires_at,
        })
    }

    /// Create an account, and a company profile for company accounts that
    /// supply a name
    pub async fn register(&self, data: RegisterData) -> Result<AuthResponse> {
        let email = normalize_email(&data.email);
        if self.credentials.find_by_email(&email).await?.is_some() {
            return Err(Error::DuplicateAccount(email));
        }

        let password_hash = bcrypt::hash(&data.password, self.password_cost)?;
        let user = User::new(
            email,
            data.role,
            data.first_name.trim().to_string(),
            data.last_name.trim().to_string(),
        );

        self.credentials
            .insert_user(UserRecord {
                user: user.clone(),
                password_hash,
            })
            .await?;

        let company_name = data
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let company = match company_name {
            Some(name) if user.role.owns_company() => {
                let company = Company::new(user.id.clone(), name.to_string());
                self.credentials.insert_company(company.clone()).await?;
                Some(company)
            }
            _ => None,
        };

        let token = self.issue_token(&user.id)?;

        info!("Registered user {} as {}", user.id, user.role);

        Ok(AuthResponse {
            user,
            company,
            token: token.token,
            expires_at: token.expires_at,
        })
    }

    /// Forget the stored token. Never fails.
    pub async fn logout(&self) {
        if let Err(e) = self.clear_token() {
            warn!("Failed to clear stored token: {}", e);
        }
    }

    /// User behind the stored token, or `None` when the token is absent,
    /// malformed, expired or unknown
    pub async fn get_current_user(&self) -> Option<User> {
        let token = match self.stored_token() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                return None;
            }
        };

        match self.resolve_token(&token).await {
            Ok((user, _)) => Some(user),
            Err(e) => {
                debug!("Stored token rejected: {}", e);
                None
            }
        }
    }

    /// Resolve an explicit token to its user and company
    pub async fn resolve_token(&self, token: &str) -> Result<(User, Option<Company>)> {
        let claims = self.codec.decode(token)?;
        let record = self
            .credentials
            .find_by_id(&claims.user_id)
            .await?
            .ok_or_else(|| Error::InvalidToken(format!("unknown user {}", claims.user_id)))?;

        if !record.user.is_active {
            return Err(Error::InvalidToken("account disabled".to_string()));
        }

        let user = record.to_public();
        let company = self.company_for(&user).await?;
        Ok((user, company))
    }

    /// Re-issue the stored token with a fresh expiry
    pub async fn refresh_token(&self) -> Result<AuthToken> {
        let current = self.stored_token()?.ok_or(Error::NoTokenToRefresh)?;
        let claims = self.codec.decode(&current)?;
        let token = self.issue_token(&claims.user_id)?;
        self.store_token(&token.token)?;
        debug!("Refreshed token for user {}", claims.user_id);
        Ok(token)
    }

    /// Apply a profile edit
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        let mut user = self
            .credentials
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?
            .to_public();

        update.apply(&mut user);
        self.credentials.update_user(user.clone()).await?;
        Ok(user)
    }

    /// Apply a company settings edit
    pub async fn update_company(&self, user_id: &str, update: CompanyUpdate) -> Result<Company> {
        let mut company = self
            .credentials
            .find_company_by_user(user_id)
            .await?
            .ok_or_else(|| Error::Other(format!("No company profile for user {}", user_id)))?;

        update.apply(&mut company);
        self.credentials.update_company(company.clone()).await?;
        Ok(company)
    }

    async fn company_for(&self, user: &User) -> Result<Option<Company>> {
        if !user.role.owns_company() {
            return Ok(None);
        }
        self.credentials.find_company_by_user(&user.id).await
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
