//! Credential source
//!
//! [`CredentialStore`] is the identity backend seen by the auth service. The
//! in-memory implementation ships the demo accounts and can simulate network
//! latency; a real backend plugs in behind the same trait.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::auth::models::{Address, Company, CompanySize, User, UserRecord, UserRole};
use crate::error::{Error, Result};

/// Password shared by all demo accounts
pub const DEMO_PASSWORD: &str = "password123";

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a record by normalized (trimmed, lowercase) email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Insert a new record, failing with [`Error::DuplicateAccount`] if the
    /// email is taken
    async fn insert_user(&self, record: UserRecord) -> Result<()>;

    /// Set `last_login_at` and return the updated user
    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<User>;

    async fn update_user(&self, user: User) -> Result<()>;

    async fn find_company_by_user(&self, user_id: &str) -> Result<Option<Company>>;

    async fn insert_company(&self, company: Company) -> Result<()>;

    async fn update_company(&self, company: Company) -> Result<()>;
}

#[derive(Default)]
struct Records {
    users: HashMap<String, UserRecord>,
    companies: HashMap<String, Company>,
}

impl Records {
    fn id_for_email(&self, email: &str) -> Option<String> {
        self.users
            .values()
            .find(|record| record.user.email.eq_ignore_ascii_case(email))
            .map(|record| record.user.id.clone())
    }
}

/// In-memory credential store
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    records: Arc<RwLock<Records>>,
    latency: Duration,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the demo accounts
    pub fn with_demo_accounts() -> Result<Self> {
        // Lowest bcrypt cost keeps startup fast; these passwords are public anyway
        let hash = bcrypt::hash(DEMO_PASSWORD, 4)?;
        let mut records = Records::default();

        for (user, company) in demo_accounts() {
            if let Some(company) = company {
                records.companies.insert(company.user_id.clone(), company);
            }
            records.users.insert(
                user.id.clone(),
                UserRecord {
                    user,
                    password_hash: hash.clone(),
                },
            );
        }

        Ok(Self {
            records: Arc::new(RwLock::new(records)),
            latency: Duration::ZERO,
        })
    }

    /// Delay every call by `latency`, standing in for network round trips
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Number of user records
    pub async fn user_count(&self) -> usize {
        self.records.read().await.users.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.simulate_latency().await;
        let records = self.records.read().await;
        Ok(records
            .id_for_email(email)
            .and_then(|id| records.users.get(&id).cloned()))
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.simulate_latency().await;
        Ok(self.records.read().await.users.get(user_id).cloned())
    }

    async fn insert_user(&self, record: UserRecord) -> Result<()> {
        self.simulate_latency().await;
        let mut records = self.records.write().await;
        if records.id_for_email(&record.user.email).is_some() {
            return Err(Error::DuplicateAccount(record.user.email));
        }
        records.users.insert(record.user.id.clone(), record);
        Ok(())
    }

    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<User> {
        self.simulate_latency().await;
        let mut records = self.records.write().await;
        let record = records
            .users
            .get_mut(user_id)
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;
        record.user.last_login_at = Some(at);
        Ok(record.to_public())
    }

    async fn update_user(&self, user: User) -> Result<()> {
        self.simulate_latency().await;
        let mut records = self.records.write().await;
        let record = records
            .users
            .get_mut(&user.id)
            .ok_or_else(|| Error::UserNotFound(user.id.clone()))?;
        record.user = user;
        Ok(())
    }

    async fn find_company_by_user(&self, user_id: &str) -> Result<Option<Company>> {
        self.simulate_latency().await;
        Ok(self.records.read().await.companies.get(user_id).cloned())
    }

    async fn insert_company(&self, company: Company) -> Result<()> {
        self.simulate_latency().await;
        self.records
            .write()
            .await
            .companies
            .insert(company.user_id.clone(), company);
        Ok(())
    }

    async fn update_company(&self, company: Company) -> Result<()> {
        self.simulate_latency().await;
        let mut records = self.records.write().await;
        let existing = records
            .companies
            .get_mut(&company.user_id)
            .ok_or_else(|| Error::UserNotFound(company.user_id.clone()))?;
        *existing = company;
        Ok(())
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn demo_user(id: &str, email: &str, role: UserRole, first: &str, last: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        role,
        first_name: first.to_string(),
        last_name: last.to_string(),
        avatar: None,
        is_active: true,
        created_at: date(2024, 1, 15),
        last_login_at: None,
    }
}

/// Demo accounts with stable ids so stored tokens survive restarts
fn demo_accounts() -> Vec<(User, Option<Company>)> {
    let marie = demo_user(
        "1",
        "marie.dubois@techcorp.fr",
        UserRole::Company,
        "Marie",
        "Dubois",
    );
    let techcorp = Company {
        id: "1".to_string(),
        user_id: marie.id.clone(),
        name: "TechCorp Innovation".to_string(),
        industry: "Technologie".to_string(),
        size: CompanySize::Large,
        address: Address {
            street: "15 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            postal_code: "75008".to_string(),
            country: "France".to_string(),
        },
        oeth_compliant: true,
        oeth_rate: 8.5,
        values: vec![
            "Innovation".to_string(),
            "Inclusion".to_string(),
            "Bienveillance".to_string(),
        ],
        benefits: vec![
            "Télétravail".to_string(),
            "Mutuelle".to_string(),
            "Aménagement de poste".to_string(),
        ],
        description: Some("Éditeur de logiciels engagé pour l'emploi des personnes en situation de handicap.".to_string()),
        website: Some("https://techcorp.example.fr".to_string()),
        created_at: date(2024, 1, 15),
    };

    vec![
        (marie, Some(techcorp)),
        (
            demo_user(
                "2",
                "ahmed.benali@example.fr",
                UserRole::Candidate,
                "Ahmed",
                "Benali",
            ),
            None,
        ),
        (
            demo_user(
                "3",
                "sophie.martin@handijobs.fr",
                UserRole::Admin,
                "Sophie",
                "Martin",
            ),
            None,
        ),
        (
            demo_user(
                "4",
                "contact@apf-association.fr",
                UserRole::Association,
                "Claire",
                "Lefevre",
            ),
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_accounts_loaded() {
        let store = InMemoryCredentialStore::with_demo_accounts().unwrap();
        assert_eq!(store.user_count().await, 4);

        let marie = store
            .find_by_email("marie.dubois@techcorp.fr")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(marie.user.role, UserRole::Company);
        assert!(bcrypt::verify(DEMO_PASSWORD, &marie.password_hash).unwrap());

        let company = store.find_company_by_user("1").await.unwrap().unwrap();
        assert_eq!(company.name, "TechCorp Innovation");
        assert_eq!(company.oeth_rate, 8.5);
    }

    #[tokio::test]
    async fn test_email_lookup_ignores_case() {
        let store = InMemoryCredentialStore::with_demo_accounts().unwrap();
        let found = store.find_by_email("Ahmed.Benali@Example.fr").await.unwrap();
        assert_eq!(found.unwrap().user.id, "2");
    }

    #[tokio::test]
    async fn test_insert_duplicate_email() {
        let store = InMemoryCredentialStore::with_demo_accounts().unwrap();
        let record = UserRecord {
            user: demo_user(
                "99",
                "AHMED.BENALI@example.fr",
                UserRole::Candidate,
                "A",
                "B",
            ),
            password_hash: String::new(),
        };
        let result = store.insert_user(record).await;
        assert!(matches!(result, Err(Error::DuplicateAccount(_))));
        assert_eq!(store.user_count().await, 4);
    }

    #[tokio::test]
    async fn test_touch_last_login() {
        let store = InMemoryCredentialStore::with_demo_accounts().unwrap();
        let now = Utc::now();
        let user = store.touch_last_login("2", now).await.unwrap();
        assert_eq!(user.last_login_at, Some(now));

        let missing = store.touch_last_login("nope", now).await;
        assert!(matches!(missing, Err(Error::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let store = InMemoryCredentialStore::new().with_latency(Duration::from_millis(20));
        let start = std::time::Instant::now();
        store.find_by_id("1").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
