//! Authentication models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::auth::guard::View;
use crate::error::Error;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Employer account, owns a company profile
    Company,
    /// Job seeker
    Candidate,
    /// Platform administrator
    Admin,
    /// Partner association supporting candidates
    Association,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Company,
        UserRole::Candidate,
        UserRole::Admin,
        UserRole::Association,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Company => "company",
            UserRole::Candidate => "candidate",
            UserRole::Admin => "admin",
            UserRole::Association => "association",
        }
    }

    /// Dashboard a freshly authenticated user of this role lands on
    pub fn landing_view(&self) -> View {
        match self {
            UserRole::Company => View::CompanyDashboard,
            UserRole::Candidate => View::CandidateDashboard,
            UserRole::Admin => View::AdminDashboard,
            UserRole::Association => View::AssociationDashboard,
        }
    }

    /// Whether accounts of this role may own a company profile
    pub fn owns_company(&self) -> bool {
        matches!(self, UserRole::Company)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::Other(format!("Unknown role '{}'", s)))
    }
}

/// Public user information. Never carries a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new active user
    pub fn new(email: String, role: UserRole, first_name: String, last_name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            role,
            first_name,
            last_name,
            avatar: None,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin && self.is_active
    }
}

/// Credential-store row: a user and its password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

impl UserRecord {
    /// The user without the password hash
    pub fn to_public(&self) -> User {
        self.user.clone()
    }
}

/// Company size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    #[default]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    Large,
    #[serde(rename = "500+")]
    Enterprise,
}

impl CompanySize {
    pub const ALL: [CompanySize; 5] = [
        CompanySize::Micro,
        CompanySize::Small,
        CompanySize::Medium,
        CompanySize::Large,
        CompanySize::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Micro => "1-10",
            CompanySize::Small => "11-50",
            CompanySize::Medium => "51-200",
            CompanySize::Large => "201-500",
            CompanySize::Enterprise => "500+",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        CompanySize::ALL.into_iter().find(|size| size.as_str() == s)
    }

    /// Companies with 20 or more employees are bound by the OETH obligation
    pub fn subject_to_oeth(&self) -> bool {
        !matches!(self, CompanySize::Micro)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "France".to_string()
}

/// Company profile owned by a company-role user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub industry: String,
    pub size: CompanySize,
    pub address: Address,
    pub oeth_compliant: bool,
    pub oeth_rate: f64,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Create an empty profile linked to `user_id`, OETH rate at zero
    pub fn new(user_id: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            name,
            industry: String::new(),
            size: CompanySize::default(),
            address: Address {
                country: default_country(),
                ..Address::default()
            },
            oeth_compliant: false,
            oeth_rate: 0.0,
            values: Vec::new(),
            benefits: Vec::new(),
            description: None,
            website: None,
            created_at: Utc::now(),
        }
    }
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Successful login or registration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub company: Option<Company>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// A freshly issued bearer token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Profile edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, user: &mut User) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
    }
}

/// Company settings edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub size: Option<CompanySize>,
    pub address: Option<Address>,
    pub oeth_compliant: Option<bool>,
    pub oeth_rate: Option<f64>,
    pub values: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub description: Option<String>,
    pub website: Option<String>,
}

impl CompanyUpdate {
    pub fn apply(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(industry) = self.industry {
            company.industry = industry;
        }
        if let Some(size) = self.size {
            company.size = size;
        }
        if let Some(address) = self.address {
            company.address = address;
        }
        if let Some(compliant) = self.oeth_compliant {
            company.oeth_compliant = compliant;
        }
        if let Some(rate) = self.oeth_rate {
            company.oeth_rate = rate;
        }
        if let Some(values) = self.values {
            company.values = values;
        }
        if let Some(benefits) = self.benefits {
            company.benefits = benefits;
        }
        if let Some(description) = self.description {
            company.description = Some(description);
        }
        if let Some(website) = self.website {
            company.website = Some(website);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in UserRole::ALL {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("recruiter".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&UserRole::Association).unwrap();
        assert_eq!(json, "\"association\"");
    }

    #[test]
    fn test_user_serializes_without_password() {
        let user = User::new(
            "a@b.fr".to_string(),
            UserRole::Candidate,
            "Ahmed".to_string(),
            "Benali".to_string(),
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Ahmed");
    }

    #[test]
    fn test_company_size_strings() {
        assert_eq!(CompanySize::parse("500+"), Some(CompanySize::Enterprise));
        assert_eq!(CompanySize::parse("12"), None);
        let json = serde_json::to_string(&CompanySize::Medium).unwrap();
        assert_eq!(json, "\"51-200\"");
        assert!(!CompanySize::Micro.subject_to_oeth());
    }

    #[test]
    fn test_new_company_has_zero_oeth_rate() {
        let company = Company::new("42".to_string(), "Acme".to_string());
        assert_eq!(company.oeth_rate, 0.0);
        assert!(!company.oeth_compliant);
        assert_eq!(company.user_id, "42");
    }

    #[test]
    fn test_profile_update_keeps_unset_fields() {
        let mut user = User::new(
            "a@b.fr".to_string(),
            UserRole::Candidate,
            "Ahmed".to_string(),
            "Benali".to_string(),
        );
        ProfileUpdate {
            last_name: Some("Ben Ali".to_string()),
            ..Default::default()
        }
        .apply(&mut user);
        assert_eq!(user.first_name, "Ahmed");
        assert_eq!(user.last_name, "Ben Ali");
    }
}
