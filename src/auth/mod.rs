//! Authentication and session management

pub mod guard;
pub mod models;
pub mod service;
pub mod session;
pub mod storage;
pub mod store;
pub mod token;

pub use guard::{guard, GuardDecision, RouteGuard, View};
pub use models::{
    Address, AuthResponse, AuthToken, Company, CompanySize, CompanyUpdate, LoginCredentials,
    ProfileUpdate, RegisterData, User, UserRecord, UserRole,
};
pub use service::AuthService;
pub use session::{SessionState, SessionStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, PreferenceStore};
pub use store::{CredentialStore, InMemoryCredentialStore, DEMO_PASSWORD};
pub use token::{codec_from_config, Claims, OpaqueTokenCodec, SignedTokenCodec, TokenCodec};
