//! Handi.jobs - session, access control and form validation
//!
//! This is the library interface for Handi.jobs: the auth service and
//! session store that gate protected views, the route guard, and the form
//! schemas shared by every submission.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod validation;

pub use app::App;
pub use auth::{AuthService, RouteGuard, SessionState, SessionStore, User, UserRole};
pub use config::Config;
pub use error::Error;
