//! Route guard
//!
//! Decides whether a protected view renders, waits, or redirects. A pure
//! function of the session flags and roles; it holds no state.

use serde::Serialize;
use std::fmt;

use crate::auth::models::UserRole;
use crate::auth::session::SessionState;

/// Views the guard can send a user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    /// Default authenticated landing view
    Dashboard,
    CompanyDashboard,
    CandidateDashboard,
    AdminDashboard,
    AssociationDashboard,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Dashboard => "/dashboard",
            View::CompanyDashboard => "/company/dashboard",
            View::CandidateDashboard => "/candidate/dashboard",
            View::AdminDashboard => "/admin/dashboard",
            View::AssociationDashboard => "/association/dashboard",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session not settled yet; show a placeholder and do not redirect
    Loading,
    Redirect(View),
    Render,
}

/// Guard a view. `required` is the role the view demands, if any.
///
/// An unsettled session (loading, or before the first auth check) always
/// yields [`GuardDecision::Loading`], whatever `is_authenticated` says.
pub fn guard(
    is_authenticated: bool,
    is_loading: bool,
    is_initialized: bool,
    role: Option<UserRole>,
    required: Option<UserRole>,
) -> GuardDecision {
    if is_loading || !is_initialized {
        return GuardDecision::Loading;
    }

    let role = match (is_authenticated, role) {
        (true, Some(role)) => role,
        _ => return GuardDecision::Redirect(View::Login),
    };

    match required {
        Some(required) if required != role => GuardDecision::Redirect(View::Dashboard),
        _ => GuardDecision::Render,
    }
}

/// Guard bound to a required role
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard {
    pub required: Option<UserRole>,
}

impl RouteGuard {
    /// Any authenticated user may pass
    pub fn authenticated() -> Self {
        Self { required: None }
    }

    pub fn role(required: UserRole) -> Self {
        Self {
            required: Some(required),
        }
    }

    pub fn check(&self, state: &SessionState) -> GuardDecision {
        guard(
            state.is_authenticated,
            state.is_loading,
            state.is_initialized,
            state.role(),
            self.required,
        )
    }
}
