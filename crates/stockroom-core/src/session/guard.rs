//! Route guard: decides whether the current session may enter a route.

use super::store::Session;

/// Access requirement a route declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone, signed in or not (e.g. the sign-in screen itself).
    Public,
    /// Any signed-in account.
    SignedIn,
    /// Signed in with the admin role.
    AdminOnly,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToSignIn,
}

/// Evaluate a route's access requirement against the session.
///
/// Every denial redirects to sign-in; an insufficient role is treated the
/// same as no session at all, so the guard never discloses that a route
/// exists but is off-limits.
pub fn check_route(session: &Session, access: RouteAccess) -> GuardDecision {
    let allowed = match access {
        RouteAccess::Public => true,
        RouteAccess::SignedIn => session.is_signed_in(),
        RouteAccess::AdminOnly => session.is_admin(),
    };

    if allowed {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectToSignIn
    }
}
