//! Route guard.
//!
//! A pure decision over the current [`SessionState`] and what a route
//! requires. Nothing renders while the session is still being restored, so the
//! app never flashes a redirect before storage has been read.

use crate::identity::Role;
use crate::session::SessionState;

/// Entry point for signing in.
pub const LOGIN_ROUTE: &str = "/login";
/// Landing route for signed-in users.
pub const EVENTS_ROUTE: &str = "/events";
/// Where unknown paths go.
pub const HOME_ROUTE: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    Public,
    Authenticated,
    AdminOrAbove,
    SuperAdminOnly,
}

impl RouteRequirement {
    /// Minimum role, or `None` when any signed-in user is enough.
    fn minimum_role(self) -> Option<Role> {
        match self {
            RouteRequirement::Public | RouteRequirement::Authenticated => None,
            RouteRequirement::AdminOrAbove => Some(Role::Admin),
            RouteRequirement::SuperAdminOnly => Some(Role::SuperAdmin),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show nothing yet.
    Suspend,
    Render,
    Redirect {
        to: &'static str,
        /// Location the user originally asked for.
        return_to: Option<String>,
    },
}

/// Decides what to do with a navigation to `location`.
pub fn decide(state: &SessionState, requirement: RouteRequirement, location: &str) -> GuardDecision {
    if state.is_restoring() {
        return GuardDecision::Suspend;
    }
    if requirement == RouteRequirement::Public {
        return GuardDecision::Render;
    }

    let Some(identity) = state.identity() else {
        return GuardDecision::Redirect {
            to: LOGIN_ROUTE,
            return_to: Some(location.to_string()),
        };
    };

    match requirement.minimum_role() {
        Some(minimum) if identity.role < minimum => GuardDecision::Redirect {
            to: EVENTS_ROUTE,
            return_to: None,
        },
        _ => GuardDecision::Render,
    }
}

/// Requirement of the application's routes, `None` for unknown paths.
pub fn requirement_for(path: &str) -> Option<RouteRequirement> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

    let requirement = match segments.as_slice() {
        [] => RouteRequirement::Public,
        ["login"] | ["signup"] => RouteRequirement::Public,
        ["events"] | ["my-registrations"] | ["notifications"] => RouteRequirement::Authenticated,
        ["events", _] => RouteRequirement::Authenticated,
        ["admin", "users"] | ["admin", "events", "registrations"] => {
            RouteRequirement::SuperAdminOnly
        }
        _ => return None,
    };
    Some(requirement)
}

/// Guards a navigation by path, sending unknown paths home.
pub fn navigate(state: &SessionState, path: &str) -> GuardDecision {
    match requirement_for(path) {
        Some(requirement) => decide(state, requirement, path),
        None if state.is_restoring() => GuardDecision::Suspend,
        None => GuardDecision::Redirect {
            to: HOME_ROUTE,
            return_to: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserIdentity;
    use crate::session::Session;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(Session {
            identity: UserIdentity {
                id: 3,
                username: None,
                email: "u@campus.edu".into(),
                full_name: String::new(),
                first_name: None,
                last_name: None,
                roll_number: None,
                branch: None,
                year_of_study: None,
                role,
                is_active: true,
            },
            token: "t".into(),
            expires_at: None,
        })
    }

    #[test]
    fn restoring_suspends_everything() {
        for requirement in [
            RouteRequirement::Public,
            RouteRequirement::Authenticated,
            RouteRequirement::SuperAdminOnly,
        ] {
            assert_eq!(
                decide(&SessionState::Restoring, requirement, "/events"),
                GuardDecision::Suspend
            );
        }
    }

    #[test]
    fn anonymous_goes_to_login_with_return_location() {
        assert_eq!(
            decide(&SessionState::Anonymous, RouteRequirement::Authenticated, "/events/4"),
            GuardDecision::Redirect {
                to: LOGIN_ROUTE,
                return_to: Some("/events/4".into()),
            }
        );
        assert_eq!(
            decide(&SessionState::Anonymous, RouteRequirement::Public, "/signup"),
            GuardDecision::Render
        );
    }

    #[test]
    fn insufficient_role_lands_on_events() {
        let expected = GuardDecision::Redirect {
            to: EVENTS_ROUTE,
            return_to: None,
        };
        assert_eq!(
            decide(&signed_in(Role::Student), RouteRequirement::SuperAdminOnly, "/admin/users"),
            expected
        );
        assert_eq!(
            decide(&signed_in(Role::Admin), RouteRequirement::SuperAdminOnly, "/admin/users"),
            expected
        );
        assert_eq!(
            decide(&signed_in(Role::Student), RouteRequirement::AdminOrAbove, "/x"),
            expected
        );
    }

    #[test]
    fn higher_roles_pass_lower_requirements() {
        let state = signed_in(Role::SuperAdmin);
        for requirement in [
            RouteRequirement::Authenticated,
            RouteRequirement::AdminOrAbove,
            RouteRequirement::SuperAdminOnly,
        ] {
            assert_eq!(decide(&state, requirement, "/"), GuardDecision::Render);
        }
    }

    #[test]
    fn route_table() {
        assert_eq!(requirement_for("/"), Some(RouteRequirement::Public));
        assert_eq!(requirement_for("/login"), Some(RouteRequirement::Public));
        assert_eq!(requirement_for("/events/12"), Some(RouteRequirement::Authenticated));
        assert_eq!(requirement_for("/events/"), Some(RouteRequirement::Authenticated));
        assert_eq!(
            requirement_for("/admin/events/registrations?event=2"),
            Some(RouteRequirement::SuperAdminOnly)
        );
        assert_eq!(requirement_for("/events/abc"), Some(RouteRequirement::Authenticated));
        assert_eq!(requirement_for("/events/4/media"), None);
        assert_eq!(requirement_for("/nowhere"), None);
    }

    #[test]
    fn unknown_paths_go_home() {
        assert_eq!(
            navigate(&signed_in(Role::Student), "/nowhere"),
            GuardDecision::Redirect {
                to: HOME_ROUTE,
                return_to: None,
            }
        );
        assert_eq!(navigate(&SessionState::Restoring, "/nowhere"), GuardDecision::Suspend);
        assert_eq!(navigate(&signed_in(Role::Student), "/events"), GuardDecision::Render);
    }
}
