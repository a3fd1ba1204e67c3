//! User identity and role model.

use serde::{Deserialize, Serialize};

use crate::token::TokenClaims;

/// Authorization level of a user, totally ordered.
///
/// A `SuperAdmin` satisfies every check an `Admin` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Role {
    #[default]
    Student,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Collapses the API's `is_admin` / `is_super_admin` flags into a role.
    pub fn from_flags(is_admin: bool, is_super_admin: bool) -> Self {
        if is_super_admin {
            Role::SuperAdmin
        } else if is_admin {
            Role::Admin
        } else {
            Role::Student
        }
    }

    pub fn is_admin(self) -> bool {
        self >= Role::Admin
    }

    pub fn is_super_admin(self) -> bool {
        self == Role::SuperAdmin
    }
}

/// Profile of the signed-in user, as kept in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredProfile", into = "StoredProfile")]
pub struct UserIdentity {
    pub id: i64,
    pub username: Option<String>,
    pub email: String,
    pub full_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roll_number: Option<String>,
    pub branch: Option<String>,
    pub year_of_study: Option<i32>,
    pub role: Role,
    pub is_active: bool,
}

impl UserIdentity {
    /// Builds the login-time identity from decoded token claims.
    ///
    /// The subject becomes the numeric id (`0` if it is not a number) and the
    /// email falls back to the name the user signed in with.
    pub fn from_claims(claims: &TokenClaims, login_name: &str) -> Self {
        let full_name = match (&claims.first_name, &claims.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => String::new(),
        };

        Self {
            id: claims.user_id().unwrap_or(0),
            username: claims.username.clone(),
            email: claims
                .email
                .clone()
                .unwrap_or_else(|| login_name.to_string()),
            full_name,
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
            roll_number: claims.roll_number.clone(),
            branch: claims.branch.clone(),
            year_of_study: claims.year,
            role: Role::from_flags(claims.is_admin, claims.is_super_admin),
            is_active: true,
        }
    }
}

/// Derived authorization flags. Never stored; recompute from current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizationView {
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub is_super_admin: bool,
}

impl AuthorizationView {
    pub(crate) fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(role) => Self {
                is_authenticated: true,
                is_admin: role.is_admin(),
                is_super_admin: role.is_super_admin(),
            },
            None => Self::default(),
        }
    }
}

/// JSON layout of the persisted `user` entry, flag based like the API's.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredProfile {
    id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default)]
    email: String,
    #[serde(default)]
    full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    roll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year_of_study: Option<i32>,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    is_super_admin: bool,
    #[serde(default = "active_by_default")]
    is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl From<StoredProfile> for UserIdentity {
    fn from(p: StoredProfile) -> Self {
        Self {
            id: p.id,
            username: p.username,
            email: p.email,
            full_name: p.full_name,
            first_name: p.first_name,
            last_name: p.last_name,
            roll_number: p.roll_number,
            branch: p.branch,
            year_of_study: p.year_of_study,
            role: Role::from_flags(p.is_admin, p.is_super_admin),
            is_active: p.is_active,
        }
    }
}

impl From<UserIdentity> for StoredProfile {
    fn from(u: UserIdentity) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            first_name: u.first_name,
            last_name: u.last_name,
            roll_number: u.roll_number,
            branch: u.branch,
            year_of_study: u.year_of_study,
            is_admin: u.role.is_admin(),
            is_super_admin: u.role.is_super_admin(),
            is_active: u.is_active,
        }
    }
}
