//! Role enum and the role-to-route table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Fallback landing path when a session carries no usable user record.
pub const DEFAULT_PATH: &str = "/";

/// User role. Exhaustive: every role maps to exactly one landing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    /// Default landing path for this role after login or redirect.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Teacher => "/teacher/dashboard",
            Role::Student => "/student/dashboard",
            Role::Parent => "/parent/dashboard",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Teacher => "Teacher",
            Role::Student => "Student",
            Role::Parent => "Parent",
        }
    }

    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Teacher, Role::Student, Role::Parent]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_a_landing_path() {
        for role in Role::all() {
            assert!(role.landing_path().starts_with('/'));
        }
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::all() {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, *role);
        }
    }

    #[test]
    fn test_role_serde_uses_lowercase() {
        let json = serde_json::to_string(&Role::Teacher).unwrap();
        assert_eq!(json, "\"teacher\"");
    }

    #[test]
    fn test_unknown_role_string_is_rejected() {
        assert!("principal".parse::<Role>().is_err());
    }
}
