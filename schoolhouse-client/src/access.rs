//! Route access control.
//!
//! `authorize` is a pure function of the session and the route's rule; it
//! performs no I/O. The navigation collaborator executes the decision.

use schoolhouse_core::{Role, Session, DEFAULT_PATH, LOGIN_PATH};

/// Access rule attached to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRule {
    /// Requires authentication; an empty role set admits any signed-in user.
    Protected { roles: Vec<Role> },
    /// Only reachable while signed out (login, password reset).
    PublicOnly,
}

impl RouteRule {
    pub fn protected() -> Self {
        RouteRule::Protected { roles: Vec::new() }
    }

    pub fn restricted_to(roles: impl IntoIterator<Item = Role>) -> Self {
        RouteRule::Protected {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn public_only() -> Self {
        RouteRule::PublicOnly
    }
}

/// Access-control outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    RedirectTo(&'static str),
}

/// Where an authenticated session lands when turned away from a route.
fn landing_for(session: &Session) -> &'static str {
    match session.role() {
        Some(role) => role.landing_path(),
        None => DEFAULT_PATH,
    }
}

pub fn authorize(session: &Session, rule: &RouteRule) -> Decision {
    match rule {
        RouteRule::Protected { roles } => {
            if !session.authenticated {
                return Decision::RedirectTo(LOGIN_PATH);
            }
            if roles.is_empty() {
                return Decision::Render;
            }
            match session.role() {
                Some(role) if roles.contains(&role) => Decision::Render,
                _ => Decision::RedirectTo(landing_for(session)),
            }
        }
        RouteRule::PublicOnly => {
            if session.authenticated {
                Decision::RedirectTo(landing_for(session))
            } else {
                Decision::Render
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use schoolhouse_core::{new_entity_id, SessionUser};

    fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Admin),
            Just(Role::Teacher),
            Just(Role::Student),
            Just(Role::Parent),
        ]
    }

    fn arb_role_set() -> impl Strategy<Value = Vec<Role>> {
        prop::collection::vec(arb_role(), 0..4)
    }

    fn session_with(role: Role) -> Session {
        Session::for_user(SessionUser {
            user_id: new_entity_id(),
            name: "P".to_string(),
            email: "p@example.edu".to_string(),
            role,
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: a protected route renders iff the session is
        /// authenticated and the role set is empty or contains the role.
        #[test]
        fn prop_protected_decision_table(role in arb_role(), roles in arb_role_set()) {
            let rule = RouteRule::Protected { roles: roles.clone() };
            let decision = authorize(&session_with(role), &rule);
            if roles.is_empty() || roles.contains(&role) {
                prop_assert_eq!(decision, Decision::Render);
            } else {
                prop_assert_eq!(decision, Decision::RedirectTo(role.landing_path()));
            }
        }

        /// Property: anonymous sessions never render a protected route.
        #[test]
        fn prop_anonymous_never_renders_protected(roles in arb_role_set()) {
            let rule = RouteRule::Protected { roles };
            let decision = authorize(&Session::anonymous(), &rule);
            prop_assert_eq!(decision, Decision::RedirectTo(LOGIN_PATH));
        }

        /// Property: authorize is deterministic.
        #[test]
        fn prop_authorize_is_deterministic(role in arb_role(), roles in arb_role_set()) {
            let rule = RouteRule::Protected { roles };
            let session = session_with(role);
            prop_assert_eq!(authorize(&session, &rule), authorize(&session, &rule));
        }

        /// Property: every redirect target is a known path.
        #[test]
        fn prop_redirects_land_on_known_paths(role in arb_role(), roles in arb_role_set()) {
            let rule = RouteRule::Protected { roles };
            if let Decision::RedirectTo(path) = authorize(&session_with(role), &rule) {
                let known = Role::all()
                    .iter()
                    .map(|r| r.landing_path())
                    .chain([LOGIN_PATH, DEFAULT_PATH])
                    .any(|p| p == path);
                prop_assert!(known);
            }
        }
    }
}
