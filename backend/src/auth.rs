//! The narrow identity and capability interface in front of the CRUD
//! operations. Session machinery lives outside this service; requests
//! arrive with an `x-user-id` header already established by the perimeter,
//! and this module resolves it against the users table and gates each
//! action on the actor's role.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::domain::error::{DomainError, DomainResult};
use crate::rest::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The CRUD actions of the schedule screen, including the extra clone
/// operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Update,
    Delete,
    Clone,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Clone => "clone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Full access to every action
    Admin,
    /// Read-only: may list, nothing else
    Viewer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }
}

/// The acting user, resolved from the request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Capability check keyed by (action, role). Checked before every
/// operation; denial blocks the request before any write.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn allows(&self, role: Role, action: Action) -> bool {
        match role {
            Role::Admin => true,
            Role::Viewer => matches!(action, Action::List),
        }
    }

    pub fn has_access_or_fail(&self, user: &AuthUser, action: Action) -> DomainResult<()> {
        if self.allows(user.role, action) {
            Ok(())
        } else {
            warn!(
                "User {} ({}) denied action '{}'",
                user.id,
                user.role.as_str(),
                action.as_str()
            );
            Err(DomainError::AccessDenied(action.as_str().to_string()))
        }
    }
}

/// Extractor that resolves the acting user or rejects the request with 401
pub struct Authenticated(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(DomainError::Unauthorized)?;

        let state = AppState::from_ref(state);
        let user = state.users.get_user(user_id).await?;

        user.map(Authenticated).ok_or(DomainError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_capability() {
        let policy = AccessPolicy;
        for action in [
            Action::List,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::Clone,
        ] {
            assert!(policy.allows(Role::Admin, action));
        }
    }

    #[test]
    fn viewer_may_only_list() {
        let policy = AccessPolicy;
        assert!(policy.allows(Role::Viewer, Action::List));
        assert!(!policy.allows(Role::Viewer, Action::Create));
        assert!(!policy.allows(Role::Viewer, Action::Update));
        assert!(!policy.allows(Role::Viewer, Action::Delete));
        assert!(!policy.allows(Role::Viewer, Action::Clone));
    }

    #[test]
    fn denial_carries_the_action_name() {
        let policy = AccessPolicy;
        let viewer = AuthUser {
            id: "user::viewer".to_string(),
            name: "Pemerhati".to_string(),
            role: Role::Viewer,
        };
        match policy.has_access_or_fail(&viewer, Action::Clone) {
            Err(DomainError::AccessDenied(action)) => assert_eq!(action, "clone"),
            other => panic!("expected access denied, got {:?}", other),
        }
    }

    #[test]
    fn role_parsing_round_trips() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("viewer"), Some(Role::Viewer));
        assert_eq!(Role::parse("root"), None);
    }
}
