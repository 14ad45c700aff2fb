use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Session key the identity layer stores the signed-in user id under.
pub const USER_ID_KEY: &str = "user_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Profile role column: only `"admin"` grants moderation rights.
    pub fn from_profile(role: Option<&str>) -> Self {
        match role {
            Some("admin") => Role::Admin,
            _ => Role::Member,
        }
    }
}

/// Who is calling, resolved once per request and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

/// Proof that the caller is an admin. Only `AuthContext::require_admin`
/// hands these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminGrant {
    user_id: Uuid,
}

impl AdminGrant {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<AdminGrant, AppError> {
        if self.is_admin() {
            Ok(AdminGrant { user_id: self.user_id })
        } else {
            Err(AppError::PermissionDenied("admin".to_string()))
        }
    }
}

pub fn get_user_id(session: &Session) -> Option<Uuid> {
    session.get::<Uuid>(USER_ID_KEY).unwrap_or(None)
}

impl FromRequest for AuthContext {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state = state.ok_or_else(|| AppError::Session("Application state missing".to_string()))?;
            let user_id = get_user_id(&session).ok_or(AppError::Unauthorized)?;

            // A signed-in user without a profile row is treated as a plain member.
            let profile = state.profiles.find_profile(user_id).await?;
            let role = Role::from_profile(profile.as_ref().map(|p| p.role.as_str()));

            Ok(AuthContext { user_id, role })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_role_maps_to_admin() {
        assert_eq!(Role::from_profile(Some("admin")), Role::Admin);
        assert_eq!(Role::from_profile(Some("Admin")), Role::Member);
        assert_eq!(Role::from_profile(Some("user")), Role::Member);
        assert_eq!(Role::from_profile(None), Role::Member);
    }

    #[test]
    fn require_admin_grants_for_admins_only() {
        let admin = AuthContext { user_id: Uuid::new_v4(), role: Role::Admin };
        let grant = admin.require_admin().expect("admin grant");
        assert_eq!(grant.user_id(), admin.user_id);

        let member = AuthContext { user_id: Uuid::new_v4(), role: Role::Member };
        assert!(matches!(member.require_admin(), Err(AppError::PermissionDenied(_))));
    }
}
