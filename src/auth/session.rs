use std::sync::RwLock;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::error::AppError;
use crate::model::role::Role;
use crate::models::Claims;

/// Supplies the bearer token attached to outgoing backend calls.
pub trait SessionProvider {
    fn bearer_token(&self) -> Option<String>;
}

/// Authenticated caller of a protected route.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn new(token: String, claims: Claims) -> Result<Self, AppError> {
        let role = Role::from_claim(&claims.role)
            .ok_or_else(|| AppError::Unauthorized("Invalid role".to_string()))?;

        Ok(Self {
            token,
            email: claims.sub,
            role,
        })
    }

    pub fn require_company(&self) -> Result<(), AppError> {
        if self.role == Role::Company {
            Ok(())
        } else {
            Err(AppError::Forbidden("Company only".to_string()))
        }
    }

    pub fn require_worker(&self) -> Result<(), AppError> {
        if self.role == Role::Worker {
            Ok(())
        } else {
            Err(AppError::Forbidden("Worker only".to_string()))
        }
    }
}

impl SessionProvider for Session {
    fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Reads the session the auth middleware stored on the request.
impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Session>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("Missing token".to_string())),
        )
    }
}

/// Long-lived session with explicit login and logout, for callers outside a
/// request (scripts, background jobs).
#[derive(Debug, Default)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn login(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.into());
        }
    }

    pub fn logout(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.bearer_token().is_some()
    }
}

impl SessionProvider for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }
}

impl<T: SessionProvider + ?Sized> SessionProvider for &T {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str) -> Claims {
        Claims {
            sub: "ana@empresa.es".to_string(),
            role: role.to_string(),
            exp: 0,
        }
    }

    #[test]
    fn role_guards() {
        let company = Session::new("t".into(), claims("ROLE_EMPRESA")).unwrap();
        assert!(company.require_company().is_ok());
        assert!(matches!(company.require_worker(), Err(AppError::Forbidden(_))));

        let worker = Session::new("t".into(), claims("ROLE_TRABAJADOR")).unwrap();
        assert!(worker.require_worker().is_ok());
        assert!(worker.require_company().is_err());

        assert!(Session::new("t".into(), claims("ROLE_OTRO")).is_err());
    }

    #[test]
    fn store_login_and_logout() {
        let store = SessionStore::default();
        assert_eq!(store.bearer_token(), None);

        store.login("abc");
        assert_eq!(store.bearer_token().as_deref(), Some("abc"));
        assert_eq!((&store).bearer_token().as_deref(), Some("abc"));

        store.logout();
        assert!(!store.is_active());
    }
}
