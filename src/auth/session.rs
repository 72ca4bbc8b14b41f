//! Cookie-backed sessions. The session payload (user id, username, role) is
//! signed with the process-wide secret and carried in an HttpOnly cookie;
//! role is captured at login time and trusted until the token expires.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::repo::Role,
    config::SessionConfig,
    flash::{redirect_with_flash, Flash},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "pizzeria_session";

/// Authenticated visitor, as captured at login time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    role: Role,
    iat: usize,
    exp: usize,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        let SessionConfig {
            secret,
            ttl_minutes,
        } = state.config.session.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }
}

impl SessionKeys {
    pub fn sign(&self, session: &Session) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: session.user_id,
            username: session.username.clone(),
            role: session.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Session> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(Session {
            user_id: data.claims.sub,
            username: data.claims.username,
            role: data.claims.role,
        })
    }

    /// Session cookie for a freshly signed token.
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(self.ttl)
            .build()
    }
}

/// Removal cookie used on logout.
pub fn clear_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Rejection for missing, invalid, or under-privileged sessions: back to the
/// login page with a warning, with no detail about which check failed.
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        redirect_with_flash("/login", Flash::warning("Please log in to continue."))
    }
}

fn session_from_parts<S>(parts: &Parts, state: &S) -> Result<Session, AuthRedirect>
where
    SessionKeys: FromRef<S>,
{
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AuthRedirect)?;
    let keys = SessionKeys::from_ref(state);
    keys.verify(&token).map_err(|e| {
        warn!(error = %e, "invalid or expired session token");
        AuthRedirect
    })
}

/// Any authenticated visitor.
pub struct CurrentUser(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state).map(CurrentUser)
    }
}

/// Authenticated visitor whose session carries the admin role.
pub struct AdminUser(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state)?;
        if session.role != Role::Admin {
            warn!(user_id = %session.user_id, "non-admin session on admin route");
            return Err(AuthRedirect);
        }
        Ok(AdminUser(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, ttl_minutes: i64) -> SessionKeys {
        SessionKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    fn sample_session(role: Role) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            username: "mario".into(),
            role,
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret", 5);
        let session = sample_session(Role::Admin);
        let token = keys.sign(&session).expect("sign");
        let verified = keys.verify(&token).expect("verify");
        assert_eq!(verified, session);
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let keys = make_keys("dev-secret", 5);
        let token = keys.sign(&sample_session(Role::User)).expect("sign");
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(keys.verify(&tampered).is_err());
        assert!(keys.verify("garbage").is_err());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let keys = make_keys("secret-a", 5);
        let other = make_keys("secret-b", 5);
        let token = keys.sign(&sample_session(Role::User)).expect("sign");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        // jsonwebtoken applies 60s of leeway; go well past it.
        let keys = make_keys("dev-secret", -5);
        let token = keys.sign(&sample_session(Role::User)).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn session_cookie_is_scoped_and_http_only() {
        let keys = make_keys("dev-secret", 5);
        let cookie = keys.cookie("token".into());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
