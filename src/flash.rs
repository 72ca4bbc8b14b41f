//! One-shot flash messages carried in a short-lived cookie: set alongside a
//! redirect, shown on the next rendered page, then cleared.

use axum::{
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "pizzeria_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl Level {
    pub fn css(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: Level::Danger,
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json)
    }

    fn decode(raw: &str) -> Option<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(raw)
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Take the pending flash message, clearing its cookie on the response.
pub fn pop(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let raw = jar.get(FLASH_COOKIE).map(|c| c.value().to_string());
    match raw {
        Some(raw) => {
            let flash = Flash::decode(&raw);
            let removal = Cookie::build((FLASH_COOKIE, "")).path("/").build();
            (jar.remove(removal), flash)
        }
        None => (jar, None),
    }
}

/// 303 redirect carrying a flash message for the next page.
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    let mut res = Redirect::to(to).into_response();
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        flash.encode()
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        res.headers_mut().append(SET_COOKIE, value);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let flash = Flash::warning("Please log in to continue.");
        let decoded = Flash::decode(&flash.encode()).expect("decode should succeed");
        assert_eq!(decoded, flash);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Flash::decode("not base64!!").is_none());
        let bogus = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(b"not json");
        assert!(Flash::decode(&bogus).is_none());
    }

    #[test]
    fn redirect_sets_location_and_cookie() {
        let res = redirect_with_flash("/login", Flash::info("bye"));
        assert_eq!(res.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], "/login");
        let cookie = res.headers()[SET_COOKIE].to_str().expect("header is ascii");
        assert!(cookie.starts_with(FLASH_COOKIE));
        assert!(cookie.contains("HttpOnly"));
    }
}
