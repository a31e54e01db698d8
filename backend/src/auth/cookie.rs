//! The `authToken` session cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the cookie carrying the session token
pub const AUTH_COOKIE_NAME: &str = "authToken";

/// Attributes applied to issued session cookies
#[derive(Debug, Clone, Copy)]
pub struct CookieConfig {
    /// Set the `Secure` attribute (TLS deployments)
    pub secure: bool,
    /// Cookie lifetime, kept equal to the token lifetime
    pub max_age_seconds: i64,
}

impl CookieConfig {
    pub fn new(secure: bool, max_age_seconds: i64) -> Self {
        Self {
            secure,
            max_age_seconds,
        }
    }

    /// Cookie carrying a freshly issued token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((AUTH_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(time::Duration::seconds(self.max_age_seconds))
            .build()
    }
}

/// Cookie instructing the client to drop its session token
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookie.make_removal();
    cookie
}

/// Session token presented by the client, if any
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = CookieConfig::new(true, 86_400).session_cookie("abc".to_string());
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("authToken=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=86400"));
    }

    #[test]
    fn test_insecure_cookie_for_development() {
        let cookie = CookieConfig::new(false, 60).session_cookie("abc".to_string());
        assert!(!cookie.to_string().contains("Secure"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let rendered = removal_cookie().to_string();
        assert!(rendered.starts_with("authToken=;"));
        assert!(rendered.contains("Max-Age=0"));
    }

    #[test]
    fn test_session_token_from_request_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; authToken=jwt-value"),
        );
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(session_token(&jar).as_deref(), Some("jwt-value"));

        let empty = CookieJar::from_headers(&HeaderMap::new());
        assert_eq!(session_token(&empty), None);
    }
}
