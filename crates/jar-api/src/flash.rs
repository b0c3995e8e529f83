//! One-shot messages shown on the next page a browser renders.
//!
//! The message rides in a cookie, base64 encoded so any text survives the
//! cookie value grammar. Rendering a page reads the cookie and clears it.

use axum::{
    http::header,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;

pub const FLASH_COOKIE: &str = "jar_flash";

pub fn cookie(message: &str) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, B64.encode(message)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Redirect to `to`, showing `message` there.
pub fn redirect(to: &str, message: &str) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, cookie(message).to_string())]),
        Redirect::to(to),
    )
        .into_response()
}

/// Pull the pending message out of the jar, scheduling the cookie for removal.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_owned()) else {
        return (jar, None);
    };
    let message = decode(&raw);
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), message)
}

fn decode(raw: &str) -> Option<String> {
    let bytes = B64.decode(raw).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_roundtrips_any_text() {
        let message = "You haven’t added any memories yet!; = \"quoted\"";
        let cookie = cookie(message);
        assert!(
            cookie
                .value()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(decode(cookie.value()).as_deref(), Some(message));
    }

    #[test]
    fn test_take_clears_cookie() {
        let jar = CookieJar::new().add(cookie("Memory added successfully!"));
        let (jar, message) = take(jar);
        assert_eq!(message.as_deref(), Some("Memory added successfully!"));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_take_ignores_garbage() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "%%%"));
        let (_, message) = take(jar);
        assert_eq!(message, None);
        assert_eq!(take(CookieJar::new()).1, None);
    }

    #[test]
    fn test_redirect_sets_cookie() {
        let response = redirect("/register", "Password didn't match");
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("jar_flash="));
    }
}
