use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::AppError;
use crate::state::{AppState, with_db};

pub const SESSION_COOKIE: &str = "jar_session";

/// Where requests without a live session are sent.
pub const GUEST_LANDING: &str = "/faq";

/// The signed-in user, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    /// Session token the request arrived with, so logout can revoke it.
    pub token: String,
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn session_removal() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Resolve the session cookie to a user, or send the browser to the FAQ page.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) else {
        return Ok(Redirect::to(GUEST_LANDING).into_response());
    };

    let lookup = token.clone();
    let now = chrono::Utc::now();
    let user = with_db(&state, move |db| db.get_session_user(&lookup, now)).await?;

    match user {
        Some(user) => {
            req.extensions_mut().insert(CurrentUser {
                id: user.id,
                username: user.username,
                token,
            });
            Ok(next.run(req).await)
        }
        // Unknown or expired token; drop the stale cookie on the way out.
        None => Ok((jar.remove(session_removal()), Redirect::to(GUEST_LANDING)).into_response()),
    }
}
