use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use rand::Rng;
use rand_core::OsRng;
use tracing::{info, warn};
use uuid::Uuid;

use jar_db::models::UserRow;
use jar_types::api::{LoginForm, RegisterForm};

use crate::error::AppError;
use crate::middleware::{CurrentUser, SESSION_COOKIE, session_cookie, session_removal};
use crate::state::{AppState, with_db};
use crate::{flash, pages};

const INVALID_CREDENTIALS: &str = "Invalid username and/or password";

pub async fn register_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, message) = flash::take(jar);
    (jar, Html(pages::register(message.as_deref())))
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();

    if username.is_empty() {
        return Err(AppError::validation("Username can't be blank", "/register"));
    }
    if form.password.is_empty() {
        return Err(AppError::validation("Password can't be blank", "/register"));
    }
    if form.password != form.confirmation {
        return Err(AppError::validation("Password didn't match", "/register"));
    }

    let password_hash = hash_password(&form.password)?;
    let user_id = Uuid::new_v4().to_string();

    let name = username.clone();
    let created =
        with_db(&state, move |db| db.create_user(&user_id, &name, &password_hash)).await?;
    if !created {
        return Err(AppError::auth("Username already exists", "/register"));
    }

    info!("Registered user {}", username);
    Ok(flash::redirect("/login", "Registration successful! Please log in."))
}

/// Showing the login form signs out whoever was signed in.
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let jar = end_session(&state, jar).await?;
    let (jar, message) = flash::take(jar);
    Ok((jar, Html(pages::login(message.as_deref()))))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let jar = end_session(&state, jar).await?;

    // A refused login still has to clear the old session cookie.
    let user = match authenticate(&state, form).await {
        Ok(user) => user,
        Err(e) => return Ok((jar, e).into_response()),
    };

    let token = new_session_token();
    let expires_at = chrono::Utc::now()
        .checked_add_signed(state.session_ttl)
        .ok_or_else(|| AppError::Internal("session expiry out of range".into()))?;
    let (session, user_id) = (token.clone(), user.id.clone());
    with_db(&state, move |db| db.create_session(&session, &user_id, expires_at)).await?;

    info!("User {} logged in", user.username);
    let jar = jar.add(session_cookie(token, state.secure_cookies));
    Ok((jar, Redirect::to("/")).into_response())
}

async fn authenticate(state: &AppState, form: LoginForm) -> Result<UserRow, AppError> {
    let username = form.username.trim().to_string();

    if username.is_empty() {
        return Err(AppError::validation("Username can't be blank", "/login"));
    }
    if form.password.is_empty() {
        return Err(AppError::validation("Password can't be blank", "/login"));
    }

    let name = username.clone();
    let Some(user) = with_db(state, move |db| db.get_user_by_username(&name)).await? else {
        warn!("Login failed for unknown user {}", username);
        return Err(AppError::auth(INVALID_CREDENTIALS, "/login"));
    };

    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|e| AppError::Internal(e.to_string()))?;
    if Argon2::default()
        .verify_password(form.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        warn!("Login failed for user {}: wrong password", username);
        return Err(AppError::auth(INVALID_CREDENTIALS, "/login"));
    }

    Ok(user)
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let token = user.token;
    with_db(&state, move |db| db.delete_session(&token)).await?;

    info!("User {} logged out", user.username);
    Ok((jar.remove(session_removal()), Redirect::to("/login")))
}

/// Revoke the session the browser presents, if any.
async fn end_session(state: &AppState, jar: CookieJar) -> Result<CookieJar, AppError> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) else {
        return Ok(jar);
    };
    with_db(state, move |db| db.delete_session(&token)).await?;
    Ok(jar.remove(session_removal()))
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// 256 random bits, URL-safe base64.
fn new_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    B64.encode(bytes)
}
