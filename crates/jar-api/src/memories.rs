use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use jar_db::SortOrder;
use jar_db::models::MemoryRow;
use jar_types::api::NewMemoryForm;
use jar_types::{MemoryEntry, TIMESTAMP_FORMAT};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::state::{AppState, with_db};
use crate::{flash, pages};

pub async fn index(
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, message) = flash::take(jar);
    (jar, Html(pages::index(&user.username, message.as_deref())))
}

pub async fn past(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let user_id = user.id;
    let Some(row) = with_db(&state, move |db| db.random_memory(&user_id)).await? else {
        return Ok(flash::redirect("/new", "You haven’t added any memories yet!"));
    };

    let (jar, message) = flash::take(jar);
    Ok((jar, Html(pages::past(&to_entry(row), message.as_deref()))).into_response())
}

pub async fn new_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, message) = flash::take(jar);
    (jar, Html(pages::new_memory(message.as_deref())))
}

pub async fn new_memory(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<NewMemoryForm>,
) -> Result<Response, AppError> {
    if form.memory.is_empty() {
        return Err(AppError::validation("Memory can't be empty!", "/new"));
    }

    let id = Uuid::new_v4().to_string();
    let mood = form.mood().map(str::to_string);
    let created_at = chrono::Utc::now().naive_utc();
    let user_id = user.id;
    with_db(&state, move |db| {
        db.insert_memory(&id, &user_id, &form.memory, mood.as_deref(), &created_at)
    })
    .await?;

    debug!("User {} added a memory", user.username);
    Ok(flash::redirect("/", "Memory added successfully!"))
}

pub async fn history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let entries = load_entries(&state, user.id, SortOrder::NewestFirst).await?;
    let (jar, message) = flash::take(jar);
    Ok((jar, Html(pages::history(&entries, message.as_deref()))))
}

pub(crate) async fn load_entries(
    state: &AppState,
    user_id: String,
    order: SortOrder,
) -> Result<Vec<MemoryEntry>, AppError> {
    let rows = with_db(state, move |db| db.list_memories(&user_id, order)).await?;
    Ok(rows.into_iter().map(to_entry).collect())
}

pub(crate) fn to_entry(row: MemoryRow) -> MemoryEntry {
    let created_at = NaiveDateTime::parse_from_str(&row.created_at, TIMESTAMP_FORMAT)
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on memory '{}': {}", row.created_at, row.id, e);
            NaiveDateTime::default()
        });

    MemoryEntry {
        memory: row.memory,
        mood: row.mood,
        created_at,
    }
}
