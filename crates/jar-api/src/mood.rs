use std::collections::BTreeMap;

use axum::{
    Extension, Json,
    extract::State,
    response::{Html, IntoResponse},
};
use axum_extra::extract::cookie::CookieJar;

use jar_db::SortOrder;
use jar_types::stats::{self, Period};

use crate::error::AppError;
use crate::memories::load_entries;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::{flash, pages};

/// What the mood page shows.
pub struct MoodSummary {
    pub counts: BTreeMap<String, u64>,
    pub happiest_month: Option<String>,
    pub happiest_year: Option<String>,
}

impl MoodSummary {
    pub fn has_memories(&self) -> bool {
        !self.counts.is_empty()
    }
}

/// GET /mood-data: mood label to number of memories, for the chart.
pub async fn mood_data(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<BTreeMap<String, u64>>, AppError> {
    let entries = load_entries(&state, user.id, SortOrder::OldestFirst).await?;
    Ok(Json(stats::mood_counts(&entries)))
}

pub async fn mood_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    // Oldest first, so a tie between periods goes to the earlier one.
    let entries = load_entries(&state, user.id, SortOrder::OldestFirst).await?;

    let summary = MoodSummary {
        counts: stats::mood_counts(&entries),
        happiest_month: stats::happiest(&entries, Period::Month),
        happiest_year: stats::happiest(&entries, Period::Year),
    };

    let (jar, message) = flash::take(jar);
    Ok((jar, Html(pages::mood(&summary, message.as_deref()))))
}
