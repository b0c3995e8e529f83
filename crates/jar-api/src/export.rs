use axum::{
    Extension,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use tracing::info;

use jar_db::SortOrder;
use jar_types::ExportFormat;
use jar_types::api::ExportQuery;

use crate::error::AppError;
use crate::memories::load_entries;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// GET /export?format=csv|json|txt: download every memory the user owns.
pub async fn export(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let format: ExportFormat = query.format_or_default().parse()?;

    let username = user.username;
    let entries = load_entries(&state, user.id, SortOrder::OldestFirst).await?;
    let body = format
        .render(&entries)
        .map_err(|e| AppError::Internal(format!("export failed: {}", e)))?;

    info!("Exported {} memories for {} as {}", entries.len(), username, format.extension());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", format.file_name()),
            ),
        ],
        body,
    ))
}
