use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use daytrade_db::{JournalPool, purge_user_journal};

use crate::{
    AppState,
    dto::{ApiResponse, ResetJournalResponse},
    errors::ApiError,
};

/// Wipe setup, goals, cycle pointer, operations and statistics. The profile
/// is kept.
#[utoipa::path(
    delete,
    path = "/v1/users/{user_id}/journal",
    tag = "Journal",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Rows removed per table", body = ApiResponse<ResetJournalResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn reset_journal(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let purged = state
        .pool
        .interact_with_context(format!("reset journal for {user_id}"), move |conn| {
            purge_user_journal(user_id, conn)
        })
        .await?;

    state.metrics.journal.record_reset();
    warn!(user_id = %user_id, ?purged, "Journal reset");

    Ok(Json(ApiResponse::ok(ResetJournalResponse::from(purged))))
}
