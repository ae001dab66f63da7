use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use daytrade_db::{
    JournalPool,
    models::{Operation, Statistics},
};

use crate::{
    AppState,
    dto::{ApiResponse, StatisticsDto},
    errors::ApiError,
    helpers::{refresh_cycle_statistics, run_in_transaction},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatisticsQuery {
    /// Restrict the listing to one cycle.
    pub cycle: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/statistics",
    tag = "Statistics",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        StatisticsQuery
    ),
    responses(
        (status = 200, description = "Per-cycle statistics, newest cycle first", body = ApiResponse<Vec<StatisticsDto>>),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_statistics(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .pool
        .interact_with_context(format!("list statistics for {user_id}"), move |conn| {
            match query.cycle {
                Some(cycle) => Statistics::find_by_user_and_cycle(user_id, cycle, conn)
                    .map(|row| row.into_iter().collect()),
                None => Statistics::find_by_user(user_id, conn),
            }
        })
        .await?;

    let dtos: Vec<StatisticsDto> = rows.into_iter().map(StatisticsDto::from).collect();
    Ok(Json(ApiResponse::ok(dtos)))
}

/// Rebuild the statistics of every cycle that has operations.
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/statistics/recompute",
    tag = "Statistics",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Recomputed statistics, newest cycle first", body = ApiResponse<Vec<StatisticsDto>>),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn recompute_statistics(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rows = run_in_transaction(
        &state,
        format!("recompute statistics for {user_id}"),
        move |conn| {
            Operation::distinct_cycles(user_id, conn)?
                .into_iter()
                .map(|cycle| refresh_cycle_statistics(user_id, cycle, conn))
                .collect::<Result<Vec<_>, _>>()
        },
    )
    .await?;
    rows.sort_by(|a, b| b.cycle_number.cmp(&a.cycle_number));

    info!(user_id = %user_id, cycles = rows.len(), "Statistics recomputed");
    let dtos: Vec<StatisticsDto> = rows.into_iter().map(StatisticsDto::from).collect();
    Ok(Json(ApiResponse::ok(dtos)))
}
