use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use diesel::OptionalExtension;
use uuid::Uuid;

use daytrade_db::models::{CurrentCycle, Operation, Setup, Statistics};
use daytrade_kpi::dashboard::{self, TREND_WINDOW, recent_cycles, recent_operations};

use crate::{
    AppState,
    dto::{ApiResponse, DashboardResponse, OperationDto, decimal_string},
    errors::ApiError,
    helpers::run_in_transaction,
};

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/dashboard",
    tag = "Dashboard",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Aggregates across every cycle", body = ApiResponse<DashboardResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (cycle, setup, stats, current_ops, latest_ops) =
        run_in_transaction(&state, format!("load dashboard for {user_id}"), move |conn| {
            let cycle = CurrentCycle::find_by_user(user_id, conn).optional()?;
            let current = cycle.as_ref().map_or(1, |c| c.current_cycle);
            let setup = Setup::find_by_user(user_id, conn).optional()?;
            let stats = Statistics::find_by_user(user_id, conn)?;
            let current_ops = Operation::find_by_cycle(user_id, current, conn)?;
            let latest_ops = Operation::find_recent(
                user_id,
                &recent_cycles(current),
                TREND_WINDOW as i64,
                conn,
            )?;
            Ok((cycle, setup, stats, current_ops, latest_ops))
        })
        .await?;

    let current_cycle = cycle.as_ref().map_or(1, |c| c.current_cycle);
    let history = match &cycle {
        Some(c) => c.history()?,
        None => Vec::new(),
    };

    let summary = dashboard::summarize(current_cycle, &stats, setup.as_ref());
    let trend = dashboard::trend(&latest_ops);
    let recent = recent_operations(latest_ops);

    let response = DashboardResponse::new(
        summary,
        history
            .into_iter()
            .map(|goals| goals.into_iter().map(decimal_string).collect())
            .collect(),
        current_ops.into_iter().map(OperationDto::from).collect(),
        recent.into_iter().map(OperationDto::from).collect(),
        trend,
    );

    Ok(Json(ApiResponse::ok(response)))
}
