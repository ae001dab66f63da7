use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use daytrade_db::{
    JournalPool,
    models::{CompoundGoals, CurrentCycle, NewCompoundGoals, NewCurrentCycle, Operation},
};
use daytrade_kpi::{Ladder, check_journal_start, journal_projection};

use crate::{
    AppState,
    dto::{ApiResponse, CalculateGoalsRequest, LadderResponse},
    errors::{ApiError, DatabaseErrorExt},
    helpers::{parse_money, require_setup, run_in_transaction},
};

fn ladder_response(row: &CompoundGoals) -> Result<LadderResponse, ApiError> {
    let goals = row.goals()?;
    let ladder = Ladder::from_goals(row.initial_investment, row.return_percentage, &goals);
    Ok(LadderResponse::new(row.cycle_number, row.is_active, &ladder))
}

/// Start the journal: cycle 1 with a fresh ladder.
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/goals",
    tag = "Goals",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    request_body = CalculateGoalsRequest,
    responses(
        (status = 200, description = "Active ladder for cycle 1", body = ApiResponse<LadderResponse>),
        (status = 400, description = "Invalid amount or percentage, growth past the storable range within six cycles, or both boxes empty"),
        (status = 404, description = "No setup registered"),
        (status = 409, description = "Operations already recorded"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn calculate_goals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CalculateGoalsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let initial = parse_money("initial_investment", &payload.initial_investment)?;
    let pct = parse_money("return_percentage", &payload.return_percentage)?;
    let ladder = Ladder::generate(initial, pct)?;
    journal_projection(ladder.initial_investment, ladder.return_percentage)?;

    let new_goals = NewCompoundGoals::active(
        user_id,
        1,
        ladder.initial_investment,
        ladder.return_percentage,
        &ladder.goals(),
    )?;
    let new_cycle = NewCurrentCycle::new(user_id, 1, &[])?;

    run_in_transaction(&state, format!("calculate goals for {user_id}"), move |conn| {
        let setup = require_setup(user_id, conn)?;
        check_journal_start(&setup, Operation::count_recorded(user_id, conn)?)?;

        CurrentCycle::upsert(&new_cycle, conn)?;
        Ok(CompoundGoals::activate_new(&new_goals, conn)?)
    })
    .await?;

    info!(
        user_id = %user_id,
        initial = %ladder.initial_investment,
        rate = %ladder.return_percentage,
        final_accumulated = %ladder.final_accumulated(),
        "Goals calculated"
    );
    Ok(Json(ApiResponse::ok(LadderResponse::new(1, true, &ladder))))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/goals",
    tag = "Goals",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Active ladder", body = ApiResponse<LadderResponse>),
        (status = 404, description = "No goals calculated"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_active_goals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .pool
        .interact_with_context(format!("find active goals for {user_id}"), move |conn| {
            CompoundGoals::find_active(user_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("User {user_id} has no active goals")))?;

    Ok(Json(ApiResponse::ok(ladder_response(&row)?)))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/goals/{cycle}",
    tag = "Goals",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        ("cycle" = i32, Path, description = "Cycle number, starting at 1")
    ),
    responses(
        (status = 200, description = "Latest ladder of the cycle", body = ApiResponse<LadderResponse>),
        (status = 404, description = "No ladder for this cycle"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_cycle_goals(
    State(state): State<AppState>,
    Path((user_id, cycle)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .pool
        .interact_with_context(
            format!("find goals of cycle {cycle} for {user_id}"),
            move |conn| CompoundGoals::find_latest_for_cycle(user_id, cycle, conn),
        )
        .await
        .map_err(|e| e.or_not_found(format!("No goals for cycle {cycle}")))?;

    Ok(Json(ApiResponse::ok(ladder_response(&row)?)))
}
