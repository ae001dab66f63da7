use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use daytrade_db::{
    models::{CompoundGoals, CurrentCycle, NewCompoundGoals, NewCurrentCycle, Operation},
    purge_user_journal,
};
use daytrade_kpi::{Advancement, build_grid, is_cycle_complete, plan_advance};
use daytrade_metrics::CycleTransition;
use daytrade_types::MAX_CYCLES;

use crate::{
    AppState,
    dto::{
        AdvanceCycleResponse, ApiResponse, CycleStateResponse, GridCellDto, LadderResponse,
        decimal_string,
    },
    errors::ApiError,
    helpers::{load_cycle_context, refresh_cycle_statistics, run_in_transaction},
};

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/cycle",
    tag = "Cycle",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Ladder, 30-day grid and completion of the current cycle", body = ApiResponse<CycleStateResponse>),
        (status = 404, description = "Goals not calculated yet"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_cycle_state(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (context, operations) =
        run_in_transaction(&state, format!("load cycle state for {user_id}"), move |conn| {
            let context = load_cycle_context(user_id, conn)?;
            let operations =
                Operation::find_by_cycle(user_id, context.cycle.current_cycle, conn)?;
            Ok((context, operations))
        })
        .await?;

    let history = context.cycle.history()?;
    let grid = build_grid(&context.goals, &operations);
    let is_complete = is_cycle_complete(&grid);
    let current_cycle = context.cycle.current_cycle;

    let response = CycleStateResponse {
        current_cycle,
        completed_cycles_history: history
            .into_iter()
            .map(|goals| goals.into_iter().map(decimal_string).collect())
            .collect(),
        ladder: LadderResponse::new(current_cycle, true, &context.ladder()),
        colored_days: grid.iter().filter(|cell| cell.color.is_colored()).count(),
        grid: grid.iter().map(GridCellDto::from).collect(),
        is_complete,
        next_cycle_available: is_complete,
        restart_on_advance: current_cycle >= MAX_CYCLES,
    };

    Ok(Json(ApiResponse::ok(response)))
}

/// Confirm the next cycle once every day of the current one is colored.
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/cycle/advance",
    tag = "Cycle",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Next cycle started, or journal restarted after the last cycle", body = ApiResponse<AdvanceCycleResponse>),
        (status = 404, description = "Goals not calculated yet"),
        (status = 409, description = "Current cycle still has open days"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn advance_cycle(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let response = run_in_transaction(&state, format!("advance cycle for {user_id}"), move |conn| {
        let context = load_cycle_context(user_id, conn)?;
        let current_cycle = context.cycle.current_cycle;
        let operations = Operation::find_by_cycle(user_id, current_cycle, conn)?;

        let plan = plan_advance(
            current_cycle,
            &context.ladder(),
            &operations,
            context.cycle.history()?,
            context.setup.box1_value,
        )?;

        match plan {
            Advancement::Restart => {
                let purged = purge_user_journal(user_id, conn)?;
                info!(user_id = %user_id, ?purged, "Last cycle finished, journal restarted");
                Ok(AdvanceCycleResponse::Restart)
            }
            Advancement::Next(next) => {
                refresh_cycle_statistics(user_id, current_cycle, conn)?;
                CurrentCycle::upsert(
                    &NewCurrentCycle::new(user_id, next.cycle, &next.history)?,
                    conn,
                )?;
                CompoundGoals::activate_new(
                    &NewCompoundGoals::active(
                        user_id,
                        next.cycle,
                        next.ladder.initial_investment,
                        next.ladder.return_percentage,
                        &next.ladder.goals(),
                    )?,
                    conn,
                )?;

                info!(
                    user_id = %user_id,
                    cycle = next.cycle,
                    seed = %next.seed,
                    "Advanced to next cycle"
                );
                Ok(AdvanceCycleResponse::Next {
                    current_cycle: next.cycle,
                    ladder: LadderResponse::new(next.cycle, true, &next.ladder),
                })
            }
        }
    })
    .await?;

    let transition = match response {
        AdvanceCycleResponse::Next { .. } => CycleTransition::Next,
        AdvanceCycleResponse::Restart => CycleTransition::Restart,
    };
    state.metrics.journal.record_cycle_advanced(transition);

    Ok(Json(ApiResponse::ok(response)))
}
