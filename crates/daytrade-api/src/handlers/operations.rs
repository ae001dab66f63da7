use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use daytrade_db::{
    JournalPool,
    models::{NewOperation, Operation, Setup},
};
use daytrade_kpi::{
    Balances, Decision, Outcome, build_grid, is_cycle_complete, ladder::goal_for_day,
    ladder::validate_day, prompt_for, settle_day,
};
use daytrade_types::OperationType;

use crate::{
    AppState,
    dto::{
        ApiResponse, OperationDto, PreviewOperationRequest, PreviewOperationResponse, PromptDto,
        RecordOperationRequest, RecordOperationResponse, StatisticsDto, decimal_string,
    },
    errors::ApiError,
    helpers::{
        CycleContext, TxError, load_cycle_context, parse_money, refresh_cycle_statistics,
        run_in_transaction,
    },
};

fn parse_outcome(operation_type: OperationType, amount: &str) -> Result<Outcome, ApiError> {
    let amount = parse_money("amount", amount)?;
    Ok(Outcome::new(operation_type, amount)?)
}

fn goal_of(context: &CycleContext, day: u32) -> Result<Decimal, TxError> {
    goal_for_day(&context.goals, day).ok_or_else(|| {
        TxError::Db(daytrade_db::DatabaseError::corrupt_data(
            format!("goal of day {day}"),
            "stored ladder is shorter than a cycle",
        ))
    })
}

const fn balances_of(setup: &Setup) -> Balances {
    Balances {
        box1: setup.box1_value,
        box2: setup.box2_value,
    }
}

#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/operations/preview",
    tag = "Operations",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    request_body = PreviewOperationRequest,
    responses(
        (status = 200, description = "Decision the outcome requires, if any", body = ApiResponse<PreviewOperationResponse>),
        (status = 400, description = "Invalid day or amount"),
        (status = 404, description = "Goals not calculated yet"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn preview_operation(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<PreviewOperationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let day = validate_day(payload.day)?;
    let outcome = parse_outcome(payload.operation_type, &payload.amount)?;

    let (goal, prompt) =
        run_in_transaction(&state, format!("preview day {day} for {user_id}"), move |conn| {
            let context = load_cycle_context(user_id, conn)?;
            let goal = goal_of(&context, day)?;
            Ok((goal, prompt_for(outcome, goal, balances_of(&context.setup))))
        })
        .await?;

    Ok(Json(ApiResponse::ok(PreviewOperationResponse {
        day: payload.day,
        goal: decimal_string(goal),
        prompt: prompt.into(),
    })))
}

/// Record a day's outcome, move the cash boxes and refresh the cycle's
/// statistics, all in one transaction.
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/operations",
    tag = "Operations",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    request_body = RecordOperationRequest,
    responses(
        (status = 200, description = "Operation recorded", body = ApiResponse<RecordOperationResponse>),
        (status = 400, description = "Invalid day or amount"),
        (status = 404, description = "Goals not calculated yet"),
        (status = 409, description = "Day already recorded in the current cycle"),
        (status = 422, description = "Excess routing or loss coverage answer missing; `data` holds the prompt", body = ApiResponse<PromptDto>),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn record_operation(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<RecordOperationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let day = validate_day(payload.day)?;
    let outcome = parse_outcome(payload.operation_type, &payload.amount)?;
    let decision = Decision {
        excess: payload.excess_routing,
        loss: payload.loss_coverage,
    };

    let (operation, settlement, statistics, cycle_complete) =
        run_in_transaction(&state, format!("record day {day} for {user_id}"), move |conn| {
            let context = load_cycle_context(user_id, conn)?;
            let cycle = context.cycle.current_cycle;
            let day_number = day as i32;

            let existing = Operation::find_by_day(user_id, cycle, day_number, conn)?;
            let goal = goal_of(&context, day)?;
            let settlement = settle_day(
                existing.as_ref(),
                day,
                outcome,
                goal,
                balances_of(&context.setup),
                decision,
            )?;

            let operation = Operation::upsert(
                &NewOperation {
                    user_id,
                    cycle_number: cycle,
                    day_number,
                    operation_type: settlement.operation_type.to_string(),
                    operation_value: Some(settlement.operation_value),
                    goal_value: settlement.goal_value,
                    square_color: settlement.square_color.to_string(),
                    is_goal_met: settlement.is_goal_met,
                    operation_date: Utc::now().date_naive(),
                },
                conn,
            )?;
            Setup::update_balances(
                user_id,
                settlement.balances.box1,
                settlement.balances.box2,
                conn,
            )?;
            let statistics = refresh_cycle_statistics(user_id, cycle, conn)?;

            let operations = Operation::find_by_cycle(user_id, cycle, conn)?;
            let cycle_complete = is_cycle_complete(&build_grid(&context.goals, &operations));

            Ok((operation, settlement, statistics, cycle_complete))
        })
        .await?;

    state.metrics.journal.record_operation(
        settlement.operation_type,
        settlement.square_color,
        settlement.coverage_fallback,
    );
    info!(
        user_id = %user_id,
        cycle = operation.cycle_number,
        day = operation.day_number,
        color = %settlement.square_color,
        box1 = %settlement.balances.box1,
        box2 = %settlement.balances.box2,
        coverage_fallback = settlement.coverage_fallback,
        "Operation recorded"
    );

    Ok(Json(ApiResponse::ok(RecordOperationResponse::new(
        operation,
        &settlement,
        StatisticsDto::from(statistics),
        cycle_complete,
    ))))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/cycles/{cycle}/operations",
    tag = "Operations",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        ("cycle" = i32, Path, description = "Cycle number, starting at 1")
    ),
    responses(
        (status = 200, description = "Operations of the cycle ordered by day", body = ApiResponse<Vec<OperationDto>>),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_cycle_operations(
    State(state): State<AppState>,
    Path((user_id, cycle)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let operations = state
        .pool
        .interact_with_context(
            format!("list operations of cycle {cycle} for {user_id}"),
            move |conn| Operation::find_by_cycle(user_id, cycle, conn),
        )
        .await?;

    let dtos: Vec<OperationDto> = operations.into_iter().map(OperationDto::from).collect();
    Ok(Json(ApiResponse::ok(dtos)))
}
