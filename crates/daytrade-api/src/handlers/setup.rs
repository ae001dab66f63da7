use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::OptionalExtension;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use daytrade_db::{
    JournalPool,
    models::{NewSetup, Setup},
};
use daytrade_types::{MAX_AMOUNT, fits_amount_column, round_cents};

use crate::{
    AppState,
    dto::{ApiResponse, RegisterSetupRequest, SetupResponse},
    errors::{ApiError, DatabaseErrorExt},
    helpers::{ensure_profile, parse_money, run_in_transaction},
};

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/setup",
    tag = "Setup",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Cash boxes and derived totals", body = ApiResponse<SetupResponse>),
        (status = 404, description = "No setup registered"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_setup(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let setup = state
        .pool
        .interact_with_context(format!("find setup for {user_id}"), move |conn| {
            Setup::find_by_user(user_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("No setup registered for user {user_id}")))?;

    Ok(Json(ApiResponse::ok(SetupResponse::from(setup))))
}

#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/setup",
    tag = "Setup",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    request_body = RegisterSetupRequest,
    responses(
        (status = 201, description = "Setup registered", body = ApiResponse<SetupResponse>),
        (status = 400, description = "Invalid amounts"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Setup already registered"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn register_setup(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<RegisterSetupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let box1 = parse_money("box1", &payload.box1)?;
    let box2 = parse_money("box2", &payload.box2)?;
    if box1 < Decimal::ZERO || box2 < Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Box amounts cannot be negative".to_string(),
        ));
    }
    if !fits_amount_column(box1) || !fits_amount_column(box2) {
        return Err(ApiError::BadRequest(format!(
            "Box amounts cannot exceed {MAX_AMOUNT}"
        )));
    }
    if box1.is_zero() && box2.is_zero() {
        return Err(ApiError::BadRequest(
            "At least one box must hold a positive amount".to_string(),
        ));
    }

    let new_setup = NewSetup::opening(
        user_id,
        payload.market_mode,
        round_cents(box1),
        round_cents(box2),
    );

    let setup = run_in_transaction(&state, format!("register setup for {user_id}"), move |conn| {
        ensure_profile(user_id, conn)?;
        if Setup::find_by_user(user_id, conn).optional()?.is_some() {
            return Err(ApiError::Conflict(format!(
                "User {user_id} already has a setup; reset the journal to start over"
            ))
            .into());
        }
        Ok(Setup::create(&new_setup, conn)?)
    })
    .await?;

    info!(
        user_id = %user_id,
        market_mode = %setup.market_mode,
        box1 = %setup.box1_value,
        box2 = %setup.box2_value,
        "Setup registered"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SetupResponse::from(setup))),
    ))
}
