use chrono::Utc;
use diesel::{Connection, OptionalExtension, PgConnection};
use rust_decimal::Decimal;
use uuid::Uuid;

use daytrade_db::{
    DatabaseError, JournalPool,
    models::{CompoundGoals, CurrentCycle, Operation, Profile, Setup, Statistics},
};
use daytrade_kpi::{KpiError, Ladder, compute_cycle_statistics};
use daytrade_types::parse_amount;

use crate::{AppState, errors::ApiError};

/// Failure raised inside a journal transaction. A rejection rolls the
/// transaction back and reaches the client unchanged.
#[derive(Debug)]
pub enum TxError {
    Db(DatabaseError),
    Rejected(ApiError),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Db(err.into())
    }
}

impl From<DatabaseError> for TxError {
    fn from(err: DatabaseError) -> Self {
        Self::Db(err)
    }
}

impl From<ApiError> for TxError {
    fn from(err: ApiError) -> Self {
        Self::Rejected(err)
    }
}

impl From<KpiError> for TxError {
    fn from(err: KpiError) -> Self {
        Self::Rejected(err.into())
    }
}

/// Run `f` in one database transaction on a pooled connection.
pub async fn run_in_transaction<F, T>(
    state: &AppState,
    operation: String,
    f: F,
) -> Result<T, ApiError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, TxError> + Send + 'static,
    T: Send + 'static,
{
    state
        .pool
        .interact_with_context(operation, move |conn| match conn.transaction(f) {
            Ok(value) => Ok(Ok(value)),
            Err(TxError::Rejected(err)) => Ok(Err(err)),
            Err(TxError::Db(err)) => Err(err),
        })
        .await?
}

/// Parse a user-entered amount, rejecting anything unreadable.
pub fn parse_money(field: &str, input: &str) -> Result<Decimal, ApiError> {
    parse_amount(input)
        .ok_or_else(|| ApiError::BadRequest(format!("{field} is not a valid amount: {input:?}")))
}

pub fn ensure_profile(user_id: Uuid, conn: &mut PgConnection) -> Result<Profile, TxError> {
    Profile::find_by_id(user_id, conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound(format!("User {user_id} not found")).into())
}

pub fn require_setup(user_id: Uuid, conn: &mut PgConnection) -> Result<Setup, TxError> {
    Setup::find_by_user(user_id, conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound(format!("No setup registered for user {user_id}")).into())
}

/// Everything the current cycle's rules read.
#[derive(Debug, Clone)]
pub struct CycleContext {
    pub cycle: CurrentCycle,
    pub goals_row: CompoundGoals,
    pub goals: Vec<Decimal>,
    pub setup: Setup,
}

impl CycleContext {
    pub fn ladder(&self) -> Ladder {
        Ladder::from_goals(
            self.goals_row.initial_investment,
            self.goals_row.return_percentage,
            &self.goals,
        )
    }
}

pub fn load_cycle_context(user_id: Uuid, conn: &mut PgConnection) -> Result<CycleContext, TxError> {
    let not_started =
        || ApiError::NotFound(format!("User {user_id} has no goals yet; calculate goals first"));

    let cycle = CurrentCycle::find_by_user(user_id, conn)
        .optional()?
        .ok_or_else(not_started)?;
    let goals_row = CompoundGoals::find_active(user_id, conn)
        .optional()?
        .ok_or_else(not_started)?;
    let goals = goals_row.goals()?;
    let setup = require_setup(user_id, conn)?;

    Ok(CycleContext {
        cycle,
        goals_row,
        goals,
        setup,
    })
}

/// Rebuild one cycle's statistics from its operations and store them.
pub fn refresh_cycle_statistics(
    user_id: Uuid,
    cycle_number: i32,
    conn: &mut PgConnection,
) -> Result<Statistics, TxError> {
    let operations = Operation::find_by_cycle(user_id, cycle_number, conn)?;
    let stats = compute_cycle_statistics(cycle_number, &operations);

    let existing = Statistics::find_by_user_and_cycle(user_id, cycle_number, conn)?;
    let row = stats.into_row(
        user_id,
        existing.and_then(|s| s.completion_date),
        Utc::now().date_naive(),
    );
    Ok(Statistics::upsert(&row, conn)?)
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_parse_money_accepts_both_notations() {
        assert_eq!(parse_money("box1", "R$ 1.234,56").unwrap(), dec!(1234.56));
        assert_eq!(parse_money("box1", "1234.56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn test_parse_money_rejects_garbage() {
        let err = parse_money("box2", "twelve").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("box2")));
    }

    #[test]
    fn test_kpi_rejection_becomes_client_error() {
        let err: TxError = KpiError::InvalidData("bad day".to_string()).into();
        assert!(matches!(err, TxError::Rejected(ApiError::BadRequest(_))));
    }
}
