use diesel::Connection;
use uuid::Uuid;

use crate::models::{CompoundGoals, CurrentCycle, Operation, Setup, Statistics};

/// Rows removed by [`purge_user_journal`], per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub operations: usize,
    pub statistics: usize,
    pub goals: usize,
    pub cycles: usize,
    pub setups: usize,
}

/// Delete every journal row of the user in one transaction. The profile stays.
pub fn purge_user_journal(
    user_id: Uuid,
    conn: &mut diesel::PgConnection,
) -> diesel::QueryResult<PurgeSummary> {
    conn.transaction(|conn| {
        Ok(PurgeSummary {
            operations: Operation::delete_by_user(user_id, conn)?,
            statistics: Statistics::delete_by_user(user_id, conn)?,
            goals: CompoundGoals::delete_by_user(user_id, conn)?,
            cycles: CurrentCycle::delete_by_user(user_id, conn)?,
            setups: Setup::delete_by_user(user_id, conn)?,
        })
    })
}
