use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DatabaseError;
use crate::schema::daytrade_current_cycle;

/// Per-user cycle pointer plus the goal arrays of every finished cycle.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = daytrade_current_cycle)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CurrentCycle {
    pub id: i32,
    pub user_id: Uuid,
    pub current_cycle: i32,
    pub completed_cycles_history: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = daytrade_current_cycle)]
pub struct NewCurrentCycle {
    pub user_id: Uuid,
    pub current_cycle: i32,
    pub completed_cycles_history: serde_json::Value,
}

impl NewCurrentCycle {
    pub fn new(
        user_id: Uuid,
        current_cycle: i32,
        history: &[Vec<Decimal>],
    ) -> Result<Self, DatabaseError> {
        Ok(Self {
            user_id,
            current_cycle,
            completed_cycles_history: serde_json::to_value(history)?,
        })
    }
}

impl CurrentCycle {
    pub fn history(&self) -> Result<Vec<Vec<Decimal>>, DatabaseError> {
        serde_json::from_value(self.completed_cycles_history.clone()).map_err(|e| {
            DatabaseError::corrupt_data(format!("cycle history of {}", self.user_id), e)
        })
    }

    pub fn find_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        daytrade_current_cycle::table
            .filter(daytrade_current_cycle::user_id.eq(user_id))
            .first(conn)
    }

    pub fn upsert(new_cycle: &NewCurrentCycle, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        use diesel::pg::upsert::excluded;

        diesel::insert_into(daytrade_current_cycle::table)
            .values(new_cycle)
            .on_conflict(daytrade_current_cycle::user_id)
            .do_update()
            .set((
                daytrade_current_cycle::current_cycle
                    .eq(excluded(daytrade_current_cycle::current_cycle)),
                daytrade_current_cycle::completed_cycles_history
                    .eq(excluded(daytrade_current_cycle::completed_cycles_history)),
                daytrade_current_cycle::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    pub fn delete_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(
            daytrade_current_cycle::table.filter(daytrade_current_cycle::user_id.eq(user_id)),
        )
        .execute(conn)
    }
}
