use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DatabaseError;
use crate::schema::daytrade_compound_goals;

/// One 30-day goal ladder. `goals_data` holds the daily goals as a JSON
/// array of decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = daytrade_compound_goals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompoundGoals {
    pub id: i32,
    pub user_id: Uuid,
    pub cycle_number: i32,
    pub initial_investment: Decimal,
    pub return_percentage: Decimal,
    pub goals_data: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = daytrade_compound_goals)]
pub struct NewCompoundGoals {
    pub user_id: Uuid,
    pub cycle_number: i32,
    pub initial_investment: Decimal,
    pub return_percentage: Decimal,
    pub goals_data: serde_json::Value,
    pub is_active: bool,
}

impl NewCompoundGoals {
    pub fn active(
        user_id: Uuid,
        cycle_number: i32,
        initial_investment: Decimal,
        return_percentage: Decimal,
        goals: &[Decimal],
    ) -> Result<Self, DatabaseError> {
        Ok(Self {
            user_id,
            cycle_number,
            initial_investment,
            return_percentage,
            goals_data: serde_json::to_value(goals)?,
            is_active: true,
        })
    }
}

impl CompoundGoals {
    /// Decode the stored daily goals.
    pub fn goals(&self) -> Result<Vec<Decimal>, DatabaseError> {
        serde_json::from_value(self.goals_data.clone())
            .map_err(|e| DatabaseError::corrupt_data(format!("goals of ladder {}", self.id), e))
    }

    pub fn find_active(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        daytrade_compound_goals::table
            .filter(daytrade_compound_goals::user_id.eq(user_id))
            .filter(daytrade_compound_goals::is_active.eq(true))
            .first(conn)
    }

    /// Most recent ladder generated for `cycle_number`, active or not.
    pub fn find_latest_for_cycle(
        user_id: Uuid,
        cycle_number: i32,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        daytrade_compound_goals::table
            .filter(daytrade_compound_goals::user_id.eq(user_id))
            .filter(daytrade_compound_goals::cycle_number.eq(cycle_number))
            .order(daytrade_compound_goals::id.desc())
            .first(conn)
    }

    /// Deactivate every ladder of the user, then insert `new_goals` as the
    /// active one. Callers run this inside their own transaction.
    pub fn activate_new(
        new_goals: &NewCompoundGoals,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(
            daytrade_compound_goals::table
                .filter(daytrade_compound_goals::user_id.eq(new_goals.user_id))
                .filter(daytrade_compound_goals::is_active.eq(true)),
        )
        .set((
            daytrade_compound_goals::is_active.eq(false),
            daytrade_compound_goals::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;

        diesel::insert_into(daytrade_compound_goals::table)
            .values(new_goals)
            .get_result(conn)
    }

    pub fn delete_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(
            daytrade_compound_goals::table.filter(daytrade_compound_goals::user_id.eq(user_id)),
        )
        .execute(conn)
    }
}
