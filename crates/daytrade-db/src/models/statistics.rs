use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::daytrade_statistics;

/// Aggregates of one cycle, always rebuilt from that cycle's operations.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = daytrade_statistics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Statistics {
    pub id: i32,
    pub user_id: Uuid,
    pub cycle_number: i32,
    pub total_operations: i32,
    pub successful_operations: i32,
    pub failed_operations: i32,
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub net_result: Decimal,
    pub cycle_completed: bool,
    pub completion_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = daytrade_statistics)]
pub struct NewStatistics {
    pub user_id: Uuid,
    pub cycle_number: i32,
    pub total_operations: i32,
    pub successful_operations: i32,
    pub failed_operations: i32,
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub net_result: Decimal,
    pub cycle_completed: bool,
    pub completion_date: Option<NaiveDate>,
}

impl Statistics {
    /// All cycles of the user, newest cycle first.
    pub fn find_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        daytrade_statistics::table
            .filter(daytrade_statistics::user_id.eq(user_id))
            .order(daytrade_statistics::cycle_number.desc())
            .load(conn)
    }

    pub fn find_by_user_and_cycle(
        user_id: Uuid,
        cycle_number: i32,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Option<Self>> {
        daytrade_statistics::table
            .filter(daytrade_statistics::user_id.eq(user_id))
            .filter(daytrade_statistics::cycle_number.eq(cycle_number))
            .first(conn)
            .optional()
    }

    pub fn upsert(new_stats: &NewStatistics, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        use diesel::pg::upsert::excluded;

        diesel::insert_into(daytrade_statistics::table)
            .values(new_stats)
            .on_conflict((daytrade_statistics::user_id, daytrade_statistics::cycle_number))
            .do_update()
            .set((
                daytrade_statistics::total_operations
                    .eq(excluded(daytrade_statistics::total_operations)),
                daytrade_statistics::successful_operations
                    .eq(excluded(daytrade_statistics::successful_operations)),
                daytrade_statistics::failed_operations
                    .eq(excluded(daytrade_statistics::failed_operations)),
                daytrade_statistics::total_profit.eq(excluded(daytrade_statistics::total_profit)),
                daytrade_statistics::total_loss.eq(excluded(daytrade_statistics::total_loss)),
                daytrade_statistics::net_result.eq(excluded(daytrade_statistics::net_result)),
                daytrade_statistics::cycle_completed
                    .eq(excluded(daytrade_statistics::cycle_completed)),
                daytrade_statistics::completion_date
                    .eq(excluded(daytrade_statistics::completion_date)),
                daytrade_statistics::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    pub fn delete_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(daytrade_statistics::table.filter(daytrade_statistics::user_id.eq(user_id)))
            .execute(conn)
    }
}
