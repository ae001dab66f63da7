use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use daytrade_types::{OperationType, SquareColor};

use crate::schema::daytrade_operations;

/// The recorded outcome of one trading day.
///
/// `operation_value` is always stored as a positive amount; the sign lives in
/// `operation_type`.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = daytrade_operations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Operation {
    pub id: i32,
    pub user_id: Uuid,
    pub cycle_number: i32,
    pub day_number: i32,
    pub operation_type: String,
    pub operation_value: Option<Decimal>,
    pub goal_value: Decimal,
    pub square_color: String,
    pub is_goal_met: bool,
    pub operation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = daytrade_operations)]
pub struct NewOperation {
    pub user_id: Uuid,
    pub cycle_number: i32,
    pub day_number: i32,
    pub operation_type: String,
    pub operation_value: Option<Decimal>,
    pub goal_value: Decimal,
    pub square_color: String,
    pub is_goal_met: bool,
    pub operation_date: NaiveDate,
}

impl Operation {
    /// Unknown stored values read as pending so they never count as trades.
    pub fn kind(&self) -> OperationType {
        OperationType::from_str(&self.operation_type).unwrap_or(OperationType::Pending)
    }

    pub fn color(&self) -> SquareColor {
        SquareColor::from_str(&self.square_color).unwrap_or_default()
    }

    pub fn find_by_cycle(
        user_id: Uuid,
        cycle_number: i32,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        daytrade_operations::table
            .filter(daytrade_operations::user_id.eq(user_id))
            .filter(daytrade_operations::cycle_number.eq(cycle_number))
            .order(daytrade_operations::day_number.asc())
            .load(conn)
    }

    pub fn find_by_day(
        user_id: Uuid,
        cycle_number: i32,
        day_number: i32,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Option<Self>> {
        daytrade_operations::table
            .filter(daytrade_operations::user_id.eq(user_id))
            .filter(daytrade_operations::cycle_number.eq(cycle_number))
            .filter(daytrade_operations::day_number.eq(day_number))
            .first(conn)
            .optional()
    }

    /// Insert or replace the operation of a (user, cycle, day) slot.
    pub fn upsert(new_op: &NewOperation, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        use diesel::pg::upsert::excluded;

        diesel::insert_into(daytrade_operations::table)
            .values(new_op)
            .on_conflict((
                daytrade_operations::user_id,
                daytrade_operations::cycle_number,
                daytrade_operations::day_number,
            ))
            .do_update()
            .set((
                daytrade_operations::operation_type
                    .eq(excluded(daytrade_operations::operation_type)),
                daytrade_operations::operation_value
                    .eq(excluded(daytrade_operations::operation_value)),
                daytrade_operations::goal_value.eq(excluded(daytrade_operations::goal_value)),
                daytrade_operations::square_color.eq(excluded(daytrade_operations::square_color)),
                daytrade_operations::is_goal_met.eq(excluded(daytrade_operations::is_goal_met)),
                daytrade_operations::operation_date
                    .eq(excluded(daytrade_operations::operation_date)),
                daytrade_operations::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    /// Latest operations among `cycles`, newest first.
    pub fn find_recent(
        user_id: Uuid,
        cycles: &[i32],
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        daytrade_operations::table
            .filter(daytrade_operations::user_id.eq(user_id))
            .filter(daytrade_operations::cycle_number.eq_any(cycles))
            .order(daytrade_operations::created_at.desc())
            .limit(limit)
            .load(conn)
    }

    /// Every cycle number that has at least one operation, ascending.
    pub fn distinct_cycles(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Vec<i32>> {
        daytrade_operations::table
            .filter(daytrade_operations::user_id.eq(user_id))
            .select(daytrade_operations::cycle_number)
            .distinct()
            .order(daytrade_operations::cycle_number.asc())
            .load(conn)
    }

    /// Number of non-pending operations across all cycles.
    pub fn count_recorded(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<i64> {
        daytrade_operations::table
            .filter(daytrade_operations::user_id.eq(user_id))
            .filter(daytrade_operations::operation_type.ne(OperationType::Pending.as_ref()))
            .count()
            .get_result(conn)
    }

    pub fn delete_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(daytrade_operations::table.filter(daytrade_operations::user_id.eq(user_id)))
            .execute(conn)
    }
}
