use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use daytrade_types::MarketMode;

use crate::schema::daytrade_setup;

/// The user's two cash boxes: current balances and the fixed baseline they
/// were opened with.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = daytrade_setup)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Setup {
    pub id: i32,
    pub user_id: Uuid,
    pub market_mode: String,
    pub box1_value: Decimal,
    pub box2_value: Decimal,
    pub box1_initial_fixed: Decimal,
    pub box2_initial_fixed: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = daytrade_setup)]
pub struct NewSetup {
    pub user_id: Uuid,
    pub market_mode: String,
    pub box1_value: Decimal,
    pub box2_value: Decimal,
    pub box1_initial_fixed: Decimal,
    pub box2_initial_fixed: Decimal,
}

impl NewSetup {
    /// A fresh setup whose baseline equals the opening balances.
    pub fn opening(user_id: Uuid, market_mode: MarketMode, box1: Decimal, box2: Decimal) -> Self {
        Self {
            user_id,
            market_mode: market_mode.to_string(),
            box1_value: box1,
            box2_value: box2,
            box1_initial_fixed: box1,
            box2_initial_fixed: box2,
        }
    }
}

impl Setup {
    pub fn market_mode(&self) -> MarketMode {
        MarketMode::from_str(&self.market_mode).unwrap_or_default()
    }

    pub fn find_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        daytrade_setup::table
            .filter(daytrade_setup::user_id.eq(user_id))
            .first(conn)
    }

    pub fn create(new_setup: &NewSetup, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(daytrade_setup::table)
            .values(new_setup)
            .get_result(conn)
    }

    /// Overwrite the current balances; the fixed baseline is never touched.
    pub fn update_balances(
        user_id: Uuid,
        box1_value: Decimal,
        box2_value: Decimal,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(daytrade_setup::table.filter(daytrade_setup::user_id.eq(user_id)))
            .set((
                daytrade_setup::box1_value.eq(box1_value),
                daytrade_setup::box2_value.eq(box2_value),
                daytrade_setup::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    pub fn delete_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(daytrade_setup::table.filter(daytrade_setup::user_id.eq(user_id)))
            .execute(conn)
    }
}
