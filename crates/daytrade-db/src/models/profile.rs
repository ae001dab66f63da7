use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use daytrade_types::ProfileRole;

use crate::schema::daytrade_profiles;

/// A registered journal owner.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = daytrade_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = daytrade_profiles)]
pub struct NewProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: String,
}

impl NewProfile {
    pub fn user(name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            roles: ProfileRole::User.to_string(),
        }
    }
}

impl Profile {
    /// Stored role; unknown values read as a plain user.
    pub fn role(&self) -> ProfileRole {
        ProfileRole::from_str(&self.roles).unwrap_or_default()
    }

    pub fn create(new_profile: &NewProfile, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(daytrade_profiles::table)
            .values(new_profile)
            .get_result(conn)
    }

    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        daytrade_profiles::table.find(id).first(conn)
    }

    pub fn update_name(
        id: Uuid,
        name: &str,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(daytrade_profiles::table.find(id))
            .set((
                daytrade_profiles::name.eq(name),
                daytrade_profiles::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }
}
