use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use daytrade_db::models::Statistics;

use super::decimal_string;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsDto {
    pub cycle_number: i32,
    pub total_operations: i32,
    pub successful_operations: i32,
    pub failed_operations: i32,
    pub total_profit: String,
    pub total_loss: String,
    pub net_result: String,
    pub cycle_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
}

impl From<Statistics> for StatisticsDto {
    fn from(stats: Statistics) -> Self {
        Self {
            cycle_number: stats.cycle_number,
            total_operations: stats.total_operations,
            successful_operations: stats.successful_operations,
            failed_operations: stats.failed_operations,
            total_profit: decimal_string(stats.total_profit),
            total_loss: decimal_string(stats.total_loss),
            net_result: decimal_string(stats.net_result),
            cycle_completed: stats.cycle_completed,
            completion_date: stats.completion_date,
        }
    }
}
