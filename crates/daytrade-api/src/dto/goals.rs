use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use daytrade_kpi::{Ladder, LadderRow};

use super::decimal_string;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculateGoalsRequest {
    pub initial_investment: String,
    /// Daily return in percent, e.g. `"1.5"`.
    pub return_percentage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LadderRowDto {
    pub day: u32,
    pub invested: String,
    pub rate: String,
    pub goal: String,
    pub accumulated: String,
}

impl From<&LadderRow> for LadderRowDto {
    fn from(row: &LadderRow) -> Self {
        Self {
            day: row.day,
            invested: decimal_string(row.invested),
            rate: row.rate.normalize().to_string(),
            goal: decimal_string(row.goal),
            accumulated: decimal_string(row.accumulated),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LadderResponse {
    pub cycle_number: i32,
    pub is_active: bool,
    pub initial_investment: String,
    pub return_percentage: String,
    pub final_accumulated: String,
    pub rows: Vec<LadderRowDto>,
}

impl LadderResponse {
    pub fn new(cycle_number: i32, is_active: bool, ladder: &Ladder) -> Self {
        Self {
            cycle_number,
            is_active,
            initial_investment: decimal_string(ladder.initial_investment),
            return_percentage: ladder.return_percentage.normalize().to_string(),
            final_accumulated: decimal_string(ladder.final_accumulated()),
            rows: ladder.rows.iter().map(LadderRowDto::from).collect(),
        }
    }
}
