use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use daytrade_kpi::dashboard::{CycleResult, DashboardSummary, Trend};

use super::{BoxTotalsDto, OperationDto, decimal_string};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CycleResultDto {
    pub cycle_number: i32,
    pub net_result: String,
}

impl From<CycleResult> for CycleResultDto {
    fn from(result: CycleResult) -> Self {
        Self {
            cycle_number: result.cycle_number,
            net_result: decimal_string(result.net_result),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendDto {
    pub window: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: String,
    pub avg_profit: String,
    pub avg_loss: String,
    pub current_streak: i32,
    pub cumulative: Vec<String>,
}

impl From<Trend> for TrendDto {
    fn from(trend: Trend) -> Self {
        Self {
            window: trend.window,
            wins: trend.wins,
            losses: trend.losses,
            win_rate: decimal_string(trend.win_rate),
            avg_profit: decimal_string(trend.avg_profit),
            avg_loss: decimal_string(trend.avg_loss),
            current_streak: trend.current_streak,
            cumulative: trend.cumulative.into_iter().map(decimal_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub current_cycle: i32,
    pub total_cycles: usize,
    pub total_operations: i32,
    pub successful_operations: i32,
    pub failed_operations: i32,
    pub success_rate: String,
    pub total_profit: String,
    pub total_loss: String,
    pub net_result: String,
    pub current_box1: String,
    pub current_box2: String,
    pub initial_investment: String,
    pub box1_growth_pct: String,
    pub avg_daily_return: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_cycle: Option<CycleResultDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_cycle: Option<CycleResultDto>,
    pub session: BoxTotalsDto,
    pub completed_cycles_history: Vec<Vec<String>>,
    pub current_operations: Vec<OperationDto>,
    pub recent_operations: Vec<OperationDto>,
    pub trend: TrendDto,
}

impl DashboardResponse {
    pub fn new(
        summary: DashboardSummary,
        completed_cycles_history: Vec<Vec<String>>,
        current_operations: Vec<OperationDto>,
        recent_operations: Vec<OperationDto>,
        trend: Trend,
    ) -> Self {
        Self {
            current_cycle: summary.current_cycle,
            total_cycles: summary.total_cycles,
            total_operations: summary.total_operations,
            successful_operations: summary.successful_operations,
            failed_operations: summary.failed_operations,
            success_rate: decimal_string(summary.success_rate),
            total_profit: decimal_string(summary.total_profit),
            total_loss: decimal_string(summary.total_loss),
            net_result: decimal_string(summary.net_result),
            current_box1: decimal_string(summary.current_box1),
            current_box2: decimal_string(summary.current_box2),
            initial_investment: decimal_string(summary.initial_investment),
            box1_growth_pct: decimal_string(summary.box1_growth_pct),
            avg_daily_return: decimal_string(summary.avg_daily_return),
            best_cycle: summary.best_cycle.map(Into::into),
            worst_cycle: summary.worst_cycle.map(Into::into),
            session: summary.session.into(),
            completed_cycles_history,
            current_operations,
            recent_operations,
            trend: trend.into(),
        }
    }
}
