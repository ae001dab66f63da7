use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use daytrade_db::purge::PurgeSummary;
use daytrade_kpi::GridCell;
use daytrade_types::{OperationType, SquareColor};

use super::{LadderResponse, decimal_string};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GridCellDto {
    pub day: u32,
    pub goal: String,
    pub color: SquareColor,
    pub operation_type: OperationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_value: Option<String>,
}

impl From<&GridCell> for GridCellDto {
    fn from(cell: &GridCell) -> Self {
        Self {
            day: cell.day,
            goal: decimal_string(cell.goal),
            color: cell.color,
            operation_type: cell.operation_type,
            operation_value: cell.operation_value.map(decimal_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CycleStateResponse {
    pub current_cycle: i32,
    /// Goal arrays of every finished cycle, oldest first.
    pub completed_cycles_history: Vec<Vec<String>>,
    pub ladder: LadderResponse,
    pub grid: Vec<GridCellDto>,
    pub colored_days: usize,
    pub is_complete: bool,
    pub next_cycle_available: bool,
    /// Confirming the next cycle will wipe the journal instead.
    pub restart_on_advance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvanceCycleResponse {
    Next {
        current_cycle: i32,
        ladder: LadderResponse,
    },
    Restart,
}

/// Rows deleted by a full journal reset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetJournalResponse {
    pub operations: usize,
    pub statistics: usize,
    pub goals: usize,
    pub cycles: usize,
    pub setups: usize,
}

impl From<PurgeSummary> for ResetJournalResponse {
    fn from(summary: PurgeSummary) -> Self {
        Self {
            operations: summary.operations,
            statistics: summary.statistics,
            goals: summary.goals,
            cycles: summary.cycles,
            setups: summary.setups,
        }
    }
}
