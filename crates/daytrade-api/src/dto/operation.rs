use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use daytrade_db::models::Operation;
use daytrade_kpi::{Prompt, Settlement};
use daytrade_types::{ExcessRouting, LossCoverage, OperationType, SquareColor};

use super::{StatisticsDto, decimal_string};

/// A day's outcome before any prompt is answered.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreviewOperationRequest {
    pub day: i32,
    pub operation_type: OperationType,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordOperationRequest {
    pub day: i32,
    pub operation_type: OperationType,
    pub amount: String,
    /// Required when a profit exceeds the day's goal.
    #[serde(default)]
    pub excess_routing: Option<ExcessRouting>,
    /// Required for every loss.
    #[serde(default)]
    pub loss_coverage: Option<LossCoverage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptDto {
    None,
    ExcessRouting {
        excess: String,
    },
    LossCoverage {
        loss: String,
        box2_balance: String,
        box2_sufficient: bool,
    },
}

impl From<Prompt> for PromptDto {
    fn from(prompt: Prompt) -> Self {
        match prompt {
            Prompt::None => Self::None,
            Prompt::ExcessRouting { excess } => Self::ExcessRouting {
                excess: decimal_string(excess),
            },
            Prompt::LossCoverage {
                loss,
                box2_balance,
                box2_sufficient,
            } => Self::LossCoverage {
                loss: decimal_string(loss),
                box2_balance: decimal_string(box2_balance),
                box2_sufficient,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreviewOperationResponse {
    pub day: i32,
    pub goal: String,
    pub prompt: PromptDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperationDto {
    pub cycle_number: i32,
    pub day: i32,
    pub operation_type: OperationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_value: Option<String>,
    pub goal_value: String,
    pub square_color: SquareColor,
    pub is_goal_met: bool,
    pub operation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Operation> for OperationDto {
    fn from(op: Operation) -> Self {
        let operation_type = op.kind();
        let square_color = op.color();
        Self {
            cycle_number: op.cycle_number,
            day: op.day_number,
            operation_type,
            operation_value: op.operation_value.map(decimal_string),
            goal_value: decimal_string(op.goal_value),
            square_color,
            is_goal_met: op.is_goal_met,
            operation_date: op.operation_date,
            created_at: op.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordOperationResponse {
    pub operation: OperationDto,
    pub box1_value: String,
    pub box2_value: String,
    pub excess_to_box2: String,
    /// Box 2 was asked to cover a loss it could not afford; box 1 took it.
    pub coverage_fallback: bool,
    pub statistics: StatisticsDto,
    pub cycle_complete: bool,
}

impl RecordOperationResponse {
    pub fn new(
        operation: Operation,
        settlement: &Settlement,
        statistics: StatisticsDto,
        cycle_complete: bool,
    ) -> Self {
        Self {
            operation: operation.into(),
            box1_value: decimal_string(settlement.balances.box1),
            box2_value: decimal_string(settlement.balances.box2),
            excess_to_box2: decimal_string(settlement.excess_to_box2),
            coverage_fallback: settlement.coverage_fallback,
            statistics,
            cycle_complete,
        }
    }
}
