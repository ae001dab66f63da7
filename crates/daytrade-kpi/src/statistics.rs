use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use daytrade_db::models::{NewStatistics, Operation};
use daytrade_types::{CYCLE_DAYS, OperationType};

/// Aggregates of one cycle, derived only from its operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStatistics {
    pub cycle_number: i32,
    pub total_operations: i32,
    pub successful_operations: i32,
    pub failed_operations: i32,
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub net_result: Decimal,
    pub cycle_completed: bool,
}

pub fn compute_cycle_statistics(cycle_number: i32, operations: &[Operation]) -> CycleStatistics {
    let mut stats = CycleStatistics {
        cycle_number,
        total_operations: 0,
        successful_operations: 0,
        failed_operations: 0,
        total_profit: Decimal::ZERO,
        total_loss: Decimal::ZERO,
        net_result: Decimal::ZERO,
        cycle_completed: false,
    };

    for op in operations.iter().filter(|op| op.cycle_number == cycle_number) {
        let value = op.operation_value.unwrap_or_default();
        match op.kind() {
            OperationType::Profit => {
                stats.total_operations += 1;
                stats.successful_operations += 1;
                stats.total_profit += value;
            }
            OperationType::Loss => {
                stats.total_operations += 1;
                stats.failed_operations += 1;
                stats.total_loss += value.abs();
            }
            OperationType::Pending => {}
        }
    }

    stats.net_result = stats.total_profit - stats.total_loss;
    stats.cycle_completed = stats.total_operations >= CYCLE_DAYS as i32;
    stats
}

impl CycleStatistics {
    /// Row to persist. A completed cycle keeps the completion date it was
    /// first given; otherwise `today` is used.
    pub fn into_row(
        self,
        user_id: Uuid,
        existing_completion: Option<NaiveDate>,
        today: NaiveDate,
    ) -> NewStatistics {
        let completion_date = self
            .cycle_completed
            .then(|| existing_completion.unwrap_or(today));

        NewStatistics {
            user_id,
            cycle_number: self.cycle_number,
            total_operations: self.total_operations,
            successful_operations: self.successful_operations,
            failed_operations: self.failed_operations,
            total_profit: self.total_profit,
            total_loss: self.total_loss,
            net_result: self.net_result,
            cycle_completed: self.cycle_completed,
            completion_date,
        }
    }
}
