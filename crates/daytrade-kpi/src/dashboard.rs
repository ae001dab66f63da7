use rust_decimal::{Decimal, dec};
use serde::Serialize;

use daytrade_db::models::{Operation, Setup, Statistics};
use daytrade_types::OperationType;

/// How many trailing cycles feed the recent-operations list.
pub const RECENT_CYCLES: i32 = 3;
pub const RECENT_OPERATIONS: usize = 10;
/// Operations considered by the trend block.
pub const TREND_WINDOW: usize = 12;

/// `part / whole * 100`, or zero when `whole` is not positive.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * dec!(100)
    } else {
        Decimal::ZERO
    }
}

/// Current box total compared with the committed baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoxTotals {
    pub committed_total: Decimal,
    pub current_total: Decimal,
    pub net_result: Decimal,
    pub net_pct: Decimal,
}

impl BoxTotals {
    pub fn from_setup(setup: &Setup) -> Self {
        let committed_total = setup.box1_initial_fixed + setup.box2_initial_fixed;
        let current_total = setup.box1_value + setup.box2_value;
        let net_result = current_total - committed_total;
        Self {
            committed_total,
            current_total,
            net_result,
            net_pct: percentage(net_result, committed_total),
        }
    }

    pub const fn empty() -> Self {
        Self {
            committed_total: Decimal::ZERO,
            current_total: Decimal::ZERO,
            net_result: Decimal::ZERO,
            net_pct: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleResult {
    pub cycle_number: i32,
    pub net_result: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub current_cycle: i32,
    pub total_cycles: usize,
    pub total_operations: i32,
    pub successful_operations: i32,
    pub failed_operations: i32,
    pub success_rate: Decimal,
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub net_result: Decimal,
    pub current_box1: Decimal,
    pub current_box2: Decimal,
    pub initial_investment: Decimal,
    pub box1_growth_pct: Decimal,
    pub avg_daily_return: Decimal,
    pub best_cycle: Option<CycleResult>,
    pub worst_cycle: Option<CycleResult>,
    pub session: BoxTotals,
}

pub fn summarize(current_cycle: i32, stats: &[Statistics], setup: Option<&Setup>) -> DashboardSummary {
    let total_operations: i32 = stats.iter().map(|s| s.total_operations).sum();
    let successful_operations: i32 = stats.iter().map(|s| s.successful_operations).sum();
    let failed_operations: i32 = stats.iter().map(|s| s.failed_operations).sum();
    let total_profit: Decimal = stats.iter().map(|s| s.total_profit).sum();
    let total_loss: Decimal = stats.iter().map(|s| s.total_loss).sum();
    let net_result = total_profit - total_loss.abs();

    let avg_daily_return = if total_operations > 0 {
        net_result / Decimal::from(total_operations)
    } else {
        Decimal::ZERO
    };

    let (current_box1, current_box2, initial_investment) = setup.map_or(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |s| (s.box1_value, s.box2_value, s.box1_initial_fixed),
    );

    DashboardSummary {
        current_cycle,
        total_cycles: stats.len(),
        total_operations,
        successful_operations,
        failed_operations,
        success_rate: percentage(
            Decimal::from(successful_operations),
            Decimal::from(total_operations),
        ),
        total_profit,
        total_loss,
        net_result,
        current_box1,
        current_box2,
        initial_investment,
        box1_growth_pct: percentage(current_box1 - initial_investment, initial_investment),
        avg_daily_return,
        best_cycle: extreme_cycle(stats, |candidate, best| candidate > best),
        worst_cycle: extreme_cycle(stats, |candidate, worst| candidate < worst),
        session: setup.map_or_else(BoxTotals::empty, BoxTotals::from_setup),
    }
}

// Strict comparison keeps the first row on ties.
fn extreme_cycle(
    stats: &[Statistics],
    beats: impl Fn(Decimal, Decimal) -> bool,
) -> Option<CycleResult> {
    stats
        .iter()
        .map(|s| CycleResult {
            cycle_number: s.cycle_number,
            net_result: s.net_result,
        })
        .reduce(|kept, candidate| {
            if beats(candidate.net_result, kept.net_result) {
                candidate
            } else {
                kept
            }
        })
}

/// Cycles whose operations feed the recent list, oldest first.
pub fn recent_cycles(current_cycle: i32) -> Vec<i32> {
    ((current_cycle - RECENT_CYCLES + 1).max(1)..=current_cycle.max(1)).collect()
}

/// Newest operations first, capped at [`RECENT_OPERATIONS`].
pub fn recent_operations(mut operations: Vec<Operation>) -> Vec<Operation> {
    operations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    operations.truncate(RECENT_OPERATIONS);
    operations
}

/// Short-term behaviour over the latest operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub window: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: Decimal,
    pub avg_profit: Decimal,
    pub avg_loss: Decimal,
    /// Consecutive results of the same kind ending at the newest operation:
    /// positive for wins, negative for losses.
    pub current_streak: i32,
    /// Running signed total, oldest to newest.
    pub cumulative: Vec<Decimal>,
}

/// `newest_first` must already be sorted newest first.
pub fn trend(newest_first: &[Operation]) -> Trend {
    let window: Vec<&Operation> = newest_first
        .iter()
        .filter(|op| op.kind() != OperationType::Pending)
        .take(TREND_WINDOW)
        .collect();

    let values_of = |kind: OperationType| -> Vec<Decimal> {
        window
            .iter()
            .filter(|op| op.kind() == kind)
            .map(|op| op.operation_value.unwrap_or_default().abs())
            .collect()
    };
    let profits = values_of(OperationType::Profit);
    let losses = values_of(OperationType::Loss);

    let mut current_streak = 0i32;
    for op in &window {
        match (op.kind(), current_streak.signum()) {
            (OperationType::Profit, 0 | 1) => current_streak += 1,
            (OperationType::Loss, 0 | -1) => current_streak -= 1,
            _ => break,
        }
    }

    let mut running = Decimal::ZERO;
    let cumulative = window
        .iter()
        .rev()
        .map(|op| {
            let value = op.operation_value.unwrap_or_default().abs();
            running += if op.kind() == OperationType::Loss {
                -value
            } else {
                value
            };
            running
        })
        .collect();

    Trend {
        window: window.len(),
        wins: profits.len(),
        losses: losses.len(),
        win_rate: percentage(
            Decimal::from(profits.len()),
            Decimal::from(window.len()),
        )
        .round(),
        avg_profit: average(&profits),
        avg_loss: average(&losses),
        current_streak,
        cumulative,
    }
}

fn average(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        Decimal::ZERO
    } else {
        values.iter().sum::<Decimal>() / Decimal::from(values.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::dec;
    use uuid::Uuid;

    use daytrade_types::SquareColor;

    use super::*;
    use crate::statistics::tests::operation;

    fn stats_row(cycle: i32, ops: i32, wins: i32, profit: Decimal, loss: Decimal) -> Statistics {
        Statistics {
            id: cycle,
            user_id: Uuid::nil(),
            cycle_number: cycle,
            total_operations: ops,
            successful_operations: wins,
            failed_operations: ops - wins,
            total_profit: profit,
            total_loss: loss,
            net_result: profit - loss,
            cycle_completed: ops >= 30,
            completion_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn setup(box1: Decimal, box2: Decimal, box1_fixed: Decimal, box2_fixed: Decimal) -> Setup {
        Setup {
            id: 1,
            user_id: Uuid::nil(),
            market_mode: "spot".to_string(),
            box1_value: box1,
            box2_value: box2,
            box1_initial_fixed: box1_fixed,
            box2_initial_fixed: box2_fixed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_totals_and_rates() {
        let stats = vec![
            stats_row(2, 10, 6, dec!(300), dec!(100)),
            stats_row(1, 30, 24, dec!(900), dec!(150)),
        ];
        let s = setup(dec!(1500), dec!(600), dec!(1000), dec!(500));
        let summary = summarize(2, &stats, Some(&s));

        assert_eq!(summary.total_cycles, 2);
        assert_eq!(summary.total_operations, 40);
        assert_eq!(summary.successful_operations, 30);
        assert_eq!(summary.failed_operations, 10);
        assert_eq!(summary.success_rate, dec!(75));
        assert_eq!(summary.net_result, dec!(950));
        assert_eq!(summary.avg_daily_return, dec!(23.75));
        assert_eq!(summary.initial_investment, dec!(1000));
        assert_eq!(summary.box1_growth_pct, dec!(50));
        assert_eq!(summary.session.committed_total, dec!(1500));
        assert_eq!(summary.session.current_total, dec!(2100));
        assert_eq!(summary.session.net_pct, dec!(40));
        assert_eq!(summary.best_cycle.unwrap().cycle_number, 1);
        assert_eq!(summary.worst_cycle.unwrap().cycle_number, 2);
    }

    #[test]
    fn test_first_cycle_wins_ties() {
        let stats = vec![
            stats_row(3, 5, 5, dec!(50), dec!(0)),
            stats_row(2, 5, 5, dec!(50), dec!(0)),
        ];
        let summary = summarize(3, &stats, None);
        assert_eq!(summary.best_cycle.unwrap().cycle_number, 3);
        assert_eq!(summary.worst_cycle.unwrap().cycle_number, 3);
    }

    #[test]
    fn test_empty_journal() {
        let summary = summarize(1, &[], None);
        assert_eq!(summary.success_rate, Decimal::ZERO);
        assert_eq!(summary.avg_daily_return, Decimal::ZERO);
        assert_eq!(summary.box1_growth_pct, Decimal::ZERO);
        assert!(summary.best_cycle.is_none());
        assert_eq!(summary.session, BoxTotals::empty());
    }

    #[test]
    fn test_recent_cycles_window() {
        assert_eq!(recent_cycles(1), vec![1]);
        assert_eq!(recent_cycles(2), vec![1, 2]);
        assert_eq!(recent_cycles(5), vec![3, 4, 5]);
    }

    #[test]
    fn test_recent_operations_newest_first() {
        let ops: Vec<_> = (1..=15)
            .map(|day| {
                operation(1, day, OperationType::Profit, Some(dec!(1)), SquareColor::Green)
            })
            .collect();
        let recent = recent_operations(ops);
        assert_eq!(recent.len(), RECENT_OPERATIONS);
        assert_eq!(recent[0].day_number, 15);
        assert_eq!(recent[9].day_number, 6);
    }

    #[test]
    fn test_trend_streak_and_cumulative() {
        // newest first: win, win, loss, win
        let ops = vec![
            operation(1, 4, OperationType::Profit, Some(dec!(10)), SquareColor::Green),
            operation(1, 3, OperationType::Profit, Some(dec!(20)), SquareColor::Green),
            operation(1, 2, OperationType::Loss, Some(dec!(6)), SquareColor::Red),
            operation(1, 1, OperationType::Profit, Some(dec!(30)), SquareColor::Green),
        ];
        let t = trend(&ops);
        assert_eq!(t.window, 4);
        assert_eq!(t.wins, 3);
        assert_eq!(t.losses, 1);
        assert_eq!(t.win_rate, dec!(75));
        assert_eq!(t.avg_profit, dec!(20));
        assert_eq!(t.avg_loss, dec!(6));
        assert_eq!(t.current_streak, 2);
        assert_eq!(t.cumulative, vec![dec!(30), dec!(24), dec!(44), dec!(54)]);
    }

    #[test]
    fn test_trend_losing_streak() {
        let ops = vec![
            operation(1, 2, OperationType::Loss, Some(dec!(1)), SquareColor::Red),
            operation(1, 1, OperationType::Profit, Some(dec!(1)), SquareColor::Green),
        ];
        assert_eq!(trend(&ops).current_streak, -1);
        assert_eq!(trend(&[]).current_streak, 0);
    }
}
