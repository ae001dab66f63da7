use rust_decimal::Decimal;
use serde::Serialize;

use daytrade_db::models::{Operation, Setup};
use daytrade_types::{CYCLE_DAYS, MAX_CYCLES, OperationType, SquareColor};

use crate::error::KpiError;
use crate::ladder::Ladder;

/// One square of the 30-day grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub day: u32,
    pub goal: Decimal,
    pub color: SquareColor,
    pub operation_type: OperationType,
    pub operation_value: Option<Decimal>,
}

/// Lay the cycle's operations over its goals. Days without an operation are
/// transparent and pending.
pub fn build_grid(goals: &[Decimal], operations: &[Operation]) -> Vec<GridCell> {
    (1..=CYCLE_DAYS as u32)
        .map(|day| {
            let goal = crate::ladder::goal_for_day(goals, day).unwrap_or_default();
            match operations.iter().find(|op| op.day_number == day as i32) {
                Some(op) => GridCell {
                    day,
                    goal,
                    color: op.color(),
                    operation_type: op.kind(),
                    operation_value: op.operation_value,
                },
                None => GridCell {
                    day,
                    goal,
                    color: SquareColor::Transparent,
                    operation_type: OperationType::Pending,
                    operation_value: None,
                },
            }
        })
        .collect()
}

pub fn is_cycle_complete(grid: &[GridCell]) -> bool {
    grid.len() == CYCLE_DAYS && grid.iter().all(|cell| cell.color.is_colored())
}

/// Starting amount for the next cycle: the first positive of the regenerated
/// day-30 value, the stored initial plus its goals, and the box-1 balance.
pub fn next_cycle_seed(
    initial_investment: Decimal,
    return_percentage: Decimal,
    goals: &[Decimal],
    box1: Decimal,
) -> Option<Decimal> {
    let regenerated = Ladder::generate(initial_investment, return_percentage)
        .ok()
        .map(|ladder| ladder.final_accumulated());
    let from_goals = initial_investment + goals.iter().copied().sum::<Decimal>();

    [regenerated, Some(from_goals), Some(box1)]
        .into_iter()
        .flatten()
        .find(|candidate| *candidate > Decimal::ZERO)
}

/// The next cycle's rows, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextCycle {
    pub cycle: i32,
    pub seed: Decimal,
    /// Completed-cycle history with the finished cycle's goals appended.
    pub history: Vec<Vec<Decimal>>,
    /// Active ladder of the new cycle, at the finished cycle's rate.
    pub ladder: Ladder,
}

/// What confirming the next cycle does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advancement {
    /// The last allowed cycle is done: wipe the journal and start over.
    Restart,
    Next(NextCycle),
}

/// Plan the move out of `current_cycle`, given its ladder, its operations
/// and the completed-cycle history so far.
pub fn plan_advance(
    current_cycle: i32,
    ladder: &Ladder,
    operations: &[Operation],
    history: Vec<Vec<Decimal>>,
    box1: Decimal,
) -> Result<Advancement, KpiError> {
    let goals = ladder.goals();
    let grid = build_grid(&goals, operations);
    if !is_cycle_complete(&grid) {
        let open = grid.iter().filter(|cell| !cell.color.is_colored()).count();
        return Err(KpiError::Conflict(format!(
            "Cycle {current_cycle} still has {open} open day(s); every day must be recorded first"
        )));
    }

    if current_cycle >= MAX_CYCLES {
        return Ok(Advancement::Restart);
    }

    let seed = next_cycle_seed(
        ladder.initial_investment,
        ladder.return_percentage,
        &goals,
        box1,
    )
    .ok_or_else(|| {
        KpiError::InvalidData("No positive amount available to seed the next cycle".to_string())
    })?;

    let mut history = history;
    history.push(goals);

    Ok(Advancement::Next(NextCycle {
        cycle: current_cycle + 1,
        seed,
        history,
        ladder: Ladder::generate(seed, ladder.return_percentage)?,
    }))
}

/// Goals may be (re)calculated while the boxes hold money and no day has
/// been recorded yet.
pub fn check_journal_start(setup: &Setup, recorded_operations: i64) -> Result<(), KpiError> {
    if setup.box1_value.is_zero() && setup.box2_value.is_zero() {
        return Err(KpiError::InvalidData(
            "Both cash boxes are empty; register amounts before calculating goals".to_string(),
        ));
    }
    if recorded_operations > 0 {
        return Err(KpiError::Conflict(
            "Goals are locked once operations are recorded; reset the journal to change them"
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;
    use crate::statistics::tests::operation;

    fn full_cycle(cycle: i32) -> Vec<Operation> {
        (1..=30)
            .map(|day| {
                let color = if day % 2 == 0 {
                    SquareColor::Green
                } else {
                    SquareColor::Red
                };
                let kind = if day % 2 == 0 {
                    OperationType::Profit
                } else {
                    OperationType::Loss
                };
                operation(cycle, day, kind, Some(dec!(1)), color)
            })
            .collect()
    }

    #[test]
    fn test_grid_defaults_to_transparent() {
        let ladder = Ladder::generate(dec!(1000), dec!(10)).unwrap();
        let ops = vec![operation(
            1,
            3,
            OperationType::Profit,
            Some(dec!(200)),
            SquareColor::Green,
        )];
        let grid = build_grid(&ladder.goals(), &ops);

        assert_eq!(grid.len(), 30);
        assert_eq!(grid[0].color, SquareColor::Transparent);
        assert_eq!(grid[0].goal, dec!(100));
        assert_eq!(grid[2].color, SquareColor::Green);
        assert_eq!(grid[2].operation_value, Some(dec!(200)));
        assert!(!is_cycle_complete(&grid));
    }

    #[test]
    fn test_next_cycle_only_after_all_days_colored() {
        let ladder = Ladder::generate(dec!(1000), dec!(1)).unwrap();
        let mut ops = full_cycle(1);
        ops.pop();

        let err = plan_advance(1, &ladder, &ops, Vec::new(), dec!(1000)).unwrap_err();
        assert!(matches!(err, KpiError::Conflict(msg) if msg.contains("1 open day")));
        assert!(is_cycle_complete(&build_grid(&ladder.goals(), &full_cycle(1))));
    }

    #[test]
    fn test_next_cycle_plan() {
        let ladder = Ladder::generate(dec!(1000), dec!(1.5)).unwrap();
        let earlier = vec![dec!(7); 30];

        let Advancement::Next(next) =
            plan_advance(2, &ladder, &full_cycle(2), vec![earlier.clone()], dec!(5)).unwrap()
        else {
            panic!("expected the next cycle");
        };

        assert_eq!(next.cycle, 3);
        assert_eq!(next.seed, ladder.final_accumulated());
        assert_eq!(next.history, vec![earlier, ladder.goals()]);
        assert_eq!(next.ladder.initial_investment, ladder.final_accumulated());
        assert_eq!(next.ladder.return_percentage, dec!(1.5));
        assert_eq!(next.ladder.rows[0].invested, ladder.final_accumulated());
    }

    #[test]
    fn test_stored_ladder_seeds_the_day_30_value() {
        // Rebuilt from stored goals the way a persisted cycle is loaded.
        let shown = Ladder::generate(dec!(1000), dec!(1.23495)).unwrap();
        let stored = Ladder::from_goals(
            shown.initial_investment,
            shown.return_percentage,
            &shown.goals(),
        );
        let Advancement::Next(next) =
            plan_advance(1, &stored, &full_cycle(1), Vec::new(), dec!(0)).unwrap()
        else {
            panic!("expected the next cycle");
        };
        assert_eq!(next.seed, shown.final_accumulated());
    }

    #[test]
    fn test_restart_after_last_cycle() {
        let ladder = Ladder::generate(dec!(1000), dec!(1)).unwrap();
        assert_eq!(
            plan_advance(MAX_CYCLES, &ladder, &full_cycle(MAX_CYCLES), Vec::new(), dec!(1000))
                .unwrap(),
            Advancement::Restart
        );
    }

    #[test]
    fn test_every_cycle_up_to_restart_is_reachable() {
        let mut ladder = Ladder::generate(dec!(1000), dec!(10)).unwrap();
        let mut history = Vec::new();
        for cycle in 1..MAX_CYCLES {
            match plan_advance(cycle, &ladder, &full_cycle(cycle), history, dec!(0)).unwrap() {
                Advancement::Next(next) => {
                    assert_eq!(next.cycle, cycle + 1);
                    history = next.history;
                    ladder = next.ladder;
                }
                Advancement::Restart => panic!("restart before cycle {MAX_CYCLES}"),
            }
        }
        assert_eq!(history.len(), (MAX_CYCLES - 1) as usize);
        assert_eq!(
            plan_advance(MAX_CYCLES, &ladder, &full_cycle(MAX_CYCLES), history, dec!(0)).unwrap(),
            Advancement::Restart
        );
    }

    #[test]
    fn test_journal_start_checks() {
        let setup = |box1, box2| Setup {
            id: 1,
            user_id: uuid::Uuid::nil(),
            market_mode: "spot".to_string(),
            box1_value: box1,
            box2_value: box2,
            box1_initial_fixed: box1,
            box2_initial_fixed: box2,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        assert!(check_journal_start(&setup(dec!(1000), dec!(0)), 0).is_ok());
        assert!(matches!(
            check_journal_start(&setup(dec!(0), dec!(0)), 0),
            Err(KpiError::InvalidData(_))
        ));
        assert!(matches!(
            check_journal_start(&setup(dec!(1000), dec!(500)), 1),
            Err(KpiError::Conflict(_))
        ));
    }

    #[test]
    fn test_seed_fallback_chain() {
        let goals = vec![dec!(5); 30];
        assert_eq!(
            next_cycle_seed(dec!(1000), dec!(10), &goals, dec!(1)),
            Some(Ladder::generate(dec!(1000), dec!(10)).unwrap().final_accumulated())
        );
        // An invalid rate cannot be regenerated, so the stored goals are used.
        assert_eq!(
            next_cycle_seed(dec!(100), dec!(0), &goals, dec!(1)),
            Some(dec!(250))
        );
        assert_eq!(
            next_cycle_seed(dec!(0), dec!(0), &[], dec!(42)),
            Some(dec!(42))
        );
        assert_eq!(next_cycle_seed(dec!(0), dec!(0), &[], dec!(-1)), None);
    }
}
