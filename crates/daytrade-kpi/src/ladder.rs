use rust_decimal::{Decimal, RoundingStrategy, dec};
use serde::Serialize;

use daytrade_types::{CYCLE_DAYS, MAX_AMOUNT, MAX_CYCLES, fits_amount_column, round_cents};

use crate::error::KpiError;

/// Decimal places kept for a daily return rate, matching its column.
pub const RATE_DP: u32 = 4;

/// Round a return rate to the precision it is stored with.
pub fn normalize_rate(return_percentage: Decimal) -> Decimal {
    return_percentage.round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Grow `base` by `pct` percent using integer-cents arithmetic.
///
/// The growth factor is rounded to four decimal places first, so a 1.23456%
/// rate grows by exactly 1.0123. Fails when the result no longer fits an
/// amount column.
pub fn compound_step(base: Decimal, pct: Decimal) -> Result<Decimal, KpiError> {
    let cents = round_whole(base.checked_mul(dec!(100)).ok_or_else(|| out_of_range(base))?);
    let factor = Decimal::ONE
        .checked_add(pct / dec!(100))
        .and_then(|f| f.checked_mul(dec!(10000)))
        .map(round_whole)
        .ok_or_else(|| out_of_range(base))?;
    let grown = cents.checked_mul(factor).ok_or_else(|| out_of_range(base))?;

    let next = round_whole(grown / dec!(10000)) / dec!(100);
    if !fits_amount_column(next) {
        return Err(out_of_range(next));
    }
    Ok(next)
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn out_of_range(value: Decimal) -> KpiError {
    KpiError::InvalidData(format!(
        "Amount {value} is outside the supported range of {MAX_AMOUNT}"
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderRow {
    pub day: u32,
    /// Accumulated value at the start of the day.
    pub invested: Decimal,
    pub rate: Decimal,
    pub goal: Decimal,
    pub accumulated: Decimal,
}

/// A 30-day compound goal ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ladder {
    pub initial_investment: Decimal,
    pub return_percentage: Decimal,
    pub rows: Vec<LadderRow>,
}

impl Ladder {
    /// Build the ladder. The rate is rounded to [`RATE_DP`] places first, so
    /// regenerating from the stored rate yields the same goals.
    pub fn generate(initial_investment: Decimal, return_percentage: Decimal) -> Result<Self, KpiError> {
        let return_percentage = normalize_rate(return_percentage);
        validate_inputs(initial_investment, return_percentage)?;

        let initial_investment = round_cents(initial_investment);
        let mut rows = Vec::with_capacity(CYCLE_DAYS);
        let mut invested = initial_investment;
        for day in 1..=CYCLE_DAYS as u32 {
            let accumulated = compound_step(invested, return_percentage)?;
            rows.push(LadderRow {
                day,
                invested,
                rate: return_percentage,
                goal: accumulated - invested,
                accumulated,
            });
            invested = accumulated;
        }

        Ok(Self {
            initial_investment,
            return_percentage,
            rows,
        })
    }

    /// Rebuild the table from a stored goal list; each row accumulates the
    /// stored goals on top of `initial_investment`.
    pub fn from_goals(
        initial_investment: Decimal,
        return_percentage: Decimal,
        goals: &[Decimal],
    ) -> Self {
        let mut invested = initial_investment;
        let rows = goals
            .iter()
            .zip(1u32..)
            .map(|(goal, day)| {
                let accumulated = invested + *goal;
                let row = LadderRow {
                    day,
                    invested,
                    rate: return_percentage,
                    goal: *goal,
                    accumulated,
                };
                invested = accumulated;
                row
            })
            .collect();

        Self {
            initial_investment,
            return_percentage,
            rows,
        }
    }

    pub fn goals(&self) -> Vec<Decimal> {
        self.rows.iter().map(|row| row.goal).collect()
    }

    /// Day-30 accumulated value, or the initial amount for an empty ladder.
    pub fn final_accumulated(&self) -> Decimal {
        self.rows
            .last()
            .map_or(self.initial_investment, |row| row.accumulated)
    }

    pub fn goal_for_day(&self, day: u32) -> Option<Decimal> {
        goal_for_day(&self.goals(), day)
    }
}

/// Goal of a 1-based day in a stored goal list.
pub fn goal_for_day(goals: &[Decimal], day: u32) -> Option<Decimal> {
    let index = usize::try_from(day).ok()?.checked_sub(1)?;
    goals.get(index).copied()
}

/// Day-30 value of the last allowed cycle when every cycle is seeded with
/// the previous one's day-30 value.
///
/// Fails when any day of that run leaves the amount column range, which
/// would otherwise strand the journal before its restart.
pub fn journal_projection(
    initial_investment: Decimal,
    return_percentage: Decimal,
) -> Result<Decimal, KpiError> {
    let mut seed = initial_investment;
    for _ in 1..=MAX_CYCLES {
        seed = Ladder::generate(seed, return_percentage)?.final_accumulated();
    }
    Ok(seed)
}

pub fn validate_inputs(initial_investment: Decimal, return_percentage: Decimal) -> Result<(), KpiError> {
    if initial_investment <= Decimal::ZERO {
        return Err(KpiError::InvalidData(
            "Initial investment must be greater than zero".to_string(),
        ));
    }
    if !fits_amount_column(initial_investment) {
        return Err(out_of_range(initial_investment));
    }
    if return_percentage <= Decimal::ZERO || return_percentage > dec!(100) {
        return Err(KpiError::InvalidData(
            "Return percentage must be greater than 0 and at most 100".to_string(),
        ));
    }
    Ok(())
}

/// Check a 1-based trading day and return it as an index-friendly value.
pub fn validate_day(day: i32) -> Result<u32, KpiError> {
    match u32::try_from(day) {
        Ok(d) if (1..=CYCLE_DAYS as u32).contains(&d) => Ok(d),
        _ => Err(KpiError::InvalidData(format!(
            "Day must be between 1 and {CYCLE_DAYS}, got {day}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_step_in_cents() {
        assert_eq!(compound_step(dec!(1000), dec!(10)).unwrap(), dec!(1100));
        assert_eq!(compound_step(dec!(1100), dec!(10)).unwrap(), dec!(1210));
        assert_eq!(compound_step(dec!(100), dec!(1.5)).unwrap(), dec!(101.5));
        // 333.33 * 1.0333 = 344.4299 -> 344.43
        assert_eq!(compound_step(dec!(333.33), dec!(3.33)).unwrap(), dec!(344.43));
    }

    #[test]
    fn test_compound_step_rounds_factor_to_four_places() {
        // 1.0123456 -> 1.0123 and 1.0123556 -> 1.0124
        assert_eq!(compound_step(dec!(1000), dec!(1.23456)).unwrap(), dec!(1012.30));
        assert_eq!(compound_step(dec!(1000), dec!(1.23556)).unwrap(), dec!(1012.40));
    }

    #[test]
    fn test_compound_step_overflow_is_an_error() {
        assert!(compound_step(Decimal::MAX, dec!(100)).is_err());
        assert!(compound_step(MAX_AMOUNT, dec!(1)).is_err());
    }

    #[test]
    fn test_huge_amounts_are_rejected() {
        assert!(matches!(
            Ladder::generate(dec!(79228162514264337593543950), dec!(100)),
            Err(KpiError::InvalidData(_))
        ));
        // Fits the column on day 0, doubles past it within 30 days.
        assert!(matches!(
            Ladder::generate(dec!(999999999999999), dec!(100)),
            Err(KpiError::InvalidData(_))
        ));
    }

    #[test]
    fn test_rate_is_kept_at_stored_precision() {
        let ladder = Ladder::generate(dec!(1000), dec!(1.23495)).unwrap();
        assert_eq!(ladder.return_percentage, dec!(1.2350));
        assert_eq!(ladder, Ladder::generate(dec!(1000), dec!(1.2350)).unwrap());

        let regenerated =
            Ladder::generate(ladder.initial_investment, ladder.return_percentage).unwrap();
        assert_eq!(regenerated.goals(), ladder.goals());
        assert_eq!(regenerated.final_accumulated(), ladder.final_accumulated());

        // Rounds to zero, which is not a valid rate.
        assert!(Ladder::generate(dec!(1000), dec!(0.00004)).is_err());
    }

    #[test]
    fn test_journal_projection_chains_cycles() {
        let mut seed = dec!(1000);
        for _ in 0..MAX_CYCLES {
            seed = Ladder::generate(seed, dec!(2)).unwrap().final_accumulated();
        }
        assert_eq!(journal_projection(dec!(1000), dec!(2)).unwrap(), seed);
    }

    #[test]
    fn test_journal_projection_rejects_runaway_growth() {
        assert!(journal_projection(dec!(1000), dec!(10)).is_ok());
        assert!(matches!(
            journal_projection(dec!(1000), dec!(50)),
            Err(KpiError::InvalidData(_))
        ));
    }

    #[test]
    fn test_ladder_first_days() {
        let ladder = Ladder::generate(dec!(1000), dec!(10)).unwrap();
        assert_eq!(ladder.rows.len(), CYCLE_DAYS);

        let first = &ladder.rows[0];
        assert_eq!(first.day, 1);
        assert_eq!(first.invested, dec!(1000));
        assert_eq!(first.goal, dec!(100));
        assert_eq!(first.accumulated, dec!(1100));

        let second = &ladder.rows[1];
        assert_eq!(second.invested, dec!(1100));
        assert_eq!(second.goal, dec!(110));
        assert_eq!(second.accumulated, dec!(1210));
    }

    #[test]
    fn test_goals_sum_to_growth() {
        for (initial, pct) in [
            (dec!(1000), dec!(10)),
            (dec!(250.75), dec!(2.5)),
            (dec!(87.13), dec!(0.37)),
        ] {
            let ladder = Ladder::generate(initial, pct).unwrap();
            let total: Decimal = ladder.goals().iter().sum();
            assert_eq!(total, ladder.final_accumulated() - initial);
        }
    }

    #[test]
    fn test_rows_chain() {
        let ladder = Ladder::generate(dec!(512.34), dec!(4)).unwrap();
        for pair in ladder.rows.windows(2) {
            assert_eq!(pair[0].accumulated, pair[1].invested);
        }
    }

    #[test]
    fn test_from_goals_rebuilds_generated_ladder() {
        let ladder = Ladder::generate(dec!(1000), dec!(3)).unwrap();
        let rebuilt = Ladder::from_goals(dec!(1000), dec!(3), &ladder.goals());
        assert_eq!(rebuilt, ladder);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(Ladder::generate(dec!(0), dec!(1)).is_err());
        assert!(Ladder::generate(dec!(-5), dec!(1)).is_err());
        assert!(Ladder::generate(dec!(100), dec!(0)).is_err());
        assert!(Ladder::generate(dec!(100), dec!(100.01)).is_err());
        assert!(Ladder::generate(dec!(100), dec!(100)).is_ok());
    }

    #[test]
    fn test_goal_for_day_bounds() {
        let goals = vec![dec!(1), dec!(2), dec!(3)];
        assert_eq!(goal_for_day(&goals, 1), Some(dec!(1)));
        assert_eq!(goal_for_day(&goals, 3), Some(dec!(3)));
        assert_eq!(goal_for_day(&goals, 0), None);
        assert_eq!(goal_for_day(&goals, 4), None);
    }

    #[test]
    fn test_validate_day() {
        assert_eq!(validate_day(1).unwrap(), 1);
        assert_eq!(validate_day(30).unwrap(), 30);
        assert!(validate_day(0).is_err());
        assert!(validate_day(31).is_err());
        assert!(validate_day(-1).is_err());
    }
}
