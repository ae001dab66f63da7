use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use daytrade_db::models::Operation;
use daytrade_types::{
    ExcessRouting, LossCoverage, OperationType, SquareColor, fits_amount_column, round_cents,
};

use crate::error::KpiError;
use crate::ladder::out_of_range;

/// A day's result as entered by the user. Amounts are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Profit(Decimal),
    Loss(Decimal),
}

impl Outcome {
    pub fn new(operation_type: OperationType, amount: Decimal) -> Result<Self, KpiError> {
        let amount = round_cents(amount);
        if amount <= Decimal::ZERO {
            return Err(KpiError::InvalidData(
                "Operation amount must be greater than zero".to_string(),
            ));
        }
        if !fits_amount_column(amount) {
            return Err(out_of_range(amount));
        }
        match operation_type {
            OperationType::Profit => Ok(Self::Profit(amount)),
            OperationType::Loss => Ok(Self::Loss(amount)),
            OperationType::Pending => Err(KpiError::InvalidData(
                "Only profit or loss outcomes can be recorded".to_string(),
            )),
        }
    }

    pub const fn amount(self) -> Decimal {
        match self {
            Self::Profit(amount) | Self::Loss(amount) => amount,
        }
    }

    pub const fn operation_type(self) -> OperationType {
        match self {
            Self::Profit(_) => OperationType::Profit,
            Self::Loss(_) => OperationType::Loss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balances {
    pub box1: Decimal,
    pub box2: Decimal,
}

/// The user's answers to whatever [`Prompt`] an outcome raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decision {
    pub excess: Option<ExcessRouting>,
    pub loss: Option<LossCoverage>,
}

/// Question that must be answered before an outcome can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    None,
    ExcessRouting {
        excess: Decimal,
    },
    LossCoverage {
        loss: Decimal,
        box2_balance: Decimal,
        box2_sufficient: bool,
    },
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "no decision needed"),
            Self::ExcessRouting { excess } => {
                write!(f, "profit exceeds the goal by {excess}, choose where the excess goes")
            }
            Self::LossCoverage {
                loss, box2_balance, ..
            } => write!(
                f,
                "loss of {loss} needs a coverage choice (box 2 holds {box2_balance})"
            ),
        }
    }
}

/// Everything that recording an outcome changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub operation_type: OperationType,
    /// Always positive.
    pub operation_value: Decimal,
    pub goal_value: Decimal,
    pub square_color: SquareColor,
    pub is_goal_met: bool,
    pub balances: Balances,
    pub excess_to_box2: Decimal,
    /// Box 2 could not cover the loss, so box 1 took it.
    pub coverage_fallback: bool,
}

pub fn prompt_for(outcome: Outcome, goal: Decimal, balances: Balances) -> Prompt {
    match outcome {
        Outcome::Profit(profit) if profit > goal => Prompt::ExcessRouting {
            excess: profit - goal,
        },
        Outcome::Profit(_) => Prompt::None,
        Outcome::Loss(loss) => Prompt::LossCoverage {
            loss,
            box2_balance: balances.box2,
            box2_sufficient: balances.box2 >= loss,
        },
    }
}

/// Apply an outcome to the box balances and color the day.
///
/// Fails with [`KpiError::DecisionRequired`] when the outcome raises a prompt
/// that `decision` leaves unanswered.
pub fn settle(
    outcome: Outcome,
    goal: Decimal,
    balances: Balances,
    decision: Decision,
) -> Result<Settlement, KpiError> {
    let prompt = prompt_for(outcome, goal, balances);
    let mut settlement = Settlement {
        operation_type: outcome.operation_type(),
        operation_value: outcome.amount(),
        goal_value: goal,
        square_color: SquareColor::Transparent,
        is_goal_met: false,
        balances,
        excess_to_box2: Decimal::ZERO,
        coverage_fallback: false,
    };

    match (outcome, prompt) {
        (Outcome::Profit(profit), Prompt::ExcessRouting { excess }) => {
            let routing = decision.excess.ok_or(KpiError::DecisionRequired(prompt))?;
            settlement.square_color = SquareColor::Green;
            settlement.is_goal_met = true;
            match routing {
                ExcessRouting::SendToBox2 => {
                    settlement.balances.box1 = shift(balances.box1, goal)?;
                    settlement.balances.box2 = shift(balances.box2, excess)?;
                    settlement.excess_to_box2 = excess;
                }
                ExcessRouting::KeepInBox1 => {
                    settlement.balances.box1 = shift(balances.box1, profit)?;
                }
            }
        }
        (Outcome::Profit(profit), _) => {
            let met = profit >= goal;
            settlement.square_color = if met {
                SquareColor::Green
            } else {
                SquareColor::Yellow
            };
            settlement.is_goal_met = met;
            settlement.balances.box1 = shift(balances.box1, profit)?;
        }
        (Outcome::Loss(loss), _) => {
            let coverage = decision.loss.ok_or(KpiError::DecisionRequired(prompt))?;
            match coverage {
                LossCoverage::CoverFromBox2 if balances.box2 >= loss => {
                    settlement.square_color = SquareColor::Orange;
                    settlement.balances.box2 = shift(balances.box2, -loss)?;
                }
                LossCoverage::CoverFromBox2 => {
                    settlement.square_color = SquareColor::Red;
                    settlement.balances.box1 = shift(balances.box1, -loss)?;
                    settlement.coverage_fallback = true;
                }
                LossCoverage::DebitBox1 => {
                    settlement.square_color = SquareColor::Red;
                    settlement.balances.box1 = shift(balances.box1, -loss)?;
                }
            }
        }
    }

    Ok(settlement)
}

/// Move a box balance by `delta`, keeping it storable.
fn shift(balance: Decimal, delta: Decimal) -> Result<Decimal, KpiError> {
    balance
        .checked_add(delta)
        .filter(|next| fits_amount_column(*next))
        .ok_or_else(|| out_of_range(balance))
}

/// Settle a day of the current cycle. A day that already holds a profit or
/// loss is never overwritten.
pub fn settle_day(
    existing: Option<&Operation>,
    day: u32,
    outcome: Outcome,
    goal: Decimal,
    balances: Balances,
    decision: Decision,
) -> Result<Settlement, KpiError> {
    if let Some(op) = existing.filter(|op| op.kind() != OperationType::Pending) {
        return Err(KpiError::Conflict(format!(
            "Day {day} of cycle {} is already recorded as {}",
            op.cycle_number, op.operation_type
        )));
    }
    settle(outcome, goal, balances, decision)
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use daytrade_types::MAX_AMOUNT;

    use super::*;
    use crate::statistics::tests::operation;

    const fn boxes(box1: Decimal, box2: Decimal) -> Balances {
        Balances { box1, box2 }
    }

    fn send_excess() -> Decision {
        Decision {
            excess: Some(ExcessRouting::SendToBox2),
            loss: None,
        }
    }

    fn cover(coverage: LossCoverage) -> Decision {
        Decision {
            excess: None,
            loss: Some(coverage),
        }
    }

    #[test]
    fn test_profit_equal_to_goal_is_green_without_prompt() {
        let outcome = Outcome::Profit(dec!(100));
        let start = boxes(dec!(1000), dec!(500));
        assert_eq!(prompt_for(outcome, dec!(100), start), Prompt::None);

        let s = settle(outcome, dec!(100), start, Decision::default()).unwrap();
        assert_eq!(s.square_color, SquareColor::Green);
        assert!(s.is_goal_met);
        assert_eq!(s.balances, boxes(dec!(1100), dec!(500)));
    }

    #[test]
    fn test_profit_over_goal_sends_excess() {
        let s = settle(
            Outcome::Profit(dec!(150)),
            dec!(100),
            boxes(dec!(1000), dec!(500)),
            send_excess(),
        )
        .unwrap();
        assert_eq!(s.square_color, SquareColor::Green);
        assert_eq!(s.balances, boxes(dec!(1100), dec!(550)));
        assert_eq!(s.excess_to_box2, dec!(50));
    }

    #[test]
    fn test_profit_over_goal_kept_in_box1() {
        let decision = Decision {
            excess: Some(ExcessRouting::KeepInBox1),
            loss: None,
        };
        let s = settle(
            Outcome::Profit(dec!(150)),
            dec!(100),
            boxes(dec!(1000), dec!(500)),
            decision,
        )
        .unwrap();
        assert_eq!(s.balances, boxes(dec!(1150), dec!(500)));
        assert_eq!(s.excess_to_box2, Decimal::ZERO);
    }

    #[test]
    fn test_profit_over_goal_without_answer_requires_decision() {
        let err = settle(
            Outcome::Profit(dec!(150)),
            dec!(100),
            boxes(dec!(1000), dec!(500)),
            Decision::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            KpiError::DecisionRequired(Prompt::ExcessRouting { excess }) if excess == dec!(50)
        ));
    }

    #[test]
    fn test_profit_under_goal_is_yellow() {
        let s = settle(
            Outcome::Profit(dec!(40)),
            dec!(100),
            boxes(dec!(1000), dec!(500)),
            Decision::default(),
        )
        .unwrap();
        assert_eq!(s.square_color, SquareColor::Yellow);
        assert!(!s.is_goal_met);
        assert_eq!(s.balances, boxes(dec!(1040), dec!(500)));
    }

    #[test]
    fn test_loss_covered_by_box2() {
        let s = settle(
            Outcome::Loss(dec!(80)),
            dec!(100),
            boxes(dec!(1000), dec!(500)),
            cover(LossCoverage::CoverFromBox2),
        )
        .unwrap();
        assert_eq!(s.square_color, SquareColor::Orange);
        assert_eq!(s.balances, boxes(dec!(1000), dec!(420)));
        assert_eq!(s.operation_value, dec!(80));
        assert!(!s.coverage_fallback);
    }

    #[test]
    fn test_loss_with_short_box2_falls_back_to_box1() {
        let start = boxes(dec!(1000), dec!(50));
        assert_eq!(
            prompt_for(Outcome::Loss(dec!(80)), dec!(100), start),
            Prompt::LossCoverage {
                loss: dec!(80),
                box2_balance: dec!(50),
                box2_sufficient: false,
            }
        );

        let s = settle(
            Outcome::Loss(dec!(80)),
            dec!(100),
            start,
            cover(LossCoverage::CoverFromBox2),
        )
        .unwrap();
        assert_eq!(s.square_color, SquareColor::Red);
        assert!(s.coverage_fallback);
        assert_eq!(s.balances, boxes(dec!(920), dec!(50)));
    }

    #[test]
    fn test_loss_debited_from_box1_may_go_negative() {
        let s = settle(
            Outcome::Loss(dec!(300)),
            dec!(100),
            boxes(dec!(200), dec!(500)),
            cover(LossCoverage::DebitBox1),
        )
        .unwrap();
        assert_eq!(s.square_color, SquareColor::Red);
        assert_eq!(s.balances, boxes(dec!(-100), dec!(500)));
    }

    #[test]
    fn test_loss_without_answer_requires_decision() {
        let err = settle(
            Outcome::Loss(dec!(10)),
            dec!(100),
            boxes(dec!(1000), dec!(500)),
            send_excess(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            KpiError::DecisionRequired(Prompt::LossCoverage { .. })
        ));
    }

    #[test]
    fn test_balance_overflow_is_rejected() {
        let keep = Decision {
            excess: Some(ExcessRouting::KeepInBox1),
            loss: None,
        };
        let err = settle(
            Outcome::Profit(dec!(10)),
            dec!(5),
            boxes(MAX_AMOUNT, dec!(0)),
            keep,
        )
        .unwrap_err();
        assert!(matches!(err, KpiError::InvalidData(_)));

        let err = settle(
            Outcome::Loss(dec!(10)),
            dec!(5),
            boxes(-MAX_AMOUNT, dec!(0)),
            cover(LossCoverage::DebitBox1),
        )
        .unwrap_err();
        assert!(matches!(err, KpiError::InvalidData(_)));
    }

    #[test]
    fn test_recorded_day_is_not_overwritten() {
        let recorded = operation(1, 4, OperationType::Loss, Some(dec!(3)), SquareColor::Red);
        let err = settle_day(
            Some(&recorded),
            4,
            Outcome::Profit(dec!(10)),
            dec!(10),
            boxes(dec!(100), dec!(0)),
            Decision::default(),
        )
        .unwrap_err();
        assert!(matches!(err, KpiError::Conflict(_)));
    }

    #[test]
    fn test_pending_day_can_be_settled() {
        let pending = operation(1, 4, OperationType::Pending, None, SquareColor::Transparent);
        for existing in [None, Some(&pending)] {
            let s = settle_day(
                existing,
                4,
                Outcome::Profit(dec!(10)),
                dec!(10),
                boxes(dec!(100), dec!(0)),
                Decision::default(),
            )
            .unwrap();
            assert_eq!(s.square_color, SquareColor::Green);
            assert_eq!(s.balances, boxes(dec!(110), dec!(0)));
        }
    }

    #[test]
    fn test_outcome_validation() {
        assert!(Outcome::new(OperationType::Profit, dec!(0)).is_err());
        assert!(Outcome::new(OperationType::Loss, dec!(-3)).is_err());
        assert!(Outcome::new(OperationType::Pending, dec!(3)).is_err());
        assert!(Outcome::new(OperationType::Profit, dec!(1000000000000000000)).is_err());
        assert_eq!(
            Outcome::new(OperationType::Loss, dec!(12.345)).unwrap(),
            Outcome::Loss(dec!(12.35))
        );
    }
}
