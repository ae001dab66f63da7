pub mod cycle;
pub mod dashboard;
pub mod error;
pub mod ladder;
pub mod settlement;
pub mod statistics;

pub use cycle::{
    Advancement, GridCell, NextCycle, build_grid, check_journal_start, is_cycle_complete,
    next_cycle_seed, plan_advance,
};
pub use dashboard::{BoxTotals, DashboardSummary, Trend, summarize, trend};
pub use error::KpiError;
pub use ladder::{Ladder, LadderRow, compound_step, journal_projection, normalize_rate};
pub use settlement::{
    Balances, Decision, Outcome, Prompt, Settlement, prompt_for, settle, settle_day,
};
pub use statistics::{CycleStatistics, compute_cycle_statistics};
