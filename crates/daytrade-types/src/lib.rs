pub mod journal;
pub mod money;

pub use journal::{
    ExcessRouting, LossCoverage, MarketMode, OperationType, ProfileRole, SquareColor,
};
pub use money::{MAX_AMOUNT, fits_amount_column, format_currency, parse_amount, round_cents};

/// Number of trading days in one goal ladder.
pub const CYCLE_DAYS: usize = 30;

/// After this many completed cycles the journal restarts from zero.
pub const MAX_CYCLES: i32 = 6;
