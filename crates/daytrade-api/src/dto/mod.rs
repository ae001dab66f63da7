pub mod cycle;
pub mod dashboard;
pub mod goals;
pub mod operation;
pub mod profile;
pub mod response;
pub mod setup;
pub mod statistics;

pub use cycle::*;
pub use dashboard::*;
pub use goals::*;
pub use operation::*;
pub use profile::*;
pub use response::*;
pub use setup::*;
pub use statistics::*;

use rust_decimal::Decimal;

/// Money and percentages leave the API as strings with two decimals.
pub fn decimal_string(value: Decimal) -> String {
    format!("{:.2}", daytrade_types::round_cents(value))
}
