pub mod cycle;
pub mod dashboard;
pub mod goals;
pub mod journal;
pub mod operations;
pub mod profile;
pub mod setup;
pub mod statistics;

pub use cycle::{advance_cycle, get_cycle_state};
pub use dashboard::get_dashboard;
pub use goals::{calculate_goals, get_active_goals, get_cycle_goals};
pub use journal::reset_journal;
pub use operations::{list_cycle_operations, preview_operation, record_operation};
pub use profile::{create_profile, get_profile, update_profile};
pub use setup::{get_setup, register_setup};
pub use statistics::{list_statistics, recompute_statistics};
