pub mod compound_goals;
pub mod current_cycle;
pub mod operation;
pub mod profile;
pub mod setup;
pub mod statistics;

pub use compound_goals::{CompoundGoals, NewCompoundGoals};
pub use current_cycle::{CurrentCycle, NewCurrentCycle};
pub use operation::{NewOperation, Operation};
pub use profile::{NewProfile, Profile};
pub use setup::{NewSetup, Setup};
pub use statistics::{NewStatistics, Statistics};
