//! Weekly volunteer shift scheduling.
//!
//! Volunteers rank the shifts they want; the scheduler fills as many shift
//! slots as possible and, among the fullest schedules, honours preferences,
//! giving preferred volunteers double weight. The assignment is solved as a
//! binary integer program with HiGHS through `good_lp`.

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod ingest;
pub mod model;
pub mod preference;
pub mod report;
pub mod server;
pub mod solver;

pub use catalog::ShiftCatalog;
pub use config::{ObjectiveConfig, ObjectiveStrategy, RotationConfig, SchedulerConfig};
pub use data::{SchedulingInput, SchedulingOutput, Shift, Volunteer, VolunteerGroup};
pub use error::{Result, SchedulerError};
pub use solver::solve;
