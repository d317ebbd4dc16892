use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Group '{group}' targets unknown shift '{shift}'")]
    UnknownShift { group: String, shift: String },
    #[error("Volunteer {id} has no preference points for the current catalog")]
    UnscoredVolunteer { id: u32 },
    #[error("Objective scalar for capacities {0:?} is too large to represent exactly")]
    ScalarOverflow(Vec<u32>),
    #[error("Objective coefficient for volunteer {id} on '{shift}' is too large to represent exactly")]
    CoefficientOverflow { id: u32, shift: String },
    #[error("Group '{group}' needs a volunteer id beyond {}", u32::MAX)]
    IdsExhausted { group: String },
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },
    #[error("No solution found: the model is infeasible")]
    Infeasible,
    #[error("No solution found: the model is unbounded")]
    Unbounded,
    #[error("Solver error: {0}")]
    Solver(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    /// True when the error comes from the solver rather than from the input.
    pub fn is_solver_failure(&self) -> bool {
        matches!(self, Self::Infeasible | Self::Unbounded | Self::Solver(_))
    }
}

impl From<good_lp::ResolutionError> for SchedulerError {
    fn from(err: good_lp::ResolutionError) -> Self {
        match err {
            good_lp::ResolutionError::Infeasible => Self::Infeasible,
            good_lp::ResolutionError::Unbounded => Self::Unbounded,
            other => Self::Solver(other.to_string()),
        }
    }
}
