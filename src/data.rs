use crate::config::{ObjectiveConfig, ObjectiveStrategy, RotationConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type VolunteerId = u32;
pub type ShiftName = String;

/// A recurring time slot and the number of volunteers it needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub name: ShiftName,
    pub required_volunteers: u32,
}

impl Shift {
    pub fn new(name: impl Into<ShiftName>, required_volunteers: u32) -> Self {
        Self {
            name: name.into(),
            required_volunteers,
        }
    }
}

/// Preference points of one volunteer, indexed by catalog position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencePoints(Vec<u32>);

impl PreferencePoints {
    pub fn new(points: Vec<u32>) -> Self {
        Self(points)
    }

    pub fn get(&self, shift_index: usize) -> u32 {
        self.0.get(shift_index).copied().unwrap_or(0)
    }

    /// Number of shifts covered; equals the catalog size once scored.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn max(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// An individual volunteer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: VolunteerId,
    pub name: String,
    #[serde(default)]
    pub is_preferred: bool,
    /// Ranked best-first. Empty strings are placeholders for "no further preference".
    #[serde(default)]
    pub preferred_shifts: Vec<ShiftName>,
    #[serde(skip)]
    pub preference_points: PreferencePoints,
}

impl Volunteer {
    pub fn new(id: VolunteerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_preferred: false,
            preferred_shifts: Vec::new(),
            preference_points: PreferencePoints::default(),
        }
    }

    pub fn preferred(mut self, is_preferred: bool) -> Self {
        self.is_preferred = is_preferred;
        self
    }

    pub fn with_preferences<I, S>(mut self, shifts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ShiftName>,
    {
        self.preferred_shifts = shifts.into_iter().map(Into::into).collect();
        self
    }

    /// True if `shift` appears in the preference list. Placeholders never match.
    pub fn lists(&self, shift: &str) -> bool {
        !shift.is_empty() && self.preferred_shifts.iter().any(|s| s == shift)
    }
}

/// A block booking of anonymous volunteers who all want the same shift.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerGroup {
    #[serde(alias = "Group")]
    pub name: String,
    #[serde(alias = "Shift")]
    pub shift: ShiftName,
    #[serde(alias = "Volunteers")]
    pub volunteers: u32,
}

/// The complete input for one scheduling run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingInput {
    pub volunteers: Vec<Volunteer>,
    #[serde(default)]
    pub groups: Vec<VolunteerGroup>,
    /// Overrides the configured rotation for this run.
    #[serde(default)]
    pub rotation: Option<RotationConfig>,
    #[serde(default)]
    pub objective: Option<ObjectiveConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SolveStatus {
    /// Proven optimal for the chosen objective.
    Optimal,
    /// A valid assignment the solver stopped on before proving optimality,
    /// for example at its time limit.
    Feasible,
}

impl SolveStatus {
    /// The weaker of two statuses; a staged solve is only optimal if every stage was.
    pub fn and(self, other: SolveStatus) -> SolveStatus {
        match (self, other) {
            (SolveStatus::Optimal, SolveStatus::Optimal) => SolveStatus::Optimal,
            _ => SolveStatus::Feasible,
        }
    }
}

/// Realised values of the two objective terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveBreakdown {
    /// Sum of `scalar / required_volunteers` over every assignment.
    pub coverage: u64,
    /// Sum of preference points over every assignment, unscaled.
    pub preference: u64,
}

/// Volunteers assigned to one shift.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRoster {
    pub shift: ShiftName,
    pub required_volunteers: u32,
    pub assigned: Vec<String>,
    pub understaffed: bool,
}

/// The shift a volunteer ended up with, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerAssignment {
    pub volunteer_id: VolunteerId,
    pub name: String,
    pub is_preferred: bool,
    pub shift: Option<ShiftName>,
}

impl fmt::Display for VolunteerAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shift {
            Some(shift) => write!(f, "{}: {}", self.name, shift),
            None => write!(f, "{}: Unassigned", self.name),
        }
    }
}

/// Aggregate quality of a solved schedule. All values are percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub requirements_covered: f64,
    pub shifts_fully_covered: f64,
    pub volunteers_assigned: f64,
    pub preferred_volunteers_assigned: f64,
    pub preference_points_realized: f64,
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingOutput {
    pub status: SolveStatus,
    pub strategy: ObjectiveStrategy,
    pub objective: ObjectiveBreakdown,
    pub shifts: Vec<ShiftRoster>,
    pub volunteers: Vec<VolunteerAssignment>,
    pub summary: SummaryStatistics,
}

impl SchedulingOutput {
    pub fn assignment_of(&self, volunteer_id: VolunteerId) -> Option<&str> {
        self.volunteers
            .iter()
            .find(|v| v.volunteer_id == volunteer_id)
            .and_then(|v| v.shift.as_deref())
    }

    pub fn roster(&self, shift: &str) -> Option<&ShiftRoster> {
        self.shifts.iter().find(|r| r.shift == shift)
    }

    pub fn filled_slots(&self) -> usize {
        self.shifts.iter().map(|r| r.assigned.len()).sum()
    }
}
