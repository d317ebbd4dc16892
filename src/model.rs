//! The assignment model.
//!
//! One binary `x[v, s]` per (volunteer, shift) pair, addressed by catalog and
//! volunteer position. Hard constraints:
//!
//! - capacity: `sum_v x[v, s] <= required(s)`
//! - at most one shift: `sum_s x[v, s] <= 1`
//! - eligibility: `x[v, s] = 0` unless `v` listed `s`
//!
//! The objective has two terms. Coverage weights each assignment to `s` by
//! `scalar / required(s)`, so every shift is worth the same when full.
//! Preference adds the volunteer's points for the shift. `scalar` is the
//! product of the distinct non-zero capacities, which keeps every
//! coefficient integral.

use crate::catalog::ShiftCatalog;
use crate::config::ObjectiveConfig;
use crate::data::{ObjectiveBreakdown, Volunteer};
use crate::error::{Result, SchedulerError};
use good_lp::{Constraint, Expression, ProblemVariables, Variable, constraint, variable};
use itertools::Itertools;
use log::{debug, info};

// largest integer f64 holds exactly
const MAX_EXACT_SCALAR: u64 = 1 << 53;

/// Product of the distinct non-zero capacities in the catalog.
pub fn objective_scalar(catalog: &ShiftCatalog) -> Result<u64> {
    let distinct: Vec<u32> = catalog
        .iter()
        .map(|s| s.required_volunteers)
        .filter(|&c| c > 0)
        .unique()
        .collect();
    let product = distinct
        .iter()
        .try_fold(1u64, |acc, &c| acc.checked_mul(c as u64))
        .filter(|&p| p <= MAX_EXACT_SCALAR);
    product.ok_or(SchedulerError::ScalarOverflow(distinct))
}

/// Coverage value of one assignment to a shift; `None` for zero-capacity shifts.
pub fn coverage_coefficient(scalar: u64, required_volunteers: u32) -> Option<u64> {
    (required_volunteers > 0).then(|| scalar / required_volunteers as u64)
}

/// Realised coverage and preference of a solved grid.
pub fn evaluate(
    volunteers: &[Volunteer],
    catalog: &ShiftCatalog,
    grid: &AssignmentGrid,
) -> Result<ObjectiveBreakdown> {
    let scalar = objective_scalar(catalog)?;
    let coverage = catalog
        .iter()
        .enumerate()
        .filter_map(|(s, shift)| {
            coverage_coefficient(scalar, shift.required_volunteers)
                .map(|c| c * grid.volunteers_on(s).count() as u64)
        })
        .sum();
    let preference = volunteers
        .iter()
        .enumerate()
        .filter_map(|(v, volunteer)| {
            grid.shift_of(v).map(|s| volunteer.preference_points.get(s) as u64)
        })
        .sum();
    Ok(ObjectiveBreakdown { coverage, preference })
}

/// Decision variables laid out volunteer-major.
#[derive(Debug, Clone)]
pub struct AssignmentVars {
    vars: Vec<Variable>,
    shift_count: usize,
}

impl AssignmentVars {
    pub fn get(&self, volunteer: usize, shift: usize) -> Variable {
        self.vars[volunteer * self.shift_count + shift]
    }

    pub fn volunteer_row(&self, volunteer: usize) -> &[Variable] {
        let start = volunteer * self.shift_count;
        &self.vars[start..start + self.shift_count]
    }

    pub fn shift_column(&self, shift: usize) -> impl Iterator<Item = Variable> + '_ {
        self.vars.iter().skip(shift).step_by(self.shift_count.max(1)).copied()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn shift_count(&self) -> usize {
        self.shift_count
    }

    pub fn volunteer_count(&self) -> usize {
        if self.shift_count == 0 { 0 } else { self.vars.len() / self.shift_count }
    }
}

/// Solved values of the decision variables, same layout as [`AssignmentVars`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentGrid {
    values: Vec<bool>,
    shift_count: usize,
}

impl AssignmentGrid {
    /// Reads every variable through `value`; anything above one half counts as assigned.
    pub fn read(vars: &AssignmentVars, value: impl Fn(Variable) -> f64) -> Self {
        Self {
            values: vars.vars.iter().map(|v| value(*v) > 0.5).collect(),
            shift_count: vars.shift_count,
        }
    }

    pub fn is_assigned(&self, volunteer: usize, shift: usize) -> bool {
        self.values[volunteer * self.shift_count + shift]
    }

    /// First assigned shift of a volunteer; the model allows at most one.
    pub fn shift_of(&self, volunteer: usize) -> Option<usize> {
        (0..self.shift_count).find(|&s| self.is_assigned(volunteer, s))
    }

    pub fn volunteers_on(&self, shift: usize) -> impl Iterator<Item = usize> + '_ {
        let volunteers = if self.shift_count == 0 { 0 } else { self.values.len() / self.shift_count };
        (0..volunteers).filter(move |&v| self.is_assigned(v, shift))
    }

    pub fn filled_slots(&self) -> usize {
        self.values.iter().filter(|&&b| b).count()
    }
}

/// Variables, hard constraints and objective terms for one solve.
pub struct AssignmentModel<'a> {
    volunteers: &'a [Volunteer],
    catalog: &'a ShiftCatalog,
    problem: ProblemVariables,
    vars: AssignmentVars,
    constraints: Vec<Constraint>,
    scalar: u64,
    coverage_coefficients: Vec<u64>,
}

impl<'a> AssignmentModel<'a> {
    /// Every volunteer must already be scored against `catalog`.
    pub fn build(volunteers: &'a [Volunteer], catalog: &'a ShiftCatalog) -> Result<Self> {
        if let Some(v) = volunteers.iter().find(|v| !v.is_scored_for(catalog)) {
            return Err(SchedulerError::UnscoredVolunteer { id: v.id });
        }

        info!(
            "Setting up assignment model with {} volunteers and {} shifts...",
            volunteers.len(),
            catalog.len()
        );
        let mut problem = ProblemVariables::new();
        let shift_count = catalog.len();
        let vars = AssignmentVars {
            vars: problem.add_vector(variable().binary(), volunteers.len() * shift_count),
            shift_count,
        };

        let scalar = objective_scalar(catalog)?;
        let coverage_coefficients = catalog
            .iter()
            .map(|s| coverage_coefficient(scalar, s.required_volunteers).unwrap_or(0))
            .collect();

        let mut constraints = Vec::new();

        // shift capacity; under-filling is allowed
        for (s, shift) in catalog.iter().enumerate() {
            let staffed: Expression = vars.shift_column(s).sum();
            constraints.push(constraint!(staffed <= shift.required_volunteers as f64));
        }

        // at most one shift per volunteer
        for v in 0..volunteers.len() {
            let shifts_taken: Expression = vars.volunteer_row(v).iter().copied().sum();
            constraints.push(constraint!(shifts_taken <= 1.0));
        }

        // only shifts the volunteer listed
        let mut ineligible = 0usize;
        for (v, volunteer) in volunteers.iter().enumerate() {
            for (s, shift) in catalog.iter().enumerate() {
                if !volunteer.lists(&shift.name) {
                    constraints.push(constraint!(vars.get(v, s) == 0.0));
                    ineligible += 1;
                }
            }
        }
        debug!(
            "{} variables, {} constraints ({} eligibility), scalar {}",
            vars.len(),
            constraints.len(),
            ineligible,
            scalar
        );

        Ok(Self {
            volunteers,
            catalog,
            problem,
            vars,
            constraints,
            scalar,
            coverage_coefficients,
        })
    }

    pub fn vars(&self) -> &AssignmentVars {
        &self.vars
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn scalar(&self) -> u64 {
        self.scalar
    }

    pub fn coverage_coefficients(&self) -> &[u64] {
        &self.coverage_coefficients
    }

    /// Coverage term alone.
    pub fn coverage_expression(&self) -> Result<Expression> {
        self.linear_expression(1, 0)
    }

    /// Preference term alone, without the scalar.
    pub fn preference_expression(&self) -> Result<Expression> {
        self.linear_expression(0, 1)
    }

    /// `coverage_weight * coverage + preference_weight * scalar * preference`.
    pub fn weighted_objective(&self, weights: &ObjectiveConfig) -> Result<Expression> {
        self.linear_expression(
            weights.coverage_weight as u128,
            weights.preference_weight as u128 * self.scalar as u128,
        )
    }

    // u128 holds every product of a u32 weight, the scalar and u32 points;
    // the result must still fit an f64 exactly.
    fn linear_expression(&self, coverage_factor: u128, preference_factor: u128) -> Result<Expression> {
        let mut expr = Expression::default();
        for (v, volunteer) in self.volunteers.iter().enumerate() {
            for (s, shift) in self.catalog.iter().enumerate() {
                let coefficient = coverage_factor * self.coverage_coefficients[s] as u128
                    + preference_factor * volunteer.preference_points.get(s) as u128;
                if coefficient > MAX_EXACT_SCALAR as u128 {
                    return Err(SchedulerError::CoefficientOverflow {
                        id: volunteer.id,
                        shift: shift.name.clone(),
                    });
                }
                if coefficient > 0 {
                    expr.add_mul(coefficient as f64, self.vars.get(v, s));
                }
            }
        }
        Ok(expr)
    }

    /// Whether the weights alone guarantee that filling one more slot beats
    /// any possible preference gain.
    ///
    /// The bound compares the cheapest slot against the largest preference
    /// total any assignment can reach, so `false` means unproven rather than
    /// violated. A bound too large for `u128` is unproven as well.
    pub fn coverage_dominates(&self, weights: &ObjectiveConfig) -> bool {
        let Some(cheapest_slot) = self.coverage_coefficients.iter().copied().filter(|&c| c > 0).min()
        else {
            return true;
        };
        let best_preference: u128 = self
            .volunteers
            .iter()
            .map(|v| v.preference_points.max() as u128)
            .sum();
        let slot_value = weights.coverage_weight as u128 * cheapest_slot as u128;
        let preference_bound = (weights.preference_weight as u128 * self.scalar as u128)
            .checked_mul(best_preference);
        preference_bound.is_some_and(|bound| slot_value > bound)
    }

    /// Adds a constraint on top of the hard constraints, e.g. a locked objective level.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub(crate) fn into_parts(self) -> (ProblemVariables, AssignmentVars, Vec<Constraint>) {
        (self.problem, self.vars, self.constraints)
    }
}
