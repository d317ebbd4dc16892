use crate::catalog::ShiftCatalog;
use crate::config::{ObjectiveConfig, ObjectiveStrategy, SchedulerConfig, SolverConfig};
use crate::data::{
    ObjectiveBreakdown, SchedulingInput, SchedulingOutput, ShiftRoster, SolveStatus,
    SummaryStatistics, Volunteer, VolunteerAssignment,
};
use crate::error::Result;
use crate::ingest::disaggregate_groups;
use crate::model::{AssignmentGrid, AssignmentModel, evaluate};
use crate::preference::score_all;
use good_lp::{Expression, Solution, SolutionStatus, SolverModel, constraint, default_solver};
use log::{info, trace, warn};
use std::time::Instant;

/// A solved assignment together with the volunteers and shifts it refers to.
#[derive(Debug, Clone)]
pub struct SolvedSchedule {
    pub status: SolveStatus,
    pub strategy: ObjectiveStrategy,
    pub catalog: ShiftCatalog,
    pub volunteers: Vec<Volunteer>,
    pub grid: AssignmentGrid,
    pub objective: ObjectiveBreakdown,
}

/// Runs the whole pipeline: catalog, group expansion, scoring, optimisation
/// and interpretation.
///
/// The input's own rotation and objective override the configured ones.
pub fn solve(input: &SchedulingInput, config: &SchedulerConfig) -> Result<SchedulingOutput> {
    let rotation = input.rotation.as_ref().unwrap_or(&config.rotation);
    let objective = input.objective.unwrap_or(config.objective);
    let catalog = ShiftCatalog::from_rotation(rotation);

    let mut volunteers = input.volunteers.clone();
    disaggregate_groups(&input.groups, &mut volunteers, &catalog)?;
    score_all(&mut volunteers, &catalog);

    let solved = optimize(catalog, volunteers, &objective, &config.solver)?;
    Ok(interpret(&solved))
}

/// Finds an assignment for already-scored volunteers.
pub fn optimize(
    catalog: ShiftCatalog,
    volunteers: Vec<Volunteer>,
    objective: &ObjectiveConfig,
    options: &SolverConfig,
) -> Result<SolvedSchedule> {
    let start_time = Instant::now();
    let (grid, status) = match objective.strategy {
        ObjectiveStrategy::Weighted => solve_weighted(&volunteers, &catalog, objective, options)?,
        ObjectiveStrategy::Lexicographic => solve_lexicographic(&volunteers, &catalog, options)?,
    };
    let breakdown = evaluate(&volunteers, &catalog, &grid)?;
    info!(
        "Assigned {} of {} volunteers in {:.2?} (coverage {}, preference {})",
        grid.filled_slots(),
        volunteers.len(),
        start_time.elapsed(),
        breakdown.coverage,
        breakdown.preference
    );

    if status == SolveStatus::Feasible {
        warn!("Solver stopped before proving optimality; the schedule may be improvable");
    }
    Ok(SolvedSchedule {
        status,
        strategy: objective.strategy,
        catalog,
        volunteers,
        grid,
        objective: breakdown,
    })
}

fn solve_weighted(
    volunteers: &[Volunteer],
    catalog: &ShiftCatalog,
    weights: &ObjectiveConfig,
    options: &SolverConfig,
) -> Result<(AssignmentGrid, SolveStatus)> {
    let model = AssignmentModel::build(volunteers, catalog)?;
    if !model.coverage_dominates(weights) {
        warn!(
            "Weights {}:{} do not guarantee that coverage outweighs preferences for this input",
            weights.coverage_weight, weights.preference_weight
        );
    }
    let objective = model.weighted_objective(weights)?;
    info!("Objective function defined with weighted coverage and preference terms.");
    run_highs(model, objective, options)
}

// Coverage first, then preferences with coverage held at its optimum.
fn solve_lexicographic(
    volunteers: &[Volunteer],
    catalog: &ShiftCatalog,
    options: &SolverConfig,
) -> Result<(AssignmentGrid, SolveStatus)> {
    let model = AssignmentModel::build(volunteers, catalog)?;
    let coverage = model.coverage_expression()?;
    info!("Stage 1: maximising coverage...");
    let (first, first_status) = run_highs(model, coverage, options)?;
    let best_coverage = evaluate(volunteers, catalog, &first)?.coverage;
    trace!("Best coverage is {}", best_coverage);

    let mut model = AssignmentModel::build(volunteers, catalog)?;
    let locked = model.coverage_expression()?;
    // coverage is integral, so half a unit of slack absorbs solver tolerance
    model.add_constraint(constraint!(locked >= best_coverage as f64 - 0.5));
    let preference = model.preference_expression()?;
    info!("Stage 2: maximising preferences at coverage {}...", best_coverage);
    let (grid, second_status) = run_highs(model, preference, options)?;
    Ok((grid, first_status.and(second_status)))
}

fn run_highs(
    model: AssignmentModel<'_>,
    objective: Expression,
    options: &SolverConfig,
) -> Result<(AssignmentGrid, SolveStatus)> {
    let (problem, vars, constraints) = model.into_parts();
    if vars.is_empty() {
        return Ok((AssignmentGrid::read(&vars, |_| 0.0), SolveStatus::Optimal));
    }

    let mut highs = problem
        .maximise(objective)
        .using(default_solver)
        .set_option("threads", options.threads as i32)
        .set_option("random_seed", options.random_seed as i32)
        .set_option(
            "log_to_console",
            if options.log_to_console { "true" } else { "false" },
        );
    if let Some(limit) = options.time_limit_secs {
        highs = highs.set_option("time_limit", limit);
    }
    for c in constraints {
        highs.add_constraint(c);
    }

    info!("Starting ILP solver...");
    let solution = highs.solve()?;
    let status = solve_status(solution.status());
    trace!("HiGHS finished with {:?}", solution.status());
    Ok((AssignmentGrid::read(&vars, |var| solution.value(var)), status))
}

/// Maps the solver's status onto ours. Anything short of a proven optimum,
/// such as a time or gap limit, is `Feasible`.
pub fn solve_status(status: SolutionStatus) -> SolveStatus {
    match status {
        SolutionStatus::Optimal => SolveStatus::Optimal,
        _ => SolveStatus::Feasible,
    }
}

/// Turns a solved grid into rosters, a per-volunteer table and summary statistics.
pub fn interpret(solved: &SolvedSchedule) -> SchedulingOutput {
    let SolvedSchedule {
        catalog,
        volunteers,
        grid,
        ..
    } = solved;

    let shifts = catalog
        .iter()
        .enumerate()
        .map(|(s, shift)| {
            let assigned: Vec<String> = grid
                .volunteers_on(s)
                .map(|v| volunteers[v].name.clone())
                .collect();
            ShiftRoster {
                shift: shift.name.clone(),
                required_volunteers: shift.required_volunteers,
                understaffed: (assigned.len() as u32) < shift.required_volunteers,
                assigned,
            }
        })
        .collect();

    let assignments = volunteers
        .iter()
        .enumerate()
        .map(|(v, volunteer)| VolunteerAssignment {
            volunteer_id: volunteer.id,
            name: volunteer.name.clone(),
            is_preferred: volunteer.is_preferred,
            shift: grid
                .shift_of(v)
                .and_then(|s| catalog.shift(s))
                .map(|shift| shift.name.clone()),
        })
        .collect();

    SchedulingOutput {
        status: solved.status,
        strategy: solved.strategy,
        objective: solved.objective,
        shifts,
        volunteers: assignments,
        summary: summarize(solved),
    }
}

fn summarize(solved: &SolvedSchedule) -> SummaryStatistics {
    let SolvedSchedule {
        catalog,
        volunteers,
        grid,
        ..
    } = solved;

    let filled = grid.filled_slots();
    let fully_covered = catalog
        .iter()
        .enumerate()
        .filter(|(s, shift)| grid.volunteers_on(*s).count() as u32 >= shift.required_volunteers)
        .count();
    let preferred = volunteers.iter().filter(|v| v.is_preferred).count();
    let preferred_assigned = volunteers
        .iter()
        .enumerate()
        .filter(|(v, volunteer)| volunteer.is_preferred && grid.shift_of(*v).is_some())
        .count();
    let attainable_points: u64 = volunteers
        .iter()
        .map(|v| v.preference_points.max() as u64)
        .sum();

    SummaryStatistics {
        requirements_covered: percentage(filled as f64, catalog.total_capacity() as f64),
        shifts_fully_covered: percentage(fully_covered as f64, catalog.len() as f64),
        volunteers_assigned: percentage(filled as f64, volunteers.len() as f64),
        preferred_volunteers_assigned: percentage(preferred_assigned as f64, preferred as f64),
        preference_points_realized: percentage(
            solved.objective.preference as f64,
            attainable_points as f64,
        ),
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { 100.0 * part / whole } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_proven_optimum_is_optimal() {
        assert_eq!(solve_status(SolutionStatus::Optimal), SolveStatus::Optimal);
        assert_eq!(solve_status(SolutionStatus::TimeLimit), SolveStatus::Feasible);
        assert_eq!(solve_status(SolutionStatus::GapLimit), SolveStatus::Feasible);
    }

    #[test]
    fn percentage_of_nothing_is_zero() {
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }
}
