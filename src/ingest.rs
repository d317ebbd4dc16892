//! Reading volunteers and volunteer groups.
//!
//! Individual volunteers come from a CSV with `Name`, `Preferred Applicants`
//! and one column per shift holding that shift's rank (1 = best, blank = not
//! wanted). Groups come from a CSV with `Group`, `Shift` and `Volunteers`.

use crate::catalog::ShiftCatalog;
use crate::data::{Volunteer, VolunteerGroup, VolunteerId};
use crate::error::{Result, SchedulerError};
use csv::{Reader, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const NAME_COLUMN: &str = "Name";
const PREFERRED_COLUMN: &str = "Preferred Applicants";

/// Groups always expand to a list of this length: the group's shift plus placeholders.
pub const GROUP_PREFERENCE_SLOTS: usize = 5;

pub fn read_volunteers_csv(path: &Path, catalog: &ShiftCatalog) -> Result<Vec<Volunteer>> {
    let volunteers = read_volunteers(Reader::from_path(path)?, catalog)?;
    log::info!("Read {} volunteers from {}", volunteers.len(), path.display());
    Ok(volunteers)
}

pub fn read_volunteers<R: Read>(mut reader: Reader<R>, catalog: &ShiftCatalog) -> Result<Vec<Volunteer>> {
    let headers = reader.headers()?.clone();
    let name_col = column(&headers, NAME_COLUMN)?;
    let preferred_col = column(&headers, PREFERRED_COLUMN)?;

    let shift_cols: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != name_col && *i != preferred_col)
        .map(|(i, h)| (i, h.trim()))
        .collect();
    for (_, header) in &shift_cols {
        if catalog.get(header).is_none() {
            log::warn!("Column '{}' is not a shift in the catalog; it will never be assigned", header);
        }
    }

    let mut volunteers = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let mut volunteer = Volunteer::new(volunteers.len() as VolunteerId, field(&record, name_col));
        volunteer.is_preferred = parse_flag(field(&record, preferred_col)).ok_or_else(|| {
            SchedulerError::InvalidRecord {
                line,
                message: format!("'{}' is not a yes/no value", field(&record, preferred_col)),
            }
        })?;
        volunteer.preferred_shifts = ranked_shifts(&record, &shift_cols, line)?;
        volunteers.push(volunteer);
    }
    Ok(volunteers)
}

fn ranked_shifts(record: &StringRecord, shift_cols: &[(usize, &str)], line: u64) -> Result<Vec<String>> {
    let mut ranked: Vec<(u32, &str)> = Vec::new();
    for (col, shift) in shift_cols {
        let cell = field(record, *col);
        if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
            continue;
        }
        let rank = parse_rank(cell).ok_or_else(|| SchedulerError::InvalidRecord {
            line,
            message: format!("rank '{}' for '{}' is not a positive integer", cell, shift),
        })?;
        if let Some((_, other)) = ranked.iter().find(|(r, _)| *r == rank) {
            return Err(SchedulerError::InvalidRecord {
                line,
                message: format!("'{}' and '{}' share rank {}", other, shift, rank),
            });
        }
        ranked.push((rank, shift));
    }
    ranked.sort_by_key(|(rank, _)| *rank);
    Ok(ranked.into_iter().map(|(_, s)| s.to_string()).collect())
}

// spreadsheets export whole numbers as "1.0"
fn parse_rank(cell: &str) -> Option<u32> {
    cell.parse::<u32>()
        .ok()
        .or_else(|| cell.strip_suffix(".0").and_then(|c| c.parse().ok()))
        .filter(|r| *r > 0)
}

fn parse_flag(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "x" => Some(true),
        "false" | "no" | "n" | "0" | "" => Some(false),
        _ => None,
    }
}

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| SchedulerError::InvalidRecord {
            line: 1,
            message: format!("missing column '{}'", name),
        })
}

fn field(record: &StringRecord, col: usize) -> &str {
    record.get(col).unwrap_or("").trim()
}

pub fn read_groups_csv(path: &Path) -> Result<Vec<VolunteerGroup>> {
    let groups = read_groups(Reader::from_path(path)?)?;
    log::info!("Read {} volunteer groups from {}", groups.len(), path.display());
    Ok(groups)
}

pub fn read_groups<R: Read>(mut reader: Reader<R>) -> Result<Vec<VolunteerGroup>> {
    let mut groups = Vec::new();
    for record in reader.deserialize() {
        groups.push(record?);
    }
    Ok(groups)
}

/// Expands every group into individual preferred volunteers appended to
/// `volunteers`.
///
/// A group never produces more volunteers than its shift has capacity left
/// after the groups before it.
pub fn disaggregate_groups(
    groups: &[VolunteerGroup],
    volunteers: &mut Vec<Volunteer>,
    catalog: &ShiftCatalog,
) -> Result<()> {
    let mut booked: HashMap<&str, u32> = HashMap::new();
    let mut next_id = volunteers.iter().map(|v| v.id as u64 + 1).max().unwrap_or(0);

    for group in groups {
        let shift = catalog
            .get(&group.shift)
            .ok_or_else(|| SchedulerError::UnknownShift {
                group: group.name.clone(),
                shift: group.shift.clone(),
            })?;
        let already = booked.entry(shift.name.as_str()).or_insert(0);
        let remaining = shift.required_volunteers.saturating_sub(*already);
        let headcount = group.volunteers.min(remaining);
        if headcount < group.volunteers {
            log::info!(
                "Capping group '{}' at {} of {} volunteers for '{}'",
                group.name,
                headcount,
                group.volunteers,
                shift.name
            );
        }
        *already += headcount;

        for n in 1..=headcount {
            let id = VolunteerId::try_from(next_id).map_err(|_| SchedulerError::IdsExhausted {
                group: group.name.clone(),
            })?;
            let mut preferences = vec![String::new(); GROUP_PREFERENCE_SLOTS];
            preferences[0] = shift.name.clone();
            volunteers.push(
                Volunteer::new(id, format!("{} Volunteer {}", group.name, n))
                    .preferred(true)
                    .with_preferences(preferences),
            );
            next_id += 1;
        }
    }
    Ok(())
}
