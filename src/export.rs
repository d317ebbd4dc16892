//! CSV exports of a solved schedule.

use crate::data::SchedulingOutput;
use crate::error::Result;
use csv::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SHIFT_FOCUSED_FILE: &str = "Shift-Focused Schedule.csv";
pub const VOLUNTEER_FOCUSED_FILE: &str = "Volunteer-Focused Schedule.csv";
pub const UNDERSTAFFED_NOTE: &str = "Warning: this shift is under-staffed.";

/// One row per shift: the shift, one column per possible volunteer, and a note.
pub fn write_shift_focused<W: Write>(output: &SchedulingOutput, writer: W) -> Result<()> {
    let width = output
        .shifts
        .iter()
        .map(|r| r.required_volunteers as usize)
        .max()
        .unwrap_or(0);

    let mut wtr = Writer::from_writer(writer);
    let mut header = vec!["Shift".to_string()];
    header.extend((1..=width).map(|n| format!("Volunteer {}", n)));
    header.push("Notes".to_string());
    wtr.write_record(&header)?;

    for roster in &output.shifts {
        let mut row = Vec::with_capacity(width + 2);
        row.push(roster.shift.clone());
        row.extend(roster.assigned.iter().cloned());
        row.resize(width + 1, String::new());
        row.push(if roster.understaffed {
            UNDERSTAFFED_NOTE.to_string()
        } else {
            String::new()
        });
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per volunteer: their shift or `Unassigned`.
pub fn write_volunteer_focused<W: Write>(output: &SchedulingOutput, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["Volunteer", "Assignment"])?;
    for volunteer in &output.volunteers {
        let assignment = volunteer.shift.as_deref().unwrap_or("Unassigned");
        wtr.write_record([volunteer.name.as_str(), assignment])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes both schedules into `dir`, creating it if needed.
pub fn export_schedules(output: &SchedulingOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let shift_path = dir.join(SHIFT_FOCUSED_FILE);
    write_shift_focused(output, std::fs::File::create(&shift_path)?)?;
    let volunteer_path = dir.join(VOLUNTEER_FOCUSED_FILE);
    write_volunteer_focused(output, std::fs::File::create(&volunteer_path)?)?;
    log::info!("Wrote schedules to {}", dir.display());
    Ok(vec![shift_path, volunteer_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObjectiveStrategy;
    use crate::data::{
        ObjectiveBreakdown, ShiftRoster, SolveStatus, SummaryStatistics, VolunteerAssignment,
    };

    fn output() -> SchedulingOutput {
        SchedulingOutput {
            status: SolveStatus::Optimal,
            strategy: ObjectiveStrategy::Weighted,
            objective: ObjectiveBreakdown::default(),
            shifts: vec![
                ShiftRoster {
                    shift: "Monday Breakfast".into(),
                    required_volunteers: 3,
                    assigned: vec!["Ada".into()],
                    understaffed: true,
                },
                ShiftRoster {
                    shift: "Monday Overnight".into(),
                    required_volunteers: 1,
                    assigned: vec!["Ben".into()],
                    understaffed: false,
                },
            ],
            volunteers: vec![
                VolunteerAssignment {
                    volunteer_id: 0,
                    name: "Ada".into(),
                    is_preferred: false,
                    shift: Some("Monday Breakfast".into()),
                },
                VolunteerAssignment {
                    volunteer_id: 1,
                    name: "Ben".into(),
                    is_preferred: true,
                    shift: Some("Monday Overnight".into()),
                },
                VolunteerAssignment {
                    volunteer_id: 2,
                    name: "Cy".into(),
                    is_preferred: false,
                    shift: None,
                },
            ],
            summary: SummaryStatistics::default(),
        }
    }

    #[test]
    fn shift_focused_pads_and_notes_understaffing() {
        let mut buf = Vec::new();
        write_shift_focused(&output(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Shift,Volunteer 1,Volunteer 2,Volunteer 3,Notes\n\
             Monday Breakfast,Ada,,,Warning: this shift is under-staffed.\n\
             Monday Overnight,Ben,,,\n"
        );
    }

    #[test]
    fn volunteer_focused_marks_unassigned() {
        let mut buf = Vec::new();
        write_volunteer_focused(&output(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Volunteer,Assignment\nAda,Monday Breakfast\nBen,Monday Overnight\nCy,Unassigned\n"
        );
    }

    #[test]
    fn exports_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exported_files");
        let paths = export_schedules(&output(), &out).unwrap();
        assert_eq!(paths.len(), 2);
        for path in paths {
            assert!(path.exists());
        }
        let volunteers = std::fs::read_to_string(out.join(VOLUNTEER_FOCUSED_FILE)).unwrap();
        assert!(volunteers.contains("Cy,Unassigned"));
    }
}
