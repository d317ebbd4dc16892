use crate::data::SchedulingOutput;
use std::fmt::Write;

/// Shift-centric listing: one line per shift, assigned volunteers tab-indented below.
pub fn render_shift_assignments(output: &SchedulingOutput) -> String {
    let mut text = String::new();
    for roster in &output.shifts {
        let _ = writeln!(text, "{}", roster.shift);
        for name in &roster.assigned {
            let _ = writeln!(text, "\t{}", name);
        }
    }
    text
}

pub fn render_summary(output: &SchedulingOutput) -> String {
    let s = &output.summary;
    let mut text = String::new();
    let _ = writeln!(text, "Staffing requirements covered: {:.1}%.", s.requirements_covered);
    let _ = writeln!(text, "Shifts fully covered: {:.1}%.", s.shifts_fully_covered);
    let _ = writeln!(text, "Volunteers assigned to a shift: {:.1}%.", s.volunteers_assigned);
    let _ = writeln!(
        text,
        "Preferred volunteers assigned to a shift: {:.1}%.",
        s.preferred_volunteers_assigned
    );
    let _ = writeln!(text, "Preference points realized: {:.1}%.", s.preference_points_realized);
    text
}

pub fn print_report(output: &SchedulingOutput) {
    print!("{}", render_shift_assignments(output));
    println!();
    print!("{}", render_summary(output));
}
