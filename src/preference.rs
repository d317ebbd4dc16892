//! Preference scoring.
//!
//! A ranked list `[A, B, C]` scores `A = 3, B = 2, C = 1` and every other
//! shift 0. Preferred volunteers get double points. Placeholder entries count
//! toward the list length but never match a shift.

use crate::catalog::ShiftCatalog;
use crate::data::{PreferencePoints, Volunteer};

/// Points `volunteer` attaches to each catalog shift, by catalog position.
pub fn shift_preference_points(volunteer: &Volunteer, catalog: &ShiftCatalog) -> PreferencePoints {
    let list_length = volunteer.preferred_shifts.len() as u32;
    let multiplier = if volunteer.is_preferred { 2 } else { 1 };

    let points = catalog
        .iter()
        .map(|shift| {
            // first match wins if a shift is listed twice
            volunteer
                .preferred_shifts
                .iter()
                .position(|s| s == &shift.name)
                .map_or(0, |rank| (list_length - rank as u32) * multiplier)
        })
        .collect();
    PreferencePoints::new(points)
}

impl Volunteer {
    pub fn score_preferences(&mut self, catalog: &ShiftCatalog) {
        self.preference_points = shift_preference_points(self, catalog);
    }

    /// True only if the stored points are exactly what `catalog` yields, so
    /// points from another catalog of the same size are caught.
    pub fn is_scored_for(&self, catalog: &ShiftCatalog) -> bool {
        self.preference_points == shift_preference_points(self, catalog)
    }
}

pub fn score_all(volunteers: &mut [Volunteer], catalog: &ShiftCatalog) {
    for volunteer in volunteers.iter_mut() {
        volunteer.score_preferences(catalog);
    }
    log::debug!(
        "Scored preferences of {} volunteers over {} shifts",
        volunteers.len(),
        catalog.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotationConfig;
    use crate::data::Shift;

    fn abcd() -> ShiftCatalog {
        ShiftCatalog::from_shifts(vec![
            Shift::new("A", 1),
            Shift::new("B", 1),
            Shift::new("C", 1),
            Shift::new("D", 1),
        ])
    }

    #[test]
    fn ranks_decrease_from_list_length() {
        let v = Volunteer::new(0, "Ada").with_preferences(["A", "B", "C"]);
        let points = shift_preference_points(&v, &abcd());
        assert_eq!(points.as_slice(), &[3, 2, 1, 0]);
    }

    #[test]
    fn preferred_volunteers_get_double() {
        let v = Volunteer::new(0, "Ada")
            .preferred(true)
            .with_preferences(["A", "B", "C"]);
        let points = shift_preference_points(&v, &abcd());
        assert_eq!(points.as_slice(), &[6, 4, 2, 0]);
    }

    #[test]
    fn empty_list_scores_nothing() {
        let v = Volunteer::new(0, "Ada").preferred(true);
        let points = shift_preference_points(&v, &abcd());
        assert_eq!(points.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn placeholders_count_toward_length() {
        let v = Volunteer::new(0, "Group Volunteer 1")
            .preferred(true)
            .with_preferences(["C", "", "", "", ""]);
        let points = shift_preference_points(&v, &abcd());
        assert_eq!(points.as_slice(), &[0, 0, 10, 0]);
    }

    #[test]
    fn unknown_shifts_are_ignored() {
        let v = Volunteer::new(0, "Ada").with_preferences(["Nowhere", "B"]);
        let points = shift_preference_points(&v, &abcd());
        assert_eq!(points.as_slice(), &[0, 1, 0, 0]);
    }

    #[test]
    fn duplicates_use_the_first_position() {
        let v = Volunteer::new(0, "Ada").with_preferences(["B", "A", "B"]);
        let points = shift_preference_points(&v, &abcd());
        assert_eq!(points.get(1), 3);
        assert_eq!(points.get(0), 2);
    }

    #[test]
    fn one_entry_per_catalog_shift() {
        let catalog = ShiftCatalog::from_rotation(&RotationConfig::default());
        let mut volunteers = vec![
            Volunteer::new(0, "Ada").with_preferences(["Monday Dinner"]),
            Volunteer::new(1, "Ben"),
        ];
        score_all(&mut volunteers, &catalog);
        for v in &volunteers {
            assert!(v.is_scored_for(&catalog));
            assert_eq!(v.preference_points.len(), 28);
        }
        let monday_dinner = catalog.position("Monday Dinner").unwrap();
        assert_eq!(volunteers[0].preference_points.get(monday_dinner), 1);
        assert_eq!(volunteers[1].preference_points.max(), 0);
    }

    #[test]
    fn points_from_a_reordered_catalog_are_stale() {
        let forward = ShiftCatalog::from_shifts(vec![Shift::new("X", 1), Shift::new("Y", 1)]);
        let backward = ShiftCatalog::from_shifts(vec![Shift::new("Y", 1), Shift::new("X", 1)]);
        let mut v = Volunteer::new(0, "Ada").with_preferences(["X", "Y"]);
        v.score_preferences(&forward);

        assert!(v.is_scored_for(&forward));
        assert!(!v.is_scored_for(&backward));
        v.score_preferences(&backward);
        assert!(v.is_scored_for(&backward));
    }
}
