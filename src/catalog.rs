use crate::config::RotationConfig;
use crate::data::Shift;
use std::collections::HashMap;

/// Ordered set of shifts, addressable by position or by name.
#[derive(Debug, Clone, Default)]
pub struct ShiftCatalog {
    shifts: Vec<Shift>,
    positions: HashMap<String, usize>,
}

impl ShiftCatalog {
    /// Crosses every weekday with every period, weekday-major.
    pub fn from_rotation(rotation: &RotationConfig) -> Self {
        let shifts = rotation
            .weekdays
            .iter()
            .flat_map(|day| {
                rotation
                    .periods
                    .iter()
                    .map(move |p| Shift::new(format!("{} {}", day, p.name), p.required_volunteers))
            })
            .collect();
        Self::from_shifts(shifts)
    }

    /// Later duplicates of a name are dropped.
    pub fn from_shifts(shifts: Vec<Shift>) -> Self {
        let mut catalog = Self::default();
        for shift in shifts {
            if catalog.positions.contains_key(&shift.name) {
                log::warn!("Ignoring duplicate shift '{}'", shift.name);
                continue;
            }
            catalog.positions.insert(shift.name.clone(), catalog.shifts.len());
            catalog.shifts.push(shift);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Shift> {
        self.position(name).map(|i| &self.shifts[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn shift(&self, index: usize) -> Option<&Shift> {
        self.shifts.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shift> {
        self.shifts.iter()
    }

    pub fn max_capacity(&self) -> u32 {
        self.shifts
            .iter()
            .map(|s| s.required_volunteers)
            .max()
            .unwrap_or(0)
    }

    pub fn total_capacity(&self) -> u64 {
        self.shifts.iter().map(|s| s.required_volunteers as u64).sum()
    }
}
