//! Run configuration.
//!
//! Everything that used to be a fixed constant (the weekly rotation, the
//! objective weights, the HiGHS options, the listen address) lives here and
//! can be loaded from a JSON file. Missing sections fall back to the
//! standard week.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    pub rotation: RotationConfig,
    pub objective: ObjectiveConfig,
    pub solver: SolverConfig,
    pub server: ServerConfig,
}

impl SchedulerConfig {
    /// Reads a JSON config file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let config = serde_json::from_str(&raw)?;
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

/// A period within a day and the number of volunteers it needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodConfig {
    pub name: String,
    pub required_volunteers: u32,
}

impl PeriodConfig {
    pub fn new(name: impl Into<String>, required_volunteers: u32) -> Self {
        Self {
            name: name.into(),
            required_volunteers,
        }
    }
}

/// The recurring rotation: every weekday is crossed with every period.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RotationConfig {
    pub weekdays: Vec<String>,
    pub periods: Vec<PeriodConfig>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        let weekdays = [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ];
        Self {
            weekdays: weekdays.iter().map(|d| d.to_string()).collect(),
            periods: vec![
                PeriodConfig::new("Breakfast", 3),
                PeriodConfig::new("Dinner", 3),
                PeriodConfig::new("Evening", 3),
                PeriodConfig::new("Overnight", 1),
            ],
        }
    }
}

/// How the coverage and preference goals are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectiveStrategy {
    /// One solve over `coverage_weight * coverage + preference_weight * preference`.
    Weighted,
    /// Maximise coverage first, then preference with coverage held at its optimum.
    #[default]
    Lexicographic,
}

impl std::str::FromStr for ObjectiveStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weighted" => Ok(Self::Weighted),
            "lexicographic" => Ok(Self::Lexicographic),
            other => Err(format!(
                "unknown objective strategy '{other}' (expected 'weighted' or 'lexicographic')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectiveConfig {
    pub strategy: ObjectiveStrategy,
    pub coverage_weight: u32,
    pub preference_weight: u32,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            strategy: ObjectiveStrategy::default(),
            coverage_weight: 10,
            preference_weight: 1,
        }
    }
}

/// Options handed to HiGHS for every solve.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    pub threads: u32,
    pub random_seed: u32,
    pub time_limit_secs: Option<f64>,
    pub log_to_console: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threads: 1, // reproducibility
            random_seed: 1234,
            time_limit_secs: None,
            log_to_console: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_describe_the_standard_week() {
        let config = SchedulerConfig::default();
        assert_eq!(config.rotation.weekdays.len(), 7);
        assert_eq!(config.rotation.weekdays[0], "Sunday");
        let capacities: Vec<u32> = config
            .rotation
            .periods
            .iter()
            .map(|p| p.required_volunteers)
            .collect();
        assert_eq!(capacities, vec![3, 3, 3, 1]);
        assert_eq!(config.objective.coverage_weight, 10);
        assert_eq!(config.objective.preference_weight, 1);
        assert_eq!(config.objective.strategy, ObjectiveStrategy::Lexicographic);
        assert_eq!(config.solver.threads, 1);
        assert_eq!(config.server.bind, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "rotation": {{ "weekdays": ["Monday"], "periods": [{{ "name": "Lunch", "requiredVolunteers": 2 }}] }},
                "objective": {{ "strategy": "weighted" }}
            }}"#
        )
        .unwrap();

        let config = SchedulerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.rotation.weekdays, vec!["Monday".to_string()]);
        assert_eq!(config.rotation.periods, vec![PeriodConfig::new("Lunch", 2)]);
        assert_eq!(config.objective.strategy, ObjectiveStrategy::Weighted);
        assert_eq!(config.objective.coverage_weight, 10);
        assert_eq!(config.solver.random_seed, 1234);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = SchedulerConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, crate::error::SchedulerError::Json(_)));
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!(
            "Weighted".parse::<ObjectiveStrategy>(),
            Ok(ObjectiveStrategy::Weighted)
        );
        assert_eq!(
            "LEXICOGRAPHIC".parse::<ObjectiveStrategy>(),
            Ok(ObjectiveStrategy::Lexicographic)
        );
        assert!("greedy".parse::<ObjectiveStrategy>().is_err());
    }
}
