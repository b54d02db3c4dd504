//! Classifier rule data
//!
//! The deprecation heuristics (cutoff dates, legacy version markers) are
//! business-rule data, not logic, so they live here and can be overridden
//! from the config file. Defaults match the published deprecation
//! guidance the rules were written against.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A site-config setting paired with the version substring that marks it
/// as end-of-life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeMarker {
    pub setting: String,
    pub version: String,
}

impl RuntimeMarker {
    fn new(setting: &str, version: &str) -> Self {
        Self {
            setting: setting.to_string(),
            version: version.to_string(),
        }
    }
}

/// Tunable rule data for the deprecation classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Substrings of an OS image version that mark it as legacy.
    pub legacy_os_markers: Vec<String>,
    /// Consumption-tier API Management services created before this date
    /// are considered legacy.
    pub apim_consumption_cutoff: NaiveDate,
    /// Standard_GRS storage accounts created before this date are
    /// considered legacy.
    pub storage_grs_cutoff: NaiveDate,
    /// SQL databases with a numeric service objective below this value are
    /// considered outdated.
    pub sql_service_objective_floor: i64,
    /// Function-app runtime settings and the versions that are end-of-life.
    pub legacy_runtimes: Vec<RuntimeMarker>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            legacy_os_markers: vec!["2016".to_string(), "2012".to_string()],
            apim_consumption_cutoff: NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap_or(NaiveDate::MIN),
            storage_grs_cutoff: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN),
            sql_service_objective_floor: 100,
            legacy_runtimes: vec![
                RuntimeMarker::new("netFrameworkVersion", "4.6"),
                RuntimeMarker::new("phpVersion", "5.6"),
                RuntimeMarker::new("pythonVersion", "3.6"),
            ],
        }
    }
}
