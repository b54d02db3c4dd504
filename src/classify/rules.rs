//! Deprecation rule table
//!
//! An ordered list of (predicate, reason, action) rules evaluated
//! top-to-bottom with first-match-wins semantics. Predicates read the
//! loosely-typed resource records Resource Graph returns; comparisons are
//! case-insensitive to match the query language's `=~` / `contains`
//! operators. Rule data that is heuristic (cutoff dates, legacy version
//! markers) lives in [`ClassifierConfig`] rather than the predicates.

use super::config::ClassifierConfig;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// Verdict attached to a resource for the duration of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_deprecated: bool,
    pub reason: &'static str,
    pub recommended_action: &'static str,
}

impl Verdict {
    const CLEAN: Verdict = Verdict {
        is_deprecated: false,
        reason: "",
        recommended_action: "",
    };
}

/// A single deprecation rule.
pub struct Rule {
    pub name: &'static str,
    pub reason: &'static str,
    pub action: &'static str,
    matches: fn(&Value, &ClassifierConfig) -> bool,
}

/// The rule table, in evaluation order. First match wins.
pub const RULES: &[Rule] = &[
    Rule {
        name: "vm-old-os",
        reason: "Old OS version detected",
        action: "Upgrade to Windows Server 2019/2022 or latest Linux distribution",
        matches: vm_old_os,
    },
    Rule {
        name: "classic-storage",
        reason: "Classic resources are deprecated",
        action: "Migrate to ARM-based Storage Account",
        matches: classic_storage,
    },
    Rule {
        name: "classic-compute",
        reason: "Classic resources are deprecated",
        action: "Migrate to ARM-based Virtual Machine",
        matches: classic_compute,
    },
    Rule {
        name: "apim-legacy-consumption",
        reason: "Legacy consumption tier",
        action: "Consider upgrading to Developer or Standard tier",
        matches: apim_legacy_consumption,
    },
    Rule {
        name: "app-service-legacy-sku",
        reason: "Deprecated App Service SKU",
        action: "Upgrade to Standard or Premium tier",
        matches: app_service_legacy_sku,
    },
    Rule {
        name: "sql-old-objective",
        reason: "Old SQL compatibility level",
        action: "Update database compatibility level",
        matches: sql_old_objective,
    },
    Rule {
        name: "storage-legacy-redundancy",
        reason: "Legacy storage redundancy",
        action: "Consider Zone-redundant storage (ZRS) or Geo-zone-redundant (GZRS)",
        matches: storage_legacy_redundancy,
    },
    Rule {
        name: "functionapp-legacy-runtime",
        reason: "Deprecated runtime version",
        action: "Update to latest supported runtime version",
        matches: functionapp_legacy_runtime,
    },
];

/// Classify a single resource record. Pure function of its input.
pub fn classify(resource: &Value, config: &ClassifierConfig) -> Verdict {
    for rule in RULES {
        if (rule.matches)(resource, config) {
            return Verdict {
                is_deprecated: true,
                reason: rule.reason,
                recommended_action: rule.action,
            };
        }
    }
    Verdict::CLEAN
}

// --- predicate helpers ---------------------------------------------------

fn type_is(resource: &Value, expected: &str) -> bool {
    resource
        .get("type")
        .and_then(|v| v.as_str())
        .map(|t| t.eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

fn field<'a>(resource: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = resource;
    for part in path {
        current = current.get(part)?;
    }
    Some(current)
}

fn field_str<'a>(resource: &'a Value, path: &[&str]) -> Option<&'a str> {
    field(resource, path).and_then(|v| v.as_str())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn field_contains(resource: &Value, path: &[&str], needle: &str) -> bool {
    field_str(resource, path)
        .map(|value| contains_ci(value, needle))
        .unwrap_or(false)
}

/// True when the timestamp field parses and falls before the cutoff date.
fn created_before(resource: &Value, path: &[&str], cutoff: NaiveDate) -> bool {
    let Some(raw) = field_str(resource, path) else {
        return false;
    };

    let date = chrono::DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date < cutoff,
        Err(_) => false,
    }
}

// --- predicates ----------------------------------------------------------

fn vm_old_os(resource: &Value, config: &ClassifierConfig) -> bool {
    if !type_is(resource, "Microsoft.Compute/virtualMachines") {
        return false;
    }
    let version = ["properties", "storageProfile", "imageReference", "version"];
    let offer = ["properties", "storageProfile", "imageReference", "offer"];
    let sku = ["properties", "storageProfile", "imageReference", "sku"];

    let version_is_legacy = config
        .legacy_os_markers
        .iter()
        .any(|marker| field_contains(resource, &version, marker));
    let windows_2016 = field_contains(resource, &offer, "WindowsServer")
        && field_contains(resource, &sku, "2016");
    version_is_legacy || windows_2016
}

fn classic_storage(resource: &Value, _: &ClassifierConfig) -> bool {
    type_is(resource, "Microsoft.ClassicStorage/storageAccounts")
}

fn classic_compute(resource: &Value, _: &ClassifierConfig) -> bool {
    type_is(resource, "Microsoft.ClassicCompute/virtualMachines")
}

fn apim_legacy_consumption(resource: &Value, config: &ClassifierConfig) -> bool {
    type_is(resource, "Microsoft.ApiManagement/service")
        && field_str(resource, &["properties", "sku", "name"]) == Some("Consumption")
        && created_before(
            resource,
            &["properties", "createdAtUtc"],
            config.apim_consumption_cutoff,
        )
}

fn app_service_legacy_sku(resource: &Value, _: &ClassifierConfig) -> bool {
    type_is(resource, "Microsoft.Web/serverfarms")
        && (field_contains(resource, &["properties", "sku", "name"], "Basic")
            || field_contains(resource, &["properties", "sku", "name"], "Free"))
}

fn sql_old_objective(resource: &Value, config: &ClassifierConfig) -> bool {
    type_is(resource, "Microsoft.Sql/servers/databases")
        && field_str(resource, &["properties", "currentServiceObjectiveName"])
            .and_then(|objective| objective.parse::<i64>().ok())
            .map(|level| level < config.sql_service_objective_floor)
            .unwrap_or(false)
}

fn storage_legacy_redundancy(resource: &Value, config: &ClassifierConfig) -> bool {
    type_is(resource, "Microsoft.Storage/storageAccounts")
        && field_str(resource, &["properties", "sku", "name"]) == Some("Standard_GRS")
        && created_before(
            resource,
            &["properties", "createdTime"],
            config.storage_grs_cutoff,
        )
}

fn functionapp_legacy_runtime(resource: &Value, config: &ClassifierConfig) -> bool {
    if !type_is(resource, "Microsoft.Web/sites") {
        return false;
    }
    let is_function_app = resource
        .get("kind")
        .and_then(|v| v.as_str())
        .map(|kind| contains_ci(kind, "functionapp"))
        .unwrap_or(false);
    if !is_function_app {
        return false;
    }
    config.legacy_runtimes.iter().any(|runtime| {
        field_contains(
            resource,
            &["properties", "siteConfig", runtime.setting.as_str()],
            &runtime.version,
        )
    })
}
