//! Category bucketing and scan summaries
//!
//! After per-resource classification, deprecated resources are bucketed
//! into five named categories by substring checks on the resource type and
//! produced reason, first match wins. The buckets and the count summary
//! are rebuilt from scratch on every scan; nothing here persists.

use serde::Serialize;
use serde_json::Value;

/// The fixed scan categories, in matching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Classic,
    OutdatedRuntime,
    LegacySku,
    OldVersions,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Classic => "classic",
            Category::OutdatedRuntime => "outdatedRuntime",
            Category::LegacySku => "legacySku",
            Category::OldVersions => "oldVersions",
            Category::Other => "other",
        }
    }
}

/// Bucket a classified resource by its type and deprecation reason.
pub fn categorize(resource_type: &str, reason: &str) -> Category {
    if resource_type.contains("Classic") {
        Category::Classic
    } else if reason.contains("runtime") || reason.contains("OS") {
        Category::OutdatedRuntime
    } else if reason.contains("SKU") || reason.contains("tier") {
        Category::LegacySku
    } else if reason.contains("version") || reason.contains("level") {
        Category::OldVersions
    } else {
        Category::Other
    }
}

/// Deprecated resources grouped by category.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedResources {
    pub classic: Vec<Value>,
    pub outdated_runtime: Vec<Value>,
    pub legacy_sku: Vec<Value>,
    pub old_versions: Vec<Value>,
    pub other: Vec<Value>,
}

impl CategorizedResources {
    pub fn push(&mut self, category: Category, resource: Value) {
        match category {
            Category::Classic => self.classic.push(resource),
            Category::OutdatedRuntime => self.outdated_runtime.push(resource),
            Category::LegacySku => self.legacy_sku.push(resource),
            Category::OldVersions => self.old_versions.push(resource),
            Category::Other => self.other.push(resource),
        }
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            classic: self.classic.len(),
            outdated_runtime: self.outdated_runtime.len(),
            legacy_sku: self.legacy_sku.len(),
            old_versions: self.old_versions.len(),
            other: self.other.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.classic.len()
            + self.outdated_runtime.len()
            + self.legacy_sku.len()
            + self.old_versions.len()
            + self.other.len()
    }
}

/// Per-category resource counts for the scan summary.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub classic: usize,
    pub outdated_runtime: usize,
    pub legacy_sku: usize,
    pub old_versions: usize,
    pub other: usize,
}

/// Summary block of a scan response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_found: usize,
    pub by_category: CategoryCounts,
    pub scan_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classic_type_wins_over_any_reason() {
        // A classic resource always lands in `classic`, whatever its reason
        assert_eq!(
            categorize("Microsoft.ClassicStorage/storageAccounts", "Old OS version detected"),
            Category::Classic
        );
    }

    #[test]
    fn reasons_map_to_expected_buckets() {
        assert_eq!(
            categorize("Microsoft.Compute/virtualMachines", "Old OS version detected"),
            Category::OutdatedRuntime
        );
        assert_eq!(
            categorize("Microsoft.Web/sites", "Deprecated runtime version"),
            Category::OutdatedRuntime
        );
        assert_eq!(
            categorize("Microsoft.Web/serverfarms", "Deprecated App Service SKU"),
            Category::LegacySku
        );
        assert_eq!(
            categorize("Microsoft.ApiManagement/service", "Legacy consumption tier"),
            Category::LegacySku
        );
        assert_eq!(
            categorize("Microsoft.Sql/servers/databases", "Old SQL compatibility level"),
            Category::OldVersions
        );
        assert_eq!(
            categorize("Microsoft.Storage/storageAccounts", "Legacy storage redundancy"),
            Category::Other
        );
    }

    #[test]
    fn counts_track_pushes() {
        let mut buckets = CategorizedResources::default();
        buckets.push(Category::Classic, json!({"name": "a"}));
        buckets.push(Category::Classic, json!({"name": "b"}));
        buckets.push(Category::Other, json!({"name": "c"}));

        let counts = buckets.counts();
        assert_eq!(counts.classic, 2);
        assert_eq!(counts.other, 1);
        assert_eq!(buckets.total(), 3);
    }

    #[test]
    fn buckets_serialize_with_camel_case_names() {
        let buckets = CategorizedResources::default();
        let value = serde_json::to_value(&buckets).unwrap();
        assert!(value.get("outdatedRuntime").is_some());
        assert!(value.get("legacySku").is_some());
        assert!(value.get("oldVersions").is_some());
    }
}
