//! Deprecation classification
//!
//! Decides whether a resource is deprecated, why, and what to do about it,
//! then groups findings into named categories.
//!
//! # Module Structure
//!
//! - [`config`] - Externalized rule data (cutoff dates, version markers)
//! - [`rules`] - The ordered rule table, first match wins
//! - [`bucket`] - Category bucketing and scan summaries

pub mod bucket;
pub mod config;
pub mod rules;

pub use bucket::{categorize, CategorizedResources, CategoryCounts, ScanSummary};
pub use config::ClassifierConfig;
pub use rules::{classify, Verdict, RULES};
