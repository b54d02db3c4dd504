//! armsweep - find and remediate orphaned or deprecated Azure resources
//!
//! An HTTP API service that proxies calls to Azure Resource Manager and
//! Azure Resource Graph on behalf of an authenticated user, classifies
//! resources against an ordered deprecation rule table, and runs
//! delete/upgrade batches with bounded concurrent fan-out.

pub mod api;
pub mod arm;
pub mod batch;
pub mod classify;
pub mod config;
pub mod ops;
