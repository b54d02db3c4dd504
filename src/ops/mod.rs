//! Remote operations
//!
//! One module per management-plane operation the API exposes. Each is a
//! thin async function over [`crate::arm::ArmClient`]; HTTP concerns stay
//! in `api`, classification logic in `classify`.
//!
//! - [`orphaned`] - enumerate all resources across subscriptions
//! - [`disks`] - the fixed unattached-disk Resource Graph query
//! - [`scan`] - deprecation scan: query, classify, bucket
//! - [`delete`] - per-resource deletion
//! - [`upgrade`] - per-type upgrade strategies

pub mod delete;
pub mod disks;
pub mod orphaned;
pub mod scan;
pub mod upgrade;
