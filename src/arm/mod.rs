//! Azure management-plane plumbing
//!
//! Everything needed to talk to Azure Resource Manager and Azure Resource
//! Graph on the caller's behalf.
//!
//! # Module Structure
//!
//! - [`auth`] - Bearer-token forwarding and token providers
//! - [`client`] - Main ARM client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//! - [`resource_id`] - Structured ARM resource id parsing
//!
//! # Example
//!
//! ```ignore
//! use crate::arm::client::ArmClient;
//!
//! async fn example(token: &str) -> anyhow::Result<()> {
//!     let client = ArmClient::new("https://management.azure.com", std::time::Duration::from_secs(30))?;
//!     let url = client.subscriptions_url("2020-01-01")?;
//!     let subscriptions = client.get(&url, token).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod resource_id;

pub use auth::{bearer_token, AuthError, ForwardedToken, TokenProvider};
pub use client::ArmClient;
pub use http::ArmError;
pub use resource_id::{InvalidResourceId, ResourceId};
