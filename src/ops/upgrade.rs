//! Per-type resource upgrades
//!
//! Dispatches an upgrade strategy by resource type: virtual machines get
//! their size/image updated and are PUT back, storage accounts and SQL
//! databases get their sku/service objective PATCHed, and anything else
//! falls back to tagging the resource as an upgrade candidate. Every
//! strategy stamps upgrade metadata tags so remediation is auditable from
//! the portal.

use crate::arm::{ArmClient, ResourceId};
use anyhow::Result;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};

const VM_API_VERSION: &str = "2023-03-01";
const STORAGE_API_VERSION: &str = "2023-01-01";
const SQL_API_VERSION: &str = "2021-11-01";
const GENERIC_API_VERSION: &str = "2021-04-01";

/// One entry of an upgrade request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpgradeItem {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub target_image: Option<String>,
    pub target_sku: Option<String>,
}

impl crate::batch::BatchTarget for UpgradeItem {
    fn resource_id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// Upgrade one resource according to its declared type.
pub async fn upgrade_resource(
    client: &ArmClient,
    token: &str,
    id: &ResourceId,
    item: &UpgradeItem,
) -> Result<Value> {
    let resource_type = item
        .resource_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Resource must have 'id' and 'type' properties"))?;

    match resource_type.to_lowercase().as_str() {
        "microsoft.compute/virtualmachines" => upgrade_virtual_machine(client, token, id, item).await,
        "microsoft.storage/storageaccounts" => upgrade_storage_account(client, token, id, item).await,
        "microsoft.sql/servers/databases" => upgrade_sql_database(client, token, id, item).await,
        _ => add_upgrade_tag(client, token, id).await,
    }
}

async fn upgrade_virtual_machine(
    client: &ArmClient,
    token: &str,
    id: &ResourceId,
    item: &UpgradeItem,
) -> Result<Value> {
    tracing::info!(resource = %id, "upgrading virtual machine");
    let url = client.resource_url(id.as_str(), VM_API_VERSION)?;
    let mut vm = client.get(&url, token).await?;

    if let Some(sku) = &item.target_sku {
        set_path(&mut vm, &["properties", "hardwareProfile", "vmSize"], json!(sku));
    }
    if let Some(image) = &item.target_image {
        set_path(
            &mut vm,
            &["properties", "storageProfile", "imageReference", "version"],
            json!(image),
        );
    }
    stamp_upgrade_tags(&mut vm);

    client.put(&url, token, &vm).await?;

    Ok(json!({
        "operation": "VM upgraded",
        "vmSize": item.target_sku,
        "imageVersion": item.target_image,
    }))
}

async fn upgrade_storage_account(
    client: &ArmClient,
    token: &str,
    id: &ResourceId,
    item: &UpgradeItem,
) -> Result<Value> {
    tracing::info!(resource = %id, "upgrading storage account");
    let url = client.resource_url(id.as_str(), STORAGE_API_VERSION)?;
    let mut account = client.get(&url, token).await?;

    if let Some(sku) = &item.target_sku {
        set_path(&mut account, &["sku", "name"], json!(sku));
    }
    stamp_upgrade_tags(&mut account);

    client.patch(&url, token, &account).await?;

    Ok(json!({
        "operation": "Storage Account upgraded",
        "sku": item.target_sku,
    }))
}

async fn upgrade_sql_database(
    client: &ArmClient,
    token: &str,
    id: &ResourceId,
    item: &UpgradeItem,
) -> Result<Value> {
    tracing::info!(resource = %id, "upgrading SQL database");
    let url = client.resource_url(id.as_str(), SQL_API_VERSION)?;
    let mut database = client.get(&url, token).await?;

    if let Some(sku) = &item.target_sku {
        set_path(
            &mut database,
            &["properties", "requestedServiceObjectiveName"],
            json!(sku),
        );
    }
    stamp_upgrade_tags(&mut database);

    client.patch(&url, token, &database).await?;

    Ok(json!({
        "operation": "SQL Database upgraded",
        "serviceObjective": item.target_sku,
    }))
}

/// Fallback for unknown resource types: mark the resource for manual
/// review, touching only its tags.
async fn add_upgrade_tag(client: &ArmClient, token: &str, id: &ResourceId) -> Result<Value> {
    tracing::info!(resource = %id, "tagging resource as upgrade candidate");
    let url = client.resource_url(id.as_str(), GENERIC_API_VERSION)?;
    let resource = client.get(&url, token).await?;

    let mut tags = resource.get("tags").cloned().unwrap_or(Value::Null);
    set_path_root(&mut tags, "upgrade-candidate", json!("true"));
    set_path_root(&mut tags, "identified-on", json!(Utc::now().to_rfc3339()));

    client.patch(&url, token, &json!({ "tags": tags })).await?;

    Ok(json!({
        "operation": "Upgrade tag added",
        "tags": tags,
    }))
}

fn stamp_upgrade_tags(resource: &mut Value) {
    set_path(resource, &["tags", "upgraded-on"], json!(Utc::now().to_rfc3339()));
    set_path(resource, &["tags", "upgrade-type"], json!("automated-upgrade"));
}

/// Set a nested field, creating intermediate objects as needed.
fn set_path(root: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut node = root;
    for key in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Some(obj) = node.as_object_mut() else {
            return;
        };
        node = obj.entry(*key).or_insert(Value::Null);
    }
    set_path_root(node, last, value);
}

fn set_path_root(node: &mut Value, key: &str, value: Value) {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Some(obj) = node.as_object_mut() {
        obj.insert(key.to_string(), value);
    }
}
