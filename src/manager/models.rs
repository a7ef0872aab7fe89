//! Values returned by [`super::ResourceManagerClient`].

use serde::Serialize;
use serde_json::Value;

use crate::config::ApiVersion;

/// The properties of a single resource, read at a specific API version.
///
/// `properties` is returned as-is: its schema depends on the resource type
/// and on `api_version`, so callers interpret it against the version that
/// was actually used.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProperties {
    /// The resource SKU, if the resource has one.
    pub sku: Option<Value>,
    /// The raw `properties` object; `Null` if the resource has none.
    pub properties: Value,
    /// The API version the resource was read with.
    pub api_version: ApiVersion,
}

impl ResourceProperties {
    /// Extracts SKU and properties from a resource body.
    #[must_use]
    pub fn from_body(body: &Value, api_version: ApiVersion) -> Self {
        let sku = body.get("sku").filter(|sku| !sku.is_null()).cloned();
        let properties = body.get("properties").cloned().unwrap_or(Value::Null);
        Self {
            sku,
            properties,
            api_version,
        }
    }

    /// Returns the SKU name (`sku.name`), if present.
    #[must_use]
    pub fn sku_name(&self) -> Option<&str> {
        self.sku
            .as_ref()
            .and_then(|sku| sku.get("name"))
            .and_then(Value::as_str)
    }
}
