//! Provider metadata: the resource types a provider serves and the API
//! versions each type supports.

use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

use crate::config::ApiVersion;

/// Metadata for one resource provider namespace.
///
/// Resource type lookup is case-insensitive.
///
/// # Example
///
/// ```rust
/// use resource_manager::providers::ProviderMetadata;
///
/// let metadata = ProviderMetadata::new("Microsoft.Compute")
///     .with_type("virtualMachines", ["2019-01-01", "2021-06-01", "2020-03-01"]);
///
/// let latest = metadata.latest_version("VIRTUALMACHINES").unwrap();
/// assert_eq!(latest.as_str(), "2021-06-01");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderMetadata {
    namespace: String,
    resource_types: HashMap<String, ResourceTypeVersions>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ResourceTypeVersions {
    name: String,
    versions: BTreeSet<ApiVersion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderBody {
    namespace: String,
    #[serde(default)]
    resource_types: Vec<ResourceTypeBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceTypeBody {
    resource_type: String,
    #[serde(default)]
    api_versions: Vec<String>,
}

impl ProviderMetadata {
    /// Creates metadata for `namespace` with no resource types.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            resource_types: HashMap::new(),
        }
    }

    /// Adds versions for a resource type. Version strings that do not parse
    /// are skipped with a warning.
    #[must_use]
    pub fn with_type<I, S>(mut self, type_name: &str, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self
            .resource_types
            .entry(type_name.to_ascii_lowercase())
            .or_insert_with(|| ResourceTypeVersions {
                name: type_name.to_string(),
                versions: BTreeSet::new(),
            });

        for version in versions {
            let version = version.as_ref();
            match ApiVersion::new(version) {
                Ok(parsed) => {
                    entry.versions.insert(parsed);
                }
                Err(_) => tracing::warn!(
                    provider = %self.namespace,
                    resource_type = type_name,
                    version,
                    "skipping unparseable API version"
                ),
            }
        }
        self
    }

    /// Builds metadata from a provider response body:
    /// `{"namespace": "...", "resourceTypes": [{"resourceType": "...", "apiVersions": [...]}]}`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the body does not have that shape.
    pub fn from_json(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        let body: ProviderBody = serde_json::from_value(body)?;
        let metadata = body
            .resource_types
            .into_iter()
            .fold(Self::new(body.namespace), |metadata, rt| {
                metadata.with_type(&rt.resource_type, rt.api_versions)
            });
        Ok(metadata)
    }

    /// Returns the provider namespace as reported by the remote.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the number of resource types known for this provider.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.resource_types.len()
    }

    /// Returns `true` if `type_name` is listed (case-insensitive).
    #[must_use]
    pub fn has_type(&self, type_name: &str) -> bool {
        self.resource_types
            .contains_key(&type_name.to_ascii_lowercase())
    }

    /// Returns the resource type names in their original casing.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.resource_types.values().map(|rt| rt.name.as_str())
    }

    /// Returns all known versions of `type_name`, oldest first.
    #[must_use]
    pub fn versions(&self, type_name: &str) -> Option<&BTreeSet<ApiVersion>> {
        self.resource_types
            .get(&type_name.to_ascii_lowercase())
            .map(|rt| &rt.versions)
    }

    /// Returns the newest version of `type_name`, if the type is listed with
    /// at least one version.
    #[must_use]
    pub fn latest_version(&self, type_name: &str) -> Option<&ApiVersion> {
        self.versions(type_name).and_then(|versions| versions.last())
    }
}
