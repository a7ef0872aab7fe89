//! Structured resource identities and their canonical string form.
//!
//! A [`ResourceIdentity`] addresses a subscription, a resource group, or a
//! provider resource. The canonical string form is one of three templates:
//!
//! - `/subscriptions/{subscriptionId}`
//! - `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}`
//! - `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/{namespace}/{typeName}/{resourceName}`
//!
//! Parsing tries the resource template first, then the resource group
//! template, then the subscription template. Each match is anchored at the
//! start of the string only, and a resource group id is a prefix of a
//! resource id, so the order matters.

use crate::identity::{IdentityError, ResourceType};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SUBSCRIPTIONS: &str = "subscriptions";
const RESOURCE_GROUPS: &str = "resourceGroups";
const PROVIDERS: &str = "providers";

/// The address of a subscription, resource group, or resource.
///
/// Identities are immutable values. Equality is structural and
/// case-sensitive on every field.
///
/// # Example
///
/// ```rust
/// use resource_manager::{ResourceIdentity, ResourceType};
///
/// let vm = ResourceIdentity::resource(
///     ResourceType::VirtualMachine,
///     "7904b7bd-5e6b-4415-99a8-355657b7da19",
///     "MyResourceGroupName",
///     "MyVM",
/// )
/// .unwrap();
///
/// let id = vm.to_canonical_string().unwrap();
/// assert_eq!(
///     id,
///     "/subscriptions/7904b7bd-5e6b-4415-99a8-355657b7da19/resourceGroups/MyResourceGroupName/providers/Microsoft.Compute/virtualMachines/MyVM"
/// );
/// assert_eq!(ResourceIdentity::parse(&id).unwrap(), vm);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    resource_type: ResourceType,
    subscription_id: String,
    resource_group_name: String,
    resource_name: String,
}

impl ResourceIdentity {
    /// Creates a subscription scope identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidIdentity`] if the subscription id is
    /// empty, contains `/`, or starts or ends with whitespace.
    pub fn subscription(subscription_id: impl Into<String>) -> Result<Self, IdentityError> {
        let subscription_id = subscription_id.into();
        validate_segment("subscription id", &subscription_id)?;

        Ok(Self {
            resource_type: ResourceType::Subscription,
            subscription_id,
            resource_group_name: String::new(),
            resource_name: String::new(),
        })
    }

    /// Creates a resource group scope identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidIdentity`] if either value is empty,
    /// contains `/`, or starts or ends with whitespace.
    pub fn resource_group(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let subscription_id = subscription_id.into();
        let resource_group_name = resource_group_name.into();
        validate_segment("subscription id", &subscription_id)?;
        validate_segment("resource group name", &resource_group_name)?;

        Ok(Self {
            resource_type: ResourceType::ResourceGroup,
            subscription_id,
            resource_group_name,
            resource_name: String::new(),
        })
    }

    /// Creates a provider resource identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidIdentity`] if `resource_type` is a
    /// scope, or if any value is empty, contains `/`, or starts or ends with
    /// whitespace.
    pub fn resource(
        resource_type: ResourceType,
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        if resource_type.is_scope() {
            return Err(IdentityError::InvalidIdentity {
                reason: format!("{resource_type} is a scope, not a provider resource"),
            });
        }

        let subscription_id = subscription_id.into();
        let resource_group_name = resource_group_name.into();
        let resource_name = resource_name.into();
        validate_segment("subscription id", &subscription_id)?;
        validate_segment("resource group name", &resource_group_name)?;
        validate_segment("resource name", &resource_name)?;

        Ok(Self {
            resource_type,
            subscription_id,
            resource_group_name,
            resource_name,
        })
    }

    /// Returns the resource type.
    #[must_use]
    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Returns the subscription id.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Returns the resource group name; empty for subscriptions.
    #[must_use]
    pub fn resource_group_name(&self) -> &str {
        &self.resource_group_name
    }

    /// Returns the resource name; empty for scopes.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Returns the enclosing scope: the resource group of a resource, the
    /// subscription of a resource group, or `None` for a subscription.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.resource_type {
            ResourceType::Subscription => None,
            ResourceType::ResourceGroup => Some(Self {
                resource_type: ResourceType::Subscription,
                subscription_id: self.subscription_id.clone(),
                resource_group_name: String::new(),
                resource_name: String::new(),
            }),
            _ => Some(Self {
                resource_type: ResourceType::ResourceGroup,
                subscription_id: self.subscription_id.clone(),
                resource_group_name: self.resource_group_name.clone(),
                resource_name: String::new(),
            }),
        }
    }

    /// Formats the identity as its canonical resource id string.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnsupportedResourceType`] if the resource
    /// type has no provider mapping.
    pub fn to_canonical_string(&self) -> Result<String, IdentityError> {
        match self.resource_type {
            ResourceType::Subscription => Ok(format!(
                "/{SUBSCRIPTIONS}/{}",
                self.subscription_id
            )),
            ResourceType::ResourceGroup => Ok(format!(
                "/{SUBSCRIPTIONS}/{}/{RESOURCE_GROUPS}/{}",
                self.subscription_id, self.resource_group_name
            )),
            resource_type => {
                let provider_type = resource_type.provider_type()?;
                Ok(format!(
                    "/{SUBSCRIPTIONS}/{}/{RESOURCE_GROUPS}/{}/{PROVIDERS}/{provider_type}/{}",
                    self.subscription_id, self.resource_group_name, self.resource_name
                ))
            }
        }
    }

    /// Parses a canonical resource id string.
    ///
    /// Template keywords match case-insensitively; field values keep their
    /// case. A trailing slash is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MalformedResourceId`] if no template matches,
    /// or [`IdentityError::UnsupportedResourceType`] if the resource template
    /// matches but its provider-qualified type is unknown.
    pub fn parse(id: &str) -> Result<Self, IdentityError> {
        let malformed = || IdentityError::MalformedResourceId { id: id.to_string() };

        let trimmed = id.trim();
        let path = trimmed.strip_prefix('/').ok_or_else(malformed)?;
        let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

        if let Some(identity) = Self::match_resource(&segments)? {
            return Ok(identity);
        }
        if let Some(identity) = Self::match_resource_group(&segments) {
            return Ok(identity);
        }
        if let Some(identity) = Self::match_subscription(&segments) {
            return Ok(identity);
        }

        Err(malformed())
    }

    /// `subscriptions/{s}/resourceGroups/{g}/providers/{ns}/{type}/{name}`
    fn match_resource(segments: &[&str]) -> Result<Option<Self>, IdentityError> {
        let [subscriptions, subscription_id, resource_groups, resource_group_name, providers, namespace, type_name, resource_name, ..] =
            segments
        else {
            return Ok(None);
        };

        let keywords_match = subscriptions.eq_ignore_ascii_case(SUBSCRIPTIONS)
            && resource_groups.eq_ignore_ascii_case(RESOURCE_GROUPS)
            && providers.eq_ignore_ascii_case(PROVIDERS);
        let values_present = [
            subscription_id,
            resource_group_name,
            namespace,
            type_name,
            resource_name,
        ]
        .iter()
        .all(|value| !value.is_empty());

        if !keywords_match || !values_present {
            return Ok(None);
        }

        let resource_type = ResourceType::from_provider_type(&format!("{namespace}/{type_name}"))?;

        Ok(Some(Self {
            resource_type,
            subscription_id: (*subscription_id).to_string(),
            resource_group_name: (*resource_group_name).to_string(),
            resource_name: (*resource_name).to_string(),
        }))
    }

    /// `subscriptions/{s}/resourceGroups/{g}`
    fn match_resource_group(segments: &[&str]) -> Option<Self> {
        let [subscriptions, subscription_id, resource_groups, resource_group_name, ..] = segments
        else {
            return None;
        };

        let matches = subscriptions.eq_ignore_ascii_case(SUBSCRIPTIONS)
            && resource_groups.eq_ignore_ascii_case(RESOURCE_GROUPS)
            && !subscription_id.is_empty()
            && !resource_group_name.is_empty();

        matches.then(|| Self {
            resource_type: ResourceType::ResourceGroup,
            subscription_id: (*subscription_id).to_string(),
            resource_group_name: (*resource_group_name).to_string(),
            resource_name: String::new(),
        })
    }

    /// `subscriptions/{s}`
    fn match_subscription(segments: &[&str]) -> Option<Self> {
        let [subscriptions, subscription_id, ..] = segments else {
            return None;
        };

        let matches = subscriptions.eq_ignore_ascii_case(SUBSCRIPTIONS) && !subscription_id.is_empty();

        matches.then(|| Self {
            resource_type: ResourceType::Subscription,
            subscription_id: (*subscription_id).to_string(),
            resource_group_name: String::new(),
            resource_name: String::new(),
        })
    }
}

fn validate_segment(field: &str, value: &str) -> Result<(), IdentityError> {
    if value.is_empty() {
        return Err(IdentityError::InvalidIdentity {
            reason: format!("{field} cannot be empty"),
        });
    }
    if value.contains('/') {
        return Err(IdentityError::InvalidIdentity {
            reason: format!("{field} '{value}' cannot contain '/'"),
        });
    }
    // Parsing trims the id, so edge whitespace would not survive a round trip.
    if value.trim() != value {
        return Err(IdentityError::InvalidIdentity {
            reason: format!("{field} '{value}' cannot start or end with whitespace"),
        });
    }
    Ok(())
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.to_canonical_string().map_err(|_| fmt::Error)?;
        f.write_str(&id)
    }
}

impl FromStr for ResourceIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ResourceIdentity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let id = self.to_canonical_string().map_err(ser::Error::custom)?;
        serializer.serialize_str(&id)
    }
}

impl<'de> Deserialize<'de> for ResourceIdentity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}
