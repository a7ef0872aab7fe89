//! Resource types and their provider-qualified type strings.
//!
//! The mapping between [`ResourceType`] and `Namespace/typeName` strings is a
//! fixed table. Every non-scope resource type has exactly one entry; lookups
//! on the string side ignore ASCII case.

use crate::identity::IdentityError;
use std::fmt;
use std::str::FromStr;

/// The kinds of resources this client can address.
///
/// `Subscription` and `ResourceGroup` are scopes; every other variant is a
/// resource owned by a provider namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    /// A subscription scope.
    Subscription,
    /// A resource group scope.
    ResourceGroup,
    /// A virtual machine.
    VirtualMachine,
    /// A virtual machine scale set.
    VirtualMachineScaleSet,
    /// A managed disk.
    Disk,
    /// A network interface.
    NetworkInterface,
    /// A virtual network.
    VirtualNetwork,
    /// A network security group.
    NetworkSecurityGroup,
    /// A public IP address.
    PublicIpAddress,
    /// A load balancer.
    LoadBalancer,
    /// A storage account.
    StorageAccount,
    /// A key vault.
    KeyVault,
    /// A SQL server.
    SqlServer,
    /// A web site or function app.
    WebSite,
    /// An app service plan.
    AppServicePlan,
    /// An Application Insights component.
    ApplicationInsights,
    /// A Log Analytics workspace.
    LogAnalytics,
    /// A container registry.
    ContainerRegistry,
    /// A managed Kubernetes cluster.
    KubernetesCluster,
    /// A Cosmos DB account.
    CosmosDbAccount,
}

/// Provider-qualified type strings for every non-scope [`ResourceType`].
const PROVIDER_TYPES: &[(ResourceType, &str)] = &[
    (ResourceType::VirtualMachine, "Microsoft.Compute/virtualMachines"),
    (ResourceType::VirtualMachineScaleSet, "Microsoft.Compute/virtualMachineScaleSets"),
    (ResourceType::Disk, "Microsoft.Compute/disks"),
    (ResourceType::NetworkInterface, "Microsoft.Network/networkInterfaces"),
    (ResourceType::VirtualNetwork, "Microsoft.Network/virtualNetworks"),
    (ResourceType::NetworkSecurityGroup, "Microsoft.Network/networkSecurityGroups"),
    (ResourceType::PublicIpAddress, "Microsoft.Network/publicIPAddresses"),
    (ResourceType::LoadBalancer, "Microsoft.Network/loadBalancers"),
    (ResourceType::StorageAccount, "Microsoft.Storage/storageAccounts"),
    (ResourceType::KeyVault, "Microsoft.KeyVault/vaults"),
    (ResourceType::SqlServer, "Microsoft.Sql/servers"),
    (ResourceType::WebSite, "Microsoft.Web/sites"),
    (ResourceType::AppServicePlan, "Microsoft.Web/serverFarms"),
    (ResourceType::ApplicationInsights, "Microsoft.Insights/components"),
    (ResourceType::LogAnalytics, "Microsoft.OperationalInsights/workspaces"),
    (ResourceType::ContainerRegistry, "Microsoft.ContainerRegistry/registries"),
    (ResourceType::KubernetesCluster, "Microsoft.ContainerService/managedClusters"),
    (ResourceType::CosmosDbAccount, "Microsoft.DocumentDB/databaseAccounts"),
];

impl ResourceType {
    /// Every resource type, scopes first.
    pub const ALL: [Self; 20] = [
        Self::Subscription,
        Self::ResourceGroup,
        Self::VirtualMachine,
        Self::VirtualMachineScaleSet,
        Self::Disk,
        Self::NetworkInterface,
        Self::VirtualNetwork,
        Self::NetworkSecurityGroup,
        Self::PublicIpAddress,
        Self::LoadBalancer,
        Self::StorageAccount,
        Self::KeyVault,
        Self::SqlServer,
        Self::WebSite,
        Self::AppServicePlan,
        Self::ApplicationInsights,
        Self::LogAnalytics,
        Self::ContainerRegistry,
        Self::KubernetesCluster,
        Self::CosmosDbAccount,
    ];

    /// Returns `true` for the `Subscription` and `ResourceGroup` scopes.
    #[must_use]
    pub const fn is_scope(self) -> bool {
        matches!(self, Self::Subscription | Self::ResourceGroup)
    }

    /// Returns the provider-qualified type string, e.g.
    /// `Microsoft.Compute/virtualMachines`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnsupportedResourceType`] for scopes and for
    /// any type missing from the provider table.
    pub fn provider_type(self) -> Result<&'static str, IdentityError> {
        PROVIDER_TYPES
            .iter()
            .find(|(resource_type, _)| *resource_type == self)
            .map(|(_, provider_type)| *provider_type)
            .ok_or_else(|| IdentityError::UnsupportedResourceType {
                resource_type: self.to_string(),
            })
    }

    /// Returns the provider namespace, e.g. `Microsoft.Compute`.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceType::provider_type`].
    pub fn provider_namespace(self) -> Result<&'static str, IdentityError> {
        let provider_type = self.provider_type()?;
        Ok(split_provider_type(provider_type).0)
    }

    /// Returns the type name within the provider, e.g. `virtualMachines`.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceType::provider_type`].
    pub fn type_name(self) -> Result<&'static str, IdentityError> {
        let provider_type = self.provider_type()?;
        Ok(split_provider_type(provider_type).1)
    }

    /// Looks up the resource type for a provider-qualified type string,
    /// ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnsupportedResourceType`] if the string has
    /// no entry in the provider table.
    pub fn from_provider_type(provider_type: &str) -> Result<Self, IdentityError> {
        PROVIDER_TYPES
            .iter()
            .find(|(_, candidate)| candidate.eq_ignore_ascii_case(provider_type))
            .map(|(resource_type, _)| *resource_type)
            .ok_or_else(|| IdentityError::UnsupportedResourceType {
                resource_type: provider_type.to_string(),
            })
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Subscription => "Subscription",
            Self::ResourceGroup => "ResourceGroup",
            Self::VirtualMachine => "VirtualMachine",
            Self::VirtualMachineScaleSet => "VirtualMachineScaleSet",
            Self::Disk => "Disk",
            Self::NetworkInterface => "NetworkInterface",
            Self::VirtualNetwork => "VirtualNetwork",
            Self::NetworkSecurityGroup => "NetworkSecurityGroup",
            Self::PublicIpAddress => "PublicIpAddress",
            Self::LoadBalancer => "LoadBalancer",
            Self::StorageAccount => "StorageAccount",
            Self::KeyVault => "KeyVault",
            Self::SqlServer => "SqlServer",
            Self::WebSite => "WebSite",
            Self::AppServicePlan => "AppServicePlan",
            Self::ApplicationInsights => "ApplicationInsights",
            Self::LogAnalytics => "LogAnalytics",
            Self::ContainerRegistry => "ContainerRegistry",
            Self::KubernetesCluster => "KubernetesCluster",
            Self::CosmosDbAccount => "CosmosDbAccount",
        }
    }
}

/// Splits `Namespace/typeName` at the first slash.
fn split_provider_type(provider_type: &'static str) -> (&'static str, &'static str) {
    provider_type
        .split_once('/')
        .unwrap_or((provider_type, ""))
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceType {
    type Err = IdentityError;

    /// Accepts either the variant name (`VirtualMachine`) or the
    /// provider-qualified type string (`Microsoft.Compute/virtualMachines`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|resource_type| resource_type.name().eq_ignore_ascii_case(s))
            .map_or_else(|| Self::from_provider_type(s), Ok)
    }
}
