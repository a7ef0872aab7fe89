//! Integration tests for resource identities and the type registry.

use resource_manager::identity::IdentityError;
use resource_manager::{ErrorKind, ResourceIdentity, ResourceManagerError, ResourceType};

const SUB: &str = "7904b7bd-5e6b-4415-99a8-355657b7da19";

#[test]
fn test_virtual_machine_id_round_trips() {
    let id = format!(
        "/subscriptions/{SUB}/resourceGroups/MyResourceGroupName/providers/Microsoft.Compute/virtualMachines/MyVM"
    );

    let vm = ResourceIdentity::parse(&id).unwrap();
    assert_eq!(vm.resource_type(), ResourceType::VirtualMachine);
    assert_eq!(vm.subscription_id(), SUB);
    assert_eq!(vm.resource_group_name(), "MyResourceGroupName");
    assert_eq!(vm.resource_name(), "MyVM");
    assert_eq!(vm.to_canonical_string().unwrap(), id);
}

#[test]
fn test_every_mapped_type_round_trips() {
    let mapped = [
        ResourceType::VirtualMachine,
        ResourceType::VirtualMachineScaleSet,
        ResourceType::Disk,
        ResourceType::NetworkInterface,
        ResourceType::VirtualNetwork,
        ResourceType::NetworkSecurityGroup,
        ResourceType::PublicIpAddress,
        ResourceType::LoadBalancer,
        ResourceType::StorageAccount,
        ResourceType::KeyVault,
        ResourceType::SqlServer,
        ResourceType::WebSite,
        ResourceType::AppServicePlan,
        ResourceType::ApplicationInsights,
        ResourceType::LogAnalytics,
        ResourceType::ContainerRegistry,
        ResourceType::KubernetesCluster,
        ResourceType::CosmosDbAccount,
    ];

    for resource_type in mapped {
        let identity = ResourceIdentity::resource(resource_type, SUB, "rg", "name-1").unwrap();
        let canonical = identity.to_canonical_string().unwrap();
        let parsed = ResourceIdentity::parse(&canonical).unwrap();

        assert_eq!(parsed, identity, "round trip failed for {resource_type:?}");
        assert_eq!(
            ResourceType::from_provider_type(resource_type.provider_type().unwrap()).unwrap(),
            resource_type
        );
    }
}

#[test]
fn test_scope_identities_round_trip() {
    let subscription = ResourceIdentity::subscription(SUB).unwrap();
    assert_eq!(
        subscription.to_canonical_string().unwrap(),
        format!("/subscriptions/{SUB}")
    );
    assert_eq!(
        ResourceIdentity::parse(&format!("/subscriptions/{SUB}")).unwrap(),
        subscription
    );

    let group = ResourceIdentity::resource_group(SUB, "rg-app").unwrap();
    assert_eq!(
        group.to_canonical_string().unwrap(),
        format!("/subscriptions/{SUB}/resourceGroups/rg-app")
    );
    assert_eq!(group.parent(), Some(subscription));
}

#[test]
fn test_keywords_and_provider_types_match_case_insensitively() {
    let id = format!(
        "/SUBSCRIPTIONS/{SUB}/resourcegroups/Rg/PROVIDERS/microsoft.storage/STORAGEACCOUNTS/Logs/"
    );

    let parsed = ResourceIdentity::parse(&id).unwrap();
    assert_eq!(parsed.resource_type(), ResourceType::StorageAccount);
    assert_eq!(parsed.resource_group_name(), "Rg");
    assert_eq!(parsed.resource_name(), "Logs");
    assert_eq!(
        parsed.to_canonical_string().unwrap(),
        format!("/subscriptions/{SUB}/resourceGroups/Rg/providers/Microsoft.Storage/storageAccounts/Logs")
    );
}

#[test]
fn test_malformed_ids_are_rejected() {
    for id in [
        "",
        "subscriptions/abc",
        "/",
        "/tenants/abc",
        "/subscriptions/",
        "/subscriptions//resourceGroups/rg",
    ] {
        match ResourceIdentity::parse(id) {
            Err(IdentityError::MalformedResourceId { .. }) => {}
            other => panic!("expected malformed id for {id:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_unknown_provider_type_is_unsupported() {
    let id = format!("/subscriptions/{SUB}/resourceGroups/rg/providers/Contoso.Widgets/gadgets/g1");

    let err: ResourceManagerError = ResourceIdentity::parse(&id).unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::UnsupportedResourceType);
}

#[test]
fn test_scope_types_have_no_provider_mapping() {
    for scope in [ResourceType::Subscription, ResourceType::ResourceGroup] {
        assert!(scope.is_scope());
        assert!(matches!(
            scope.provider_type(),
            Err(IdentityError::UnsupportedResourceType { .. })
        ));
    }
}

#[test]
fn test_constructors_reject_invalid_segments() {
    assert!(ResourceIdentity::subscription("").is_err());
    assert!(ResourceIdentity::resource_group(SUB, "a/b").is_err());
    assert!(ResourceIdentity::resource(ResourceType::Disk, SUB, "rg", "").is_err());
    assert!(ResourceIdentity::resource(ResourceType::VirtualMachine, SUB, "rg", "vm ").is_err());
}

#[test]
fn test_display_matches_canonical_string() {
    let disk = ResourceIdentity::resource(ResourceType::Disk, SUB, "rg", "os-disk").unwrap();
    assert_eq!(disk.to_string(), disk.to_canonical_string().unwrap());

    let parsed: ResourceIdentity = disk.to_string().parse().unwrap();
    assert_eq!(parsed, disk);
}
