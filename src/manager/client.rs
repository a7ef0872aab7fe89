//! The resource manager client facade.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::clients::{HttpClient, HttpError, HttpRequest, HttpRequestBuilder, HttpResponse};
use crate::config::{AccessToken, ApiVersion, ManagerConfig};
use crate::error::ResourceManagerError;
use crate::identity::{IdentityError, ResourceIdentity, ResourceType};
use crate::manager::models::ResourceProperties;
use crate::pagination::{collect_all, Page};
use crate::providers::{ProviderMetadata, ProviderMetadataCache};
use crate::resilience::{ResilientInvoker, TelemetrySink};

/// Dependency name reported for every management API call.
pub const DEPENDENCY_NAME: &str = "ResourceManager";

const LIST_SUBSCRIPTIONS: &str = "ListSubscriptions";
const LIST_RESOURCE_GROUPS: &str = "ListResourceGroups";
const LIST_RESOURCES: &str = "ListResources";
const LIST_RESOURCES_IN_GROUP: &str = "ListResourcesInGroup";
const GET_PROVIDER: &str = "GetProviderMetadata";
const GET_RESOURCE_PROPERTIES: &str = "GetResourceProperties";

type ItemConverter<T> = fn(&str, &Value) -> Result<T, ResourceManagerError>;

/// Client for resource identity conversion, enumeration and property reads
/// against the management API.
///
/// Every remote call goes through a [`ResilientInvoker`], so it is retried
/// on transient failures, observes the caller's [`CancellationToken`], and
/// is reported to the telemetry sink. API versions for resource reads are
/// resolved through a [`ProviderMetadataCache`] owned by the client (or
/// injected with [`ResourceManagerClient::with_provider_cache`] to share one
/// cache between clients).
///
/// # Thread Safety
///
/// `ResourceManagerClient` is `Clone`, `Send` and `Sync`; clones share the
/// transport and the provider cache.
///
/// # Example
///
/// ```rust,no_run
/// use resource_manager::{AccessToken, ManagerConfig, ResourceManagerClient, ResourceType};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), resource_manager::ResourceManagerError> {
/// let token = AccessToken::new("eyJ0eXAi...").unwrap();
/// let client = ResourceManagerClient::new(ManagerConfig::default(), &token);
/// let cancel = CancellationToken::new();
///
/// for subscription in client.list_subscriptions(&cancel).await? {
///     let vms = client
///         .list_resources(&subscription, &[ResourceType::VirtualMachine], &cancel)
///         .await?;
///     for vm in vms {
///         let props = client.get_resource_properties(&vm, &cancel).await?;
///         println!("{vm} @ {}: {}", props.api_version, props.properties);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ResourceManagerClient {
    config: ManagerConfig,
    http: Arc<HttpClient>,
    invoker: ResilientInvoker,
    provider_cache: ProviderMetadataCache,
}

// Verify ResourceManagerClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceManagerClient>();
};

impl ResourceManagerClient {
    /// Creates a client with a fresh provider cache and the default
    /// `tracing` telemetry sink.
    #[must_use]
    pub fn new(config: ManagerConfig, token: &AccessToken) -> Self {
        let http = Arc::new(HttpClient::new(&config, token));
        let invoker = ResilientInvoker::new(DEPENDENCY_NAME, config.retry_policy().clone());
        Self {
            config,
            http,
            invoker,
            provider_cache: ProviderMetadataCache::new(),
        }
    }

    /// Replaces the telemetry sink.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.invoker = self.invoker.with_telemetry(telemetry);
        self
    }

    /// Replaces the provider cache, typically with a handle shared by other
    /// clients.
    #[must_use]
    pub fn with_provider_cache(mut self, cache: ProviderMetadataCache) -> Self {
        self.provider_cache = cache;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Returns the provider metadata cache.
    #[must_use]
    pub const fn provider_cache(&self) -> &ProviderMetadataCache {
        &self.provider_cache
    }

    /// Formats `identity` as its canonical resource id. No I/O.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedResourceType` identity error if the type has no
    /// provider mapping.
    pub fn resource_id(&self, identity: &ResourceIdentity) -> Result<String, ResourceManagerError> {
        Ok(identity.to_canonical_string()?)
    }

    /// Parses a canonical resource id. No I/O.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedResourceId` or `UnsupportedResourceType` identity
    /// error.
    pub fn parse_resource_id(&self, id: &str) -> Result<ResourceIdentity, ResourceManagerError> {
        Ok(ResourceIdentity::parse(id)?)
    }

    /// Lists the ids of all subscriptions visible to the token.
    ///
    /// # Errors
    ///
    /// - [`ResourceManagerError::TooManyResults`] if the listing reaches
    ///   the configured bound
    /// - [`ResourceManagerError::DependencyFailure`] if a page fetch fails
    /// - [`ResourceManagerError::InvalidResponse`] if an item has no
    ///   `subscriptionId`
    /// - [`ResourceManagerError::Cancelled`]
    pub async fn list_subscriptions(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, ResourceManagerError> {
        let request =
            HttpRequest::builder("/subscriptions").api_version(self.config.subscriptions_api_version());
        let request = self.build(LIST_SUBSCRIPTIONS, request)?;

        let subscriptions = self
            .enumerate(LIST_SUBSCRIPTIONS, "subscriptions", request, subscription_item, cancel)
            .await?;
        self.track_listing(LIST_SUBSCRIPTIONS, "tenant", subscriptions.len());
        Ok(subscriptions)
    }

    /// Lists the resource groups of a subscription.
    ///
    /// # Errors
    ///
    /// - An identity error if `subscription_id` is empty or contains `/`, or
    ///   if a returned id does not parse
    /// - Otherwise as [`ResourceManagerClient::list_subscriptions`]
    pub async fn list_resource_groups(
        &self,
        subscription_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResourceIdentity>, ResourceManagerError> {
        let scope = ResourceIdentity::subscription(subscription_id)?;
        let path = format!(
            "/subscriptions/{}/resourcegroups",
            urlencoding::encode(scope.subscription_id())
        );
        let request = HttpRequest::builder(path).api_version(self.config.resources_api_version());
        let request = self.build(LIST_RESOURCE_GROUPS, request)?;

        let label = format!("resource groups in subscription {subscription_id}");
        let groups = self
            .enumerate(LIST_RESOURCE_GROUPS, &label, request, identity_item, cancel)
            .await?;
        self.track_listing(LIST_RESOURCE_GROUPS, subscription_id, groups.len());
        Ok(groups)
    }

    /// Lists the resources of the given types in a subscription.
    ///
    /// An empty `resource_types` slice selects nothing and returns an empty
    /// list without calling the remote.
    ///
    /// # Errors
    ///
    /// - `UnsupportedResourceType` before any I/O if a type has no provider
    ///   mapping (this includes the scope types)
    /// - Otherwise as [`ResourceManagerClient::list_resource_groups`]
    pub async fn list_resources(
        &self,
        subscription_id: &str,
        resource_types: &[ResourceType],
        cancel: &CancellationToken,
    ) -> Result<Vec<ResourceIdentity>, ResourceManagerError> {
        let filter = resource_type_filter(resource_types)?;
        let scope = ResourceIdentity::subscription(subscription_id)?;
        let Some(filter) = filter else {
            return Ok(Vec::new());
        };

        let path = format!(
            "/subscriptions/{}/resources",
            urlencoding::encode(scope.subscription_id())
        );
        let label = format!("resources in subscription {subscription_id}");
        let resources = self
            .list_filtered(LIST_RESOURCES, &label, path, filter, cancel)
            .await?;
        self.track_listing(LIST_RESOURCES, subscription_id, resources.len());
        Ok(resources)
    }

    /// Lists the resources of the given types in one resource group.
    ///
    /// # Errors
    ///
    /// As [`ResourceManagerClient::list_resources`], plus an identity error
    /// if `resource_group_name` is empty or contains `/`.
    pub async fn list_resources_in_group(
        &self,
        subscription_id: &str,
        resource_group_name: &str,
        resource_types: &[ResourceType],
        cancel: &CancellationToken,
    ) -> Result<Vec<ResourceIdentity>, ResourceManagerError> {
        let filter = resource_type_filter(resource_types)?;
        let scope = ResourceIdentity::resource_group(subscription_id, resource_group_name)?;
        let Some(filter) = filter else {
            return Ok(Vec::new());
        };

        let path = format!(
            "/subscriptions/{}/resourceGroups/{}/resources",
            urlencoding::encode(scope.subscription_id()),
            urlencoding::encode(scope.resource_group_name())
        );
        let label = format!("resources in resource group {subscription_id}/{resource_group_name}");
        let resources = self
            .list_filtered(LIST_RESOURCES_IN_GROUP, &label, path, filter, cancel)
            .await?;
        self.track_listing(
            LIST_RESOURCES_IN_GROUP,
            &format!("{subscription_id}/{resource_group_name}"),
            resources.len(),
        );
        Ok(resources)
    }

    /// Reads a resource's SKU and properties at the newest API version its
    /// provider supports for the resource type.
    ///
    /// The version is resolved through the provider cache; the provider is
    /// fetched (in the resource's subscription) only on a cache miss.
    ///
    /// # Errors
    ///
    /// - `UnsupportedResourceType` before any I/O for scope identities and
    ///   unmapped types
    /// - [`ResourceManagerError::UnsupportedProviderType`] if the provider
    ///   lists no version for the type
    /// - [`ResourceManagerError::DependencyFailure`],
    ///   [`ResourceManagerError::InvalidResponse`] or
    ///   [`ResourceManagerError::Cancelled`] from the remote calls
    pub async fn get_resource_properties(
        &self,
        identity: &ResourceIdentity,
        cancel: &CancellationToken,
    ) -> Result<ResourceProperties, ResourceManagerError> {
        let resource_type = identity.resource_type();
        let provider_type = resource_type.provider_type()?;
        let namespace = resource_type.provider_namespace()?;
        let type_name = resource_type.type_name()?;

        let api_version = self
            .resolve_api_version(identity.subscription_id(), namespace, type_name, cancel)
            .await?;

        let path = format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{provider_type}/{}",
            urlencoding::encode(identity.subscription_id()),
            urlencoding::encode(identity.resource_group_name()),
            urlencoding::encode(identity.resource_name())
        );
        let request = self.build(
            GET_RESOURCE_PROPERTIES,
            HttpRequest::builder(path).api_version(&api_version),
        )?;

        let response = self.send(GET_RESOURCE_PROPERTIES, request, cancel).await?;
        Ok(ResourceProperties::from_body(&response.body, api_version))
    }

    /// Resolves the newest API version `namespace` supports for `type_name`,
    /// fetching provider metadata from `subscription_id` on a cache miss.
    ///
    /// # Errors
    ///
    /// As [`ProviderMetadataCache::resolve_version`], with fetch failures
    /// reported as [`ResourceManagerError::DependencyFailure`] or
    /// [`ResourceManagerError::InvalidResponse`].
    pub async fn resolve_api_version(
        &self,
        subscription_id: &str,
        namespace: &str,
        type_name: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiVersion, ResourceManagerError> {
        self.provider_cache
            .resolve_version(namespace, type_name, || {
                self.fetch_provider_metadata(subscription_id, namespace, cancel)
            })
            .await
    }

    async fn fetch_provider_metadata(
        &self,
        subscription_id: &str,
        namespace: &str,
        cancel: &CancellationToken,
    ) -> Result<ProviderMetadata, ResourceManagerError> {
        let path = format!(
            "/subscriptions/{}/providers/{}",
            urlencoding::encode(subscription_id),
            urlencoding::encode(namespace)
        );
        let request = self.build(
            GET_PROVIDER,
            HttpRequest::builder(path).api_version(self.config.resources_api_version()),
        )?;

        let response = self.send(GET_PROVIDER, request, cancel).await?;
        ProviderMetadata::from_json(response.body)
            .map_err(|e| invalid_response(GET_PROVIDER, e.to_string()))
    }

    async fn list_filtered(
        &self,
        command: &'static str,
        label: &str,
        path: String,
        filter: String,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResourceIdentity>, ResourceManagerError> {
        let request = HttpRequest::builder(path)
            .api_version(self.config.resources_api_version())
            .query_param("$filter", filter);
        let request = self.build(command, request)?;
        self.enumerate(command, label, request, identity_item, cancel)
            .await
    }

    async fn enumerate<T>(
        &self,
        command: &'static str,
        label: &str,
        first_request: HttpRequest,
        convert: ItemConverter<T>,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, ResourceManagerError> {
        collect_all(
            move || self.fetch_page(command, first_request, convert, cancel),
            move |next_link| async move {
                let request = self.build(command, HttpRequest::builder(next_link))?;
                self.fetch_page(command, request, convert, cancel).await
            },
            self.config.max_items(),
            label,
            cancel,
        )
        .await
    }

    async fn fetch_page<T>(
        &self,
        command: &str,
        request: HttpRequest,
        convert: ItemConverter<T>,
        cancel: &CancellationToken,
    ) -> Result<Page<T>, ResourceManagerError> {
        let response = self.send(command, request, cancel).await?;
        let items = response
            .items()
            .ok_or_else(|| invalid_response(command, "response has no 'value' array"))?
            .iter()
            .map(|item| convert(command, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, response.next_link().map(str::to_string)))
    }

    async fn send(
        &self,
        command: &str,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, ResourceManagerError> {
        let http = &self.http;
        let request = &request;
        self.invoker
            .invoke(command, cancel, move || http.request(request.clone()))
            .await
    }

    fn build(
        &self,
        command: &str,
        builder: HttpRequestBuilder,
    ) -> Result<HttpRequest, ResourceManagerError> {
        builder
            .build()
            .map_err(|e| ResourceManagerError::DependencyFailure {
                dependency: self.invoker.dependency().to_string(),
                command: command.to_string(),
                attempts: 0,
                source: HttpError::from(e),
            })
    }

    fn track_listing(&self, command: &str, scope: &str, count: usize) {
        let mut properties = BTreeMap::new();
        properties.insert("scope".to_string(), scope.to_string());
        properties.insert("count".to_string(), count.to_string());
        self.invoker.telemetry().track_event(command, &properties);
    }
}

/// Builds `resourceType eq 'A' or resourceType eq 'B'` from the distinct
/// provider types of `resource_types`, or `None` for an empty selection.
fn resource_type_filter(resource_types: &[ResourceType]) -> Result<Option<String>, IdentityError> {
    let mut provider_types: Vec<&'static str> = Vec::with_capacity(resource_types.len());
    for resource_type in resource_types {
        let provider_type = resource_type.provider_type()?;
        if !provider_types.contains(&provider_type) {
            provider_types.push(provider_type);
        }
    }

    if provider_types.is_empty() {
        return Ok(None);
    }

    let clauses: Vec<String> = provider_types
        .iter()
        .map(|provider_type| format!("resourceType eq '{provider_type}'"))
        .collect();
    Ok(Some(clauses.join(" or ")))
}

fn identity_item(command: &str, item: &Value) -> Result<ResourceIdentity, ResourceManagerError> {
    let id = item
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_response(command, "list item has no 'id'"))?;
    Ok(ResourceIdentity::parse(id)?)
}

fn subscription_item(command: &str, item: &Value) -> Result<String, ResourceManagerError> {
    item.get("subscriptionId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| invalid_response(command, "list item has no 'subscriptionId'"))
}

fn invalid_response(command: &str, reason: impl Into<String>) -> ResourceManagerError {
    ResourceManagerError::InvalidResponse {
        command: command.to_string(),
        reason: reason.into(),
    }
}
