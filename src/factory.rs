use crate::aws::client::{AnyServiceClient, ServiceClient, ServiceKind};
use crate::aws::credentials::{AccessContext, CredentialStore, STORED_PROVIDER_NAME};
use crate::aws::endpoint::{Endpoint, pattern_for};
use crate::config::{ClientConfiguration, SignerOverride};
use crate::error::FactoryError;
use crate::validation::{DEFAULT_REGION, is_blank, normalize_region};
use crate::version::{BuildVersion, VersionReporter, user_agent};
use aws_config::meta::credentials::CredentialsProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;

/// Where a factory's credentials provider came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Environment, profile files, then instance metadata
    Ambient,
    /// A stored credential, by id
    Stored(String),
}

/// Turns a credential id and a region into a [`ClientFactory`]
pub struct CredentialResolver<'a> {
    store: &'a dyn CredentialStore,
    context: AccessContext,
    version: Box<dyn VersionReporter + 'a>,
    base: ClientConfiguration,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(store: &'a dyn CredentialStore) -> Self {
        Self {
            store,
            context: AccessContext::System,
            version: Box::new(BuildVersion),
            base: ClientConfiguration::default(),
        }
    }

    pub fn access_context(mut self, context: AccessContext) -> Self {
        self.context = context;
        self
    }

    pub fn version_reporter(mut self, reporter: impl VersionReporter + 'a) -> Self {
        self.version = Box::new(reporter);
        self
    }

    /// Transport settings to start from. The user agent is always replaced.
    pub fn base_configuration(mut self, configuration: ClientConfiguration) -> Self {
        self.base = configuration;
        self
    }

    /// Resolve credentials and region into a factory
    ///
    /// A blank or absent `credentials_id` selects the store's ambient chain.
    /// Otherwise the stored credential with that id must exist and be visible
    /// to the resolver's access context.
    pub fn resolve(
        &self,
        credentials_id: Option<&str>,
        region: &str,
    ) -> Result<ClientFactory, FactoryError> {
        let (credentials, source) = match credentials_id {
            Some(id) if !is_blank(Some(id)) => {
                let stored = self
                    .store
                    .lookup(id, &self.context)
                    .ok_or_else(|| FactoryError::CredentialNotFound(id.to_string()))?;

                let chain =
                    CredentialsProviderChain::first_try(STORED_PROVIDER_NAME, stored.to_credentials());
                (
                    SharedCredentialsProvider::new(chain),
                    CredentialSource::Stored(id.to_string()),
                )
            }
            _ => (self.store.ambient_chain(), CredentialSource::Ambient),
        };

        let base_configuration = self
            .base
            .clone()
            .with_user_agent(user_agent(&*self.version));
        let region = normalize_region(region);

        tracing::info!(
            region = %region,
            source = ?source,
            "resolved AWS client factory"
        );

        Ok(ClientFactory {
            credentials,
            source,
            base_configuration,
            region,
        })
    }
}

/// Immutable context every service client is built from
#[derive(Debug, Clone)]
pub struct ClientFactory {
    credentials: SharedCredentialsProvider,
    source: CredentialSource,
    base_configuration: ClientConfiguration,
    region: String,
}

impl ClientFactory {
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn credential_source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn credentials_provider(&self) -> &SharedCredentialsProvider {
        &self.credentials
    }

    pub fn base_configuration(&self) -> &ClientConfiguration {
        &self.base_configuration
    }

    pub fn is_default_region(&self) -> bool {
        self.region == DEFAULT_REGION
    }

    /// Copy of the base configuration with the signer set for `kind`.
    /// Non-storage kinds get the override cleared, whatever the template holds.
    pub fn configuration_for(&self, kind: ServiceKind) -> ClientConfiguration {
        let signer = kind.is_storage().then_some(SignerOverride::S3V4);
        self.base_configuration.clone().with_signer_override(signer)
    }

    /// Build a client of type `C` for this factory's credentials and region
    pub fn build<C: ServiceClient>(&self) -> Result<C, FactoryError> {
        let configuration = self.configuration_for(C::KIND);
        let mut client = C::new(self.credentials.clone(), configuration)?;
        debug_assert_eq!(
            client.kind(),
            C::KIND,
            "{} reports a kind other than its KIND",
            client.service_name()
        );

        tracing::debug!(
            service = client.service_name(),
            region = %self.region,
            signer = ?client.configuration().signer_override,
            "constructed service client"
        );

        if self.is_default_region() {
            return Ok(client);
        }

        match pattern_for(client.kind()) {
            Some(pattern) => {
                let endpoint = pattern.endpoint_for(&self.region)?;
                tracing::debug!(
                    service = client.service_name(),
                    endpoint = %endpoint,
                    "using regional endpoint"
                );
                client.set_endpoint(endpoint);
            }
            None => {
                tracing::debug!(
                    service = client.service_name(),
                    region = %self.region,
                    "no regional endpoint pattern, keeping default endpoint"
                );
            }
        }

        Ok(client)
    }

    /// Endpoint configured on `client`, or `None` if it does not expose one
    pub fn endpoint_of<C: AnyServiceClient + ?Sized>(&self, client: &C) -> Option<String> {
        client.endpoint().map(|endpoint| endpoint.as_str().to_string())
    }

    /// Shared SDK configuration for this factory's region and credentials
    pub fn sdk_config(&self) -> SdkConfig {
        self.build_sdk_config(&self.base_configuration, &self.credentials, None)
    }

    /// SDK configuration matching a built client, including its endpoint
    pub fn sdk_config_for<C: AnyServiceClient + ?Sized>(&self, client: &C) -> SdkConfig {
        self.build_sdk_config(client.configuration(), client.credentials(), client.endpoint())
    }

    fn build_sdk_config(
        &self,
        configuration: &ClientConfiguration,
        credentials: &SharedCredentialsProvider,
        endpoint: Option<&Endpoint>,
    ) -> SdkConfig {
        let timeouts = TimeoutConfig::builder()
            .connect_timeout(configuration.connection_timeout)
            .read_timeout(configuration.socket_timeout)
            .build();

        let mut builder = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(credentials.clone())
            .timeout_config(timeouts)
            .retry_config(
                RetryConfig::standard().with_max_attempts(configuration.max_error_retry + 1),
            );

        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint.as_str());
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::client::{
        ElasticBeanstalkClient, IamClient, S3Client, S3EncryptionClient, SsmClient,
    };
    use crate::aws::credentials::{
        CredentialScope, FileCredentialStore, InMemoryCredentialStore, StoredCredential,
    };
    use crate::aws::endpoint::ENDPOINT_PATTERNS;
    use crate::error::ConstructionError;
    use aws_credential_types::Credentials;
    use aws_credential_types::provider::ProvideCredentials;
    use std::time::Duration;
    use tempfile::TempDir;

    fn store() -> InMemoryCredentialStore {
        let ambient = Credentials::new("AKIAAMBIENT", "ambient-secret", None, None, "ambient");
        InMemoryCredentialStore::new()
            .with_ambient(SharedCredentialsProvider::new(ambient))
            .with_credential(StoredCredential::new("deployer", "AKIADEPLOYER", "deployer-secret"))
            .with_credential(
                StoredCredential::new("ops-only", "AKIAOPS", "ops-secret")
                    .with_scope(CredentialScope::System),
            )
    }

    fn resolver(store: &InMemoryCredentialStore) -> CredentialResolver<'_> {
        CredentialResolver::new(store).version_reporter(|| "1.2.3".to_string())
    }

    #[test]
    fn test_blank_id_uses_ambient_chain() {
        let store = store();
        for id in [None, Some(""), Some("   ")] {
            let factory = resolver(&store).resolve(id, "us-east-1").unwrap();
            assert_eq!(factory.credential_source(), &CredentialSource::Ambient);
        }
    }

    #[test]
    fn test_unknown_id_is_credential_not_found() {
        let store = store();
        let err = resolver(&store).resolve(Some("bad-id"), "us-east-1").unwrap_err();
        assert!(matches!(err, FactoryError::CredentialNotFound(ref id) if id == "bad-id"));
        assert!(err.to_string().contains("bad-id"));
    }

    #[test]
    fn test_access_context_limits_lookup() {
        let store = store();
        let as_user = resolver(&store).access_context(AccessContext::User("dev".to_string()));

        assert!(matches!(
            as_user.resolve(Some("ops-only"), "us-east-1"),
            Err(FactoryError::CredentialNotFound(_))
        ));
        assert!(as_user.resolve(Some("deployer"), "us-east-1").is_ok());
        assert!(resolver(&store).resolve(Some("ops-only"), "us-east-1").is_ok());
    }

    #[test]
    fn test_region_is_lowercased() {
        let store = store();
        for region in ["US-WEST-2", "eu-central-1", "Ap-Southeast-1"] {
            let factory = resolver(&store).resolve(None, region).unwrap();
            assert_eq!(factory.region(), region.to_lowercase());
        }
        let factory = resolver(&store).resolve(None, "").unwrap();
        assert_eq!(factory.region(), DEFAULT_REGION);
    }

    #[test]
    fn test_user_agent_is_stamped() {
        let store = store();
        let factory = resolver(&store)
            .base_configuration(ClientConfiguration::new().with_user_agent("overwritten"))
            .resolve(None, "us-east-1")
            .unwrap();
        assert_eq!(
            factory.base_configuration().user_agent,
            "ingenieux CloudButler/1.2.3"
        );
    }

    #[tokio::test]
    async fn test_providers_yield_expected_keys() {
        let store = store();

        let stored = resolver(&store).resolve(Some("deployer"), "us-east-1").unwrap();
        assert_eq!(
            stored.credential_source(),
            &CredentialSource::Stored("deployer".to_string())
        );
        let creds = stored.credentials_provider().provide_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIADEPLOYER");
        assert_eq!(creds.secret_access_key(), "deployer-secret");

        let ambient = resolver(&store).resolve(None, "us-east-1").unwrap();
        let creds = ambient.credentials_provider().provide_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIAAMBIENT");
    }

    #[test]
    fn test_default_region_keeps_compiled_endpoint() {
        let store = store();
        let factory = resolver(&store).resolve(None, "us-east-1").unwrap();

        let s3: S3Client = factory.build().unwrap();
        let eb: ElasticBeanstalkClient = factory.build().unwrap();

        assert_eq!(
            factory.endpoint_of(&s3).as_deref(),
            Some(S3Client::DEFAULT_ENDPOINT)
        );
        assert_eq!(
            factory.endpoint_of(&eb).as_deref(),
            Some("https://elasticbeanstalk.us-east-1.amazonaws.com")
        );
        assert_eq!(eb.configuration().signer_override, None);
    }

    #[test]
    fn test_s3_in_us_west_2() {
        let store = store();
        let factory = resolver(&store).resolve(None, "us-west-2").unwrap();
        let s3: S3Client = factory.build().unwrap();

        let pattern = pattern_for(ServiceKind::S3).unwrap();
        assert_eq!(factory.endpoint_of(&s3), Some(pattern.render("us-west-2")));
        assert_eq!(
            factory.endpoint_of(&s3).as_deref(),
            Some("https://s3.us-west-2.amazonaws.com")
        );
        assert_eq!(
            s3.configuration().signer_override.map(|s| s.as_str()),
            Some("AWSS3V4SignerType")
        );
    }

    #[test]
    fn test_s3_subtype_matches_storage() {
        let store = store();
        let factory = resolver(&store).resolve(None, "eu-west-1").unwrap();
        let client: S3EncryptionClient = factory.build().unwrap();

        assert_eq!(
            client.configuration().signer_override,
            Some(SignerOverride::S3V4)
        );
        assert_eq!(
            factory.endpoint_of(&client).as_deref(),
            Some("https://s3.eu-west-1.amazonaws.com")
        );
    }

    #[test]
    fn test_stale_signer_override_is_cleared() {
        let store = store();
        let factory = resolver(&store)
            .base_configuration(
                ClientConfiguration::new().with_signer_override(Some(SignerOverride::S3V4)),
            )
            .resolve(None, "us-east-1")
            .unwrap();

        let eb: ElasticBeanstalkClient = factory.build().unwrap();
        assert_eq!(eb.configuration().signer_override, None);
    }

    #[test]
    fn test_build_never_mutates_base_configuration() {
        let store = store();
        let factory = resolver(&store).resolve(None, "us-west-2").unwrap();
        let before = factory.base_configuration().clone();

        let s3: S3Client = factory.build().unwrap();
        let eb: ElasticBeanstalkClient = factory.build().unwrap();

        assert_eq!(s3.configuration().signer_override, Some(SignerOverride::S3V4));
        assert_eq!(eb.configuration().signer_override, None);
        assert_eq!(factory.base_configuration(), &before);
    }

    #[test]
    fn test_global_service_keeps_default_endpoint() {
        let store = store();
        let factory = resolver(&store).resolve(None, "ap-northeast-1").unwrap();
        let iam: IamClient = factory.build().unwrap();
        assert_eq!(
            factory.endpoint_of(&iam).as_deref(),
            Some(IamClient::DEFAULT_ENDPOINT)
        );
    }

    #[test]
    fn test_every_patterned_service_reads_back_rendered_url() {
        let store = store();
        let factory = resolver(&store).resolve(None, "ca-central-1").unwrap();
        let registry = crate::aws::registry::ServiceRegistry::standard();

        for service in registry.services() {
            let client = registry.build(&factory, service.name).unwrap();
            let expected = ENDPOINT_PATTERNS
                .iter()
                .find(|p| p.matches(client.kind()))
                .map(|p| p.render("ca-central-1"))
                .unwrap_or_else(|| service.default_endpoint.to_string());
            assert_eq!(factory.endpoint_of(&*client), Some(expected), "{}", service.name);
        }
    }

    #[test]
    fn test_unparseable_region_fails_build() {
        let store = store();
        let factory = resolver(&store).resolve(None, "us west 2").unwrap();
        let result = factory.build::<S3Client>();
        assert!(matches!(
            result,
            Err(FactoryError::Construction(ConstructionError::InvalidEndpoint { .. }))
        ));
    }

    #[derive(Debug)]
    struct OpaqueClient {
        credentials: SharedCredentialsProvider,
        configuration: ClientConfiguration,
    }

    impl AnyServiceClient for OpaqueClient {
        fn service_name(&self) -> &'static str {
            "opaque"
        }

        fn kind(&self) -> ServiceKind {
            ServiceKind::Ec2
        }

        fn configuration(&self) -> &ClientConfiguration {
            &self.configuration
        }

        fn credentials(&self) -> &SharedCredentialsProvider {
            &self.credentials
        }

        fn endpoint(&self) -> Option<&Endpoint> {
            None
        }
    }

    /// Claims to be EC2 at runtime while declaring S3
    #[derive(Debug)]
    struct MislabelledClient {
        inner: OpaqueClient,
    }

    impl AnyServiceClient for MislabelledClient {
        fn service_name(&self) -> &'static str {
            "mislabelled"
        }

        fn kind(&self) -> ServiceKind {
            ServiceKind::Ec2
        }

        fn configuration(&self) -> &ClientConfiguration {
            &self.inner.configuration
        }

        fn credentials(&self) -> &SharedCredentialsProvider {
            &self.inner.credentials
        }

        fn endpoint(&self) -> Option<&Endpoint> {
            None
        }
    }

    impl ServiceClient for MislabelledClient {
        const KIND: ServiceKind = ServiceKind::S3;
        const DEFAULT_ENDPOINT: &'static str = "https://s3.amazonaws.com";

        fn new(
            credentials: SharedCredentialsProvider,
            configuration: ClientConfiguration,
        ) -> Result<Self, FactoryError> {
            Ok(Self {
                inner: OpaqueClient {
                    credentials,
                    configuration,
                },
            })
        }

        fn set_endpoint(&mut self, _endpoint: Endpoint) {}
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "reports a kind other than its KIND")]
    fn test_kind_must_match_declared_kind() {
        let store = store();
        let factory = resolver(&store).resolve(None, "us-west-2").unwrap();
        let _ = factory.build::<MislabelledClient>();
    }

    #[test]
    fn test_endpoint_of_unavailable() {
        let store = store();
        let factory = resolver(&store).resolve(None, "us-west-2").unwrap();
        let client = OpaqueClient {
            credentials: factory.credentials_provider().clone(),
            configuration: factory.configuration_for(ServiceKind::Ec2),
        };

        assert_eq!(factory.endpoint_of(&client), None);
        let as_dyn: &dyn AnyServiceClient = &client;
        assert_eq!(factory.endpoint_of(as_dyn), None);
    }

    #[test]
    fn test_concurrent_builds_share_factory() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientFactory>();

        let store = store();
        let factory = resolver(&store).resolve(None, "us-west-2").unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| factory.build::<S3Client>().unwrap()))
                .collect();
            for handle in handles {
                let client = handle.join().unwrap();
                assert_eq!(
                    factory.endpoint_of(&client).as_deref(),
                    Some("https://s3.us-west-2.amazonaws.com")
                );
            }
        });
    }

    #[test]
    fn test_sdk_config_reflects_factory() {
        let store = store();
        let factory = resolver(&store)
            .base_configuration(
                ClientConfiguration::new()
                    .with_connection_timeout(Duration::from_secs(5))
                    .with_socket_timeout(Duration::from_secs(30))
                    .with_max_error_retry(2),
            )
            .resolve(None, "EU-WEST-1")
            .unwrap();

        let sdk = factory.sdk_config();
        assert_eq!(sdk.region().map(|r| r.as_ref()), Some("eu-west-1"));
        assert_eq!(
            sdk.timeout_config().and_then(|t| t.connect_timeout()),
            Some(Duration::from_secs(5))
        );
        assert_eq!(
            sdk.timeout_config().and_then(|t| t.read_timeout()),
            Some(Duration::from_secs(30))
        );
        assert_eq!(sdk.retry_config().map(|r| r.max_attempts()), Some(3));
        assert!(sdk.endpoint_url().is_none());

        let ssm: SsmClient = factory.build().unwrap();
        let for_client = factory.sdk_config_for(&ssm);
        assert_eq!(
            for_client.endpoint_url(),
            Some("https://ssm.eu-west-1.amazonaws.com")
        );
    }

    #[tokio::test]
    async fn test_client_carries_factory_credentials() {
        let store = store();
        let factory = resolver(&store).resolve(Some("deployer"), "eu-west-1").unwrap();
        let ssm: SsmClient = factory.build().unwrap();

        let creds = ssm.credentials().provide_credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIADEPLOYER");

        let sdk = factory.sdk_config_for(&ssm);
        let provider = sdk.credentials_provider().unwrap();
        let creds = provider.provide_credentials().await.unwrap();
        assert_eq!(creds.secret_access_key(), "deployer-secret");
    }

    #[test]
    fn test_file_store_blank_id_is_ambient() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::open(dir.path().join("c.json")).unwrap();
        let factory = CredentialResolver::new(&store).resolve(Some(""), "us-east-1").unwrap();
        assert_eq!(factory.credential_source(), &CredentialSource::Ambient);
    }
}
