use crate::aws::endpoint::Endpoint;
use crate::config::ClientConfiguration;
use crate::error::{ConstructionError, FactoryError};
use aws_config::SdkConfig;
use aws_credential_types::provider::SharedCredentialsProvider;
use std::fmt;

/// Which AWS service a client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    ElasticBeanstalk,
    S3,
    Ec2,
    ElasticLoadBalancing,
    Iam,
    Ssm,
}

impl ServiceKind {
    /// Object storage clients sign with the S3 flavour of SigV4
    pub fn is_storage(&self) -> bool {
        matches!(self, ServiceKind::S3)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ServiceKind::ElasticBeanstalk => "Elastic Beanstalk",
            ServiceKind::S3 => "S3",
            ServiceKind::Ec2 => "EC2",
            ServiceKind::ElasticLoadBalancing => "Elastic Load Balancing",
            ServiceKind::Iam => "IAM",
            ServiceKind::Ssm => "SSM",
        };
        f.write_str(name)
    }
}

/// Object-safe view of a constructed client
pub trait AnyServiceClient: Send + Sync + fmt::Debug {
    fn service_name(&self) -> &'static str;

    fn kind(&self) -> ServiceKind;

    fn configuration(&self) -> &ClientConfiguration;

    fn credentials(&self) -> &SharedCredentialsProvider;

    /// Endpoint requests are sent to, if the client exposes one
    fn endpoint(&self) -> Option<&Endpoint>;
}

/// A concrete client type the factory can build
///
/// Every implementation is constructible from exactly a credentials
/// provider and a client configuration, and lets the factory replace its
/// endpoint afterwards. `kind()` must always return `Self::KIND`: the
/// signer is picked from the constant and the endpoint from the instance.
pub trait ServiceClient: AnyServiceClient + Sized {
    const KIND: ServiceKind;
    const DEFAULT_ENDPOINT: &'static str;

    fn new(
        credentials: SharedCredentialsProvider,
        configuration: ClientConfiguration,
    ) -> Result<Self, FactoryError>;

    fn set_endpoint(&mut self, endpoint: Endpoint);
}

/// State shared by every built-in client
#[derive(Debug, Clone)]
pub struct ClientCore {
    credentials: SharedCredentialsProvider,
    configuration: ClientConfiguration,
    endpoint: Endpoint,
}

impl ClientCore {
    pub fn new(
        service: &str,
        default_endpoint: &str,
        credentials: SharedCredentialsProvider,
        configuration: ClientConfiguration,
    ) -> Result<Self, FactoryError> {
        let endpoint = Endpoint::parse(default_endpoint).map_err(|e| ConstructionError::Instantiation {
            service: service.to_string(),
            reason: format!("default endpoint '{}' is invalid: {}", default_endpoint, e),
        })?;

        Ok(Self {
            credentials,
            configuration,
            endpoint,
        })
    }
}

macro_rules! service_client {
    ($(#[$meta:meta])* $name:ident, $kind:expr, $service:literal, $endpoint:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            core: ClientCore,
        }

        impl AnyServiceClient for $name {
            fn service_name(&self) -> &'static str {
                $service
            }

            fn kind(&self) -> ServiceKind {
                $kind
            }

            fn configuration(&self) -> &ClientConfiguration {
                &self.core.configuration
            }

            fn credentials(&self) -> &SharedCredentialsProvider {
                &self.core.credentials
            }

            fn endpoint(&self) -> Option<&Endpoint> {
                Some(&self.core.endpoint)
            }
        }

        impl ServiceClient for $name {
            const KIND: ServiceKind = $kind;
            const DEFAULT_ENDPOINT: &'static str = $endpoint;

            fn new(
                credentials: SharedCredentialsProvider,
                configuration: ClientConfiguration,
            ) -> Result<Self, FactoryError> {
                Ok(Self {
                    core: ClientCore::new($service, $endpoint, credentials, configuration)?,
                })
            }

            fn set_endpoint(&mut self, endpoint: Endpoint) {
                self.core.endpoint = endpoint;
            }
        }
    };
}

service_client!(
    /// Elastic Beanstalk application and environment management
    ElasticBeanstalkClient,
    ServiceKind::ElasticBeanstalk,
    "elasticbeanstalk",
    "https://elasticbeanstalk.us-east-1.amazonaws.com"
);

service_client!(
    /// S3 object storage, used for application bundles
    S3Client,
    ServiceKind::S3,
    "s3",
    "https://s3.amazonaws.com"
);

service_client!(
    /// S3 with client-side encryption; an S3 client in every other respect
    S3EncryptionClient,
    ServiceKind::S3,
    "s3-encryption",
    "https://s3.amazonaws.com"
);

service_client!(
    Ec2Client,
    ServiceKind::Ec2,
    "ec2",
    "https://ec2.us-east-1.amazonaws.com"
);

service_client!(
    ElasticLoadBalancingClient,
    ServiceKind::ElasticLoadBalancing,
    "elasticloadbalancing",
    "https://elasticloadbalancing.us-east-1.amazonaws.com"
);

service_client!(
    /// IAM is a global service with a single endpoint
    IamClient,
    ServiceKind::Iam,
    "iam",
    "https://iam.amazonaws.com"
);

service_client!(
    /// SSM Parameter Store, for deployment-time configuration
    SsmClient,
    ServiceKind::Ssm,
    "ssm",
    "https://ssm.us-east-1.amazonaws.com"
);

impl SsmClient {
    /// SDK configuration for this client, pinned to its endpoint
    pub fn sdk_config(&self, shared: &SdkConfig) -> aws_sdk_ssm::Config {
        aws_sdk_ssm::config::Builder::from(shared)
            .endpoint_url(self.core.endpoint.as_str())
            .build()
    }

    pub fn sdk_client(&self, shared: &SdkConfig) -> aws_sdk_ssm::Client {
        aws_sdk_ssm::Client::from_conf(self.sdk_config(shared))
    }
}
