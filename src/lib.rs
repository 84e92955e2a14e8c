//! Region-aware AWS client factory used by CloudButler deployments.
//!
//! ```no_run
//! use cloudbutler::{CredentialResolver, FileCredentialStore, S3Client};
//!
//! # fn main() -> Result<(), cloudbutler::FactoryError> {
//! let store = FileCredentialStore::open("credentials.json")?;
//! let factory = CredentialResolver::new(&store).resolve(Some("deployer"), "us-west-2")?;
//! let s3: S3Client = factory.build()?;
//! println!("{:?}", factory.endpoint_of(&s3));
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod config;
pub mod error;
pub mod factory;
pub mod fs_utils;
pub mod validation;
pub mod version;

pub use aws::client::{
    AnyServiceClient, Ec2Client, ElasticBeanstalkClient, ElasticLoadBalancingClient, IamClient,
    S3Client, S3EncryptionClient, ServiceClient, ServiceKind, SsmClient,
};
pub use aws::credentials::{
    AccessContext, CredentialScope, CredentialStore, FileCredentialStore,
    InMemoryCredentialStore, StoredCredential,
};
pub use aws::endpoint::{ENDPOINT_PATTERNS, Endpoint, EndpointPattern};
pub use aws::registry::{RegisteredService, ServiceRegistry};
pub use config::{ClientConfiguration, SignerOverride};
pub use error::{ConstructionError, FactoryError};
pub use factory::{ClientFactory, CredentialResolver, CredentialSource};
pub use validation::DEFAULT_REGION;
pub use version::{BuildVersion, VersionReporter};
