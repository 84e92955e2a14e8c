use crate::aws::client::{
    AnyServiceClient, Ec2Client, ElasticBeanstalkClient, ElasticLoadBalancingClient, IamClient,
    S3Client, S3EncryptionClient, ServiceClient, ServiceKind, SsmClient,
};
use crate::error::{ConstructionError, FactoryError};
use crate::factory::ClientFactory;

type BuildFn = fn(&ClientFactory) -> Result<Box<dyn AnyServiceClient>, FactoryError>;

/// A client type registered under a service name
#[derive(Clone, Copy)]
pub struct RegisteredService {
    pub name: &'static str,
    pub kind: ServiceKind,
    pub default_endpoint: &'static str,
    build: BuildFn,
}

fn build_boxed<C>(factory: &ClientFactory) -> Result<Box<dyn AnyServiceClient>, FactoryError>
where
    C: ServiceClient + 'static,
{
    Ok(Box::new(factory.build::<C>()?))
}

/// Name-keyed constructors for building clients chosen at runtime
#[derive(Default)]
pub struct ServiceRegistry {
    services: Vec<RegisteredService>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in client
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register::<ElasticBeanstalkClient>("elasticbeanstalk");
        registry.register::<S3Client>("s3");
        registry.register::<S3EncryptionClient>("s3-encryption");
        registry.register::<Ec2Client>("ec2");
        registry.register::<ElasticLoadBalancingClient>("elasticloadbalancing");
        registry.register::<IamClient>("iam");
        registry.register::<SsmClient>("ssm");
        registry
    }

    /// Register `C` as `name`, replacing any earlier registration of that name
    pub fn register<C>(&mut self, name: &'static str) -> &mut Self
    where
        C: ServiceClient + 'static,
    {
        let entry = RegisteredService {
            name,
            kind: C::KIND,
            default_endpoint: C::DEFAULT_ENDPOINT,
            build: build_boxed::<C>,
        };

        match self
            .services
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => *existing = entry,
            None => self.services.push(entry),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredService> {
        self.services
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn services(&self) -> &[RegisteredService] {
        &self.services
    }

    pub fn build(
        &self,
        factory: &ClientFactory,
        name: &str,
    ) -> Result<Box<dyn AnyServiceClient>, FactoryError> {
        let service = self
            .get(name)
            .ok_or_else(|| ConstructionError::UnknownService(name.to_string()))?;
        (service.build)(factory)
    }
}
