use crate::OutputFormat;
use crate::commands::template::{CommandContext, CommandTemplate, missing_factory};
use crate::display::{format_json_output, print_details, print_warning};
use crate::types::EndpointOutput;
use cloudbutler::aws::endpoint::pattern_for;
use cloudbutler::{
    ClientFactory, CredentialSource, FactoryError, FileCredentialStore, ServiceRegistry,
};

#[derive(Debug)]
pub struct EndpointArgs {
    pub service: String,
}

/// Build a client by service name and report how it was configured
pub struct EndpointCommand {
    registry: ServiceRegistry,
}

impl EndpointCommand {
    pub fn new(registry: ServiceRegistry) -> Self {
        Self { registry }
    }
}

pub fn describe_source(source: &CredentialSource) -> String {
    match source {
        CredentialSource::Ambient => "ambient".to_string(),
        CredentialSource::Stored(id) => format!("stored:{}", id),
    }
}

impl CommandTemplate for EndpointCommand {
    type Args = EndpointArgs;
    type Output = EndpointOutput;

    fn validate_args(&self, args: &Self::Args) -> Result<(), FactoryError> {
        if args.service.trim().is_empty() {
            return Err(FactoryError::ParseError(
                "Service name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn execute_operation(
        &self,
        _store: &mut FileCredentialStore,
        factory: Option<&ClientFactory>,
        args: Self::Args,
    ) -> Result<Self::Output, FactoryError> {
        let factory = factory.ok_or_else(missing_factory)?;
        let client = self.registry.build(factory, &args.service)?;

        let regional = !factory.is_default_region() && pattern_for(client.kind()).is_some();
        if !factory.is_default_region() && !regional {
            print_warning(&format!(
                "No regional endpoint pattern for {}; using its default endpoint",
                client.kind()
            ));
        }

        let configuration = client.configuration();
        Ok(EndpointOutput {
            service: client.service_name().to_string(),
            kind: client.kind().to_string(),
            region: factory.region().to_string(),
            endpoint: factory.endpoint_of(&*client),
            regional,
            signer_override: configuration.signer_override.map(|s| s.to_string()),
            user_agent: configuration.user_agent.clone(),
            credential_source: describe_source(factory.credential_source()),
        })
    }

    fn format_output(&self, output: Self::Output, format: &OutputFormat) -> Result<(), FactoryError> {
        match format {
            OutputFormat::Json => println!("{}", format_json_output(&output)?),
            OutputFormat::Table => print_details(&[
                ("Service", format!("{} ({})", output.service, output.kind)),
                ("Region", output.region),
                (
                    "Endpoint",
                    output.endpoint.unwrap_or_else(|| "unavailable".to_string()),
                ),
                (
                    "Signer",
                    output
                        .signer_override
                        .unwrap_or_else(|| "provider default".to_string()),
                ),
                ("User agent", output.user_agent),
                ("Credentials", output.credential_source),
            ]),
        }
        Ok(())
    }
}

pub fn endpoint(context: &CommandContext, service: &str) -> Result<(), FactoryError> {
    let command = EndpointCommand::new(ServiceRegistry::standard());
    let args = EndpointArgs {
        service: service.to_string(),
    };

    command.execute(context, args)
}
