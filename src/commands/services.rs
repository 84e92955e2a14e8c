use crate::OutputFormat;
use crate::commands::template::{CommandContext, CommandTemplate};
use crate::display::{format_json_output, print_table};
use crate::types::{ServiceItem, ServicesOutput};
use cloudbutler::aws::endpoint::pattern_for;
use cloudbutler::{ClientFactory, FactoryError, FileCredentialStore, ServiceRegistry};

#[derive(Debug)]
pub struct ServicesArgs;

/// List the registered service clients and their endpoint patterns
pub struct ServicesCommand {
    registry: ServiceRegistry,
}

impl CommandTemplate for ServicesCommand {
    type Args = ServicesArgs;
    type Output = ServicesOutput;

    fn requires_factory(&self) -> bool {
        false
    }

    fn execute_operation(
        &self,
        _store: &mut FileCredentialStore,
        _factory: Option<&ClientFactory>,
        _args: Self::Args,
    ) -> Result<Self::Output, FactoryError> {
        let services = self
            .registry
            .services()
            .iter()
            .map(|service| ServiceItem {
                name: service.name.to_string(),
                kind: service.kind.to_string(),
                default_endpoint: service.default_endpoint.to_string(),
                regional_pattern: pattern_for(service.kind).map(|p| p.template.to_string()),
            })
            .collect();

        Ok(ServicesOutput { services })
    }

    fn format_output(&self, output: Self::Output, format: &OutputFormat) -> Result<(), FactoryError> {
        match format {
            OutputFormat::Json => println!("{}", format_json_output(&output)?),
            OutputFormat::Table => {
                let rows: Vec<Vec<String>> = output
                    .services
                    .into_iter()
                    .map(|s| {
                        vec![
                            s.name,
                            s.kind,
                            s.default_endpoint,
                            s.regional_pattern.unwrap_or_else(|| "(global)".to_string()),
                        ]
                    })
                    .collect();
                print_table(
                    &["Service", "Kind", "Default endpoint", "Regional pattern"],
                    &rows,
                    "No services registered",
                );
            }
        }
        Ok(())
    }
}

pub fn services(context: &CommandContext) -> Result<(), FactoryError> {
    let command = ServicesCommand {
        registry: ServiceRegistry::standard(),
    };

    command.execute(context, ServicesArgs)
}
