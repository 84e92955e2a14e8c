use crate::OutputFormat;
use crate::commands::endpoint::describe_source;
use crate::commands::template::{CommandContext, CommandTemplate, MessageOutput, missing_factory};
use crate::display::{
    format_json_output, mask_key, print_details, print_info, print_success, print_table,
};
use crate::types::{CredentialCheckOutput, CredentialItem, CredentialsListOutput};
use aws_credential_types::provider::ProvideCredentials;
use cloudbutler::validation::is_valid_credentials_id;
use cloudbutler::{
    ClientFactory, CredentialScope, FactoryError, FileCredentialStore, StoredCredential,
};

#[derive(Debug)]
pub struct ListArgs;

pub struct CredentialsListCommand;

impl CommandTemplate for CredentialsListCommand {
    type Args = ListArgs;
    type Output = CredentialsListOutput;

    fn requires_factory(&self) -> bool {
        false
    }

    fn execute_operation(
        &self,
        store: &mut FileCredentialStore,
        _factory: Option<&ClientFactory>,
        _args: Self::Args,
    ) -> Result<Self::Output, FactoryError> {
        let credentials = store
            .credentials()
            .iter()
            .map(|c| CredentialItem {
                id: c.id.clone(),
                description: c.description.clone(),
                scope: c.scope.to_string(),
                access_key_id: mask_key(&c.access_key_id),
            })
            .collect();

        Ok(CredentialsListOutput {
            file: store.path().display().to_string(),
            credentials,
        })
    }

    fn format_output(&self, output: Self::Output, format: &OutputFormat) -> Result<(), FactoryError> {
        match format {
            OutputFormat::Json => println!("{}", format_json_output(&output)?),
            OutputFormat::Table => {
                print_info(&format!("Credential store: {}", output.file));
                let rows: Vec<Vec<String>> = output
                    .credentials
                    .into_iter()
                    .map(|c| vec![c.id, c.scope, c.access_key_id, c.description])
                    .collect();
                print_table(
                    &["Id", "Scope", "Access key", "Description"],
                    &rows,
                    "No stored credentials",
                );
            }
        }
        Ok(())
    }
}

pub struct AddArgs {
    pub id: String,
    pub access_key_id: String,
    pub secret_key: String,
    pub description: Option<String>,
    pub scope: CredentialScope,
}

pub struct CredentialsAddCommand;

impl CommandTemplate for CredentialsAddCommand {
    type Args = AddArgs;
    type Output = MessageOutput;

    fn validate_args(&self, args: &Self::Args) -> Result<(), FactoryError> {
        if !is_valid_credentials_id(&args.id) {
            return Err(FactoryError::ParseError(format!(
                "Invalid credential id '{}': must be non-empty without whitespace",
                args.id
            )));
        }
        if args.access_key_id.trim().is_empty() || args.secret_key.trim().is_empty() {
            return Err(FactoryError::ParseError(
                "Access key id and secret key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn requires_factory(&self) -> bool {
        false
    }

    fn execute_operation(
        &self,
        store: &mut FileCredentialStore,
        _factory: Option<&ClientFactory>,
        args: Self::Args,
    ) -> Result<Self::Output, FactoryError> {
        let AddArgs {
            id,
            access_key_id,
            secret_key,
            description,
            scope,
        } = args;

        let credential = StoredCredential::new(id.clone(), access_key_id, secret_key)
            .with_description(description.unwrap_or_default())
            .with_scope(scope);
        store.add(credential)?;

        Ok(MessageOutput::new(format!(
            "Stored credential '{}' ({} scope) in {}",
            id,
            scope,
            store.path().display()
        )))
    }

    fn modifies_store(&self) -> bool {
        true
    }

    fn format_output(&self, output: Self::Output, _format: &OutputFormat) -> Result<(), FactoryError> {
        print_success(&output.message);
        Ok(())
    }
}

#[derive(Debug)]
pub struct CheckArgs;

/// Load credentials once through the resolved provider
pub struct CredentialsCheckCommand;

impl CommandTemplate for CredentialsCheckCommand {
    type Args = CheckArgs;
    type Output = CredentialCheckOutput;

    fn execute_operation(
        &self,
        _store: &mut FileCredentialStore,
        factory: Option<&ClientFactory>,
        _args: Self::Args,
    ) -> Result<Self::Output, FactoryError> {
        let factory = factory.ok_or_else(missing_factory)?;
        let provider = factory.credentials_provider().clone();

        let credentials = run_async_blocking(async move {
            provider
                .provide_credentials()
                .await
                .map_err(|e| FactoryError::Credentials(format!("Failed to load credentials: {}", e)))
        })?;

        Ok(CredentialCheckOutput {
            credential_source: describe_source(factory.credential_source()),
            access_key_id: mask_key(credentials.access_key_id()),
            has_session_token: credentials.session_token().is_some(),
            expires: credentials.expiry().is_some(),
        })
    }

    fn format_output(&self, output: Self::Output, format: &OutputFormat) -> Result<(), FactoryError> {
        match format {
            OutputFormat::Json => println!("{}", format_json_output(&output)?),
            OutputFormat::Table => {
                print_success("Credentials loaded");
                print_details(&[
                    ("Source", output.credential_source),
                    ("Access key", output.access_key_id),
                    ("Session token", yes_no(output.has_session_token)),
                    ("Expires", yes_no(output.expires)),
                ]);
            }
        }
        Ok(())
    }
}

fn yes_no(value: bool) -> String {
    let answer = if value { "yes" } else { "no" };
    answer.to_string()
}

pub fn credentials_list(context: &CommandContext) -> Result<(), FactoryError> {
    CredentialsListCommand.execute(context, ListArgs)
}

pub fn credentials_add(context: &CommandContext, args: AddArgs) -> Result<(), FactoryError> {
    CredentialsAddCommand.execute(context, args)
}

pub fn credentials_check(context: &CommandContext) -> Result<(), FactoryError> {
    print_info("Loading credentials...");
    CredentialsCheckCommand.execute(context, CheckArgs)
}

fn run_async_blocking<T, F>(future: F) -> Result<T, FactoryError>
where
    T: Send + 'static,
    F: std::future::Future<Output = Result<T, FactoryError>> + Send + 'static,
{
    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        FactoryError::Credentials(format!("Failed to create async runtime: {}", e))
    })?;
    runtime.block_on(future)
}
