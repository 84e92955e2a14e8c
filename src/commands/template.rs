use crate::OutputFormat;
use cloudbutler::{ClientFactory, CredentialResolver, FactoryError, FileCredentialStore};
use std::path::PathBuf;

/// Global options every command runs with
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub credentials_file: PathBuf,
    pub credentials_id: Option<String>,
    pub region: String,
    pub format: OutputFormat,
}

/// Template method trait for CloudButler commands
pub trait CommandTemplate {
    /// Input arguments type for this command
    type Args;
    /// Output result type for this command
    type Output;

    fn validate_args(&self, _args: &Self::Args) -> Result<(), FactoryError> {
        Ok(())
    }

    /// Whether the command needs a resolved client factory
    fn requires_factory(&self) -> bool {
        true
    }

    fn execute_operation(
        &self,
        store: &mut FileCredentialStore,
        factory: Option<&ClientFactory>,
        args: Self::Args,
    ) -> Result<Self::Output, FactoryError>;

    fn modifies_store(&self) -> bool {
        false
    }

    fn format_output(&self, output: Self::Output, _format: &OutputFormat) -> Result<(), FactoryError>
    where
        Self::Output: std::fmt::Debug,
    {
        println!("{:?}", output);
        Ok(())
    }

    fn execute(&self, context: &CommandContext, args: Self::Args) -> Result<(), FactoryError>
    where
        Self::Output: std::fmt::Debug,
    {
        self.validate_args(&args)?;

        let mut store = FileCredentialStore::open(&context.credentials_file)?;

        let factory = if self.requires_factory() {
            Some(
                CredentialResolver::new(&store)
                    .resolve(context.credentials_id.as_deref(), &context.region)?,
            )
        } else {
            None
        };

        let output = self.execute_operation(&mut store, factory.as_ref(), args)?;

        if self.modifies_store() {
            store.save()?;
        }

        self.format_output(output, &context.format)?;

        Ok(())
    }
}

/// Factory is required but was not resolved
pub fn missing_factory() -> FactoryError {
    FactoryError::ParseError("Command requires a resolved client factory".to_string())
}

/// Result type for commands that just print a message
#[derive(Debug)]
pub struct MessageOutput {
    pub message: String,
}

impl MessageOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
