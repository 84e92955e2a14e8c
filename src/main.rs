use clap::{Parser, Subcommand, ValueEnum};
use cloudbutler::{CredentialScope, DEFAULT_REGION, FactoryError, FileCredentialStore};
use std::path::PathBuf;
use std::process;

mod commands;
mod display;
mod logging;
mod types;

use commands::credentials::AddArgs;
use commands::template::CommandContext;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScopeArg {
    Global,
    System,
}

impl From<ScopeArg> for CredentialScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Global => CredentialScope::Global,
            ScopeArg::System => CredentialScope::System,
        }
    }
}

#[derive(Parser)]
#[command(name = "cloudbutler")]
#[command(about = "CloudButler - resolve AWS credentials and regional service endpoints")]
#[command(
    long_about = "cloudbutler builds the AWS service clients used by Elastic Beanstalk deployments and reports how they are configured.\n\nUsage: cloudbutler [GLOBAL_OPTIONS] <COMMAND> [COMMAND_OPTIONS]\nExample: cloudbutler --region us-west-2 --credentials-id deployer endpoint s3"
)]
#[command(version = env!("CLOUDBUTLER_VERSION"))]
struct Cli {
    #[arg(
        long = "credentials-file",
        env = "CLOUDBUTLER_CREDENTIALS_FILE",
        help = "Path to the stored credentials file (default: <config dir>/cloudbutler/credentials.json)"
    )]
    credentials_file: Option<PathBuf>,

    #[arg(
        short = 'c',
        long = "credentials-id",
        help = "Stored credential to use; omit for the environment/profile/instance chain"
    )]
    credentials_id: Option<String>,

    #[arg(
        short = 'r',
        long,
        env = "AWS_REGION",
        default_value = DEFAULT_REGION,
        help = "AWS region code (global option)"
    )]
    region: String,

    #[arg(
        short = 'o',
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format: table or json (global option)"
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Build a service client and show its endpoint and signer")]
    Endpoint {
        #[arg(help = "Service name (see `cloudbutler services`)")]
        service: String,
    },

    #[command(about = "List registered services and their regional endpoint patterns")]
    Services,

    #[command(about = "Manage stored credentials")]
    Credentials {
        #[command(subcommand)]
        action: CredentialsAction,
    },
}

#[derive(Subcommand)]
enum CredentialsAction {
    #[command(about = "List stored credentials (access keys masked)")]
    List,

    #[command(about = "Add a stored credential")]
    Add {
        #[arg(help = "Credential id")]
        id: String,
        #[arg(long = "access-key-id", help = "AWS access key id")]
        access_key_id: String,
        #[arg(long = "secret-key", env = "CLOUDBUTLER_SECRET_KEY", help = "AWS secret access key")]
        secret_key: String,
        #[arg(short = 'd', long, help = "Description for the credential")]
        description: Option<String>,
        #[arg(long, value_enum, default_value = "global", help = "Visibility scope")]
        scope: ScopeArg,
    },

    #[command(about = "Resolve credentials and load them once")]
    Check,
}

fn resolve_credentials_file(cli_path: Option<PathBuf>) -> Result<PathBuf, FactoryError> {
    cli_path
        .or_else(FileCredentialStore::default_path)
        .ok_or_else(|| {
            FactoryError::ParseError(
                "Unable to determine a configuration directory; pass --credentials-file"
                    .to_string(),
            )
        })
}

fn run(cli: Cli) -> Result<(), FactoryError> {
    let context = CommandContext {
        credentials_file: resolve_credentials_file(cli.credentials_file)?,
        credentials_id: cli.credentials_id,
        region: cli.region,
        format: cli.format,
    };

    match cli.command {
        Commands::Endpoint { service } => commands::endpoint(&context, &service),
        Commands::Services => commands::services(&context),
        Commands::Credentials { action } => match action {
            CredentialsAction::List => commands::credentials_list(&context),
            CredentialsAction::Add {
                id,
                access_key_id,
                secret_key,
                description,
                scope,
            } => commands::credentials_add(
                &context,
                AddArgs {
                    id,
                    access_key_id,
                    secret_key,
                    description,
                    scope: scope.into(),
                },
            ),
            CredentialsAction::Check => commands::credentials_check(&context),
        },
    }
}

fn main() {
    logging::init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}
