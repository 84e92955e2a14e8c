use crate::error::FactoryError;
use crate::fs_utils::write_secret_file_atomic;
use aws_config::environment::credentials::EnvironmentVariableCredentialsProvider;
use aws_config::imds::credentials::ImdsCredentialsProvider;
use aws_config::meta::credentials::CredentialsProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_credential_types::Credentials;
use aws_credential_types::provider::SharedCredentialsProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

/// Provider name reported by credentials that came from a credential store
pub const STORED_PROVIDER_NAME: &str = "CloudButlerStoredCredential";

/// Build the ambient credential chain a hosting environment offers
///
/// Sources are tried in order:
/// 1. Environment variables (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY)
/// 2. ~/.aws/credentials and ~/.aws/config profiles
/// 3. EC2 instance metadata (instance profile role)
pub fn ambient_chain() -> SharedCredentialsProvider {
    chain_from(
        EnvironmentVariableCredentialsProvider::new(),
        ProfileFileCredentialsProvider::builder().build(),
    )
}

fn chain_from(
    environment: EnvironmentVariableCredentialsProvider,
    profile: ProfileFileCredentialsProvider,
) -> SharedCredentialsProvider {
    let chain = CredentialsProviderChain::first_try("Environment", environment)
        .or_else("Profile", profile)
        .or_else("InstanceMetadata", ImdsCredentialsProvider::builder().build());

    SharedCredentialsProvider::new(chain)
}

/// Who is asking for a stored credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessContext {
    /// Trusted system access, sees every credential
    System,
    /// A named user, sees only globally scoped credentials
    User(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScope {
    #[default]
    Global,
    System,
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CredentialScope::Global => write!(f, "global"),
            CredentialScope::System => write!(f, "system"),
        }
    }
}

/// An access-key/secret-key pair kept under an identifier
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scope: CredentialScope,
    pub access_key_id: String,
    pub secret_key: String,
}

impl StoredCredential {
    pub fn new(
        id: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            scope: CredentialScope::Global,
            access_key_id: access_key_id.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_scope(mut self, scope: CredentialScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn visible_to(&self, context: &AccessContext) -> bool {
        match context {
            AccessContext::System => true,
            AccessContext::User(_) => self.scope == CredentialScope::Global,
        }
    }

    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(
            self.access_key_id.clone(),
            self.secret_key.clone(),
            None,
            None,
            STORED_PROVIDER_NAME,
        )
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("scope", &self.scope)
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"** redacted **")
            .finish()
    }
}

impl Drop for StoredCredential {
    fn drop(&mut self) {
        self.secret_key.zeroize();
    }
}

/// Where stored credentials and the ambient chain come from
pub trait CredentialStore {
    /// First credential whose id equals `id` and that `context` may see
    fn lookup(&self, id: &str, context: &AccessContext) -> Option<StoredCredential>;

    fn ambient_chain(&self) -> SharedCredentialsProvider {
        ambient_chain()
    }
}

fn first_visible<'a>(
    credentials: &'a [StoredCredential],
    id: &str,
    context: &AccessContext,
) -> Option<&'a StoredCredential> {
    credentials
        .iter()
        .find(|c| c.id == id && c.visible_to(context))
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: Vec<StoredCredential>,
    ambient: Option<SharedCredentialsProvider>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, credential: StoredCredential) -> Self {
        self.credentials.push(credential);
        self
    }

    /// Replace the ambient chain handed out for blank credential ids
    pub fn with_ambient(mut self, provider: SharedCredentialsProvider) -> Self {
        self.ambient = Some(provider);
        self
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, id: &str, context: &AccessContext) -> Option<StoredCredential> {
        first_visible(&self.credentials, id, context).cloned()
    }

    fn ambient_chain(&self) -> SharedCredentialsProvider {
        match &self.ambient {
            Some(provider) => provider.clone(),
            None => ambient_chain(),
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
struct CredentialFile {
    #[serde(default)]
    credentials: Vec<StoredCredential>,
}

/// Credential store persisted as a JSON document
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    credentials: Vec<StoredCredential>,
}

impl FileCredentialStore {
    /// `<config dir>/cloudbutler/credentials.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cloudbutler").join("credentials.json"))
    }

    /// Load the store at `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FactoryError> {
        let path = path.as_ref().to_path_buf();
        let credentials = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<CredentialFile>(&content)?.credentials,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "credential file not found, starting empty");
                Vec::new()
            }
            Err(e) => return Err(FactoryError::Io(e)),
        };

        Ok(Self { path, credentials })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn credentials(&self) -> &[StoredCredential] {
        &self.credentials
    }

    pub fn add(&mut self, credential: StoredCredential) -> Result<(), FactoryError> {
        if self.credentials.iter().any(|c| c.id == credential.id) {
            return Err(FactoryError::DuplicateCredential(credential.id.clone()));
        }
        self.credentials.push(credential);
        Ok(())
    }

    pub fn save(&self) -> Result<(), FactoryError> {
        let document = CredentialFile {
            credentials: self.credentials.clone(),
        };
        let json = serde_json::to_string_pretty(&document)?;
        write_secret_file_atomic(&self.path, &json)
    }
}

impl CredentialStore for FileCredentialStore {
    fn lookup(&self, id: &str, context: &AccessContext) -> Option<StoredCredential> {
        first_visible(&self.credentials, id, context).cloned()
    }
}
