use std::error::Error;
use std::fmt;
use std::io;

/// Failures while constructing a service client
#[derive(Debug)]
pub enum ConstructionError {
    UnknownService(String),
    InvalidEndpoint { url: String, reason: String },
    Instantiation { service: String, reason: String },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConstructionError::UnknownService(name) => {
                write!(f, "No service client registered as '{}'", name)
            }
            ConstructionError::InvalidEndpoint { url, reason } => {
                write!(f, "Invalid endpoint '{}': {}", url, reason)
            }
            ConstructionError::Instantiation { service, reason } => {
                write!(f, "Failed to instantiate {} client: {}", service, reason)
            }
        }
    }
}

impl Error for ConstructionError {}

#[derive(Debug)]
pub enum FactoryError {
    CredentialNotFound(String),
    Construction(ConstructionError),
    DuplicateCredential(String),
    Io(io::Error),
    SerdeJson(serde_json::Error),
    Credentials(String),
    ParseError(String),
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FactoryError::CredentialNotFound(id) => write!(f, "Credential not found: {}", id),
            FactoryError::Construction(e) => write!(f, "Client construction error: {}", e),
            FactoryError::DuplicateCredential(id) => {
                write!(f, "A credential with id '{}' already exists", id)
            }
            FactoryError::Io(e) => write!(f, "IO error: {}", e),
            FactoryError::SerdeJson(e) => write!(f, "JSON serialization error: {}", e),
            FactoryError::Credentials(msg) => write!(f, "Credentials error: {}", msg),
            FactoryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl Error for FactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FactoryError::Construction(e) => Some(e),
            FactoryError::Io(e) => Some(e),
            FactoryError::SerdeJson(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConstructionError> for FactoryError {
    fn from(error: ConstructionError) -> Self {
        FactoryError::Construction(error)
    }
}

impl From<io::Error> for FactoryError {
    fn from(error: io::Error) -> Self {
        FactoryError::Io(error)
    }
}

impl From<serde_json::Error> for FactoryError {
    fn from(error: serde_json::Error) -> Self {
        FactoryError::SerdeJson(error)
    }
}
