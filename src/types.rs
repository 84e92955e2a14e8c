use serde::Serialize;

// JSON output structures
#[derive(Serialize, Debug)]
pub struct EndpointOutput {
    pub service: String,
    pub kind: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub regional: bool,
    pub signer_override: Option<String>,
    pub user_agent: String,
    pub credential_source: String,
}

#[derive(Serialize, Debug)]
pub struct ServicesOutput {
    pub services: Vec<ServiceItem>,
}

#[derive(Serialize, Debug)]
pub struct ServiceItem {
    pub name: String,
    pub kind: String,
    pub default_endpoint: String,
    pub regional_pattern: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct CredentialsListOutput {
    pub file: String,
    pub credentials: Vec<CredentialItem>,
}

#[derive(Serialize, Debug)]
pub struct CredentialItem {
    pub id: String,
    pub description: String,
    pub scope: String,
    pub access_key_id: String,
}

#[derive(Serialize, Debug)]
pub struct CredentialCheckOutput {
    pub credential_source: String,
    pub access_key_id: String,
    pub has_session_token: bool,
    pub expires: bool,
}
