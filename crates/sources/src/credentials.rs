//! Service-account credentials for the spreadsheet service.

use crate::error::SourceError;

pub const ENV_CLIENT_EMAIL: &str = "GOOGLE_SHEETS_API_CLIENT_EMAIL";
pub const ENV_PRIVATE_KEY: &str = "GOOGLE_SHEETS_API_PRIVATE_KEY";
pub const ENV_PRIVATE_KEY_ID: &str = "GOOGLE_SHEETS_API_PRIVATE_KEY_ID";
pub const ENV_PROJECT_ID: &str = "GOOGLE_SHEETS_API_PROJECT_ID";
pub const ENV_TOKEN_URI: &str = "GOOGLE_SHEETS_API_TOKEN_URI";

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// A service account able to sign token requests.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    pub private_key_id: Option<String>,
    pub project_id: Option<String>,
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Supplies credentials on demand, once per remote import.
pub trait CredentialProvider: Send + Sync {
    fn load(&self) -> Result<ServiceAccountCredentials, SourceError>;
}

/// Reads credentials from `GOOGLE_SHEETS_API_*` environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialProvider;

impl CredentialProvider for EnvCredentialProvider {
    fn load(&self) -> Result<ServiceAccountCredentials, SourceError> {
        credentials_from_lookup(|key| std::env::var(key).ok())
    }
}

/// Returns a fixed set of credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider(pub ServiceAccountCredentials);

impl CredentialProvider for StaticCredentialProvider {
    fn load(&self) -> Result<ServiceAccountCredentials, SourceError> {
        Ok(self.0.clone())
    }
}

/// Build credentials from a key/value lookup using the environment names.
///
/// Escaped `\n` sequences in the private key are expanded, since keys are
/// usually stored on a single line.
pub fn credentials_from_lookup<F>(lookup: F) -> Result<ServiceAccountCredentials, SourceError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let client_email = non_empty(ENV_CLIENT_EMAIL)
        .ok_or_else(|| SourceError::Credentials(format!("{ENV_CLIENT_EMAIL} is not set")))?;
    let private_key = non_empty(ENV_PRIVATE_KEY)
        .ok_or_else(|| SourceError::Credentials(format!("{ENV_PRIVATE_KEY} is not set")))?
        .replace("\\n", "\n");

    Ok(ServiceAccountCredentials {
        client_email,
        private_key,
        private_key_id: non_empty(ENV_PRIVATE_KEY_ID),
        project_id: non_empty(ENV_PROJECT_ID),
        token_uri: non_empty(ENV_TOKEN_URI).unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
    })
}
