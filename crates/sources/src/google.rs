//! Client for the spreadsheet service's values endpoint.
//!
//! Authenticates as a service account: a short-lived RS256 JWT assertion is
//! signed with [`jsonwebtoken`] and exchanged for a bearer token, which is
//! then used for a single `GET /v4/spreadsheets/{id}/values/{range}` call.
//! Values are requested unformatted, so numeric cells arrive as JSON numbers
//! rather than locale-formatted text. Tokens are not cached; every import
//! performs one exchange.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialProvider, ServiceAccountCredentials};
use crate::error::SourceError;
use crate::locator::SheetId;

pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const VALUE_RENDER_OPTION: &str = "UNFORMATTED_VALUE";

/// Lifetime requested for the signed assertion.
const ASSERTION_TTL_SECS: i64 = 3600;

/// Fetches the raw cell values of a sheet range.
///
/// The remote adapter depends on this seam rather than on the HTTP client so
/// that it can be exercised without network access.
#[async_trait]
pub trait SheetValuesFetcher: Send + Sync {
    /// Return the rows of `range`, each row a list of cell texts. Trailing
    /// empty cells may be omitted by the service.
    async fn fetch_values(
        &self,
        sheet: &SheetId,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SourceError>;
}

/// Connection settings for [`GoogleSheetsClient`].
#[derive(Debug, Clone)]
pub struct SheetsClientConfig {
    /// Base URL of the service, without the `/v4` suffix.
    pub api_base: String,
    /// Timeout applied to each outbound request.
    pub timeout: Duration,
}

impl Default for SheetsClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://sheets.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the spreadsheet service.
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    api_base: reqwest::Url,
    credentials: Arc<dyn CredentialProvider>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl GoogleSheetsClient {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        config: SheetsClientConfig,
    ) -> Result<Self, SourceError> {
        let api_base = reqwest::Url::parse(&config.api_base)
            .map_err(|e| SourceError::Endpoint(format!("{}: {e}", config.api_base)))?;
        if api_base.cannot_be_a_base() {
            return Err(SourceError::Endpoint(config.api_base));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_base,
            credentials,
        })
    }

    /// URL of the values endpoint for `range`, with the range percent-encoded
    /// as a single path segment.
    fn values_url(&self, sheet: &SheetId, range: &str) -> Result<reqwest::Url, SourceError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::Endpoint(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", sheet.as_str(), "values", range]);
        url.query_pairs_mut()
            .append_pair("valueRenderOption", VALUE_RENDER_OPTION);
        Ok(url)
    }

    /// Exchange a signed assertion for an access token.
    async fn access_token(&self, creds: &ServiceAccountCredentials) -> Result<String, SourceError> {
        let assertion = sign_assertion(creds, chrono::Utc::now().timestamp())?;

        let response = self
            .client
            .post(&creds.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            return Err(SourceError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl SheetValuesFetcher for GoogleSheetsClient {
    async fn fetch_values(
        &self,
        sheet: &SheetId,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SourceError> {
        let creds = self.credentials.load()?;
        let token = self.access_token(&creds).await?;

        tracing::debug!(sheet_id = %sheet, range, "Fetching sheet values");

        let url = self.values_url(sheet, range)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            return Err(SourceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }
}

/// Sign the service-account JWT assertion issued at `issued_at`.
pub fn sign_assertion(
    creds: &ServiceAccountCredentials,
    issued_at: i64,
) -> Result<String, SourceError> {
    let claims = AssertionClaims {
        iss: &creds.client_email,
        scope: SHEETS_READONLY_SCOPE,
        aud: &creds.token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_TTL_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = creds.private_key_id.clone();

    let key = EncodingKey::from_rsa_pem(creds.private_key.as_bytes())
        .map_err(|e| SourceError::Credentials(format!("invalid private key: {e}")))?;

    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| SourceError::Credentials(format!("failed to sign assertion: {e}")))
}

/// Render one value from the service as cell text.
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string())
}
