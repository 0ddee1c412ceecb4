use gsuite_core::time::{now, DateTime};
use gsuite_core::utils::Redact;
use gsuite_core::{Error, Result, SigningCredential};
use serde::Deserialize;
use std::fmt::{self, Debug};

/// AccountKey is the parsed form of a service account JSON key.
///
/// Unknown keys are ignored and missing keys are left empty, so any key file
/// issued by the console can be parsed.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccountKey {
    /// Id of the private key.
    pub private_key_id: String,
    /// PEM encoded private key.
    pub private_key: String,
    /// Email of the service account.
    pub client_email: String,
    /// Numeric client id of the service account.
    pub client_id: String,
}

impl AccountKey {
    /// Parse an account key from JSON content.
    ///
    /// The returned error is the raw parser error, callers decide how much context to add.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

impl Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountKey")
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &Redact::from(&self.private_key))
            .field("client_email", &self.client_email)
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// OAuth2 user credentials, as written by `gcloud auth application-default login`.
#[derive(Clone, Deserialize)]
pub struct OAuth2Credentials {
    /// The client ID.
    pub client_id: String,
    /// The client secret.
    pub client_secret: String,
    /// The refresh token.
    pub refresh_token: String,
}

impl Debug for OAuth2Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("refresh_token", &Redact::from(&self.refresh_token))
            .finish()
    }
}

/// Credentials an impersonated service account borrows its authority from.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceCredentials {
    /// Service account key.
    ServiceAccount(AccountKey),
    /// OAuth2 user credentials.
    AuthorizedUser(OAuth2Credentials),
}

/// ImpersonatedServiceAccount is written by
/// `gcloud auth application-default login --impersonate-service-account`.
#[derive(Clone, Debug, Deserialize)]
pub struct ImpersonatedServiceAccount {
    /// The `generateAccessToken` URL of the target service account.
    pub service_account_impersonation_url: String,
    /// The credentials used to call the IAM Credentials API.
    pub source_credentials: SourceCredentials,
    /// Optional delegation chain.
    #[serde(default)]
    pub delegates: Vec<String>,
}

impl ImpersonatedServiceAccount {
    /// Extract the target service account email from the impersonation URL.
    ///
    /// The URL looks like
    /// `https://iamcredentials.googleapis.com/v1/projects/-/serviceAccounts/<email>:generateAccessToken`.
    pub fn target_principal(&self) -> Result<String> {
        let url = &self.service_account_impersonation_url;
        url.rsplit_once("/serviceAccounts/")
            .and_then(|(_, rest)| rest.split_once(':'))
            .map(|(email, _)| email.to_string())
            .filter(|email| !email.is_empty())
            .ok_or_else(|| {
                Error::credential_invalid(format!(
                    "failed to find target principal in impersonation url {url}"
                ))
            })
    }
}

/// CredentialFile represents the supported application default credential files.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialFile {
    /// Service account with private key.
    ServiceAccount(AccountKey),
    /// OAuth2 authorized user credentials.
    AuthorizedUser(OAuth2Credentials),
    /// Impersonated service account.
    ImpersonatedServiceAccount(ImpersonatedServiceAccount),
}

impl CredentialFile {
    /// Parse credential file from bytes.
    pub fn from_slice(v: &[u8]) -> Result<Self> {
        serde_json::from_slice(v)
            .map_err(|e| Error::credential_invalid("failed to parse credential file").with_source(e))
    }
}

/// Token represents an OAuth2 access token with expiration.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    /// The access token.
    pub access_token: String,
    /// The token type, `Bearer` for every Google endpoint.
    pub token_type: String,
    /// The expiration time of the token.
    pub expires_at: Option<DateTime>,
}

impl Token {
    /// Create a bearer token.
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &Redact::from(&self.access_token))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl SigningCredential for Token {
    fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }

        match self.expires_at {
            Some(expires_at) => {
                // Consider token invalid if it expires within 2 minutes
                let buffer = chrono::TimeDelta::minutes(2);
                now() < expires_at - buffer
            }
            None => true,
        }
    }
}
