use std::fmt::{self, Debug};
use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::debug;

use gsuite_core::time::now;
use gsuite_core::utils::Redact;
use gsuite_core::{Context, Error, ProvideCredential, Result};

use crate::constants::{DEFAULT_TOKEN_LIFETIME, JWT_BEARER_GRANT_TYPE, TOKEN_URL};
use crate::credential::{AccountKey, Token};
use crate::oauth2::helpers;
use crate::oauth2::types::{Claims, JwtBearerRequest, TokenResponse};

/// Assertions are backdated to tolerate clock skew with the token endpoint.
const CLOCK_SKEW: u64 = 10;

/// JwtConfig describes a two-legged OAuth2 flow signed with a service account key.
///
/// Setting a subject makes the service account act on behalf of that user, which is
/// what the Admin SDK requires: only Workspace administrators may call it, so the
/// service account must be granted domain-wide delegation and impersonate one.
#[derive(Clone)]
pub struct JwtConfig {
    /// Email of the service account, used as the assertion issuer.
    pub email: String,
    /// PEM encoded RSA private key.
    pub private_key: String,
    /// Scopes requested for the token.
    pub scopes: Vec<String>,
    /// The user to act on behalf of.
    pub subject: Option<String>,
    /// Token endpoint, also the assertion audience.
    pub token_url: String,
    /// Lifetime of the signed assertion.
    pub expires: Duration,
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("email", &self.email)
            .field("private_key", &Redact::from(&self.private_key))
            .field("scopes", &self.scopes)
            .field("subject", &self.subject)
            .field("token_url", &self.token_url)
            .finish()
    }
}

impl JwtConfig {
    /// Create a config for the given service account.
    pub fn new(email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            private_key: private_key.into(),
            scopes: Vec::new(),
            subject: None,
            token_url: TOKEN_URL.to_string(),
            expires: DEFAULT_TOKEN_LIFETIME,
        }
    }

    /// Create a config from a parsed account key.
    pub fn from_account_key(key: &AccountKey) -> Self {
        Self::new(&key.client_email, &key.private_key)
    }

    /// Set the requested scopes.
    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the user to impersonate.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Override the token endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    fn claims(&self) -> Claims {
        let iat = (now().timestamp().max(0) as u64).saturating_sub(CLOCK_SKEW);

        Claims {
            iss: self.email.clone(),
            scope: self.scopes.join(" "),
            aud: self.token_url.clone(),
            exp: iat + self.expires.as_secs(),
            iat,
            sub: self.subject.clone(),
        }
    }

    /// Sign the assertion exchanged for an access token.
    pub fn sign_assertion(&self) -> Result<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            Error::credential_invalid("failed to parse RSA private key").with_source(e)
        })?;

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &self.claims(), &key)
            .map_err(|e| Error::unexpected("failed to encode JWT").with_source(e))
    }
}

/// JwtCredentialProvider exchanges a signed assertion for an access token.
///
/// Nothing is sent until the first token is requested.
#[derive(Debug, Clone)]
pub struct JwtCredentialProvider {
    config: JwtConfig,
}

impl JwtCredentialProvider {
    /// Create a new JwtCredentialProvider.
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Get the config of this provider.
    pub fn config(&self) -> &JwtConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl ProvideCredential for JwtCredentialProvider {
    type Credential = Token;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        debug!(
            "exchanging JWT assertion of {} for token with scopes: {:?}",
            self.config.email, self.config.scopes
        );

        let assertion = self.config.sign_assertion()?;
        let resp: TokenResponse = helpers::post_form(
            ctx,
            &self.config.token_url,
            &JwtBearerRequest {
                grant_type: JWT_BEARER_GRANT_TYPE,
                assertion: &assertion,
            },
        )
        .await?;

        helpers::token_from_response(resp).map(Some)
    }
}
