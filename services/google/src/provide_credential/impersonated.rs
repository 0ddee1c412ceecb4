use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use percent_encoding::utf8_percent_encode;

use gsuite_core::time::{now, parse_rfc3339};
use gsuite_core::{Context, Error, ProvideCredential, Result};

use crate::constants::{
    DEFAULT_TOKEN_LIFETIME, IAM_CREDENTIALS_ENDPOINT, JWT_BEARER_GRANT_TYPE,
    PATH_SEGMENT_ENCODE_SET, TOKEN_URL,
};
use crate::credential::Token;
use crate::oauth2::helpers;
use crate::oauth2::types::{
    Claims, GenerateAccessTokenRequest, GenerateAccessTokenResponse, JwtBearerRequest,
    SignJwtRequest, SignJwtResponse, TokenResponse,
};

/// ImpersonatedCredentialProvider acts as a target service account using the authority
/// of a source credential, through the IAM Credentials API.
///
/// Without a subject the target's own access token is minted with
/// `generateAccessToken`. With a subject the target signs a delegated assertion with
/// `signJwt`, which is then exchanged at the token endpoint so the token acts on behalf
/// of that user.
#[derive(Clone)]
pub struct ImpersonatedCredentialProvider {
    source: Arc<dyn ProvideCredential<Credential = Token>>,
    target_principal: String,
    scopes: Vec<String>,
    subject: Option<String>,
    delegates: Vec<String>,
    lifetime: Duration,
    endpoint: String,
    token_url: String,
}

impl Debug for ImpersonatedCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImpersonatedCredentialProvider")
            .field("source", &self.source)
            .field("target_principal", &self.target_principal)
            .field("scopes", &self.scopes)
            .field("subject", &self.subject)
            .field("delegates", &self.delegates)
            .finish()
    }
}

impl ImpersonatedCredentialProvider {
    /// Create a new provider impersonating `target_principal` with tokens from `source`.
    pub fn new(
        source: impl ProvideCredential<Credential = Token>,
        target_principal: impl Into<String>,
    ) -> Self {
        Self::from_arc(Arc::new(source), target_principal)
    }

    /// Create a new provider from a shared source.
    pub fn from_arc(
        source: Arc<dyn ProvideCredential<Credential = Token>>,
        target_principal: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target_principal: target_principal.into(),
            scopes: Vec::new(),
            subject: None,
            delegates: Vec::new(),
            lifetime: DEFAULT_TOKEN_LIFETIME,
            endpoint: IAM_CREDENTIALS_ENDPOINT.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }

    /// Set the requested scopes.
    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the user the target service account acts on behalf of.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the delegation chain between source and target.
    pub fn with_delegates(mut self, delegates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.delegates = delegates.into_iter().map(Into::into).collect();
        self
    }

    /// Set the lifetime of the issued token.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Override the IAM Credentials endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the token endpoint used to exchange delegated assertions.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Check the configuration before any token is requested.
    pub fn validate(&self) -> Result<()> {
        if self.target_principal.is_empty() {
            return Err(Error::config_invalid(
                "impersonate: a target service account must be provided",
            ));
        }
        if self.scopes.is_empty() {
            return Err(Error::config_invalid(
                "impersonate: scopes must be provided",
            ));
        }
        Ok(())
    }

    fn resource_url(&self, method: &str) -> String {
        format!(
            "{}/projects/-/serviceAccounts/{}:{method}",
            self.endpoint.trim_end_matches('/'),
            utf8_percent_encode(&self.target_principal, &PATH_SEGMENT_ENCODE_SET)
        )
    }

    fn formatted_delegates(&self) -> Vec<String> {
        self.delegates
            .iter()
            .map(|d| format!("projects/-/serviceAccounts/{d}"))
            .collect()
    }

    async fn source_token(&self, ctx: &Context) -> Result<Token> {
        self.source.provide_credential(ctx).await?.ok_or_else(|| {
            Error::authentication_failed("impersonate: source credential is not available")
        })
    }

    async fn generate_access_token(&self, ctx: &Context, source: &Token) -> Result<Token> {
        debug!(
            "generating access token for impersonated service account {}",
            self.target_principal
        );

        let resp: GenerateAccessTokenResponse = helpers::post_json_with_auth(
            ctx,
            &self.resource_url("generateAccessToken"),
            &GenerateAccessTokenRequest {
                delegates: self.formatted_delegates(),
                scope: self.scopes.clone(),
                lifetime: format!("{}s", self.lifetime.as_secs()),
            },
            source,
        )
        .await?;

        Ok(Token::new(
            resp.access_token,
            Some(parse_rfc3339(&resp.expire_time)?),
        ))
    }

    async fn sign_jwt(&self, ctx: &Context, source: &Token, subject: &str) -> Result<Token> {
        debug!(
            "signing delegated assertion for {subject} with service account {}",
            self.target_principal
        );

        let iat = now().timestamp().max(0) as u64;
        let claims = Claims {
            iss: self.target_principal.clone(),
            scope: self.scopes.join(" "),
            aud: self.token_url.clone(),
            exp: iat + self.lifetime.as_secs(),
            iat,
            sub: Some(subject.to_string()),
        };
        let payload = serde_json::to_string(&claims)
            .map_err(|e| Error::unexpected("failed to serialize claims").with_source(e))?;

        let signed: SignJwtResponse = helpers::post_json_with_auth(
            ctx,
            &self.resource_url("signJwt"),
            &SignJwtRequest {
                payload,
                delegates: self.formatted_delegates(),
            },
            source,
        )
        .await?;

        let resp: TokenResponse = helpers::post_form(
            ctx,
            &self.token_url,
            &JwtBearerRequest {
                grant_type: JWT_BEARER_GRANT_TYPE,
                assertion: &signed.signed_jwt,
            },
        )
        .await?;

        helpers::token_from_response(resp)
    }
}

#[async_trait::async_trait]
impl ProvideCredential for ImpersonatedCredentialProvider {
    type Credential = Token;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.validate()?;

        let source = self.source_token(ctx).await?;
        let token = match &self.subject {
            Some(subject) => self.sign_jwt(ctx, &source, subject).await?,
            None => self.generate_access_token(ctx, &source).await?,
        };

        Ok(Some(token))
    }
}
