use log::{debug, info};

use gsuite_core::{Context, Error, Result, Signer};
use gsuite_google::{
    AccountKey, DefaultCredentialProvider, ImpersonatedCredentialProvider, JwtConfig,
    JwtCredentialProvider, RequestSigner, CLOUD_PLATFORM_SCOPE,
};

use crate::config::Config;
use crate::service::ClientOption;
use crate::transport::HttpClient;

/// AuthStrategy is how a [`Config`] authenticates, chosen once from its fields.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// A service account key acting on behalf of `subject` through domain-wide delegation.
    ExplicitCredentials {
        /// Path to the key file, or the key's JSON content.
        credentials: String,
        /// The user the service account acts as.
        subject: String,
    },
    /// Ambient credentials impersonating `target_principal`.
    ImpersonatedAmbient {
        /// The identity to impersonate, also used as the delegated subject.
        target_principal: String,
    },
    /// Ambient credentials as they are.
    AmbientDefault,
}

impl std::fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthStrategy::ExplicitCredentials { subject, .. } => f
                .debug_struct("ExplicitCredentials")
                .field("subject", subject)
                .finish_non_exhaustive(),
            AuthStrategy::ImpersonatedAmbient { target_principal } => f
                .debug_struct("ImpersonatedAmbient")
                .field("target_principal", target_principal)
                .finish(),
            AuthStrategy::AmbientDefault => f.write_str("AmbientDefault"),
        }
    }
}

impl AuthStrategy {
    /// Pick the strategy for `cfg`.
    ///
    /// Explicit credentials win over ambient ones. They need an impersonated user,
    /// a missing one is reported before anything is read.
    pub fn select(cfg: &Config) -> Result<Self> {
        match (cfg.credentials(), cfg.impersonated_user_email()) {
            (Some(credentials), Some(subject)) => Ok(AuthStrategy::ExplicitCredentials {
                credentials: credentials.to_string(),
                subject: subject.to_string(),
            }),
            (Some(_), None) => Err(Error::config_invalid(
                "required field missing: impersonated_user_email",
            )),
            (None, Some(email)) => Ok(AuthStrategy::ImpersonatedAmbient {
                target_principal: email.to_string(),
            }),
            (None, None) => Ok(AuthStrategy::AmbientDefault),
        }
    }

    /// Build the authentication option of this strategy.
    ///
    /// Explicit and ambient default credentials produce an [`HttpClient`], ambient
    /// impersonation produces a token source.
    pub async fn authenticate(&self, ctx: &Context, scopes: &[String]) -> Result<ClientOption> {
        match self {
            AuthStrategy::ExplicitCredentials {
                credentials,
                subject,
            } => {
                let content = read_path_or_contents(ctx, credentials).await?;
                let key = parse_account_key(&content)?;
                info!(
                    "authenticating as {} with scopes {:?}, private key length {}",
                    key.client_email,
                    scopes,
                    key.private_key.len()
                );

                let config = JwtConfig::from_account_key(&key)
                    .with_scopes(scopes.to_vec())
                    .with_subject(subject.clone());
                let signer = Signer::new(
                    ctx.clone(),
                    JwtCredentialProvider::new(config),
                    RequestSigner::new(),
                );
                Ok(ClientOption::HttpClient(HttpClient::new(signer)))
            }
            AuthStrategy::ImpersonatedAmbient { target_principal } => {
                let signer = impersonated_token_source(ctx, target_principal, scopes)
                    .await
                    .map_err(|e| {
                        Error::authentication_failed("failed to create impersonated token source")
                            .with_source(e)
                    })?;
                Ok(ClientOption::TokenSource(signer))
            }
            AuthStrategy::AmbientDefault => {
                let provider = DefaultCredentialProvider::discover(ctx, scopes)
                    .await
                    .map_err(|e| {
                        Error::authentication_failed("failed to create client").with_source(e)
                    })?;
                let signer = Signer::new(ctx.clone(), provider, RequestSigner::new());
                Ok(ClientOption::HttpClient(HttpClient::new(signer)))
            }
        }
    }
}

/// Read `value` as a file path if such a file exists, else take it as the content itself.
///
/// A leading `~` is expanded to the home directory first. A path that exists but
/// cannot be read, or a `~` path without a home directory, is an error.
pub async fn read_path_or_contents(ctx: &Context, value: &str) -> Result<String> {
    let path = ctx.expand_home_dir(value).ok_or_else(|| {
        Error::credential_invalid("Error loading credentials").with_source(Error::config_invalid(
            format!("cannot expand {value}: home directory is unknown"),
        ))
    })?;

    if !ctx.file_exists(&path).await {
        debug!("credentials are not a file path, using them as content");
        return Ok(value.to_string());
    }

    let content = ctx
        .file_read_as_string(&path)
        .await
        .map_err(|e| Error::credential_invalid("Error loading credentials").with_source(e))?;
    debug!("read credentials from file {path}");
    Ok(content)
}

fn parse_account_key(content: &str) -> Result<AccountKey> {
    AccountKey::from_json(content).map_err(|e| {
        Error::credential_invalid(format!("Error parsing credentials '{content}'")).with_source(e)
    })
}

async fn impersonated_token_source(
    ctx: &Context,
    target_principal: &str,
    scopes: &[String],
) -> Result<Signer<gsuite_google::Token>> {
    let source =
        DefaultCredentialProvider::discover(ctx, &[CLOUD_PLATFORM_SCOPE.to_string()]).await?;
    debug!(
        "impersonating {target_principal} with credentials from {}",
        source.source()
    );

    let provider = ImpersonatedCredentialProvider::new(source, target_principal)
        .with_scopes(scopes.to_vec())
        .with_subject(target_principal);
    provider.validate()?;

    Ok(Signer::new(ctx.clone(), provider, RequestSigner::new()))
}
