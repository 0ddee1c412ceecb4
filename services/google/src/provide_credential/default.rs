use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use gsuite_core::{Context, Error, ProvideCredential, Result};

use crate::constants::{
    CLOUDSDK_CONFIG, CLOUD_PLATFORM_SCOPE, GOOGLE_APPLICATION_CREDENTIALS,
    WELL_KNOWN_CREDENTIAL_FILE,
};
use crate::credential::{CredentialFile, SourceCredentials, Token};

use super::{
    AuthorizedUserCredentialProvider, ImpersonatedCredentialProvider, JwtConfig,
    JwtCredentialProvider, VmMetadataCredentialProvider,
};

/// Where the application default credentials were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// File named by `GOOGLE_APPLICATION_CREDENTIALS`.
    EnvironmentFile(String),
    /// gcloud's well-known application default credentials file.
    WellKnownFile(String),
    /// Compute Engine metadata service.
    VmMetadata,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::EnvironmentFile(path) => {
                write!(f, "{GOOGLE_APPLICATION_CREDENTIALS} file {path}")
            }
            CredentialSource::WellKnownFile(path) => write!(f, "well-known file {path}"),
            CredentialSource::VmMetadata => write!(f, "VM metadata service"),
        }
    }
}

/// DefaultCredentialProvider resolves application default credentials.
///
/// Discovery happens once, when the provider is built, and fails if the environment
/// holds no credentials at all. Lookup order:
///
/// 1. the file named by `GOOGLE_APPLICATION_CREDENTIALS`, if not empty
/// 2. gcloud's well-known file under `CLOUDSDK_CONFIG`, `%APPDATA%/gcloud` or `~/.config/gcloud`
/// 3. the Compute Engine metadata service
#[derive(Debug, Clone)]
pub struct DefaultCredentialProvider {
    source: CredentialSource,
    inner: Arc<dyn ProvideCredential<Credential = Token>>,
}

impl DefaultCredentialProvider {
    /// Discover credentials for the given scopes.
    pub async fn discover(ctx: &Context, scopes: &[String]) -> Result<Self> {
        if let Some(path) = ctx.env_var_first(&[GOOGLE_APPLICATION_CREDENTIALS]) {
            let inner = Self::load_file(ctx, &path, scopes).await.map_err(|e| {
                Error::authentication_failed(format!(
                    "error getting credentials using {GOOGLE_APPLICATION_CREDENTIALS} environment variable"
                ))
                .with_source(e)
            })?;
            return Ok(Self::found(CredentialSource::EnvironmentFile(path), inner));
        }

        if let Some(path) = Self::well_known_file(ctx) {
            match ctx.file_read(&path).await {
                Ok(content) => {
                    let inner = Self::parse_file(&content, scopes).map_err(|e| {
                        Error::authentication_failed(format!(
                            "error getting credentials using well-known file {path}"
                        ))
                        .with_source(e)
                    })?;
                    return Ok(Self::found(CredentialSource::WellKnownFile(path), inner));
                }
                Err(err) => debug!("well-known credential file {path} is not readable: {err}"),
            }
        }

        if VmMetadataCredentialProvider::is_available(ctx).await {
            let inner = Arc::new(VmMetadataCredentialProvider::new().with_scopes(scopes.to_vec()));
            return Ok(Self::found(CredentialSource::VmMetadata, inner));
        }

        Err(Error::authentication_failed(
            "could not find default credentials",
        ))
    }

    fn found(
        source: CredentialSource,
        inner: Arc<dyn ProvideCredential<Credential = Token>>,
    ) -> Self {
        info!("found application default credentials in {source}");
        Self { source, inner }
    }

    /// Where the credentials were found.
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    fn well_known_file(ctx: &Context) -> Option<String> {
        let config_dir = if let Some(v) = ctx.env_var_first(&[CLOUDSDK_CONFIG]) {
            v
        } else if let Some(v) = ctx.env_var_first(&["APPDATA"]) {
            format!("{v}/gcloud")
        } else {
            let home = ctx.home_dir()?;
            format!("{}/.config/gcloud", home.to_string_lossy())
        };

        Some(format!("{config_dir}/{WELL_KNOWN_CREDENTIAL_FILE}"))
    }

    async fn load_file(
        ctx: &Context,
        path: &str,
        scopes: &[String],
    ) -> Result<Arc<dyn ProvideCredential<Credential = Token>>> {
        let content = ctx.file_read(path).await?;
        Self::parse_file(&content, scopes)
    }

    fn parse_file(
        content: &[u8],
        scopes: &[String],
    ) -> Result<Arc<dyn ProvideCredential<Credential = Token>>> {
        let provider: Arc<dyn ProvideCredential<Credential = Token>> =
            match CredentialFile::from_slice(content)? {
                CredentialFile::ServiceAccount(key) => {
                    debug!("loaded service account credential {}", key.client_email);
                    Arc::new(JwtCredentialProvider::new(
                        JwtConfig::from_account_key(&key).with_scopes(scopes.to_vec()),
                    ))
                }
                CredentialFile::AuthorizedUser(au) => {
                    debug!("loaded authorized user credential {}", au.client_id);
                    Arc::new(AuthorizedUserCredentialProvider::new(au))
                }
                CredentialFile::ImpersonatedServiceAccount(isa) => {
                    let target = isa.target_principal()?;
                    debug!("loaded impersonated service account credential for {target}");

                    let source: Arc<dyn ProvideCredential<Credential = Token>> =
                        match isa.source_credentials {
                            SourceCredentials::ServiceAccount(key) => {
                                Arc::new(JwtCredentialProvider::new(
                                    JwtConfig::from_account_key(&key)
                                        .with_scopes([CLOUD_PLATFORM_SCOPE]),
                                ))
                            }
                            SourceCredentials::AuthorizedUser(au) => {
                                Arc::new(AuthorizedUserCredentialProvider::new(au))
                            }
                        };

                    Arc::new(
                        ImpersonatedCredentialProvider::from_arc(source, target)
                            .with_scopes(scopes.to_vec())
                            .with_delegates(isa.delegates),
                    )
                }
            };

        Ok(provider)
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Token;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.inner.provide_credential(ctx).await
    }
}
