use log::debug;

use gsuite_core::{Context, Result};

use crate::config::Config;
use crate::constants::LOGGING_TRANSPORT_NAME;
use crate::service::{ClientOption, DirectoryService, GroupSettingsService};
use crate::strategy::AuthStrategy;

/// Client is a validated configuration together with its authenticated service handles.
///
/// A `Client` only comes out of [`Config::load_and_validate`], so handles are never
/// reachable from a configuration that failed validation.
#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
    directory: DirectoryService,
    group_settings: GroupSettingsService,
}

impl Client {
    /// The configuration this client was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle on the Directory API.
    pub fn directory(&self) -> &DirectoryService {
        &self.directory
    }

    /// Handle on the Groups Settings API.
    pub fn group_settings(&self) -> &GroupSettingsService {
        &self.group_settings
    }

    /// The user agent both handles send.
    pub fn user_agent(&self) -> &str {
        self.directory.user_agent()
    }
}

/// Build the user agent reported to Google, `(<os> <arch>) Terraform/<version>`.
pub fn user_agent(terraform_version: &str) -> String {
    format!(
        "({} {}) Terraform/{terraform_version}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

impl Config {
    /// Validate the configuration and build authenticated service handles.
    ///
    /// No token is requested here: explicit credentials are only parsed, ambient
    /// credentials are only discovered. The first API call fetches the token.
    ///
    /// # Errors
    ///
    /// - `ConfigInvalid` if credentials are set without `impersonated_user_email`.
    /// - `CredentialInvalid` if the credentials are not a service account key.
    /// - `AuthenticationFailed` if ambient credentials can't be turned into a token source.
    /// - `ServiceInvalid` if a service handle can't be built.
    pub async fn load_and_validate(self, ctx: &Context, terraform_version: &str) -> Result<Client> {
        let strategy = AuthStrategy::select(&self)?;
        let scopes = self.scopes();
        debug!("authenticating with {strategy:?}");

        let auth = match strategy.authenticate(ctx, &scopes).await? {
            ClientOption::HttpClient(client) => {
                ClientOption::HttpClient(client.with_logging(LOGGING_TRANSPORT_NAME))
            }
            opt => opt,
        };
        let opts = [auth];
        let user_agent = user_agent(terraform_version);

        let mut directory = DirectoryService::new(&opts)?;
        directory.set_user_agent(user_agent.clone());

        let mut group_settings = GroupSettingsService::new(&opts)?;
        group_settings.set_user_agent(user_agent);

        Ok(Client {
            config: self,
            directory,
            group_settings,
        })
    }
}
