use std::fmt::{self, Debug};
use std::time::Duration;

use gsuite_core::utils::Redact;
use gsuite_core::Context;

use crate::constants::*;

/// Scopes requested when [`Config::oauth_scopes`] is empty, in this order.
pub const DEFAULT_OAUTH_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/admin.directory.group",
    "https://www.googleapis.com/auth/admin.directory.user",
    "https://www.googleapis.com/auth/admin.directory.userschema",
];

/// Config carries the provider settings used to build authenticated clients.
///
/// A config is consumed by [`Config::load_and_validate`](crate::Config::load_and_validate)
/// and is read-only from then on.
#[derive(Clone)]
pub struct Config {
    /// `credentials` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`GOOGLE_CREDENTIALS`], [`GOOGLE_CLOUD_KEYFILE_JSON`] or
    ///   [`GCLOUD_KEYFILE_JSON`], first one set wins
    ///
    /// The value is either the path of a service account key file or the key's
    /// JSON content.
    pub credentials: Option<String>,
    /// `impersonated_user_email` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`IMPERSONATED_USER_EMAIL`]
    ///
    /// Required when `credentials` is set.
    pub impersonated_user_email: Option<String>,
    /// `customer_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CUSTOMER_ID`]
    ///
    /// Read it through [`Config::customer_id`], which falls back to
    /// [`DEFAULT_CUSTOMER_ID`]. Stored as given, no validation happens on it.
    pub customer_id: Option<String>,
    /// Minutes resource operations may take before giving up, default to `1`.
    pub timeout_minutes: u64,
    /// Scopes requested for the access token, default to [`DEFAULT_OAUTH_SCOPES`] when empty.
    pub oauth_scopes: Vec<String>,
    /// Whether resources that already exist should be adopted instead of failing.
    pub update_existing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: None,
            impersonated_user_email: None,
            customer_id: None,
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            oauth_scopes: Vec::new(),
            update_existing: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("credentials", &Redact::from(&self.credentials))
            .field("impersonated_user_email", &self.impersonated_user_email)
            .field("customer_id", &self.customer_id)
            .field("timeout_minutes", &self.timeout_minutes)
            .field("oauth_scopes", &self.oauth_scopes)
            .field("update_existing", &self.update_existing)
            .finish()
    }
}

impl Config {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if self.credentials.is_none() {
            self.credentials = ctx.env_var_first(&CREDENTIALS_ENV_VARS);
        }
        if let Some(v) = ctx.env_var(IMPERSONATED_USER_EMAIL) {
            self.impersonated_user_email.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(CUSTOMER_ID) {
            self.customer_id.get_or_insert(v);
        }

        self
    }

    /// Set the credentials path or content.
    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// Set the user to impersonate.
    pub fn with_impersonated_user_email(mut self, email: impl Into<String>) -> Self {
        self.impersonated_user_email = Some(email.into());
        self
    }

    /// Set the customer id.
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Set the operation timeout in minutes.
    pub fn with_timeout_minutes(mut self, minutes: u64) -> Self {
        self.timeout_minutes = minutes;
        self
    }

    /// Set the requested scopes.
    pub fn with_oauth_scopes(
        mut self,
        scopes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.oauth_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether existing resources are adopted.
    pub fn with_update_existing(mut self, update_existing: bool) -> Self {
        self.update_existing = update_existing;
        self
    }

    /// The scopes that will be requested.
    pub fn scopes(&self) -> Vec<String> {
        if self.oauth_scopes.is_empty() {
            DEFAULT_OAUTH_SCOPES.iter().map(|s| s.to_string()).collect()
        } else {
            self.oauth_scopes.clone()
        }
    }

    /// The customer the provider manages, `my_customer` unless set.
    pub fn customer_id(&self) -> &str {
        self.customer_id.as_deref().unwrap_or(DEFAULT_CUSTOMER_ID)
    }

    /// The operation timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes.saturating_mul(60))
    }

    pub(crate) fn credentials(&self) -> Option<&str> {
        self.credentials.as_deref().filter(|v| !v.is_empty())
    }

    pub(crate) fn impersonated_user_email(&self) -> Option<&str> {
        self.impersonated_user_email
            .as_deref()
            .filter(|v| !v.is_empty())
    }
}
