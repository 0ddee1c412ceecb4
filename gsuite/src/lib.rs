//! Authenticated Google Workspace Admin clients for Terraform providers.
//!
//! A provider hands its settings to [`Config`], then [`Config::load_and_validate`]
//! picks how to authenticate and returns a [`Client`] with a Directory API handle and
//! a Groups Settings API handle:
//!
//! - `credentials` set: a service account key, given as a path or as JSON content,
//!   acting on behalf of `impersonated_user_email`.
//! - only `impersonated_user_email` set: ambient credentials impersonating that identity.
//! - neither: ambient credentials as they are.
//!
//! ```no_run
//! use gsuite::{default_context, Config};
//!
//! # async fn example() -> gsuite::Result<()> {
//! let ctx = default_context();
//! let client = Config::new()
//!     .from_env(&ctx)
//!     .load_and_validate(&ctx, "1.5.7")
//!     .await?;
//!
//! let directory = client.directory();
//! let req = directory
//!     .request(http::Method::GET, "groups?customer=my_customer")
//!     .body(bytes::Bytes::new())?;
//! let resp = directory.send(req).await?;
//! println!("{}", resp.status());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]

pub use gsuite_core::*;

/// Google OAuth credentials and token providers.
pub mod google {
    pub use gsuite_google::*;
}

mod constants;
pub use constants::{
    CUSTOMER_ID, DEFAULT_CUSTOMER_ID, DEFAULT_TIMEOUT_MINUTES, DIRECTORY_BASE_PATH,
    GCLOUD_KEYFILE_JSON, GOOGLE_CLOUD_KEYFILE_JSON, GOOGLE_CREDENTIALS,
    GROUP_SETTINGS_BASE_PATH, IMPERSONATED_USER_EMAIL, LOGGING_TRANSPORT_NAME,
};

mod config;
pub use config::{Config, DEFAULT_OAUTH_SCOPES};

mod strategy;
pub use strategy::{read_path_or_contents, AuthStrategy};

mod transport;
pub use transport::{HttpClient, LoggingHttpSend};

mod service;
pub use service::{ClientOption, DirectoryService, GroupSettingsService};

mod client;
pub use client::{user_agent, Client};

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;
