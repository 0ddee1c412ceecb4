//! Google OAuth2 credentials for Workspace Admin SDK clients.
//!
//! This crate turns service account keys, authorized user credentials and the
//! ambient environment into OAuth2 access tokens:
//!
//! - [`JwtCredentialProvider`]: two-legged JWT bearer flow, optionally acting on
//!   behalf of a Workspace user through domain-wide delegation.
//! - [`ImpersonatedCredentialProvider`]: borrows another identity through the IAM
//!   Credentials API.
//! - [`DefaultCredentialProvider`]: application default credentials discovery.
//! - [`RequestSigner`]: attaches the resulting token to outgoing requests.

mod constants;
pub use constants::{CLOUD_PLATFORM_SCOPE, TOKEN_URL};

mod credential;
pub use credential::{
    AccountKey, CredentialFile, ImpersonatedServiceAccount, OAuth2Credentials, SourceCredentials,
    Token,
};

mod oauth2;

mod provide_credential;
pub use provide_credential::{
    AuthorizedUserCredentialProvider, CredentialSource, DefaultCredentialProvider,
    ImpersonatedCredentialProvider, JwtConfig, JwtCredentialProvider,
    VmMetadataCredentialProvider,
};

mod sign_request;
pub use sign_request::RequestSigner;
