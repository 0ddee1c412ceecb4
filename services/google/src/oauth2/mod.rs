//! OAuth2 utilities shared by the credential providers.

pub mod helpers;
pub mod types;
