use http::header;
use log::debug;

use gsuite_core::{Context, Error, Result, SignRequest};

use crate::credential::Token;

/// RequestSigner attaches OAuth2 access tokens to Google API requests.
#[derive(Debug, Default)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a new RequestSigner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Token;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let token = credential
            .ok_or_else(|| Error::authentication_failed("no valid credential available"))?;

        debug!("signing request to {} with {} token", req.uri, token.token_type);

        let mut value: http::HeaderValue =
            format!("{} {}", token.token_type, token.access_token).parse()?;
        value.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, value);

        Ok(())
    }
}
