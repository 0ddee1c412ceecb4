// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use log::debug;

use gsuite_core::{Context, ProvideCredential, Result};

use crate::constants::{REFRESH_TOKEN_GRANT_TYPE, TOKEN_URL};
use crate::credential::{OAuth2Credentials, Token};
use crate::oauth2::helpers;
use crate::oauth2::types::{RefreshTokenRequest, TokenResponse};

/// AuthorizedUserCredentialProvider exchanges OAuth2 user credentials for access tokens.
///
/// The scopes of a user credential are fixed when it is issued, so none are requested here.
#[derive(Debug, Clone)]
pub struct AuthorizedUserCredentialProvider {
    oauth2_credentials: OAuth2Credentials,
    token_url: String,
}

impl AuthorizedUserCredentialProvider {
    /// Create a new AuthorizedUserCredentialProvider.
    pub fn new(oauth2_credentials: OAuth2Credentials) -> Self {
        Self {
            oauth2_credentials,
            token_url: TOKEN_URL.to_string(),
        }
    }

    /// Override the token endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

#[async_trait::async_trait]
impl ProvideCredential for AuthorizedUserCredentialProvider {
    type Credential = Token;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        debug!("exchanging refresh token for access token");

        let resp: TokenResponse = helpers::post_form(
            ctx,
            &self.token_url,
            &RefreshTokenRequest {
                grant_type: REFRESH_TOKEN_GRANT_TYPE,
                refresh_token: &self.oauth2_credentials.refresh_token,
                client_id: &self.oauth2_credentials.client_id,
                client_secret: &self.oauth2_credentials.client_secret,
            },
        )
        .await?;

        helpers::token_from_response(resp).map(Some)
    }
}
