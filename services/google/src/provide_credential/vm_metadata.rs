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

use bytes::Bytes;
use log::debug;

use gsuite_core::{Context, Error, ProvideCredential, Result};

use crate::constants::{
    GCE_METADATA_HOST, METADATA_FLAVOR, METADATA_HOST, METADATA_PROBE_HOST,
    METADATA_PROBE_TIMEOUT,
};
use crate::credential::Token;
use crate::oauth2::helpers;
use crate::oauth2::types::TokenResponse;

/// VmMetadataCredentialProvider loads tokens of the attached service account from the
/// Compute Engine metadata service.
#[derive(Debug, Clone, Default)]
pub struct VmMetadataCredentialProvider {
    scopes: Vec<String>,
    endpoint: Option<String>,
}

impl VmMetadataCredentialProvider {
    /// Create a new VmMetadataCredentialProvider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested scopes.
    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the metadata host, for example `localhost:8080`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    fn metadata_host(&self, ctx: &Context) -> String {
        self.endpoint
            .clone()
            .or_else(|| ctx.env_var_first(&[GCE_METADATA_HOST]))
            .unwrap_or_else(|| METADATA_HOST.to_string())
    }

    /// Check whether the metadata service is reachable.
    ///
    /// A non-empty `GCE_METADATA_HOST` counts as an explicit declaration and skips the probe.
    pub async fn is_available(ctx: &Context) -> bool {
        if ctx.env_var_first(&[GCE_METADATA_HOST]).is_some() {
            return true;
        }

        let req = match http::Request::get(format!("http://{METADATA_PROBE_HOST}"))
            .header(METADATA_FLAVOR, "Google")
            .body(Bytes::new())
        {
            Ok(req) => req,
            Err(_) => return false,
        };

        match tokio::time::timeout(METADATA_PROBE_TIMEOUT, ctx.http_send(req)).await {
            Ok(Ok(resp)) => resp
                .headers()
                .get(METADATA_FLAVOR)
                .is_some_and(|v| v == "Google"),
            Ok(Err(err)) => {
                debug!("metadata service probe failed: {err}");
                false
            }
            Err(_) => {
                debug!("metadata service probe timed out");
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl ProvideCredential for VmMetadataCredentialProvider {
    type Credential = Token;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let mut url = format!(
            "http://{}/computeMetadata/v1/instance/service-accounts/default/token",
            self.metadata_host(ctx)
        );
        if !self.scopes.is_empty() {
            let query = serde_urlencoded::to_string([("scopes", self.scopes.join(","))])
                .map_err(|e| Error::unexpected("failed to encode scopes").with_source(e))?;
            url.push('?');
            url.push_str(&query);
        }
        debug!("loading token from VM metadata service: {url}");

        let req = http::Request::get(url.as_str())
            .header(METADATA_FLAVOR, "Google")
            .body(Bytes::new())?;
        let resp: TokenResponse = helpers::send(ctx, req).await?;

        helpers::token_from_response(resp).map(Some)
    }
}
