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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;

// Env values used in google services.
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const CLOUDSDK_CONFIG: &str = "CLOUDSDK_CONFIG";
pub const GCE_METADATA_HOST: &str = "GCE_METADATA_HOST";

/// OAuth2 token endpoint used for every token exchange.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope requested for the source token of an impersonation.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

pub const IAM_CREDENTIALS_ENDPOINT: &str = "https://iamcredentials.googleapis.com/v1";

pub const METADATA_HOST: &str = "metadata.google.internal";
pub const METADATA_PROBE_HOST: &str = "169.254.169.254";
pub const METADATA_FLAVOR: &str = "Metadata-Flavor";
pub const METADATA_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

pub const WELL_KNOWN_CREDENTIAL_FILE: &str = "application_default_credentials.json";

/// Lifetime of self-signed assertions and impersonated tokens.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Encode set for a service account email used as a path segment.
///
/// Keeps the unreserved characters and `@`, which is valid inside a path segment.
pub static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'@');
