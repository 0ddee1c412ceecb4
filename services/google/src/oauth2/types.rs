//! OAuth2 wire types for Google endpoints.

use serde::{Deserialize, Serialize};

/// Standard OAuth2 token endpoint response.
///
/// Returned by the token endpoint for JWT bearer and refresh token grants and by the
/// VM metadata service.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token issued by the authorization server.
    #[serde(default)]
    pub access_token: String,

    /// The lifetime in seconds of the access token.
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// The type of token issued (typically "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Form body of a JWT bearer grant.
#[derive(Debug, Serialize)]
pub struct JwtBearerRequest<'a> {
    pub grant_type: &'a str,
    pub assertion: &'a str,
}

/// Form body of a refresh token grant.
#[derive(Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub grant_type: &'a str,
    pub refresh_token: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Claim set signed into a JWT bearer assertion.
#[derive(Debug, Serialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub exp: u64,
    pub iat: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

/// IAM Credentials `generateAccessToken` request.
#[derive(Debug, Serialize)]
pub struct GenerateAccessTokenRequest {
    pub delegates: Vec<String>,
    pub scope: Vec<String>,
    pub lifetime: String,
}

/// IAM Credentials `generateAccessToken` response.
///
/// Unlike the token endpoint this API speaks camelCase.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAccessTokenResponse {
    pub access_token: String,
    pub expire_time: String,
}

/// IAM Credentials `signJwt` request.
#[derive(Debug, Serialize)]
pub struct SignJwtRequest {
    pub payload: String,
    pub delegates: Vec<String>,
}

/// IAM Credentials `signJwt` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignJwtResponse {
    #[allow(dead_code)]
    pub key_id: String,
    pub signed_jwt: String,
}
