//! OAuth2 helper functions for Google services

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, StatusCode};
use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;

use gsuite_core::time::{after_secs, now};
use gsuite_core::{Context, Error, Result};

use super::types::TokenResponse;
use crate::credential::Token;

/// POST a form encoded body to a token endpoint and parse the JSON response.
pub async fn post_form<T: Serialize, R: DeserializeOwned>(
    ctx: &Context,
    url: &str,
    body: &T,
) -> Result<R> {
    let body = serde_urlencoded::to_string(body)
        .map_err(|e| Error::unexpected("failed to serialize request").with_source(e))?;

    let req = http::Request::builder()
        .method(Method::POST)
        .uri(url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Bytes::from(body))?;

    send(ctx, req).await
}

/// POST a JSON body with a bearer token and parse the JSON response.
pub async fn post_json_with_auth<T: Serialize, R: DeserializeOwned>(
    ctx: &Context,
    url: &str,
    body: &T,
    token: &Token,
) -> Result<R> {
    let body = serde_json::to_vec(body)
        .map_err(|e| Error::unexpected("failed to serialize request").with_source(e))?;

    let mut auth: http::HeaderValue =
        format!("{} {}", token.token_type, token.access_token).parse()?;
    auth.set_sensitive(true);

    let req = http::Request::builder()
        .method(Method::POST)
        .uri(url)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, auth)
        .body(Bytes::from(body))?;

    send(ctx, req).await
}

/// Send the request, check the status and parse the JSON response.
pub async fn send<R: DeserializeOwned>(ctx: &Context, req: http::Request<Bytes>) -> Result<R> {
    let uri = req.uri().clone();
    let resp = ctx.http_send(req).await?;

    if resp.status() != StatusCode::OK {
        error!("OAuth2 request to {uri} failed: {}", resp.status());
        let body = String::from_utf8_lossy(resp.body());
        return Err(Error::unexpected(format!(
            "oauth2: cannot fetch token: {}\nResponse: {}",
            resp.status(),
            body
        )));
    }

    serde_json::from_slice(resp.body())
        .map_err(|e| Error::unexpected("failed to parse OAuth2 response").with_source(e))
}

/// Convert a standard OAuth2 token response to our Token type.
pub fn token_from_response(resp: TokenResponse) -> Result<Token> {
    if resp.access_token.is_empty() {
        return Err(Error::unexpected(
            "oauth2: server response missing access_token",
        ));
    }

    Ok(Token {
        access_token: resp.access_token,
        token_type: resp
            .token_type
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "Bearer".to_string()),
        expires_at: resp.expires_in.map(|secs| after_secs(now(), secs)),
    })
}
