use gsuite_core::{ProvideCredential, Result};
use gsuite_google::{AccountKey, JwtConfig, JwtCredentialProvider, TOKEN_URL};
use http::Method;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use pretty_assertions::assert_eq;
use serde_json::Value;

use super::{create_test_context, read_testdata, TOKEN_RESPONSE};
use crate::mock::MockHttpSend;

fn test_config() -> JwtConfig {
    let key = AccountKey::from_json(&read_testdata("test_service_account.json")).unwrap();
    JwtConfig::from_account_key(&key)
}

#[tokio::test]
async fn test_jwt_exchange_with_subject() -> Result<()> {
    let http = MockHttpSend::new().on(Method::POST, TOKEN_URL, 200, TOKEN_RESPONSE);
    let ctx = create_test_context(http.clone(), None, &[]);

    let provider = JwtCredentialProvider::new(
        test_config()
            .with_scopes([
                "https://www.googleapis.com/auth/admin.directory.group",
                "https://www.googleapis.com/auth/admin.directory.user",
            ])
            .with_subject("admin@example.com"),
    );

    let token = provider.provide_credential(&ctx).await?.unwrap();
    assert_eq!(token.access_token, "ya29.test-token");
    assert!(token.expires_at.is_some());

    let requests = http.requests_to(TOKEN_URL);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].headers[http::header::CONTENT_TYPE],
        "application/x-www-form-urlencoded"
    );

    let form = requests[0].form();
    assert_eq!(
        form["grant_type"],
        "urn:ietf:params:oauth:grant-type:jwt-bearer"
    );

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[TOKEN_URL]);
    let public_key = read_testdata("test_public_key.pem");
    let claims = decode::<Value>(
        &form["assertion"],
        &DecodingKey::from_rsa_pem(public_key.as_bytes()).unwrap(),
        &validation,
    )
    .expect("assertion must be signed by the service account key")
    .claims;

    assert_eq!(claims["iss"], "terraform@gsuite-test.iam.gserviceaccount.com");
    assert_eq!(claims["sub"], "admin@example.com");
    assert_eq!(
        claims["scope"],
        "https://www.googleapis.com/auth/admin.directory.group https://www.googleapis.com/auth/admin.directory.user"
    );
    Ok(())
}

#[tokio::test]
async fn test_jwt_exchange_rejected() {
    let http = MockHttpSend::new().on(
        Method::POST,
        TOKEN_URL,
        401,
        r#"{"error": "unauthorized_client"}"#,
    );
    let ctx = create_test_context(http, None, &[]);

    let provider = JwtCredentialProvider::new(test_config().with_subject("admin@example.com"));
    let err = provider.provide_credential(&ctx).await.unwrap_err();

    assert!(err.to_string().contains("cannot fetch token"));
    assert!(err.to_string().contains("unauthorized_client"));
}

#[tokio::test]
async fn test_jwt_custom_token_url() -> Result<()> {
    let http = MockHttpSend::new().on(Method::POST, "http://localhost/token", 200, TOKEN_RESPONSE);
    let ctx = create_test_context(http.clone(), None, &[]);

    let provider =
        JwtCredentialProvider::new(test_config().with_token_url("http://localhost/token"));
    assert!(provider.provide_credential(&ctx).await?.is_some());
    assert_eq!(http.requests_to(TOKEN_URL).len(), 0);
    Ok(())
}
