use gsuite::google::TOKEN_URL;
use gsuite::{user_agent, Config, ErrorKind, Result};
use http::Method;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::mock::MockHttpSend;
use crate::{
    create_test_context, public_key_pem, service_account_json, service_account_path,
    TOKEN_RESPONSE,
};

const METADATA_TOKEN: &str =
    "http://metadata.test/computeMetadata/v1/instance/service-accounts/default/token";

#[tokio::test]
async fn test_explicit_credentials_require_impersonated_user() {
    let http = MockHttpSend::new();
    let ctx = create_test_context(http.clone(), None, &[]);

    let err = Config::new()
        .with_credentials(service_account_json())
        .load_and_validate(&ctx, "1.5.7")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(
        err.to_string(),
        "required field missing: impersonated_user_email"
    );
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_explicit_credentials_from_content() -> Result<()> {
    let http = MockHttpSend::new();
    let ctx = create_test_context(http.clone(), None, &[]);

    let client = Config::new()
        .with_credentials(service_account_json())
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await?;

    assert_eq!(client.user_agent(), user_agent("1.5.7"));
    assert_eq!(client.directory().user_agent(), user_agent("1.5.7"));
    assert_eq!(client.group_settings().user_agent(), user_agent("1.5.7"));
    assert_eq!(
        client.config().impersonated_user_email.as_deref(),
        Some("admin@example.com")
    );
    // Tokens are fetched on first use only.
    assert!(http.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_explicit_credentials_from_path() -> Result<()> {
    let ctx = create_test_context(MockHttpSend::new(), None, &[]);

    Config::new()
        .with_credentials(service_account_path())
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_explicit_credentials_from_home_path() -> Result<()> {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("key.json"), service_account_json()).unwrap();
    let ctx = create_test_context(MockHttpSend::new(), Some(home.path().to_path_buf()), &[]);

    Config::new()
        .with_credentials("~/key.json")
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_explicit_credentials_unreadable_path() {
    let dir = tempfile::tempdir().unwrap();
    let http = MockHttpSend::new();
    let ctx = create_test_context(http.clone(), None, &[]);

    let err = Config::new()
        .with_credentials(dir.path().to_str().unwrap())
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert_eq!(err.message(), "Error loading credentials");
    assert!(err.to_string().starts_with("Error loading credentials: "));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_explicit_credentials_home_path_without_home() {
    let ctx = create_test_context(MockHttpSend::new(), None, &[]);

    let err = Config::new()
        .with_credentials("~/key.json")
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert_eq!(
        err.to_string(),
        "Error loading credentials: cannot expand ~/key.json: home directory is unknown"
    );
}

#[tokio::test]
async fn test_explicit_credentials_end_to_end() -> Result<()> {
    let http = MockHttpSend::new()
        .on(Method::POST, TOKEN_URL, 200, TOKEN_RESPONSE)
        .on(
            Method::GET,
            "https://admin.googleapis.com/admin/directory/v1/users",
            200,
            r#"{"kind": "admin#directory#users"}"#,
        );
    let ctx = create_test_context(http.clone(), None, &[]);

    let client = Config::new()
        .with_credentials(service_account_path())
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await?;

    let directory = client.directory();
    let req = directory
        .request(Method::GET, "users?customer=my_customer")
        .body(bytes::Bytes::new())?;
    let resp = directory.send(req).await?;
    assert_eq!(resp.status(), 200);

    let token_requests = http.requests_to(TOKEN_URL);
    assert_eq!(token_requests.len(), 1);
    let form = token_requests[0].form();
    assert_eq!(
        form["grant_type"],
        "urn:ietf:params:oauth:grant-type:jwt-bearer"
    );

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[TOKEN_URL]);
    let claims = decode::<Value>(
        &form["assertion"],
        &DecodingKey::from_rsa_pem(public_key_pem().as_bytes()).unwrap(),
        &validation,
    )
    .expect("assertion must be signed by the service account key")
    .claims;
    assert_eq!(claims["iss"], "terraform@gsuite-test.iam.gserviceaccount.com");
    assert_eq!(claims["sub"], "admin@example.com");
    assert_eq!(claims["aud"], TOKEN_URL);
    assert_eq!(
        claims["scope"],
        "https://www.googleapis.com/auth/admin.directory.group \
         https://www.googleapis.com/auth/admin.directory.user \
         https://www.googleapis.com/auth/admin.directory.userschema"
    );

    let api = http.requests_to("https://admin.googleapis.com/");
    assert_eq!(api.len(), 1);
    assert_eq!(api[0].headers[http::header::AUTHORIZATION], "Bearer ya29.test-token");
    Ok(())
}

#[tokio::test]
async fn test_ambient_default_skips_empty_environment_file() -> Result<()> {
    let ctx = create_test_context(
        MockHttpSend::new(),
        None,
        &[
            ("GOOGLE_APPLICATION_CREDENTIALS", ""),
            ("GCE_METADATA_HOST", "metadata.test"),
        ],
    );

    Config::new().load_and_validate(&ctx, "1.5.7").await?;
    Ok(())
}

#[tokio::test]
async fn test_ambient_default_with_empty_metadata_host() {
    let ctx = create_test_context(MockHttpSend::new(), None, &[("GCE_METADATA_HOST", "")]);

    let err = Config::new()
        .load_and_validate(&ctx, "1.5.7")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to create client: could not find default credentials"
    );
}

#[tokio::test]
async fn test_malformed_credentials() {
    let http = MockHttpSend::new();
    let ctx = create_test_context(http.clone(), None, &[]);

    let err = Config::new()
        .with_credentials("{\"client_email\": ")
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(err.is_config_error());
    assert!(err
        .to_string()
        .starts_with("Error parsing credentials '{\"client_email\": '"));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_impersonation_without_ambient_credentials() {
    let ctx = create_test_context(MockHttpSend::new(), None, &[]);

    let err = Config::new()
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await
        .unwrap_err();

    assert!(err.is_authentication_error());
    assert_eq!(err.message(), "failed to create impersonated token source");
    assert_eq!(
        err.to_string(),
        "failed to create impersonated token source: could not find default credentials"
    );
}

#[tokio::test]
async fn test_ambient_default_without_credentials() {
    let ctx = create_test_context(MockHttpSend::new(), None, &[]);

    let err = Config::new()
        .load_and_validate(&ctx, "1.5.7")
        .await
        .unwrap_err();

    assert!(err.is_authentication_error());
    assert!(err.to_string().starts_with("failed to create client"));
}

#[tokio::test]
async fn test_ambient_default_with_broken_environment_file() {
    let ctx = create_test_context(
        MockHttpSend::new(),
        None,
        &[("GOOGLE_APPLICATION_CREDENTIALS", "/definitely/not/here.json")],
    );

    let err = Config::new()
        .load_and_validate(&ctx, "1.5.7")
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with(
        "failed to create client: error getting credentials using GOOGLE_APPLICATION_CREDENTIALS"
    ));
}

#[tokio::test]
async fn test_end_to_end_with_ambient_identity() -> Result<()> {
    let http = MockHttpSend::new()
        .on(Method::GET, METADATA_TOKEN, 200, TOKEN_RESPONSE)
        .on(
            Method::GET,
            "https://admin.googleapis.com/admin/directory/v1/groups",
            200,
            r#"{"kind": "admin#directory#groups"}"#,
        );
    let ctx = create_test_context(http.clone(), None, &[("GCE_METADATA_HOST", "metadata.test")]);

    let client = Config::new()
        .with_credentials("")
        .with_impersonated_user_email("")
        .load_and_validate(&ctx, "1.5.7")
        .await?;

    let ua = client.user_agent();
    assert_eq!(
        ua,
        format!(
            "({} {}) Terraform/1.5.7",
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    );
    assert_eq!(
        client.directory().base_path(),
        "https://admin.googleapis.com/admin/directory/v1/"
    );
    assert_eq!(
        client.group_settings().base_path(),
        "https://www.googleapis.com/groups/v1/groups/"
    );

    let directory = client.directory();
    let req = directory
        .request(Method::GET, "groups?customer=my_customer")
        .body(bytes::Bytes::new())?;
    let resp = directory.send(req).await?;
    assert_eq!(resp.status(), 200);

    let token_requests = http.requests_to(METADATA_TOKEN);
    assert_eq!(token_requests.len(), 1);
    assert_eq!(
        token_requests[0].uri,
        format!(
            "{METADATA_TOKEN}?scopes=\
             https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fadmin.directory.group%2C\
             https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fadmin.directory.user%2C\
             https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fadmin.directory.userschema"
        )
    );

    let api = http.requests_to("https://admin.googleapis.com/");
    assert_eq!(api.len(), 1);
    assert_eq!(api[0].headers[http::header::AUTHORIZATION], "Bearer ya29.test-token");
    assert_eq!(api[0].headers[http::header::USER_AGENT], ua);
    Ok(())
}

#[tokio::test]
async fn test_impersonated_ambient_identity() -> Result<()> {
    let http = MockHttpSend::new()
        .on(Method::GET, METADATA_TOKEN, 200, TOKEN_RESPONSE)
        .on(
            Method::POST,
            "https://iamcredentials.googleapis.com/v1/projects/-/serviceAccounts/admin@example.com:signJwt",
            200,
            r#"{"keyId": "k1", "signedJwt": "header.payload.signature"}"#,
        )
        .on(
            Method::POST,
            TOKEN_URL,
            200,
            r#"{"access_token": "ya29.delegated", "expires_in": 3599, "token_type": "Bearer"}"#,
        )
        .on(
            Method::GET,
            "https://www.googleapis.com/groups/v1/groups/",
            200,
            "{}",
        );
    let ctx = create_test_context(http.clone(), None, &[("GCE_METADATA_HOST", "metadata.test")]);

    let client = Config::new()
        .with_impersonated_user_email("admin@example.com")
        .load_and_validate(&ctx, "1.5.7")
        .await?;
    assert!(http.requests().is_empty());

    let settings = client.group_settings();
    let req = settings
        .request(Method::GET, "team@example.com")
        .body(bytes::Bytes::new())?;
    settings.send(req).await?;

    let source = http.requests_to(METADATA_TOKEN);
    assert_eq!(source.len(), 1);
    assert!(source[0].uri.ends_with("?scopes=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcloud-platform"));

    let payload: serde_json::Value = serde_json::from_str(
        http.requests_to("https://iamcredentials.googleapis.com/")[0].json()["payload"]
            .as_str()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(payload["iss"], "admin@example.com");
    assert_eq!(payload["sub"], "admin@example.com");
    assert_eq!(
        payload["scope"],
        "https://www.googleapis.com/auth/admin.directory.group \
         https://www.googleapis.com/auth/admin.directory.user \
         https://www.googleapis.com/auth/admin.directory.userschema"
    );

    let api = http.requests_to("https://www.googleapis.com/groups/v1/groups/");
    assert_eq!(api[0].uri, "https://www.googleapis.com/groups/v1/groups/team@example.com");
    assert_eq!(api[0].headers[http::header::AUTHORIZATION], "Bearer ya29.delegated");
    Ok(())
}
