use gsuite_core::{ProvideCredential, Result};
use gsuite_google::VmMetadataCredentialProvider;
use http::Method;
use pretty_assertions::assert_eq;

use super::{create_test_context, TOKEN_RESPONSE};
use crate::mock::MockHttpSend;

const TOKEN_PATH: &str =
    "http://metadata.test/computeMetadata/v1/instance/service-accounts/default/token";

#[tokio::test]
async fn test_vm_metadata_token() -> Result<()> {
    let http = MockHttpSend::new().on(Method::GET, TOKEN_PATH, 200, TOKEN_RESPONSE);
    let ctx = create_test_context(http.clone(), None, &[("GCE_METADATA_HOST", "metadata.test")]);

    let provider = VmMetadataCredentialProvider::new().with_scopes(["scope-a", "scope-b"]);
    let token = provider.provide_credential(&ctx).await?.unwrap();
    assert_eq!(token.access_token, "ya29.test-token");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].uri, format!("{TOKEN_PATH}?scopes=scope-a%2Cscope-b"));
    assert_eq!(requests[0].headers["Metadata-Flavor"], "Google");
    Ok(())
}

#[tokio::test]
async fn test_vm_metadata_error_status() {
    let http = MockHttpSend::new().on(Method::GET, TOKEN_PATH, 500, "internal");
    let ctx = create_test_context(http, None, &[]);

    let provider = VmMetadataCredentialProvider::new().with_endpoint("metadata.test");
    assert!(provider.provide_credential(&ctx).await.is_err());
}

#[tokio::test]
async fn test_metadata_probe() {
    let ctx = create_test_context(MockHttpSend::new(), None, &[("GCE_METADATA_HOST", "x")]);
    assert!(VmMetadataCredentialProvider::is_available(&ctx).await);

    let http = MockHttpSend::new().on_with_headers(
        Method::GET,
        "http://169.254.169.254",
        200,
        &[("Metadata-Flavor", "Google")],
        "",
    );
    let ctx = create_test_context(http, None, &[]);
    assert!(VmMetadataCredentialProvider::is_available(&ctx).await);

    let http = MockHttpSend::new().on(Method::GET, "http://169.254.169.254", 200, "");
    let ctx = create_test_context(http, None, &[]);
    assert!(!VmMetadataCredentialProvider::is_available(&ctx).await);

    let ctx = create_test_context(MockHttpSend::new(), None, &[("GCE_METADATA_HOST", "")]);
    assert!(!VmMetadataCredentialProvider::is_available(&ctx).await);
}

#[tokio::test]
async fn test_vm_metadata_empty_host_uses_default() -> Result<()> {
    let http = MockHttpSend::new().on(
        Method::GET,
        "http://metadata.google.internal/computeMetadata/v1/",
        200,
        TOKEN_RESPONSE,
    );
    let ctx = create_test_context(http.clone(), None, &[("GCE_METADATA_HOST", "")]);

    let token = VmMetadataCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .unwrap();
    assert_eq!(token.access_token, "ya29.test-token");
    Ok(())
}
