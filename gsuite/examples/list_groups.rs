//! List the groups of the configured customer.
//!
//! Reads `GOOGLE_CREDENTIALS`, `IMPERSONATED_USER_EMAIL` and `CUSTOMER_ID` like the
//! provider does, then falls back to application default credentials.
//!
//! ```shell
//! RUST_LOG=debug IMPERSONATED_USER_EMAIL=admin@example.com cargo run --example list_groups
//! ```

use gsuite::{default_context, Config, Result};
use http::Method;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = default_context();
    let client = Config::new()
        .from_env(&ctx)
        .load_and_validate(&ctx, "0.0.0-dev")
        .await?;
    println!("user agent: {}", client.user_agent());

    let directory = client.directory();
    let path = format!("groups?customer={}", client.config().customer_id());
    let req = directory.request(Method::GET, &path).body(bytes::Bytes::new())?;
    let resp = directory.send(req).await?;

    println!("{}", resp.status());
    println!("{}", String::from_utf8_lossy(resp.body()));
    Ok(())
}
