use std::fmt::{self, Debug};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, AUTHORIZATION};
use log::{debug, log_enabled, Level};

use gsuite_core::{Context, HttpSend, Result, Signer};
use gsuite_google::Token;

/// LoggingHttpSend records every exchange passing through the wrapped transport.
///
/// Requests and responses are logged at `debug` level under the given name, the
/// `Authorization` header is never written out. The exchange itself is left untouched.
#[derive(Clone)]
pub struct LoggingHttpSend {
    name: String,
    inner: Arc<dyn HttpSend>,
}

impl LoggingHttpSend {
    /// Wrap `inner` under `name`.
    pub fn new(name: impl Into<String>, inner: impl HttpSend) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(inner),
        }
    }

    /// The name records are tagged with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Debug for LoggingHttpSend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingHttpSend")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(k, v)| {
            if k == AUTHORIZATION {
                format!("{k}: <redacted>")
            } else {
                format!("{k}: {}", v.to_str().unwrap_or("<binary>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl HttpSend for LoggingHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        if log_enabled!(Level::Debug) {
            debug!(
                "[{}] request: {} {}\n{}\n{}",
                self.name,
                req.method(),
                req.uri(),
                format_headers(req.headers()),
                String::from_utf8_lossy(req.body())
            );
        }

        let resp = self.inner.http_send(req).await?;

        if log_enabled!(Level::Debug) {
            debug!(
                "[{}] response: {}\n{}\n{}",
                self.name,
                resp.status(),
                format_headers(resp.headers()),
                String::from_utf8_lossy(resp.body())
            );
        }
        Ok(resp)
    }
}

/// HttpClient is an authenticated transport for Google APIs.
///
/// Each request is signed with a token from the signer, which is fetched on first
/// use and reused until it nears expiry, then sent through the transport context.
#[derive(Debug, Clone)]
pub struct HttpClient {
    transport: Context,
    signer: Signer<Token>,
}

impl HttpClient {
    /// Build a client that sends through the signer's own context.
    pub fn new(signer: Signer<Token>) -> Self {
        Self {
            transport: signer.context().clone(),
            signer,
        }
    }

    /// Route API traffic through a [`LoggingHttpSend`] named `name`.
    ///
    /// Token requests made by the signer keep using the undecorated context.
    pub fn with_logging(mut self, name: &str) -> Self {
        let logged = LoggingHttpSend::new(name, self.transport.clone());
        self.transport = self.transport.with_http_send(logged);
        self
    }

    /// The signer attaching credentials to requests.
    pub fn signer(&self) -> &Signer<Token> {
        &self.signer
    }

    /// Sign and send a request.
    pub async fn send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts).await?;
        self.transport
            .http_send(http::Request::from_parts(parts, body))
            .await
    }
}
