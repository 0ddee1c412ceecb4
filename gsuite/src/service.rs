use bytes::Bytes;
use http::header::{HeaderValue, USER_AGENT};
use http::Method;
use log::debug;

use gsuite_core::{Error, Result, Signer};
use gsuite_google::Token;

use crate::constants::{DIRECTORY_BASE_PATH, GROUP_SETTINGS_BASE_PATH};
use crate::transport::HttpClient;

/// ClientOption configures how a service handle talks to its API.
#[derive(Debug, Clone)]
pub enum ClientOption {
    /// Use this authenticated client. Takes precedence over [`ClientOption::TokenSource`].
    HttpClient(HttpClient),
    /// Build a client that signs requests with tokens from this source.
    TokenSource(Signer<Token>),
    /// Override the base path of the API.
    Endpoint(String),
}

/// State shared by every service handle.
#[derive(Debug, Clone)]
struct Service {
    client: HttpClient,
    base_path: String,
    user_agent: String,
}

impl Service {
    fn new(name: &str, default_base_path: &str, opts: &[ClientOption]) -> Result<Self> {
        let mut client = None;
        let mut token_source = None;
        let mut base_path = default_base_path.to_string();

        for opt in opts {
            match opt {
                ClientOption::HttpClient(c) => client = Some(c.clone()),
                ClientOption::TokenSource(s) => token_source = Some(s.clone()),
                ClientOption::Endpoint(e) => base_path = e.clone(),
            }
        }

        let client = match (client, token_source) {
            (Some(client), _) => client,
            (None, Some(signer)) => HttpClient::new(signer),
            (None, None) => {
                return Err(Error::service_invalid(format!(
                    "{name}: no authentication option was provided"
                )))
            }
        };

        let uri: http::Uri = base_path.parse().map_err(|e| {
            Error::service_invalid(format!("{name}: invalid endpoint {base_path}")).with_source(e)
        })?;
        if !matches!(uri.scheme_str(), Some("http") | Some("https")) || uri.host().is_none() {
            return Err(Error::service_invalid(format!(
                "{name}: endpoint {base_path} is not an absolute http(s) url"
            )));
        }
        if !base_path.ends_with('/') {
            base_path.push('/');
        }

        debug!("{name} service created with base path {base_path}");
        Ok(Self {
            client,
            base_path,
            user_agent: String::new(),
        })
    }

    fn request(&self, method: Method, path: &str) -> http::request::Builder {
        let uri = format!("{}{}", self.base_path, path.trim_start_matches('/'));
        http::Request::builder().method(method).uri(uri)
    }

    async fn send(&self, mut req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        if !self.user_agent.is_empty() {
            req.headers_mut()
                .insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        }
        self.client.send(req).await
    }
}

macro_rules! service_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal, $base_path:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            inner: Service,
        }

        impl $name {
            /// Build a handle from client options.
            ///
            /// Fails with a `ServiceInvalid` error when no authentication option is
            /// given or the endpoint is not an absolute http(s) url.
            pub fn new(opts: &[ClientOption]) -> Result<Self> {
                Ok(Self {
                    inner: Service::new($label, $base_path, opts)?,
                })
            }

            /// The user agent sent with every request.
            pub fn user_agent(&self) -> &str {
                &self.inner.user_agent
            }

            /// Set the user agent sent with every request.
            pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
                self.inner.user_agent = user_agent.into();
            }

            /// The base path requests are resolved against, always ending with `/`.
            pub fn base_path(&self) -> &str {
                &self.inner.base_path
            }

            /// The authenticated client of this handle.
            pub fn client(&self) -> &HttpClient {
                &self.inner.client
            }

            /// Start a request for `path` relative to the base path.
            pub fn request(&self, method: Method, path: &str) -> http::request::Builder {
                self.inner.request(method, path)
            }

            /// Send a request with credentials and user agent attached.
            pub async fn send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
                self.inner.send(req).await
            }
        }
    };
}

service_handle!(
    /// DirectoryService is a handle on the Admin SDK Directory API.
    DirectoryService,
    "directory",
    DIRECTORY_BASE_PATH
);

service_handle!(
    /// GroupSettingsService is a handle on the Groups Settings API.
    GroupSettingsService,
    "groupssettings",
    GROUP_SETTINGS_BASE_PATH
);
