//! In-process stand-in for Google endpoints.

use async_trait::async_trait;
use bytes::Bytes;
use gsuite::{HttpSend, Result};
use http::{HeaderMap, Method, StatusCode};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    prefix: String,
    status: StatusCode,
    headers: Vec<(&'static str, &'static str)>,
    body: String,
}

/// A request captured by [`MockHttpSend`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn form(&self) -> std::collections::HashMap<String, String> {
        serde_urlencoded::from_bytes(&self.body).expect("body must be form encoded")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("body must be json")
    }
}

/// Answers requests from a static route table and records everything it sees.
///
/// Routes match on method and URI prefix, first match wins. Unmatched requests get a 404.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, prefix: &str, status: u16, body: &str) -> Self {
        self.on_with_headers(method, prefix, status, &[], body)
    }

    pub fn on_with_headers(
        self,
        method: Method,
        prefix: &str,
        status: u16,
        headers: &[(&'static str, &'static str)],
        body: &str,
    ) -> Self {
        self.routes.lock().unwrap().push(Route {
            method,
            prefix: prefix.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            headers: headers.to_vec(),
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.uri.starts_with(prefix))
            .collect()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let uri = parts.uri.to_string();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method.clone(),
            uri: uri.clone(),
            headers: parts.headers,
            body,
        });

        let route = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.method == parts.method && uri.starts_with(&r.prefix))
            .cloned();

        let mut builder = http::Response::builder();
        let body = match route {
            Some(route) => {
                builder = builder.status(route.status);
                for (k, v) in route.headers {
                    builder = builder.header(k, v);
                }
                route.body
            }
            None => {
                builder = builder.status(StatusCode::NOT_FOUND);
                format!("no route for {} {uri}", parts.method)
            }
        };

        Ok(builder.body(Bytes::from(body)).unwrap())
    }
}
