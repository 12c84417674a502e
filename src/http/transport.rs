use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::foundation::error::{SplashError, SplashResult};

/// Response of a single blocking GET.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw `Link` header, when present.
    pub link: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// `200 OK` with `body` and no `Link` header.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            link: None,
            body: body.into(),
        }
    }

    /// Empty response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Attach a `Link` header.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP GET seam used by enumeration and fetching.
///
/// Implementations return `Err` only when no response was received at all; non-success
/// statuses come back as regular [`HttpResponse`] values.
pub trait HttpTransport {
    /// Perform a GET request against `url`.
    fn get(&self, url: &str) -> SplashResult<HttpResponse>;
}

/// [`HttpTransport`] backed by a blocking `reqwest` client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl ReqwestTransport {
    /// Build a client with a fixed per-request `timeout`.
    pub fn new(user_agent: &str, timeout: Duration, token: Option<String>) -> SplashResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| SplashError::fetch(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, token })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> SplashResult<HttpResponse> {
        debug!(%url, "GET");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| SplashError::fetch(format!("GET {url}: {e}")))?;

        let status = response.status().as_u16();
        let link = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .map_err(|e| SplashError::fetch(format!("read body of {url}: {e}")))?
            .to_vec();

        Ok(HttpResponse { status, link, body })
    }
}

#[derive(Clone, Debug)]
enum Route {
    Respond(HttpResponse),
    Fail(String),
}

/// In-memory [`HttpTransport`] for tests and offline runs.
///
/// Unknown URLs answer `404`. Every requested URL is recorded in order.
#[derive(Debug, Default)]
pub struct StaticTransport {
    routes: HashMap<String, Route>,
    requests: RefCell<Vec<String>>,
}

impl StaticTransport {
    /// Create a transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `response`.
    pub fn route(mut self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.routes.insert(url.into(), Route::Respond(response));
        self
    }

    /// Make `url` fail as if the connection dropped.
    pub fn fail(mut self, url: impl Into<String>, msg: impl Into<String>) -> Self {
        self.routes.insert(url.into(), Route::Fail(msg.into()));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for StaticTransport {
    fn get(&self, url: &str) -> SplashResult<HttpResponse> {
        self.requests.borrow_mut().push(url.to_string());
        match self.routes.get(url) {
            Some(Route::Respond(resp)) => Ok(resp.clone()),
            Some(Route::Fail(msg)) => Err(SplashError::fetch(format!("GET {url}: {msg}"))),
            None => Ok(HttpResponse::status(404)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/http/transport.rs"]
mod tests;
