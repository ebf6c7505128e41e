//! HTTP utilities for FortiOS REST API calls

use super::auth::ApiToken;
use super::client::ClientConfig;
use crate::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = match body.char_indices().nth(MAX_LOG_BODY_LENGTH) {
        Some((cut, _)) => format!("{}... [truncated, {} bytes total]", &body[..cut], body.len()),
        None => body.to_string(),
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for FortiOS API calls
#[derive(Clone)]
pub struct FortiHttpClient {
    client: Client,
    base_url: Url,
    token: Option<ApiToken>,
    vdom: Option<String>,
}

impl FortiHttpClient {
    /// Create a new HTTP client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            vdom: config.vdom.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an absolute API path against the appliance base URL
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Send one request and return the response body.
    ///
    /// FortiOS reports failures inside the JSON envelope, so a non-2xx
    /// status is not an error at this layer.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<String> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url.path());

        let mut request = self.client.request(method, url);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(vdom) = &self.vdom {
            request = request.query(&[("vdom", vdom.as_str())]);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.map_err(Error::Send)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Body)?;

        tracing::debug!("FortiOS response: {} - {}", status, sanitize_for_log(&body));

        Ok(body)
    }

    pub async fn get(&self, path: &str) -> Result<String> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Vec<u8>) -> Result<String> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Vec<u8>) -> Result<String> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<String> {
        self.send(Method::DELETE, path, None).await
    }
}

/// Percent-escape a caller-supplied key before it is placed in a path.
///
/// Dot segments are refused: URL resolution would fold them into the
/// parent table, percent-encoded or not.
pub fn escape_path_segment(segment: &str) -> Result<String> {
    if matches!(segment, "" | "." | "..") {
        return Err(Error::Precondition(format!(
            "invalid object key '{segment}'"
        )));
    }
    Ok(urlencoding::encode(segment).into_owned())
}

/// Human-readable meaning of an `http_status` reported in a FortiOS envelope
pub fn http_status_description(status: u16) -> &'static str {
    match status {
        200 => "OK: Request returns successful",
        400 => "Bad Request: Request cannot be processed by the API",
        401 => "Not Authorized: Request without successful login session",
        403 => "Forbidden: Request is missing CSRF token or administrator is missing access profile permissions",
        404 => "Resource Not Found: Unable to find the specified resource",
        405 => "Method Not Allowed: Specified HTTP method is not allowed for this resource",
        413 => "Request Entity Too Large: Request cannot be processed due to large entity",
        424 => "Failed Dependency: Fail dependency can be duplicate resource, missing required parameter, missing required attribute, invalid attribute value",
        429 => "Access temporarily blocked: Maximum failed authentications reached. The offended source is temporarily blocked for certain amount of time",
        500 => "Internal Server Error: Internal error when processing the request",
        other => StatusCode::from_u16(other)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Error"),
    }
}
