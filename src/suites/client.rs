use std::time::Instant;

use reqwest::{Client, Method, Url};
use serde_json::Value;
use crate::errors::PentestError;
use super::context::{ClientCredentials, SuiteContext};
use tracing::debug;

/// Which credentials to attach to a probe request.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    /// No credential headers at all.
    None,
    /// The configured partner credentials, or nothing when none are configured.
    Configured,
    /// Arbitrary header values, used to probe the authentication layer.
    Custom { client_id: &'a str, client_secret: &'a str },
}

/// Status and body of a probe request.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 401, 403 and 429 all mean the request was turned away.
    pub fn is_rejection(&self) -> bool {
        matches!(self.status, 401 | 403 | 429)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// HTTP client bound to one target base URL.
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Option<ClientCredentials>,
}

impl ApiClient {
    pub fn new(ctx: &SuiteContext) -> Result<Self, PentestError> {
        let parsed = Url::parse(&ctx.target_url)
            .map_err(|e| PentestError::InvalidTarget(format!("{}: {}", ctx.target_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PentestError::InvalidTarget(format!(
                "{}: unsupported scheme '{}'",
                ctx.target_url,
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(ctx.request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| PentestError::from_transport("Failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: ctx.target_url.trim_end_matches('/').to_string(),
            credentials: ctx.credentials.clone(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn credentials(&self) -> Option<&ClientCredentials> {
        self.credentials.as_ref()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, auth: Auth<'_>) -> Result<ProbeResponse, PentestError> {
        self.send(Method::GET, path, &[], None, auth).await
    }

    /// GET with query parameters, percent-encoded by reqwest.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
        auth: Auth<'_>,
    ) -> Result<ProbeResponse, PentestError> {
        self.send(Method::GET, path, query, None, auth).await
    }

    pub async fn delete(&self, path: &str, auth: Auth<'_>) -> Result<ProbeResponse, PentestError> {
        self.send(Method::DELETE, path, &[], None, auth).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        auth: Auth<'_>,
    ) -> Result<ProbeResponse, PentestError> {
        self.send(Method::POST, path, &[], Some(body), auth).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        auth: Auth<'_>,
    ) -> Result<ProbeResponse, PentestError> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }

        match auth {
            Auth::None => {}
            Auth::Configured => {
                if let Some(creds) = &self.credentials {
                    request = request
                        .header("client_id", &creds.client_id)
                        .header("client_secret", &creds.client_secret);
                }
            }
            Auth::Custom { client_id, client_secret } => {
                request = request
                    .header("client_id", client_id)
                    .header("client_secret", client_secret);
            }
        }

        if let Some(json) = body {
            request = request.json(json);
        }

        let start = Instant::now();
        let context = format!("{} {}", method, path);
        let response = request
            .send()
            .await
            .map_err(|e| PentestError::from_transport(&context, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PentestError::from_transport(&context, e))?;

        debug!(
            method = %method,
            path,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            body_len = body.len(),
            "Probe response"
        );

        Ok(ProbeResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> ProbeResponse {
        ProbeResponse { status, body: String::new() }
    }

    #[test]
    fn test_status_classes() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(response(401).is_rejection());
        assert!(response(403).is_rejection());
        assert!(response(429).is_rejection());
        assert!(!response(404).is_rejection());
        assert!(response(404).is_client_error());
        assert!(response(502).is_server_error());
    }

    #[test]
    fn test_rejects_malformed_url() {
        let err = ApiClient::new(&SuiteContext::for_target("not a url")).err().unwrap();
        assert!(matches!(err, PentestError::InvalidTarget(_)));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ApiClient::new(&SuiteContext::for_target("ftp://example.com")).err().unwrap();
        assert!(matches!(err, PentestError::InvalidTarget(_)));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new(&SuiteContext::for_target("http://localhost:3000/")).unwrap();
        assert_eq!(client.url("/api/invoices/1"), "http://localhost:3000/api/invoices/1");
    }
}
