// EdgeGrid-signed HTTP session
//
// Wraps `reqwest::Client` with Akamai URL construction, request signing,
// and problem-document error parsing. Product facades (AppSec, GTM) are
// thin typed layers on top of the verb helpers here.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::edgegrid::EdgeGridCredentials;
use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error response shape (RFC 7807) ──────────────────────────────────

#[derive(serde::Deserialize)]
struct Problem {
    #[serde(default, rename = "type")]
    problem_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

// ── Session ──────────────────────────────────────────────────────────

/// Signed HTTP session against one EdgeGrid host.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    credentials: EdgeGridCredentials,
}

impl Session {
    /// Build a session from credentials and a transport config.
    pub fn new(credentials: EdgeGridCredentials, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, credentials)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, credentials: EdgeGridCredentials) -> Result<Self, Error> {
        let base_url = credentials.base_url()?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// The API base URL (`https://{host}/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorization(&self, method: &str, url: &Url, body: &[u8]) -> Result<HeaderValue, Error> {
        let header = self.credentials.authorization(method, url, body)?;
        let mut value = HeaderValue::from_str(&header)
            .map_err(|e| Error::Signing(format!("invalid authorization header: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let auth = self.authorization("GET", &url, &[])?;
        let resp = self.http.get(url).header(AUTHORIZATION, auth).send().await?;
        Self::handle_response(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let bytes = serde_json::to_vec(body).map_err(|e| Error::Deserialization {
            message: format!("failed to encode request body: {e}"),
            body: String::new(),
        })?;
        self.send_bytes(reqwest::Method::POST, path, bytes).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let bytes = serde_json::to_vec(body).map_err(|e| Error::Deserialization {
            message: format!("failed to encode request body: {e}"),
            body: String::new(),
        })?;
        self.send_bytes(reqwest::Method::PUT, path, bytes).await
    }

    /// PUT a pre-encoded JSON body verbatim.
    pub async fn put_raw<T: DeserializeOwned>(&self, path: &str, body: Vec<u8>) -> Result<T, Error> {
        self.send_bytes(reqwest::Method::PUT, path, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let auth = self.authorization("DELETE", &url, &[])?;
        let resp = self.http.delete(url).header(AUTHORIZATION, auth).send().await?;
        Self::handle_response(resp).await
    }

    async fn send_bytes<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Vec<u8>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let auth = self.authorization(method.as_str(), &url, &body)?;
        let resp = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            // Some mutations answer 204 / empty; decode that as JSON null.
            let text = if body.trim().is_empty() { "null" } else { body.as_str() };
            serde_json::from_str(text).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let message = serde_json::from_str::<Problem>(&raw)
                .ok()
                .and_then(|p| p.detail.or(p.title))
                .unwrap_or_else(|| status.to_string());
            return Error::Authentication { message };
        }

        match serde_json::from_str::<Problem>(&raw) {
            Ok(problem) => Error::Api {
                status: status.as_u16(),
                title: problem.title.unwrap_or_else(|| status.to_string()),
                detail: problem.detail,
                problem_type: problem.problem_type,
            },
            Err(_) => Error::Api {
                status: status.as_u16(),
                title: status.to_string(),
                detail: if raw.is_empty() { None } else { Some(raw) },
                problem_type: None,
            },
        }
    }
}
