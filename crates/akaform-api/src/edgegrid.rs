// EdgeGrid request signing (EG1-HMAC-SHA256).
//
// Every Akamai API call carries an `Authorization` header derived from the
// client credentials, a UTC timestamp, a random nonce, and a digest of the
// request line and body.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use url::Url;
use uuid::Uuid;

use crate::error::Error;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "EG1-HMAC-SHA256";

/// Default number of body bytes that participate in the content hash.
pub const DEFAULT_MAX_BODY: usize = 131_072;

/// Credentials for one EdgeGrid API client.
#[derive(Debug, Clone)]
pub struct EdgeGridCredentials {
    /// API host, e.g. `akab-xxxx.luna.akamaiapis.net` (no scheme).
    pub host: String,
    pub client_token: String,
    pub client_secret: SecretString,
    pub access_token: SecretString,
    /// Max body bytes hashed for POST requests.
    pub max_body: usize,
}

impl EdgeGridCredentials {
    pub fn new(
        host: impl Into<String>,
        client_token: impl Into<String>,
        client_secret: SecretString,
        access_token: SecretString,
    ) -> Self {
        Self {
            host: host.into(),
            client_token: client_token.into(),
            client_secret,
            access_token,
            max_body: DEFAULT_MAX_BODY,
        }
    }

    /// Base URL for API calls against this host.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            Ok(Url::parse(&format!("{host}/"))?)
        } else {
            Ok(Url::parse(&format!("https://{host}/"))?)
        }
    }

    /// Build the `Authorization` header for a request, using the current
    /// time and a fresh nonce.
    pub fn authorization(&self, method: &str, url: &Url, body: &[u8]) -> Result<String, Error> {
        self.sign(method, url, body, Utc::now(), Uuid::new_v4())
    }

    /// Build the `Authorization` header with an explicit timestamp and nonce.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        body: &[u8],
        timestamp: DateTime<Utc>,
        nonce: Uuid,
    ) -> Result<String, Error> {
        let timestamp = format_timestamp(timestamp);
        let unsigned = format!(
            "{ALGORITHM} client_token={};access_token={};timestamp={timestamp};nonce={nonce};",
            self.client_token,
            self.access_token.expose_secret(),
        );

        let method = method.to_ascii_uppercase();
        let content_hash = if method == "POST" {
            self.content_hash(body)
        } else {
            String::new()
        };

        let host = match url.port() {
            Some(port) => format!("{}:{port}", url.host_str().unwrap_or_default()),
            None => url.host_str().unwrap_or_default().to_owned(),
        };
        let relative = match url.query() {
            Some(q) => format!("{}?{q}", url.path()),
            None => url.path().to_owned(),
        };

        // Canonicalized headers are never signed; the slot stays empty.
        let data_to_sign = [
            method.as_str(),
            url.scheme(),
            host.as_str(),
            relative.as_str(),
            "",
            content_hash.as_str(),
            unsigned.as_str(),
        ]
        .join("\t");

        let signing_key = hmac_base64(self.client_secret.expose_secret().as_bytes(), &timestamp)?;
        let signature = hmac_base64(signing_key.as_bytes(), &data_to_sign)?;

        Ok(format!("{unsigned}signature={signature}"))
    }

    fn content_hash(&self, body: &[u8]) -> String {
        if body.is_empty() {
            return String::new();
        }
        let end = body.len().min(self.max_body);
        let digest = Sha256::digest(body.get(..end).unwrap_or(body));
        STANDARD.encode(digest)
    }
}

/// EdgeGrid timestamp: `yyyyMMddTHH:mm:ss+0000`, always UTC.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H:%M:%S+0000").to_string()
}

fn hmac_base64(key: &[u8], data: &str) -> Result<String, Error> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| Error::Signing(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
