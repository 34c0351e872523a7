// Device HTTP client
//
// Wraps `reqwest::Client` with device-root URL construction, optional
// Basic auth, and status-code checking. Dialect knowledge (which path,
// which body) stays out of this module: callers hand in an `ApiRequest`.

use bytes::Bytes;
use futures_util::future::BoxFuture;
use secrecy::ExposeSecret;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::{ApiRequest, BasicAuth, Transport, TransportConfig};

/// Raw HTTP client for a single vacuum on the local network.
///
/// Returns response bodies untouched; decoding into wire models happens in
/// the `legacy` / `modern` modules.
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    basic_auth: Option<BasicAuth>,
}

impl HttpClient {
    /// Create a client for the device at `host` (an IP, `ip:port`, or a full
    /// `http://` URL).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: device_root(host)?,
            basic_auth: transport.basic_auth.clone(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            basic_auth: None,
        }
    }

    /// The device root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full URL for a device-relative path.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Execute a request and return the body of a successful response.
    pub async fn execute(&self, request: ApiRequest) -> Result<Bytes, Error> {
        let url = self.url(&request.path)?;
        debug!("{} {}", request.method, url);

        let mut builder = self.http.request(request.method, url);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        if let Some(ref auth) = self.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(auth.password.expose_secret()));
        }

        let resp = builder.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let bytes = resp.bytes().await?;
        trace!(len = bytes.len(), "response body received");
        Ok(bytes)
    }
}

impl Transport for HttpClient {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Bytes, Error>> {
        Box::pin(self.execute(request))
    }
}

/// Normalize a configured host into a device root URL ending in `/`.
fn device_root(host: &str) -> Result<Url, Error> {
    let host = host.trim().trim_end_matches('/');
    let raw = if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}/")
    } else {
        format!("http://{host}/")
    };
    Ok(Url::parse(&raw)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::device_root;

    #[test]
    fn bare_ip_gets_http_scheme() {
        let url = device_root("192.168.1.50").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.50/");
    }

    #[test]
    fn explicit_scheme_and_port_are_kept() {
        let url = device_root("http://10.0.0.7:8080/").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.7:8080/");
    }

    #[test]
    fn garbage_host_is_rejected() {
        assert!(device_root("http://[::1").is_err());
    }
}
