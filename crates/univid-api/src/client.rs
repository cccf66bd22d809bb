// NVR HTTP client
//
// Wraps `reqwest::Client` with URL construction against the `/api/2.0/`
// base, credential attachment (API key query parameter or session cookie),
// the single re-login on 401, and response decoding. Endpoint methods
// (bootstrap, cameras, recordings) live in sibling modules as inherent
// methods so this file stays focused on the request cycle.

use std::path::Path;

use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, SET_COOKIE};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::{AuthStrategy, Credentials};
use crate::error::Error;
use crate::response::{ApiResponse, RawOutput, VendorError};
use crate::transport::TransportConfig;

/// Name of the session cookie issued by `POST login`.
pub const SESSION_COOKIE: &str = "JSESSIONID_AV";

/// Query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "apiKey";

pub(crate) const LOGIN_PATH: &str = "login";

/// Raw HTTP client for one UniFi Video NVR.
///
/// Holds the credential variant chosen at construction, the current session
/// cookie, and the "login attempted since last success" flag that bounds
/// re-authentication to one round-trip per call. Methods that talk to the
/// server take `&mut self` because any response may rotate the cookie.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    session_cookie: Option<String>,
    login_attempted: bool,
}

impl SessionClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` must end in `/api/2.0/`; see [`SessionClient::base_url_for`].
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
            session_cookie: None,
            login_attempted: false,
        }
    }

    /// Compose `schema://address:port/api/2.0/`.
    pub fn base_url_for(schema: &str, address: &str, port: u16) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{schema}://{address}:{port}/api/2.0/"))?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn strategy(&self) -> AuthStrategy {
        self.credentials.strategy()
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The current session cookie value, if one has been issued.
    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    pub fn login_attempted(&self) -> bool {
        self.login_attempted
    }

    pub(crate) fn set_login_attempted(&mut self, attempted: bool) {
        self.login_attempted = attempted;
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve `path` against the base URL, appending the API key when
    /// authenticating by key.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let mut url = self.base_url.join(path)?;
        if let Credentials::ApiKey { key } = &self.credentials {
            url.query_pairs_mut()
                .append_pair(API_KEY_PARAM, key.expose_secret());
        }
        Ok(url)
    }

    // ── Request cycle ────────────────────────────────────────────────

    /// Issue one logical request.
    ///
    /// A 401 is final under API-key auth. Under credentials it triggers at
    /// most one login followed by one retransmission. A 400 carrying the
    /// vendor envelope becomes [`Error::Server`]; any other non-2xx status
    /// is returned as [`ApiResponse::NoData`].
    pub async fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        raw: &RawOutput,
    ) -> Result<ApiResponse, Error> {
        let mut relogged = false;
        loop {
            let url = self.endpoint_url(path)?;
            debug!("{method} {path}");

            let resp = self.send(method.clone(), url, body).await?;
            if resp.status() != StatusCode::UNAUTHORIZED {
                return self.decode(resp, raw).await;
            }

            match self.credentials.strategy() {
                AuthStrategy::ApiKey => {
                    return Err(Error::Authentication {
                        message: "API key rejected (HTTP 401)".into(),
                    });
                }
                AuthStrategy::Session => {
                    if relogged || self.login_attempted || path == LOGIN_PATH {
                        return Err(Error::Authentication {
                            message: format!("{method} {path} rejected after re-login (HTTP 401)"),
                        });
                    }
                    debug!("session rejected, logging in again");
                    self.login().await?;
                    relogged = true;
                }
            }
        }
    }

    pub async fn get(&mut self, path: &str) -> Result<ApiResponse, Error> {
        self.request(Method::GET, path, None, &RawOutput::Text).await
    }

    /// GET a non-JSON resource in the given raw mode.
    pub async fn get_raw(&mut self, path: &str, raw: &RawOutput) -> Result<ApiResponse, Error> {
        self.request(Method::GET, path, None, raw).await
    }

    pub async fn post(&mut self, path: &str, body: &Value) -> Result<ApiResponse, Error> {
        self.request(Method::POST, path, Some(body), &RawOutput::Text)
            .await
    }

    pub async fn put(&mut self, path: &str, body: &Value) -> Result<ApiResponse, Error> {
        self.request(Method::PUT, path, Some(body), &RawOutput::Text)
            .await
    }

    pub async fn delete(&mut self, path: &str) -> Result<ApiResponse, Error> {
        self.request(Method::DELETE, path, None, &RawOutput::Text)
            .await
    }

    /// Send a single HTTP exchange, attaching the session cookie and
    /// capturing any rotated one from the response.
    pub(crate) async fn send(
        &mut self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, Error> {
        let mut builder = self.http.request(method, url);

        if let (Credentials::Session { .. }, Some(cookie)) =
            (&self.credentials, self.session_cookie.as_deref())
        {
            builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={cookie}"));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;

        if let Some(cookie) = parse_session_cookie(resp.headers()) {
            trace!("session cookie updated");
            self.session_cookie = Some(cookie);
        }

        Ok(resp)
    }

    /// Turn a non-401 response into an [`ApiResponse`] or a raised error.
    pub(crate) async fn decode(
        &self,
        resp: reqwest::Response,
        raw: &RawOutput,
    ) -> Result<ApiResponse, Error> {
        let status = resp.status();

        if status == StatusCode::BAD_REQUEST {
            let body = resp.bytes().await.map_err(Error::Transport)?;
            return match serde_json::from_slice::<VendorError>(&body) {
                Ok(envelope) if envelope.rc == "error" => {
                    let caused_by = envelope.cause_text();
                    Err(Error::Server {
                        message: envelope.message.unwrap_or_else(|| "unknown error".into()),
                        caused_by,
                    })
                }
                _ => Ok(ApiResponse::NoData {
                    status: status.as_u16(),
                }),
            };
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), "request returned no data");
            return Ok(ApiResponse::NoData {
                status: status.as_u16(),
            });
        }

        if is_json(resp.headers()) {
            let body = resp.bytes().await.map_err(Error::Transport)?;
            let value = serde_json::from_slice(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
            })?;
            return Ok(ApiResponse::Json(value));
        }

        match raw {
            RawOutput::File(path) => match save_body(resp, path).await {
                Ok(written) => {
                    debug!(path = %path.display(), bytes = written, "saved response body");
                    Ok(ApiResponse::Saved(path.clone()))
                }
                Err(err) => {
                    // A truncated download must not look like a finished one.
                    if let Err(rm) = tokio::fs::remove_file(path).await {
                        warn!(path = %path.display(), error = %rm, "could not remove partial file");
                    }
                    Err(err)
                }
            },
            RawOutput::Bytes => Ok(ApiResponse::Binary(
                resp.bytes().await.map_err(Error::Transport)?,
            )),
            RawOutput::Text => {
                let body = resp.bytes().await.map_err(Error::Transport)?;
                match String::from_utf8(body.to_vec()) {
                    Ok(text) => Ok(ApiResponse::Text(text)),
                    Err(_) => Ok(ApiResponse::Binary(body)),
                }
            }
        }
    }
}

/// Stream `resp` into `path`, returning the number of bytes written.
async fn save_body(mut resp: reqwest::Response, path: &Path) -> Result<u64, Error> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = resp.chunk().await.map_err(Error::Transport)? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.set_len(written).await?;
    file.flush().await?;
    Ok(written)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"))
}

/// Find `JSESSIONID_AV=<value>` among the response's `Set-Cookie` headers.
///
/// Servers may fold several cookies into one header separated by commas, so
/// each header is split on `,` and then on `;`.
pub(crate) fn parse_session_cookie(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(','))
        .flat_map(|cookie| cookie.split(';'))
        .map(str::trim)
        .find_map(|part| part.strip_prefix(prefix.as_str()))
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;
    use secrecy::SecretString;

    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(SET_COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn session_cookie_found_in_single_header() {
        let h = headers(&["JSESSIONID_AV=abc123; Path=/; HttpOnly"]);
        assert_eq!(parse_session_cookie(&h).as_deref(), Some("abc123"));
    }

    #[test]
    fn session_cookie_found_among_folded_cookies() {
        let h = headers(&["other=1; Path=/, JSESSIONID_AV=xyz; Secure"]);
        assert_eq!(parse_session_cookie(&h).as_deref(), Some("xyz"));
    }

    #[test]
    fn session_cookie_found_in_second_header() {
        let h = headers(&["other=1", "JSESSIONID_AV=second"]);
        assert_eq!(parse_session_cookie(&h).as_deref(), Some("second"));
    }

    #[test]
    fn no_session_cookie() {
        assert!(parse_session_cookie(&headers(&["other=1; Path=/"])).is_none());
        assert!(parse_session_cookie(&HeaderMap::new()).is_none());
    }

    #[test]
    fn base_url_is_api_root() {
        let url = SessionClient::base_url_for("https", "nvr.local", 7443).unwrap();
        assert_eq!(url.as_str(), "https://nvr.local:7443/api/2.0/");
    }

    #[test]
    fn api_key_appended_to_every_endpoint() {
        let base = SessionClient::base_url_for("http", "nvr", 7080).unwrap();
        let client = SessionClient::with_client(
            reqwest::Client::new(),
            base,
            Credentials::ApiKey {
                key: SecretString::from("k3y"),
            },
        );
        let url = client.endpoint_url("recording?idsOnly=false").unwrap();
        assert_eq!(url.path(), "/api/2.0/recording");
        let pairs: Vec<_> = url.query_pairs().collect();
        assert_eq!(pairs[0].0, "idsOnly");
        assert_eq!(pairs[1], ("apiKey".into(), "k3y".into()));
    }

    #[test]
    fn credentials_mode_leaves_query_alone() {
        let base = SessionClient::base_url_for("http", "nvr", 7080).unwrap();
        let client = SessionClient::with_client(
            reqwest::Client::new(),
            base,
            Credentials::Session {
                username: "u".into(),
                password: SecretString::from("p"),
            },
        );
        let url = client.endpoint_url("camera").unwrap();
        assert_eq!(url.as_str(), "http://nvr:7080/api/2.0/camera");
    }
}
