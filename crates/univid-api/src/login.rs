// Session login
//
// Exchanges username/password for a `JSESSIONID_AV` cookie. Invoked lazily
// by the request cycle on the first 401; callers may also log in eagerly.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use crate::auth::Credentials;
use crate::client::{LOGIN_PATH, SessionClient};
use crate::error::Error;

impl SessionClient {
    /// Post credentials to `login`.
    ///
    /// The "login attempted" flag is raised before the request goes out and
    /// only lowered on a 2xx answer, so a failed login is not retried by
    /// later requests. The cookie itself is captured by the send path.
    pub async fn login(&mut self) -> Result<(), Error> {
        let body = match self.credentials() {
            Credentials::Session { username, password } => json!({
                "username": username,
                "password": password.expose_secret(),
            }),
            Credentials::ApiKey { .. } => {
                return Err(Error::WrongAuthStrategy {
                    expected: "credentials".into(),
                    got: "api key".into(),
                });
            }
        };

        self.set_login_attempted(true);
        debug!("logging in");

        let url = self.endpoint_url(LOGIN_PATH)?;
        let resp = self.send(Method::POST, url, Some(&body)).await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        self.set_login_attempted(false);
        debug!("login successful");
        Ok(())
    }
}
