use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use url::Url;

const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";
const LOCKER_PASSWORD_HEADER: &str = "X-Locker-Password";

/// Thin HTTP client for the API envelope: unwraps `data` on success and
/// turns `{success: false, error}` into an error.
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
    admin_password: Option<String>,
    session_token: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str, admin_password: Option<String>, session_token: Option<String>) -> Result<Self> {
        let base = Url::parse(server).with_context(|| format!("invalid server URL: {}", server))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("server URL must be http or https: {}", server);
        }
        Ok(Self {
            base,
            http: reqwest::Client::new(),
            admin_password,
            session_token,
        })
    }

    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base.join(path).with_context(|| format!("invalid path: {}", path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub fn request(&self, method: Method, path: &str, query: &[(&str, &str)]) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.endpoint(path, query)?))
    }

    /// Attach the admin credential. A session token wins over the password.
    pub fn with_admin(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        if let Some(token) = &self.session_token {
            return Ok(req.bearer_auth(token));
        }
        match &self.admin_password {
            Some(password) => Ok(req.header(ADMIN_PASSWORD_HEADER, password)),
            None => bail!("admin credential required: set LOCKER_SESSION_TOKEN or LOCKER_ADMIN_PASSWORD"),
        }
    }

    pub fn with_locker_password(req: RequestBuilder, password: &str) -> RequestBuilder {
        req.header(LOCKER_PASSWORD_HEADER, password)
    }

    /// Send and return the `data` member of a success envelope.
    pub async fn send(&self, req: RequestBuilder) -> Result<Value> {
        let response = req.send().await.context("request failed")?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("invalid JSON response (HTTP {})", status))?;
        unwrap_envelope(status.as_u16(), body)
    }
}

pub fn unwrap_envelope(status: u16, body: Value) -> Result<Value> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(body.get("data").cloned().unwrap_or(Value::Null));
    }
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    Err(anyhow!("{} (HTTP {})", message, status))
}
