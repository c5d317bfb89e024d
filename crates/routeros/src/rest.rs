//! Transport over the router's `/rest` interface
//!
//! Every console command is reachable as `POST /rest/<menu path>` with the
//! command's attributes as a JSON object, so the same [`Command`] values the
//! binary API would carry map onto it directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{Command, Record, RouterConnector, RouterError, RouterSession};

/// Router address and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// `https` (default) or `http`
    pub scheme: String,
    pub port: Option<u16>,
    /// RouterOS ships a self-signed certificate by default
    pub accept_invalid_certs: bool,
    pub timeout_secs: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            scheme: "https".to_string(),
            port: None,
            accept_invalid_certs: false,
            timeout_secs: 30,
        }
    }
}

impl RestConfig {
    pub fn base_url(&self) -> Result<Url, RouterError> {
        let authority = match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        };
        Ok(Url::parse(&format!("{}://{}/", self.scheme, authority))?)
    }
}

/// Error body returned by the REST interface on failure
#[derive(Debug, Deserialize)]
struct RestFailure {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RestConnector {
    base_url: Url,
    username: String,
    password: String,
    client: Client,
}

impl RestConnector {
    pub fn new(config: &RestConfig) -> Result<Self, RouterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| RouterError::Connect(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url()?,
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl RouterConnector for RestConnector {
    /// Verifies reachability and credentials with a cheap identity read
    async fn connect(&self) -> Result<Box<dyn RouterSession>, RouterError> {
        let url = self.base_url.join("rest/system/identity")?;
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| RouterError::Connect(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(RouterError::Connect(
                    "cannot log in: invalid user name or password".to_string(),
                ));
            }
            status => {
                return Err(RouterError::Connect(format!(
                    "router answered {} to identity probe",
                    status
                )));
            }
        }

        Ok(Box::new(RestSession {
            base_url: self.base_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            client: self.client.clone(),
        }))
    }
}

struct RestSession {
    base_url: Url,
    username: String,
    password: String,
    client: Client,
}

#[async_trait]
impl RouterSession for RestSession {
    async fn write(&mut self, command: &Command) -> Result<Vec<Record>, RouterError> {
        let path = command.path().trim_start_matches('/');
        let url = self
            .base_url
            .join(&format!("rest/{}", path))
            .map_err(|e| RouterError::Trap(format!("invalid command path: {}", e)))?;

        tracing::debug!("router <- {}", command);
        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&command.to_json())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(failure_from_body(status, &body));
        }
        parse_records(&body)
    }

    // The REST interface is stateless per request, nothing to tear down.
    async fn close(self: Box<Self>) -> Result<(), RouterError> {
        Ok(())
    }
}

fn failure_from_body(status: StatusCode, body: &str) -> RouterError {
    let failure = serde_json::from_str::<RestFailure>(body).ok();
    let message = failure
        .and_then(|f| f.detail.or(f.message))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("router answered {}", status));
    RouterError::Trap(message)
}

/// Replies are an array of items (`print`), one object (`add` returns `{"ret": id}`)
/// or empty.
fn parse_records(body: &str) -> Result<Vec<Record>, RouterError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value =
        serde_json::from_str(body).map_err(|e| RouterError::Decode(e.to_string()))?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(RouterError::Decode(format!("expected object, got {}", other))),
            })
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        Value::Null => Ok(Vec::new()),
        other => Err(RouterError::Decode(format!("expected object or array, got {}", other))),
    }
}
