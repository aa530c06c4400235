//! Blocking HTTP transport backed by `ureq`.
//!
//! Every request is authenticated with HTTP basic auth and resolved against
//! the fabric root `<console host>/console/rest/<version>/<fabric>/`.

use crate::error::Result;
use crate::transport::{Method, Request, Response, Transport};
use crate::{ConsoleConfig, fabric_root};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::collections::HashMap;
use url::Url;

/// Maximum response body size (models of large fabrics get big).
const MAX_BODY_SIZE: u64 = 100 * 1024 * 1024;

/// Transport talking to a live console.
pub struct UreqTransport {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Fabric root every request path is joined to.
    base: Url,
    /// Precomputed `Authorization` header value.
    authorization: String,
}

impl UreqTransport {
    /// Create a transport for the console described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the console URL cannot be parsed.
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let root = fabric_root(&config.api_version, &config.fabric);
        let base = Url::parse(&config.url)?.join(&root)?;

        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .user_agent(config.user_agent.as_str())
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(agent_config),
            base,
            authorization: basic_auth(&config.username, &config.password),
        })
    }

    /// Resolve a fabric-relative path.
    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &Request) -> Result<Response> {
        let url = self.url_for(&request.path)?;
        log::debug!("URL via ({}): {}", request.method, url);

        let result = match request.method {
            Method::Get => self
                .agent
                .get(url.as_str())
                .header("Authorization", &self.authorization)
                .call(),
            Method::Head => self
                .agent
                .head(url.as_str())
                .header("Authorization", &self.authorization)
                .call(),
            Method::Post => {
                let mut builder = self
                    .agent
                    .post(url.as_str())
                    .header("Authorization", &self.authorization);
                if let Some(content_type) = &request.content_type {
                    builder = builder.header("Content-Type", content_type);
                }
                match &request.body {
                    Some(body) => builder.send(&body[..]),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result?;

        let status = response.status();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let body = if request.method == Method::Head {
            String::new()
        } else {
            response
                .body_mut()
                .with_config()
                .limit(MAX_BODY_SIZE)
                .read_to_string()?
        };

        Ok(Response {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

/// Build an HTTP basic `Authorization` header value.
fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}
