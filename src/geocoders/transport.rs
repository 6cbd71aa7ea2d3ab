//! HTTP transport: one blocking GET per call, JSON body out.

use super::types::GeocoderError;
use crate::config::ClientConfig;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Anything that can fetch a URL and hand back its JSON body.
///
/// The geocoders only ever talk to this trait, so tests can swap in an
/// in-memory implementation.
pub trait Transport: Send + Sync {
    fn get_json(&self, url: &Url, timeout: Duration) -> Result<Value, GeocoderError>;
}

/// `ureq`-backed transport carrying the proxy and user agent of a client.
pub struct HttpTransport {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, GeocoderError> {
        let mut builder = ureq::AgentBuilder::new().timeout(config.timeout);

        if let Some(proxy) = &config.proxy {
            let proxy = ureq::Proxy::new(proxy)
                .map_err(|e| GeocoderError::Config(format!("Invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            agent: builder.build(),
            user_agent: config.user_agent.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: &Url, timeout: Duration) -> Result<Value, GeocoderError> {
        let response = self
            .agent
            .request_url("GET", url)
            .set("User-Agent", &self.user_agent)
            .timeout(timeout)
            .call()
            .map_err(map_ureq_error)?;

        response
            .into_json()
            .map_err(|e| GeocoderError::InvalidResponse(e.to_string()))
    }
}

fn map_ureq_error(err: ureq::Error) -> GeocoderError {
    match err {
        ureq::Error::Status(code, response) => GeocoderError::Network(format!(
            "HTTP {} {}",
            code,
            response.status_text()
        )),
        ureq::Error::Transport(transport) => {
            let timed_out = std::error::Error::source(&transport)
                .and_then(|source| source.downcast_ref::<std::io::Error>())
                .map(|io| {
                    matches!(
                        io.kind(),
                        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                    )
                })
                .unwrap_or(false);

            if timed_out {
                GeocoderError::Timeout(transport.to_string())
            } else {
                GeocoderError::Network(transport.to_string())
            }
        }
    }
}
