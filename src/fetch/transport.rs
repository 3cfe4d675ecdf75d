//! HTTP transport
//!
//! The single GET operation the fetcher needs, behind a trait so the retry
//! schedule can be exercised without a network.

use std::io::Read;
use std::time::Duration;

use crate::error::{FalkorLiteError, Result};

/// Performs an HTTP GET and returns the body
pub trait HttpTransport {
    /// Fetch `url`, sending `Authorization: Bearer <token>` when given
    ///
    /// Non-2xx responses map to [`FalkorLiteError::HttpStatus`].
    fn get(&self, url: &str, token: Option<&str>) -> Result<Vec<u8>>;
}

/// Blocking transport on a `ureq` agent
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a transport with an overall per-request timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

impl HttpTransport for UreqTransport {
    fn get(&self, url: &str, token: Option<&str>) -> Result<Vec<u8>> {
        let mut request = self.agent.get(url);
        if let Some(token) = token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        match request.call() {
            Ok(response) => {
                let mut body = Vec::new();
                response.into_reader().read_to_end(&mut body)?;
                Ok(body)
            }
            Err(ureq::Error::Status(status, _)) => Err(FalkorLiteError::HttpStatus {
                status,
                url: url.to_string(),
            }),
            Err(ureq::Error::Transport(transport)) => {
                Err(FalkorLiteError::Network(transport.to_string()))
            }
        }
    }
}
