//! The site's own `/api/elevation` endpoint.
//!
//! ```text
//! POST { "points": [[lng, lat], ...] }
//!   -> { "elevations": [..] }
//!    | { "error": "..", "status"?: 403, "detail"?: ".." }
//! ```
//!
//! The proxy reports its own failures with an HTTP 200 and an `error`
//! body, so a success status alone does not mean success.

use crate::http::fetch_json;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use transect::{geo::geometry::Coord, ElevationLookup, LookupError, C};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/elevation";

#[derive(Debug, Clone)]
pub struct ProxyLookup {
    client: Client,
    endpoint: String,
    /// Optional bearer token.
    token: Option<String>,
}

impl ProxyLookup {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ElevationLookup for ProxyLookup {
    async fn lookup(&self, coords: &[Coord<C>]) -> Result<Vec<C>, LookupError> {
        debug!("POST {}; points: {}", self.endpoint, coords.len());
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ProxyRequest::new(coords));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        fetch_json::<ProxyResponse>(request).await?.into_elevations()
    }
}

#[derive(Debug, Serialize)]
struct ProxyRequest {
    /// `[lng, lat]` pairs.
    points: Vec<[C; 2]>,
}

impl ProxyRequest {
    fn new(coords: &[Coord<C>]) -> Self {
        Self {
            points: coords.iter().map(|c| [c.x, c.y]).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProxyResponse {
    Elevations {
        elevations: Vec<C>,
    },
    Error {
        error: String,
        #[serde(default)]
        status: Option<u16>,
        #[serde(default)]
        detail: Option<String>,
    },
}

impl ProxyResponse {
    fn into_elevations(self) -> Result<Vec<C>, LookupError> {
        match self {
            Self::Elevations { elevations } => Ok(elevations),
            Self::Error {
                error,
                status,
                detail,
            } => {
                let mut msg = error;
                if let Some(status) = status {
                    msg.push_str(&format!(" (HTTP {status})"));
                }
                if let Some(detail) = detail {
                    msg.push_str(&format!(": {detail}"));
                }
                Err(LookupError::Service(msg))
            }
        }
    }
}
