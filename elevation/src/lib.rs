//! Elevation lookup backends.
//!
//! Each backend implements [`transect::ElevationLookup`]. Which one a
//! program talks to is decided once, at startup, by building a
//! [`Backend`] from a [`BackendConfig`].

mod arcgis;
mod error;
mod google;
mod http;
mod proxy;

pub use crate::{
    arcgis::ArcGisLookup, error::ElevationError, google::GoogleLookup, proxy::ProxyLookup,
};
use log::debug;
use reqwest::Client;
use transect::{geo::geometry::Coord, ElevationLookup, LookupError, C};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// The site's `/api/elevation` proxy.
    #[default]
    Proxy,

    /// An ArcGIS ImageServer DEM.
    ArcGis,

    /// Google Maps Elevation API.
    Google,
}

impl BackendKind {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::Proxy => proxy::DEFAULT_ENDPOINT,
            Self::ArcGis => arcgis::DEFAULT_ENDPOINT,
            Self::Google => google::DEFAULT_ENDPOINT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    pub kind: BackendKind,

    /// Overrides the backend's default endpoint.
    pub endpoint: Option<String>,

    /// Required by `Google`.
    pub api_key: Option<String>,

    /// Bearer token, sent by `Proxy` and `ArcGis` when present.
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Backend {
    Proxy(ProxyLookup),
    ArcGis(ArcGisLookup),
    Google(GoogleLookup),
}

impl Backend {
    pub fn new(config: BackendConfig) -> Result<Self, ElevationError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: BackendConfig) -> Result<Self, ElevationError> {
        let BackendConfig {
            kind,
            endpoint,
            api_key,
            token,
        } = config;
        let endpoint = endpoint.unwrap_or_else(|| kind.default_endpoint().to_string());
        debug!("elevation backend: {kind:?} at {endpoint}");

        let backend = match kind {
            BackendKind::Proxy => {
                let lookup = ProxyLookup::new(client, endpoint);
                Self::Proxy(match token {
                    Some(token) => lookup.with_token(token),
                    None => lookup,
                })
            }
            BackendKind::ArcGis => {
                let lookup = ArcGisLookup::new(client, endpoint);
                Self::ArcGis(match token {
                    Some(token) => lookup.with_token(token),
                    None => lookup,
                })
            }
            BackendKind::Google => {
                let api_key = api_key
                    .filter(|key| !key.is_empty())
                    .ok_or(ElevationError::MissingApiKey("google"))?;
                Self::Google(GoogleLookup::new(client, endpoint, api_key))
            }
        };
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Proxy(_) => BackendKind::Proxy,
            Self::ArcGis(_) => BackendKind::ArcGis,
            Self::Google(_) => BackendKind::Google,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Proxy(lookup) => lookup.endpoint(),
            Self::ArcGis(lookup) => lookup.endpoint(),
            Self::Google(lookup) => lookup.endpoint(),
        }
    }
}

impl ElevationLookup for Backend {
    async fn lookup(&self, coords: &[Coord<C>]) -> Result<Vec<C>, LookupError> {
        match self {
            Self::Proxy(lookup) => lookup.lookup(coords).await,
            Self::ArcGis(lookup) => lookup.lookup(coords).await,
            Self::Google(lookup) => lookup.lookup(coords).await,
        }
    }
}
