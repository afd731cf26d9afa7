//! ArcGIS ImageServer `getSamples` on a DEM raster.

use crate::http::fetch_json;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use transect::{geo::geometry::Coord, ElevationLookup, LookupError, C};

/// Queensland's state-wide DEM time series.
pub const DEFAULT_ENDPOINT: &str = "https://spatial-img.information.qld.gov.au/arcgis/rest/services/Elevation/DEM_TimeSeries_AllUsers/ImageServer/getSamples";

#[derive(Debug, Clone)]
pub struct ArcGisLookup {
    client: Client,
    endpoint: String,
    /// Optional bearer token, for gateways in front of the server.
    token: Option<String>,
}

impl ArcGisLookup {
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

impl ElevationLookup for ArcGisLookup {
    async fn lookup(&self, coords: &[Coord<C>]) -> Result<Vec<C>, LookupError> {
        debug!("POST {}; points: {}", self.endpoint, coords.len());
        // Form encoded POST, since a few hundred points overflow most
        // URL length limits.
        let mut request = self.client.post(&self.endpoint).form(&params(coords));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        fetch_json::<SamplesResponse>(request)
            .await?
            .into_elevations(coords.len())
    }
}

fn params(coords: &[Coord<C>]) -> [(&'static str, String); 6] {
    let points: Vec<[C; 2]> = coords.iter().map(|c| [c.x, c.y]).collect();
    [
        ("f", "json".to_string()),
        (
            "geometry",
            json!({ "points": points, "spatialReference": { "wkid": 4326 } }).to_string(),
        ),
        ("geometryType", "esriGeometryMultipoint".to_string()),
        ("returnFirstValueOnly", "true".to_string()),
        (
            "pixelSize",
            json!({ "x": 1, "y": 1, "spatialReference": { "wkid": 3857 } }).to_string(),
        ),
        (
            "mosaicRule",
            json!({ "mosaicMethod": "NorthWest" }).to_string(),
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct SamplesResponse {
    #[serde(default)]
    samples: Option<Vec<Sample>>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sample {
    location_id: usize,
    value: SampleValue,
}

/// Sample values arrive as strings, except from some servers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleValue {
    Number(C),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

impl SamplesResponse {
    /// Orders samples by location id, requiring exactly one sample per
    /// requested point.
    fn into_elevations(self, expected: usize) -> Result<Vec<C>, LookupError> {
        if let Some(ServiceError { code, message }) = self.error {
            return Err(LookupError::Service(match code {
                Some(code) => format!("{code} {message}"),
                None => message,
            }));
        }

        let samples = self
            .samples
            .ok_or_else(|| LookupError::Malformed("missing samples".to_string()))?;
        if samples.len() != expected {
            return Err(LookupError::LengthMismatch {
                expected,
                actual: samples.len(),
            });
        }

        let mut elevations: Vec<Option<C>> = vec![None; expected];
        for Sample { location_id, value } in samples {
            let elevation = match value {
                SampleValue::Number(v) => v,
                SampleValue::Text(text) => text.trim().parse().map_err(|_| {
                    LookupError::Malformed(format!("location {location_id} has value {text:?}"))
                })?,
            };
            let slot = elevations.get_mut(location_id).ok_or_else(|| {
                LookupError::Malformed(format!("unexpected location id {location_id}"))
            })?;
            *slot = Some(elevation);
        }

        elevations
            .into_iter()
            .enumerate()
            .map(|(id, elevation)| {
                elevation.ok_or_else(|| LookupError::Malformed(format!("no sample for location {id}")))
            })
            .collect()
    }
}
