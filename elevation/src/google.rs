//! Google Maps Elevation API.

use crate::http::fetch_json;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use transect::{geo::geometry::Coord, ElevationLookup, LookupError, C};

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/elevation/json";

/// Keeps a request URL under the API's 16 384 character limit.
const MAX_LOCATIONS_PER_REQUEST: usize = 200;

#[derive(Clone)]
pub struct GoogleLookup {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleLookup {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, coords: &[Coord<C>]) -> RequestBuilder {
        self.client.get(&self.endpoint).query(&[
            ("locations", locations(coords)),
            ("key", self.api_key.clone()),
        ])
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for GoogleLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleLookup")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ElevationLookup for GoogleLookup {
    async fn lookup(&self, coords: &[Coord<C>]) -> Result<Vec<C>, LookupError> {
        let mut elevations = Vec::with_capacity(coords.len());
        for batch in coords.chunks(MAX_LOCATIONS_PER_REQUEST) {
            debug!("GET {}; points: {}", self.endpoint, batch.len());
            let response = fetch_json::<ElevationResponse>(self.request(batch)).await?;
            elevations.extend(response.into_elevations()?);
        }
        Ok(elevations)
    }
}

/// `lat,lng|lat,lng|...`, to 7 decimal places (about 1 cm).
fn locations(coords: &[Coord<C>]) -> String {
    let round = |v: C| (v * 1e7).round() / 1e7;
    coords
        .iter()
        .map(|Coord { x, y }| format!("{},{}", round(*y), round(*x)))
        .collect::<Vec<_>>()
        .join("|")
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    status: String,
    #[serde(default)]
    results: Vec<ElevationResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: C,
}

impl ElevationResponse {
    fn into_elevations(self) -> Result<Vec<C>, LookupError> {
        if self.status == "OK" {
            return Ok(self.results.into_iter().map(|r| r.elevation).collect());
        }
        Err(LookupError::Service(match self.error_message {
            Some(msg) => format!("{}: {msg}", self.status),
            None => self.status,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::{locations, ElevationResponse, GoogleLookup, MAX_LOCATIONS_PER_REQUEST};
    use reqwest::Client;
    use transect::{geo::coord, LookupError, Polyline, C};

    #[test]
    fn test_locations_are_lat_lng() {
        let s = locations(&[coord!(x: -71.30325, y: 44.2705), coord!(x: 0.5, y: -1.0)]);
        assert_eq!(s, "44.2705,-71.30325|-1,0.5");
    }

    #[test]
    fn test_locations_are_rounded() {
        let s = locations(&[coord!(x: 153.025_123_456_789, y: -27.469_812_345_678_9)]);
        assert_eq!(s, "-27.4698123,153.0251235");
    }

    #[test]
    fn test_full_chunk_fits_url_limit() {
        // A default-sized (400) chunk of interpolated coordinates.
        let (start, end) = (coord!(x: 153.0251, y: -27.4698), coord!(x: 153.0300, y: -27.4750));
        let polyline = Polyline::new(&[start, end]).unwrap();
        let step = polyline.length_m() / 399.0;
        let coords: Vec<_> = (0..400)
            .map(|k| polyline.point_at(step * C::from(k)))
            .collect();

        let lookup = GoogleLookup::new(Client::new(), super::DEFAULT_ENDPOINT, "k".repeat(39));
        let batches: Vec<_> = coords.chunks(MAX_LOCATIONS_PER_REQUEST).collect();
        assert_eq!(batches.len(), 2);
        for batch in batches {
            let request = lookup.request(batch).build().unwrap();
            assert!(request.url().as_str().len() < 16_384);
        }
    }

    #[test]
    fn test_ok() {
        let response: ElevationResponse = serde_json::from_str(
            r#"{
                "results": [
                    {"elevation": 1903.2, "location": {"lat": 44.2705, "lng": -71.30325}, "resolution": 9.5},
                    {"elevation": -3.5, "location": {"lat": 0, "lng": 0}, "resolution": 610.8}
                ],
                "status": "OK"
            }"#,
        )
        .unwrap();
        assert_eq!(response.into_elevations().unwrap(), vec![1903.2, -3.5]);
    }

    #[test]
    fn test_denied() {
        let response: ElevationResponse = serde_json::from_str(
            r#"{"error_message":"The provided API key is invalid.","results":[],"status":"REQUEST_DENIED"}"#,
        )
        .unwrap();
        match response.into_elevations() {
            Err(LookupError::Service(msg)) => {
                assert_eq!(msg, "REQUEST_DENIED: The provided API key is invalid.");
            }
            other => panic!("unexpected {other:?}"),
        }

        let response: ElevationResponse =
            serde_json::from_str(r#"{"results":[],"status":"OVER_QUERY_LIMIT"}"#).unwrap();
        assert!(matches!(
            response.into_elevations(),
            Err(LookupError::Service(msg)) if msg == "OVER_QUERY_LIMIT"
        ));
    }
}
