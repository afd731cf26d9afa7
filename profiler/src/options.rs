use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand, ValueEnum};
use elevation::BackendKind;
use std::str::FromStr;
use transect::{geo::geometry::Coord, TailPolicy};

/// Sample an elevation profile along a path.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Path vertex "lat,lon". Repeat once per vertex, in order.
    #[arg(short, long = "point", required = true)]
    pub points: Vec<LatLon>,

    /// Distance between samples, in meters.
    #[arg(short, long, default_value_t = 5.0)]
    pub step: f64,

    /// Maximum number of points per elevation request.
    #[arg(short, long, default_value_t = 400)]
    pub chunk_size: usize,

    /// How to sample the remainder of the path past the last whole step.
    #[arg(long, value_enum, default_value_t = Tail::Truncate)]
    pub tail: Tail,

    /// Per-request timeout in seconds; 0 waits forever.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Elevation service.
    #[arg(short, long, value_enum, default_value_t = Source::Proxy)]
    pub backend: Source,

    /// Override the elevation service's default URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Google Maps API key.
    #[arg(long, env = "GOOGLE_MAPS_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Bearer token for the proxy or ArcGIS gateway.
    #[arg(long, env = "ELEVATION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Debug, Copy)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon pair"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(anyhow!("{s} is out of range"));
        }
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Tail {
    /// Stop at the last whole step.
    Truncate,
    /// Also sample the path's endpoint.
    IncludeEnd,
}

impl From<Tail> for TailPolicy {
    fn from(tail: Tail) -> Self {
        match tail {
            Tail::Truncate => Self::Truncate,
            Tail::IncludeEnd => Self::IncludeEnd,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Source {
    /// The site's /api/elevation proxy.
    Proxy,
    /// An ArcGIS ImageServer getSamples endpoint.
    #[value(name = "arcgis")]
    ArcGis,
    /// Google Maps Elevation API.
    Google,
}

impl From<Source> for BackendKind {
    fn from(source: Source) -> Self {
        match source {
            Source::Proxy => Self::Proxy,
            Source::ArcGis => Self::ArcGis,
            Source::Google => Self::Google,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print samples as CSV.
    Csv,

    /// Print samples as JSON.
    Json,

    /// Plot to terminal.
    Plot,

    /// Print distance, elevation range and average grade.
    Stats,
}
