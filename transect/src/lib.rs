//! Elevation profiles along user drawn paths.
//!
//! A [`Profile`] is built by resampling a path at a fixed arc-length
//! step, looking up the elevation of every sample through an
//! [`ElevationLookup`] in bounded, sequential chunks, and smoothing the
//! result with a narrow moving average.

mod error;
mod lookup;
mod math;
mod profile;
mod stats;

pub use crate::{
    error::{LookupError, ProfileError},
    lookup::ElevationLookup,
    math::{moving_average, Polyline, TailPolicy, C, MEAN_EARTH_RADIUS},
    profile::{Profile, ProfileBuilder},
    stats::ProfileStats,
};
pub use geo;
pub use tokio_util::sync::CancellationToken;
