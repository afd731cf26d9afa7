mod haversine;
mod polyline;
mod smooth;

pub(crate) use haversine::HaversineSegment;
pub use {
    polyline::{Polyline, TailPolicy},
    smooth::moving_average,
};

/// Base floating point type used for all coordinates and distances.
pub type C = f64;

/// Mean earth radius in meters, as used by `geo` and turf.
pub const MEAN_EARTH_RADIUS: C = 6_371_008.8;
