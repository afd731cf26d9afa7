//! Great circle segment math.
//!
//! The interpolation routine is derived from the [geo] crate's
//! haversine intermediate algorithm, reworked so that the per-segment
//! trigonometry is computed once and reused for every sample taken on
//! that segment.
//!
//! [geo](https://github.com/georust/geo/blob/eb0cd98f3ccfa226631af23d94d66d214ea66488/geo/src/algorithm/haversine_intermediate.rs)

use super::{C, MEAN_EARTH_RADIUS};
use geo::geometry::Coord;

/// One leg of a polyline, on a spherical earth.
#[derive(Debug, Clone, Copy)]
pub struct HaversineSegment {
    start: Coord<C>,
    end: Coord<C>,
    length_m: C,
    params: HaversineParams,
}

impl HaversineSegment {
    pub fn new(start: Coord<C>, end: Coord<C>) -> Self {
        let params = get_params(start, end);
        Self {
            start,
            end,
            length_m: params.d * MEAN_EARTH_RADIUS,
            params,
        }
    }

    pub fn end(&self) -> Coord<C> {
        self.end
    }

    /// Great circle length in meters.
    pub fn length_m(&self) -> C {
        self.length_m
    }

    /// Returns the location `meters` along this segment from `start`,
    /// clamped to the segment's endpoints.
    pub fn point_at(&self, meters: C) -> Coord<C> {
        // Also catches zero-length segments, where the interpolation
        // below would divide by zero.
        if !(meters > 0.0 && self.length_m > 0.0) {
            return self.start;
        }
        if meters >= self.length_m {
            return self.end;
        }
        get_coord(&self.params, meters / self.length_m)
    }
}

#[allow(clippy::many_single_char_names)]
#[derive(Debug, Clone, Copy)]
struct HaversineParams {
    d: C,
    n: C,
    o: C,
    p: C,
    q: C,
    r: C,
    s: C,
}

#[allow(clippy::many_single_char_names)]
fn get_coord(params: &HaversineParams, f: C) -> Coord<C> {
    let HaversineParams {
        d,
        n,
        o,
        p,
        q,
        r,
        s,
    } = *params;

    let a = ((1.0 - f) * d).sin() / d.sin();
    let b = (f * d).sin() / d.sin();

    let x = a * n + b * o;
    let y = a * p + b * q;
    let z = a * r + b * s;

    let lat = z.atan2(x.hypot(y));
    let lon = y.atan2(x);

    Coord {
        x: lon.to_degrees(),
        y: lat.to_degrees(),
    }
}

#[allow(clippy::many_single_char_names)]
fn get_params(c1: Coord<C>, c2: Coord<C>) -> HaversineParams {
    let lat1 = c1.y.to_radians();
    let lon1 = c1.x.to_radians();
    let lat2 = c2.y.to_radians();
    let lon2 = c2.x.to_radians();

    let (lat1_sin, lat1_cos) = lat1.sin_cos();
    let (lat2_sin, lat2_cos) = lat2.sin_cos();
    let (lon1_sin, lon1_cos) = lon1.sin_cos();
    let (lon2_sin, lon2_cos) = lon2.sin_cos();

    let m = lat1_cos * lat2_cos;

    let n = lat1_cos * lon1_cos;
    let o = lat2_cos * lon2_cos;
    let p = lat1_cos * lon1_sin;
    let q = lat2_cos * lon2_sin;

    let k = (((lat1 - lat2) / 2.0).sin().powi(2) + m * ((lon1 - lon2) / 2.0).sin().powi(2)).sqrt();

    let d = 2.0 * k.asin();

    HaversineParams {
        d,
        n,
        o,
        p,
        q,
        r: lat1_sin,
        s: lat2_sin,
    }
}
