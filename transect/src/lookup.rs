use crate::{math::C, LookupError};
use geo::geometry::Coord;
use std::future::Future;

/// A source of point elevations.
///
/// Implementations must return exactly one elevation per input
/// coordinate, in input order. Units and vertical datum are whatever
/// the backing service provides; no conversion is applied downstream.
pub trait ElevationLookup {
    fn lookup(
        &self,
        coords: &[Coord<C>],
    ) -> impl Future<Output = Result<Vec<C>, LookupError>> + Send;
}
