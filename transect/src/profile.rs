use crate::{
    math::{moving_average, Polyline, TailPolicy, C},
    ElevationLookup, LookupError, ProfileError,
};
use geo::geometry::{Coord, Point};
use log::{debug, trace};
use std::{future::Future, time::Duration};
use tokio_util::sync::CancellationToken;

/// Half-width of the elevation smoothing window (5 samples).
const SMOOTHING_RADIUS: usize = 2;

/// Upper bound on samples per profile.
const MAX_SAMPLES: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Distance of each sample from the start of the path, in meters.
    pub distances_m: Vec<C>,

    /// Location of each sample along the path.
    pub points: Vec<Point<C>>,

    /// Smoothed elevation at each sample.
    pub elevations_m: Vec<C>,
}

impl Profile {
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder {
            path: None,
            step_size_m: 5.0,
            chunk_size: 400,
            tail: TailPolicy::Truncate,
            timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.distances_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances_m.is_empty()
    }
}

pub struct ProfileBuilder {
    path: Option<Vec<Coord<C>>>,

    /// Arc-length between samples (meters).
    step_size_m: C,

    /// Maximum number of points per lookup request.
    chunk_size: usize,

    tail: TailPolicy,

    /// Deadline for each lookup request.
    timeout: Option<Duration>,
}

impl ProfileBuilder {
    pub fn path<I>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = Coord<C>>,
    {
        self.path = Some(path.into_iter().collect());
        self
    }

    pub fn step_size(mut self, meters: C) -> Self {
        self.step_size_m = meters;
        self
    }

    pub fn chunk_size(mut self, points: usize) -> Self {
        self.chunk_size = points;
        self
    }

    pub fn tail(mut self, tail: TailPolicy) -> Self {
        self.tail = tail;
        self
    }

    /// Per-request timeout, `None` to wait indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Samples the path and looks up elevations through `lookup`.
    ///
    /// Requests are issued one chunk at a time. The first failing
    /// chunk aborts the whole profile. Cancelling `cancel` drops any
    /// in-flight request and returns [`ProfileError::Cancelled`]
    /// without issuing further requests.
    pub async fn build<L>(
        &self,
        lookup: &L,
        cancel: &CancellationToken,
    ) -> Result<Profile, ProfileError>
    where
        L: ElevationLookup,
    {
        let path = self
            .path
            .as_deref()
            .ok_or(ProfileError::InvalidInput("missing path"))?;
        if !(self.step_size_m.is_finite() && self.step_size_m > 0.0) {
            return Err(ProfileError::InvalidInput("step size must be positive"));
        }
        if self.chunk_size == 0 {
            return Err(ProfileError::InvalidInput("chunk size must be positive"));
        }
        let polyline = Polyline::new(path)?;
        #[allow(clippy::cast_precision_loss)]
        let max_samples = MAX_SAMPLES as C;
        if polyline.length_m() / self.step_size_m > max_samples {
            return Err(ProfileError::InvalidInput("step size too small for path length"));
        }

        let ((distances_m, coords), path_runtime) = {
            let now = std::time::Instant::now();
            let samples = polyline.resample(self.step_size_m, self.tail);
            (samples, now.elapsed())
        };

        let (raw_elevations, lookup_runtime) = {
            let now = std::time::Instant::now();
            let raw = self.lookup_chunks(&coords, lookup, cancel).await?;
            (raw, now.elapsed())
        };

        let elevations_m = moving_average(&raw_elevations, SMOOTHING_RADIUS);

        debug!(
            "profile; len: {}, length_m: {:.1}, chunks: {}, path_exec: {:?}, lookup_exec: {:?}",
            distances_m.len(),
            polyline.length_m(),
            coords.len().div_ceil(self.chunk_size),
            path_runtime,
            lookup_runtime
        );

        Ok(Profile {
            distances_m,
            points: coords.into_iter().map(Point::from).collect(),
            elevations_m,
        })
    }
}

/// Private API.
impl ProfileBuilder {
    async fn lookup_chunks<L>(
        &self,
        coords: &[Coord<C>],
        lookup: &L,
        cancel: &CancellationToken,
    ) -> Result<Vec<C>, ProfileError>
    where
        L: ElevationLookup,
    {
        let mut elevations = Vec::with_capacity(coords.len());

        for (chunk, batch) in coords.chunks(self.chunk_size).enumerate() {
            if cancel.is_cancelled() {
                debug!("profile cancelled before chunk {chunk}");
                return Err(ProfileError::Cancelled);
            }

            trace!("requesting chunk {chunk}; len: {}", batch.len());
            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("profile cancelled during chunk {chunk}");
                    return Err(ProfileError::Cancelled);
                }
                response = with_timeout(self.timeout, lookup.lookup(batch)) => response,
            };

            let values = response
                .and_then(|values| match values.len() {
                    n if n == batch.len() => Ok(values),
                    actual => Err(LookupError::LengthMismatch {
                        expected: batch.len(),
                        actual,
                    }),
                })
                .map_err(|source| ProfileError::Upstream { chunk, source })?;

            elevations.extend(values);
        }

        Ok(elevations)
    }
}

async fn with_timeout<F>(timeout: Option<Duration>, request: F) -> Result<Vec<C>, LookupError>
where
    F: Future<Output = Result<Vec<C>, LookupError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .map_err(|_elapsed| LookupError::Timeout(limit))?,
        None => request.await,
    }
}
