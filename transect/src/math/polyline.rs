use super::{HaversineSegment, C};
use crate::ProfileError;
use geo::geometry::Coord;

/// Distances closer than this (meters) to the path length count as
/// reaching it.
const TAIL_EPSILON_M: C = 1e-6;

/// How to treat the remainder of a path shorter than one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TailPolicy {
    /// Only sample at whole multiples of the step size. The final
    /// sample never lies beyond the end of the path, and the path's
    /// endpoint is only sampled when its length is a multiple of the
    /// step.
    #[default]
    Truncate,

    /// Like `Truncate`, plus one extra sample at the path's endpoint
    /// when the last whole step falls short of it.
    IncludeEnd,
}

/// An ordered path of two or more coordinates.
#[derive(Debug, Clone)]
pub struct Polyline {
    segments: Vec<HaversineSegment>,

    /// Distance from the start of the path to the end of each segment.
    cumulative_m: Vec<C>,
}

impl Polyline {
    pub fn new(coords: &[Coord<C>]) -> Result<Self, ProfileError> {
        if coords.len() < 2 {
            return Err(ProfileError::InvalidInput(
                "a path needs at least 2 coordinates",
            ));
        }

        let segments: Vec<HaversineSegment> = coords
            .windows(2)
            .map(|pair| HaversineSegment::new(pair[0], pair[1]))
            .collect();

        let cumulative_m = segments
            .iter()
            .scan(0.0, |total, segment| {
                *total += segment.length_m();
                Some(*total)
            })
            .collect();

        Ok(Self {
            segments,
            cumulative_m,
        })
    }

    /// Total length in meters.
    pub fn length_m(&self) -> C {
        self.cumulative_m.last().copied().unwrap_or(0.0)
    }

    /// Returns the location `meters` along the path.
    ///
    /// Distances before the start or past the end of the path are
    /// clamped to its first and last coordinates.
    pub fn point_at(&self, meters: C) -> Coord<C> {
        let idx = self.cumulative_m.partition_point(|&end| end < meters);
        match self.segments.get(idx) {
            Some(segment) => {
                let segment_start_m = match idx {
                    0 => 0.0,
                    _ => self.cumulative_m[idx - 1],
                };
                segment.point_at(meters - segment_start_m)
            }
            None => self.last(),
        }
    }

    /// Returns sample offsets and their locations every `step_m`
    /// meters along the path, starting at offset 0.
    pub fn resample(&self, step_m: C, tail: TailPolicy) -> (Vec<C>, Vec<Coord<C>>) {
        let offsets = sample_offsets(self.length_m(), step_m, tail);
        let points = offsets.iter().map(|&d| self.point_at(d)).collect();
        (offsets, points)
    }

    fn last(&self) -> Coord<C> {
        // A polyline always has at least one segment.
        self.segments[self.segments.len() - 1].end()
    }
}

/// Returns the offsets, in meters, at which a path of `length_m` is
/// sampled every `step_m` meters.
///
/// `step_m` must be positive.
pub(crate) fn sample_offsets(length_m: C, step_m: C, tail: TailPolicy) -> Vec<C> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole_steps = ((length_m + TAIL_EPSILON_M) / step_m).floor().max(0.0) as usize;

    #[allow(clippy::cast_precision_loss)]
    let mut offsets: Vec<C> = (0..=whole_steps)
        .map(|k| (k as C * step_m).min(length_m))
        .collect();

    if let (TailPolicy::IncludeEnd, Some(&last)) = (tail, offsets.last()) {
        if length_m - last > TAIL_EPSILON_M {
            offsets.push(length_m);
        }
    }

    offsets
}

#[cfg(test)]
mod tests {
    use super::{sample_offsets, Polyline, TailPolicy};
    use crate::ProfileError;
    use approx::assert_relative_eq;
    use geo::coord;

    #[test]
    fn test_too_few_points() {
        assert!(matches!(
            Polyline::new(&[]),
            Err(ProfileError::InvalidInput(_))
        ));
        assert!(matches!(
            Polyline::new(&[coord!(x: 0.0, y: 0.0)]),
            Err(ProfileError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_length_is_sum_of_segments() {
        let corner = Polyline::new(&[
            coord!(x: 0.0, y: 0.0),
            coord!(x: 0.0, y: 0.001),
            coord!(x: 0.001, y: 0.001),
        ])
        .unwrap();
        let first = Polyline::new(&[coord!(x: 0.0, y: 0.0), coord!(x: 0.0, y: 0.001)]).unwrap();
        let second =
            Polyline::new(&[coord!(x: 0.0, y: 0.001), coord!(x: 0.001, y: 0.001)]).unwrap();
        assert_relative_eq!(
            corner.length_m(),
            first.length_m() + second.length_m(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_point_at() {
        let a = coord!(x: 0.0, y: 0.0);
        let b = coord!(x: 0.0, y: 0.001);
        let c = coord!(x: 0.001, y: 0.001);
        let path = Polyline::new(&[a, b, c]).unwrap();
        let leg = Polyline::new(&[a, b]).unwrap().length_m();

        assert_eq!(path.point_at(0.0), a);
        assert_eq!(path.point_at(-1.0), a);
        assert_eq!(path.point_at(path.length_m()), c);
        assert_eq!(path.point_at(path.length_m() + 50.0), c);

        let corner = path.point_at(leg);
        assert_relative_eq!(corner.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(corner.y, b.y, epsilon = 1e-12);

        let halfway_up = path.point_at(leg / 2.0);
        assert_relative_eq!(halfway_up.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(halfway_up.y, 0.0005, epsilon = 1e-9);

        let past_corner = path.point_at(leg * 1.5);
        assert!(past_corner.x > 0.0004 && past_corner.x < 0.0006);
        assert_relative_eq!(past_corner.y, 0.001, epsilon = 1e-9);
    }

    #[test]
    fn test_repeated_vertex() {
        let a = coord!(x: 0.0, y: 0.0);
        let b = coord!(x: 0.0, y: 0.001);
        let path = Polyline::new(&[a, a, b, b]).unwrap();
        let direct = Polyline::new(&[a, b]).unwrap();
        assert_relative_eq!(path.length_m(), direct.length_m());

        let mid = path.point_at(direct.length_m() / 2.0);
        assert!(!mid.x.is_nan() && !mid.y.is_nan());
        assert_relative_eq!(mid.y, 0.0005, epsilon = 1e-9);
        assert_eq!(path.point_at(path.length_m()), b);
    }

    #[test]
    fn test_sample_offsets_truncate() {
        assert_eq!(
            sample_offsets(10.0, 5.0, TailPolicy::Truncate),
            vec![0.0, 5.0, 10.0]
        );
        assert_eq!(
            sample_offsets(11.0, 5.0, TailPolicy::Truncate),
            vec![0.0, 5.0, 10.0]
        );
        assert_eq!(
            sample_offsets(4.0, 5.0, TailPolicy::Truncate),
            vec![0.0]
        );
        assert_eq!(sample_offsets(0.0, 5.0, TailPolicy::Truncate), vec![0.0]);
    }

    #[test]
    fn test_sample_offsets_never_overshoot() {
        // Within rounding of a whole step: sampled, but clamped.
        let length = 10.0 - 1e-9;
        let offsets = sample_offsets(length, 5.0, TailPolicy::Truncate);
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[2], length);
    }

    #[test]
    fn test_sample_offsets_include_end() {
        assert_eq!(
            sample_offsets(10.0, 5.0, TailPolicy::IncludeEnd),
            vec![0.0, 5.0, 10.0]
        );
        assert_eq!(
            sample_offsets(11.0, 5.0, TailPolicy::IncludeEnd),
            vec![0.0, 5.0, 10.0, 11.0]
        );
        assert_eq!(
            sample_offsets(4.0, 5.0, TailPolicy::IncludeEnd),
            vec![0.0, 4.0]
        );
        assert_eq!(sample_offsets(0.0, 5.0, TailPolicy::IncludeEnd), vec![0.0]);
    }

    #[test]
    fn test_sample_count() {
        for (length, step) in [(111.195_f64, 5.0_f64), (1000.0, 7.0), (3.2, 0.5), (99.99, 10.0)] {
            let whole = (length / step).floor() as usize;
            assert_eq!(
                sample_offsets(length, step, TailPolicy::Truncate).len(),
                whole + 1
            );
            assert_eq!(
                sample_offsets(length, step, TailPolicy::IncludeEnd).len(),
                whole + 2
            );
        }
    }

    #[test]
    fn test_resample() {
        let path = Polyline::new(&[
            coord!(x: 153.0, y: -27.5),
            coord!(x: 153.001, y: -27.5),
            coord!(x: 153.001, y: -27.499),
        ])
        .unwrap();
        let (offsets, points) = path.resample(5.0, TailPolicy::Truncate);
        assert_eq!(offsets.len(), points.len());
        assert_eq!(offsets[0], 0.0);
        assert_eq!(points[0], coord!(x: 153.0, y: -27.5));
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert!(*offsets.last().unwrap() <= path.length_m());
    }
}
