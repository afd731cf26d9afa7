//! Summary figures for a finished profile.

use crate::{math::C, Profile};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileStats {
    /// Distance of the last sample from the start, in meters.
    pub total_distance_m: C,

    pub min_elevation_m: C,

    pub max_elevation_m: C,

    /// `max_elevation_m - min_elevation_m`.
    pub elevation_range_m: C,

    /// Mean of the absolute grade between consecutive samples, in
    /// percent. Zero-length steps are ignored.
    pub average_grade_pct: C,
}

impl Profile {
    /// Percent grade from sample `idx - 1` to sample `idx`.
    ///
    /// Returns `None` for the first sample, out of range indices, and
    /// zero-length steps.
    pub fn grade_pct(&self, idx: usize) -> Option<C> {
        let prev = idx.checked_sub(1)?;
        let run = self.distances_m.get(idx)? - self.distances_m.get(prev)?;
        if run <= 0.0 {
            return None;
        }
        let rise = self.elevations_m.get(idx)? - self.elevations_m.get(prev)?;
        Some(rise / run * 100.0)
    }

    /// Returns `None` for an empty profile.
    pub fn stats(&self) -> Option<ProfileStats> {
        let total_distance_m = *self.distances_m.last()?;

        let (min_elevation_m, max_elevation_m) = self
            .elevations_m
            .iter()
            .fold((C::INFINITY, C::NEG_INFINITY), |(lo, hi), &e| {
                (lo.min(e), hi.max(e))
            });

        let (grade_sum, steps) = (1..self.len())
            .filter_map(|idx| self.grade_pct(idx))
            .fold((0.0, 0_u32), |(sum, n), grade| (sum + grade.abs(), n + 1));
        let average_grade_pct = match steps {
            0 => 0.0,
            n => grade_sum / C::from(n),
        };

        Some(ProfileStats {
            total_distance_m,
            min_elevation_m,
            max_elevation_m,
            elevation_range_m: max_elevation_m - min_elevation_m,
            average_grade_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Profile;
    use approx::assert_relative_eq;
    use geo::point;

    fn profile(distances_m: Vec<f64>, elevations_m: Vec<f64>) -> Profile {
        Profile {
            points: vec![point!(x: 0.0, y: 0.0); distances_m.len()],
            distances_m,
            elevations_m,
        }
    }

    #[test]
    fn test_grade() {
        let p = profile(vec![0.0, 10.0, 20.0, 20.0], vec![100.0, 101.0, 99.0, 120.0]);
        assert_eq!(p.grade_pct(0), None);
        assert_relative_eq!(p.grade_pct(1).unwrap(), 10.0);
        assert_relative_eq!(p.grade_pct(2).unwrap(), -20.0);
        assert_eq!(p.grade_pct(3), None);
        assert_eq!(p.grade_pct(4), None);
    }

    #[test]
    fn test_stats() {
        let p = profile(vec![0.0, 10.0, 20.0, 20.0], vec![100.0, 101.0, 99.0, 120.0]);
        let stats = p.stats().unwrap();
        assert_eq!(stats.total_distance_m, 20.0);
        assert_eq!(stats.min_elevation_m, 99.0);
        assert_eq!(stats.max_elevation_m, 120.0);
        assert_eq!(stats.elevation_range_m, 21.0);
        assert_relative_eq!(stats.average_grade_pct, 15.0);
    }

    #[test]
    fn test_stats_single_sample() {
        let stats = profile(vec![0.0], vec![42.0]).stats().unwrap();
        assert_eq!(stats.total_distance_m, 0.0);
        assert_eq!(stats.elevation_range_m, 0.0);
        assert_eq!(stats.average_grade_pct, 0.0);
    }

    #[test]
    fn test_stats_empty() {
        assert!(profile(vec![], vec![]).stats().is_none());
    }
}
