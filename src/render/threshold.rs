// Bucket thresholds
//
// Rank-based tertile split over scaled, non-zero magnitudes. Locations and
// links get separate sets since their distributions differ.

use super::Bucket;
use crate::data::{Snapshot, TimedData};
use crate::scaling::{MagnitudeKind, ScalingTool};
use clap::ValueEnum;

/// Which population the thresholds are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThresholdMode {
    /// Every magnitude across the whole series
    #[default]
    Global,
    /// Magnitudes of the step under the cursor, recomputed on every move
    #[value(name = "step")]
    CurrentStep,
    /// Magnitudes of the final step
    #[value(name = "final")]
    FinalStep,
}

impl ThresholdMode {
    pub fn next(self) -> Self {
        match self {
            ThresholdMode::Global => ThresholdMode::CurrentStep,
            ThresholdMode::CurrentStep => ThresholdMode::FinalStep,
            ThresholdMode::FinalStep => ThresholdMode::Global,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThresholdMode::Global => "global",
            ThresholdMode::CurrentStep => "per step",
            ThresholdMode::FinalStep => "final step",
        }
    }
}

/// Boundaries of the low / mid / high buckets, in scaled units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSet {
    pub max: f64,
    pub middle_threshold: f64,
    pub final_threshold: f64,
    /// Number of non-zero values the set was computed from
    pub population: usize,
}

impl ThresholdSet {
    /// Set for an empty population: nothing is above any threshold,
    /// so every value lands in `Bucket::Low`.
    pub fn degenerate() -> Self {
        Self {
            max: 0.0,
            middle_threshold: f64::INFINITY,
            final_threshold: f64::INFINITY,
            population: 0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.population == 0
    }

    /// Tertile split over already scaled values
    pub fn from_scaled(mut values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self::degenerate();
        }
        values.sort_by(f64::total_cmp);

        let n = values.len();
        let third = n / 3;
        Self {
            max: values[n - 1],
            middle_threshold: values[third],
            final_threshold: values[third * 2],
            population: n,
        }
    }

    /// Drop zeros, scale the rest with `kind`, then split
    pub fn compute<I>(magnitudes: I, scaling: &ScalingTool, kind: MagnitudeKind) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let scaled = magnitudes
            .into_iter()
            .filter(|&v| v != 0)
            .map(|v| scaling.scale_as(kind, v))
            .collect();
        Self::from_scaled(scaled)
    }

    pub fn bucket(&self, scaled: f64) -> Bucket {
        if scaled > self.final_threshold {
            Bucket::High
        } else if scaled > self.middle_threshold {
            Bucket::Mid
        } else {
            Bucket::Low
        }
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self::degenerate()
    }
}

/// Location and link threshold sets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thresholds {
    pub locations: ThresholdSet,
    pub links: ThresholdSet,
}

impl Thresholds {
    /// Thresholds over every value in the series
    pub fn global(data: &TimedData, scaling: &ScalingTool) -> Self {
        Self {
            locations: ThresholdSet::compute(
                data.location_values().iter().copied(),
                scaling,
                MagnitudeKind::Location,
            ),
            links: ThresholdSet::compute(
                data.link_values().iter().copied(),
                scaling,
                MagnitudeKind::Link,
            ),
        }
    }

    /// Thresholds over the values of a single step
    pub fn for_snapshot(snapshot: &Snapshot, scaling: &ScalingTool) -> Self {
        Self {
            locations: ThresholdSet::compute(
                snapshot.locations.iter().map(|l| l.refugees),
                scaling,
                MagnitudeKind::Location,
            ),
            links: ThresholdSet::compute(
                snapshot.links.iter().map(|l| l.refugees),
                scaling,
                MagnitudeKind::Link,
            ),
        }
    }

    pub fn for_mode(mode: ThresholdMode, data: &TimedData, scaling: &ScalingTool) -> Self {
        match mode {
            ThresholdMode::Global => Self::global(data, scaling),
            ThresholdMode::CurrentStep => Self::for_snapshot(data.current(), scaling),
            ThresholdMode::FinalStep => Self::for_snapshot(data.last_step(), scaling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{link, snapshots};
    use proptest::prelude::*;

    #[test]
    fn test_three_link_scenario() {
        let mut steps = snapshots(&[&[1]]);
        steps[0].links = vec![
            link("A", "B", 9, false),
            link("B", "C", 1, false),
            link("C", "A", 5, false),
        ];
        let data = TimedData::new(steps).unwrap();

        let thresholds = Thresholds::for_snapshot(data.current(), &ScalingTool::Raw);
        assert_eq!(thresholds.links.middle_threshold, 5.0);
        assert_eq!(thresholds.links.final_threshold, 9.0);
        assert_eq!(thresholds.links.max, 9.0);
        assert_eq!(thresholds.links.population, 3);
    }

    #[test]
    fn test_zeros_are_excluded() {
        let set = ThresholdSet::compute([0u64, 0, 4, 0, 8, 2], &ScalingTool::Raw, MagnitudeKind::Location);
        assert_eq!(set.population, 3);
        assert_eq!(set.middle_threshold, 4.0);
        assert_eq!(set.final_threshold, 8.0);
    }

    #[test]
    fn test_thresholds_are_in_scaled_units() {
        let set = ThresholdSet::compute(
            [10u64, 100, 1000],
            &ScalingTool::Logarithmic,
            MagnitudeKind::Location,
        );
        assert!((set.middle_threshold - 100f64.ln()).abs() < 1e-12);
        assert!((set.max - 1000f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_final_index_is_twice_middle_index() {
        // n = 5: middle at index 1, final at index 2
        let set = ThresholdSet::from_scaled(vec![50.0, 10.0, 40.0, 20.0, 30.0]);
        assert_eq!(set.middle_threshold, 20.0);
        assert_eq!(set.final_threshold, 30.0);
        assert_eq!(set.max, 50.0);

        // n = 8: final at index 4, not floor(16 / 3) = 5
        let set = ThresholdSet::from_scaled((1..=8).map(f64::from).collect());
        assert_eq!(set.middle_threshold, 3.0);
        assert_eq!(set.final_threshold, 5.0);
    }

    #[test]
    fn test_empty_and_all_zero_are_degenerate() {
        let empty = ThresholdSet::compute(Vec::<u64>::new(), &ScalingTool::Raw, MagnitudeKind::Link);
        let zeros = ThresholdSet::compute([0u64, 0, 0], &ScalingTool::Raw, MagnitudeKind::Link);

        for set in [empty, zeros] {
            assert!(set.is_degenerate());
            assert_eq!(set.bucket(0.0), Bucket::Low);
            assert_eq!(set.bucket(1e12), Bucket::Low);
        }
    }

    #[test]
    fn test_bucket_boundaries_are_exclusive() {
        let set = ThresholdSet::from_scaled(vec![1.0, 5.0, 9.0]);
        assert_eq!(set.bucket(5.0), Bucket::Low);
        assert_eq!(set.bucket(5.5), Bucket::Mid);
        assert_eq!(set.bucket(9.0), Bucket::Mid);
        assert_eq!(set.bucket(9.5), Bucket::High);
    }

    #[test]
    fn test_global_keeps_duplicates() {
        let data = TimedData::new(snapshots(&[&[3, 0], &[3, 3], &[9, 3]])).unwrap();
        let thresholds = Thresholds::global(&data, &ScalingTool::Raw);

        // Population [3, 3, 3, 3, 9]
        assert_eq!(thresholds.locations.population, 5);
        assert_eq!(thresholds.locations.middle_threshold, 3.0);
        assert_eq!(thresholds.locations.max, 9.0);
        assert!(thresholds.links.is_degenerate());
    }

    #[test]
    fn test_modes_select_population() {
        let mut data = TimedData::new(snapshots(&[&[1, 2, 3], &[10, 20, 30]])).unwrap();
        let scaling = ScalingTool::Raw;

        let current = Thresholds::for_mode(ThresholdMode::CurrentStep, &data, &scaling);
        assert_eq!(current.locations.max, 3.0);

        let last = Thresholds::for_mode(ThresholdMode::FinalStep, &data, &scaling);
        assert_eq!(last.locations.max, 30.0);

        data.next();
        let current = Thresholds::for_mode(ThresholdMode::CurrentStep, &data, &scaling);
        assert_eq!(current.locations.max, 30.0);

        let global = Thresholds::for_mode(ThresholdMode::Global, &data, &scaling);
        assert_eq!(global.locations.population, 6);
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(ThresholdMode::Global.next(), ThresholdMode::CurrentStep);
        assert_eq!(ThresholdMode::CurrentStep.next(), ThresholdMode::FinalStep);
        assert_eq!(ThresholdMode::FinalStep.next(), ThresholdMode::Global);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Tertile split picks ranks n/3 and 2*(n/3) of the sorted scaled values
        #[test]
        fn prop_tertile_split(values in prop::collection::vec(1u64..1_000_000, 1..200)) {
            let set = ThresholdSet::compute(values.clone(), &ScalingTool::Raw, MagnitudeKind::Location);

            let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
            sorted.sort_by(f64::total_cmp);
            let n = sorted.len();

            prop_assert_eq!(set.population, n);
            prop_assert_eq!(set.max, sorted[n - 1]);
            prop_assert_eq!(set.middle_threshold, sorted[n / 3]);
            prop_assert_eq!(set.final_threshold, sorted[(n / 3) * 2]);
            prop_assert!(set.middle_threshold <= set.final_threshold);
            prop_assert!(set.final_threshold <= set.max);
        }
    }
}
