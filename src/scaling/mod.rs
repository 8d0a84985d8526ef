// Magnitude scaling
//
// Pure transforms from a raw count (refugees at a location, flow along a
// link, absolute change between steps) to the value that drives color
// buckets, circle radii and heatmap intensity.
//
// Every method maps 0 to 0 and keeps non-negative input non-negative.

use crate::data::Dataset;
use clap::ValueEnum;
use tracing::warn;

/// Divisor applied to the series length when fitting the logistic midpoint
pub const DEFAULT_MIDPOINT_DEVIATION: f64 = 12.0;

/// Which kind of magnitude is being scaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagnitudeKind {
    Location,
    Link,
    Difference,
}

impl MagnitudeKind {
    pub const ALL: [MagnitudeKind; 3] = [
        MagnitudeKind::Location,
        MagnitudeKind::Link,
        MagnitudeKind::Difference,
    ];
}

/// Selector for the available scaling methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ScalingKind {
    /// Values pass through unchanged
    Raw,
    /// Natural logarithm
    #[default]
    Log,
    /// Logistic growth curve fitted to the dataset
    #[value(name = "logistic")]
    LogisticGrowth,
}

impl ScalingKind {
    pub const ALL: [ScalingKind; 3] = [
        ScalingKind::Raw,
        ScalingKind::Log,
        ScalingKind::LogisticGrowth,
    ];

    /// Registry key of the method
    pub fn name(self) -> &'static str {
        match self {
            ScalingKind::Raw => "raw",
            ScalingKind::Log => "log",
            ScalingKind::LogisticGrowth => "logisticGrowth",
        }
    }

    /// Next method in registry order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Parameters of one logistic curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    /// Upper bound of the curve
    pub ceiling: f64,
    pub growth_rate: f64,
    /// Input value at which the curve reaches half the ceiling
    pub mid_point: f64,
}

impl LogisticParams {
    fn evaluate(&self, value: u64) -> f64 {
        if value == 0 {
            return 0.0;
        }
        let v = value as f64;
        self.ceiling / (1.0 + (-self.growth_rate * (v - self.mid_point)).exp())
    }
}

/// Logistic growth scaling with independent curves per magnitude kind
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticGrowth {
    location: LogisticParams,
    link: LogisticParams,
    difference: LogisticParams,
    mid_point_deviation: f64,
}

impl LogisticGrowth {
    pub fn new(
        location: LogisticParams,
        link: LogisticParams,
        difference: LogisticParams,
        mid_point_deviation: f64,
    ) -> Self {
        Self {
            location,
            link,
            difference,
            mid_point_deviation,
        }
    }

    /// Fit all three curves to the observed maxima of `dataset`
    ///
    /// A deviation that is not a positive finite number would put the
    /// midpoint at infinity; `DEFAULT_MIDPOINT_DEVIATION` is used instead.
    pub fn fit(dataset: &Dataset, mid_point_deviation: f64) -> Self {
        let mid_point_deviation = if is_valid_deviation(mid_point_deviation) {
            mid_point_deviation
        } else {
            warn!(
                mid_point_deviation,
                "Invalid midpoint deviation, using default"
            );
            DEFAULT_MIDPOINT_DEVIATION
        };
        let time = dataset.timeline.len();
        let fit = |end: u64| calculate_parameters(0.0, end as f64, time, mid_point_deviation);

        Self::new(
            fit(dataset.max_location_value()),
            fit(dataset.max_link_value()),
            fit(dataset.timeline.max_diff()),
            mid_point_deviation,
        )
    }

    pub fn params(&self, kind: MagnitudeKind) -> LogisticParams {
        match kind {
            MagnitudeKind::Location => self.location,
            MagnitudeKind::Link => self.link,
            MagnitudeKind::Difference => self.difference,
        }
    }

    pub fn set_params(&mut self, kind: MagnitudeKind, params: LogisticParams) {
        match kind {
            MagnitudeKind::Location => self.location = params,
            MagnitudeKind::Link => self.link = params,
            MagnitudeKind::Difference => self.difference = params,
        }
    }

    pub fn mid_point_deviation(&self) -> f64 {
        self.mid_point_deviation
    }
}

/// Whether `deviation` can divide the series length into a finite midpoint
pub fn is_valid_deviation(deviation: f64) -> bool {
    deviation.is_finite() && deviation > 0.0
}

/// Per-step growth rate taking `start` to `end` over `time` steps
///
/// A zero start is treated as 1, and `time` below 1 as 1.
pub fn calculate_growth_rate(start: f64, end: f64, time: usize) -> f64 {
    let past = if start == 0.0 { 1.0 } else { start };
    let time = time.max(1) as f64;
    (end / past).powf(1.0 / time) - 1.0
}

/// Heuristic curve fit: ceiling at `end`, midpoint at `time / deviation`
pub fn calculate_parameters(
    start: f64,
    end: f64,
    time: usize,
    mid_point_deviation: f64,
) -> LogisticParams {
    LogisticParams {
        ceiling: end,
        growth_rate: calculate_growth_rate(start, end, time),
        mid_point: (time as f64 / mid_point_deviation).floor(),
    }
}

/// The active scaling method
///
/// The logistic variant carries its fitted parameters, so it cannot be used
/// before it has been configured from a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalingTool {
    Raw,
    Logarithmic,
    LogisticGrowth(LogisticGrowth),
}

impl ScalingTool {
    /// Build the method selected by `kind` for `dataset`
    pub fn for_dataset(kind: ScalingKind, dataset: &Dataset, mid_point_deviation: f64) -> Self {
        match kind {
            ScalingKind::Raw => ScalingTool::Raw,
            ScalingKind::Log => ScalingTool::Logarithmic,
            ScalingKind::LogisticGrowth => {
                ScalingTool::LogisticGrowth(LogisticGrowth::fit(dataset, mid_point_deviation))
            }
        }
    }

    pub fn kind(&self) -> ScalingKind {
        match self {
            ScalingTool::Raw => ScalingKind::Raw,
            ScalingTool::Logarithmic => ScalingKind::Log,
            ScalingTool::LogisticGrowth(_) => ScalingKind::LogisticGrowth,
        }
    }

    /// Scale a location magnitude
    pub fn scale(&self, value: u64) -> f64 {
        self.scale_as(MagnitudeKind::Location, value)
    }

    pub fn scale_link(&self, value: u64) -> f64 {
        self.scale_as(MagnitudeKind::Link, value)
    }

    /// Scale an absolute step-to-step change
    pub fn scale_difference(&self, value: u64) -> f64 {
        self.scale_as(MagnitudeKind::Difference, value)
    }

    pub fn scale_as(&self, kind: MagnitudeKind, value: u64) -> f64 {
        match self {
            ScalingTool::Raw => value as f64,
            ScalingTool::Logarithmic => {
                if value == 0 {
                    0.0
                } else {
                    (value as f64).ln()
                }
            }
            ScalingTool::LogisticGrowth(growth) => growth.params(kind).evaluate(value),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ScalingTool::Raw => "No scaling",
            ScalingTool::Logarithmic => "Logarithmic function",
            ScalingTool::LogisticGrowth(_) => "Logistic Growth function",
        }
    }
}
