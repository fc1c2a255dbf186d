//! Seasonal period (`L`): number of samples per repeating cycle.
//!
//! The period is either given directly or derived from the sampling interval
//! and a calendar cycle (one week of 4-hour buckets gives `L = 42`). The
//! smoother needs at least two whole cycles of history: one to initialize the
//! seasonal profile and one more for the initial trend slope.
use crate::forecasting::errors::{HWError, HWResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Number of samples per seasonal cycle, always `> 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SeasonalPeriod(usize);

impl SeasonalPeriod {
    /// One week sampled every 4 hours: `7 · 24 / 4`.
    pub const WEEKLY_AT_FOUR_HOURS: SeasonalPeriod = SeasonalPeriod(42);

    /// Errors
    /// ------
    /// - `HWError::InvalidSeasonalPeriod` if `period == 0`.
    pub fn new(period: usize) -> HWResult<Self> {
        if period == 0 {
            return Err(HWError::InvalidSeasonalPeriod { period, reason: "period must be positive" });
        }
        Ok(SeasonalPeriod(period))
    }

    /// Derive `L = cycle / interval`.
    ///
    /// Errors
    /// ------
    /// - `HWError::InvalidInterval` if either duration is not positive.
    /// - `HWError::InvalidSeasonalPeriod` if `cycle` is shorter than
    ///   `interval` or not a whole multiple of it.
    pub fn from_interval(interval: Duration, cycle: Duration) -> HWResult<Self> {
        if interval <= Duration::zero() {
            return Err(HWError::InvalidInterval { reason: "interval must be positive" });
        }
        if cycle <= Duration::zero() {
            return Err(HWError::InvalidInterval { reason: "calendar cycle must be positive" });
        }
        let step = interval.num_milliseconds();
        let span = cycle.num_milliseconds();
        if step == 0 {
            return Err(HWError::InvalidInterval { reason: "interval below millisecond resolution" });
        }
        let period = usize::try_from(span / step).unwrap_or(0);
        if period == 0 {
            return Err(HWError::InvalidSeasonalPeriod {
                period,
                reason: "calendar cycle is shorter than the sampling interval",
            });
        }
        if span % step != 0 {
            return Err(HWError::InvalidSeasonalPeriod {
                period,
                reason: "calendar cycle is not a whole multiple of the sampling interval",
            });
        }
        Ok(SeasonalPeriod(period))
    }

    /// Weekly cycle at the given sampling interval.
    pub fn weekly(interval: Duration) -> HWResult<Self> {
        Self::from_interval(interval, Duration::weeks(1))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Position of time step `i` inside its cycle.
    #[inline]
    pub fn offset(self, i: usize) -> usize {
        i % self.0
    }

    /// Check that `time_steps` covers at least two whole cycles and return
    /// the number of whole cycles.
    ///
    /// Errors
    /// ------
    /// - `HWError::TooFewObservations { needed: 2L, got }`.
    pub fn check_history(self, time_steps: usize) -> HWResult<usize> {
        let needed = 2 * self.0;
        if time_steps < needed {
            return Err(HWError::TooFewObservations { needed, got: time_steps });
        }
        Ok(time_steps / self.0)
    }
}

impl TryFrom<usize> for SeasonalPeriod {
    type Error = HWError;

    fn try_from(period: usize) -> HWResult<Self> {
        SeasonalPeriod::new(period)
    }
}

impl From<SeasonalPeriod> for usize {
    fn from(period: SeasonalPeriod) -> usize {
        period.0
    }
}

impl std::fmt::Display for SeasonalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
