//! Holt-Winters options — configuration for fitting and validation.
//!
//! Purpose
//! -------
//! Collect the knobs of the two workflows in one place: fitting weights
//! ([`FitOptions`]) and scoring a fitted model on new data
//! ([`ValidationOptions`]). Call sites pass these explicit, validated values
//! instead of ad-hoc flags.
//!
//! Key behaviors
//! -------------
//! - [`FitOptions`] bundles the seasonal period, the forecast-error
//!   configuration, the weight search settings, an optional series subset
//!   ([`SeriesOrder`]) and the ranking stored for validation
//!   ([`TrendRanking`]).
//! - [`ValidationOptions`] bundles the activity threshold, the number of
//!   trending series to score, the smoothing applied to new counts
//!   ([`Resmooth`]) and the clamp applied to predictions.
//!
//! Invariants & assumptions
//! ------------------------
//! - Components built through their own constructors (`SeasonalPeriod`,
//!   `ObjectiveConfig`, `SearchOptions`) are taken as valid; the `new`
//!   functions here only check the fields they own.
//! - Rankings are stable: ties keep ascending row order.
//!
//! Conventions
//! -----------
//! - Defaults reproduce the batch behavior the model was built around:
//!   weekly period at a four-hour interval, `m = 7`, holdout 6,
//!   differential evolution, `min_total = 3`, `top_n = 25`.
use crate::{
    forecasting::{
        core::{forecasts::Clamp, objective::ObjectiveConfig, period::SeasonalPeriod},
        errors::{HWError, HWResult},
    },
    optimization::global_search::SearchOptions,
};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Activity threshold below which a series is ignored by validation.
pub const DEFAULT_MIN_TOTAL: f64 = 3.0;

/// Number of trending series scored by validation.
pub const DEFAULT_TOP_N: usize = 25;

/// Which end of the total-count ranking a fit subset is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeriesOrder {
    /// Lowest totals first.
    #[default]
    Ascending,
    /// Highest totals first.
    Descending,
}

impl SeriesOrder {
    /// Row indices ordered by `totals`, ties broken by row index.
    pub fn rank(self, totals: ArrayView1<f64>) -> Vec<usize> {
        let mut order: Vec<usize> = (0..totals.len()).collect();
        order.sort_by(|&a, &b| {
            let by_total = totals[a].total_cmp(&totals[b]);
            let by_total = match self {
                SeriesOrder::Ascending => by_total,
                SeriesOrder::Descending => by_total.reverse(),
            };
            by_total.then(a.cmp(&b))
        });
        order
    }
}

/// How the fitted model ranks its series for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrendRanking {
    /// Descending final trend `b[:, T−1]`.
    #[default]
    BySlope,
    /// Descending total count.
    ByTotal,
}

impl TrendRanking {
    /// Rank series given their final trends and totals.
    pub fn rank(self, final_trend: ArrayView1<f64>, totals: ArrayView1<f64>) -> Vec<usize> {
        let key: Array1<f64> = match self {
            TrendRanking::BySlope => final_trend.to_owned(),
            TrendRanking::ByTotal => totals.to_owned(),
        };
        let mut order: Vec<usize> = (0..key.len()).collect();
        order.sort_by(|&a, &b| match key[b].total_cmp(&key[a]) {
            Ordering::Equal => a.cmp(&b),
            other => other,
        });
        order
    }
}

/// FitOptions — configuration for [`HoltWintersModel::fit`](crate::forecasting::models::HoltWintersModel::fit).
///
/// Fields
/// ------
/// - `period`: seasonal period `L`.
/// - `objective`: forecast-error configuration minimized by the search.
/// - `search`: bounded search settings (strategy, budgets, seed).
/// - `series_limit`: fit only this many series (`None` = all of them).
/// - `series_order`: which end of the total ranking the subset comes from.
/// - `trend_ranking`: ranking stored in the fitted provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub period: SeasonalPeriod,
    pub objective: ObjectiveConfig,
    pub search: SearchOptions,
    pub series_limit: Option<usize>,
    pub series_order: SeriesOrder,
    pub trend_ranking: TrendRanking,
}

impl FitOptions {
    /// Fit every series with the given period, objective and search.
    pub fn new(period: SeasonalPeriod, objective: ObjectiveConfig, search: SearchOptions) -> Self {
        FitOptions {
            period,
            objective,
            search,
            series_limit: None,
            series_order: SeriesOrder::default(),
            trend_ranking: TrendRanking::default(),
        }
    }

    /// Restrict fitting to `limit` series taken in `order` of total count.
    ///
    /// Errors
    /// ------
    /// - `HWError::InvalidFitOptions` if `limit == 0`.
    pub fn with_series_limit(mut self, limit: usize, order: SeriesOrder) -> HWResult<Self> {
        if limit == 0 {
            return Err(HWError::InvalidFitOptions { reason: "series limit must be positive" });
        }
        self.series_limit = Some(limit);
        self.series_order = order;
        Ok(self)
    }

    pub fn with_trend_ranking(mut self, ranking: TrendRanking) -> Self {
        self.trend_ranking = ranking;
        self
    }

    /// Rows of a matrix with the given `totals` that take part in the fit,
    /// in ascending row order.
    pub fn select_series(&self, totals: ArrayView1<f64>) -> Vec<usize> {
        let mut rows = match self.series_limit {
            None => (0..totals.len()).collect(),
            Some(limit) => {
                let mut ranked = self.series_order.rank(totals);
                ranked.truncate(limit);
                ranked
            }
        };
        rows.sort_unstable();
        rows
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions::new(
            SeasonalPeriod::WEEKLY_AT_FOUR_HOURS,
            ObjectiveConfig::default(),
            SearchOptions::default(),
        )
    }
}

/// Smoothing applied to new counts before they are compared with forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Resmooth {
    /// Level recurrence with the fitted `alpha`.
    #[default]
    FittedLevel,
    /// Level recurrence with an explicit smoothing factor.
    Level(f64),
    /// Raw counts.
    None,
}

impl Resmooth {
    /// Smoothing factor to use, or `None` for raw counts.
    pub fn alpha(self, fitted_alpha: f64) -> Option<f64> {
        match self {
            Resmooth::FittedLevel => Some(fitted_alpha),
            Resmooth::Level(alpha) => Some(alpha),
            Resmooth::None => None,
        }
    }
}

/// ValidationOptions — configuration for the out-of-sample check.
///
/// Fields
/// ------
/// - `min_total`: series whose fitted total is below this are skipped.
/// - `top_n`: at most this many trending series are scored.
/// - `resmooth`: smoothing applied to the new counts.
/// - `clamp`: clamp applied to model predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationOptions {
    pub min_total: f64,
    pub top_n: usize,
    pub resmooth: Resmooth,
    pub clamp: Clamp,
}

impl ValidationOptions {
    /// Errors
    /// ------
    /// - `HWError::InvalidValidationOptions` for a non-finite `min_total`,
    ///   `top_n == 0`, or a `Resmooth::Level` factor outside `[0, 1]`.
    pub fn new(min_total: f64, top_n: usize, resmooth: Resmooth, clamp: Clamp) -> HWResult<Self> {
        if !min_total.is_finite() {
            return Err(HWError::InvalidValidationOptions { reason: "min_total must be finite" });
        }
        if top_n == 0 {
            return Err(HWError::InvalidValidationOptions { reason: "top_n must be positive" });
        }
        if let Resmooth::Level(alpha) = resmooth {
            if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
                return Err(HWError::InvalidValidationOptions {
                    reason: "resmoothing factor must lie in [0, 1]",
                });
            }
        }
        Ok(ValidationOptions { min_total, top_n, resmooth, clamp })
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            min_total: DEFAULT_MIN_TOTAL,
            top_n: DEFAULT_TOP_N,
            resmooth: Resmooth::FittedLevel,
            clamp: Clamp::NonNegative,
        }
    }
}
