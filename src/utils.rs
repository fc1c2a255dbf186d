#[cfg(feature = "python-bindings")]
use chrono::{DateTime, Duration, Utc};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    forecasting::{
        core::{
            data::ObservationMatrix,
            objective::{Aggregation, ObjectiveConfig, TargetAlignment},
            options::FitOptions,
            period::SeasonalPeriod,
        },
        errors::HWError,
    },
    optimization::global_search::{SearchOptions, SearchStrategy},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Array2 → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray2,
};

/// Accept a 2-D `numpy.ndarray`, a `pandas.DataFrame` (via `to_numpy`), or a
/// nested sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_matrix<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray2<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro);
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64",
        )
    })?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(PyValueError::new_err("rows of the count matrix must have equal length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let n_rows = if n_cols == 0 { 0 } else { flat.len() / n_cols };
    let matrix = ndarray::Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(matrix.into_pyarray_bound(py).readonly())
}

/// Build a validated [`ObservationMatrix`] on a regular grid starting at
/// `start_secs` (Unix seconds) with spacing `interval_secs`.
#[cfg(feature = "python-bindings")]
pub fn extract_observations<'py>(
    py: Python<'py>, values: &Bound<'py, PyAny>, start_secs: i64, interval_secs: i64,
) -> PyResult<ObservationMatrix> {
    let matrix = extract_f64_matrix(py, values)?.as_array().to_owned();
    let start: DateTime<Utc> = DateTime::from_timestamp(start_secs, 0)
        .ok_or_else(|| PyValueError::new_err("start_secs is out of range"))?;
    let interval = Duration::try_seconds(interval_secs)
        .ok_or(HWError::InvalidInterval { reason: "interval is out of range" })?;
    Ok(ObservationMatrix::with_regular_times(matrix, start, interval)?)
}

/// Assemble [`FitOptions`] from Python keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn build_fit_options(
    period: usize, horizon: Option<usize>, holdout: Option<usize>, strategy: Option<&str>,
    max_iter: Option<usize>, time_budget_secs: Option<f64>, seed: Option<u64>, verbose: bool,
) -> PyResult<FitOptions> {
    let period = SeasonalPeriod::new(period)?;
    let defaults = ObjectiveConfig::default();
    let objective = ObjectiveConfig::new(
        horizon.unwrap_or(defaults.horizon),
        holdout.unwrap_or(defaults.holdout),
        TargetAlignment::default(),
        Aggregation::default(),
    )?;
    let search = extract_search_options(strategy, max_iter, time_budget_secs, seed, verbose)?;
    Ok(FitOptions::new(period, objective, search))
}

#[cfg(feature = "python-bindings")]
fn extract_search_options(
    strategy: Option<&str>, max_iter: Option<usize>, time_budget_secs: Option<f64>,
    seed: Option<u64>, verbose: bool,
) -> PyResult<SearchOptions> {
    let defaults = SearchOptions::default();
    let strategy = match strategy {
        Some(name) => name.parse::<SearchStrategy>().map_err(HWError::from)?,
        None => defaults.strategy,
    };
    let time_budget = match time_budget_secs {
        None => None,
        Some(secs) => Some(std::time::Duration::try_from_secs_f64(secs).map_err(|_| {
            PyValueError::new_err("time_budget_secs must be finite and non-negative")
        })?),
    };
    let search = SearchOptions::new(
        strategy,
        max_iter.unwrap_or(defaults.max_iter),
        time_budget,
        seed,
        verbose,
    )
    .map_err(HWError::from)?;
    Ok(search)
}
