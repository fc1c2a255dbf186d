//! topic_forecast — seasonal Holt-Winters forecasting for many parallel count
//! series, with bounded global hyperparameter search and Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the forecasting stack to Python via the `_topic_forecast`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing class and submodule used by the
//! `topic_forecast` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`forecasting` and `optimization`) as
//!   the public crate surface.
//! - Define the `HoltWinters` `#[pyclass]` and the `#[pymodule]` initializer
//!   for the `_topic_forecast` Python extension.
//! - Register the `holt_winters` submodule under `topic_forecast` so that
//!   dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - Python inputs are converted into validated Rust types
//!   (`ObservationMatrix`, `FitOptions`) before any computation runs.
//!
//! Conventions
//! -----------
//! - Count matrices are `series × time steps`, oldest column first.
//! - Errors from core Rust code are propagated as `HWError` internally and
//!   converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`forecasting`] and
//!   [`optimization`] and can ignore the PyO3 items.
//! - The Python packaging layer imports `_topic_forecast` and wraps its class
//!   in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   Rust integration test in `tests/`.

pub mod forecasting;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    forecasting::{
        core::{forecasts::Clamp, options::FitOptions},
        models::{fitted::FittedModel, holt_winters::HoltWintersModel},
    },
    utils::{build_fit_options, extract_observations},
};

/// HoltWinters — Python-facing wrapper around fitting and forecasting.
///
/// Purpose
/// -------
/// Let Python code calibrate Holt-Winters weights on a count matrix, forecast
/// from the retained state, and persist the fitted model as JSON.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `HoltWinters(period, horizon=None, holdout=None, strategy=None,
/// max_iter=None, time_budget_secs=None, seed=None, verbose=False)`:
/// - `period`: seasonal period `L` in time steps (42 for weekly cycles at a
///   four-hour interval).
/// - `horizon`, `holdout`: forecast-error objective (defaults 7 and 6).
/// - `strategy`: `"differential_evolution"` (default) or `"nelder_mead"`.
/// - `max_iter`, `time_budget_secs`, `seed`, `verbose`: search budget,
///   reproducibility and progress output.
///
/// Fields
/// ------
/// - `options`: [`FitOptions`] used by `fit`.
/// - `fitted`: the last [`FittedModel`], if any.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "topic_forecast.holt_winters")]
pub struct HoltWinters {
    options: FitOptions,
    fitted: Option<FittedModel>,
}

#[cfg(feature = "python-bindings")]
impl HoltWinters {
    fn fitted(&self) -> PyResult<&FittedModel> {
        self.fitted
            .as_ref()
            .ok_or_else(|| PyValueError::new_err("model has not been fitted yet"))
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl HoltWinters {
    #[new]
    #[pyo3(
        signature = (
            period,
            horizon = None,
            holdout = None,
            strategy = None,
            max_iter = None,
            time_budget_secs = None,
            seed = None,
            verbose = false,
        ),
        text_signature = "(period, /, horizon=None, holdout=None, strategy=None, \
                          max_iter=None, time_budget_secs=None, seed=None, verbose=False)"
    )]
    pub fn new(
        period: usize, horizon: Option<usize>, holdout: Option<usize>, strategy: Option<&str>,
        max_iter: Option<usize>, time_budget_secs: Option<f64>, seed: Option<u64>, verbose: bool,
    ) -> PyResult<Self> {
        let options = build_fit_options(
            period,
            horizon,
            holdout,
            strategy,
            max_iter,
            time_budget_secs,
            seed,
            verbose,
        )?;
        Ok(HoltWinters { options, fitted: None })
    }

    /// Fit the weights on a `series × time steps` count matrix sampled every
    /// `interval_secs` seconds from `start_secs` (Unix time).
    #[pyo3(
        signature = (values, interval_secs = 14_400, start_secs = 0),
        text_signature = "(self, values, /, interval_secs=14400, start_secs=0)"
    )]
    pub fn fit<'py>(
        &mut self, py: Python<'py>, values: &Bound<'py, PyAny>, interval_secs: i64,
        start_secs: i64,
    ) -> PyResult<()> {
        let data = extract_observations(py, values, start_secs, interval_secs)?;
        let model = HoltWintersModel::new(self.options.clone());
        let fitted = py.allow_threads(|| model.fit(&data))?;
        self.fitted = Some(fitted);
        Ok(())
    }

    /// Forecast every series `periods_ahead` steps after column `origin`.
    pub fn predict<'py>(
        &self, py: Python<'py>, origin: usize, periods_ahead: usize,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let values = self.fitted()?.predict(origin, periods_ahead)?;
        Ok(values.into_pyarray_bound(py))
    }

    /// Forecast path `h = 0..=max_horizon` from the last fitted column.
    #[pyo3(signature = (max_horizon, clamp = true))]
    pub fn forecast<'py>(
        &self, py: Python<'py>, max_horizon: usize, clamp: bool,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let clamp = if clamp { Clamp::NonNegative } else { Clamp::None };
        let path = self.fitted()?.forecast(max_horizon, clamp)?;
        Ok(path.values.into_pyarray_bound(py))
    }

    /// Fitted `(alpha, beta, gamma)`.
    #[getter]
    pub fn weights(&self) -> PyResult<(f64, f64, f64)> {
        let w = self.fitted()?.weights;
        Ok((w.alpha, w.beta, w.gamma))
    }

    #[getter]
    pub fn objective_value(&self) -> PyResult<f64> {
        Ok(self.fitted()?.objective_value)
    }

    #[getter]
    pub fn converged(&self) -> PyResult<bool> {
        Ok(self.fitted()?.converged)
    }

    pub fn to_json(&self) -> PyResult<String> {
        Ok(self.fitted()?.to_json()?)
    }

    /// Restore a fitted model saved with `to_json`.
    #[staticmethod]
    pub fn from_json(text: &str) -> PyResult<Self> {
        let fitted = FittedModel::from_json(text)?;
        let options = FitOptions { period: fitted.state.period, ..FitOptions::default() };
        Ok(HoltWinters { options, fitted: Some(fitted) })
    }
}

/// _topic_forecast — PyO3 module initializer for the Python extension.
///
/// Creates the `holt_winters` submodule, attaches it to `_topic_forecast`
/// and registers it in `sys.modules` so it is importable via dotted paths.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _topic_forecast<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let holt_winters_mod = PyModule::new_bound(_py, "holt_winters")?;
    holt_winters(_py, m, &holt_winters_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import_bound("sys")?
        .getattr("modules")?
        .set_item("topic_forecast.holt_winters", holt_winters_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn holt_winters<'py>(
    _py: Python, topic_forecast: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<HoltWinters>()?;
    topic_forecast.add_submodule(m)?;
    Ok(())
}
