//! Python bindings.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::SelectionConfig;
use crate::models::Decomposition;
use crate::selection::{DeviceSelection, SelectionError};
use crate::tagging;

fn to_py_err(err: SelectionError) -> PyErr {
    match err {
        SelectionError::IndexOutOfRange { .. } => PyIndexError::new_err(err.to_string()),
        SelectionError::CycleDetected { .. } | SelectionError::NotTransitive { .. } => {
            PyRuntimeError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

#[pymethods]
impl SelectionConfig {
    #[new]
    #[pyo3(signature = (verbosity=0, eager=false))]
    fn py_new(verbosity: u8, eager: bool) -> Self {
        Self { verbosity, eager }
    }

    fn __repr__(&self) -> String {
        format!(
            "SelectionConfig(verbosity={}, eager={})",
            self.verbosity, self.eager
        )
    }
}

#[pymethods]
impl Decomposition {
    fn __repr__(&self) -> String {
        format!(
            "Decomposition(chains={}, antichain={}, matching_size={})",
            self.chains.len(),
            self.antichain.len(),
            self.matching_size
        )
    }
}

/// Device selection over strict dominance (PyO3 wrapper).
#[pyclass(name = "DeviceSelection")]
pub struct PyDeviceSelection {
    inner: DeviceSelection,
}

#[pymethods]
impl PyDeviceSelection {
    /// Build the dominance network.
    ///
    /// # Arguments
    /// * `ids` - Device ids; their order fixes chain numbering
    /// * `k` - Number of performance values per device
    /// * `performance` - Dict mapping device id to its k performance values
    /// * `config` - Optional SelectionConfig
    ///
    /// # Raises
    /// * ValueError on malformed input
    #[new]
    #[pyo3(signature = (ids, k, performance, config=None))]
    fn new(
        ids: Vec<String>,
        k: usize,
        performance: HashMap<String, Vec<f64>>,
        config: Option<SelectionConfig>,
    ) -> PyResult<Self> {
        let inner = DeviceSelection::new(&ids, k, &performance, config.unwrap_or_default())
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Minimum number of chains; computed on first call.
    fn count_devices(&mut self) -> PyResult<usize> {
        self.inner.count_devices().map_err(to_py_err)
    }

    /// Most dominant device not yet returned from chain `i`, or None.
    ///
    /// # Raises
    /// * IndexError if `i` is not in [0, count_devices())
    fn next_device(&mut self, i: i64) -> PyResult<Option<String>> {
        let index = self.chain_index(i)?;
        self.inner
            .next_device(index)
            .map(|id| id.map(str::to_string))
            .map_err(to_py_err)
    }

    /// Device `next_device(i)` would return, without advancing chain `i`.
    fn peek_device(&mut self, i: i64) -> PyResult<Option<String>> {
        let index = self.chain_index(i)?;
        self.inner
            .peek_device(index)
            .map(|id| id.map(str::to_string))
            .map_err(to_py_err)
    }

    fn remaining(&mut self, i: i64) -> PyResult<usize> {
        let index = self.chain_index(i)?;
        self.inner.remaining(index).map_err(to_py_err)
    }

    fn decomposition(&mut self) -> PyResult<Decomposition> {
        self.inner.decomposition().map_err(to_py_err)
    }

    fn matching_size(&mut self) -> PyResult<usize> {
        self.inner.matching_size().map_err(to_py_err)
    }

    fn __len__(&self) -> usize {
        self.inner.device_count()
    }

    fn __repr__(&self) -> String {
        format!(
            "DeviceSelection(devices={}, k={}, dominance_edges={})",
            self.inner.device_count(),
            self.inner.dimensions(),
            self.inner.dominance_edge_count()
        )
    }
}

impl PyDeviceSelection {
    /// Negative indices are out of range like any other.
    fn chain_index(&mut self, i: i64) -> PyResult<usize> {
        match usize::try_from(i) {
            Ok(index) => Ok(index),
            Err(_) => {
                let chain_count = self.inner.count_devices().map_err(to_py_err)?;
                Err(to_py_err(SelectionError::IndexOutOfRange {
                    index: i,
                    chain_count,
                }))
            }
        }
    }
}

/// Assign each word its most likely role.
///
/// # Arguments
/// * `roles` - Candidate roles
/// * `words` - Sentence, one string per word
/// * `transitions` - transitions[from][to], with "Start" and "End" roles
/// * `emissions` - emissions[word][role]
///
/// # Raises
/// * ValueError if a probability is missing or no roles are given
#[pyfunction]
fn pos_tagging(
    roles: Vec<String>,
    words: Vec<String>,
    transitions: tagging::TransitionTable,
    emissions: tagging::EmissionTable,
) -> PyResult<HashMap<String, String>> {
    tagging::tag(&roles, &words, &transitions, &emissions)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// The device_selection Python module.
#[pymodule]
fn device_selection(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDeviceSelection>()?;
    m.add_class::<SelectionConfig>()?;
    m.add_class::<Decomposition>()?;

    m.add_function(wrap_pyfunction!(pos_tagging, m)?)?;

    Ok(())
}
