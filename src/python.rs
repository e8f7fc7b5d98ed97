//! Python bindings for the hive dumper using PyO3.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::sync::Arc;

use crate::{dump_to_string, DumpOptions, RegistryError, TimeBasis, TimestampMode};
use crate::Hive as RustHive;

/// Convert Rust RegistryError to Python exception
fn registry_error_to_py(err: RegistryError) -> PyErr {
    match err {
        RegistryError::Io(e) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn timestamp_mode(timestamps: Option<&str>) -> PyResult<TimestampMode> {
    match timestamps {
        None => Ok(TimestampMode::Off),
        Some("seconds") => Ok(TimestampMode::Seconds),
        Some("full") => Ok(TimestampMode::Full),
        Some(other) => Err(PyValueError::new_err(format!(
            "timestamps must be None, \"seconds\" or \"full\", not {:?}",
            other
        ))),
    }
}

fn build_options(
    hex_type: bool,
    only_values: bool,
    only_keys: bool,
    all_string: bool,
    timestamps: Option<&str>,
    utc: bool,
) -> PyResult<DumpOptions> {
    let basis = if utc { TimeBasis::Utc } else { TimeBasis::Local };
    Ok(DumpOptions::default()
        .with_hex_type(hex_type)
        .with_only_values(only_values)
        .with_all_string(all_string)
        .with_timestamps(timestamp_mode(timestamps)?)
        .with_time_basis(basis)
        .with_only_keys(only_keys))
}

fn dump_lines(hive: &RustHive, options: &DumpOptions) -> PyResult<Vec<String>> {
    let text = dump_to_string(hive, options).map_err(registry_error_to_py)?;
    Ok(text.lines().map(str::to_owned).collect())
}

/// Python wrapper for an open hive
#[pyclass(name = "Hive")]
pub struct PyHive {
    inner: Arc<RustHive>,
}

#[pymethods]
impl PyHive {
    /// Open a registry hive file
    #[staticmethod]
    fn open(path: &str, py: Python) -> PyResult<PyHive> {
        // Release GIL during file I/O and validation
        let hive = py
            .allow_threads(|| RustHive::open(path))
            .map_err(registry_error_to_py)?;

        Ok(PyHive {
            inner: Arc::new(hive),
        })
    }

    /// Hive format version as (major, minor)
    #[getter]
    fn version(&self) -> (u32, u32) {
        let base_block = self.inner.base_block();
        (base_block.major_version, base_block.minor_version)
    }

    /// File name embedded in the base block
    #[getter]
    fn file_name(&self) -> String {
        self.inner.base_block().file_name.clone()
    }

    /// Root key cell offset
    #[getter]
    fn root_offset(&self) -> u32 {
        self.inner.root_offset()
    }

    /// Dump the hive as a list of lines
    #[pyo3(signature = (hex_type=false, only_values=false, only_keys=false, all_string=false, timestamps=None, utc=false))]
    #[allow(clippy::too_many_arguments)]
    fn dump(
        &self,
        py: Python,
        hex_type: bool,
        only_values: bool,
        only_keys: bool,
        all_string: bool,
        timestamps: Option<&str>,
        utc: bool,
    ) -> PyResult<Vec<String>> {
        let options = build_options(hex_type, only_values, only_keys, all_string, timestamps, utc)?;
        let hive = Arc::clone(&self.inner);
        py.allow_threads(move || dump_lines(&hive, &options))
    }

    fn __repr__(&self) -> String {
        let base_block = self.inner.base_block();
        format!(
            "Hive(file_name={:?}, version={}.{}, root_offset={:#x})",
            base_block.file_name,
            base_block.major_version,
            base_block.minor_version,
            self.inner.root_offset()
        )
    }
}

/// Open the hive at `path` and dump it as a list of lines
#[pyfunction]
#[pyo3(signature = (path, hex_type=false, only_values=false, only_keys=false, all_string=false, timestamps=None, utc=false))]
#[allow(clippy::too_many_arguments)]
fn dump(
    py: Python,
    path: &str,
    hex_type: bool,
    only_values: bool,
    only_keys: bool,
    all_string: bool,
    timestamps: Option<&str>,
    utc: bool,
) -> PyResult<Vec<String>> {
    let options = build_options(hex_type, only_values, only_keys, all_string, timestamps, utc)?;
    py.allow_threads(|| {
        let hive = RustHive::open(path).map_err(registry_error_to_py)?;
        dump_lines(&hive, &options)
    })
}

/// Python module definition
#[pymodule]
fn regdump(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyHive>()?;
    m.add_function(wrap_pyfunction!(dump, m)?)?;

    // Add version constant
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
