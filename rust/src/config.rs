//! Configuration for device selection.

/// Knobs for [`crate::DeviceSelection`].
#[cfg_attr(feature = "python", pyo3::pyclass(get_all, set_all))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Verbosity level: 0=silent, 1=summary, 2=steps, 3=debug.
    pub verbosity: u8,
    /// Compute matching and chains at construction instead of on first use.
    pub eager: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            verbosity: crate::logging::VERBOSITY_SILENT,
            eager: false,
        }
    }
}

impl SelectionConfig {
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }
}
