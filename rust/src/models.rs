//! Result types exposed to callers.

/// Snapshot of a completed decomposition, expressed in device ids.
///
/// Chains are listed in chain-index order and are not affected by later
/// `next_device` calls.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all, frozen))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decomposition {
    /// Every chain, most dominant device first.
    pub chains: Vec<Vec<String>>,
    /// Pairwise incomparable devices, one per chain.
    pub antichain: Vec<String>,
    /// Size of the maximum matching (`devices - chains`).
    pub matching_size: usize,
}

impl Decomposition {
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn device_count(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }
}
