//! Device selection: minimum chain cover under strict dominance, drained
//! one device at a time.

use std::collections::HashMap;

use thiserror::Error;

use crate::antichain::maximum_antichain;
use crate::chains::{decompose, DecompositionError};
use crate::config::SelectionConfig;
use crate::cursor::{ChainIndexOutOfRange, ChainStore};
use crate::dominance::{DominanceOracle, StrictDominance};
use crate::interner::{DeviceIdInterner, DeviceIndex};
use crate::matching::{solve, Matching};
use crate::models::Decomposition;
use crate::network::FlowNetwork;
use crate::{log_debug, log_steps, log_summary};

/// Errors that can occur while selecting devices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Performance vectors must have at least one coordinate")]
    InvalidDimension,
    #[error("Duplicate device id: {0}")]
    DuplicateDevice(String),
    #[error("No performance data for device: {0}")]
    MissingPerformance(String),
    #[error("Performance data for unknown device: {0}")]
    UnknownDevice(String),
    #[error("Device {device} has {found} performance value(s), expected {expected}")]
    DimensionMismatch {
        device: String,
        expected: usize,
        found: usize,
    },
    #[error("Chain index {index} out of range [0, {chain_count})")]
    IndexOutOfRange { index: i64, chain_count: usize },
    #[error("Cycle detected in dominance relation at device {device}")]
    CycleDetected { device: String },
    #[error(
        "Dominance relation is not transitive: {antichain} incomparable device(s) but {chains} chain(s)"
    )]
    NotTransitive { antichain: usize, chains: usize },
}

impl SelectionError {
    /// Malformed input detected at construction.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimension
                | Self::DuplicateDevice(_)
                | Self::MissingPerformance(_)
                | Self::UnknownDevice(_)
                | Self::DimensionMismatch { .. }
        )
    }
}

impl From<ChainIndexOutOfRange> for SelectionError {
    fn from(err: ChainIndexOutOfRange) -> Self {
        SelectionError::IndexOutOfRange {
            index: err.index as i64,
            chain_count: err.chain_count,
        }
    }
}

/// Everything derived from the network; built once, then only drained.
#[derive(Debug, Clone)]
struct Partition {
    matching: Matching,
    chains: Vec<Vec<DeviceIndex>>,
    antichain: Vec<DeviceIndex>,
    store: ChainStore,
}

impl Partition {
    fn compute(
        network: &FlowNetwork,
        interner: &DeviceIdInterner,
        verbosity: u8,
    ) -> Result<Self, SelectionError> {
        let matching = solve(network, verbosity);
        let chains = decompose(network.device_count(), &matching).map_err(|err| match err {
            DecompositionError::CycleDetected { device } => SelectionError::CycleDetected {
                device: interner.resolve(device).unwrap_or_default().to_string(),
            },
        })?;
        for (index, chain) in chains.iter().enumerate() {
            log_steps!(verbosity, "Chain {}: {} device(s)", index, chain.len());
        }
        // Only a transitive relation caps the antichain at the chain count.
        let antichain = maximum_antichain(network, &matching);
        if antichain.len() != chains.len() {
            return Err(SelectionError::NotTransitive {
                antichain: antichain.len(),
                chains: chains.len(),
            });
        }
        let store = ChainStore::new(&chains);
        Ok(Self {
            matching,
            chains,
            antichain,
            store,
        })
    }
}

/// Splits devices into the minimum number of dominance chains and hands them
/// out most-dominant first.
#[derive(Debug, Clone)]
pub struct DeviceSelection {
    interner: DeviceIdInterner,
    performance: Vec<Vec<f64>>,
    dimensions: usize,
    network: FlowNetwork,
    config: SelectionConfig,
    partition: Option<Partition>,
}

impl DeviceSelection {
    /// Validate input and build the dominance network with strict dominance.
    ///
    /// # Arguments
    /// * `ids` - Device ids; their order fixes chain numbering
    /// * `dimensions` - Number of performance values per device (k >= 1)
    /// * `performance` - Map from device id to its k performance values
    /// * `config` - Verbosity and eagerness
    pub fn new(
        ids: &[String],
        dimensions: usize,
        performance: &HashMap<String, Vec<f64>>,
        config: SelectionConfig,
    ) -> Result<Self, SelectionError> {
        Self::with_oracle(ids, dimensions, performance, config, &StrictDominance)
    }

    /// Same as [`DeviceSelection::new`] with a caller-supplied dominance relation.
    pub fn with_oracle<O: DominanceOracle + ?Sized>(
        ids: &[String],
        dimensions: usize,
        performance: &HashMap<String, Vec<f64>>,
        config: SelectionConfig,
        oracle: &O,
    ) -> Result<Self, SelectionError> {
        if dimensions == 0 {
            return Err(SelectionError::InvalidDimension);
        }

        let mut interner = DeviceIdInterner::with_capacity(ids.len());
        let mut vectors: Vec<Vec<f64>> = Vec::with_capacity(ids.len());
        for id in ids {
            if interner.insert_new(id).is_none() {
                return Err(SelectionError::DuplicateDevice(id.clone()));
            }
            let scores = performance
                .get(id)
                .ok_or_else(|| SelectionError::MissingPerformance(id.clone()))?;
            if scores.len() != dimensions {
                return Err(SelectionError::DimensionMismatch {
                    device: id.clone(),
                    expected: dimensions,
                    found: scores.len(),
                });
            }
            vectors.push(scores.clone());
        }

        // Report the smallest stray id so the error does not depend on hash order.
        if let Some(stray) = performance
            .keys()
            .filter(|id| interner.get(id).is_none())
            .min()
        {
            return Err(SelectionError::UnknownDevice(stray.clone()));
        }

        let network = FlowNetwork::build(&vectors, oracle);
        log_summary!(
            config.verbosity,
            "Built network: {} device(s), {} dominance edge(s)",
            network.device_count(),
            network.dominance_edge_count()
        );

        let mut selection = Self {
            interner,
            performance: vectors,
            dimensions,
            network,
            config,
            partition: None,
        };
        if selection.config.eager {
            selection.count_devices()?;
        }
        Ok(selection)
    }

    /// Compute the partition on first use and hand out a mutable reference.
    ///
    /// A failed computation leaves `slot` empty.
    fn materialize<'a>(
        slot: &'a mut Option<Partition>,
        network: &FlowNetwork,
        interner: &DeviceIdInterner,
        verbosity: u8,
    ) -> Result<&'a mut Partition, SelectionError> {
        let partition = match slot.take() {
            Some(partition) => partition,
            None => {
                let partition = Partition::compute(network, interner, verbosity)?;
                log_summary!(
                    verbosity,
                    "Decomposed {} device(s) into {} chain(s)",
                    network.device_count(),
                    partition.chains.len()
                );
                partition
            }
        };
        Ok(slot.insert(partition))
    }

    fn partition(&mut self) -> Result<&mut Partition, SelectionError> {
        Self::materialize(
            &mut self.partition,
            &self.network,
            &self.interner,
            self.config.verbosity,
        )
    }

    /// Minimum number of chains covering all devices.
    ///
    /// Idempotent: later calls return the same count and leave partially
    /// drained chains as they are.
    pub fn count_devices(&mut self) -> Result<usize, SelectionError> {
        Ok(self.partition()?.store.len())
    }

    /// Pop the most dominant device not yet returned from chain `index`.
    ///
    /// Returns `Ok(None)` once the chain is exhausted.
    pub fn next_device(&mut self, index: usize) -> Result<Option<&str>, SelectionError> {
        let verbosity = self.config.verbosity;
        let popped = Self::materialize(
            &mut self.partition,
            &self.network,
            &self.interner,
            verbosity,
        )?
        .store
        .pop_head(index)?;

        let id = popped.and_then(|device| self.interner.resolve(device));
        log_debug!(verbosity, "Chain {}: popped {:?}", index, id);
        Ok(id)
    }

    /// Device the next [`DeviceSelection::next_device`] call on chain `index`
    /// would return, without popping it.
    pub fn peek_device(&mut self, index: usize) -> Result<Option<&str>, SelectionError> {
        let head = Self::materialize(
            &mut self.partition,
            &self.network,
            &self.interner,
            self.config.verbosity,
        )?
        .store
        .peek_head(index)?;
        Ok(head.and_then(|device| self.interner.resolve(device)))
    }

    /// Devices not yet popped from chain `index`.
    pub fn remaining(&mut self, index: usize) -> Result<usize, SelectionError> {
        Ok(self.partition()?.store.remaining(index)?)
    }

    /// Size of the maximum matching between dominating and dominated devices.
    pub fn matching_size(&mut self) -> Result<usize, SelectionError> {
        Ok(self.partition()?.matching.len())
    }

    /// Full chains and the witness antichain, independent of draining.
    pub fn decomposition(&mut self) -> Result<Decomposition, SelectionError> {
        let partition = Self::materialize(
            &mut self.partition,
            &self.network,
            &self.interner,
            self.config.verbosity,
        )?;
        let chains: Vec<Vec<String>> = partition
            .chains
            .iter()
            .map(|chain| {
                self.interner
                    .resolve_all(chain)
                    .map(str::to_string)
                    .collect::<Vec<String>>()
            })
            .collect();
        let antichain: Vec<String> = self
            .interner
            .resolve_all(&partition.antichain)
            .map(str::to_string)
            .collect();
        Ok(Decomposition {
            chains,
            antichain,
            matching_size: partition.matching.len(),
        })
    }

    pub fn device_count(&self) -> usize {
        self.interner.len()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn dominance_edge_count(&self) -> usize {
        self.network.dominance_edge_count()
    }

    /// Performance values of a device, if known.
    pub fn performance(&self, id: &str) -> Option<&[f64]> {
        self.interner
            .get(id)
            .map(|index| self.performance[index as usize].as_slice())
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }
}
