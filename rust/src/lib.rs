//! Minimum chain decomposition of devices under strict performance dominance.
//!
//! Devices are split into the fewest chains such that every device in a chain
//! beats the next one in every performance coordinate (Dilworth's theorem via
//! maximum bipartite matching). Chains are then drained one device at a time,
//! most dominant first.
//!
//! Pipeline: [`network`] builds the bipartite flow network, [`matching`] runs
//! Edmonds–Karp on it, [`chains`] rebuilds the chains, [`antichain`] derives the
//! matching-size certificate, and [`cursor`] hands devices out. [`DeviceSelection`]
//! ties them together.
//!
//! [`tagging`] is an unrelated Viterbi tagger shipped alongside.

pub mod antichain;
pub mod chains;
mod config;
pub mod cursor;
pub mod dominance;
pub mod interner;
pub mod logging;
pub mod matching;
mod models;
pub mod network;
mod selection;
pub mod tagging;

#[cfg(feature = "python")]
mod python;

pub use chains::DecompositionError;
pub use config::SelectionConfig;
pub use cursor::{ChainIndexOutOfRange, ChainStore};
pub use dominance::{dominates, DominanceOracle, StrictDominance};
pub use matching::Matching;
pub use models::Decomposition;
pub use network::FlowNetwork;
pub use selection::{DeviceSelection, SelectionError};
pub use tagging::{tag, viterbi, TaggingError};
