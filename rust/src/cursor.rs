//! Per-chain cursors for draining devices in dominance order.

use std::collections::VecDeque;

use crate::interner::DeviceIndex;

/// A chain index outside `[0, chain_count)` was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainIndexOutOfRange {
    pub index: usize,
    pub chain_count: usize,
}

impl std::fmt::Display for ChainIndexOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chain index {} out of range [0, {})",
            self.index, self.chain_count
        )
    }
}

impl std::error::Error for ChainIndexOutOfRange {}

/// Remaining devices of every chain, head first.
///
/// Chains arrive already ordered, so each one is a plain deque and popping
/// the most dominant remaining device is O(1). The store is never refilled.
#[derive(Debug, Clone, Default)]
pub struct ChainStore {
    chains: Vec<VecDeque<DeviceIndex>>,
}

impl ChainStore {
    pub fn new(chains: &[Vec<DeviceIndex>]) -> Self {
        Self {
            chains: chains.iter().map(|c| c.iter().copied().collect()).collect(),
        }
    }

    fn chain_mut(&mut self, index: usize) -> Result<&mut VecDeque<DeviceIndex>, ChainIndexOutOfRange> {
        let chain_count = self.chains.len();
        self.chains
            .get_mut(index)
            .ok_or(ChainIndexOutOfRange { index, chain_count })
    }

    /// Remove and return the head of chain `index`, or `None` once drained.
    pub fn pop_head(&mut self, index: usize) -> Result<Option<DeviceIndex>, ChainIndexOutOfRange> {
        Ok(self.chain_mut(index)?.pop_front())
    }

    /// Head of chain `index` without removing it.
    pub fn peek_head(&self, index: usize) -> Result<Option<DeviceIndex>, ChainIndexOutOfRange> {
        self.chains
            .get(index)
            .map(|chain| chain.front().copied())
            .ok_or(ChainIndexOutOfRange {
                index,
                chain_count: self.chains.len(),
            })
    }

    /// Number of devices not yet popped from chain `index`.
    pub fn remaining(&self, index: usize) -> Result<usize, ChainIndexOutOfRange> {
        self.chains
            .get(index)
            .map(VecDeque::len)
            .ok_or(ChainIndexOutOfRange {
                index,
                chain_count: self.chains.len(),
            })
    }

    /// Number of chains (drained ones included).
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_order_then_none() {
        let mut store = ChainStore::new(&[vec![0, 1, 2], vec![3]]);
        assert_eq!(store.len(), 2);

        assert_eq!(store.peek_head(0), Ok(Some(0)));
        assert_eq!(store.pop_head(0), Ok(Some(0)));
        assert_eq!(store.pop_head(0), Ok(Some(1)));
        assert_eq!(store.remaining(0), Ok(1));
        assert_eq!(store.pop_head(0), Ok(Some(2)));
        assert_eq!(store.pop_head(0), Ok(None));
        assert_eq!(store.pop_head(0), Ok(None));

        assert_eq!(store.pop_head(1), Ok(Some(3)));
        assert_eq!(store.pop_head(1), Ok(None));
        // Drained chains still count
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_out_of_range_leaves_chains_untouched() {
        let mut store = ChainStore::new(&[vec![5, 6]]);

        let err = store.pop_head(1).unwrap_err();
        assert_eq!(
            err,
            ChainIndexOutOfRange {
                index: 1,
                chain_count: 1
            }
        );
        assert_eq!(err.to_string(), "Chain index 1 out of range [0, 1)");
        assert!(store.peek_head(3).is_err());
        assert!(store.remaining(9).is_err());

        assert_eq!(store.remaining(0), Ok(2));
        assert_eq!(store.pop_head(0), Ok(Some(5)));
    }

    #[test]
    fn test_empty_store() {
        let mut store = ChainStore::default();
        assert!(store.is_empty());
        assert!(store.pop_head(0).is_err());
    }
}
