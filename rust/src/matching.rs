//! Maximum bipartite matching via shortest augmenting paths (Edmonds–Karp).

use std::collections::VecDeque;

use crate::interner::DeviceIndex;
use crate::network::{EdgeId, FlowNetwork, SINK, SOURCE};
use crate::{log_debug, log_steps, log_summary};

/// Partial injection `device -> next device` read off a maximum flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    successor: Vec<Option<DeviceIndex>>,
    predecessor: Vec<Option<DeviceIndex>>,
    size: usize,
}

impl Matching {
    pub fn empty(device_count: usize) -> Self {
        Self {
            successor: vec![None; device_count],
            predecessor: vec![None; device_count],
            size: 0,
        }
    }

    /// Build a matching from explicit pairs.
    ///
    /// Returns `None` if a device appears twice as a source or twice as a
    /// target, or if an index is out of range.
    #[cfg(test)]
    pub(crate) fn from_pairs(
        device_count: usize,
        pairs: impl IntoIterator<Item = (DeviceIndex, DeviceIndex)>,
    ) -> Option<Self> {
        let mut matching = Self::empty(device_count);
        for (a, b) in pairs {
            if !matching.insert(a, b) {
                return None;
            }
        }
        Some(matching)
    }

    fn insert(&mut self, from: DeviceIndex, to: DeviceIndex) -> bool {
        let (f, t) = (from as usize, to as usize);
        if f >= self.successor.len() || t >= self.predecessor.len() {
            return false;
        }
        if self.successor[f].is_some() || self.predecessor[t].is_some() {
            return false;
        }
        self.successor[f] = Some(to);
        self.predecessor[t] = Some(from);
        self.size += 1;
        true
    }

    /// Device immediately after `device` in its chain.
    #[inline]
    pub fn successor(&self, device: DeviceIndex) -> Option<DeviceIndex> {
        self.successor.get(device as usize).copied().flatten()
    }

    /// Device immediately before `device` in its chain.
    #[inline]
    pub fn predecessor(&self, device: DeviceIndex) -> Option<DeviceIndex> {
        self.predecessor.get(device as usize).copied().flatten()
    }

    pub fn device_count(&self) -> usize {
        self.successor.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Matched pairs in order of their source device.
    pub fn pairs(&self) -> impl Iterator<Item = (DeviceIndex, DeviceIndex)> + '_ {
        self.successor
            .iter()
            .enumerate()
            .filter_map(|(a, next)| next.map(|b| (a as DeviceIndex, b)))
    }
}

/// Compute a maximum matching on `network`.
///
/// Residual capacities are private to this call; the network is not touched.
pub fn solve(network: &FlowNetwork, verbosity: u8) -> Matching {
    let mut residual = network.capacities();
    let mut parent: Vec<Option<EdgeId>> = vec![None; network.node_count()];
    let mut flow: u32 = 0;

    while shortest_augmenting_path(network, &residual, &mut parent, verbosity) {
        let bottleneck = bottleneck(network, &residual, &parent);
        augment(network, &mut residual, &parent, bottleneck);
        flow += bottleneck;
        log_steps!(
            verbosity,
            "Augmentation {}: pushed {} unit(s) along {} edge(s)",
            flow,
            bottleneck,
            path_edges(network, &parent).count()
        );
    }

    let matching = read_matching(network, &residual);
    debug_assert_eq!(matching.len(), flow as usize);
    log_summary!(
        verbosity,
        "Maximum matching: {} pair(s) over {} device(s), {} dominance edge(s)",
        matching.len(),
        network.device_count(),
        network.dominance_edge_count()
    );
    matching
}

/// Breadth-first search over edges with spare residual capacity.
///
/// Fills `parent` with the edge used to reach each node and returns whether
/// the sink was reached.
fn shortest_augmenting_path(
    network: &FlowNetwork,
    residual: &[u32],
    parent: &mut [Option<EdgeId>],
    verbosity: u8,
) -> bool {
    parent.fill(None);
    let mut visited = vec![false; network.node_count()];
    let mut queue = VecDeque::new();
    visited[SOURCE as usize] = true;
    queue.push_back(SOURCE);

    while let Some(node) = queue.pop_front() {
        for &id in network.outgoing(node) {
            if residual[id] == 0 {
                continue;
            }
            let next = network.edge(id).to;
            if visited[next as usize] {
                continue;
            }
            visited[next as usize] = true;
            parent[next as usize] = Some(id);
            if next == SINK {
                return true;
            }
            queue.push_back(next);
        }
    }

    log_debug!(
        verbosity,
        "  BFS exhausted: {} of {} node(s) reachable, no augmenting path",
        visited.iter().filter(|&&v| v).count(),
        network.node_count()
    );
    false
}

/// Edges of the path recorded in `parent`, walked from sink to source.
fn path_edges<'a>(
    network: &'a FlowNetwork,
    parent: &'a [Option<EdgeId>],
) -> impl Iterator<Item = EdgeId> + 'a {
    let mut node = SINK;
    std::iter::from_fn(move || {
        if node == SOURCE {
            return None;
        }
        let id = parent[node as usize]?;
        node = network.edge(id).from;
        Some(id)
    })
}

fn bottleneck(network: &FlowNetwork, residual: &[u32], parent: &[Option<EdgeId>]) -> u32 {
    path_edges(network, parent)
        .map(|id| residual[id])
        .min()
        .unwrap_or(0)
}

fn augment(network: &FlowNetwork, residual: &mut [u32], parent: &[Option<EdgeId>], amount: u32) {
    for id in path_edges(network, parent) {
        residual[id] -= amount;
        residual[FlowNetwork::partner(id)] += amount;
    }
}

/// Saturated dominance edges form the matching.
fn read_matching(network: &FlowNetwork, residual: &[u32]) -> Matching {
    let mut matching = Matching::empty(network.device_count());
    for (id, a, b) in network.dominance_edges() {
        if residual[id] == 0 && residual[FlowNetwork::partner(id)] == 1 {
            // Unit capacities on source and sink edges make this injective.
            let inserted = matching.insert(a, b);
            debug_assert!(inserted, "flow produced a non-injective matching");
        }
    }
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dominance::StrictDominance;

    fn solve_scores(scores: &[Vec<f64>]) -> Matching {
        let network = FlowNetwork::build(scores, &StrictDominance);
        solve(&network, 0)
    }

    #[test]
    fn test_scenario_matching() {
        let scores = vec![
            vec![3.0, 3.0],
            vec![2.0, 2.0],
            vec![1.0, 1.0],
            vec![5.0, 1.0],
        ];
        let matching = solve_scores(&scores);

        // A->B, B->C is the only matching of size 2
        assert_eq!(matching.len(), 2);
        assert_eq!(matching.successor(0), Some(1));
        assert_eq!(matching.successor(1), Some(2));
        assert_eq!(matching.successor(2), None);
        assert_eq!(matching.successor(3), None);
        assert_eq!(matching.predecessor(2), Some(1));
    }

    #[test]
    fn test_no_edges_gives_empty_matching() {
        let scores = vec![vec![1.0, 3.0], vec![2.0, 2.0], vec![3.0, 1.0]];
        let matching = solve_scores(&scores);
        assert!(matching.is_empty());
        assert_eq!(matching.device_count(), 3);
    }

    #[test]
    fn test_total_order_matches_n_minus_one() {
        let scores: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, 10.0 + i as f64]).collect();
        let matching = solve_scores(&scores);
        assert_eq!(matching.len(), 5);
        for (a, b) in matching.pairs() {
            assert_eq!(a, b + 1);
        }
    }

    #[test]
    fn test_augmenting_path_reroutes_first_choice() {
        // P dominates Q and R, S dominates only Q, P and S are incomparable.
        // The first BFS pairs P->Q; the second must reroute through the
        // residual edge to reach S->Q, P->R.
        let scores = vec![
            vec![4.0, 1.0], // P
            vec![0.0, 0.0], // Q
            vec![3.0, 0.0], // R
            vec![1.0, 4.0], // S
        ];
        let matching = solve_scores(&scores);
        assert_eq!(matching.len(), 2);
        assert_eq!(matching.successor(0), Some(2));
        assert_eq!(matching.successor(3), Some(1));
        assert_eq!(matching.predecessor(1), Some(3));
    }

    #[test]
    fn test_from_pairs_rejects_non_injective() {
        assert!(Matching::from_pairs(3, [(0, 1), (0, 2)]).is_none());
        assert!(Matching::from_pairs(3, [(0, 2), (1, 2)]).is_none());
        assert!(Matching::from_pairs(3, [(0, 5)]).is_none());
        let matching = Matching::from_pairs(3, [(0, 1), (1, 2)]).unwrap();
        assert_eq!(matching.pairs().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
    }
}
