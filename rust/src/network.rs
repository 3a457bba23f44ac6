//! Bipartite flow network over devices.
//!
//! Node layout is fixed so that every lookup is direct array indexing:
//! `0` is the source, `1` the sink, `2..2+n` the left copies of the devices
//! and `2+n..2+2n` the right copies. Edges live in an arena where edge `2m`
//! is a forward edge and `2m + 1` its residual partner with capacity 0.

use crate::dominance::DominanceOracle;
use crate::interner::DeviceIndex;

/// Dense node id.
pub type NodeId = u32;
/// Index into the edge arena.
pub type EdgeId = usize;

pub const SOURCE: NodeId = 0;
pub const SINK: NodeId = 1;

/// Role a node plays in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Source,
    Sink,
    Left(DeviceIndex),
    Right(DeviceIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: u32,
}

/// Read-only flow network. Solvers keep their own residual state.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    device_count: usize,
    edges: Vec<Edge>,
    /// Outgoing edge ids per node, residual partners included.
    adjacency: Vec<Vec<EdgeId>>,
    dominance_edges: usize,
}

impl FlowNetwork {
    /// Build the network for the given performance vectors.
    ///
    /// Device `i` is `performance[i]`. Every ordered pair is tested, so this
    /// is O(n²·k).
    pub fn build<O: DominanceOracle + ?Sized>(performance: &[Vec<f64>], oracle: &O) -> Self {
        let n = performance.len();
        let mut network = Self {
            device_count: n,
            edges: Vec::with_capacity(4 * n),
            adjacency: vec![Vec::new(); 2 * n + 2],
            dominance_edges: 0,
        };

        for device in 0..n as DeviceIndex {
            let left = network.left(device);
            let right = network.right(device);
            network.add_edge(SOURCE, left, 1);
            network.add_edge(right, SINK, 1);
        }

        for (a, scores_a) in performance.iter().enumerate() {
            for (b, scores_b) in performance.iter().enumerate() {
                if a != b && oracle.dominates(scores_a, scores_b) {
                    let from = network.left(a as DeviceIndex);
                    let to = network.right(b as DeviceIndex);
                    network.add_edge(from, to, 1);
                    network.dominance_edges += 1;
                }
            }
        }

        network
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId, capacity: u32) {
        let forward = self.edges.len();
        self.edges.push(Edge { from, to, capacity });
        self.edges.push(Edge {
            from: to,
            to: from,
            capacity: 0,
        });
        self.adjacency[from as usize].push(forward);
        self.adjacency[to as usize].push(forward + 1);
    }

    #[inline]
    pub fn left(&self, device: DeviceIndex) -> NodeId {
        2 + device
    }

    #[inline]
    pub fn right(&self, device: DeviceIndex) -> NodeId {
        2 + self.device_count as NodeId + device
    }

    pub fn role(&self, node: NodeId) -> NodeRole {
        let n = self.device_count as NodeId;
        match node {
            SOURCE => NodeRole::Source,
            SINK => NodeRole::Sink,
            _ if node < 2 + n => NodeRole::Left(node - 2),
            _ => NodeRole::Right(node - 2 - n),
        }
    }

    pub fn device_count(&self) -> usize {
        self.device_count
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of arena slots, residual partners included.
    pub fn edge_slots(&self) -> usize {
        self.edges.len()
    }

    pub fn dominance_edge_count(&self) -> usize {
        self.dominance_edges
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Residual partner of an edge.
    #[inline]
    pub fn partner(id: EdgeId) -> EdgeId {
        id ^ 1
    }

    #[inline]
    pub fn is_forward(id: EdgeId) -> bool {
        id % 2 == 0
    }

    #[inline]
    pub fn outgoing(&self, node: NodeId) -> &[EdgeId] {
        &self.adjacency[node as usize]
    }

    /// Initial capacities of every arena slot.
    pub fn capacities(&self) -> Vec<u32> {
        self.edges.iter().map(|e| e.capacity).collect()
    }

    /// Forward left→right edges as `(edge id, dominating device, dominated device)`.
    pub fn dominance_edges(&self) -> impl Iterator<Item = (EdgeId, DeviceIndex, DeviceIndex)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(id, _)| Self::is_forward(*id))
            .filter_map(move |(id, edge)| match (self.role(edge.from), self.role(edge.to)) {
                (NodeRole::Left(a), NodeRole::Right(b)) => Some((id, a, b)),
                _ => None,
            })
    }

    /// Devices dominated by `device`, as targets of its left node.
    pub fn dominated_by(&self, device: DeviceIndex) -> impl Iterator<Item = DeviceIndex> + '_ {
        self.outgoing(self.left(device))
            .iter()
            .filter(|&&id| Self::is_forward(id))
            .filter_map(move |&id| match self.role(self.edges[id].to) {
                NodeRole::Right(b) => Some(b),
                _ => None,
            })
    }
}
