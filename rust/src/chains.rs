//! Chain reconstruction from a maximum matching.

use crate::interner::DeviceIndex;
use crate::matching::Matching;

/// Error types for chain reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecompositionError {
    /// The matching loops back on itself; the dominance relation is not a
    /// strict partial order.
    CycleDetected { device: DeviceIndex },
}

impl std::fmt::Display for DecompositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecompositionError::CycleDetected { device } => {
                write!(f, "Cycle detected in matching at device {}", device)
            }
        }
    }
}

impl std::error::Error for DecompositionError {}

/// Split all devices into chains by following `successor` links.
///
/// Each device without a predecessor heads a chain; heads are taken in device
/// order, so chain indices are deterministic. Every device ends up in exactly
/// one chain, listed from most to least dominant.
pub fn decompose(
    device_count: usize,
    matching: &Matching,
) -> Result<Vec<Vec<DeviceIndex>>, DecompositionError> {
    let mut visited = vec![false; device_count];
    let mut chains: Vec<Vec<DeviceIndex>> =
        Vec::with_capacity(device_count.saturating_sub(matching.len()));

    for head in 0..device_count as DeviceIndex {
        if matching.predecessor(head).is_some() {
            continue;
        }

        let mut chain = Vec::new();
        let mut current = Some(head);
        while let Some(device) = current {
            let idx = device as usize;
            if idx >= device_count || visited[idx] {
                return Err(DecompositionError::CycleDetected { device });
            }
            visited[idx] = true;
            chain.push(device);
            current = matching.successor(device);
        }
        chains.push(chain);
    }

    // Devices on a closed loop have predecessors and are never reached from a head.
    if let Some(stranded) = visited.iter().position(|&v| !v) {
        return Err(DecompositionError::CycleDetected {
            device: stranded as DeviceIndex,
        });
    }

    Ok(chains)
}
