//! Maximum antichain from a maximum matching (König construction).
//!
//! Starting from every unmatched left node, walk alternating paths: unmatched
//! dominance edges go left to right, matched pairs come back right to left.
//! With `Z` the set reached, `(L \ Z) ∪ (R ∩ Z)` is a minimum vertex cover, and
//! devices with neither copy in the cover are pairwise incomparable. There are
//! exactly `n - |M|` of them, which matches the chain count and proves the
//! chain cover minimal.

use std::collections::VecDeque;

use crate::interner::DeviceIndex;
use crate::matching::Matching;
use crate::network::FlowNetwork;

/// Devices forming a maximum antichain, in device order.
///
/// `matching` must be maximum on `network`; for a merely maximal matching the
/// result is still an antichain but may be smaller than the chain count.
pub fn maximum_antichain(network: &FlowNetwork, matching: &Matching) -> Vec<DeviceIndex> {
    let n = network.device_count();
    let mut left_reached = vec![false; n];
    let mut right_reached = vec![false; n];
    let mut queue: VecDeque<DeviceIndex> = VecDeque::new();

    for device in 0..n as DeviceIndex {
        if matching.successor(device).is_none() {
            left_reached[device as usize] = true;
            queue.push_back(device);
        }
    }

    while let Some(a) = queue.pop_front() {
        let matched_to = matching.successor(a);
        for b in network.dominated_by(a) {
            if matched_to == Some(b) || right_reached[b as usize] {
                continue;
            }
            right_reached[b as usize] = true;
            if let Some(back) = matching.predecessor(b) {
                if !left_reached[back as usize] {
                    left_reached[back as usize] = true;
                    queue.push_back(back);
                }
            }
        }
    }

    (0..n as DeviceIndex)
        .filter(|&i| left_reached[i as usize] && !right_reached[i as usize])
        .collect()
}
