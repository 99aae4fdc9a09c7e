//! Arena search nodes, applied-chain steps, and the frontier ordering key.

use crate::fingerprint::ContentHash;
use crate::policy::SearchOrdering;

/// Index of a node in the engine's arena.
pub type NodeId = usize;

/// One applied decoding step: the decoder identifier plus the variant tag
/// for keyspace decoders (`caesar:shift=3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    /// Decoder identifier (e.g. `"base64"`).
    pub decoder: String,
    /// Variant tag (e.g. `"shift=3"`), `None` for single-output decoders.
    pub variant: Option<String>,
}

impl std::fmt::Display for ChainStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.variant {
            Some(v) => write!(f, "{}:{}", self.decoder, v),
            None => write!(f, "{}", self.decoder),
        }
    }
}

/// Render a chain as `base64 -> caesar:shift=3`.
#[must_use]
pub fn render_chain(chain: &[ChainStep]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// One point in the decode space.
///
/// Nodes live in an arena owned by the engine for the duration of one
/// search; parents are index back-references, so the graph has no pointer
/// cycles and cancellation mid-expansion cannot leak nodes.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Arena index of this node.
    pub id: NodeId,
    /// Arena index of the parent (`None` for the root).
    pub parent: Option<NodeId>,
    /// The text content at this node.
    pub text: String,
    /// Fingerprint of `text`, used for first-seen-wins dedup.
    pub fingerprint: ContentHash,
    /// Distance from the root. Always equals the applied chain's length.
    pub depth: u32,
    /// Priority of the decoder that produced this node (`i32::MAX` for the
    /// root, so the root always expands first).
    pub producing_priority: i32,
    /// Sum of decoder priorities along the applied chain; the tie-break
    /// between simultaneous acceptances in parallel mode.
    pub priority_sum: i64,
    /// Global creation counter for deterministic tie-breaking.
    pub creation_order: u64,
    /// The step that produced this node from its parent (`None` for root).
    pub step: Option<ChainStep>,
}

impl SearchNode {
    /// The frontier key for this node under the given ordering mode.
    #[must_use]
    pub fn frontier_key(&self, ordering: SearchOrdering) -> FrontierKey {
        FrontierKey {
            depth: self.depth,
            priority_rank: match ordering {
                SearchOrdering::PriorityFirst => -i64::from(self.producing_priority),
                SearchOrdering::BreadthFirst => 0,
            },
            creation_order: self.creation_order,
        }
    }
}

/// Reconstruct the applied chain from the root to `id` by walking parent
/// links through the arena.
#[must_use]
pub fn chain_to(nodes: &[SearchNode], id: NodeId) -> Vec<ChainStep> {
    let mut chain = Vec::new();
    let mut current = Some(id);
    while let Some(i) = current {
        let node = &nodes[i];
        if let Some(step) = &node.step {
            chain.push(step.clone());
        }
        current = node.parent;
    }
    chain.reverse();
    chain
}

/// The frontier ordering key: `(depth, -producing priority, creation order)`.
///
/// Lower sorts first: shallower nodes, then nodes reached through
/// higher-priority decoders, then older nodes. Breadth-first mode zeroes
/// the priority component so only `(depth, creation order)` matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierKey {
    pub depth: u32,
    pub priority_rank: i64,
    pub creation_order: u64,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.depth
            .cmp(&other.depth)
            .then(self.priority_rank.cmp(&other.priority_rank))
            .then(self.creation_order.cmp(&other.creation_order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{fingerprint, DOMAIN_SEARCH_NODE};

    fn node(id: NodeId, depth: u32, priority: i32, order: u64) -> SearchNode {
        SearchNode {
            id,
            parent: None,
            text: format!("node-{id}"),
            fingerprint: fingerprint(DOMAIN_SEARCH_NODE, format!("node-{id}").as_bytes()),
            depth,
            producing_priority: priority,
            priority_sum: i64::from(priority),
            creation_order: order,
            step: None,
        }
    }

    #[test]
    fn shallower_sorts_first() {
        let a = node(0, 1, 10, 5).frontier_key(SearchOrdering::PriorityFirst);
        let b = node(1, 2, 90, 0).frontier_key(SearchOrdering::PriorityFirst);
        assert!(a < b, "depth dominates priority");
    }

    #[test]
    fn higher_priority_sorts_first_at_equal_depth() {
        let a = node(0, 1, 90, 5).frontier_key(SearchOrdering::PriorityFirst);
        let b = node(1, 1, 10, 0).frontier_key(SearchOrdering::PriorityFirst);
        assert!(a < b);
    }

    #[test]
    fn insertion_order_breaks_full_ties() {
        let a = node(0, 1, 50, 3).frontier_key(SearchOrdering::PriorityFirst);
        let b = node(1, 1, 50, 7).frontier_key(SearchOrdering::PriorityFirst);
        assert!(a < b);
    }

    #[test]
    fn breadth_first_ignores_priority() {
        let a = node(0, 1, 10, 0).frontier_key(SearchOrdering::BreadthFirst);
        let b = node(1, 1, 90, 1).frontier_key(SearchOrdering::BreadthFirst);
        assert!(a < b, "creation order decides in breadth-first mode");
    }

    #[test]
    fn chain_reconstruction_matches_depth() {
        let root = node(0, 0, i32::MAX, 0);
        let mut child = node(1, 1, 90, 1);
        child.parent = Some(0);
        child.step = Some(ChainStep {
            decoder: "base64".into(),
            variant: None,
        });
        let mut grandchild = node(2, 2, 80, 2);
        grandchild.parent = Some(1);
        grandchild.step = Some(ChainStep {
            decoder: "caesar".into(),
            variant: Some("shift=3".into()),
        });
        let nodes = vec![root, child, grandchild];
        let chain = chain_to(&nodes, 2);
        assert_eq!(chain.len() as u32, nodes[2].depth);
        assert_eq!(render_chain(&chain), "base64 -> caesar:shift=3");
    }
}
