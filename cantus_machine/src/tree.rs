// Lookahead trees.
//
// A ChoiceNode pairs one legal continuation with the continuations that
// would follow it, to a bounded depth. Trees are ephemeral: the Guide
// computes them on demand and never stores them.

use cantus_pitch::Pitch;
use serde::{Deserialize, Serialize};

/// One hypothetical future note and the choices reachable after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceNode {
    /// The candidate pitch.
    pub pitch: Pitch,
    /// Continuations after choosing `pitch`, one level deeper. Empty either
    /// because the requested depth is exhausted or because no legal
    /// continuation exists.
    pub next: Vec<ChoiceNode>,
}

impl ChoiceNode {
    /// Number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self.next.iter().map(ChoiceNode::node_count).sum::<usize>()
    }
}
