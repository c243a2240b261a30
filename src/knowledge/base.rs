//! State-indexed knowledge table

use std::{collections::HashMap, fmt, io::Write};

use serde::{Deserialize, Serialize};

use crate::{
    knowledge::node::ActionValueNode,
    types::{Action, Fingerprint},
};

/// Mapping from board fingerprint to what is known about that board.
///
/// One node per distinct state ever updated. Nodes are created lazily and
/// never evicted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    nodes: HashMap<Fingerprint, ActionValueNode>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an observed return for (`state`, `action`) into the table,
    /// creating the state's node on first sight.
    pub fn add(&mut self, state: Fingerprint, action: Action, observed_return: f64, alpha: f64) {
        self.nodes
            .entry(state)
            .or_default()
            .update(action, observed_return, alpha);
    }

    /// Estimate for (`state`, `action`); unknown states read as 0.0, the same
    /// value a fresh node starts with.
    pub fn get_estimate(&self, state: &Fingerprint, action: Action) -> f64 {
        self.nodes
            .get(state)
            .map(|node| node.get_estimate(action))
            .unwrap_or(0.0)
    }

    /// Node for `state`, if it has ever been updated
    pub fn get_node(&self, state: &Fingerprint) -> Option<&ActionValueNode> {
        self.nodes.get(state)
    }

    /// Number of known states
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &ActionValueNode)> {
        self.nodes.iter()
    }

    /// The `limit` most visited states, most visited first.
    ///
    /// A `limit` of 0 returns every state. Equal visit counts are ordered by
    /// state.
    pub fn dump(&self, limit: usize) -> Vec<(&Fingerprint, &ActionValueNode)> {
        let mut ranked: Vec<_> = self.nodes.iter().collect();
        ranked.sort_by(|(state_a, a), (state_b, b)| {
            b.visit_count()
                .cmp(&a.visit_count())
                .then_with(|| state_a.cmp(state_b))
        });
        if limit > 0 {
            ranked.truncate(limit);
        }
        ranked
    }

    /// Write [`dump`](Self::dump) as one `State: ...` line per state
    pub fn write_dump<W: Write>(&self, writer: &mut W, limit: usize) -> std::io::Result<()> {
        for (state, node) in self.dump(limit) {
            writeln!(writer, "State: {state} {node}")?;
        }
        Ok(())
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I know about {} states", self.size())
    }
}
