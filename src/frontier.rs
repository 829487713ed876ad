//! Per-node Pareto sets of labels.

use crate::config::LabelingConfig;
use crate::error::{FrontierError, LabelError};
use crate::label::{Label, LabelPriority};
use crate::node::NodeId;
use crate::queue::LabelQueue;

/// Outcome of offering a label to a [`Frontier`].
#[derive(Debug, PartialEq)]
pub enum Admission<'a> {
    /// A retained label dominates the candidate; the candidate was dropped.
    Dominated,
    /// The candidate was retained; `evicted` are the labels it dominated.
    Admitted { evicted: Vec<&'a Label<'a>> },
}

/// Pairwise non-dominated labels at one node.
#[derive(Debug)]
pub struct Frontier<'a> {
    node: NodeId,
    labels: Vec<&'a Label<'a>>,
}

impl<'a> Frontier<'a> {
    pub fn new(node: NodeId) -> Self {
        Self::with_capacity(node, 0)
    }

    pub fn with_capacity(node: NodeId, capacity: usize) -> Self {
        Self {
            node,
            labels: Vec::with_capacity(capacity),
        }
    }

    /// Inserts `candidate` unless a retained label dominates it, pruning every
    /// retained label the candidate dominates.
    ///
    /// The existing labels are checked first, so of two equivalent labels the
    /// one offered earlier survives.
    pub fn insert(&mut self, candidate: &'a Label<'a>) -> Result<Admission<'a>, LabelError> {
        if candidate.node() != self.node {
            return Err(LabelError::NodeMismatch {
                expected: self.node,
                found: candidate.node(),
            });
        }

        // phase one: is the candidate itself dominated?
        for existing in &self.labels {
            if existing.dominates(candidate)? {
                tracing::debug!(node = self.node, label = candidate.id().0, by = existing.id().0, "candidate dominated");
                return Ok(Admission::Dominated);
            }
        }

        // phase two: prune what the candidate dominates
        let mut evicted = Vec::new();
        let mut kept = Vec::with_capacity(self.labels.len() + 1);
        for existing in self.labels.drain(..) {
            if candidate.dominates(existing)? {
                evicted.push(existing);
            } else {
                kept.push(existing);
            }
        }
        kept.push(candidate);
        self.labels = kept;

        if !evicted.is_empty() {
            tracing::debug!(node = self.node, label = candidate.id().0, evicted = evicted.len(), "pruned dominated labels");
        }
        Ok(Admission::Admitted { evicted })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn labels(&self) -> &[&'a Label<'a>] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One [`Frontier`] per node id.
#[derive(Debug)]
pub struct Frontiers<'a> {
    at: Vec<Frontier<'a>>,
}

impl<'a> Frontiers<'a> {
    pub fn new(node_count: usize, config: &LabelingConfig) -> Self {
        Self {
            at: (0..node_count)
                .map(|node| Frontier::with_capacity(node, config.frontier_capacity))
                .collect(),
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&Frontier<'a>> {
        self.at.get(node)
    }

    /// Offers `label` to its node's frontier and keeps `queue` in sync:
    /// an admitted label is queued by its priority and evicted labels still
    /// waiting in the queue are removed from it.
    ///
    /// Returns whether the label was admitted.
    pub fn admit(
        &mut self,
        label: &'a Label<'a>,
        queue: &mut LabelQueue<&'a Label<'a>, LabelPriority>,
    ) -> Result<bool, FrontierError> {
        let frontier = self
            .at
            .get_mut(label.node())
            .ok_or(FrontierError::UnknownNode(label.node()))?;
        match frontier.insert(label)? {
            Admission::Dominated => Ok(false),
            Admission::Admitted { evicted } => {
                for stale in evicted {
                    if queue.contains(&stale) {
                        queue.remove(&stale)?;
                    }
                }
                queue.insert_or_update(label, label.priority())?;
                Ok(true)
            }
        }
    }
}
