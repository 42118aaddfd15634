//! Composable heuristic scoring (spec.md §4.5–§4.7): objectives accumulate
//! per-node scores as a composite scorer rides a single graph traversal,
//! then merge into the two final attributes (`fact_score`, `dim_score`)
//! written back onto column nodes.

pub mod composite;
pub mod key_disqualification;
pub mod keyword;
pub mod type_based;

use std::collections::HashMap;

use thiserror::Error;

use crate::graph::SchemaGraph;
use crate::visitor::{SchemaVisitor, VisitorError};

/// Score magnitudes used throughout the concrete scorers (spec.md §4.6.2,
/// §4.6.3): two levels, nothing finer-grained.
pub const NORMAL: i64 = 100;
pub const GOOD: i64 = 200;

/// The score a single scorer assigned to a single node, plus a short
/// human-readable reason (surfaced in diagnostics, not used by scoring
/// itself).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeScore {
    pub node_id: String,
    pub score: i64,
    pub reason: String,
}

impl NodeScore {
    pub fn new(node_id: impl Into<String>, score: i64, reason: impl Into<String>) -> Self {
        NodeScore { node_id: node_id.into(), score, reason: reason.into() }
    }

    /// Construct a disqualifying score: [`DISQUALIFIED`], large enough in
    /// magnitude to dominate any realistic positive accumulation.
    pub fn disqualified(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        NodeScore::new(node_id, DISQUALIFIED, reason)
    }
}

/// Sentinel score marking a node as permanently disqualified from
/// consideration. A plain `i64` rather than `Option<i64>`/a newtype so it
/// composes under ordinary addition: once added into a running total, no
/// amount of subsequent positive scoring can climb back out of
/// disqualified territory (spec.md §9).
pub const DISQUALIFIED: i64 = -100_000;

/// Construct a disqualifying [`NodeScore`]. Free-function alias for
/// [`NodeScore::disqualified`], kept for call sites that read more
/// naturally without the type prefix.
pub fn disqualify(node_id: impl Into<String>, reason: impl Into<String>) -> NodeScore {
    NodeScore::disqualified(node_id, reason)
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("cannot merge objective '{other}' into '{name}': names differ")]
    NameMismatch { name: String, other: String },
}

/// A single heuristic that contributes scores to a named fact and/or
/// dimension [`ScoringObjective`] while riding the shared graph traversal
/// (spec.md §4.6: "each extending the base no-op visitor"). Implementations
/// are expected to be cheap: a [`composite::CompositeScorer`] may dispatch
/// every callback to many scorers, optionally in parallel, merging their
/// private objectives only after each has completed its own pass.
pub trait ColumnScorer: SchemaVisitor {
    /// Short, stable name identifying this scorer in diagnostics.
    fn name(&self) -> &str;

    /// This scorer's fact-scoring objective as accumulated so far.
    fn fact(&self) -> ScoringObjective;

    /// This scorer's dimension-scoring objective as accumulated so far.
    fn dim(&self) -> ScoringObjective;

    /// Drives this scorer over `graph` via the shared traversal. Implemented
    /// per concrete type (rather than as a trait default) so the call sees
    /// a `Sized` `self` and needs no `dyn SchemaVisitor` upcast — this
    /// crate's `rust-version` predates stable trait-object upcasting.
    fn accept(&mut self, graph: &SchemaGraph) -> Result<(), VisitorError>;
}

/// A named accumulation of per-node scores produced by one or more scorers
/// over the course of a traversal. A node may accrue more than one score
/// from the same objective (e.g. one scorer firing on several distinct
/// signals for the same column); all of them count.
#[derive(Debug, Clone, Default)]
pub struct ScoringObjective {
    pub name: String,
    scores: HashMap<String, Vec<NodeScore>>,
}

impl ScoringObjective {
    pub fn new(name: impl Into<String>) -> Self {
        ScoringObjective { name: name.into(), scores: HashMap::new() }
    }

    pub fn add(&mut self, score: NodeScore) {
        self.scores.entry(score.node_id.clone()).or_default().push(score);
    }

    /// `(node-id, total, sorted-scores)` for every scored node, filtered by
    /// `cutoff` (total score must be at or above it) and sorted ascending by
    /// total; within a node, member scores are sorted ascending by
    /// individual score (spec.md §4.5).
    pub fn get_node_scores(&self, cutoff: Option<i64>) -> Vec<(String, i64, Vec<NodeScore>)> {
        let mut rows: Vec<(String, i64, Vec<NodeScore>)> = self
            .scores
            .iter()
            .map(|(id, scores)| {
                let mut sorted = scores.clone();
                sorted.sort_by_key(|s| s.score);
                let total = sorted.iter().map(|s| s.score).sum();
                (id.clone(), total, sorted)
            })
            .filter(|(_, total, _)| cutoff.is_none_or(|c| *total >= c))
            .collect();
        rows.sort_by_key(|(_, total, _)| *total);
        rows
    }

    /// The total score recorded for `node_id`, or `None` if it was never
    /// scored by this objective.
    pub fn total_for(&self, node_id: &str) -> Option<i64> {
        self.scores.get(node_id).map(|scores| scores.iter().map(|s| s.score).sum())
    }

    /// Merge with another objective of the same name, returning a new
    /// objective whose per-node score lists are the concatenation of the
    /// two inputs. Neither `self` nor `other` is mutated (spec.md §4.5).
    pub fn merge(&self, other: &ScoringObjective) -> Result<ScoringObjective, ScoringError> {
        if self.name != other.name {
            return Err(ScoringError::NameMismatch { name: self.name.clone(), other: other.name.clone() });
        }
        let mut merged = self.clone();
        for (id, scores) in &other.scores {
            merged.scores.entry(id.clone()).or_default().extend(scores.iter().cloned());
        }
        Ok(merged)
    }
}
