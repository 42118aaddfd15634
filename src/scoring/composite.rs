//! Dispatches the shared graph traversal to many [`ColumnScorer`]s at once
//! (spec.md §4.7): each scorer accumulates its own private `fact`/`dim`
//! objectives while riding a single shared traversal, and the private
//! objectives are merged together only after the traversal completes.

use std::collections::HashMap;

use crate::graph::{GraphNode, NodeKind, SchemaGraph};
use crate::scoring::key_disqualification::KeyDisqualificationScorer;
use crate::scoring::keyword::KeywordScorer;
use crate::scoring::type_based::TypeBasedScorer;
use crate::scoring::{ColumnScorer, ScoringObjective};
use crate::visitor::{NavDirective, SchemaVisitor, VisitContext, VisitorError};

/// A list of [`ColumnScorer`]s driven over one shared traversal
/// ([`CompositeScorer::run`]), then merged.
pub struct CompositeScorer {
    scorers: Vec<Box<dyn ColumnScorer>>,
}

impl CompositeScorer {
    pub fn new(scorers: Vec<Box<dyn ColumnScorer>>) -> Self {
        CompositeScorer { scorers }
    }

    /// The default scorer list named in spec.md §4.7: "type,
    /// key-disqualification, keyword".
    pub fn with_defaults() -> Self {
        CompositeScorer::new(vec![
            Box::new(TypeBasedScorer::new()),
            Box::new(KeyDisqualificationScorer::new()),
            Box::new(KeywordScorer::new()),
        ])
    }

    /// Drives every scorer over a single shared traversal (`self` is the
    /// visitor), then merges each scorer's private objectives into the two
    /// combined totals.
    pub fn run(&mut self, graph: &SchemaGraph) -> Result<(ScoringObjective, ScoringObjective), VisitorError> {
        graph.accept_visitor(self)?;
        self.merge_all()
    }

    fn merge_all(&self) -> Result<(ScoringObjective, ScoringObjective), VisitorError> {
        let mut fact = ScoringObjective::new("fact");
        let mut dim = ScoringObjective::new("dim");
        for scorer in &self.scorers {
            fact = fact.merge(&scorer.fact())?;
            dim = dim.merge(&scorer.dim())?;
        }
        Ok((fact, dim))
    }
}

fn union_nav(acc: NavDirective, next: NavDirective) -> NavDirective {
    match (acc, next) {
        (None, None) => None,
        (Some(a), None) | (None, Some(a)) => Some(a),
        (Some(mut a), Some(b)) => {
            a.extend(b);
            Some(a)
        }
    }
}

impl SchemaVisitor for CompositeScorer {
    fn visit_schema(&mut self, node: &GraphNode, ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        self.scorers.iter_mut().try_fold(None, |acc, s| Ok(union_nav(acc, s.visit_schema(node, ctx)?)))
    }

    fn visit_table(&mut self, node: &GraphNode, ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        self.scorers.iter_mut().try_fold(None, |acc, s| Ok(union_nav(acc, s.visit_table(node, ctx)?)))
    }

    fn visit_column(&mut self, node: &GraphNode, ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        self.scorers.iter_mut().try_fold(None, |acc, s| Ok(union_nav(acc, s.visit_column(node, ctx)?)))
    }

    fn visit_pk(&mut self, node: &GraphNode, ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        self.scorers.iter_mut().try_fold(None, |acc, s| Ok(union_nav(acc, s.visit_pk(node, ctx)?)))
    }

    fn visit_fk(&mut self, node: &GraphNode, ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        self.scorers.iter_mut().try_fold(None, |acc, s| Ok(union_nav(acc, s.visit_fk(node, ctx)?)))
    }

    fn visit_reference(&mut self, from: &GraphNode, to: &GraphNode, ctx: &VisitContext) -> Result<(), VisitorError> {
        for scorer in &mut self.scorers {
            scorer.visit_reference(from, to, ctx)?;
        }
        Ok(())
    }
}

/// Runs `composite` over `graph` and returns `(fact_score, dim_score)` for
/// every column node, defaulting unscored columns to `-1` (spec.md §4.7:
/// every column gets both attributes, scored or not — `-1` distinguishes
/// "no opinion" from an explicit zero).
pub fn add_fact_and_dim_scores(
    graph: &SchemaGraph,
    mut composite: CompositeScorer,
) -> Result<HashMap<String, (i64, i64)>, VisitorError> {
    let (fact, dim) = composite.run(graph)?;

    let fact_totals: HashMap<String, i64> =
        fact.get_node_scores(None).into_iter().map(|(id, total, _)| (id, total)).collect();
    let dim_totals: HashMap<String, i64> =
        dim.get_node_scores(None).into_iter().map(|(id, total, _)| (id, total)).collect();

    let mut scores = HashMap::new();
    for node in graph.nodes_of_kind(NodeKind::Column) {
        let fact_score = fact_totals.get(&node.id).copied().unwrap_or(-1);
        let dim_score = dim_totals.get(&node.id).copied().unwrap_or(-1);
        scores.insert(node.id.clone(), (fact_score, dim_score));
    }
    Ok(scores)
}
