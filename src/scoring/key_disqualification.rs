//! Disqualifies columns that are structurally keys rather than measures
//! (spec.md §4.6.1): primary-key members and both endpoints of every
//! foreign-key reference make poor fact measures. Does not affect
//! dimension scoring.

use crate::graph::{GraphNode, NodeRecord, SchemaGraph};
use crate::scoring::{disqualify, ColumnScorer, ScoringObjective};
use crate::visitor::{NavDirective, SchemaVisitor, VisitContext, VisitorError};

/// Disqualifies, in the fact objective only: every member column of a
/// primary key, and both endpoints of every `reference` edge (the
/// referencing column and the column it references).
#[derive(Debug, Default)]
pub struct KeyDisqualificationScorer {
    fact: ScoringObjective,
    dim: ScoringObjective,
}

impl KeyDisqualificationScorer {
    pub fn new() -> Self {
        KeyDisqualificationScorer { fact: ScoringObjective::new("fact"), dim: ScoringObjective::new("dim") }
    }
}

impl SchemaVisitor for KeyDisqualificationScorer {
    fn visit_pk(&mut self, node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        if let NodeRecord::Pk(pk) = &node.record {
            for member in &pk.members {
                let column_id = crate::ids::column_id(
                    &member.table_cat,
                    member.table_schem.as_deref(),
                    &member.table_name,
                    &member.column_name,
                );
                self.fact.add(disqualify(column_id, "column is part of primary key"));
            }
        }
        Ok(None)
    }

    fn visit_reference(
        &mut self,
        from: &GraphNode,
        to: &GraphNode,
        _ctx: &VisitContext,
    ) -> Result<(), VisitorError> {
        self.fact.add(disqualify(from.id.clone(), "column is a foreign key"));
        self.fact.add(disqualify(to.id.clone(), "column is referenced by a foreign key"));
        Ok(())
    }
}

impl ColumnScorer for KeyDisqualificationScorer {
    fn name(&self) -> &str {
        "key_disqualification"
    }

    fn fact(&self) -> ScoringObjective {
        self.fact.clone()
    }

    fn dim(&self) -> ScoringObjective {
        self.dim.clone()
    }

    fn accept(&mut self, graph: &SchemaGraph) -> Result<(), VisitorError> {
        graph.accept_visitor(self)
    }
}
