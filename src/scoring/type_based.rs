//! Scores columns by their declared SQL type (spec.md §4.6.2): a
//! replaceable dictionary of three sets — dimension-viable, fact-viable,
//! fact-disqualifying — checked in that priority order so a
//! fact-disqualifying type always dominates a positive fact-viable score.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::{GraphNode, NodeRecord, SchemaGraph};
use crate::scoring::{disqualify, ColumnScorer, NodeScore, ScoringObjective, GOOD, NORMAL};
use crate::visitor::{NavDirective, SchemaVisitor, VisitContext, VisitorError};

/// The replaceable dictionary driving [`TypeBasedScorer`]. Type names are
/// matched case-insensitively (compared upper-cased, matching JDBC's own
/// `TYPE_NAME` convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDictionary {
    /// Dimension-viable types with their per-type score.
    pub dimension_viable: HashMap<String, i64>,
    /// Fact-viable types with their per-type score.
    pub fact_viable: HashMap<String, i64>,
    /// Types that cannot be meaningfully summed or averaged (strings,
    /// dates, blobs) and so disqualify a column from fact consideration
    /// outright, regardless of any fact-viable score.
    pub fact_disqualifying: HashSet<String>,
}

impl TypeDictionary {
    /// The default English-language dictionary (spec.md §4.6.2).
    pub fn default_dictionary() -> Self {
        let dimension_viable = [
            ("VARCHAR", GOOD),
            ("CHAR", GOOD),
            ("BIT", GOOD),
            ("TEXT", NORMAL),
            ("DATE", GOOD),
            ("TIME", GOOD),
            ("TIMESTAMP", GOOD),
            ("DATETIME", GOOD),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let fact_viable = [
            ("DECIMAL", GOOD),
            ("NUMERIC", GOOD),
            ("INT", NORMAL),
            ("SMALLINT", NORMAL),
            ("SMALLINT UNSIGNED", NORMAL),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let fact_disqualifying = [
            "VARCHAR",
            "TEXT",
            "TIME",
            "TIMESTAMP",
            "DATE",
            "DATETIME",
            "LONGTEXT",
            "BLOB",
            "LONGBLOB",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        TypeDictionary { dimension_viable, fact_viable, fact_disqualifying }
    }

    /// Load a dictionary from its JSON representation (spec.md §4.6.2's
    /// "configurable dictionary" / §4.7's replaceable-input requirement).
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for TypeDictionary {
    fn default() -> Self {
        Self::default_dictionary()
    }
}

/// Scores a column by its declared type name against a [`TypeDictionary`].
#[derive(Debug)]
pub struct TypeBasedScorer {
    dictionary: TypeDictionary,
    fact: ScoringObjective,
    dim: ScoringObjective,
}

impl TypeBasedScorer {
    pub fn new() -> Self {
        Self::with_dictionary(TypeDictionary::default_dictionary())
    }

    pub fn with_dictionary(dictionary: TypeDictionary) -> Self {
        TypeBasedScorer { dictionary, fact: ScoringObjective::new("fact"), dim: ScoringObjective::new("dim") }
    }
}

impl Default for TypeBasedScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaVisitor for TypeBasedScorer {
    fn visit_column(&mut self, node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        let NodeRecord::Column(row) = &node.record else { return Ok(None) };
        let type_name = row.type_name.to_uppercase();

        if let Some(&score) = self.dictionary.dimension_viable.get(&type_name) {
            self.dim.add(NodeScore::new(&node.id, score, format!("type {type_name} is dimension-viable")));
        }

        if self.dictionary.fact_disqualifying.contains(&type_name) {
            self.fact.add(disqualify(&node.id, format!("type {type_name} cannot be summarised")));
        } else if let Some(&score) = self.dictionary.fact_viable.get(&type_name) {
            self.fact.add(NodeScore::new(&node.id, score, format!("type {type_name} is fact-viable")));
        }

        Ok(None)
    }
}

impl ColumnScorer for TypeBasedScorer {
    fn name(&self) -> &str {
        "type_based"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SchemaGraph;
    use crate::records::{ColumnRow, SchemaRow, TableRow};
    use crate::store::MetadataStore;
    use std::rc::Rc;

    fn store_with_column(type_name: &str) -> MetadataStore {
        let mut store = MetadataStore::new();
        store.insert_schema(SchemaRow { table_schem: None, table_catalog: "db".into() });
        store.insert_table(TableRow {
            table_cat: "db".into(),
            table_schem: None,
            table_name: "products".into(),
            table_type: "TABLE".into(),
            remarks: None,
            type_cat: None,
            type_schem: None,
            type_name: None,
            self_referencing_col_name: None,
            ref_generation: None,
        });
        store.insert_column(ColumnRow {
            table_cat: "db".into(),
            table_schem: None,
            table_name: "products".into(),
            column_name: "name".into(),
            data_type: 0,
            type_name: type_name.into(),
            column_size: None,
            buffer_length: None,
            decimal_digits: None,
            num_prec_radix: None,
            nullable: 1,
            remarks: None,
            column_def: None,
            sql_data_type: None,
            sql_datetime_sub: None,
            char_octet_length: None,
            ordinal_position: 1,
            is_nullable: "YES".into(),
            scope_catalog: None,
            scope_schema: None,
            scope_table: None,
            source_data_type: None,
            is_autoincrement: "NO".into(),
            is_generatedcolumn: "NO".into(),
        });
        store.reindex();
        store
    }

    #[test]
    fn varchar_is_dimension_viable_and_fact_disqualifying() {
        let graph = SchemaGraph::build(Rc::new(store_with_column("VARCHAR")), false).unwrap();
        let mut scorer = TypeBasedScorer::new();
        graph.accept_visitor(&mut scorer).unwrap();

        let col = crate::ids::column_id("db", None, "products", "name");
        assert_eq!(scorer.dim().total_for(&col), Some(GOOD));
        assert_eq!(scorer.fact().total_for(&col), Some(crate::scoring::DISQUALIFIED));
    }

    #[test]
    fn decimal_is_fact_viable_and_not_dimension_viable() {
        let graph = SchemaGraph::build(Rc::new(store_with_column("DECIMAL")), false).unwrap();
        let mut scorer = TypeBasedScorer::new();
        graph.accept_visitor(&mut scorer).unwrap();

        let col = crate::ids::column_id("db", None, "products", "name");
        assert_eq!(scorer.fact().total_for(&col), Some(GOOD));
        assert_eq!(scorer.dim().total_for(&col), None);
    }

    #[test]
    fn unknown_type_scores_nothing() {
        let graph = SchemaGraph::build(Rc::new(store_with_column("GEOMETRY")), false).unwrap();
        let mut scorer = TypeBasedScorer::new();
        graph.accept_visitor(&mut scorer).unwrap();

        let col = crate::ids::column_id("db", None, "products", "name");
        assert_eq!(scorer.fact().total_for(&col), None);
        assert_eq!(scorer.dim().total_for(&col), None);
    }
}
