//! Database schema graph modeling and star-schema fact/dimension scoring.
//!
//! This crate turns relational database metadata (catalogs, schemas,
//! tables, columns, primary and foreign keys, type info) into a typed
//! directed graph, partitions that graph into foreign-key-connected
//! sub-models, and runs composable heuristic scorers over a visitor-driven
//! traversal to rank columns as fact-measure or dimension-attribute
//! candidates for a star-schema data warehouse design.
//!
//! The crate never talks to a live database itself: callers populate a
//! [`store::MetadataStore`] either from an in-process [`source::MetadataSource`]
//! implementation or from a previously persisted bundle, then build a
//! [`graph::SchemaGraph`] from it.

pub mod graph;
pub mod ids;
pub mod records;
pub mod scoring;
pub mod source;
pub mod store;
pub mod submodel;
pub mod visitor;
pub mod words;

/// Commonly used types re-exported for `use schema_graph::prelude::*;`.
pub mod prelude {
    pub use crate::graph::{EdgeKind, GraphEdge, GraphError, GraphNode, NodeKind, NodeRecord, SchemaGraph};
    pub use crate::records::{
        AnyRecord, ColumnRow, ForeignKeyRow, IndexInfoRow, PrimaryKeyRow, SchemaRow, TableRow, TypeInfoRow,
    };
    pub use crate::scoring::composite::{add_fact_and_dim_scores, CompositeScorer};
    pub use crate::scoring::key_disqualification::KeyDisqualificationScorer;
    pub use crate::scoring::keyword::{KeywordDictionary, KeywordScorer};
    pub use crate::scoring::type_based::{TypeBasedScorer, TypeDictionary};
    pub use crate::scoring::{disqualify, ColumnScorer, NodeScore, ScoringObjective, DISQUALIFIED, GOOD, NORMAL};
    pub use crate::source::{MetadataSource, Pattern};
    pub use crate::store::{MetadataStore, StoreError};
    pub use crate::submodel::{extract_sub_models, SubModel};
    pub use crate::visitor::{
        NavDirective, NoopSchemaVisitor, SchemaVisitor, VisitContext, VisitNavigation, VisitorError,
    };
}
