//! Typed directed graph model of a database schema (spec.md §3–§4.2).
//!
//! Mirrors the teacher's `PetCodeGraph` (`examples/codeprysm-codeprysm/crates/codeprysm-core/src/graph.rs`):
//! a [`petgraph::stable_graph::StableGraph`] plus a `HashMap<String, NodeIndex>`
//! side index for O(1) id-based lookup. Node and edge kinds are tagged
//! variants instead of a string `node_type` field, so the compiler enforces
//! the taxonomy spec.md §3 defines.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ids;
use crate::records::{ColumnRow, ForeignKeyRow, PrimaryKeyRow, SchemaRow, TableRow, TypeInfoRow};
use crate::store::MetadataStore;

/// Tagged kind of a graph node (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Schema,
    Table,
    Column,
    Pk,
    Fk,
    Index,
    Type,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Schema => "schema",
            NodeKind::Table => "table",
            NodeKind::Column => "column",
            NodeKind::Pk => "pk",
            NodeKind::Fk => "fk",
            NodeKind::Index => "index",
            NodeKind::Type => "type",
        }
    }
}

/// Tagged kind of a graph edge, all directed (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    SchemaTable,
    TableColumn,
    ColumnTable,
    ColumnType,
    TablePk,
    PkColumn,
    TableFk,
    FkTable,
    ColumnFk,
    FkColumn,
    Reference,
    ReferenceBy,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::SchemaTable => "schema-table",
            EdgeKind::TableColumn => "table-column",
            EdgeKind::ColumnTable => "column-table",
            EdgeKind::ColumnType => "column-type",
            EdgeKind::TablePk => "table-pk",
            EdgeKind::PkColumn => "pk-column",
            EdgeKind::TableFk => "table-fk",
            EdgeKind::FkTable => "fk-table",
            EdgeKind::ColumnFk => "column-fk",
            EdgeKind::FkColumn => "fk-column",
            EdgeKind::Reference => "reference",
            EdgeKind::ReferenceBy => "reference-by",
        }
    }
}

/// A primary key's own metadata: its name plus its member column rows
/// (ordered as discovered; `key_seq` is carried on the `pk-column` edges).
#[derive(Debug, Clone, PartialEq)]
pub struct PkRecord {
    pub pk_name: Option<String>,
    pub members: Vec<PrimaryKeyRow>,
}

/// A foreign key's own metadata: its name plus its member column-pair rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FkRecord {
    pub fk_name: Option<String>,
    pub members: Vec<ForeignKeyRow>,
}

/// The per-kind payload carried by a graph node. Storing the record inline
/// (rather than an untyped attribute bag) retains full static typing per
/// spec.md §9 option (a).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRecord {
    Schema(SchemaRow),
    Table(TableRow),
    Column(ColumnRow),
    Pk(PkRecord),
    Fk(FkRecord),
    Type(TypeInfoRow),
    /// A synthesized type node for a `type_name` absent from the type table
    /// (spec.md §3 ignorable anomaly). `flagged` is always `true` for these.
    PlaceholderType { type_name: String, flagged: bool },
}

/// A node in the schema graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub record: NodeRecord,
}

impl GraphNode {
    /// Null-filtered attribute projection used for graph export (spec.md §3,
    /// §6, testable property 5): no node or edge attribute has a null value.
    pub fn attributes(&self) -> BTreeMap<String, Value> {
        let value = match &self.record {
            NodeRecord::Schema(r) => serde_json::to_value(r),
            NodeRecord::Table(r) => serde_json::to_value(r),
            NodeRecord::Column(r) => serde_json::to_value(r),
            NodeRecord::Pk(r) => {
                let mut map = serde_json::Map::new();
                map.insert("pk_name".to_string(), serde_json::to_value(&r.pk_name).unwrap_or(Value::Null));
                map.insert("member_count".to_string(), Value::from(r.members.len()));
                Ok(Value::Object(map))
            }
            NodeRecord::Fk(r) => {
                let mut map = serde_json::Map::new();
                map.insert("fk_name".to_string(), serde_json::to_value(&r.fk_name).unwrap_or(Value::Null));
                map.insert("member_count".to_string(), Value::from(r.members.len()));
                Ok(Value::Object(map))
            }
            NodeRecord::Type(r) => serde_json::to_value(r),
            NodeRecord::PlaceholderType { type_name, flagged } => {
                let mut map = serde_json::Map::new();
                map.insert("type_name".to_string(), Value::String(type_name.clone()));
                map.insert("synthesized".to_string(), Value::Bool(*flagged));
                Ok(Value::Object(map))
            }
        }
        .unwrap_or(Value::Null);

        let mut attrs = BTreeMap::new();
        attrs.insert("node_type".to_string(), Value::String(self.kind.as_str().to_string()));
        if let Value::Object(map) = value {
            for (k, v) in map {
                if !v.is_null() {
                    attrs.insert(k, v);
                }
            }
        }
        attrs
    }
}

/// The per-kind payload carried by an edge. `None` for edges with no
/// additional data beyond their kind (e.g. `schema-table`, `table-column`).
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeData {
    None,
    PkMember { key_seq: i32 },
    ForeignKey(ForeignKeyRow),
}

/// An edge in the schema graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub kind: EdgeKind,
    pub data: EdgeData,
}

impl GraphEdge {
    fn new(kind: EdgeKind) -> Self {
        GraphEdge { kind, data: EdgeData::None }
    }

    /// Null-filtered attribute projection used for graph export.
    pub fn attributes(&self) -> BTreeMap<String, Value> {
        let mut attrs = BTreeMap::new();
        attrs.insert("edge_type".to_string(), Value::String(self.kind.as_str().to_string()));
        match &self.data {
            EdgeData::None => {}
            EdgeData::PkMember { key_seq } => {
                attrs.insert("key_seq".to_string(), Value::from(*key_seq));
            }
            EdgeData::ForeignKey(row) => {
                if let Ok(Value::Object(map)) = serde_json::to_value(row) {
                    for (k, v) in map {
                        if !v.is_null() {
                            attrs.insert(k, v);
                        }
                    }
                }
            }
        }
        attrs
    }
}

/// Errors raised while constructing a [`SchemaGraph`] (spec.md §7).
#[derive(Debug, Error)]
pub enum GraphError {
    /// Metadata references a non-existent parent: a table whose schema isn't
    /// in the store, a column whose table isn't, or a key referencing a
    /// missing table/column. Fatal; construction does not produce a partial
    /// graph.
    #[error("structural error: {0}")]
    Structural(String),
}

/// A directed, typed graph of a database schema, built once from a
/// [`MetadataStore`] and immutable thereafter except for the score
/// write-back performed by [`crate::scoring`] (spec.md §3 lifecycle).
#[derive(Clone)]
pub struct SchemaGraph {
    pub(crate) inner: StableGraph<GraphNode, GraphEdge>,
    pub(crate) index: HashMap<String, NodeIndex>,
    pub(crate) store: Rc<MetadataStore>,
}

impl SchemaGraph {
    /// Build the full graph from a populated metadata store, following the
    /// insertion order in spec.md §4.2.
    pub fn build(store: Rc<MetadataStore>, include_type_nodes: bool) -> Result<Self, GraphError> {
        let mut g = SchemaGraph {
            inner: StableGraph::new(),
            index: HashMap::new(),
            store,
        };

        if include_type_nodes {
            for (id, row) in g.store.types() {
                g.insert_node(id.clone(), NodeKind::Type, NodeRecord::Type(row.clone()));
            }
        }

        for (id, row) in g.store.schemas() {
            g.insert_node(id.clone(), NodeKind::Schema, NodeRecord::Schema(row.clone()));
        }

        for (id, row) in g.store.tables() {
            let from_schema = ids::schema_id(&row.table_cat, row.table_schem.as_deref());
            if !g.index.contains_key(&from_schema) {
                return Err(GraphError::Structural(format!(
                    "table {id} references schema {from_schema} which is not in the store"
                )));
            }
            g.insert_node(id.clone(), NodeKind::Table, NodeRecord::Table(row.clone()));
            g.insert_edge(&from_schema, id, GraphEdge::new(EdgeKind::SchemaTable));
        }

        let mut synthesized_types: HashMap<String, bool> = HashMap::new();
        for (id, row) in g.store.columns() {
            let from_table = ids::table_id(&row.table_cat, row.table_schem.as_deref(), &row.table_name);
            if !g.index.contains_key(&from_table) {
                return Err(GraphError::Structural(format!(
                    "column {id} references table {from_table} which is not in the store"
                )));
            }
            g.insert_node(id.clone(), NodeKind::Column, NodeRecord::Column(row.clone()));
            g.insert_edge(&from_table, id, GraphEdge::new(EdgeKind::TableColumn));
            g.insert_edge(id, &from_table, GraphEdge::new(EdgeKind::ColumnTable));

            if include_type_nodes {
                let to_type = ids::type_id(&row.type_name);
                if !g.index.contains_key(&to_type) && !synthesized_types.contains_key(&to_type) {
                    warn!("column {id} references unknown type {}; synthesizing placeholder", row.type_name);
                    synthesized_types.insert(to_type.clone(), true);
                    g.insert_node(
                        to_type.clone(),
                        NodeKind::Type,
                        NodeRecord::PlaceholderType { type_name: row.type_name.clone(), flagged: true },
                    );
                }
                g.insert_edge(id, &to_type, GraphEdge::new(EdgeKind::ColumnType));
            }
        }

        for (id, rows) in g.store.pks() {
            let first = &rows[0];
            let from_table = ids::table_id(&first.table_cat, first.table_schem.as_deref(), &first.table_name);
            if !g.index.contains_key(&from_table) {
                return Err(GraphError::Structural(format!(
                    "primary key {id} references table {from_table} which is not in the store"
                )));
            }
            g.insert_node(
                id.clone(),
                NodeKind::Pk,
                NodeRecord::Pk(PkRecord { pk_name: first.pk_name.clone(), members: rows.clone() }),
            );
            g.insert_edge(&from_table, id, GraphEdge::new(EdgeKind::TablePk));

            for row in rows {
                let of_column = ids::column_id(
                    &row.table_cat,
                    row.table_schem.as_deref(),
                    &row.table_name,
                    &row.column_name,
                );
                if !g.index.contains_key(&of_column) {
                    return Err(GraphError::Structural(format!(
                        "primary key {id} references column {of_column} which is not in the store"
                    )));
                }
                g.insert_edge(
                    id,
                    &of_column,
                    GraphEdge { kind: EdgeKind::PkColumn, data: EdgeData::PkMember { key_seq: row.key_seq } },
                );
            }
        }

        for (id, rows) in g.store.fks() {
            let first = &rows[0];
            let pk_table = ids::table_id(&first.pktable_cat, first.pktable_schem.as_deref(), &first.pktable_name);
            let fk_table = ids::table_id(&first.fktable_cat, first.fktable_schem.as_deref(), &first.fktable_name);
            if !g.index.contains_key(&pk_table) {
                return Err(GraphError::Structural(format!(
                    "foreign key {id} references table {pk_table} which is not in the store"
                )));
            }
            if !g.index.contains_key(&fk_table) {
                return Err(GraphError::Structural(format!(
                    "foreign key {id} references table {fk_table} which is not in the store"
                )));
            }

            g.insert_node(
                id.clone(),
                NodeKind::Fk,
                NodeRecord::Fk(FkRecord { fk_name: first.fk_name.clone(), members: rows.clone() }),
            );
            g.insert_edge(&fk_table, id, GraphEdge::new(EdgeKind::TableFk));
            g.insert_edge(id, &pk_table, GraphEdge::new(EdgeKind::FkTable));

            for row in rows {
                let fk_column = ids::column_id(
                    &row.fktable_cat,
                    row.fktable_schem.as_deref(),
                    &row.fktable_name,
                    &row.fkcolumn_name,
                );
                let pk_column = ids::column_id(
                    &row.pktable_cat,
                    row.pktable_schem.as_deref(),
                    &row.pktable_name,
                    &row.pkcolumn_name,
                );
                if !g.index.contains_key(&fk_column) {
                    return Err(GraphError::Structural(format!(
                        "foreign key {id} references column {fk_column} which is not in the store"
                    )));
                }
                if !g.index.contains_key(&pk_column) {
                    return Err(GraphError::Structural(format!(
                        "foreign key {id} references column {pk_column} which is not in the store"
                    )));
                }

                g.insert_edge(
                    &fk_column,
                    id,
                    GraphEdge { kind: EdgeKind::ColumnFk, data: EdgeData::ForeignKey(row.clone()) },
                );
                g.insert_edge(
                    id,
                    &pk_column,
                    GraphEdge { kind: EdgeKind::FkColumn, data: EdgeData::ForeignKey(row.clone()) },
                );
                g.insert_edge(
                    &fk_column,
                    &pk_column,
                    GraphEdge { kind: EdgeKind::Reference, data: EdgeData::ForeignKey(row.clone()) },
                );
                g.insert_edge(
                    &pk_column,
                    &fk_column,
                    GraphEdge { kind: EdgeKind::ReferenceBy, data: EdgeData::ForeignKey(row.clone()) },
                );
            }
        }

        info!(
            "built schema graph: {} nodes, {} edges",
            g.inner.node_count(),
            g.inner.edge_count()
        );

        Ok(g)
    }

    fn insert_node(&mut self, id: String, kind: NodeKind, record: NodeRecord) -> NodeIndex {
        if let Some(&existing) = self.index.get(&id) {
            debug!("replacing existing node {id}");
            self.inner.remove_node(existing);
        }
        let idx = self.inner.add_node(GraphNode { id: id.clone(), kind, record });
        self.index.insert(id, idx);
        idx
    }

    fn insert_edge(&mut self, from: &str, to: &str, edge: GraphEdge) -> Option<EdgeIndex> {
        let from_idx = *self.index.get(from)?;
        let to_idx = *self.index.get(to)?;
        Some(self.inner.add_edge(from_idx, to_idx, edge))
    }

    /// Shared handle to the metadata store backing this graph.
    pub fn store(&self) -> &Rc<MetadataStore> {
        &self.store
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).and_then(|&idx| self.inner.node_weight(idx))
    }

    pub fn node_by_index(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.inner.node_weight(idx)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.inner.node_weights()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.inner.node_weights().filter(move |n| n.kind == kind)
    }

    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.inner.edges_directed(idx, Direction::Incoming).count()
    }

    pub fn out_edges(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &GraphEdge)> {
        self.inner.edges_directed(idx, Direction::Outgoing).map(|e| (e.target(), e.weight()))
    }

    pub fn in_edges(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &GraphEdge)> {
        self.inner.edges_directed(idx, Direction::Incoming).map(|e| (e.source(), e.weight()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ColumnRow, PrimaryKeyRow, SchemaRow, TableRow};
    use crate::store::MetadataStore;

    fn column_row(table: &str, name: &str, type_name: &str) -> ColumnRow {
        ColumnRow {
            table_cat: "db".into(),
            table_schem: None,
            table_name: table.into(),
            column_name: name.into(),
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
        }
    }

    fn single_table_store() -> MetadataStore {
        let mut store = MetadataStore::new();
        store.insert_schema(SchemaRow { table_schem: None, table_catalog: "db".into() });
        store.insert_table(TableRow {
            table_cat: "db".into(),
            table_schem: None,
            table_name: "orders".into(),
            table_type: "TABLE".into(),
            remarks: None,
            type_cat: None,
            type_schem: None,
            type_name: None,
            self_referencing_col_name: None,
            ref_generation: None,
        });
        store.insert_column(column_row("orders", "id", "INT"));
        store.insert_column(column_row("orders", "total", "DECIMAL"));
        store.insert_primary_key(PrimaryKeyRow {
            table_cat: "db".into(),
            table_schem: None,
            table_name: "orders".into(),
            column_name: "id".into(),
            key_seq: 1,
            pk_name: Some("orders_pkey".into()),
        });
        store.reindex();
        store
    }

    #[test]
    fn builds_schema_table_column_pk_edges() {
        let store = Rc::new(single_table_store());
        let graph = SchemaGraph::build(store, false).unwrap();

        // 1 schema + 1 table + 2 columns + 1 pk = 5 nodes
        assert_eq!(graph.node_count(), 5);

        let table_id = ids::table_id("db", None, "orders");
        let schema_id = ids::schema_id("db", None);
        let id_col = ids::column_id("db", None, "orders", "id");

        assert!(graph.contains_node(&table_id));
        let table_idx = graph.node_index(&table_id).unwrap();
        let schema_idx = graph.node_index(&schema_id).unwrap();
        assert_eq!(graph.in_degree(table_idx), 1);
        assert_eq!(graph.in_degree(schema_idx), 0);

        let id_idx = graph.node_index(&id_col).unwrap();
        let table_edges: Vec<_> = graph
            .out_edges(table_idx)
            .filter(|(_, e)| e.kind == EdgeKind::TableColumn)
            .collect();
        assert_eq!(table_edges.len(), 2);

        let col_to_table: Vec<_> = graph
            .out_edges(id_idx)
            .filter(|(_, e)| e.kind == EdgeKind::ColumnTable)
            .collect();
        assert_eq!(col_to_table.len(), 1);
    }

    #[test]
    fn missing_parent_schema_is_structural_error() {
        let mut store = MetadataStore::new();
        store.insert_table(TableRow {
            table_cat: "db".into(),
            table_schem: None,
            table_name: "orphan".into(),
            table_type: "TABLE".into(),
            remarks: None,
            type_cat: None,
            type_schem: None,
            type_name: None,
            self_referencing_col_name: None,
            ref_generation: None,
        });
        store.reindex();

        let err = SchemaGraph::build(Rc::new(store), false).unwrap_err();
        assert!(matches!(err, GraphError::Structural(_)));
    }

    #[test]
    fn node_attributes_contain_no_null_values() {
        let store = Rc::new(single_table_store());
        let graph = SchemaGraph::build(store, false).unwrap();
        for node in graph.nodes() {
            for (_, v) in node.attributes() {
                assert!(!v.is_null());
            }
        }
    }
}
