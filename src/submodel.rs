//! Sub-model partitioning (spec.md §5): split a schema graph into its
//! foreign-key-connected components so that scoring and warehouse design can
//! proceed one cohesive cluster of tables at a time.
//!
//! Connectivity is computed over the `reference`/`reference-by` column edges
//! collapsed to their owning tables, using Tarjan's algorithm
//! ([`petgraph::algo::tarjan_scc`]) — already a dependency of this crate via
//! [`crate::graph`], so no new crate is introduced for this.
//!
//! Both `reference` (fk column -> pk column) and `reference-by` (pk column ->
//! fk column) are collapsed, so two tables joined by a single unidirectional
//! foreign key end up with edges in both directions at the table level and
//! form one nontrivial SCC — not because the relationship is bidirectional in
//! the schema, but because `reference-by`'s mirror edge is.

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{Graph, NodeIndex as TableNodeIndex};
use petgraph::Direction;
use tracing::{debug, info};

use crate::graph::{EdgeKind, NodeKind, SchemaGraph};

/// One FK-connected cluster of tables, plus the schema and type nodes that
/// give it context.
#[derive(Debug, Clone)]
pub struct SubModel {
    /// Table node ids that belong to this cluster.
    pub tables: Vec<String>,
    /// Schema node ids that own at least one table in this cluster. A table
    /// whose schema is shared by another cluster's tables means that schema
    /// id appears in more than one `SubModel` (spec.md §5 documented
    /// anomaly: sub-models are not forced disjoint across schema context).
    pub schemas: Vec<String>,
    /// Type node ids referenced by at least one column in this cluster's
    /// tables, when the graph was built with type nodes included.
    pub types: Vec<String>,
}

/// Partition a schema graph into FK-connected sub-models.
///
/// Tables with no foreign-key relationship to any other table (singleton
/// components) are discarded: a lone table isn't a "model" to partition
/// into, it's just a table.
pub fn extract_sub_models(graph: &SchemaGraph) -> Vec<SubModel> {
    let mut table_graph: Graph<String, ()> = Graph::new();
    let mut node_for_table: HashMap<String, TableNodeIndex> = HashMap::new();

    for node in graph.nodes_of_kind(NodeKind::Table) {
        let idx = table_graph.add_node(node.id.clone());
        node_for_table.insert(node.id.clone(), idx);
    }

    let owning_table = |col_idx: petgraph::stable_graph::NodeIndex| -> Option<petgraph::stable_graph::NodeIndex> {
        graph.out_edges(col_idx).find(|(_, e)| e.kind == EdgeKind::ColumnTable).map(|(dst, _)| dst)
    };

    for node in graph.nodes_of_kind(NodeKind::Column) {
        let col_idx = graph.node_index(&node.id).expect("indexed node must resolve");
        for (dst_idx, edge) in graph.out_edges(col_idx) {
            if edge.kind != EdgeKind::Reference && edge.kind != EdgeKind::ReferenceBy {
                continue;
            }
            let (Some(from_table), Some(to_table)) = (owning_table(col_idx), owning_table(dst_idx)) else {
                continue;
            };
            let from_id = &graph.node_by_index(from_table).unwrap().id;
            let to_id = &graph.node_by_index(to_table).unwrap().id;
            if let (Some(&a), Some(&b)) = (node_for_table.get(from_id), node_for_table.get(to_id)) {
                table_graph.add_edge(a, b, ());
            }
        }
    }

    let components = tarjan_scc(&table_graph);
    debug!("tarjan_scc found {} components over {} tables", components.len(), table_graph.node_count());

    let mut models = Vec::new();
    for component in components {
        if component.len() < 2 && !has_self_reference(&table_graph, component[0]) {
            continue;
        }

        let tables: Vec<String> = component.iter().map(|&idx| table_graph[idx].clone()).collect();
        let mut schemas: HashSet<String> = HashSet::new();
        let mut types: HashSet<String> = HashSet::new();

        for table_id in &tables {
            let table_idx = graph.node_index(table_id).expect("indexed node must resolve");
            for (src, e) in graph.in_edges(table_idx) {
                if e.kind == EdgeKind::SchemaTable {
                    schemas.insert(graph.node_by_index(src).unwrap().id.clone());
                }
            }
            for (col_idx, e) in graph.out_edges(table_idx) {
                if e.kind == EdgeKind::TableColumn {
                    for (type_idx, e2) in graph.out_edges(col_idx) {
                        if e2.kind == EdgeKind::ColumnType {
                            types.insert(graph.node_by_index(type_idx).unwrap().id.clone());
                        }
                    }
                }
            }
        }

        models.push(SubModel {
            tables,
            schemas: schemas.into_iter().collect(),
            types: types.into_iter().collect(),
        });
    }

    info!("extracted {} sub-models", models.len());
    models
}

fn has_self_reference(g: &Graph<String, ()>, idx: TableNodeIndex) -> bool {
    g.neighbors_directed(idx, Direction::Outgoing).any(|n| n == idx)
}
