//! Visitor-driven depth-first traversal of a schema graph (spec.md §4.4).
//!
//! The traversal is iterative (an explicit stack, not recursion) so that
//! pathologically deep fk chains can't blow the call stack. It dispatches
//! per-node-kind to a [`SchemaVisitor`] callback plus a dedicated callback for
//! `reference` edges, and lets each callback return a navigation directive —
//! the set of outgoing edge kinds to descend into from that node. When a
//! callback returns nothing the driver consults a fallback [`VisitNavigation`]
//! map, first by the kind of the inbound edge, then by the node's own kind.
//! Children are pushed in a canonical kind order (schema, table, column, pk,
//! fk) and, within a kind, in a fixed order reversed before pushing so that
//! popping the stack yields first-discovered-first-visited order despite the
//! stack being LIFO.

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::NodeIndex;
use thiserror::Error;
use tracing::debug;

use crate::graph::{EdgeKind, GraphNode, NodeKind, SchemaGraph};

/// Errors raised during traversal.
#[derive(Debug, Error)]
pub enum VisitorError {
    #[error("cycle detected: node {0} reached itself within two hops")]
    Cycle(String),

    #[error("visitor callback failed: {0}")]
    Callback(String),
}

/// Context passed to every visitor callback: the graph being traversed (so a
/// callback can look up related nodes), the current depth, and the path of
/// node ids from the traversal root down to (but excluding) the current node.
pub struct VisitContext<'g> {
    pub graph: &'g SchemaGraph,
    pub depth: usize,
    pub path: Vec<String>,
}

/// What a visitor callback returns: the navigation directive for that node
/// (which outgoing edge kinds to descend into next), or `None` to defer to
/// the driver's fallback [`VisitNavigation`].
pub type NavDirective = Option<HashSet<EdgeKind>>;

/// Callback interface for a schema-graph traversal. Every method has a
/// no-op default (returning no navigation opinion) so implementors only
/// override what they need.
pub trait SchemaVisitor {
    fn visit_schema(&mut self, _node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        Ok(None)
    }
    fn visit_table(&mut self, _node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        Ok(None)
    }
    fn visit_column(&mut self, _node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        Ok(None)
    }
    fn visit_pk(&mut self, _node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        Ok(None)
    }
    fn visit_fk(&mut self, _node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        Ok(None)
    }
    /// Called once per `reference` edge discovered (a foreign-key column
    /// pointing at the primary-key column it references), in place of the
    /// ordinary `visit_column` call that would otherwise fire on the
    /// destination.
    fn visit_reference(
        &mut self,
        _from: &GraphNode,
        _to: &GraphNode,
        _ctx: &VisitContext,
    ) -> Result<(), VisitorError> {
        Ok(())
    }
}

/// A [`SchemaVisitor`] that does nothing; useful as a base to delegate to
/// from a visitor that only cares about one or two callbacks.
#[derive(Debug, Default)]
pub struct NoopSchemaVisitor;

impl SchemaVisitor for NoopSchemaVisitor {}

/// Fallback navigation map consulted when a visitor callback returns `None`:
/// which outgoing edge kinds to follow from a node, looked up first by the
/// kind of the edge that led to the node, then by the node's own kind.
#[derive(Debug, Clone, Default)]
pub struct VisitNavigation {
    by_edge_kind: HashMap<EdgeKind, HashSet<EdgeKind>>,
    by_node_kind: HashMap<NodeKind, HashSet<EdgeKind>>,
}

impl VisitNavigation {
    pub fn new() -> Self {
        VisitNavigation::default()
    }

    /// Register the edge kinds to follow when arriving at a node of `kind`
    /// with no more specific inbound-edge override.
    pub fn with_node_kind(mut self, kind: NodeKind, edges: impl IntoIterator<Item = EdgeKind>) -> Self {
        self.by_node_kind.insert(kind, edges.into_iter().collect());
        self
    }

    /// Register the edge kinds to follow when arriving at a node via an
    /// inbound edge of `kind`, overriding the per-node-kind default.
    pub fn with_edge_kind(mut self, kind: EdgeKind, edges: impl IntoIterator<Item = EdgeKind>) -> Self {
        self.by_edge_kind.insert(kind, edges.into_iter().collect());
        self
    }

    /// The standard navigation map (spec.md §4.4): `schema -> schema-table`,
    /// `table -> {table-column, table-pk, table-fk}`, `column -> reference`.
    /// Acyclic by construction: `pk` and `fk` nodes have no further children,
    /// and `reference` edges never loop back onto the node just visited.
    pub fn standard() -> Self {
        VisitNavigation::new()
            .with_node_kind(NodeKind::Schema, [EdgeKind::SchemaTable])
            .with_node_kind(
                NodeKind::Table,
                [EdgeKind::TableColumn, EdgeKind::TablePk, EdgeKind::TableFk],
            )
            .with_node_kind(NodeKind::Column, [EdgeKind::Reference])
    }

    fn resolve(&self, inbound: Option<EdgeKind>, kind: NodeKind) -> HashSet<EdgeKind> {
        if let Some(edge_kind) = inbound {
            if let Some(set) = self.by_edge_kind.get(&edge_kind) {
                return set.clone();
            }
        }
        self.by_node_kind.get(&kind).cloned().unwrap_or_default()
    }
}

struct StackEntry {
    idx: NodeIndex,
    depth: usize,
    path: Vec<String>,
    inbound: Option<EdgeKind>,
}

/// The canonical child-expansion order: within a node's outgoing edges,
/// children are grouped by destination kind in this order before being
/// pushed onto the traversal stack.
const KIND_ORDER: [NodeKind; 5] =
    [NodeKind::Schema, NodeKind::Table, NodeKind::Column, NodeKind::Pk, NodeKind::Fk];

impl SchemaGraph {
    /// Run `visitor` over this graph starting from every schema node (the
    /// graph's natural roots, spec.md §4.4's in-degree-zero starting points),
    /// using the standard navigation map as the fallback for any callback
    /// that returns no directive of its own.
    pub fn accept_visitor<V: SchemaVisitor>(&self, visitor: &mut V) -> Result<(), VisitorError> {
        self.accept_visitor_with_nav(visitor, &VisitNavigation::standard())
    }

    /// As [`SchemaGraph::accept_visitor`], but with a caller-supplied
    /// fallback navigation map instead of the standard one.
    pub fn accept_visitor_with_nav<V: SchemaVisitor>(
        &self,
        visitor: &mut V,
        fallback_nav: &VisitNavigation,
    ) -> Result<(), VisitorError> {
        // Roots are every node of in-degree zero, per spec.md §4.4 ("typically
        // schemas and unreferenced types"), not just schema nodes: an
        // unreferenced type node (no column pointing at it) is also a root.
        let roots: Vec<NodeIndex> =
            self.inner.node_indices().filter(|&idx| self.in_degree(idx) == 0).collect();

        for root in roots {
            self.visit_from(root, visitor, fallback_nav)?;
        }
        Ok(())
    }

    // Deliberately no visited-set: the source detects only length-2 cycles
    // and trusts the navigation map otherwise (spec.md §9). Adding a general
    // visited-set would change visit semantics scorers rely on (observing a
    // column once per incoming `reference` edge). The standard navigation
    // map is acyclic and gives each node exactly one parent, so no node is
    // pushed onto the stack twice under normal configurations anyway.
    fn visit_from<V: SchemaVisitor>(
        &self,
        root: NodeIndex,
        visitor: &mut V,
        fallback_nav: &VisitNavigation,
    ) -> Result<(), VisitorError> {
        let mut stack = vec![StackEntry { idx: root, depth: 0, path: Vec::new(), inbound: None }];

        while let Some(entry) = stack.pop() {
            let node = self.node_by_index(entry.idx).expect("stack only holds live indices");

            if entry.path.len() >= 2 && entry.path[entry.path.len() - 2] == node.id {
                return Err(VisitorError::Cycle(node.id.clone()));
            }

            let ctx = VisitContext { graph: self, depth: entry.depth, path: entry.path.clone() };
            debug!("visiting {} (depth {})", node.id, entry.depth);

            let directive = match node.kind {
                NodeKind::Schema => visitor.visit_schema(node, &ctx)?,
                NodeKind::Table => visitor.visit_table(node, &ctx)?,
                NodeKind::Column => visitor.visit_column(node, &ctx)?,
                NodeKind::Pk => visitor.visit_pk(node, &ctx)?,
                NodeKind::Fk => visitor.visit_fk(node, &ctx)?,
                NodeKind::Index | NodeKind::Type => None,
            };
            let nav = directive.unwrap_or_else(|| fallback_nav.resolve(entry.inbound, node.kind));

            for (to_idx, edge) in self.out_edges(entry.idx) {
                if edge.kind == EdgeKind::Reference && nav.contains(&EdgeKind::Reference) {
                    let to_node = self.node_by_index(to_idx).expect("live index");
                    visitor.visit_reference(node, to_node, &ctx)?;
                }
            }

            let mut children: Vec<(NodeIndex, NodeKind, EdgeKind)> = self
                .out_edges(entry.idx)
                .filter(|(_, e)| e.kind != EdgeKind::Reference && nav.contains(&e.kind))
                .filter_map(|(dst, e)| self.node_by_index(dst).map(|n| (dst, n.kind, e.kind)))
                .collect();

            children.sort_by_key(|(_, kind, _)| KIND_ORDER.iter().position(|k| k == kind).unwrap_or(usize::MAX));

            let mut next_path = entry.path.clone();
            next_path.push(node.id.clone());
            for (child_idx, _, edge_kind) in children.into_iter().rev() {
                stack.push(StackEntry {
                    idx: child_idx,
                    depth: entry.depth + 1,
                    path: next_path.clone(),
                    inbound: Some(edge_kind),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ColumnRow, SchemaRow, TableRow};
    use crate::store::MetadataStore;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingVisitor {
        tables: usize,
        columns: usize,
        order: Vec<String>,
    }

    impl SchemaVisitor for CountingVisitor {
        fn visit_table(&mut self, node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
            self.tables += 1;
            self.order.push(node.id.clone());
            Ok(None)
        }
        fn visit_column(&mut self, node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
            self.columns += 1;
            self.order.push(node.id.clone());
            Ok(None)
        }
    }

    fn small_graph() -> SchemaGraph {
        let mut store = MetadataStore::new();
        store.insert_schema(SchemaRow { table_schem: None, table_catalog: "db".into() });
        store.insert_table(TableRow {
            table_cat: "db".into(),
            table_schem: None,
            table_name: "t".into(),
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
            table_name: "t".into(),
            column_name: "c".into(),
            data_type: 0,
            type_name: "INT".into(),
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
        SchemaGraph::build(Rc::new(store), false).unwrap()
    }

    #[test]
    fn visits_every_table_and_column_once() {
        let graph = small_graph();
        let mut v = CountingVisitor::default();
        graph.accept_visitor(&mut v).unwrap();
        assert_eq!(v.tables, 1);
        assert_eq!(v.columns, 1);
    }

    #[test]
    fn visits_table_before_its_columns() {
        let graph = small_graph();
        let mut v = CountingVisitor::default();
        graph.accept_visitor(&mut v).unwrap();
        let table_pos = v.order.iter().position(|id| id.starts_with("table://")).unwrap();
        let column_pos = v.order.iter().position(|id| id.starts_with("column://")).unwrap();
        assert!(table_pos < column_pos);
    }

    #[test]
    fn empty_navigation_halts_descent() {
        let graph = small_graph();
        let mut v = CountingVisitor::default();
        graph.accept_visitor_with_nav(&mut v, &VisitNavigation::new()).unwrap();
        assert_eq!(v.tables, 0);
        assert_eq!(v.columns, 0);
    }
}
