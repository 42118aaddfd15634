//! Integration tests exercising the full pipeline: metadata store → schema
//! graph → sub-model extraction → visitor traversal → composite scoring.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use schema_graph::prelude::*;
use schema_graph::ids;

fn table_row(name: &str) -> TableRow {
    TableRow {
        table_cat: "retail".into(),
        table_schem: Some("public".into()),
        table_name: name.into(),
        table_type: "TABLE".into(),
        remarks: None,
        type_cat: None,
        type_schem: None,
        type_name: None,
        self_referencing_col_name: None,
        ref_generation: None,
    }
}

fn column_row(table: &str, name: &str, type_name: &str) -> ColumnRow {
    ColumnRow {
        table_cat: "retail".into(),
        table_schem: Some("public".into()),
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

fn pk_row(table: &str, col: &str, pk_name: &str) -> PrimaryKeyRow {
    PrimaryKeyRow {
        table_cat: "retail".into(),
        table_schem: Some("public".into()),
        table_name: table.into(),
        column_name: col.into(),
        key_seq: 1,
        pk_name: Some(pk_name.into()),
    }
}

fn fk_row(pk_table: &str, pk_col: &str, fk_table: &str, fk_col: &str, fk_name: &str) -> ForeignKeyRow {
    ForeignKeyRow {
        pktable_cat: "retail".into(),
        pktable_schem: Some("public".into()),
        pktable_name: pk_table.into(),
        pkcolumn_name: pk_col.into(),
        fktable_cat: "retail".into(),
        fktable_schem: Some("public".into()),
        fktable_name: fk_table.into(),
        fkcolumn_name: fk_col.into(),
        key_seq: 1,
        update_rule: 0,
        delete_rule: 0,
        fk_name: Some(fk_name.into()),
        pk_name: None,
        deferrability: 0,
    }
}

/// Builds a small retail schema: customers <- orders -> products, plus one
/// unrelated "audit_log" table with no keys at all, to exercise sub-model
/// extraction, null purity, and scoring together.
fn build_retail_store() -> MetadataStore {
    let mut store = MetadataStore::new();
    store.insert_schema(SchemaRow { table_schem: Some("public".into()), table_catalog: "retail".into() });

    store.insert_table(table_row("customers"));
    store.insert_table(table_row("products"));
    store.insert_table(table_row("orders"));
    store.insert_table(table_row("audit_log"));

    store.insert_column(column_row("customers", "id", "INTEGER"));
    store.insert_column(column_row("customers", "name", "VARCHAR"));
    store.insert_column(column_row("customers", "region", "VARCHAR"));

    store.insert_column(column_row("products", "id", "INTEGER"));
    store.insert_column(column_row("products", "title", "VARCHAR"));
    store.insert_column(column_row("products", "unit_price", "DECIMAL"));

    store.insert_column(column_row("orders", "id", "INTEGER"));
    store.insert_column(column_row("orders", "customer_id", "INTEGER"));
    store.insert_column(column_row("orders", "product_id", "INTEGER"));
    store.insert_column(column_row("orders", "total_amount", "DECIMAL"));
    store.insert_column(column_row("orders", "quantity", "INTEGER"));
    store.insert_column(column_row("orders", "status", "VARCHAR"));

    store.insert_column(column_row("audit_log", "id", "INTEGER"));
    store.insert_column(column_row("audit_log", "message", "TEXT"));

    store.insert_primary_key(pk_row("customers", "id", "customers_pkey"));
    store.insert_primary_key(pk_row("products", "id", "products_pkey"));
    store.insert_primary_key(pk_row("orders", "id", "orders_pkey"));
    store.insert_primary_key(pk_row("audit_log", "id", "audit_log_pkey"));

    store.insert_foreign_key(fk_row("customers", "id", "orders", "customer_id", "fk_orders_customer"));
    store.insert_foreign_key(fk_row("products", "id", "orders", "product_id", "fk_orders_product"));

    store.reindex();
    store
}

#[test]
fn graph_build_produces_bidirectional_edges_and_full_pk_membership() {
    let store = Rc::new(build_retail_store());
    let graph = SchemaGraph::build(store, false).unwrap();

    // 1 schema + 4 tables + 14 columns + 4 pks + 2 fks = 25 nodes
    assert_eq!(graph.node_count(), 25);

    let orders_id = graph.node_index(&ids::column_id("retail", Some("public"), "orders", "id")).unwrap();
    let orders_table = graph.node_index(&ids::table_id("retail", Some("public"), "orders")).unwrap();

    let forward = graph.out_edges(orders_table).any(|(to, e)| to == orders_id && e.kind == EdgeKind::TableColumn);
    let backward = graph.out_edges(orders_id).any(|(to, e)| to == orders_table && e.kind == EdgeKind::ColumnTable);
    assert!(forward && backward);
}

#[test]
fn sub_model_extraction_groups_fk_connected_tables_and_drops_the_singleton() {
    let store = Rc::new(build_retail_store());
    let graph = SchemaGraph::build(store, false).unwrap();
    let models = extract_sub_models(&graph);

    assert_eq!(models.len(), 1, "customers/orders/products form one connected cluster");
    let table_names: Vec<&str> = models[0]
        .tables
        .iter()
        .map(|id| id.rsplit('.').next().unwrap())
        .collect();
    assert!(table_names.contains(&"orders"));
    assert!(table_names.contains(&"customers"));
    assert!(table_names.contains(&"products"));
    assert!(!table_names.contains(&"audit_log"), "the keyless audit_log table is not part of any sub-model");
}

#[test]
fn visitor_reaches_every_fk_column_via_reference_edges() {
    let store = Rc::new(build_retail_store());
    let graph = SchemaGraph::build(store, false).unwrap();

    struct ReferenceCollector {
        pairs: Vec<(String, String)>,
    }
    impl SchemaVisitor for ReferenceCollector {
        fn visit_reference(&mut self, from: &GraphNode, to: &GraphNode, _ctx: &VisitContext) -> Result<(), VisitorError> {
            self.pairs.push((from.id.clone(), to.id.clone()));
            Ok(())
        }
    }

    let mut collector = ReferenceCollector { pairs: Vec::new() };
    graph.accept_visitor(&mut collector).unwrap();

    assert_eq!(collector.pairs.len(), 2, "two foreign keys, one reference edge each");
}

#[test]
fn scoring_disqualifies_keys_and_favors_fact_measures_and_dim_attributes() {
    let store = Rc::new(build_retail_store());
    let graph = SchemaGraph::build(store, false).unwrap();

    let composite = CompositeScorer::new(vec![
        Box::new(TypeBasedScorer::new()),
        Box::new(KeyDisqualificationScorer::new()),
        Box::new(KeywordScorer::new()),
    ]);
    let scores = add_fact_and_dim_scores(&graph, composite).unwrap();

    let orders_id = ids::column_id("retail", Some("public"), "orders", "id");
    let customer_fk = ids::column_id("retail", Some("public"), "orders", "customer_id");
    let total_amount = ids::column_id("retail", Some("public"), "orders", "total_amount");
    let customer_name = ids::column_id("retail", Some("public"), "customers", "name");
    let customer_region = ids::column_id("retail", Some("public"), "customers", "region");

    assert!(scores[&orders_id].0 < 0, "primary key column is disqualified as a fact measure");
    assert!(scores[&customer_fk].0 < 0, "foreign key column is disqualified as a fact measure");
    assert!(scores[&total_amount].0 > 0, "total_amount scores positively as a fact measure");
    assert!(scores[&customer_name].1 > 0, "name scores positively as a dimension attribute");
    assert!(scores[&customer_region].1 > 0, "region scores positively as a dimension attribute");
}

#[test]
fn node_and_edge_attribute_projections_contain_no_null_values() {
    let store = Rc::new(build_retail_store());
    let graph = SchemaGraph::build(store, true).unwrap();

    for node in graph.nodes() {
        for (key, value) in node.attributes() {
            assert!(!value.is_null(), "node attribute '{key}' on {} was null", node.id);
        }
    }
}

#[test]
fn store_round_trips_through_bincode() {
    let store = build_retail_store();
    let bytes = store.dump().unwrap();
    let restored = MetadataStore::load(&bytes).unwrap();

    let original_graph = SchemaGraph::build(Rc::new(store), false).unwrap();
    let restored_graph = SchemaGraph::build(Rc::new(restored), false).unwrap();

    assert_eq!(original_graph.node_count(), restored_graph.node_count());
    assert_eq!(original_graph.edge_count(), restored_graph.edge_count());
}

#[test]
fn store_with_tables_but_no_declared_schemas_gets_a_synthetic_one() {
    let mut store = MetadataStore::new();
    store.insert_table(TableRow {
        table_cat: "legacy".into(),
        table_schem: None,
        table_name: "widgets".into(),
        table_type: "TABLE".into(),
        remarks: None,
        type_cat: None,
        type_schem: None,
        type_name: None,
        self_referencing_col_name: None,
        ref_generation: None,
    });
    store.reindex();

    let graph = SchemaGraph::build(Rc::new(store), false).unwrap();
    assert!(graph.contains_node(&ids::schema_id("legacy", None)));
}
