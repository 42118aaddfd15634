//! Deterministic composite identifiers for every graph node kind.
//!
//! Every identifier has the shape `"<kind>://<cat>.<schema-or-'@'>.<rest...>"`.
//! A missing schema normalizes to `"@"` so that databases without an
//! explicit schema layer still produce stable ids.

use crate::graph::NodeKind;

fn sanitize_schema(schema: Option<&str>) -> &str {
    schema.filter(|s| !s.is_empty()).unwrap_or("@")
}

fn composite_id(kind: NodeKind, cat: &str, schema: Option<&str>, rest: &[&str]) -> String {
    let mut parts = vec![cat, sanitize_schema(schema)];
    parts.extend_from_slice(rest);
    format!("{}://{}", kind.as_str(), parts.join("."))
}

/// Identifier for a schema node.
pub fn schema_id(table_catalog: &str, table_schem: Option<&str>) -> String {
    composite_id(NodeKind::Schema, table_catalog, table_schem, &[])
}

/// Identifier for a table node.
pub fn table_id(table_cat: &str, table_schem: Option<&str>, table_name: &str) -> String {
    composite_id(NodeKind::Table, table_cat, table_schem, &[table_name])
}

/// Identifier for a column node.
pub fn column_id(
    table_cat: &str,
    table_schem: Option<&str>,
    table_name: &str,
    column_name: &str,
) -> String {
    composite_id(
        NodeKind::Column,
        table_cat,
        table_schem,
        &[table_name, column_name],
    )
}

/// Identifier for a primary-key node. An unnamed key normalizes to `"@"`.
pub fn pk_id(
    table_cat: &str,
    table_schem: Option<&str>,
    table_name: &str,
    pk_name: Option<&str>,
) -> String {
    composite_id(
        NodeKind::Pk,
        table_cat,
        table_schem,
        &[table_name, pk_name.filter(|s| !s.is_empty()).unwrap_or("@")],
    )
}

/// Identifier for a foreign-key node. An unnamed key normalizes to `"@"`.
pub fn fk_id(
    table_cat: &str,
    table_schem: Option<&str>,
    table_name: &str,
    fk_name: Option<&str>,
) -> String {
    composite_id(
        NodeKind::Fk,
        table_cat,
        table_schem,
        &[table_name, fk_name.filter(|s| !s.is_empty()).unwrap_or("@")],
    )
}

/// Identifier for an index node. An unnamed index normalizes to `"@"`.
pub fn index_id(
    table_cat: &str,
    table_schem: Option<&str>,
    table_name: &str,
    index_name: Option<&str>,
) -> String {
    composite_id(
        NodeKind::Index,
        table_cat,
        table_schem,
        &[
            table_name,
            index_name.filter(|s| !s.is_empty()).unwrap_or("@"),
        ],
    )
}

/// Identifier for a type node. Types are global, not scoped to a catalog/schema.
pub fn type_id(type_name: &str) -> String {
    format!("{}://{}", NodeKind::Type.as_str(), type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_id_normalizes_missing_schema() {
        assert_eq!(schema_id("mydb", None), "schema://mydb.@");
        assert_eq!(schema_id("mydb", Some("public")), "schema://mydb.public");
    }

    #[test]
    fn table_id_includes_table_name() {
        assert_eq!(
            table_id("mydb", Some("public"), "orders"),
            "table://mydb.public.orders"
        );
    }

    #[test]
    fn column_id_includes_table_and_column() {
        assert_eq!(
            column_id("mydb", Some("public"), "orders", "id"),
            "column://mydb.public.orders.id"
        );
    }

    #[test]
    fn pk_id_normalizes_unnamed_key() {
        assert_eq!(
            pk_id("mydb", None, "orders", None),
            "pk://mydb.@.orders.@"
        );
        assert_eq!(
            pk_id("mydb", None, "orders", Some("orders_pkey")),
            "pk://mydb.@.orders.orders_pkey"
        );
    }

    #[test]
    fn type_id_is_global() {
        assert_eq!(type_id("VARCHAR"), "type://VARCHAR");
    }

    #[test]
    fn identifier_bijection_holds_for_distinct_and_equal_inputs() {
        let a = column_id("mydb", Some("s"), "t", "c1");
        let b = column_id("mydb", Some("s"), "t", "c2");
        let c = column_id("mydb", Some("s"), "t", "c1");
        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
