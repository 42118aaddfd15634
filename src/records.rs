//! Metadata records mirroring JDBC-style `DatabaseMetaData` result sets.
//!
//! Every record is a plain immutable value type. Field sets match the
//! corresponding JDBC result set column-for-column so that a live metadata
//! source's rows can be mapped across without any field reshuffling.

use serde::{Deserialize, Serialize};

/// One row of `DatabaseMetaData.getCatalogs()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogRow {
    pub table_cat: String,
}

/// One row of `DatabaseMetaData.getSchemas()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaRow {
    pub table_schem: Option<String>,
    pub table_catalog: String,
}

/// One row of `DatabaseMetaData.getTables()` (10 fields).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRow {
    pub table_cat: String,
    pub table_schem: Option<String>,
    pub table_name: String,
    pub table_type: String,
    pub remarks: Option<String>,
    pub type_cat: Option<String>,
    pub type_schem: Option<String>,
    pub type_name: Option<String>,
    pub self_referencing_col_name: Option<String>,
    pub ref_generation: Option<String>,
}

/// One row of `DatabaseMetaData.getColumns()` (24 fields).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRow {
    pub table_cat: String,
    pub table_schem: Option<String>,
    pub table_name: String,
    pub column_name: String,
    pub data_type: i32,
    pub type_name: String,
    pub column_size: Option<i32>,
    pub buffer_length: Option<i32>,
    pub decimal_digits: Option<i32>,
    pub num_prec_radix: Option<i32>,
    pub nullable: i32,
    pub remarks: Option<String>,
    pub column_def: Option<String>,
    pub sql_data_type: Option<i32>,
    pub sql_datetime_sub: Option<i32>,
    pub char_octet_length: Option<i32>,
    pub ordinal_position: i32,
    pub is_nullable: String,
    pub scope_catalog: Option<String>,
    pub scope_schema: Option<String>,
    pub scope_table: Option<String>,
    pub source_data_type: Option<i16>,
    pub is_autoincrement: String,
    pub is_generatedcolumn: String,
}

/// One row of `DatabaseMetaData.getPrimaryKeys()` (6 fields).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    pub table_cat: String,
    pub table_schem: Option<String>,
    pub table_name: String,
    pub column_name: String,
    pub key_seq: i32,
    pub pk_name: Option<String>,
}

/// One row of `DatabaseMetaData.getExportedKeys()` / `getImportedKeys()` (14 fields).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    pub pktable_cat: String,
    pub pktable_schem: Option<String>,
    pub pktable_name: String,
    pub pkcolumn_name: String,
    pub fktable_cat: String,
    pub fktable_schem: Option<String>,
    pub fktable_name: String,
    pub fkcolumn_name: String,
    pub key_seq: i32,
    pub update_rule: i32,
    pub delete_rule: i32,
    pub fk_name: Option<String>,
    pub pk_name: Option<String>,
    pub deferrability: i32,
}

/// One row of `DatabaseMetaData.getTypeInfo()` (18 fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfoRow {
    pub type_name: String,
    pub data_type: i32,
    pub precision: Option<i32>,
    pub literal_prefix: Option<String>,
    pub literal_suffix: Option<String>,
    pub create_params: Option<String>,
    pub nullable: i32,
    pub case_sensitive: bool,
    pub searchable: i32,
    pub unsigned_attribute: bool,
    pub fixed_prec_scale: bool,
    pub auto_increment: bool,
    pub local_type_name: Option<String>,
    pub minimum_scale: Option<i16>,
    pub maximum_scale: Option<i16>,
    pub sql_data_type: Option<i32>,
    pub sql_datetime_sub: Option<i32>,
    pub num_prec_radix: Option<i32>,
}

/// One row of `DatabaseMetaData.getIndexInfo()` (12 fields).
///
/// Kept for completeness of the node-kind taxonomy (`NodeKind::Index`); the
/// graph builder does not yet wire index nodes into the built graph, mirroring
/// the same asymmetry present in the original implementation this crate is
/// based on (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexInfoRow {
    pub table_cat: String,
    pub table_schem: Option<String>,
    pub table_name: String,
    pub non_unique: bool,
    pub index_qualifier: Option<String>,
    pub index_name: Option<String>,
    pub index_type: i32,
    pub ordinal_position: i32,
    pub column_name: Option<String>,
    pub asc_or_desc: Option<String>,
    pub cardinality: i64,
    pub pages: i64,
}

/// Union of every record kind, used by the metadata store's by-id index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyRecord {
    Schema(SchemaRow),
    Table(TableRow),
    Column(ColumnRow),
    PrimaryKey(Vec<PrimaryKeyRow>),
    ForeignKey(Vec<ForeignKeyRow>),
    Type(TypeInfoRow),
}
