//! Live metadata source interface.
//!
//! This is the out-of-scope external collaborator from spec.md §1: the core
//! only consumes a populated [`MetadataStore`](crate::store::MetadataStore),
//! it never talks to a live database driver itself. [`MetadataSource`] is the
//! trait boundary such a driver would implement; no concrete JDBC/ODBC-backed
//! implementation ships in this crate.

use crate::records::{ColumnRow, ForeignKeyRow, PrimaryKeyRow, SchemaRow, TableRow, TypeInfoRow};

/// A `%`-wildcard pattern used to filter catalog/schema/table names, matching
/// the JDBC `DatabaseMetaData` convention where `None` means "don't filter"
/// and `"%"` means "match everything".
#[derive(Debug, Clone, Default)]
pub struct Pattern(Option<String>);

impl Pattern {
    /// No filter at all.
    pub fn any() -> Self {
        Pattern(None)
    }

    /// Filter to an exact or wildcarded pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Pattern(Some(pattern.into()))
    }

    /// The raw pattern string, if one was supplied.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Capability for enumerating JDBC-style database metadata from a live
/// source, each result filtered by a catalog/schema/table-pattern triple.
///
/// Implementations are expected to stream rows lazily; the trait is kept
/// object-safe (`Box<dyn Iterator<...>>`) so callers can hold a `Box<dyn
/// MetadataSource>` without knowing the concrete driver.
pub trait MetadataSource {
    /// Enumerate schemas, optionally filtered by catalog and a schema-name pattern.
    fn schemas(
        &mut self,
        catalog: Option<&str>,
        schema_pattern: &Pattern,
    ) -> Box<dyn Iterator<Item = SchemaRow> + '_>;

    /// Enumerate tables, filtered by catalog/schema/table-name pattern.
    fn tables(
        &mut self,
        catalog: Option<&str>,
        schema_pattern: &Pattern,
        table_pattern: &Pattern,
    ) -> Box<dyn Iterator<Item = TableRow> + '_>;

    /// Enumerate columns, filtered by catalog/schema/table-name pattern.
    fn columns(
        &mut self,
        catalog: Option<&str>,
        schema_pattern: &Pattern,
        table_pattern: &Pattern,
    ) -> Box<dyn Iterator<Item = ColumnRow> + '_>;

    /// Enumerate primary-key member rows for a single table.
    fn primary_keys(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Box<dyn Iterator<Item = PrimaryKeyRow> + '_>;

    /// Enumerate exported foreign-key rows for a single (referenced) table.
    ///
    /// Note: these are *exported* keys, i.e. keyed by the referenced table
    /// rather than the referencing one (spec.md §9 open question). This
    /// affects `fk_name` collisions: two unrelated foreign keys that happen
    /// to reference the same table and share an unnamed/duplicate `fk_name`
    /// collide in [`crate::store::MetadataStore`]'s fk index.
    fn exported_keys(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Box<dyn Iterator<Item = ForeignKeyRow> + '_>;

    /// Enumerate the database's supported types.
    fn type_info(&mut self) -> Box<dyn Iterator<Item = TypeInfoRow> + '_>;
}
