//! Dialect abstraction: backend-specific type mapping, placeholder syntax,
//! schema introspection and insert-id retrieval.
//!
//! A [`Dialect`] is consumed by the render engine alongside the accumulated
//! [`Search`](crate::Search) state; neither side calls into the other, which
//! is what keeps one set of query operations portable across backends.

mod common;
mod postgres;
mod registry;

pub use common::CommonDialect;
pub use postgres::PostgresDialect;
pub use registry::DialectRegistry;

use crate::client::GenericClient;
use crate::error::OrmResult;
use crate::field::FieldDescriptor;
use async_trait::async_trait;

/// Capability set every backend implements.
#[async_trait]
pub trait Dialect: Send + Sync {
    /// Stable identifier used for registry lookup.
    fn name(&self) -> &'static str;

    /// Placeholder text for the 1-based parameter `position`.
    ///
    /// Render code must never hardcode placeholder syntax: numbered backends
    /// produce `$1`, `$2`, ... while anonymous backends repeat one literal.
    fn bind_var(&self, position: usize) -> String;

    /// Quote an identifier for this backend.
    fn quote(&self, identifier: &str) -> String {
        format!("\"{identifier}\"")
    }

    /// Map a field descriptor to a full column-type clause.
    ///
    /// Deterministic for a given descriptor, but not pure: inferring
    /// auto-increment records `AUTO_INCREMENT` back into the descriptor's
    /// tag bag so downstream DDL generation sees it.
    ///
    /// # Panics
    ///
    /// Panics when the kind has no mapping for this backend. An unmappable
    /// kind is a broken mapping setup, not a recoverable runtime condition.
    fn data_type_of(&self, field: &mut FieldDescriptor) -> String;

    /// Whether `table_name` exists. Accepts `schema.table`; an unqualified
    /// name resolves against the connection's active schema.
    async fn has_table(&self, conn: &dyn GenericClient, table_name: &str) -> OrmResult<bool>;

    /// Whether `column_name` exists on `table_name`.
    async fn has_column(
        &self,
        conn: &dyn GenericClient,
        table_name: &str,
        column_name: &str,
    ) -> OrmResult<bool>;

    /// Whether `index_name` exists on `table_name`.
    async fn has_index(
        &self,
        conn: &dyn GenericClient,
        table_name: &str,
        index_name: &str,
    ) -> OrmResult<bool>;

    /// Whether `foreign_key_name` exists on `table_name`.
    async fn has_foreign_key(
        &self,
        conn: &dyn GenericClient,
        table_name: &str,
        foreign_key_name: &str,
    ) -> OrmResult<bool>;

    /// Whether `table_name` resolves against the connection's active schema,
    /// i.e. it carries no explicit schema qualifier.
    fn has_schema(&self, table_name: &str) -> bool {
        let (schema, _) = split_qualified_name(table_name);
        schema.is_empty()
    }

    /// Name of the database the active connection is bound to.
    async fn current_database(&self, conn: &dyn GenericClient) -> OrmResult<String>;

    /// Whether the generated insert id comes back on the statement itself
    /// (output/returning clause) instead of a driver-side follow-up.
    ///
    /// When true, exactly one of the two fragment hooks below is non-empty;
    /// the engine never branches on the backend, only on position.
    fn supports_returned_insert_id(&self) -> bool;

    /// Fragment inserted between the column list and `VALUES` for backends
    /// that capture ids via an output clause. Empty when unused.
    fn last_insert_id_output_interstitial(
        &self,
        table: &str,
        key: &str,
        columns: &[&str],
    ) -> String {
        let _ = (table, key, columns);
        String::new()
    }

    /// Fragment appended after the statement for backends that return ids
    /// via a trailing clause. Empty when unused.
    fn last_insert_id_returning_suffix(&self, table: &str, key: &str) -> String {
        let _ = (table, key);
        String::new()
    }
}

/// Split a possibly schema-qualified name into `(schema, table)`.
///
/// Splits on the first separator only; an unqualified name yields an empty
/// schema. Table names containing further separators are unsupported.
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.split_once('.') {
        Some((schema, table)) => (schema, table),
        None => ("", name),
    }
}

/// SQL expression selecting the schema to introspect: a quoted literal when
/// qualified, the backend's current-schema expression otherwise.
pub(crate) fn schema_literal(schema: &str, current_schema_expr: &str) -> String {
    if schema.is_empty() {
        current_schema_expr.to_string()
    } else {
        format!("'{schema}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qualified_name() {
        assert_eq!(
            split_qualified_name("checkout.shopping_cart"),
            ("checkout", "shopping_cart")
        );
        assert_eq!(split_qualified_name("shopping_cart"), ("", "shopping_cart"));
        // only the first separator splits
        assert_eq!(split_qualified_name("a.b.c"), ("a", "b.c"));
    }

    #[test]
    fn test_schema_literal() {
        assert_eq!(schema_literal("checkout", "CURRENT_SCHEMA()"), "'checkout'");
        assert_eq!(schema_literal("", "CURRENT_SCHEMA()"), "CURRENT_SCHEMA()");
    }
}
