//! Fallback dialect for backends with anonymous placeholders and
//! `INFORMATION_SCHEMA`-only introspection.

use crate::client::GenericClient;
use crate::dialect::{Dialect, split_qualified_name};
use crate::error::OrmResult;
use crate::field::{FieldDescriptor, FieldKind};
use async_trait::async_trait;

/// Upper bound used both as the `varchar` cutoff and as the fallback width
/// for unbounded strings, which this family of backends cannot store as an
/// unsized type.
const DEFAULT_VARCHAR_SIZE: u32 = 65532;

/// A lowest-common-denominator dialect.
///
/// Placeholders are anonymous (`?`), ids come from the driver's
/// last-insert-id call, and schema introspection goes through
/// `INFORMATION_SCHEMA` with the current database standing in for an
/// unqualified schema.
#[derive(Debug, Clone, Default)]
pub struct CommonDialect;

impl CommonDialect {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a possibly qualified name to `(schema, table)`, falling back
    /// to the connection's current database when unqualified.
    async fn schema_and_table(
        &self,
        conn: &dyn GenericClient,
        name: &str,
    ) -> OrmResult<(String, String)> {
        let (schema, table) = split_qualified_name(name);
        if schema.is_empty() {
            Ok((self.current_database(conn).await?, table.to_string()))
        } else {
            Ok((schema.to_string(), table.to_string()))
        }
    }
}

#[async_trait]
impl Dialect for CommonDialect {
    fn name(&self) -> &'static str {
        "common"
    }

    fn bind_var(&self, position: usize) -> String {
        let _ = position;
        "?".to_string()
    }

    fn data_type_of(&self, field: &mut FieldDescriptor) -> String {
        let kind = field.kind.clone();
        let sql_type = match field.explicit_sql_type().map(str::to_string) {
            Some(explicit) => explicit,
            None => match kind {
                FieldKind::Bool => "BOOLEAN".to_string(),
                FieldKind::Int => {
                    if field.can_auto_increment() {
                        field.tag_settings.set("AUTO_INCREMENT", "AUTO_INCREMENT");
                        "INTEGER AUTO_INCREMENT".to_string()
                    } else {
                        "INTEGER".to_string()
                    }
                }
                FieldKind::BigInt => {
                    if field.can_auto_increment() {
                        field.tag_settings.set("AUTO_INCREMENT", "AUTO_INCREMENT");
                        "BIGINT AUTO_INCREMENT".to_string()
                    } else {
                        "BIGINT".to_string()
                    }
                }
                FieldKind::Float => "FLOAT".to_string(),
                FieldKind::Text => match field.size {
                    Some(size) if size > 0 && size < DEFAULT_VARCHAR_SIZE => {
                        format!("VARCHAR({size})")
                    }
                    _ => format!("VARCHAR({DEFAULT_VARCHAR_SIZE})"),
                },
                FieldKind::Time => "TIMESTAMP".to_string(),
                FieldKind::Bytes { .. } => "BINARY(800)".to_string(),
                FieldKind::Map { ref type_name } | FieldKind::Custom { ref type_name } => {
                    panic!("invalid sql type {type_name} for common dialect")
                }
            },
        };

        if field.additional_type.trim().is_empty() {
            sql_type
        } else {
            format!("{} {}", sql_type, field.additional_type)
        }
    }

    async fn has_table(&self, conn: &dyn GenericClient, table_name: &str) -> OrmResult<bool> {
        let (schema, table) = self.schema_and_table(conn, table_name).await?;
        tracing::debug!(table = table_name, "checking table existence");
        let row = conn
            .query_one(
                "SELECT count(*) FROM INFORMATION_SCHEMA.TABLES WHERE table_schema = ? AND table_name = ?",
                &[&schema, &table],
            )
            .await?;
        Ok(row.get::<_, i64>(0) > 0)
    }

    async fn has_column(
        &self,
        conn: &dyn GenericClient,
        table_name: &str,
        column_name: &str,
    ) -> OrmResult<bool> {
        let (schema, table) = self.schema_and_table(conn, table_name).await?;
        tracing::debug!(table = table_name, column = column_name, "checking column existence");
        let row = conn
            .query_one(
                "SELECT count(*) FROM INFORMATION_SCHEMA.COLUMNS WHERE table_schema = ? AND table_name = ? AND column_name = ?",
                &[&schema, &table, &column_name],
            )
            .await?;
        Ok(row.get::<_, i64>(0) > 0)
    }

    async fn has_index(
        &self,
        conn: &dyn GenericClient,
        table_name: &str,
        index_name: &str,
    ) -> OrmResult<bool> {
        let (schema, table) = self.schema_and_table(conn, table_name).await?;
        tracing::debug!(table = table_name, index = index_name, "checking index existence");
        let row = conn
            .query_one(
                "SELECT count(*) FROM INFORMATION_SCHEMA.STATISTICS WHERE table_schema = ? AND table_name = ? AND index_name = ?",
                &[&schema, &table, &index_name],
            )
            .await?;
        Ok(row.get::<_, i64>(0) > 0)
    }

    async fn has_foreign_key(
        &self,
        _conn: &dyn GenericClient,
        _table_name: &str,
        _foreign_key_name: &str,
    ) -> OrmResult<bool> {
        // Not expressible portably through INFORMATION_SCHEMA.
        Ok(false)
    }

    async fn current_database(&self, conn: &dyn GenericClient) -> OrmResult<String> {
        let row = conn.query_one("SELECT DATABASE()", &[]).await?;
        Ok(row.get(0))
    }

    fn supports_returned_insert_id(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_type(field: &mut FieldDescriptor) -> String {
        CommonDialect::new().data_type_of(field)
    }

    #[test]
    fn test_bind_var_ignores_position() {
        let dialect = CommonDialect::new();
        assert_eq!(dialect.bind_var(1), "?");
        assert_eq!(dialect.bind_var(2), "?");
        assert_eq!(dialect.bind_var(99), "?");
    }

    #[test]
    fn test_type_mapping_surface() {
        assert_eq!(data_type(&mut FieldDescriptor::new("ok", FieldKind::Bool)), "BOOLEAN");
        assert_eq!(data_type(&mut FieldDescriptor::new("n", FieldKind::Int)), "INTEGER");
        assert_eq!(data_type(&mut FieldDescriptor::new("n", FieldKind::BigInt)), "BIGINT");
        assert_eq!(data_type(&mut FieldDescriptor::new("x", FieldKind::Float)), "FLOAT");
        assert_eq!(
            data_type(&mut FieldDescriptor::new("at", FieldKind::Time)),
            "TIMESTAMP"
        );
        assert_eq!(
            data_type(&mut FieldDescriptor::new("blob", FieldKind::bytes("Vec"))),
            "BINARY(800)"
        );
    }

    #[test]
    fn test_string_sizes_fall_back_to_bounded_varchar() {
        let mut field = FieldDescriptor::new("title", FieldKind::Text).size(120);
        assert_eq!(data_type(&mut field), "VARCHAR(120)");

        let mut field = FieldDescriptor::new("body", FieldKind::Text);
        assert_eq!(data_type(&mut field), "VARCHAR(65532)");
    }

    #[test]
    fn test_auto_increment_suffix_and_tag() {
        let mut field = FieldDescriptor::new("id", FieldKind::BigInt).primary_key();
        assert_eq!(data_type(&mut field), "BIGINT AUTO_INCREMENT");
        assert_eq!(field.tag_settings.get("AUTO_INCREMENT"), Some("AUTO_INCREMENT"));
    }

    #[test]
    fn test_insert_id_strategy_is_driver_side() {
        let dialect = CommonDialect::new();
        assert!(!dialect.supports_returned_insert_id());
        assert_eq!(dialect.last_insert_id_returning_suffix("users", "id"), "");
        assert_eq!(
            dialect.last_insert_id_output_interstitial("users", "id", &[]),
            ""
        );
    }

    #[test]
    #[should_panic(expected = "invalid sql type")]
    fn test_map_kind_panics() {
        let mut field = FieldDescriptor::new("attrs", FieldKind::map("Hstore"));
        data_type(&mut field);
    }
}
