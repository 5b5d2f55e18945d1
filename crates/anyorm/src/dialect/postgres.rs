//! PostgreSQL dialect.

use crate::client::GenericClient;
use crate::dialect::{Dialect, schema_literal, split_qualified_name};
use crate::error::OrmResult;
use crate::field::{FieldDescriptor, FieldKind};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Sizes at or above this map to `text` instead of `varchar(n)`.
const VARCHAR_CEILING: u32 = 65532;

/// The PostgreSQL dialect.
///
/// Marker-type tables are populated at construction, so dispatch over value
/// type names is data-driven rather than matched inline in the mapping code.
#[derive(Debug, Clone)]
pub struct PostgresDialect {
    /// Lowercased names of 16-byte array types that map to `uuid`.
    uuid_markers: HashSet<String>,
    /// Lowercased names of raw-JSON payload types that map to `jsonb`.
    json_markers: HashSet<String>,
    /// Lowercased marker names of map-like values, with their column types.
    map_markers: HashMap<String, String>,
}

impl PostgresDialect {
    pub fn new() -> Self {
        let mut map_markers = HashMap::new();
        map_markers.insert("hstore".to_string(), "hstore".to_string());
        Self {
            uuid_markers: ["uuid", "guid"].into_iter().map(str::to_string).collect(),
            json_markers: ["rawvalue", "rawmessage", "json"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            map_markers,
        }
    }

    /// Register an additional map-like marker type.
    pub fn register_map_marker(&mut self, type_name: &str, sql_type: &str) {
        self.map_markers
            .insert(type_name.to_ascii_lowercase(), sql_type.to_string());
    }

    fn byte_type(&self, type_name: &str, fixed_len: Option<usize>) -> &'static str {
        let lower = type_name.to_ascii_lowercase();
        // uuid wins over json when both markers could apply
        if fixed_len == Some(16) && self.uuid_markers.contains(&lower) {
            "uuid"
        } else if self.json_markers.contains(&lower) {
            "jsonb"
        } else {
            "bytea"
        }
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn bind_var(&self, position: usize) -> String {
        format!("${position}")
    }

    fn data_type_of(&self, field: &mut FieldDescriptor) -> String {
        let kind = field.kind.clone();
        let sql_type = match field.explicit_sql_type().map(str::to_string) {
            Some(explicit) => explicit,
            None => match kind {
                FieldKind::Bool => "boolean".to_string(),
                FieldKind::Int => {
                    if field.can_auto_increment() {
                        field.tag_settings.set("AUTO_INCREMENT", "AUTO_INCREMENT");
                        "serial".to_string()
                    } else {
                        "integer".to_string()
                    }
                }
                FieldKind::BigInt => {
                    if field.can_auto_increment() {
                        field.tag_settings.set("AUTO_INCREMENT", "AUTO_INCREMENT");
                        "bigserial".to_string()
                    } else {
                        "bigint".to_string()
                    }
                }
                FieldKind::Float => "numeric".to_string(),
                FieldKind::Text => match field.size {
                    Some(size) if size > 0 && size < VARCHAR_CEILING => {
                        format!("varchar({size})")
                    }
                    _ => "text".to_string(),
                },
                FieldKind::Time => "timestamp with time zone".to_string(),
                FieldKind::Map { ref type_name } => self
                    .map_markers
                    .get(&type_name.to_ascii_lowercase())
                    .cloned()
                    .unwrap_or_else(|| {
                        panic!("invalid sql type {type_name} (map) for postgres")
                    }),
                FieldKind::Bytes {
                    ref type_name,
                    fixed_len,
                } => self.byte_type(type_name, fixed_len).to_string(),
                FieldKind::Custom { ref type_name } => {
                    panic!("invalid sql type {type_name} (custom) for postgres")
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
        let (schema, table) = split_qualified_name(table_name);
        let sql = format!(
            "SELECT count(*) FROM INFORMATION_SCHEMA.tables WHERE table_name = $1 AND table_type = 'BASE TABLE' AND table_schema = {}",
            schema_literal(schema, "CURRENT_SCHEMA()")
        );
        tracing::debug!(table = table_name, "checking table existence");
        let row = conn.query_one(&sql, &[&table]).await?;
        Ok(row.get::<_, i64>(0) > 0)
    }

    async fn has_column(
        &self,
        conn: &dyn GenericClient,
        table_name: &str,
        column_name: &str,
    ) -> OrmResult<bool> {
        let (schema, table) = split_qualified_name(table_name);
        let sql = format!(
            "SELECT count(*) FROM INFORMATION_SCHEMA.columns WHERE table_name = $1 AND column_name = $2 AND table_schema = {}",
            schema_literal(schema, "CURRENT_SCHEMA()")
        );
        tracing::debug!(table = table_name, column = column_name, "checking column existence");
        let row = conn.query_one(&sql, &[&table, &column_name]).await?;
        Ok(row.get::<_, i64>(0) > 0)
    }

    async fn has_index(
        &self,
        conn: &dyn GenericClient,
        table_name: &str,
        index_name: &str,
    ) -> OrmResult<bool> {
        let (schema, table) = split_qualified_name(table_name);
        let sql = format!(
            "SELECT count(*) FROM pg_indexes WHERE tablename = $1 AND indexname = $2 AND schemaname = {}",
            schema_literal(schema, "CURRENT_SCHEMA()")
        );
        tracing::debug!(table = table_name, index = index_name, "checking index existence");
        let row = conn.query_one(&sql, &[&table, &index_name]).await?;
        Ok(row.get::<_, i64>(0) > 0)
    }

    async fn has_foreign_key(
        &self,
        conn: &dyn GenericClient,
        table_name: &str,
        foreign_key_name: &str,
    ) -> OrmResult<bool> {
        // The regclass cast resolves the (possibly qualified) name itself.
        let sql = "SELECT count(con.conname) FROM pg_constraint con WHERE $1::regclass::oid = con.conrelid AND con.conname = $2 AND con.contype = 'f'";
        tracing::debug!(
            table = table_name,
            foreign_key = foreign_key_name,
            "checking foreign key existence"
        );
        let row = conn
            .query_one(sql, &[&table_name, &foreign_key_name])
            .await?;
        Ok(row.get::<_, i64>(0) > 0)
    }

    async fn current_database(&self, conn: &dyn GenericClient) -> OrmResult<String> {
        let row = conn.query_one("SELECT CURRENT_DATABASE()", &[]).await?;
        Ok(row.get(0))
    }

    fn supports_returned_insert_id(&self) -> bool {
        true
    }

    fn last_insert_id_returning_suffix(&self, table: &str, key: &str) -> String {
        format!("RETURNING {table}.{key}")
    }
}
