//! Accumulated query state.
//!
//! [`Search`] collects clause fragments through independent, order-insensitive
//! chained calls and defers all SQL rendering to the engine that consumes it.
//! Each call is O(1) and dialect-free, so the same accumulated state can be
//! rendered against different backends.
//!
//! ```ignore
//! use anyorm::{Search, params};
//!
//! let query = Search::new()
//!     .table("users")
//!     .where_cond("age > ?", params![18])
//!     .or("vip = ?", params![true])
//!     .order("created_at desc")
//!     .limit(10);
//! ```

use crate::dialect::split_qualified_name;
use crate::error::{OrmError, OrmResult};
use crate::expr::SqlExpr;
use crate::param::Param;

/// Ordered column → argument map for find-or-create / find-or-update flows.
#[derive(Clone, Debug, Default)]
pub struct AttrMap {
    entries: Vec<(String, Param)>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's value, replacing an earlier entry for the same column.
    pub fn set(&mut self, column: impl Into<String>, value: Param) {
        let column = column.into();
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
    }

    pub fn get(&self, column: &str) -> Option<&Param> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build an [`AttrMap`] from column/value pairs.
///
/// ```ignore
/// let defaults = attrs!["status" => "pending", "retries" => 0i32];
/// ```
#[macro_export]
macro_rules! attrs {
    ($($column:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::AttrMap::new();
        $(map.set($column, $crate::Param::new($value));)*
        map
    }};
}

/// A named relation fetch attached to the primary query, with its own
/// condition set.
#[derive(Clone, Debug)]
pub struct Preload {
    name: String,
    conditions: Vec<SqlExpr>,
}

impl Preload {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &[SqlExpr] {
        &self.conditions
    }
}

/// Loosely-typed scalar accepted where clause text is built from a value.
///
/// Only text and integer variants render into SQL; the rest are rejected
/// through the deferred-error channel.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

macro_rules! scalar_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Scalar {
            fn from(value: $ty) -> Self {
                Scalar::Int(value as i64)
            }
        })*
    };
}

macro_rules! scalar_from_uint {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Scalar {
            fn from(value: $ty) -> Self {
                Scalar::Uint(value as u64)
            }
        })*
    };
}

scalar_from_int!(i8, i16, i32, i64);
scalar_from_uint!(u8, u16, u32, u64);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value as f64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Accumulated, not-yet-rendered query state.
///
/// Methods consume and return the builder for chaining. Clone first to
/// branch one query into two independent continuations: the derived clone
/// allocates fresh clause lists while sharing the (immutable) fragments
/// themselves.
///
/// A `Search` is built for one query, consumed once by the render engine,
/// then discarded.
#[derive(Clone, Debug, Default)]
pub struct Search {
    where_conditions: Vec<SqlExpr>,
    or_conditions: Vec<SqlExpr>,
    not_conditions: Vec<SqlExpr>,
    having_conditions: Vec<SqlExpr>,
    join_conditions: Vec<SqlExpr>,
    init_attrs: Vec<AttrMap>,
    assign_attrs: Vec<AttrMap>,
    selects: Option<SqlExpr>,
    omits: Vec<String>,
    orders: Vec<String>,
    preloads: Vec<Preload>,
    offset: Option<i64>,
    limit: Option<i64>,
    group: String,
    table_name: String,
    schema_name: String,
    raw: bool,
    unscoped: bool,
    ignore_order_query: bool,
    /// Deferred clause errors; surfaced by [`Search::validate`].
    errors: Vec<String>,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Condition accumulation ====================

    /// Append an AND-joined predicate.
    pub fn where_cond(mut self, query: impl Into<String>, args: Vec<Param>) -> Self {
        self.where_conditions.push(SqlExpr::new(query, args));
        self
    }

    /// Append an OR-joined predicate.
    pub fn or(mut self, query: impl Into<String>, args: Vec<Param>) -> Self {
        self.or_conditions.push(SqlExpr::new(query, args));
        self
    }

    /// Append a negated predicate.
    pub fn not(mut self, query: impl Into<String>, args: Vec<Param>) -> Self {
        self.not_conditions.push(SqlExpr::new(query, args));
        self
    }

    /// Append a HAVING predicate.
    pub fn having(mut self, query: impl Into<String>, args: Vec<Param>) -> Self {
        self.having_conditions.push(SqlExpr::new(query, args));
        self
    }

    /// Append a pre-built HAVING fragment.
    ///
    /// Stored in the same shape as [`Search::having`] output; consumers see
    /// one uniform condition list no matter which convention built it.
    pub fn having_expr(mut self, expr: SqlExpr) -> Self {
        self.having_conditions.push(expr);
        self
    }

    /// Append a JOIN clause with its arguments.
    pub fn joins(mut self, query: impl Into<String>, args: Vec<Param>) -> Self {
        self.join_conditions.push(SqlExpr::new(query, args));
        self
    }

    // ==================== Upsert attributes ====================

    /// Queue attribute defaults applied when a find-or-create misses.
    pub fn attrs(mut self, attrs: AttrMap) -> Self {
        self.init_attrs.push(attrs);
        self
    }

    /// Queue attribute assignments applied whether or not the row exists.
    pub fn assign(mut self, attrs: AttrMap) -> Self {
        self.assign_attrs.push(attrs);
        self
    }

    // ==================== Ordering & grouping ====================

    /// Append an ORDER BY entry. Empty values are dropped.
    pub fn order(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.orders.push(value);
        }
        self
    }

    /// Discard any accumulated ordering, then append `value`.
    ///
    /// Ordering is the one sequence-sensitive clause category, so inherited
    /// order from a cloned builder sometimes has to go.
    pub fn reorder(mut self, value: impl Into<String>) -> Self {
        self.orders.clear();
        self.order(value)
    }

    /// Replace the GROUP BY expression.
    ///
    /// Accepts text and integer scalars only; anything else records a
    /// deferred error and leaves the clause empty. The literal `-1` is an
    /// escape hatch meaning "no grouping".
    pub fn group(mut self, query: impl Into<Scalar>) -> Self {
        let rendered = match query.into() {
            Scalar::Text(text) => text,
            Scalar::Int(value) => value.to_string(),
            Scalar::Uint(value) => value.to_string(),
            other => {
                self.errors
                    .push(format!("unsupported group expression: {other:?}"));
                String::new()
            }
        };
        self.group = if rendered == "-1" { String::new() } else { rendered };
        self
    }

    // ==================== Projection & pagination ====================

    /// Replace the select list. Last write wins.
    pub fn select(mut self, query: impl Into<String>, args: Vec<Param>) -> Self {
        self.selects = Some(SqlExpr::new(query, args));
        self
    }

    /// Replace the omitted-column list.
    pub fn omit(mut self, columns: &[&str]) -> Self {
        self.omits = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Replace the LIMIT. Last write wins.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Replace the OFFSET. Last write wins.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    // ==================== Preload ====================

    /// Attach a relation preload.
    ///
    /// The last call for a given relation wins; its entry moves to the end
    /// of the list either way.
    pub fn preload(mut self, name: impl Into<String>, conditions: Vec<SqlExpr>) -> Self {
        let name = name.into();
        self.preloads.retain(|p| p.name != name);
        self.preloads.push(Preload { name, conditions });
        self
    }

    // ==================== Flags & target ====================

    /// Toggle raw mode: the accumulated state is rendered as-is, bypassing
    /// model mapping.
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Include soft-deleted rows.
    pub fn unscoped(mut self) -> Self {
        self.unscoped = true;
        self
    }

    /// Suppress ORDER BY at render time (count-style queries).
    pub fn ignore_order(mut self, ignore: bool) -> Self {
        self.ignore_order_query = ignore;
        self
    }

    /// Set the target table.
    ///
    /// A `schema.table` qualifier is split on the first separator and the
    /// schema recorded separately; the stored table name keeps the original
    /// text.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let (schema, _) = split_qualified_name(&name);
        self.schema_name = schema.to_string();
        self.table_name = name;
        self
    }

    // ==================== Validation ====================

    /// Surface clause errors recorded while chaining.
    ///
    /// Building never aborts mid-chain; the failure is observed here, at the
    /// point the query would execute.
    pub fn validate(&self) -> OrmResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(OrmError::invalid_sql(self.errors.join("; ")))
        }
    }

    // ==================== Read side (render engine contract) ====================

    pub fn where_conditions(&self) -> &[SqlExpr] {
        &self.where_conditions
    }

    pub fn or_conditions(&self) -> &[SqlExpr] {
        &self.or_conditions
    }

    pub fn not_conditions(&self) -> &[SqlExpr] {
        &self.not_conditions
    }

    pub fn having_conditions(&self) -> &[SqlExpr] {
        &self.having_conditions
    }

    pub fn join_conditions(&self) -> &[SqlExpr] {
        &self.join_conditions
    }

    pub fn init_attrs(&self) -> &[AttrMap] {
        &self.init_attrs
    }

    pub fn assign_attrs(&self) -> &[AttrMap] {
        &self.assign_attrs
    }

    pub fn selects(&self) -> Option<&SqlExpr> {
        self.selects.as_ref()
    }

    pub fn omits(&self) -> &[String] {
        &self.omits
    }

    pub fn orders(&self) -> &[String] {
        &self.orders
    }

    pub fn preloads(&self) -> &[Preload] {
        &self.preloads
    }

    pub fn group_expr(&self) -> &str {
        &self.group
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn is_unscoped(&self) -> bool {
        self.unscoped
    }

    pub fn ignores_order(&self) -> bool {
        self.ignore_order_query
    }

    pub fn build_errors(&self) -> &[String] {
        &self.errors
    }
}

#[cfg(test)]
mod tests;
