//! # anyorm
//!
//! The dialect-abstraction and query-composition core of a multi-backend ORM.
//!
//! ## Features
//!
//! - **Dialect abstraction**: one [`Dialect`] capability set per backend
//!   (column-type mapping, placeholder syntax, schema introspection,
//!   insert-id retrieval)
//! - **Deferred rendering**: [`Search`] accumulates clause fragments through
//!   chained calls; SQL text is produced later by the engine that consumes it
//! - **Clone to branch**: builders are plain values; clone one to fork a
//!   query into two independent continuations
//! - **Deferred clause errors**: a bad clause never aborts the chain; it is
//!   recorded on the builder and surfaced by `validate()` at execution time
//!
//! ## Building a query
//!
//! ```ignore
//! use anyorm::{DialectRegistry, Search, params};
//!
//! let registry = DialectRegistry::with_defaults();
//! let dialect = registry.get("postgres").unwrap();
//!
//! let query = Search::new()
//!     .table("users")
//!     .where_cond("age > ?", params![18])
//!     .or("vip = ?", params![true])
//!     .order("created_at desc")
//!     .limit(10);
//!
//! // the render engine walks the accumulated state and asks the dialect
//! // for placeholder text per 1-based position
//! assert_eq!(dialect.bind_var(1), "$1");
//! ```
//!
//! ## Mapping a field
//!
//! ```ignore
//! use anyorm::{FieldDescriptor, FieldKind, PostgresDialect, Dialect};
//!
//! let dialect = PostgresDialect::new();
//! let mut id = FieldDescriptor::new("id", FieldKind::BigInt).primary_key();
//! assert_eq!(dialect.data_type_of(&mut id), "bigserial");
//! // the inferred property is written back for DDL generation to see
//! assert!(id.tag_settings.contains("AUTO_INCREMENT"));
//! ```

pub mod client;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod field;
pub mod param;
pub mod search;

pub use client::GenericClient;
pub use dialect::{CommonDialect, Dialect, DialectRegistry, PostgresDialect, split_qualified_name};
pub use error::{OrmError, OrmResult};
pub use expr::SqlExpr;
pub use field::{FieldDescriptor, FieldKind, TagSettings};
pub use param::Param;
pub use search::{AttrMap, Preload, Scalar, Search};
