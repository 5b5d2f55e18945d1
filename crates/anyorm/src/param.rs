//! Parameter storage using Arc for clone-friendly query state.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly positional argument wrapper using Arc.
///
/// Clause fragments carry their arguments by value; wrapping them in `Arc`
/// lets a builder be cloned (to branch a query) without copying argument
/// values.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// Build a `Vec<Param>` from heterogeneous argument values.
///
/// ```ignore
/// let args = params!["active", 18i32];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        Vec::<$crate::Param>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Param::new($value)),+]
    };
}
