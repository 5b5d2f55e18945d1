//! Field descriptors consumed by dialect type mapping.
//!
//! The reflection layer that derives these from model definitions lives
//! outside this crate; type mapping only needs the semantic kind, the
//! declared size and the tag bag.

use std::collections::BTreeMap;

/// Semantic kind of a mapped field.
///
/// A closed set: each backend maps every variant it supports and panics on
/// the rest, so an unmappable kind fails at mapping time instead of emitting
/// broken DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    /// Integer family without 64-bit overflow risk (i8..i32, u8/u16).
    Int,
    /// 64-bit integers and unsigned variants that may not fit in a plain
    /// integer column (i64, u32, u64).
    BigInt,
    Float,
    /// Character data; bounded via [`FieldDescriptor::size`].
    Text,
    /// Calendar timestamp.
    Time,
    /// Map-like value dispatched by its marker type name (e.g. `Hstore`).
    Map { type_name: String },
    /// Raw byte sequence. `fixed_len` is set for fixed-size arrays, which is
    /// what lets a 16-byte `Uuid`/`Guid` array map to a uuid column.
    Bytes {
        type_name: String,
        fixed_len: Option<usize>,
    },
    /// Anything without an intrinsic SQL mapping; only an explicit `TYPE`
    /// tag makes it mappable.
    Custom { type_name: String },
}

impl FieldKind {
    /// A map-like kind carrying its marker type name.
    pub fn map(type_name: impl Into<String>) -> Self {
        FieldKind::Map {
            type_name: type_name.into(),
        }
    }

    /// A variable-length byte sequence.
    pub fn bytes(type_name: impl Into<String>) -> Self {
        FieldKind::Bytes {
            type_name: type_name.into(),
            fixed_len: None,
        }
    }

    /// A fixed-size byte array of `len` elements.
    pub fn byte_array(type_name: impl Into<String>, len: usize) -> Self {
        FieldKind::Bytes {
            type_name: type_name.into(),
            fixed_len: Some(len),
        }
    }

    /// A kind with no intrinsic mapping.
    pub fn custom(type_name: impl Into<String>) -> Self {
        FieldKind::Custom {
            type_name: type_name.into(),
        }
    }
}

/// Mutable key-value tag bag attached to a field.
///
/// Keys are the upper-case tag names the reflection layer produces
/// (`SIZE`, `TYPE`, `AUTO_INCREMENT`, ...). Iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSettings(BTreeMap<String, String>);

impl TagSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn unset(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Everything a dialect needs to derive a column type for one field.
///
/// [`Dialect::data_type_of`](crate::Dialect::data_type_of) may write back
/// into `tag_settings` (it records inferred `AUTO_INCREMENT`), so
/// descriptors travel by mutable reference through the mapping path.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// Declared bounded size. `None` (or zero) means unbounded.
    pub size: Option<u32>,
    pub tag_settings: TagSettings,
    /// Free-text column suffix, e.g. `NOT NULL DEFAULT now()`.
    pub additional_type: String,
    pub is_primary_key: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            size: None,
            tag_settings: TagSettings::new(),
            additional_type: String::new(),
            is_primary_key: false,
        }
    }

    /// Set the declared bounded size.
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Mark the field as its entity's primary key.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Set a tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tag_settings.set(key, value);
        self
    }

    /// Set the free-text column suffix.
    pub fn additional(mut self, suffix: impl Into<String>) -> Self {
        self.additional_type = suffix.into();
        self
    }

    /// Whether the field is eligible for an auto-generating integer type.
    ///
    /// An `AUTO_INCREMENT` tag decides when present (any value except
    /// `false`, case-insensitive); otherwise primary-key position decides.
    pub fn can_auto_increment(&self) -> bool {
        match self.tag_settings.get("AUTO_INCREMENT") {
            Some(value) => !value.eq_ignore_ascii_case("false"),
            None => self.is_primary_key,
        }
    }

    /// Explicit SQL type override from the `TYPE` tag, if any.
    pub fn explicit_sql_type(&self) -> Option<&str> {
        self.tag_settings.get("TYPE")
    }
}
