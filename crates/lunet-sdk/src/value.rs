//! Dynamic type tags and the boundary value sum type
//!
//! [`TypeTag`] is the closed set of runtime types that can cross the
//! host/runtime boundary. [`ScriptValue`] carries the tag and the payload
//! together — call sites never resolve a tag separately from the value it
//! describes.

use std::fmt;

use crate::table::{SharedTable, Table};

/// Runtime type tag for a boundary value.
///
/// Closed enumeration; every stored value has exactly one tag and the tag
/// always matches the value's representation (enforced by construction in
/// [`ScriptValue`] and [`Table`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Signed integer (any size class)
    Int,
    /// Floating point
    Float,
    /// Text
    Str,
    /// Associative aggregate
    Table,
}

impl TypeTag {
    /// Stable small identifier, used in error messages
    pub const fn id(self) -> u8 {
        match self {
            TypeTag::Int => 0,
            TypeTag::Float => 1,
            TypeTag::Str => 2,
            TypeTag::Table => 3,
        }
    }

    /// Human-readable name, used in error messages
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::Table => "table",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single value crossing the host/runtime boundary.
///
/// Argument lists are ordered sequences of `ScriptValue` iterated once by
/// the codec — there is no per-type dispatch at the call site. Unsupported
/// host types simply cannot be converted into one (see
/// [`crate::IntoScript`]), so they are rejected at compile time.
///
/// Tables appear in two flavors: [`ScriptValue::Table`] owns its aggregate
/// (nested-builder mode), [`ScriptValue::TableRef`] is a non-owning handle
/// to a table whose storage lives elsewhere (by-reference mode). Both
/// occupy a single logical argument slot when pushed.
#[derive(Debug, Clone)]
pub enum ScriptValue {
    /// Signed integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Str(String),
    /// Owned aggregate
    Table(Table),
    /// Shared, non-owning aggregate handle
    TableRef(SharedTable),
}

impl ScriptValue {
    /// The runtime tag of this value
    pub fn tag(&self) -> TypeTag {
        match self {
            ScriptValue::Int(_) => TypeTag::Int,
            ScriptValue::Float(_) => TypeTag::Float,
            ScriptValue::Str(_) => TypeTag::Str,
            ScriptValue::Table(_) | ScriptValue::TableRef(_) => TypeTag::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_ids_are_stable() {
        assert_eq!(TypeTag::Int.id(), 0);
        assert_eq!(TypeTag::Float.id(), 1);
        assert_eq!(TypeTag::Str.id(), 2);
        assert_eq!(TypeTag::Table.id(), 3);
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(TypeTag::Int.to_string(), "int");
        assert_eq!(TypeTag::Table.to_string(), "table");
    }

    #[test]
    fn test_value_tags_match_payload() {
        assert_eq!(ScriptValue::Int(1).tag(), TypeTag::Int);
        assert_eq!(ScriptValue::Float(1.0).tag(), TypeTag::Float);
        assert_eq!(ScriptValue::Str("x".to_string()).tag(), TypeTag::Str);
        assert_eq!(ScriptValue::Table(Table::new()).tag(), TypeTag::Table);
        let shared = Table::new().into_shared();
        assert_eq!(ScriptValue::TableRef(shared).tag(), TypeTag::Table);
    }
}
