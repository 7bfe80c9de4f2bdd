//! Runtime value representation

use std::cell::RefCell;
use std::rc::Rc;

use lunet_sdk::TypeTag;
use rustc_hash::FxHashMap;

/// Heap table object: keys to values, shared by handle.
pub type TableObj = Rc<RefCell<FxHashMap<String, Value>>>;

/// A live value on the runtime stack.
///
/// Scalars are stored inline; tables are heap objects shared by handle, so
/// a table bound into another table (or duplicated on the stack) is the
/// same object, as in the runtime's native aggregate semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Str(String),
    /// Aggregate object handle
    Table(TableObj),
}

impl Value {
    /// Allocate a new empty table object
    pub fn table() -> Self {
        Value::Table(Rc::new(RefCell::new(FxHashMap::default())))
    }

    /// The runtime tag of this value
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::Table(_) => TypeTag::Table,
        }
    }

    /// Extract the integer, if this is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract the float, if this is one
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract the string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the table handle, if this is one
    pub fn as_table(&self) -> Option<&TableObj> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(Value::Int(1).tag(), TypeTag::Int);
        assert_eq!(Value::Float(1.0).tag(), TypeTag::Float);
        assert_eq!(Value::Str("x".into()).tag(), TypeTag::Str);
        assert_eq!(Value::table().tag(), TypeTag::Table);
    }

    #[test]
    fn test_extractors_reject_other_kinds() {
        assert_eq!(Value::Int(1).as_float(), None);
        assert_eq!(Value::Float(1.0).as_int(), None);
        assert_eq!(Value::Str("x".into()).as_table(), None);
    }

    #[test]
    fn test_table_handles_share_storage() {
        let t = Value::table();
        let copy = t.clone();
        if let (Value::Table(a), Value::Table(b)) = (&t, &copy) {
            a.borrow_mut().insert("Six".to_string(), Value::Int(7));
            assert_eq!(b.borrow().get("Six"), Some(&Value::Int(7)));
        } else {
            unreachable!();
        }
    }
}
