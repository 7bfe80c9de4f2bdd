//! Conversion traits between host types and boundary values
//!
//! [`ScriptType`] is the compile-time tag resolver: a host type's runtime
//! tag is an associated constant, so the mapping has no runtime cost and no
//! failure path — a type without an impl does not compile as an argument or
//! destination. [`IntoScript`] / [`FromScript`] are the directional
//! conversions built on top of it.

use crate::error::MarshalResult;
use crate::table::{SharedTable, Table};
use crate::value::{ScriptValue, TypeTag};

/// Compile-time mapping from a host type to its runtime tag.
///
/// `i32` and `i64` both resolve to [`TypeTag::Int`] (size-class alias), and
/// `f32`/`f64` both resolve to [`TypeTag::Float`].
pub trait ScriptType {
    /// The runtime tag this host type marshals as
    const TAG: TypeTag;
}

/// Convert a host value into a boundary value.
///
/// Implemented for the supported scalar types and for tables; anything else
/// is rejected at compile time.
pub trait IntoScript {
    /// Convert into a [`ScriptValue`]
    fn into_script(self) -> ScriptValue;
}

/// Convert a boundary value back into a host type.
///
/// Returns `None` on a representation mismatch; callers that know the
/// position or key build the descriptive error (see
/// [`crate::Table::get`] and [`crate::StackReader`]).
pub trait FromScript: ScriptType + Sized {
    /// Convert from a [`ScriptValue`], if the representation matches
    fn from_script(value: ScriptValue) -> Option<Self>;
}

macro_rules! impl_script_type {
    ($($ty:ty => $tag:expr),* $(,)?) => {
        $(impl ScriptType for $ty {
            const TAG: TypeTag = $tag;
        })*
    };
}

impl_script_type! {
    i32 => TypeTag::Int,
    i64 => TypeTag::Int,
    f32 => TypeTag::Float,
    f64 => TypeTag::Float,
    String => TypeTag::Str,
    Table => TypeTag::Table,
}

impl ScriptType for &str {
    const TAG: TypeTag = TypeTag::Str;
}

impl IntoScript for i32 {
    fn into_script(self) -> ScriptValue {
        ScriptValue::Int(self as i64)
    }
}

impl IntoScript for i64 {
    fn into_script(self) -> ScriptValue {
        ScriptValue::Int(self)
    }
}

impl IntoScript for f32 {
    fn into_script(self) -> ScriptValue {
        ScriptValue::Float(self as f64)
    }
}

impl IntoScript for f64 {
    fn into_script(self) -> ScriptValue {
        ScriptValue::Float(self)
    }
}

impl IntoScript for &str {
    fn into_script(self) -> ScriptValue {
        ScriptValue::Str(self.to_string())
    }
}

impl IntoScript for String {
    fn into_script(self) -> ScriptValue {
        ScriptValue::Str(self)
    }
}

impl IntoScript for Table {
    fn into_script(self) -> ScriptValue {
        ScriptValue::Table(self)
    }
}

impl IntoScript for &SharedTable {
    fn into_script(self) -> ScriptValue {
        ScriptValue::TableRef(self.clone())
    }
}

impl IntoScript for ScriptValue {
    fn into_script(self) -> ScriptValue {
        self
    }
}

impl FromScript for i64 {
    fn from_script(value: ScriptValue) -> Option<Self> {
        match value {
            ScriptValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl FromScript for i32 {
    fn from_script(value: ScriptValue) -> Option<Self> {
        // Narrowing follows the runtime's integer conversion: truncate.
        match value {
            ScriptValue::Int(v) => Some(v as i32),
            _ => None,
        }
    }
}

impl FromScript for f64 {
    fn from_script(value: ScriptValue) -> Option<Self> {
        match value {
            ScriptValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl FromScript for f32 {
    fn from_script(value: ScriptValue) -> Option<Self> {
        match value {
            ScriptValue::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl FromScript for String {
    fn from_script(value: ScriptValue) -> Option<Self> {
        match value {
            ScriptValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl FromScript for Table {
    fn from_script(value: ScriptValue) -> Option<Self> {
        match value {
            ScriptValue::Table(t) => Some(t),
            ScriptValue::TableRef(h) => Some(h.borrow().clone()),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_script_value {
    ($($ty:ty),* $(,)?) => {
        $(impl From<$ty> for ScriptValue {
            fn from(value: $ty) -> Self {
                value.into_script()
            }
        })*
    };
}

impl_from_for_script_value!(i32, i64, f32, f64, &str, String, Table, &SharedTable);

/// Helper used by typed read paths: run the compile-time-resolved
/// conversion after the caller has already verified the tag.
pub(crate) fn convert_checked<T: FromScript>(value: ScriptValue) -> MarshalResult<T> {
    let tag = value.tag();
    T::from_script(value).ok_or_else(|| {
        crate::error::MarshalError::Runtime(format!(
            "internal tag/payload disagreement converting {tag}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_class_alias() {
        assert_eq!(<i32 as ScriptType>::TAG, TypeTag::Int);
        assert_eq!(<i64 as ScriptType>::TAG, TypeTag::Int);
        assert_eq!(<f32 as ScriptType>::TAG, TypeTag::Float);
        assert_eq!(<f64 as ScriptType>::TAG, TypeTag::Float);
    }

    #[test]
    fn test_into_script_preserves_tag() {
        assert_eq!(7i32.into_script().tag(), TypeTag::Int);
        assert_eq!(3.14f64.into_script().tag(), TypeTag::Float);
        assert_eq!("Two".into_script().tag(), TypeTag::Str);
        assert_eq!(Table::new().into_script().tag(), TypeTag::Table);
    }

    #[test]
    fn test_from_script_rejects_wrong_representation() {
        assert_eq!(i64::from_script(ScriptValue::Float(2.0)), None);
        assert_eq!(f64::from_script(ScriptValue::Int(2)), None);
        assert_eq!(String::from_script(ScriptValue::Int(2)), None);
    }

    #[test]
    fn test_from_script_round_trips() {
        assert_eq!(i64::from_script(2i64.into_script()), Some(2));
        assert_eq!(i32::from_script(2i32.into_script()), Some(2));
        assert_eq!(f64::from_script(4.14f64.into_script()), Some(4.14));
        assert_eq!(
            String::from_script("Two".into_script()),
            Some("Two".to_string())
        );
    }
}
