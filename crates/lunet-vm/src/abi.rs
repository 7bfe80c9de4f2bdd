//! SDK contract implementation
//!
//! Implements `lunet_sdk::StackContext` for [`Vm`], bridging the abstract
//! stack protocol to the runtime's concrete stack and global registry.
//! Host code and the marshalling codec only ever see the trait.

use lunet_sdk::{CallStatus, MarshalError, MarshalResult, StackContext, TypeTag};

use crate::value::Value;
use crate::vm::Vm;

impl Vm {
    fn marshal_value_at(&self, position: usize) -> MarshalResult<&Value> {
        self.value_at(position).ok_or_else(|| {
            MarshalError::Runtime(format!(
                "no value at position {position} (stack depth {})",
                self.depth()
            ))
        })
    }
}

impl StackContext for Vm {
    fn push_int(&mut self, value: i64) {
        self.push(Value::Int(value));
    }

    fn push_float(&mut self, value: f64) {
        self.push(Value::Float(value));
    }

    fn push_str(&mut self, value: &str) {
        self.push(Value::Str(value.to_string()));
    }

    fn begin_table(&mut self) {
        self.push(Value::table());
    }

    fn bind_field(&mut self, key: &str) -> MarshalResult<()> {
        let value = self
            .pop()
            .ok_or_else(|| MarshalError::Runtime("bind_field on an empty stack".to_string()))?;
        let depth = self.depth();
        if depth == 0 {
            return Err(MarshalError::Runtime(
                "bind_field with no aggregate beneath the value".to_string(),
            ));
        }
        let top = depth - 1;
        match self.value_at(top) {
            Some(Value::Table(t)) => {
                let table = t.clone();
                table.borrow_mut().insert(key.to_string(), value);
                Ok(())
            }
            _ => Err(MarshalError::Runtime(format!(
                "bind_field: value at position {top} is not a table"
            ))),
        }
    }

    fn truncate(&mut self, depth: usize) {
        Vm::truncate(self, depth);
    }

    fn depth(&self) -> usize {
        Vm::depth(self)
    }

    fn tag_at(&self, position: usize) -> MarshalResult<TypeTag> {
        Ok(self.marshal_value_at(position)?.tag())
    }

    fn int_at(&self, position: usize) -> MarshalResult<i64> {
        let value = self.marshal_value_at(position)?;
        value.as_int().ok_or_else(|| MarshalError::TypeMismatch {
            expected: TypeTag::Int,
            position,
            actual: value.tag(),
        })
    }

    fn float_at(&self, position: usize) -> MarshalResult<f64> {
        let value = self.marshal_value_at(position)?;
        value.as_float().ok_or_else(|| MarshalError::TypeMismatch {
            expected: TypeTag::Float,
            position,
            actual: value.tag(),
        })
    }

    fn str_at(&self, position: usize) -> MarshalResult<String> {
        let value = self.marshal_value_at(position)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| MarshalError::TypeMismatch {
                expected: TypeTag::Str,
                position,
                actual: value.tag(),
            })
    }

    fn call_global(&mut self, name: &str, argc: usize) {
        Vm::call(self, name, argc);
    }

    fn pcall_global(&mut self, name: &str, argc: usize, handler: Option<&str>) -> CallStatus {
        Vm::pcall(self, name, argc, handler)
    }
}
