//! Lunet SDK — type-safe marshalling between host code and a stack runtime
//!
//! The Lunet runtime exchanges values with its host exclusively through an
//! ordered, mutable value stack. This crate is the host-side conversion
//! layer on top of that protocol:
//!
//! - [`ScriptValue`] / [`TypeTag`] — a closed sum type for everything that
//!   can cross the boundary, with compile-time tag resolution via
//!   [`ScriptType`].
//! - [`push_args`] / [`StackReader`] — the stack codec: serialize an
//!   argument list in call order, read heterogeneous results back with
//!   position tracking and optional strict type checking.
//! - [`Table`] — a recursive associative value mirroring the runtime's
//!   native aggregate, with explicit owned/shared nesting.
//! - [`call`] / [`protected_call`] — invoke a named global in the runtime
//!   and report how many values came back.
//!
//! The runtime itself is abstract here: everything programs against the
//! [`StackContext`] trait, which the `lunet-vm` crate implements. Host code
//! never depends on runtime internals.
//!
//! # Example
//!
//! ```ignore
//! use lunet_sdk::{call, OutSlot, ReadMode, ScriptValue, StackReader};
//!
//! let base = vm.depth();
//! let results = call(&mut vm, "scale", &[1i64.into(), 2.5f64.into()])?;
//!
//! let mut out = 0.0f64;
//! let mut reader = StackReader::new(&vm, base, ReadMode::Strict);
//! reader.read_into(&mut [OutSlot::Float(&mut out)])?;
//! ```

#![warn(missing_docs)]

mod call;
mod context;
mod convert;
mod error;
mod stack;
mod table;
mod value;

pub use call::{call, protected_call, protected_call_with_handler, CallOutcome, CallStatus};
pub use context::StackContext;
pub use convert::{FromScript, IntoScript, ScriptType};
pub use error::{MarshalError, MarshalResult};
pub use stack::{push_args, OutSlot, ReadMode, StackReader};
pub use table::{SharedTable, Table};
pub use value::{ScriptValue, TypeTag};
