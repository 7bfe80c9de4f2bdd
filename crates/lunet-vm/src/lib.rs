//! Lunet VM — minimal embedded stack runtime
//!
//! A small dynamically-typed runtime that exchanges values with its host
//! exclusively through an ordered value stack, implementing the
//! `lunet-sdk` [`StackContext`](lunet_sdk::StackContext) contract:
//!
//! - an execution context ([`Vm`]) with create/teardown via `new`/`Drop`
//! - script-unit loading ([`Vm::load_chunk`]) and a registry of named
//!   global callables ([`Vm::register_global`])
//! - scalar and aggregate stack primitives, stack-depth queries, and typed
//!   position reads
//! - unprotected ([`Vm::call`]) and protected ([`Vm::pcall`]) invocation,
//!   the latter with an optional named error handler
//!
//! Globals are host-registered callables rather than compiled scripts —
//! the full stack-exchange protocol is identical either way, which is all
//! the marshalling layer (and its tests) depend on.

#![warn(missing_docs)]

mod abi;
mod error;
mod value;
mod vm;

pub use error::{RuntimeError, RuntimeResult};
pub use value::{TableObj, Value};
pub use vm::{GlobalFn, Vm};
