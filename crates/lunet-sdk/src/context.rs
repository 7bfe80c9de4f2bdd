//! StackContext trait — abstract runtime stack operations
//!
//! Defines the interface the embedded runtime implements. The marshalling
//! layer programs against this trait without depending on runtime
//! internals; `lunet-vm` provides the concrete implementation.
//!
//! Context creation/teardown and script loading are concrete-runtime
//! concerns (constructor, `Drop`, chunk loading on the runtime type) — the
//! codec only needs the stack and invocation primitives below.

use crate::call::CallStatus;
use crate::error::MarshalResult;
use crate::value::TypeTag;

/// Abstract stack-protocol operations of the embedded runtime.
///
/// Positions are 0-based from the bottom of the stack. Inspection methods
/// are non-destructive; the codec tracks its own cursor and never asks the
/// runtime to pop.
///
/// The whole protocol is single-threaded and synchronous: an invocation
/// runs to completion before control returns, and there is no concurrent
/// access contract.
pub trait StackContext {
    // ========================================================================
    // Scalar pushing
    // ========================================================================

    /// Push an integer onto the stack
    fn push_int(&mut self, value: i64);

    /// Push a float onto the stack
    fn push_float(&mut self, value: f64);

    /// Push a string onto the stack
    fn push_str(&mut self, value: &str);

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Create an empty aggregate (table) on top of the stack
    fn begin_table(&mut self);

    /// Pop the top-of-stack value and bind it under `key` in the aggregate
    /// beneath it. Fails if the value below the top is not an aggregate.
    fn bind_field(&mut self, key: &str) -> MarshalResult<()>;

    // ========================================================================
    // Slot release
    // ========================================================================

    /// Drop every value above `depth`, releasing the dropped slots.
    ///
    /// The call façade restores the pre-call depth through this when a push
    /// sequence fails partway, so error exits never leak slots.
    fn truncate(&mut self, depth: usize);

    // ========================================================================
    // Stack inspection
    // ========================================================================

    /// Current stack depth (number of live values)
    fn depth(&self) -> usize;

    /// Runtime tag of the value at `position`
    fn tag_at(&self, position: usize) -> MarshalResult<TypeTag>;

    /// Read the integer at `position`
    fn int_at(&self, position: usize) -> MarshalResult<i64>;

    /// Read the float at `position`
    fn float_at(&self, position: usize) -> MarshalResult<f64>;

    /// Read the string at `position`
    fn str_at(&self, position: usize) -> MarshalResult<String>;

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Resolve `name` as a global callable and invoke it with the top
    /// `argc` stack values as arguments, leaving every result on the stack.
    ///
    /// Unprotected: a failure inside the callee (including an unknown
    /// name) is fatal to the host — implementations diverge rather than
    /// return. Use [`StackContext::pcall_global`] for the recoverable path.
    fn call_global(&mut self, name: &str, argc: usize);

    /// Protected variant of [`StackContext::call_global`].
    ///
    /// On failure the stack is restored to its pre-call depth and the error
    /// payload is pushed: the results of the named `handler` global invoked
    /// with the error message, or the message itself when no handler is
    /// given (or the handler is missing).
    fn pcall_global(&mut self, name: &str, argc: usize, handler: Option<&str>) -> CallStatus;
}
