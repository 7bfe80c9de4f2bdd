//! Call façade — invoke named globals in the embedded runtime
//!
//! Two entry points with different result shapes: [`call`] returns a bare
//! result count and is fatal on callee failure; [`protected_call`] routes
//! through the runtime's recoverable path and returns a tagged
//! [`CallOutcome`]. Both compute the result count as the stack-depth delta
//! across the call — a callee-declared count is never trusted.

use crate::context::StackContext;
use crate::error::MarshalResult;
use crate::stack::push_args;
use crate::value::ScriptValue;

/// Status of a protected call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    /// The callee ran to completion
    Ok,
    /// The runtime raised a failure; the error payload is on the stack
    Error,
}

impl CallStatus {
    /// True for [`CallStatus::Ok`]
    pub fn is_ok(self) -> bool {
        matches!(self, CallStatus::Ok)
    }
}

/// Result of a protected call: status plus the number of values the call
/// left on the stack (results on success, error payload on failure).
/// Transient — not persisted anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOutcome {
    /// Success or runtime-raised failure
    pub status: CallStatus,
    /// Values left on the stack by the call
    pub results: usize,
}

/// Invoke the global `name` with `args`, unprotected.
///
/// Arguments are pushed in order (tables as single aggregate slots), the
/// callee runs to completion, and the count of produced values is returned;
/// the values themselves stay on the stack for a [`crate::StackReader`].
///
/// **A failure inside the callee is fatal to the host process** — the
/// runtime diverges instead of returning, and nothing here catches it. Use
/// [`protected_call`] when recovery is needed. The `Err` path of the return
/// value covers only host-side marshalling failures while pushing
/// arguments; on that path the partially pushed slots are released and the
/// stack is back at its pre-call depth.
pub fn call(
    ctx: &mut dyn StackContext,
    name: &str,
    args: &[ScriptValue],
) -> MarshalResult<usize> {
    let base = ctx.depth();
    let argc = push_checked(ctx, base, args)?;
    ctx.call_global(name, argc);
    Ok(ctx.depth() - base)
}

/// Invoke the global `name` with `args` through the recoverable path.
///
/// On failure the runtime restores the stack to its pre-call depth and
/// pushes the error message; `results` then counts that payload.
pub fn protected_call(
    ctx: &mut dyn StackContext,
    name: &str,
    args: &[ScriptValue],
) -> MarshalResult<CallOutcome> {
    protected(ctx, name, None, args)
}

/// Like [`protected_call`], but on failure the global named `handler` is
/// invoked with the error message and its results become the error payload.
pub fn protected_call_with_handler(
    ctx: &mut dyn StackContext,
    name: &str,
    handler: &str,
    args: &[ScriptValue],
) -> MarshalResult<CallOutcome> {
    protected(ctx, name, Some(handler), args)
}

fn protected(
    ctx: &mut dyn StackContext,
    name: &str,
    handler: Option<&str>,
    args: &[ScriptValue],
) -> MarshalResult<CallOutcome> {
    let base = ctx.depth();
    let argc = push_checked(ctx, base, args)?;
    let status = ctx.pcall_global(name, argc, handler);
    Ok(CallOutcome {
        status,
        results: ctx.depth() - base,
    })
}

/// Push the argument list, restoring `base` depth if any push fails.
///
/// A table push can fail partway with the earlier arguments and a
/// half-built aggregate already on the stack; those slots must not outlive
/// the error.
fn push_checked(
    ctx: &mut dyn StackContext,
    base: usize,
    args: &[ScriptValue],
) -> MarshalResult<usize> {
    match push_args(ctx, args) {
        Ok(argc) => Ok(argc),
        Err(err) => {
            ctx.truncate(base);
            Err(err)
        }
    }
}
