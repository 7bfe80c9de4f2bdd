//! The runtime context: value stack, global registry, invocation

use std::rc::Rc;

use lunet_sdk::CallStatus;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;

/// A named global callable.
///
/// Receives the runtime and its argument values (already popped from the
/// stack, in call order) and returns the values to leave on the stack.
pub type GlobalFn = Rc<dyn Fn(&mut Vm, &[Value]) -> RuntimeResult<Vec<Value>>>;

/// An execution context: one value stack plus a registry of global
/// callables.
///
/// The stack is the sole channel for passing arguments and results across
/// the host boundary. Positions are 0-based from the bottom. The context
/// is single-threaded; teardown is `Drop`.
#[derive(Default)]
pub struct Vm {
    stack: Vec<Value>,
    globals: FxHashMap<String, GlobalFn>,
}

impl Vm {
    /// Create an empty execution context
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Script units and globals
    // ========================================================================

    /// Load and run a script unit against this context.
    ///
    /// A script unit is a closure that executes once with full access to
    /// the context — typically to install the globals later calls resolve.
    pub fn load_chunk<F>(&mut self, chunk: F) -> RuntimeResult<()>
    where
        F: FnOnce(&mut Vm) -> RuntimeResult<()>,
    {
        debug!("loading script unit");
        chunk(self)
    }

    /// Register a global callable under `name`, replacing any prior one
    pub fn register_global<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&mut Vm, &[Value]) -> RuntimeResult<Vec<Value>> + 'static,
    {
        let name = name.into();
        debug!(global = %name, "registering global");
        self.globals.insert(name, Rc::new(f));
    }

    /// True if `name` resolves to a global callable
    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    // ========================================================================
    // Stack primitives
    // ========================================================================

    /// Push a value onto the stack
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop the top value, if any
    pub fn pop(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    /// Current stack depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Borrow the value at `position` (0-based from the bottom)
    pub fn value_at(&self, position: usize) -> Option<&Value> {
        self.stack.get(position)
    }

    /// Drop every value above `depth`
    pub fn truncate(&mut self, depth: usize) {
        self.stack.truncate(depth);
    }

    // ========================================================================
    // Table read primitives
    // ========================================================================

    /// Number of entries in the table at `position`
    pub fn table_len(&self, position: usize) -> RuntimeResult<usize> {
        let table = self.table_at(position)?;
        let len = table.borrow().len();
        Ok(len)
    }

    /// Copy the value bound under `key` out of the table at `position`
    pub fn table_field(&self, position: usize, key: &str) -> RuntimeResult<Option<Value>> {
        let table = self.table_at(position)?;
        let value = table.borrow().get(key).cloned();
        Ok(value)
    }

    fn table_at(&self, position: usize) -> RuntimeResult<crate::value::TableObj> {
        match self.stack.get(position) {
            Some(Value::Table(t)) => Ok(t.clone()),
            Some(_) => Err(RuntimeError::NotATable(position)),
            None => Err(RuntimeError::StackUnderflow {
                needed: position + 1,
                depth: self.stack.len(),
            }),
        }
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Invoke the global `name` with the top `argc` stack values,
    /// unprotected.
    ///
    /// The arguments are popped, the callable runs to completion, and its
    /// results are pushed. **Any failure is fatal to the host process**
    /// (panics with the runtime message); use [`Vm::pcall`] to recover.
    pub fn call(&mut self, name: &str, argc: usize) {
        debug!(global = name, argc, "unprotected call");
        if let Err(err) = self.invoke(name, argc) {
            panic!("fatal runtime error in unprotected call to '{name}': {err}");
        }
    }

    /// Invoke the global `name` with the top `argc` stack values through
    /// the recoverable path.
    ///
    /// On failure the stack is restored to its pre-call depth and the
    /// error payload is pushed: the results of `handler` (a global invoked
    /// with the error message), or the message itself when no handler is
    /// given or the handler is missing or fails.
    ///
    /// An `argc` exceeding the current depth never invokes the callee and
    /// never touches the values already on the stack; the underflow payload
    /// is pushed above them.
    pub fn pcall(&mut self, name: &str, argc: usize, handler: Option<&str>) -> CallStatus {
        debug!(global = name, argc, ?handler, "protected call");
        let depth = self.stack.len();
        if depth < argc {
            let err = RuntimeError::StackUnderflow {
                needed: argc,
                depth,
            };
            self.push_error_payload(handler, err.to_string());
            return CallStatus::Error;
        }
        let base = depth - argc;
        match self.invoke(name, argc) {
            Ok(()) => CallStatus::Ok,
            Err(err) => {
                self.stack.truncate(base);
                let message = err.to_string();
                self.push_error_payload(handler, message);
                CallStatus::Error
            }
        }
    }

    fn invoke(&mut self, name: &str, argc: usize) -> RuntimeResult<()> {
        let callable = self
            .globals
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedGlobal(name.to_string()))?;
        let args = self.take_args(argc)?;
        let results = callable(self, &args)?;
        self.stack.extend(results);
        Ok(())
    }

    fn take_args(&mut self, argc: usize) -> RuntimeResult<Vec<Value>> {
        let depth = self.stack.len();
        if depth < argc {
            return Err(RuntimeError::StackUnderflow {
                needed: argc,
                depth,
            });
        }
        Ok(self.stack.split_off(depth - argc))
    }

    fn push_error_payload(&mut self, handler: Option<&str>, message: String) {
        if let Some(handler_name) = handler {
            if let Some(handler_fn) = self.globals.get(handler_name).cloned() {
                let args = [Value::Str(message.clone())];
                match handler_fn(self, &args) {
                    Ok(results) => {
                        self.stack.extend(results);
                        return;
                    }
                    Err(handler_err) => {
                        self.stack.push(Value::Str(handler_err.to_string()));
                        return;
                    }
                }
            }
        }
        self.stack.push(Value::Str(message));
    }
}
