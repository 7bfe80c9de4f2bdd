//! Runtime error types

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Failures raised by the runtime while executing a call or script unit.
///
/// These surface to the host either fatally (unprotected call) or as a
/// protected-call error payload; the `Display` text is the message the
/// host observes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Invocation target is not a registered global
    #[error("undefined global '{0}'")]
    UndefinedGlobal(String),

    /// A callable raised a failure
    #[error("script error: {0}")]
    Script(String),

    /// A runtime operation needed more stack values than were live
    #[error("runtime stack underflow: needed {needed}, have {depth}")]
    StackUnderflow {
        /// Values the operation required
        needed: usize,
        /// Values actually on the stack
        depth: usize,
    },

    /// An aggregate operation hit a non-table value
    #[error("value at position {0} is not a table")]
    NotATable(usize),
}
