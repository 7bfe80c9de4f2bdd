//! Stack codec — argument pushing and position-tracked result reading
//!
//! The pusher serializes an ordered, heterogeneous argument list onto the
//! runtime stack in call order; the reader pulls results back out into host
//! destinations, advancing a cursor one consumed value at a time. Both
//! operate through [`StackContext`] only.

use crate::context::StackContext;
use crate::error::{MarshalError, MarshalResult};
use crate::value::{ScriptValue, TypeTag};

/// Push an argument list onto the runtime stack in encounter order.
///
/// Each element consumes exactly one logical stack slot; a table element
/// triggers the table's own recursive push and still counts as one slot
/// (its subtree materializes inside the aggregate, not in the argument
/// list). An empty list leaves the stack untouched.
///
/// Returns the number of slots consumed, which always equals `args.len()`.
pub fn push_args(ctx: &mut dyn StackContext, args: &[ScriptValue]) -> MarshalResult<usize> {
    for arg in args {
        match arg {
            ScriptValue::Int(v) => ctx.push_int(*v),
            ScriptValue::Float(v) => ctx.push_float(*v),
            ScriptValue::Str(s) => ctx.push_str(s),
            ScriptValue::Table(t) => t.push(ctx)?,
            ScriptValue::TableRef(h) => h.borrow().push(ctx)?,
        }
    }
    Ok(args.len())
}

/// Read-time policy for type mismatches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Verify each slot's tag before converting; mismatch is an error
    Strict,
    /// Best effort: a mismatch silently stops the read sequence and the
    /// stopping index is returned — callers must inspect it
    Permissive,
}

/// One read destination, by output reference.
///
/// The destination's type resolves its expected tag at compile time;
/// anything not representable here cannot be a read target.
pub enum OutSlot<'a> {
    /// Integer destination
    Int(&'a mut i64),
    /// Small integer destination (same tag as [`OutSlot::Int`]; narrowing
    /// follows the runtime's integer conversion)
    SmallInt(&'a mut i32),
    /// Float destination
    Float(&'a mut f64),
    /// Text destination, with an optional capacity bound in bytes
    Str {
        /// Receives the (possibly truncated) text
        dest: &'a mut String,
        /// Copy at most this many bytes; longer source text is truncated
        /// on a character boundary. `None` copies everything.
        max_len: Option<usize>,
    },
}

impl OutSlot<'_> {
    /// The tag this destination expects on the stack
    pub fn tag(&self) -> TypeTag {
        match self {
            OutSlot::Int(_) | OutSlot::SmallInt(_) => TypeTag::Int,
            OutSlot::Float(_) => TypeTag::Float,
            OutSlot::Str { .. } => TypeTag::Str,
        }
    }
}

/// Position-tracked reader for heterogeneous results.
///
/// Holds an absolute cursor into the stack. Every consumed value advances
/// the cursor by exactly one, regardless of the value's size. After a fully
/// successful [`StackReader::read_into`], the cursor equals the starting
/// position plus the number of destinations.
pub struct StackReader<'a> {
    ctx: &'a dyn StackContext,
    position: usize,
    mode: ReadMode,
}

impl<'a> StackReader<'a> {
    /// Create a reader starting at absolute stack position `start`
    pub fn new(ctx: &'a dyn StackContext, start: usize, mode: ReadMode) -> Self {
        Self {
            ctx,
            position: start,
            mode,
        }
    }

    /// The next stack position the reader will consume
    pub fn position(&self) -> usize {
        self.position
    }

    /// Read one value per destination, left to right.
    ///
    /// Returns the number of destinations populated. In strict mode that is
    /// always `slots.len()` on success; a tag mismatch fails with
    /// [`MarshalError::TypeMismatch`]. In permissive mode a mismatch stops
    /// the sequence and returns the stopping index — earlier destinations
    /// are populated, later ones untouched, and no error is raised.
    ///
    /// Before consuming each value the reader verifies that enough values
    /// remain on the stack for every remaining destination, failing with
    /// [`MarshalError::StackUnderflow`] (naming the destination type being
    /// read) before any conversion is attempted.
    pub fn read_into(&mut self, slots: &mut [OutSlot<'_>]) -> MarshalResult<usize> {
        let total = slots.len();
        for (index, slot) in slots.iter_mut().enumerate() {
            let needed = total - index;
            let remaining = self.ctx.depth().saturating_sub(self.position);
            if remaining < needed {
                return Err(MarshalError::StackUnderflow {
                    expected: slot.tag(),
                    position: self.position,
                    needed,
                    remaining,
                });
            }

            let actual = self.ctx.tag_at(self.position)?;
            if actual != slot.tag() {
                match self.mode {
                    ReadMode::Strict => {
                        return Err(MarshalError::TypeMismatch {
                            expected: slot.tag(),
                            position: self.position,
                            actual,
                        })
                    }
                    ReadMode::Permissive => return Ok(index),
                }
            }

            match slot {
                OutSlot::Int(dest) => **dest = self.ctx.int_at(self.position)?,
                OutSlot::SmallInt(dest) => **dest = self.ctx.int_at(self.position)? as i32,
                OutSlot::Float(dest) => **dest = self.ctx.float_at(self.position)?,
                OutSlot::Str { dest, max_len } => {
                    let text = self.ctx.str_at(self.position)?;
                    **dest = match max_len {
                        Some(cap) => truncate_to(text, *cap),
                        None => text,
                    };
                }
            }
            self.position += 1;
        }
        Ok(total)
    }
}

/// Keep at most `cap` bytes of `text`, never splitting a character.
///
/// The bound is a hard upper limit on bytes written to the destination;
/// source text longer than the bound is truncated, shorter text is copied
/// whole.
fn truncate_to(mut text: String, cap: usize) -> String {
    if text.len() > cap {
        let mut end = cap;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_and_exact_are_untouched() {
        assert_eq!(truncate_to("abc".to_string(), 8), "abc");
        assert_eq!(truncate_to("abc".to_string(), 3), "abc");
    }

    #[test]
    fn test_truncate_longer_is_cut_to_cap() {
        assert_eq!(truncate_to("abcdef".to_string(), 4), "abcd");
        assert_eq!(truncate_to("abcdef".to_string(), 0), "");
    }

    #[test]
    fn test_truncate_never_splits_a_character() {
        // 'é' is two bytes; a 2-byte cap lands mid-character.
        let s = "aéz".to_string();
        assert_eq!(truncate_to(s, 2), "a");
    }

    #[test]
    fn test_out_slot_tags() {
        let mut i = 0i64;
        let mut si = 0i32;
        let mut f = 0.0f64;
        let mut s = String::new();
        assert_eq!(OutSlot::Int(&mut i).tag(), TypeTag::Int);
        assert_eq!(OutSlot::SmallInt(&mut si).tag(), TypeTag::Int);
        assert_eq!(OutSlot::Float(&mut f).tag(), TypeTag::Float);
        assert_eq!(
            OutSlot::Str {
                dest: &mut s,
                max_len: None
            }
            .tag(),
            TypeTag::Str
        );
    }
}
