//! Recursive associative table value
//!
//! [`Table`] is the host-side mirror of the runtime's aggregate type: a map
//! from string keys to tagged dynamic values, where a value may itself be a
//! nested table. The tag and the payload travel together in one entry, so
//! the content/tag consistency invariant holds by construction.
//!
//! Nesting ownership is explicit. An entry is either *owned* (the subtree
//! lives and dies with this table) or *shared* (a non-owning handle to a
//! table whose storage lives with the last handle). A holder can never free
//! a shared subtree, so there is no double-free mode and no
//! delete-children flag: [`Table::clear`] just drops every entry.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::context::StackContext;
use crate::convert::{convert_checked, FromScript, IntoScript};
use crate::error::{MarshalError, MarshalResult};
use crate::value::{ScriptValue, TypeTag};

/// Shared handle to a table whose storage is kept alive by its handles.
///
/// Use [`Table::into_shared`] to create one, and
/// [`Table::set_table_ref`] to reference it from another table without
/// transferring ownership.
pub type SharedTable = Rc<RefCell<Table>>;

/// Maximum aggregate nesting depth accepted by [`Table::push`].
const MAX_PUSH_DEPTH: usize = 64;

/// One stored entry: tag and payload in a single closed variant.
#[derive(Debug)]
enum Entry {
    Int(i64),
    Float(f64),
    Str(String),
    /// Independently owned subtree
    Owned(Table),
    /// Non-owning handle; storage lives with the last handle
    Shared(SharedTable),
}

impl Entry {
    fn tag(&self) -> TypeTag {
        match self {
            Entry::Int(_) => TypeTag::Int,
            Entry::Float(_) => TypeTag::Float,
            Entry::Str(_) => TypeTag::Str,
            Entry::Owned(_) | Entry::Shared(_) => TypeTag::Table,
        }
    }

    /// Copy the entry out as a boundary value. Table entries are
    /// deep-copied — the caller gets an independent subtree.
    fn to_script(&self) -> ScriptValue {
        match self {
            Entry::Int(v) => ScriptValue::Int(*v),
            Entry::Float(v) => ScriptValue::Float(*v),
            Entry::Str(s) => ScriptValue::Str(s.clone()),
            Entry::Owned(t) => ScriptValue::Table(t.clone()),
            Entry::Shared(h) => ScriptValue::Table(h.borrow().clone()),
        }
    }

    fn deep_clone(&self) -> Entry {
        match self {
            Entry::Int(v) => Entry::Int(*v),
            Entry::Float(v) => Entry::Float(*v),
            Entry::Str(s) => Entry::Str(s.clone()),
            // Cloning never aliases: shared sources become owned subtrees.
            Entry::Owned(t) => Entry::Owned(t.clone()),
            Entry::Shared(h) => Entry::Owned(h.borrow().clone()),
        }
    }
}

/// Recursive associative value mirroring the runtime's aggregate type.
///
/// Created empty, populated incrementally, and serialized onto the runtime
/// stack as a single aggregate slot with [`Table::push`]. Key iteration
/// order is the hash map's and must not be assumed stable across runs.
#[derive(Debug, Default)]
pub struct Table {
    entries: FxHashMap<String, Entry>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap this table in a [`SharedTable`] handle
    pub fn into_shared(self) -> SharedTable {
        Rc::new(RefCell::new(self))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The tag stored under `key`, if present
    pub fn tag_of(&self, key: &str) -> Option<TypeTag> {
        self.entries.get(key).map(Entry::tag)
    }

    /// Iterate over the keys (unordered)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Store a value under `key`, overwriting any prior entry.
    ///
    /// The prior entry's storage is released on overwrite. A table passed
    /// through `set` is stored as an owned subtree; use
    /// [`Table::set_table_ref`] for the non-owning mode.
    pub fn set(&mut self, key: impl Into<String>, value: impl IntoScript) {
        let entry = match value.into_script() {
            ScriptValue::Int(v) => Entry::Int(v),
            ScriptValue::Float(v) => Entry::Float(v),
            ScriptValue::Str(s) => Entry::Str(s),
            ScriptValue::Table(t) => Entry::Owned(t),
            ScriptValue::TableRef(h) => Entry::Shared(h),
        };
        self.entries.insert(key.into(), entry);
    }

    /// Store an owned nested table under `key` (builder mode)
    pub fn set_table(&mut self, key: impl Into<String>, table: Table) {
        self.entries.insert(key.into(), Entry::Owned(table));
    }

    /// Store a non-owning handle to an existing table under `key`.
    ///
    /// The entry observes later mutations made through the original handle,
    /// and never releases the referenced table's storage.
    pub fn set_table_ref(&mut self, key: impl Into<String>, table: &SharedTable) {
        self.entries.insert(key.into(), Entry::Shared(table.clone()));
    }

    /// Read the value stored under `key`.
    ///
    /// Fails with [`MarshalError::KeyNotFound`] if the key is absent, and
    /// with [`MarshalError::KeyMismatch`] if the stored tag differs from
    /// the tag `T` resolves to — even when the representations would
    /// reinterpret validly. Scalars are copied out; a `Table` destination
    /// receives a deep copy of the subtree.
    pub fn get<T: FromScript>(&self, key: &str) -> MarshalResult<T> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| MarshalError::KeyNotFound {
                key: key.to_string(),
            })?;
        let actual = entry.tag();
        if actual != T::TAG {
            return Err(MarshalError::KeyMismatch {
                key: key.to_string(),
                expected: T::TAG,
                actual,
            });
        }
        convert_checked(entry.to_script())
    }

    /// Replace this table's entire content with an independent clone of
    /// `other`: scalars freshly copied, nested tables recursively cloned,
    /// never aliased.
    pub fn copy_from(&mut self, other: &Table) {
        self.entries = other.clone().entries;
    }

    /// Drop every entry.
    ///
    /// Owned subtrees are released; shared subtrees only lose this handle
    /// and stay alive for their other holders.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize this table as one aggregate onto the runtime stack.
    ///
    /// Creates an empty aggregate, then for every entry pushes the value
    /// (recursing into nested tables, which materialize as their own
    /// aggregates) and binds it under its key before moving on. The whole
    /// subtree occupies a single stack slot. Entry order is unordered map
    /// iteration.
    ///
    /// Nesting deeper than `MAX_PUSH_DEPTH` levels fails with a
    /// recoverable [`MarshalError::Runtime`] — this is also what a cyclic
    /// shared reference runs into, instead of unbounded recursion.
    pub fn push(&self, ctx: &mut dyn StackContext) -> MarshalResult<()> {
        self.push_nested(ctx, 0)
    }

    fn push_nested(&self, ctx: &mut dyn StackContext, nesting: usize) -> MarshalResult<()> {
        if nesting >= MAX_PUSH_DEPTH {
            return Err(MarshalError::Runtime(format!(
                "table nesting exceeds {MAX_PUSH_DEPTH} levels; possible cyclic shared reference"
            )));
        }
        ctx.begin_table();
        for (key, entry) in &self.entries {
            match entry {
                Entry::Int(v) => ctx.push_int(*v),
                Entry::Float(v) => ctx.push_float(*v),
                Entry::Str(s) => ctx.push_str(s),
                Entry::Owned(t) => t.push_nested(ctx, nesting + 1)?,
                Entry::Shared(h) => h.borrow().push_nested(ctx, nesting + 1)?,
            }
            ctx.bind_field(key)?;
        }
        Ok(())
    }
}

impl Clone for Table {
    /// Deep clone: the result shares no storage with the source. Shared
    /// entries are cloned into owned subtrees.
    fn clone(&self) -> Self {
        Table {
            entries: self
                .entries
                .iter()
                .map(|(k, e)| (k.clone(), e.deep_clone()))
                .collect(),
        }
    }
}
