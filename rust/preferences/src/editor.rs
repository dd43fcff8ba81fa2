use super::{Store, StoreError, StringSet, Value};

/// A single write recorded by an [`Editor`].
#[derive(PartialEq, Debug, Clone)]
pub enum Change {
    /// Store `value` under `key`, replacing whatever was there.
    Put {
        /// The key to write.
        key: String,
        /// The new value.
        value: Value,
    },
    /// Remove any entry under `key`. Removing an absent key is not an error.
    Remove {
        /// The key to remove.
        key: String,
    },
}

/// A batch of writes handed to [`Store::commit`].
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Edits {
    /// Remove every entry before applying `changes`.
    pub clear: bool,

    /// Writes, applied in order.
    pub changes: Vec<Change>,
}

impl Edits {
    /// Returns true if committing this batch would do nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.clear && self.changes.is_empty()
    }
}

/// Collects writes against a store and applies them with [`Editor::commit`].
///
/// Nothing is written until `commit` is called; dropping an editor discards
/// its edits.
#[must_use = "edits are only applied by calling `commit`"]
pub struct Editor<'a, S: ?Sized> {
    store: &'a S,
    edits: Edits,
}

impl<'a, S: Store + ?Sized> Editor<'a, S> {
    /// Starts an empty batch against `store`.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            edits: Edits::default(),
        }
    }

    /// Stores `value` under `key`.
    pub fn put(mut self, key: impl Into<String>, value: Value) -> Self {
        self.edits.changes.push(Change::Put {
            key: key.into(),
            value,
        });
        self
    }

    /// Shorthand for `put(key, Value::Bool(value))`.
    pub fn put_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.put(key, Value::Bool(value))
    }

    /// Shorthand for `put(key, Value::Int(value))`.
    pub fn put_int(self, key: impl Into<String>, value: i32) -> Self {
        self.put(key, Value::Int(value))
    }

    /// Shorthand for `put(key, Value::Long(value))`.
    pub fn put_long(self, key: impl Into<String>, value: i64) -> Self {
        self.put(key, Value::Long(value))
    }

    /// Shorthand for `put(key, Value::Float(value))`.
    pub fn put_float(self, key: impl Into<String>, value: f32) -> Self {
        self.put(key, Value::Float(value))
    }

    /// Shorthand for `put(key, Value::String(value))`.
    pub fn put_string(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.put(key, Value::String(value.into()))
    }

    /// Shorthand for `put(key, Value::StringSet(value))`.
    pub fn put_string_set(self, key: impl Into<String>, value: StringSet) -> Self {
        self.put(key, Value::StringSet(value))
    }

    /// Removes the entry under `key`.
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.edits.changes.push(Change::Remove { key: key.into() });
        self
    }

    /// Removes every entry in the store. The clear happens before any other
    /// change in this batch, regardless of the order the calls were made in.
    pub fn clear(mut self) -> Self {
        self.edits.clear = true;
        self
    }

    /// Applies the collected edits.
    ///
    /// # Errors
    ///  - Whatever the store's [`Store::commit`] reports
    pub fn commit(self) -> Result<(), StoreError> {
        if self.edits.is_empty() {
            return Ok(());
        }
        self.store.commit(self.edits)
    }
}
