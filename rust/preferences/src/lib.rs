#![doc = include_str!("../README.md")]

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

mod codec;
mod editor;
mod float;
mod preference;

#[cfg(any(test, target_os = "macos", target_os = "windows"))]
mod json;

#[cfg(any(test, feature = "test-utils"))]
mod memory;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(test)]
mod tests;

pub use codec::{
    BoolCodec, Codec, Enumeration, FloatCodec, IntCodec, LongCodec, NameCodec, NamedEnumeration,
    OrdinalCodec, StringCodec, StringSetCodec,
};
pub use editor::{Change, Edits, Editor};
pub use preference::{
    BooleanPreference, EnumPreference, Error, FloatPreference, IntPreference, LongPreference,
    NamedEnumPreference, Preference, StringPreference, StringSetPreference,
};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;

/// An ordered set of strings, as held by string-set preferences.
pub type StringSet = BTreeSet<String>;

/// A primitive value as held by a preference store.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A 32-bit integer. Enum ordinals are stored this way.
    Int(i32),
    /// A 64-bit integer.
    Long(i64),
    /// A single-precision float. NaN and the infinities are kept as-is.
    Float(#[serde(with = "float")] f32),
    /// A string.
    String(String),
    /// A set of strings.
    StringSet(StringSet),
}

impl Value {
    /// The primitive kind of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::StringSet(_) => Kind::StringSet,
        }
    }
}

/// The primitive storage kinds a store understands.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Kind {
    /// See [`Value::Bool`].
    Bool,
    /// See [`Value::Int`].
    Int,
    /// See [`Value::Long`].
    Long,
    /// See [`Value::Float`].
    Float,
    /// See [`Value::String`].
    String,
    /// See [`Value::StringSet`].
    StringSet,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::StringSet => "string set",
        })
    }
}

/// Errors reported by a [`Store`].
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum StoreError {
    /// The key holds a value of a different kind than the one requested.
    #[error("preference `{key}` holds a value of kind {found}, expected {expected}")]
    TypeMismatch {
        /// The key that was read.
        key: String,
        /// The kind the caller asked for.
        expected: Kind,
        /// The kind actually stored.
        found: Kind,
    },

    /// The underlying preference service rejected an operation.
    #[error("preference backend failed: {0}")]
    Backend(String),
}

fn mismatch(key: &str, expected: Kind, found: &Value) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

/// A key-value preference store.
///
/// Stores are shared handles: every method takes `&self`, and implementations
/// are responsible for their own synchronisation. Writes only happen through
/// [`Store::commit`], usually by way of an [`Editor`].
pub trait Store {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Returns whether anything is stored under `key`.
    ///
    /// This must agree with [`Store::get`]: an entry that `get` cannot read
    /// counts as absent.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Applies a batch of edits.
    ///
    /// If `edits.clear` is set, every entry is removed first. The changes are
    /// then applied in order.
    ///
    /// # Errors
    ///  - `StoreError::Backend` if the underlying service refuses the write
    fn commit(&self, edits: Edits) -> Result<(), StoreError>;

    /// Starts a batch of edits against this store.
    fn edit(&self) -> Editor<'_, Self>
    where
        Self: Sized,
    {
        Editor::new(self)
    }

    /// # Errors
    ///  - `StoreError::TypeMismatch` if `key` holds a non-bool value
    fn get_bool(&self, key: &str, default: bool) -> Result<bool, StoreError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => Err(mismatch(key, Kind::Bool, &other)),
        }
    }

    /// # Errors
    ///  - `StoreError::TypeMismatch` if `key` holds a non-int value
    fn get_int(&self, key: &str, default: i32) -> Result<i32, StoreError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Int(i)) => Ok(i),
            Some(other) => Err(mismatch(key, Kind::Int, &other)),
        }
    }

    /// # Errors
    ///  - `StoreError::TypeMismatch` if `key` holds a non-long value
    fn get_long(&self, key: &str, default: i64) -> Result<i64, StoreError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Long(l)) => Ok(l),
            Some(other) => Err(mismatch(key, Kind::Long, &other)),
        }
    }

    /// # Errors
    ///  - `StoreError::TypeMismatch` if `key` holds a non-float value
    fn get_float(&self, key: &str, default: f32) -> Result<f32, StoreError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Float(f)) => Ok(f),
            Some(other) => Err(mismatch(key, Kind::Float, &other)),
        }
    }

    /// # Errors
    ///  - `StoreError::TypeMismatch` if `key` holds a non-string value
    fn get_string(&self, key: &str, default: &str) -> Result<String, StoreError> {
        match self.get(key) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(mismatch(key, Kind::String, &other)),
        }
    }

    /// Note that unlike the other typed reads, an absent key reads as `None`
    /// rather than falling back to a default.
    ///
    /// # Errors
    ///  - `StoreError::TypeMismatch` if `key` holds something other than a string set
    fn get_string_set(&self, key: &str) -> Result<Option<StringSet>, StoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::StringSet(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(key, Kind::StringSet, &other)),
        }
    }
}

#[cfg(target_os = "macos")]
use macos::create_os_store;

#[cfg(target_os = "windows")]
use windows::create_os_store;

/// Opens the user's preference store for `domain` using the OS preference
/// service (`NSUserDefaults` on macOS, the current user's registry hive on
/// Windows).
#[must_use]
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub fn create_store(domain: &str) -> impl Store + use<> {
    create_os_store(domain)
}
