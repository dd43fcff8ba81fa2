use super::codec::{
    BoolCodec, Codec, FloatCodec, IntCodec, LongCodec, NameCodec, OrdinalCodec, StringCodec,
    StringSetCodec,
};
use super::{Change, Edits, Store, StoreError};


/// Errors reported by a [`Preference`].
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum Error {
    /// An absent value was passed to a preference that cannot clear itself.
    #[error("preference `{key}` cannot be set to nothing")]
    NullArgument {
        /// The preference's key.
        key: String,
    },

    /// The stored ordinal does not correspond to any enum constant.
    #[error("preference `{key}` holds ordinal {ordinal}, but only {len} values exist")]
    OrdinalOutOfRange {
        /// The preference's key.
        key: String,
        /// The ordinal found in the store.
        ordinal: i32,
        /// The number of constants the enum currently has.
        len: usize,
    },

    /// The stored name does not correspond to any enum constant.
    #[error("preference `{key}` holds unknown name `{name}`")]
    UnknownName {
        /// The preference's key.
        key: String,
        /// The name found in the store.
        name: String,
    },

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A typed view of a single key in a [`Store`].
///
/// A `Preference` holds nothing but a reference to its store, its key, its
/// codec and a default, so it is cheap to construct at every call site.
/// Every operation is a single read from the store or a single commit to it.
///
/// Two preferences of different types must never share a key: the store only
/// notices the clash when the value is read back, as
/// [`StoreError::TypeMismatch`].
pub struct Preference<'s, S: ?Sized, C: Codec> {
    store: &'s S,
    key: String,
    codec: C,
    default: C::Value,
}

/// A `bool` preference, defaulting to `false`.
pub type BooleanPreference<'s, S> = Preference<'s, S, BoolCodec>;

/// An `i32` preference, defaulting to `0`.
pub type IntPreference<'s, S> = Preference<'s, S, IntCodec>;

/// An `i64` preference, defaulting to `0`.
pub type LongPreference<'s, S> = Preference<'s, S, LongCodec>;

/// An `f32` preference, defaulting to `0.0`. `NaN` and the infinities round-trip.
pub type FloatPreference<'s, S> = Preference<'s, S, FloatCodec>;

/// A `String` preference, defaulting to the empty string.
pub type StringPreference<'s, S> = Preference<'s, S, StringCodec>;

/// A [`StringSet`](crate::StringSet) preference, defaulting to the empty set.
///
/// This is the only preference where `set_nullable(None)` clears the key
/// instead of failing.
pub type StringSetPreference<'s, S> = Preference<'s, S, StringSetCodec>;

/// An enum preference stored by ordinal.
pub type EnumPreference<'s, S, E> = Preference<'s, S, OrdinalCodec<E>>;

/// An enum preference stored by name.
pub type NamedEnumPreference<'s, S, E> = Preference<'s, S, NameCodec<E>>;

impl<'s, S: Store + ?Sized, C: Codec + Default> Preference<'s, S, C>
where
    C::Value: Default,
{
    /// Binds `key` in `store`, using the type's default when the key is unset.
    pub fn new(store: &'s S, key: impl Into<String>) -> Self {
        Self::with_codec(store, key, C::default(), C::Value::default())
    }
}

impl<'s, S: Store + ?Sized, C: Codec + Default> Preference<'s, S, C> {
    /// Binds `key` in `store`, returning `default` when the key is unset.
    pub fn with_default(store: &'s S, key: impl Into<String>, default: C::Value) -> Self {
        Self::with_codec(store, key, C::default(), default)
    }
}

impl<'s, S: Store + ?Sized, C: Codec> Preference<'s, S, C> {
    /// Binds `key` in `store` with an explicit codec and default.
    pub fn with_codec(store: &'s S, key: impl Into<String>, codec: C, default: C::Value) -> Self {
        Self {
            store,
            key: key.into(),
            codec,
            default,
        }
    }

    /// The key this preference is bound to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value [`Preference::get`] returns while the key is unset.
    #[must_use]
    pub fn default_value(&self) -> &C::Value {
        &self.default
    }

    /// Reads the current value, or the default if the key is unset.
    ///
    /// # Errors
    ///  - `Error::Store(StoreError::TypeMismatch)` if another type was stored under the key
    ///  - `Error::OrdinalOutOfRange` if an enum ordinal no longer names a constant
    ///  - `Error::UnknownName` if an enum name no longer names a constant
    pub fn get(&self) -> Result<C::Value, Error>
    where
        C::Value: Clone,
    {
        Ok(self.get_stored()?.unwrap_or_else(|| self.default.clone()))
    }

    /// Reads the current value, without falling back to the default.
    ///
    /// # Errors
    ///  - see [`Preference::get`]
    pub fn get_stored(&self) -> Result<Option<C::Value>, Error> {
        log::trace!("reading preference `{}`", self.key);
        self.store
            .get(&self.key)
            .map(|stored| self.codec.decode(&self.key, stored))
            .transpose()
    }

    /// Stores `value` and commits.
    ///
    /// # Errors
    ///  - `Error::Store` if the store rejects the commit
    pub fn set(&self, value: C::Value) -> Result<(), Error> {
        log::debug!("setting preference `{}`", self.key);
        self.commit(Change::Put {
            key: self.key.clone(),
            value: self.codec.encode(value),
        })
    }

    /// Stores `value` if there is one.
    ///
    /// With `None`, string-set preferences remove the key; all other
    /// preferences fail and leave the store untouched.
    ///
    /// # Errors
    ///  - `Error::NullArgument` for `None` on a preference that cannot clear itself
    ///  - `Error::Store` if the store rejects the commit
    pub fn set_nullable(&self, value: Option<C::Value>) -> Result<(), Error> {
        match value {
            Some(value) => self.set(value),
            None if C::CLEARS_ON_NONE => self.delete(),
            None => Err(Error::NullArgument {
                key: self.key.clone(),
            }),
        }
    }

    /// Returns whether anything is stored under the key, whatever its value.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.store.contains(&self.key)
    }

    /// Removes the key from the store. Deleting an unset preference succeeds.
    ///
    /// # Errors
    ///  - `Error::Store` if the store rejects the commit
    pub fn delete(&self) -> Result<(), Error> {
        log::debug!("deleting preference `{}`", self.key);
        self.commit(Change::Remove {
            key: self.key.clone(),
        })
    }

    fn commit(&self, change: Change) -> Result<(), Error> {
        self.store.commit(Edits {
            clear: false,
            changes: vec![change],
        })?;
        Ok(())
    }
}
