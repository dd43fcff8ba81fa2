//! Conversions between the types preferences expose and the primitive
//! [`Value`]s a store holds.

use std::marker::PhantomData;

use super::{Error, Kind, StringSet, Value};

/// Converts between a preference's type and its stored [`Value`].
pub trait Codec {
    /// The type the preference exposes.
    type Value;

    /// Whether setting "nothing" clears the key instead of failing.
    ///
    /// Only string sets allow this; every other preference rejects an absent
    /// value with [`Error::NullArgument`].
    const CLEARS_ON_NONE: bool = false;

    /// Encodes `value` for storage.
    fn encode(&self, value: Self::Value) -> Value;

    /// Decodes a value read from `key`.
    ///
    /// # Errors
    ///  - `Error::Store(StoreError::TypeMismatch)` if `stored` is of the wrong kind
    ///  - codec-specific errors when the stored value has no meaning for this type
    fn decode(&self, key: &str, stored: Value) -> Result<Self::Value, Error>;
}

fn mismatch(key: &str, expected: Kind, found: &Value) -> Error {
    super::mismatch(key, expected, found).into()
}

macro_rules! primitive_codec {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl Codec for $name {
            type Value = $ty;

            fn encode(&self, value: $ty) -> Value {
                Value::$variant(value)
            }

            fn decode(&self, key: &str, stored: Value) -> Result<$ty, Error> {
                match stored {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch(key, Kind::$variant, &other)),
                }
            }
        }
    };
}

primitive_codec!(
    /// Stores a `bool` as [`Value::Bool`].
    BoolCodec,
    bool,
    Bool
);
primitive_codec!(
    /// Stores an `i32` as [`Value::Int`].
    IntCodec,
    i32,
    Int
);
primitive_codec!(
    /// Stores an `i64` as [`Value::Long`].
    LongCodec,
    i64,
    Long
);
primitive_codec!(
    /// Stores an `f32` as [`Value::Float`].
    FloatCodec,
    f32,
    Float
);
primitive_codec!(
    /// Stores a `String` as [`Value::String`].
    StringCodec,
    String,
    String
);

/// Stores a [`StringSet`] as [`Value::StringSet`].
///
/// Unlike the other codecs, setting an absent value through
/// [`Preference::set_nullable`](crate::Preference::set_nullable) removes the key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StringSetCodec;

impl Codec for StringSetCodec {
    type Value = StringSet;

    const CLEARS_ON_NONE: bool = true;

    fn encode(&self, value: StringSet) -> Value {
        Value::StringSet(value)
    }

    fn decode(&self, key: &str, stored: Value) -> Result<StringSet, Error> {
        match stored {
            Value::StringSet(v) => Ok(v),
            other => Err(mismatch(key, Kind::StringSet, &other)),
        }
    }
}

/// A fieldless enum whose constants can be listed in declaration order.
///
/// ```
/// use typed_preferences::Enumeration;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Theme {
///     Light,
///     Dark,
/// }
///
/// impl Enumeration for Theme {
///     const VALUES: &'static [Self] = &[Theme::Light, Theme::Dark];
///
///     fn ordinal(self) -> i32 {
///         self as i32
///     }
/// }
///
/// assert_eq!(Theme::from_ordinal(1), Some(Theme::Dark));
/// assert_eq!(Theme::from_ordinal(2), None);
/// assert_eq!(Theme::from_ordinal(-1), None);
/// ```
pub trait Enumeration: Copy + 'static {
    /// Every constant, in declaration order.
    ///
    /// `VALUES[c.ordinal()] == c` must hold for every constant `c`.
    const VALUES: &'static [Self];

    /// The zero-based position of this constant in [`Enumeration::VALUES`].
    ///
    /// This is the integer stored for the constant.
    fn ordinal(self) -> i32;

    /// Looks up the constant at `ordinal`, if there is one.
    #[must_use]
    fn from_ordinal(ordinal: i32) -> Option<Self> {
        let index = usize::try_from(ordinal).ok()?;
        Self::VALUES.get(index).copied()
    }
}

/// An [`Enumeration`] whose constants carry stable names.
pub trait NamedEnumeration: Enumeration {
    /// The stored name of this constant. Names must be unique.
    fn name(self) -> &'static str;

    /// Looks up the constant called `name`, if there is one.
    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::VALUES.iter().copied().find(|v| v.name() == name)
    }
}

/// Stores an enum as its ordinal in a [`Value::Int`].
///
/// Reordering, removing or inserting constants anywhere but the end changes
/// what existing stored data decodes to. See [`NameCodec`] for an encoding
/// that survives reordering.
pub struct OrdinalCodec<E>(PhantomData<E>);

impl<E> Default for OrdinalCodec<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E: Enumeration> Codec for OrdinalCodec<E> {
    type Value = E;

    fn encode(&self, value: E) -> Value {
        Value::Int(value.ordinal())
    }

    fn decode(&self, key: &str, stored: Value) -> Result<E, Error> {
        match stored {
            Value::Int(ordinal) => {
                E::from_ordinal(ordinal).ok_or_else(|| Error::OrdinalOutOfRange {
                    key: key.to_string(),
                    ordinal,
                    len: E::VALUES.len(),
                })
            }
            other => Err(mismatch(key, Kind::Int, &other)),
        }
    }
}

/// Stores an enum as its name in a [`Value::String`].
pub struct NameCodec<E>(PhantomData<E>);

impl<E> Default for NameCodec<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E: NamedEnumeration> Codec for NameCodec<E> {
    type Value = E;

    fn encode(&self, value: E) -> Value {
        Value::String(value.name().to_string())
    }

    fn decode(&self, key: &str, stored: Value) -> Result<E, Error> {
        match stored {
            Value::String(name) => E::from_name(&name).ok_or_else(|| Error::UnknownName {
                key: key.to_string(),
                name,
            }),
            other => Err(mismatch(key, Kind::String, &other)),
        }
    }
}
