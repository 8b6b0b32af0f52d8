/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::error::Error;
use std::fmt;

use crate::builtin::VariantType;
use crate::meta::ClassName;

type BoxedCause = Box<dyn Error + Send + Sync>;

/// A value coming from the engine could not be converted to the requested Rust type.
///
/// The offending value is captured as its `Debug` text, which keeps the error `Send + Sync` and independent of engine
/// memory.
///
/// User conversions can report failures with [`ConvertError::new`] or [`ConvertError::with_error`].
#[derive(Debug)]
pub struct ConvertError {
    reason: Reason,
    value: Option<String>,
}

#[derive(Debug)]
enum Reason {
    /// Engine integer outside the range of a narrower Rust integer.
    IntRange { target: &'static str },

    /// Variant holds a different type.
    VariantType {
        expected: VariantType,
        actual: VariantType,
    },

    /// Object exists, but is not an instance of the expected class.
    WrongClass { expected: ClassName },

    NullObject,

    /// Ordinal does not name any enumerator.
    UnknownEnumerator { enum_name: &'static str },

    ZeroInstanceId,

    User(Option<BoxedCause>),
}

impl ConvertError {
    /// Error with a user-provided message.
    pub fn new(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::bare(Reason::User(Some(message.into())))
    }

    /// Error wrapping another error type.
    pub fn with_error<E: Into<BoxedCause>>(error: E) -> Self {
        Self::bare(Reason::User(Some(error.into())))
    }

    /// Error wrapping another error type, remembering the value that failed to convert.
    pub fn with_error_value<E, V>(error: E, value: V) -> Self
    where
        E: Into<BoxedCause>,
        V: fmt::Debug,
    {
        Self::with_value(Reason::User(Some(error.into())), value)
    }

    /// The wrapped error of user-created errors.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match &self.reason {
            Reason::User(Some(cause)) => Some(cause.as_ref()),
            _ => None,
        }
    }

    /// `Debug` text of the value that failed to convert.
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn bare(reason: Reason) -> Self {
        Self {
            reason,
            value: None,
        }
    }

    fn with_value(reason: Reason, value: impl fmt::Debug) -> Self {
        Self {
            reason,
            value: Some(format!("{value:?}")),
        }
    }

    // Constructors for the conversions implemented in this crate.

    pub(crate) fn int_range<T>(value: i64) -> Self {
        let target = std::any::type_name::<T>();
        Self::with_value(Reason::IntRange { target }, value)
    }

    pub(crate) fn variant_type(
        expected: VariantType,
        actual: VariantType,
        value: impl fmt::Debug,
    ) -> Self {
        Self::with_value(Reason::VariantType { expected, actual }, value)
    }

    pub(crate) fn wrong_class(expected: ClassName, value: impl fmt::Debug) -> Self {
        Self::with_value(Reason::WrongClass { expected }, value)
    }

    pub(crate) fn null_object() -> Self {
        Self::bare(Reason::NullObject)
    }

    pub(crate) fn unknown_enumerator(enum_name: &'static str, ord: i64) -> Self {
        Self::with_value(Reason::UnknownEnumerator { enum_name }, ord)
    }

    pub(crate) fn zero_instance_id() -> Self {
        Self::bare(Reason::ZeroInstanceId)
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Reason::IntRange { target } => write!(f, "value out of range for `{target}`")?,
            Reason::VariantType { expected, actual } => {
                write!(f, "variant of type {actual:?} where {expected:?} was expected")?
            }
            Reason::WrongClass { expected } => write!(f, "object is not a {expected}")?,
            Reason::NullObject => write!(f, "null object where Gd<T> was expected")?,
            Reason::UnknownEnumerator { enum_name } => write!(f, "no {enum_name} with this ordinal")?,
            Reason::ZeroInstanceId => write!(f, "instance ID 0 does not identify an object")?,
            Reason::User(Some(cause)) => write!(f, "{cause}")?,
            Reason::User(None) => write!(f, "conversion failed")?,
        }

        match &self.value {
            Some(value) => write!(f, " (value: {value})"),
            None => Ok(()),
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.reason {
            Reason::User(Some(cause)) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl Default for ConvertError {
    fn default() -> Self {
        Self::bare(Reason::User(None))
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_thread_safe() {
        assert_send_sync::<ConvertError>();
    }

    #[test]
    fn range_error_names_type_and_value() {
        let err = ConvertError::int_range::<u8>(300);
        assert_eq!(err.to_string(), "value out of range for `u8` (value: 300)");
        assert_eq!(err.value_str(), Some("300"));
    }

    #[test]
    fn variant_type_mismatch() {
        let err = ConvertError::variant_type(VariantType::INT, VariantType::STRING, "moss");
        assert_eq!(
            err.to_string(),
            r#"variant of type STRING where INT was expected (value: "moss")"#
        );
    }

    #[test]
    fn user_errors() {
        let wrapped = ConvertError::with_error(std::fmt::Error);
        assert!(wrapped.source().is_some());
        assert!(wrapped.value_str().is_none());

        assert_eq!(ConvertError::new("not a hex color").to_string(), "not a hex color");
        assert_eq!(ConvertError::default().to_string(), "conversion failed");

        let with_value = ConvertError::with_error_value("too long", "abcdef");
        assert_eq!(with_value.to_string(), r#"too long (value: "abcdef")"#);
    }

    #[test]
    fn unknown_enumerator() {
        let err = ConvertError::unknown_enumerator("NoiseType", 42);
        assert_eq!(err.to_string(), "no NoiseType with this ordinal (value: 42)");
    }
}
