//! This module implements `ChronoError`.

use core::fmt;
use std::borrow::Cow;

use crate::fields::{DateTimeFieldType, DurationFieldType};

type Message = Cow<'static, str>;

/// `ChronoError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required collaborator was absent or a configuration was invalid.
    InvalidArgument,
    /// A value was outside of a field's legal bounds.
    IllegalFieldValue,
    /// A local instant has no corresponding UTC instant.
    IllegalInstant,
    /// A checked numeric operation exceeded its representable range.
    Overflow,
    /// A calculation was requested from an unsupported field.
    Unsupported,
    /// An internal invariant did not hold.
    #[default]
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::IllegalFieldValue => "IllegalFieldValue",
            Self::IllegalInstant => "IllegalInstant",
            Self::Overflow => "Overflow",
            Self::Unsupported => "Unsupported",
            Self::Assert => "ImplementationError",
        }
        .fmt(f)
    }
}

/// The identity of the field an illegal value was reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIdentity {
    DateTime(DateTimeFieldType),
    Duration(DurationFieldType),
}

impl FieldIdentity {
    /// Returns the name of the identified field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DateTime(t) => t.name(),
            Self::Duration(t) => t.name(),
        }
    }
}

impl From<DateTimeFieldType> for FieldIdentity {
    fn from(value: DateTimeFieldType) -> Self {
        Self::DateTime(value)
    }
}

impl From<DurationFieldType> for FieldIdentity {
    fn from(value: DurationFieldType) -> Self {
        Self::Duration(value)
    }
}

/// The offending value of an illegal field value error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalValue {
    /// A numeric value.
    Number(i64),
    /// A text value that could not be converted.
    Text(String),
}

impl fmt::Display for IllegalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Diagnostic payload of an illegal field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValueContext {
    pub field: FieldIdentity,
    pub value: IllegalValue,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl fmt::Display for FieldValueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value {} for {} ", self.value, self.field.name())?;
        match (self.lower, self.upper) {
            (None, None) => f.write_str("is not supported"),
            (None, Some(upper)) => write!(f, "must not be larger than {upper}"),
            (Some(lower), None) => write!(f, "must not be smaller than {lower}"),
            (Some(lower), Some(upper)) => {
                write!(f, "must be in the range [{lower},{upper}]")
            }
        }
    }
}

/// The error type for `chronology_rs`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChronoError {
    kind: ErrorKind,
    msg: Message,
    context: Option<Box<FieldValueContext>>,
}

impl ChronoError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Message::Borrowed(""),
            context: None,
        }
    }

    /// Create an invalid argument error.
    #[inline]
    #[must_use]
    pub const fn invalid_argument() -> Self {
        Self::new(ErrorKind::InvalidArgument)
    }

    /// Create an illegal instant error.
    #[inline]
    #[must_use]
    pub const fn illegal_instant() -> Self {
        Self::new(ErrorKind::IllegalInstant)
    }

    /// Create an arithmetic overflow error.
    #[inline]
    #[must_use]
    pub const fn overflow() -> Self {
        Self::new(ErrorKind::Overflow)
    }

    /// Create an unsupported operation error.
    #[inline]
    #[must_use]
    pub const fn unsupported() -> Self {
        Self::new(ErrorKind::Unsupported)
    }

    /// Create an assertion error.
    #[inline]
    #[must_use]
    pub const fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Create an illegal field value error for a numeric value and the bounds
    /// it violated.
    #[must_use]
    pub fn illegal_field_value(
        field: impl Into<FieldIdentity>,
        value: i64,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Self {
        Self::new(ErrorKind::IllegalFieldValue).with_context(FieldValueContext {
            field: field.into(),
            value: IllegalValue::Number(value),
            lower,
            upper,
        })
    }

    /// Create an illegal field value error for text that names no value of
    /// the field.
    #[must_use]
    pub fn illegal_field_text(field: impl Into<FieldIdentity>, text: &str) -> Self {
        Self::new(ErrorKind::IllegalFieldValue).with_context(FieldValueContext {
            field: field.into(),
            value: IllegalValue::Text(text.to_owned()),
            lower: None,
            upper: None,
        })
    }

    /// Add a message to the error.
    #[inline]
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Message>,
    {
        self.msg = msg.into();
        self
    }

    #[inline]
    #[must_use]
    fn with_context(mut self, context: FieldValueContext) -> Self {
        self.context = Some(Box::new(context));
        self
    }

    /// Prefix the current message, keeping any field context intact.
    #[must_use]
    pub fn prepend_message(mut self, prefix: &str) -> Self {
        self.msg = if self.msg.is_empty() {
            Message::Owned(prefix.to_owned())
        } else {
            Message::Owned(format!("{prefix}: {}", self.msg))
        };
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the illegal value diagnostics, if any were attached.
    #[inline]
    #[must_use]
    pub fn context(&self) -> Option<&FieldValueContext> {
        self.context.as_deref()
    }

    /// Returns the field identity carried by an illegal field value error.
    #[must_use]
    pub fn field(&self) -> Option<FieldIdentity> {
        self.context.as_ref().map(|c| c.field)
    }
}

impl fmt::Display for ChronoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.msg.is_empty() {
            write!(f, ": {}", self.msg)?;
        }

        if let Some(context) = &self.context {
            let sep = if self.msg.is_empty() { ": " } else { ", " };
            write!(f, "{sep}{context}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ChronoError {}
