//! Error types for encoding and decoding.
//!
//! Decoding distinguishes two tiers. Value faults (a bad integer, a bad
//! date) are collected in an [`ErrorList`] so that every problem on a line
//! is reported at once. Structural faults (a line too short for the layout,
//! a field type the decoder cannot convert) abort the call immediately.

use std::fmt;
use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// Category of a per-field decode fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// No line was left in the source.
    EndOfInput,
    /// Token is not a base-10 signed integer.
    InvalidInteger,
    /// Token does not match the decoder's date layout.
    InvalidDate,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldErrorKind::EndOfInput => "end of input",
            FieldErrorKind::InvalidInteger => "invalid integer",
            FieldErrorKind::InvalidDate => "invalid date",
        };
        f.write_str(s)
    }
}

/// Underlying error behind a [`FieldError`].
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Integer(#[from] ParseIntError),
    #[error(transparent)]
    Date(#[from] chrono::ParseError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("no more lines")]
    Exhausted,
}

/// One field that failed to decode.
#[derive(Debug, Error)]
#[error("{kind} on field `{field}`: {cause}")]
pub struct FieldError {
    pub kind: FieldErrorKind,
    /// Field name as declared in the schema; empty for end of input.
    pub field: String,
    #[source]
    pub cause: Cause,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, field: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self {
            kind,
            field: field.into(),
            cause: cause.into(),
        }
    }

    pub(crate) fn end_of_input(cause: Cause) -> Self {
        Self {
            kind: FieldErrorKind::EndOfInput,
            field: String::new(),
            cause,
        }
    }
}

/// Ordered collection of field faults found while decoding one line.
#[derive(Debug, Default)]
pub struct ErrorList {
    errors: Vec<FieldError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Kinds of all entries, in field order.
    pub fn kinds(&self) -> Vec<FieldErrorKind> {
        self.errors.iter().map(|e| e.kind).collect()
    }

    /// `Err` if any fault was recorded.
    pub(crate) fn into_result(self) -> Result<(), DecodeError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::Fields(self))
        }
    }
}

impl From<FieldError> for ErrorList {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl Extend<FieldError> for ErrorList {
    fn extend<T: IntoIterator<Item = FieldError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field error(s)", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{e}")?;
        }
        Ok(())
    }
}

/// Failure of a single decode call.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// One or more fields failed to convert, or the source had no line left.
    #[error("{0}")]
    Fields(ErrorList),
    /// The line ends before the field does. Later fields are left unset.
    #[error("line too short: field `{field}` ends at column {end}, line has {len} characters")]
    LineTooShort {
        field: String,
        end: usize,
        len: usize,
    },
    /// The field's declared type cannot be decoded.
    #[error("unsupported type `{type_name}` on field `{field}`")]
    UnsupportedType {
        field: String,
        type_name: &'static str,
    },
}

impl DecodeError {
    /// The per-field faults, if this is an aggregate.
    pub fn field_errors(&self) -> Option<&ErrorList> {
        match self {
            DecodeError::Fields(list) => Some(list),
            _ => None,
        }
    }

    /// True if the source ran out of lines.
    pub fn is_end_of_input(&self) -> bool {
        self.field_errors()
            .is_some_and(|list| list.iter().any(|e| e.kind == FieldErrorKind::EndOfInput))
    }

    /// True if the source ended cleanly. A failed read is end of input but
    /// not exhaustion.
    pub fn is_exhausted(&self) -> bool {
        self.field_errors().is_some_and(|list| {
            list.iter()
                .any(|e| e.kind == FieldErrorKind::EndOfInput && matches!(e.cause, Cause::Exhausted))
        })
    }
}

/// Failure of a single encode call.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}
