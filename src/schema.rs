//! Record schemas.
//!
//! A record type describes its columns with a [`Schema`]: an ordered list of
//! fields, each with a name, a directive string (see
//! [`FieldSpec`](crate::FieldSpec)) and accessors the engines use to read or
//! write the value. Declaration order is column order.
//!
//! ```
//! use fixedrec::{Record, Schema};
//!
//! #[derive(Default)]
//! struct Item {
//!     sku: String,
//!     qty: i64,
//! }
//!
//! impl Record for Item {
//!     fn schema(&self) -> Schema<Self> {
//!         Schema::<Self>::new()
//!             .text("sku", "8", |r| r.sku.as_str(), |r, v| r.sku = v)
//!             .integer("qty", "4", |r| r.qty, |r, v| r.qty = v)
//!     }
//! }
//!
//! let line = fixedrec::encode(&Item { sku: "A-1".into(), qty: 3 }).unwrap();
//! assert_eq!(line, b"     A-10003");
//! ```

use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDateTime;

use crate::decoder::{DecodeContext, decode_record};
use crate::error::DecodeError;

/// A type that can be laid out as one fixed-width line.
///
/// `schema` is called once per encode or decode call; nothing is cached
/// between calls.
pub trait Record: Sized {
    fn schema(&self) -> Schema<Self>;
}

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    DateTime,
    Nested,
    /// A type neither engine can convert.
    Opaque,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Integer => "integer",
            FieldKind::Text => "text",
            FieldKind::DateTime => "date",
            FieldKind::Nested => "record",
            FieldKind::Opaque => "opaque",
        };
        f.write_str(s)
    }
}

type Getter<R, T> = Box<dyn Fn(&R) -> T>;
type Setter<R, T> = Box<dyn Fn(&mut R, T)>;

pub(crate) enum Access<R> {
    Integer {
        get: Getter<R, i64>,
        set: Setter<R, i64>,
    },
    Text {
        get: Box<dyn Fn(&R) -> &str>,
        set: Setter<R, String>,
    },
    DateTime {
        set: Setter<R, NaiveDateTime>,
    },
    Nested(Box<dyn NestedAccess<R>>),
    Opaque {
        type_name: &'static str,
    },
}

/// Decodes a child record reachable from a parent record.
pub(crate) trait NestedAccess<R> {
    fn decode(&self, parent: &mut R, ctx: &mut DecodeContext<'_>) -> Result<(), DecodeError>;
}

struct Nested<N, F> {
    get_mut: F,
    _child: PhantomData<fn() -> N>,
}

impl<R, N, F> NestedAccess<R> for Nested<N, F>
where
    N: Record,
    F: Fn(&mut R) -> &mut N,
{
    fn decode(&self, parent: &mut R, ctx: &mut DecodeContext<'_>) -> Result<(), DecodeError> {
        decode_record((self.get_mut)(parent), ctx)
    }
}

/// One column of a record.
pub struct Field<R> {
    name: String,
    directive: String,
    pub(crate) access: Access<R>,
}

impl<R> Field<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    pub fn kind(&self) -> FieldKind {
        match self.access {
            Access::Integer { .. } => FieldKind::Integer,
            Access::Text { .. } => FieldKind::Text,
            Access::DateTime { .. } => FieldKind::DateTime,
            Access::Nested(_) => FieldKind::Nested,
            Access::Opaque { .. } => FieldKind::Opaque,
        }
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("directive", &self.directive)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Ordered field list for a record type, built with chained calls.
pub struct Schema<R> {
    fields: Vec<Field<R>>,
}

impl<R> Default for Schema<R> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<R> fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

impl<R> Schema<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(mut self, name: impl Into<String>, directive: impl Into<String>, access: Access<R>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            directive: directive.into(),
            access,
        });
        self
    }

    /// Signed integer column, zero-padded on encode.
    pub fn integer<G, S>(
        self,
        name: impl Into<String>,
        directive: impl Into<String>,
        get: G,
        set: S,
    ) -> Self
    where
        G: Fn(&R) -> i64 + 'static,
        S: Fn(&mut R, i64) + 'static,
    {
        let access = Access::Integer {
            get: Box::new(get),
            set: Box::new(set),
        };
        self.push(name, directive, access)
    }

    /// Text column, space-padded on the left on encode, trimmed on decode.
    pub fn text<G, S>(
        self,
        name: impl Into<String>,
        directive: impl Into<String>,
        get: G,
        set: S,
    ) -> Self
    where
        G: Fn(&R) -> &str + 'static,
        S: Fn(&mut R, String) + 'static,
    {
        let access = Access::Text {
            get: Box::new(get),
            set: Box::new(set),
        };
        self.push(name, directive, access)
    }

    /// Date/time column. Decoded with the decoder's date layout; the encoder
    /// does not emit date columns.
    pub fn datetime<S>(self, name: impl Into<String>, directive: impl Into<String>, set: S) -> Self
    where
        S: Fn(&mut R, NaiveDateTime) + 'static,
    {
        let access = Access::DateTime { set: Box::new(set) };
        self.push(name, directive, access)
    }

    /// Child record. Decoding it reads the next line of the source; the
    /// encoder does not emit nested columns.
    pub fn nested<N, F>(self, name: impl Into<String>, directive: impl Into<String>, get_mut: F) -> Self
    where
        N: Record + 'static,
        F: Fn(&mut R) -> &mut N + 'static,
    {
        let access = Access::Nested(Box::new(Nested {
            get_mut,
            _child: PhantomData,
        }));
        self.push(name, directive, access)
    }

    /// Column of a type the codec cannot convert. The encoder skips it and
    /// the decoder rejects it.
    pub fn opaque(
        self,
        name: impl Into<String>,
        directive: impl Into<String>,
        type_name: &'static str,
    ) -> Self {
        self.push(name, directive, Access::Opaque { type_name })
    }
}
