//! # fixedrec
//!
//! Fixed-column-width record encoding and decoding.
//!
//! Legacy batch systems and some financial interchange formats store one
//! record per line, with every field occupying a declared number of
//! character positions instead of being delimited. This crate converts
//! between such lines and typed Rust records.
//!
//! ## Overview
//!
//! - **Schema**: a record type lists its columns, in order, with a
//!   directive string per column (`"20,upper"`, `"12"`, `"-"`, ...)
//! - **Encoding**: integer and text columns are padded or truncated to
//!   their width and concatenated into one line
//! - **Decoding**: one line is cut into columns; bad values are collected
//!   per field instead of stopping at the first one
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDateTime;
//! use fixedrec::record_schema;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     birthday: NaiveDateTime,
//!     height: i64,
//! }
//!
//! record_schema!(Person {
//!     text name "20,upper",
//!     date birthday "8",
//!     integer height "12",
//! });
//!
//! let mut p = Person::default();
//! fixedrec::decode(b"JHON DOE            19860719000000000172", &mut p).unwrap();
//! assert_eq!(p.name, "JHON DOE");
//! assert_eq!(p.birthday.format("%B %d").to_string(), "July 19");
//! assert_eq!(p.height, 172);
//! ```

pub mod decoder;
pub mod directive;
pub mod encoder;
pub mod error;
pub mod layout;
mod macros;
pub mod options;
pub mod schema;

pub use decoder::{Decoder, decode};
pub use directive::FieldSpec;
pub use encoder::{Encoder, encode};
pub use error::{Cause, DecodeError, EncodeError, ErrorList, FieldError, FieldErrorKind};
pub use layout::{Column, DynRecord, Layout, LayoutError, LayoutField, Value};
pub use options::{DEFAULT_DATE_LAYOUT, DecoderOptions, EncoderOptions};
pub use schema::{Field, FieldKind, Record, Schema};
