//! Line-to-record decoding.
//!
//! A [`Decoder`] owns a line-oriented source and consumes exactly one line
//! per [`Decoder::decode`] call. Fields are cut from the line left to right
//! by their declared widths:
//!
//! ```text
//! JHON DOE            19860719000000000172
//! |---- name (20) ---||-(8)--||--(12)----|
//! ```
//!
//! Value faults are collected so that every bad column on a line is
//! reported together; structural faults stop the call at once.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};

use chrono::format::ParseErrorKind;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, trace};

use crate::directive::FieldSpec;
use crate::error::{Cause, DecodeError, ErrorList, FieldError, FieldErrorKind};
use crate::options::DecoderOptions;
use crate::schema::{Access, Record};

/// Decodes records from a line source, one line per call.
///
/// The date layout set with [`set_date_layout`](Decoder::set_date_layout)
/// and the read position both persist across calls.
///
/// Lines are read as raw bytes. Bytes that are not valid UTF-8 are replaced
/// with U+FFFD, one replacement character per bad sequence.
pub struct Decoder<B> {
    source: B,
    options: DecoderOptions,
    line_number: usize,
}

impl<B: BufRead> Decoder<B> {
    pub fn new(source: B) -> Self {
        Self::with_options(source, DecoderOptions::default())
    }

    pub fn with_options(source: B, options: DecoderOptions) -> Self {
        Self {
            source,
            options,
            line_number: 0,
        }
    }

    /// Override the date/time layout for subsequent calls.
    pub fn set_date_layout(&mut self, layout: impl Into<String>) {
        self.options.date_layout = layout.into();
    }

    pub fn date_layout(&self) -> &str {
        &self.options.date_layout
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Number of lines consumed so far, nested records included.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line and decode it into `record`.
    ///
    /// On `Err(DecodeError::Fields(_))` every field that converted cleanly
    /// has been assigned; failed fields keep their previous value.
    pub fn decode<R: Record>(&mut self, record: &mut R) -> Result<(), DecodeError> {
        let mut ctx = DecodeContext {
            source: &mut self.source,
            date_layout: &self.options.date_layout,
            line_number: &mut self.line_number,
        };
        decode_record(record, &mut ctx)
    }
}

impl<R: Read> Decoder<BufReader<R>> {
    /// Wrap an unbuffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self::new(BufReader::new(reader))
    }
}

/// Decode the first line of `data` into `record`.
pub fn decode<R: Record>(data: &[u8], record: &mut R) -> Result<(), DecodeError> {
    Decoder::new(data).decode(record)
}

/// Borrowed decoder state handed down to nested records.
pub(crate) struct DecodeContext<'a> {
    source: &'a mut dyn BufRead,
    date_layout: &'a str,
    line_number: &'a mut usize,
}

impl DecodeContext<'_> {
    /// Next line without its `\n` or `\r\n` terminator.
    fn next_line(&mut self) -> Result<String, DecodeError> {
        let mut buf = Vec::new();
        let cause = match self.source.read_until(b'\n', &mut buf) {
            Ok(0) => Cause::Exhausted,
            Ok(_) => {
                *self.line_number += 1;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                return Ok(match String::from_utf8_lossy(&buf) {
                    Cow::Borrowed(line) => line.to_string(),
                    Cow::Owned(line) => {
                        debug!(line = *self.line_number, "invalid UTF-8 replaced");
                        line
                    }
                });
            }
            Err(e) => Cause::Io(e),
        };
        debug!(line = *self.line_number, %cause, "no line to decode");
        Err(DecodeError::Fields(FieldError::end_of_input(cause).into()))
    }
}

/// Decode one line from `ctx` into `record`.
pub(crate) fn decode_record<R: Record>(
    record: &mut R,
    ctx: &mut DecodeContext<'_>,
) -> Result<(), DecodeError> {
    let line: Vec<char> = ctx.next_line()?.chars().collect();
    let schema = record.schema();
    let mut errors = ErrorList::new();
    let mut cursor: usize = 0;

    for field in schema.fields() {
        let spec = FieldSpec::parse(field.directive());
        if spec.skip {
            continue;
        }

        let end = if spec.width == 0 {
            Some(line.len())
        } else {
            cursor.checked_add(spec.width)
        };
        let end = match end {
            Some(end) if end <= line.len() => end,
            end => {
                return Err(DecodeError::LineTooShort {
                    field: field.name().to_string(),
                    end: end.unwrap_or(usize::MAX),
                    len: line.len(),
                });
            }
        };
        let raw: String = line[cursor..end].iter().collect();
        cursor = end;
        let token = raw.trim();
        trace!(field = field.name(), token, "decoding field");

        let fault = match &field.access {
            Access::Text { set, .. } => {
                set(record, token.to_string());
                None
            }
            Access::Integer { set, .. } => match token.parse::<i64>() {
                Ok(value) => {
                    set(record, value);
                    None
                }
                Err(e) => Some(FieldError::new(FieldErrorKind::InvalidInteger, field.name(), e)),
            },
            Access::DateTime { set } => match parse_datetime(token, ctx.date_layout) {
                Ok(value) => {
                    set(record, value);
                    None
                }
                Err(e) => Some(FieldError::new(FieldErrorKind::InvalidDate, field.name(), e)),
            },
            Access::Nested(nested) => match nested.decode(record, ctx) {
                Ok(()) => None,
                Err(DecodeError::Fields(inner)) => {
                    errors.extend(inner);
                    None
                }
                Err(e) => return Err(e),
            },
            Access::Opaque { type_name } => {
                return Err(DecodeError::UnsupportedType {
                    field: field.name().to_string(),
                    type_name: *type_name,
                });
            }
        };

        if let Some(fault) = fault {
            if spec.optional && token.is_empty() {
                continue;
            }
            debug!(field = field.name(), token, error = %fault.cause, "field rejected");
            errors.push(fault);
        }
    }

    errors.into_result()
}

/// Parse a date/time token. Layouts without a time component yield midnight;
/// layouts with only a time component land on the default date (1970-01-01).
fn parse_datetime(token: &str, layout: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(token, layout).or_else(|e| match e.kind() {
        ParseErrorKind::NotEnough => NaiveDate::parse_from_str(token, layout)
            .map(|d| d.and_time(NaiveTime::MIN))
            .or_else(|e| match e.kind() {
                ParseErrorKind::NotEnough => NaiveTime::parse_from_str(token, layout)
                    .map(|t| NaiveDateTime::default().date().and_time(t)),
                _ => Err(e),
            }),
        _ => Err(e),
    })
}
