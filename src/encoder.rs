//! Record-to-line encoding.
//!
//! Integer columns are zero-padded on the left; text columns are truncated
//! to their width and space-padded on the left. `nopad` turns off the
//! padding only: text longer than a non-zero width is still cut, and short
//! values make the line variable in length.
//!
//! Only integer and text columns are emitted. Date, nested and opaque
//! columns are left out of the line even though the decoder reads them.

use std::io::Write;

use tracing::debug;

use crate::directive::FieldSpec;
use crate::error::EncodeError;
use crate::options::EncoderOptions;
use crate::schema::{Access, Record};

/// Writes one line per record into a byte sink.
pub struct Encoder<W> {
    writer: W,
    options: EncoderOptions,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, EncoderOptions::default())
    }

    pub fn with_options(writer: W, options: EncoderOptions) -> Self {
        Self { writer, options }
    }

    /// Encode `record` and write it, followed by the configured terminator.
    pub fn encode<R: Record>(&mut self, record: &R) -> Result<(), EncodeError> {
        let line = encode_line(record);
        self.writer.write_all(line.as_bytes())?;
        if let Some(terminator) = &self.options.line_terminator {
            self.writer.write_all(terminator.as_bytes())?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), EncodeError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Encode a single record into a fresh buffer, without a terminator.
pub fn encode<R: Record>(record: &R) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::new(Vec::new());
    encoder.encode(record)?;
    Ok(encoder.into_inner())
}

/// Build the text of one record.
pub(crate) fn encode_line<R: Record>(record: &R) -> String {
    let schema = record.schema();
    let mut line = String::new();

    for field in schema.fields() {
        let spec = FieldSpec::parse(field.directive());
        if spec.skip {
            continue;
        }
        match &field.access {
            Access::Integer { get, .. } => line.push_str(&encode_integer(get(record), &spec)),
            Access::Text { get, .. } => line.push_str(&encode_text(get(record), &spec)),
            _ => debug!(
                field = field.name(),
                kind = %field.kind(),
                "field type not encoded, omitted"
            ),
        }
    }

    line
}

fn encode_integer(value: i64, spec: &FieldSpec) -> String {
    if !spec.padded {
        return value.to_string();
    }
    let sign = if value < 0 { "-" } else { "" };
    let digits = value.unsigned_abs().to_string();
    let fill = spec.width.saturating_sub(sign.len() + digits.len());
    format!("{sign}{}{digits}", "0".repeat(fill))
}

fn encode_text(value: &str, spec: &FieldSpec) -> String {
    let text = if spec.upper {
        value.to_uppercase()
    } else {
        value.to_string()
    };
    let len = text.chars().count();
    let text = if spec.width > 0 && len > spec.width {
        text.chars().take(spec.width).collect()
    } else {
        text
    };
    if spec.padded {
        let fill = spec.width.saturating_sub(len);
        format!("{}{text}", " ".repeat(fill))
    } else {
        text
    }
}
