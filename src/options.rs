//! Codec configuration.

/// Date layout used when none is configured: eight digits, `YYYYMMDD`.
///
/// Layouts use chrono `strftime` syntax.
pub const DEFAULT_DATE_LAYOUT: &str = "%Y%m%d";

/// Settings owned by a [`Decoder`](crate::Decoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Layout for date/time fields.
    pub date_layout: String,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            date_layout: DEFAULT_DATE_LAYOUT.to_string(),
        }
    }
}

impl DecoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_layout(mut self, layout: impl Into<String>) -> Self {
        self.date_layout = layout.into();
        self
    }
}

/// Settings owned by an [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Written after every record. `None` emits bare lines.
    pub line_terminator: Option<String>,
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.line_terminator = Some(terminator.into());
        self
    }
}
