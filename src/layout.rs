//! Layouts described in text, for records without a Rust type.
//!
//! Layout format:
//! ```text
//! # person.layout
//! name      text     20,upper
//! birthday  date     8
//! height    integer  12
//! ```
//!
//! - One field per line: `<name> <kind> [directive]`
//! - `kind` is `text`, `integer` or `date`
//! - Blank lines and lines starting with `#` are ignored

use std::fmt;
use std::rc::Rc;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::directive::FieldSpec;
use crate::schema::{FieldKind, Record, Schema};

/// A layout file line that could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("layout line {line}: {message}")]
pub struct LayoutError {
    pub line: usize,
    pub message: String,
}

/// One declared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutField {
    pub name: String,
    pub kind: FieldKind,
    pub directive: String,
}

/// Span of a field on the line. `width` is `None` for a remainder field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub start: usize,
    pub width: Option<usize>,
}

/// Ordered list of fields parsed from a layout description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    fields: Vec<LayoutField>,
}

impl Layout {
    /// Parse layout text.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut fields: Vec<LayoutField> = Vec::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let err = |message: String| LayoutError {
                line: line_num + 1,
                message,
            };

            let mut parts = line.split_whitespace();
            let name = parts.next().unwrap_or_default();
            let kind = match parts.next() {
                Some(k) => parse_kind(k).ok_or_else(|| err(format!("unknown field kind: {k}")))?,
                None => return Err(err(format!("field '{name}' has no kind"))),
            };
            let directive = parts.next().unwrap_or_default();
            if let Some(extra) = parts.next() {
                return Err(err(format!("unexpected text after directive: {extra}")));
            }
            if fields.iter().any(|f| f.name == name) {
                return Err(err(format!("duplicate field '{name}'")));
            }

            fields.push(LayoutField {
                name: name.to_string(),
                kind,
                directive: directive.to_string(),
            });
        }

        if fields.is_empty() {
            return Err(LayoutError {
                line: 0,
                message: "layout declares no fields".to_string(),
            });
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[LayoutField] {
        &self.fields
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Column spans, skipped fields omitted.
    pub fn columns(&self) -> Vec<(&LayoutField, Column)> {
        let mut start = 0;
        let mut out = Vec::new();
        for field in &self.fields {
            let spec = FieldSpec::parse(&field.directive);
            if spec.skip {
                continue;
            }
            let width = (spec.width > 0).then_some(spec.width);
            out.push((field, Column { start, width }));
            start = start.saturating_add(spec.width);
        }
        out
    }
}

fn parse_kind(kind: &str) -> Option<FieldKind> {
    match kind.to_ascii_lowercase().as_str() {
        "text" | "string" => Some(FieldKind::Text),
        "integer" | "int" => Some(FieldKind::Integer),
        "date" | "datetime" => Some(FieldKind::DateTime),
        _ => None,
    }
}

/// Value held by one field of a [`DynRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
    /// `None` until a date has been decoded.
    DateTime(Option<NaiveDateTime>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(Some(dt)) => write!(f, "{dt}"),
            Value::DateTime(None) => Ok(()),
        }
    }
}

/// Record whose columns come from a [`Layout`].
#[derive(Debug, Clone)]
pub struct DynRecord {
    layout: Rc<Layout>,
    values: Vec<Value>,
}

impl DynRecord {
    /// A record holding default values for every field of `layout`.
    pub fn new(layout: Rc<Layout>) -> Self {
        let values = layout
            .fields
            .iter()
            .map(|f| match f.kind {
                FieldKind::Integer => Value::Integer(0),
                FieldKind::DateTime => Value::DateTime(None),
                _ => Value::Text(String::new()),
            })
            .collect();
        Self { layout, values }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layout.index_of(name).and_then(|i| self.values.get(i))
    }

    /// `(name, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.layout
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    /// Set a field from its textual form. Returns an error message when the
    /// field is unknown or the text does not fit the field's kind.
    pub fn set_str(&mut self, name: &str, raw: &str) -> Result<(), String> {
        let idx = self
            .layout
            .index_of(name)
            .ok_or_else(|| format!("unknown field '{name}'"))?;
        let value = match self.layout.fields[idx].kind {
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| format!("field '{name}': {e}"))?,
            FieldKind::DateTime => {
                return Err(format!("field '{name}': date fields cannot be encoded"));
            }
            _ => Value::Text(raw.to_string()),
        };
        self.put(idx, value);
        Ok(())
    }

    fn put(&mut self, idx: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(idx) {
            *slot = value;
        }
    }
}

impl Record for DynRecord {
    fn schema(&self) -> Schema<Self> {
        let mut schema = Schema::<Self>::new();
        for (i, field) in self.layout.fields.iter().enumerate() {
            let name = field.name.clone();
            let directive = field.directive.clone();
            schema = match field.kind {
                FieldKind::Integer => schema.integer(
                    name,
                    directive,
                    move |r| match r.values.get(i) {
                        Some(Value::Integer(n)) => *n,
                        _ => 0,
                    },
                    move |r, v| r.put(i, Value::Integer(v)),
                ),
                FieldKind::DateTime => {
                    schema.datetime(name, directive, move |r, v| {
                        r.put(i, Value::DateTime(Some(v)))
                    })
                }
                _ => schema.text(
                    name,
                    directive,
                    move |r| match r.values.get(i) {
                        Some(Value::Text(s)) => s.as_str(),
                        _ => "",
                    },
                    move |r, v| r.put(i, Value::Text(v)),
                ),
            };
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = "\
# person layout
name      text     20,upper
birthday  date     8
height    integer  12
";

    #[test]
    fn test_parse_layout() {
        let layout = Layout::parse(PERSON).unwrap();
        assert_eq!(layout.fields().len(), 3);
        assert_eq!(layout.fields()[0].name, "name");
        assert_eq!(layout.fields()[0].directive, "20,upper");
        assert_eq!(layout.fields()[1].kind, FieldKind::DateTime);
        assert_eq!(layout.index_of("height"), Some(2));
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = Layout::parse("a text 2\nb float 3").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("float"));
    }

    #[test]
    fn test_parse_missing_kind() {
        let err = Layout::parse("lonely").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_parse_duplicate_and_empty() {
        assert!(Layout::parse("a text 1\na integer 2").is_err());
        let err = Layout::parse("# nothing\n\n").unwrap_err();
        assert_eq!(err.line, 0);
    }

    #[test]
    fn test_columns() {
        let layout = Layout::parse("kind integer 1\nhidden text 4,-\ntext text 9\nrest text").unwrap();
        let cols: Vec<(&str, Column)> = layout
            .columns()
            .into_iter()
            .map(|(f, c)| (f.name.as_str(), c))
            .collect();
        assert_eq!(
            cols,
            vec![
                ("kind", Column { start: 0, width: Some(1) }),
                ("text", Column { start: 1, width: Some(9) }),
                ("rest", Column { start: 10, width: None }),
            ]
        );
    }

    #[test]
    fn test_columns_saturate_on_huge_widths() {
        let layout =
            Layout::parse("a text 18446744073709551615\nb integer 5\nc text 3").unwrap();
        let starts: Vec<usize> = layout.columns().iter().map(|(_, c)| c.start).collect();
        assert_eq!(starts, vec![0, usize::MAX, usize::MAX]);
    }

    #[test]
    fn test_dyn_record_decode() {
        let layout = Rc::new(Layout::parse(PERSON).unwrap());
        let mut rec = DynRecord::new(layout);
        crate::decode(b"JHON DOE            19860719000000000172", &mut rec).unwrap();
        assert_eq!(rec.get("name"), Some(&Value::Text("JHON DOE".to_string())));
        assert_eq!(rec.get("height"), Some(&Value::Integer(172)));
        assert_eq!(
            rec.get("birthday").map(|v| v.to_string()).as_deref(),
            Some("1986-07-19 00:00:00")
        );
    }

    #[test]
    fn test_dyn_record_encode() {
        let layout = Rc::new(Layout::parse(PERSON).unwrap());
        let mut rec = DynRecord::new(layout);
        rec.set_str("name", "jhon doe").unwrap();
        rec.set_str("height", "172").unwrap();
        let line = crate::encode(&rec).unwrap();
        // Date columns are not emitted.
        assert_eq!(line, b"            JHON DOE000000000172");
    }

    #[test]
    fn test_set_str_errors() {
        let layout = Rc::new(Layout::parse(PERSON).unwrap());
        let mut rec = DynRecord::new(layout);
        assert!(rec.set_str("weight", "1").is_err());
        assert!(rec.set_str("height", "tall").is_err());
        assert!(rec.set_str("birthday", "19860719").is_err());
    }

    #[test]
    fn test_iter_in_layout_order() {
        let layout = Rc::new(Layout::parse(PERSON).unwrap());
        let rec = DynRecord::new(layout);
        let names: Vec<&str> = rec.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "birthday", "height"]);
    }
}
