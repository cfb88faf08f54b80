//! Declarative schema definition.

/// Implement [`Record`](crate::Record) for a struct from a column list.
///
/// Each entry is `<kind> <field> "<directive>"`, in column order:
///
/// | kind      | field type          |
/// |-----------|---------------------|
/// | `integer` | `i64`               |
/// | `text`    | `String`            |
/// | `date`    | `NaiveDateTime`     |
/// | `record`  | any `Record` type   |
///
/// The field identifier doubles as the field name in decode errors.
///
/// ```
/// use fixedrec::record_schema;
///
/// #[derive(Default)]
/// struct Header {
///     kind: i64,
///     text: String,
/// }
///
/// record_schema!(Header {
///     integer kind "1",
///     text text "10",
/// });
///
/// let mut h = Header::default();
/// fixedrec::decode(b"0HEADER____", &mut h).unwrap();
/// assert_eq!(h.kind, 0);
/// assert_eq!(h.text, "HEADER____");
/// ```
#[macro_export]
macro_rules! record_schema {
    (@field $schema:ident, integer, $field:ident, $directive:literal) => {
        $schema.integer(
            stringify!($field),
            $directive,
            |r| r.$field,
            |r, v| r.$field = v,
        )
    };
    (@field $schema:ident, text, $field:ident, $directive:literal) => {
        $schema.text(
            stringify!($field),
            $directive,
            |r| r.$field.as_str(),
            |r, v| r.$field = v,
        )
    };
    (@field $schema:ident, date, $field:ident, $directive:literal) => {
        $schema.datetime(stringify!($field), $directive, |r, v| r.$field = v)
    };
    (@field $schema:ident, record, $field:ident, $directive:literal) => {
        $schema.nested(stringify!($field), $directive, |r| &mut r.$field)
    };
    ($ty:ty { $($kind:ident $field:ident $directive:literal),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn schema(&self) -> $crate::Schema<Self> {
                let schema = $crate::Schema::<Self>::new();
                $(
                    let schema = $crate::record_schema!(@field schema, $kind, $field, $directive);
                )*
                schema
            }
        }
    };
}
