//! Field directive parsing.
//!
//! Every field of a record carries a short directive string that controls
//! how it is laid out on the line:
//!
//! ```text
//! [<width>][,<option>]*
//! ```
//!
//! - `<width>` - number of character positions (0 or absent = rest of line)
//! - `nopad` / `nopadding` - do not pad to `width` (truncation still applies)
//! - `upper` - upper-case text before encoding
//! - `optional` - an empty token is not a decode error
//! - `-` - skip the field entirely
//!
//! Unknown options are ignored.

/// Normalized layout rules for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column width in characters; 0 means "remainder of line".
    pub width: usize,
    /// Pad to `width` when encoding. Truncation does not depend on this.
    pub padded: bool,
    /// Upper-case text before encoding.
    pub upper: bool,
    /// Field is invisible to both engines.
    pub skip: bool,
    /// Empty tokens decode to the default value without an error.
    pub optional: bool,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            width: 0,
            padded: true,
            upper: false,
            skip: false,
            optional: false,
        }
    }
}

impl FieldSpec {
    /// Parse a directive string. Never fails: a missing or malformed width
    /// leaves `width` at 0 and unrecognized options are dropped.
    pub fn parse(directive: &str) -> Self {
        let mut spec = FieldSpec::default();
        if directive.is_empty() {
            return spec;
        }

        let mut elems = directive.split(',').peekable();
        if let Some(first) = elems.peek()
            && let Ok(width) = first.parse::<usize>()
        {
            spec.width = width;
            elems.next();
        }

        for elem in elems {
            match elem {
                "nopad" | "nopadding" => spec.padded = false,
                "upper" => spec.upper = true,
                "optional" => spec.optional = true,
                "-" => spec.skip = true,
                _ => {}
            }
        }

        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directive_is_default() {
        assert_eq!(FieldSpec::parse(""), FieldSpec::default());
        let spec = FieldSpec::default();
        assert_eq!(spec.width, 0);
        assert!(spec.padded);
        assert!(!spec.upper && !spec.skip && !spec.optional);
    }

    #[test]
    fn test_width_only() {
        let spec = FieldSpec::parse("20");
        assert_eq!(spec.width, 20);
        assert!(spec.padded);
    }

    #[test]
    fn test_width_and_options() {
        let spec = FieldSpec::parse("6,upper,optional");
        assert_eq!(spec.width, 6);
        assert!(spec.upper);
        assert!(spec.optional);
        assert!(!spec.skip);
    }

    #[test]
    fn test_nopad_aliases() {
        assert!(!FieldSpec::parse("4,nopad").padded);
        assert!(!FieldSpec::parse("4,nopadding").padded);
    }

    #[test]
    fn test_skip_without_width() {
        let spec = FieldSpec::parse("-");
        assert!(spec.skip);
        assert_eq!(spec.width, 0);
    }

    #[test]
    fn test_unknown_options_ignored() {
        let spec = FieldSpec::parse("3,zerofill,upper");
        assert_eq!(spec.width, 3);
        assert!(spec.upper);
        assert!(spec.padded);
    }

    #[test]
    fn test_malformed_width_defaults_to_zero() {
        let spec = FieldSpec::parse("x12,upper");
        assert_eq!(spec.width, 0);
        assert!(spec.upper);

        // Negative widths are not widths.
        assert_eq!(FieldSpec::parse("-3").width, 0);
    }
}
