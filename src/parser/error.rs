//! User-friendly manifest parse errors.
//!
//! Both parse phases funnel into [`ParseError`]: pest failures from the JSONC
//! normalization step and serde_json failures from the strict decode step.
//! Each carries the phase it came from, a location when one is derivable, the
//! offending source line and an optional hint.

use std::fmt;

use super::Rule;

/// Which of the two parse phases rejected the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePhase {
    /// Comment/trailing-comma normalization: the text is not well-formed JSONC.
    Syntax,
    /// Strict decode of the normalized text: the shape of the document is wrong.
    Structure,
}

/// A structured, user-friendly parse error.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub phase: ParsePhase,
    /// Human-readable error message (no raw rule names).
    pub message: String,
    /// Line number (1-indexed), when known.
    pub line: Option<usize>,
    /// Column number (1-indexed) where the error begins.
    pub col: usize,
    /// End column for span errors (used to size the underline caret).
    pub col_end: Option<usize>,
    /// The full text of the offending source line.
    pub source_line: Option<String>,
    /// Optional source file name shown in the error header.
    pub filename: Option<String>,
    /// Optional suggestion to help the user fix the error.
    pub hint: Option<String>,
}

impl ParseError {
    /// Build a `ParseError` from a pest error, enriching it with source context.
    pub fn from_pest(
        error: &pest::error::Error<Rule>,
        source: &str,
        filename: Option<&str>,
    ) -> Self {
        let (line, col, col_end) = match error.line_col {
            pest::error::LineColLocation::Pos((l, c)) => (l, c, None),
            pest::error::LineColLocation::Span((sl, sc), (el, ec)) => {
                let end = if sl == el { Some(ec) } else { None };
                (sl, sc, end)
            }
        };

        let at_end_of_input = match error.location {
            pest::error::InputLocation::Pos(pos) => source[pos..].trim().is_empty(),
            pest::error::InputLocation::Span((_, end)) => source[end..].trim().is_empty(),
        };

        let source_line = line_of(source, line);

        let (message, hint) = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } => (
                friendly_message(positives),
                friendly_hint(positives, source_line.as_deref(), col, at_end_of_input),
            ),
            pest::error::ErrorVariant::CustomError { message } => (message.clone(), None),
        };

        ParseError {
            phase: ParsePhase::Syntax,
            message,
            line: Some(line),
            col,
            col_end,
            source_line,
            filename: filename.map(str::to_string),
            hint,
        }
    }

    /// Build a `ParseError` from a serde_json decode failure.
    ///
    /// `source` must be the normalized text; normalization keeps every byte
    /// offset unchanged so the reported position is valid in the raw file too.
    pub fn from_json(error: &serde_json::Error, source: &str, filename: Option<&str>) -> Self {
        let raw = error.to_string();
        // serde_json appends " at line N column M" to every positioned message.
        let message = match raw.rfind(" at line ") {
            Some(pos) if error.line() > 0 => raw[..pos].to_string(),
            _ => raw,
        };

        let line = (error.line() > 0).then(|| error.line());
        let source_line = line.and_then(|l| line_of(source, l));

        let hint = if message.contains("expected a string") {
            Some("Every script must map a name to a single command string.".to_string())
        } else if message.contains("expected a map") {
            Some(
                "`scripts` must be an object, e.g. `\"scripts\": { \"build\": \"make\" }`."
                    .to_string(),
            )
        } else {
            None
        };

        ParseError {
            phase: ParsePhase::Structure,
            message,
            line,
            col: error.column().max(1),
            col_end: None,
            source_line,
            filename: filename.map(str::to_string),
            hint,
        }
    }

    /// Build a `ParseError` for manifest bytes that are not valid UTF-8.
    pub fn invalid_utf8(bytes: &[u8], error: &std::str::Utf8Error, filename: Option<&str>) -> Self {
        let valid = String::from_utf8_lossy(&bytes[..error.valid_up_to()]);
        let line = valid.matches('\n').count() + 1;
        let col = valid.rsplit('\n').next().map_or(0, str::len) + 1;

        ParseError {
            phase: ParsePhase::Syntax,
            message: "file is not valid UTF-8".to_string(),
            line: Some(line),
            col,
            col_end: None,
            source_line: None,
            filename: filename.map(str::to_string),
            hint: None,
        }
    }

    /// Line and column of the error, when one is known.
    #[must_use]
    pub fn location(&self) -> Option<(usize, usize)> {
        self.line.map(|line| (line, self.col))
    }
}

fn line_of(source: &str, line: usize) -> Option<String> {
    source
        .lines()
        .nth(line.saturating_sub(1))
        .map(str::to_string)
}

/// Return a short, user-facing label for a grammar rule, or `None` to omit it.
fn rule_label(rule: Rule) -> Option<&'static str> {
    match rule {
        Rule::object => Some("object (`{ ... }`)"),
        Rule::array => Some("array"),
        Rule::member => Some("`\"key\": value` pair"),
        Rule::string => Some("string"),
        Rule::number => Some("number"),
        Rule::boolean => Some("`true` or `false`"),
        Rule::null => Some("`null`"),
        Rule::trailing_comma => Some("`,`"),
        Rule::EOI => Some("end of file"),
        _ => None,
    }
}

/// Compose a human-readable message from the expected rule set.
fn friendly_message(positives: &[Rule]) -> String {
    let mut named: Vec<&str> = positives.iter().copied().filter_map(rule_label).collect();
    named.dedup();

    match named.as_slice() {
        [] => "unexpected token".to_string(),
        [single] => format!("expected {single}"),
        [a, b] => format!("expected {a} or {b}"),
        many => match many.split_last() {
            Some((last, rest)) => format!("expected {} or {}", rest.join(", "), last),
            None => "unexpected token".to_string(),
        },
    }
}

/// Return an actionable hint based on the expected rules and context.
fn friendly_hint(
    positives: &[Rule],
    source_line: Option<&str>,
    col: usize,
    at_end_of_input: bool,
) -> Option<String> {
    if at_end_of_input && !positives.contains(&Rule::EOI) {
        return Some(
            "The file ended early. Check for a missing `}` or `]`.".to_string(),
        );
    }

    let found = source_line
        .and_then(|line| line.get(col.saturating_sub(1)..))
        .and_then(|rest| rest.chars().next());

    match found {
        Some('\'') => Some("Strings and keys must use double quotes (`\"`).".to_string()),
        Some(c)
            if (c.is_alphabetic() || c == '_')
                && (positives.contains(&Rule::member) || positives.contains(&Rule::string)) =>
        {
            Some("Object keys must be double-quoted, e.g. `\"build\": \"make\"`.".to_string())
        }
        Some(',') => Some("Remove the extra `,`.".to_string()),
        _ => None,
    }
}

/// Format the caret underline for an error at `col` with optional `col_end`.
fn underline(col: usize, col_end: Option<usize>) -> String {
    let start = col.saturating_sub(1);
    let len = col_end.map_or(1, |end| end.saturating_sub(col).max(1));
    format!("{}{}", " ".repeat(start), "^".repeat(len))
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.filename.as_deref().unwrap_or("manifest");
        match self.phase {
            ParsePhase::Syntax => write!(f, "invalid JSONC in {file}: {}", self.message)?,
            ParsePhase::Structure => write!(f, "failed to decode {file}: {}", self.message)?,
        }

        let Some(line) = self.line else {
            return Ok(());
        };

        writeln!(f)?;
        writeln!(f, "  --> {file}:{line}:{}", self.col)?;

        if let Some(ref src) = self.source_line {
            let num = line.to_string();
            let pad = " ".repeat(num.len());

            writeln!(f, "   {pad} |")?;
            writeln!(f, "   {num} | {src}")?;
            write!(f, "   {pad} | {}", underline(self.col, self.col_end))?;
        }

        if let Some(ref hint) = self.hint {
            writeln!(f)?;
            write!(f, "   = hint: {hint}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::{super::JsoncParser, *};
    use pest::Parser;

    /// Drive a real pest parse failure and convert it to `ParseError`.
    fn parse_err(input: &str, filename: Option<&str>) -> ParseError {
        let err = JsoncParser::parse(Rule::document, input)
            .expect_err("expected a parse failure for this input");
        ParseError::from_pest(&err, input, filename)
    }

    #[test]
    fn test_display_includes_filename_and_location() {
        let err = parse_err("{ \"scripts\": { \"a\": } }", Some("pkbin.jsonc"));
        let rendered = err.to_string();
        assert!(rendered.starts_with("invalid JSONC in pkbin.jsonc:"), "{rendered}");
        assert!(rendered.contains("--> pkbin.jsonc:1:"), "{rendered}");
        assert!(rendered.contains('^'), "caret missing in:\n{rendered}");
    }

    #[test]
    fn test_no_raw_rule_names_in_message() {
        for input in ["{ \"a\": }", "{ a: 1 }", "[]", ""] {
            let err = parse_err(input, None);
            assert!(
                !err.message.contains("Rule::"),
                "raw rule name in message for `{input}`: {}",
                err.message
            );
        }
    }

    #[test]
    fn test_multiline_error_points_to_correct_line() {
        let input = "{\n  \"scripts\": {\n    \"build\": 'make'\n  }\n}";
        let err = parse_err(input, None);
        assert_eq!(err.line, Some(3));
        assert_eq!(err.col, 14);
        assert!(err.source_line.as_deref().unwrap_or("").contains("'make'"));
        assert!(err.hint.as_deref().unwrap_or("").contains("double quotes"));
    }

    #[test]
    fn test_unclosed_object_hints_missing_brace() {
        let err = parse_err("{\n  \"scripts\": {\n    \"build\": \"make\"\n", None);
        assert_eq!(err.phase, ParsePhase::Syntax);
        assert!(err.hint.as_deref().unwrap_or("").contains("missing `}`"));
    }

    #[test]
    fn test_unquoted_key_hint() {
        let err = parse_err("{ scripts: {} }", None);
        assert_eq!(err.location(), Some((1, 3)));
        assert!(err.hint.as_deref().unwrap_or("").contains("double-quoted"));
    }

    #[test]
    fn test_json_error_strips_position_suffix() {
        let source = "{\n  \"scripts\": { \"build\": 1 }\n}";
        let err = serde_json::from_str::<std::collections::BTreeMap<String, serde_json::Value>>(
            "{\"a\": }",
        )
        .expect_err("invalid json");
        let parsed = ParseError::from_json(&err, source, Some("pkbin.jsonc"));
        assert_eq!(parsed.phase, ParsePhase::Structure);
        assert!(!parsed.message.contains(" at line "), "{}", parsed.message);
        assert!(parsed.to_string().starts_with("failed to decode pkbin.jsonc:"));
    }

    #[test]
    fn test_invalid_utf8_location() {
        let bytes = b"{\n  \"scripts\": \xff }";
        let err = std::str::from_utf8(bytes).expect_err("invalid utf-8");
        let parsed = ParseError::invalid_utf8(bytes, &err, None);
        assert_eq!(parsed.location(), Some((2, 14)));
        assert_eq!(parsed.message, "file is not valid UTF-8");
    }
}
