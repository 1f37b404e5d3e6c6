//! JSONC normalization using pest
//!
//! The first of the two manifest parse phases. The grammar accepts strict JSON
//! plus `//` and `/* */` comments and trailing commas; those extras are then
//! blanked out with spaces so serde_json can decode the result strictly.
//! Newlines are kept, so every line and column in the normalized text matches
//! the source.

mod error;

pub use error::{ParseError, ParsePhase};

use pest::Parser;
use pest_derive::Parser;
use std::ops::Range;

#[derive(Parser)]
#[grammar = "jsonc.pest"]
pub struct JsoncParser;

/// Normalize JSONC text into strict JSON with identical layout.
///
/// # Errors
///
/// Returns `Err` if the input is not a well-formed JSONC object, such as:
/// - Unbalanced braces or brackets
/// - Single-quoted strings or unquoted keys
/// - Unterminated block comments
/// - Anything other than an object at the top level
pub fn normalize(source: &str, filename: Option<&str>) -> Result<String, Box<ParseError>> {
    let pairs = JsoncParser::parse(Rule::document, source)
        .map_err(|err| Box::new(ParseError::from_pest(&err, source, filename)))?;

    let extras: Vec<Range<usize>> = pairs
        .flatten()
        .filter(|pair| matches!(pair.as_rule(), Rule::COMMENT | Rule::trailing_comma))
        .map(|pair| pair.as_span().start()..pair.as_span().end())
        .collect();

    Ok(blank_out(source, &extras))
}

/// Replace every byte in `ranges` with a space, keeping line breaks.
fn blank_out(source: &str, ranges: &[Range<usize>]) -> String {
    let mut bytes = source.as_bytes().to_vec();
    for range in ranges {
        for byte in &mut bytes[range.clone()] {
            if *byte != b'\n' && *byte != b'\r' {
                *byte = b' ';
            }
        }
    }
    // Ranges come from pest spans, which sit on char boundaries.
    String::from_utf8_lossy(&bytes).into_owned()
}
