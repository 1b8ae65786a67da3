//! Taxonomy record parsing
//!
//! Turns delimited text into `TaxonomyNode`s. Each record is
//! `ID,Name,ISO639P3code,Level,Parent_ID`.
//!
//! Field splitting follows the quoting rule of the source files: a double
//! quote toggles quoted mode, commas inside quoted mode are literal, and the
//! quote characters themselves are dropped.

use lineage_types::{NodeLevel, TaxonomyNode};
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::char,
    combinator::rest,
    multi::{fold_many0, separated_list0},
    sequence::{delimited, preceded},
    IResult,
};
use tracing::debug;

use crate::error::RecordError;

/// Rows of one text block that became nodes, plus the rows that did not.
#[derive(Debug, Default)]
pub struct ParsedBlock {
    pub nodes: Vec<TaxonomyNode>,
    pub skipped: Vec<RecordError>,
}

// ============================================================================
// Public API
// ============================================================================

/// Split one line into raw (untrimmed) fields.
///
/// Empty fields are preserved: `a,,b,` yields four fields.
pub fn split_fields(line: &str) -> Vec<String> {
    match fields(line) {
        Ok((_, parsed)) => parsed,
        // `field` accepts any input, so this arm is not expected to run
        Err(_) => vec![line.to_string()],
    }
}

/// Parse a single record line into a node.
///
/// `line_no` is 1-based within its block and only used for diagnostics.
pub fn parse_record(line: &str, line_no: usize) -> Result<TaxonomyNode, RecordError> {
    let fields = split_fields(line);
    let get = |idx: usize| fields.get(idx).map(|f| f.trim()).unwrap_or("");

    let id = get(0);
    if id.is_empty() {
        return Err(RecordError::MissingId { line: line_no });
    }
    let name = get(1);
    if name.is_empty() {
        return Err(RecordError::MissingName {
            line: line_no,
            id: id.to_string(),
        });
    }

    let level = NodeLevel::parse(get(3)).unwrap_or_else(|| {
        debug!(id, level = get(3), "Unknown node level, treating as family");
        NodeLevel::Family
    });

    Ok(TaxonomyNode {
        id: id.to_string(),
        name: name.to_string(),
        external_code: non_empty(get(2)),
        level,
        parent_id: non_empty(get(4)),
    })
}

/// Parse a whole block: the first non-blank line is a header and is skipped,
/// blank lines are ignored, malformed rows are collected rather than fatal.
pub fn parse_block(text: &str) -> ParsedBlock {
    let mut block = ParsedBlock::default();

    let rows = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .skip(1);

    for (idx, line) in rows {
        match parse_record(line.trim(), idx + 1) {
            Ok(node) => block.nodes.push(node),
            Err(e) => block.skipped.push(e),
        }
    }

    block
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ============================================================================
// Internal Parsers
// ============================================================================

fn fields(input: &str) -> IResult<&str, Vec<String>> {
    separated_list0(char(','), field)(input)
}

/// One field: any run of quoted, unterminated-quoted and bare segments.
fn field(input: &str) -> IResult<&str, String> {
    fold_many0(
        alt((quoted, unterminated, bare)),
        String::new,
        |mut acc, segment: &str| {
            acc.push_str(segment);
            acc
        },
    )(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"'))(input)
}

/// An opening quote that is never closed swallows the rest of the line.
fn unterminated(input: &str) -> IResult<&str, &str> {
    preceded(char('"'), rest)(input)
}

fn bare(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == ',' || c == '"')(input)
}
