use thiserror::Error;

use super::model::{Cell, FeatureTable, LabelRecord, LabelTable};

/// Tokens read as a missing measurement: the usual NA spellings written by
/// pandas, R and spreadsheet exports.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no columns to parse: input is empty")]
    Empty,
    #[error("input is not valid UTF-8")]
    NotUtf8,
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },
    #[error("line {line}: expected {expected} fields, saw {found}")]
    TooManyFields {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}, column {column}: '{token}' is not a number")]
    InvalidNumber {
        line: usize,
        column: usize,
        token: String,
    },
    #[error("line {line}: '{token}' is not an integer outcome")]
    InvalidLabel { line: usize, token: String },
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Split one line on runs of whitespace. A double-quoted field may contain
/// whitespace; the quotes themselves are dropped.
fn split_fields(line: &str, line_no: usize) -> Result<Vec<String>, ParseError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_field = false;
    let mut quoted = false;

    for ch in line.chars() {
        if quoted {
            if ch == '"' {
                quoted = false;
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            quoted = true;
            in_field = true;
        } else if ch.is_whitespace() {
            if in_field {
                fields.push(std::mem::take(&mut current));
                in_field = false;
            }
        } else {
            current.push(ch);
            in_field = true;
        }
    }

    if quoted {
        return Err(ParseError::UnterminatedQuote { line: line_no });
    }
    if in_field {
        fields.push(current);
    }
    Ok(fields)
}

/// Non-blank lines as `(1-based line number, fields)`.
fn records(text: &str) -> impl Iterator<Item = Result<(usize, Vec<String>), ParseError>> + '_ {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| split_fields(line, i + 1).map(|fields| (i + 1, fields)))
}

fn parse_cell(token: &str, line: usize, column: usize) -> Result<Cell, ParseError> {
    if MISSING_TOKENS.contains(&token) {
        return Ok(None);
    }
    token
        .parse::<f64>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|_| ParseError::InvalidNumber {
            line,
            column,
            token: token.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Public parsers
// ---------------------------------------------------------------------------

/// Parse header-less, whitespace-delimited numeric text.
///
/// The first record fixes the column count. Shorter records are padded with
/// missing cells; longer ones are rejected.
pub fn parse_feature_table(text: &str) -> Result<FeatureTable, ParseError> {
    let mut width: Option<usize> = None;
    let mut rows = Vec::new();

    for record in records(text) {
        let (line, fields) = record?;
        let expected = *width.get_or_insert(fields.len());
        if fields.len() > expected {
            return Err(ParseError::TooManyFields {
                line,
                expected,
                found: fields.len(),
            });
        }

        let row = fields
            .iter()
            .enumerate()
            .map(|(column, tok)| parse_cell(tok, line, column))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    if width.is_none() {
        return Err(ParseError::Empty);
    }
    Ok(FeatureTable::from_rows(rows))
}

/// Parse the label file: an integer outcome followed by any number of
/// further fields (typically a quoted timestamp).
pub fn parse_label_table(text: &str) -> Result<LabelTable, ParseError> {
    let mut out = Vec::new();

    for record in records(text) {
        let (line, mut fields) = record?;
        // `records` never yields an empty field list for a non-blank line.
        let first = fields.remove(0);
        let outcome = first
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidLabel { line, token: first })?;
        out.push(LabelRecord {
            outcome,
            rest: fields,
        });
    }

    if out.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(LabelTable { records: out })
}
