//! Review texts from delimited tabular exports.

use crate::error::{IaGenError, Result};
use std::path::Path;

/// Header names recognised as the review-text column, in priority order.
pub const TEXT_COLUMN_CANDIDATES: &[&str] = &["review", "comentario", "texto", "opinion", "comment"];

const DELIMITERS: [char; 3] = [',', ';', '\t'];

/// Data lines inspected, after the header, when sniffing the delimiter.
const SNIFF_LINES: usize = 5;

/// A parsed CSV-like table with lowercased, trimmed header names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    delimiter: Option<char>,
}

impl ReviewTable {
    /// Reads and parses a UTF-8 file.
    ///
    /// Files in other encodings are rejected with [`IaGenError::Decode`]
    /// rather than read with replacement characters.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            IaGenError::Decode(format!(
                "{} is not valid UTF-8 (byte {}); re-export it as UTF-8",
                path.display(),
                e.utf8_error().valid_up_to()
            ))
        })?;
        Self::parse(&text)
    }

    /// Parses delimited text.
    ///
    /// The delimiter is sniffed from the header and the first data lines.
    /// A header without any delimiter is a single-column table: each line is
    /// one field, commas included.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let sample: Vec<&str> = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(SNIFF_LINES + 1)
            .collect();
        if sample.is_empty() {
            return Err(IaGenError::InvalidRequest("CSV input is empty".into()));
        }
        let delimiter = sniff_delimiter(&sample);

        let mut records = parse_records(text, delimiter).into_iter();
        let headers = records
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|h| h.trim().to_lowercase())
            .collect::<Vec<_>>();
        let rows = records.collect();

        Ok(Self {
            headers,
            rows,
            delimiter,
        })
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Delimiter detected while parsing; `None` for a single-column table.
    pub fn delimiter(&self) -> Option<char> {
        self.delimiter
    }

    /// Best guess for the review-text column: the first known name present,
    /// otherwise the first column.
    pub fn text_column(&self) -> Option<&str> {
        TEXT_COLUMN_CANDIDATES
            .iter()
            .find_map(|c| self.headers.iter().find(|h| h == c))
            .or_else(|| self.headers.first())
            .map(String::as_str)
    }

    /// Non-empty cell texts of `column` (matched case-insensitively).
    pub fn reviews(&self, column: &str) -> Result<Vec<String>> {
        let wanted = column.trim().to_lowercase();
        let idx = self
            .headers
            .iter()
            .position(|h| *h == wanted)
            .ok_or_else(|| {
                IaGenError::InvalidRequest(format!(
                    "column '{column}' not found (available: {})",
                    self.headers.join(", ")
                ))
            })?;

        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|cell| !cell.trim().is_empty())
            .cloned()
            .collect())
    }
}

/// Picks the delimiter present in the header, preferring one that every
/// sampled data line repeats at least as often as the header does.
fn sniff_delimiter(sample: &[&str]) -> Option<char> {
    let (header, data) = sample.split_first()?;
    DELIMITERS
        .iter()
        .copied()
        .map(|d| (d, header.matches(d).count()))
        .filter(|(_, in_header)| *in_header > 0)
        .max_by_key(|(d, in_header)| {
            let consistent = data.iter().all(|line| line.matches(*d).count() >= *in_header);
            (consistent, *in_header)
        })
        .map(|(d, _)| d)
}

/// Splits `text` into records, honouring double-quoted fields that may hold
/// delimiters, newlines and `""` escapes. Blank lines are skipped.
fn parse_records(text: &str, delimiter: Option<char>) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            c if Some(c) == delimiter => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }
    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.iter().all(|f| f.trim().is_empty());
    if !blank {
        records.push(record);
    }
}
