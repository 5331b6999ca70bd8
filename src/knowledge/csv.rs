//! Minimal CSV reader for the knowledge base data files.
//!
//! Handles a header row, comma separators, double-quoted fields with `""`
//! escapes (including embedded newlines) and blank lines.

use std::collections::HashMap;
use std::path::Path;

use crate::error::KnowledgeError;

/// A parsed CSV file keyed by header name.
#[derive(Debug, Clone)]
pub struct Table {
    file: String,
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

/// One record of a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl Record<'_> {
    /// Cell under `column`; missing columns and short rows read as `""`.
    pub fn get(&self, column: &str) -> &str {
        self.table
            .index
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .map_or("", String::as_str)
    }
}

impl Table {
    /// Read and parse a file.
    pub fn read(path: &Path) -> Result<Self, KnowledgeError> {
        if !path.is_file() {
            return Err(KnowledgeError::MissingFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match Self::parse(&file, &text)? {
            Some(table) => Ok(table),
            None => Err(KnowledgeError::EmptyFile(path.to_path_buf())),
        }
    }

    /// Parse CSV text; `Ok(None)` when there is no header row.
    pub fn parse(file: &str, text: &str) -> Result<Option<Self>, KnowledgeError> {
        let mut records = parse_records(file, text.strip_prefix('\u{feff}').unwrap_or(text))?
            .into_iter()
            .filter(|r| !(r.len() == 1 && r[0].trim().is_empty()));

        let Some(headers) = records.next() else {
            return Ok(None);
        };
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        Ok(Some(Self {
            file: file.to_string(),
            headers,
            index,
            rows: records.collect(),
        }))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Fail unless every column in `columns` is present.
    pub fn require(&self, columns: &[&str]) -> Result<(), KnowledgeError> {
        match columns.iter().find(|c| !self.index.contains_key(**c)) {
            Some(missing) => Err(KnowledgeError::MissingColumn {
                file: self.file.clone(),
                column: (*missing).to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record { table: self, cells })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_records(file: &str, text: &str) -> Result<Vec<Vec<String>>, KnowledgeError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(KnowledgeError::Csv {
            file: file.to_string(),
            line: quote_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}
