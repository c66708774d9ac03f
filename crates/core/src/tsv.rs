//! Delimited-file plumbing shared by every loader
//!
//! All dataset files are tab-separated with a header row. Loads are fail-fast:
//! the first row with an unexpected column count aborts with
//! [`Error::MalformedRecord`], nothing is skipped or repaired.

use crate::error::{Error, Result, ResultExt};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Expected width of every row in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCount {
    Exactly(usize),
    AtLeast(usize),
}

impl ColumnCount {
    fn accepts(self, len: usize) -> bool {
        match self {
            Self::Exactly(n) => len == n,
            Self::AtLeast(n) => len >= n,
        }
    }
}

/// One validated row, with its line number for error reporting
#[derive(Debug)]
pub struct Record<'a> {
    fields: StringRecord,
    line: u64,
    source_name: &'a str,
}

impl Record<'_> {
    /// Raw field text, trimmed of surrounding whitespace
    pub fn field(&self, index: usize) -> Result<&str> {
        self.fields
            .get(index)
            .map(str::trim)
            .ok_or_else(|| self.malformed(format!("missing column {index}")))
    }

    /// Parse a field, reporting the column name on failure
    pub fn parse<T>(&self, index: usize, column: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.field(index)?;
        raw.parse::<T>()
            .map_err(|e| self.malformed(format!("invalid {column} '{raw}': {e}")))
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a malformed-record error pointing at this row
    pub fn malformed(&self, message: impl Into<String>) -> Error {
        Error::malformed(self.source_name, self.line, message)
    }
}

/// Reader over a delimited source with a fixed row layout
pub struct RecordReader<R: Read> {
    inner: csv::Reader<R>,
    source_name: String,
    columns: ColumnCount,
}

impl<R: Read> RecordReader<R> {
    /// Tab-separated reader that skips the header row
    pub fn tsv(reader: R, source_name: impl Into<String>, columns: ColumnCount) -> Self {
        Self::with_delimiter(reader, b'\t', true, source_name, columns)
    }

    pub fn with_delimiter(
        reader: R,
        delimiter: u8,
        has_headers: bool,
        source_name: impl Into<String>,
        columns: ColumnCount,
    ) -> Self {
        let inner = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(reader);

        Self {
            inner,
            source_name: source_name.into(),
            columns,
        }
    }

    /// Visit every row in order, stopping at the first error
    pub fn for_each<F>(&mut self, mut visit: F) -> Result<u64>
    where
        F: FnMut(&Record<'_>) -> Result<()>,
    {
        let mut rows = 0u64;
        let mut fields = StringRecord::new();

        loop {
            let has_row = self.inner.read_record(&mut fields).map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                Error::malformed(&self.source_name, line, e.to_string())
            })?;
            if !has_row {
                break;
            }

            let line = fields.position().map(|p| p.line()).unwrap_or(0);
            let record = Record {
                fields: fields.clone(),
                line,
                source_name: &self.source_name,
            };

            if !self.columns.accepts(record.len()) {
                return Err(record.malformed(format!(
                    "expected {:?} columns, found {}",
                    self.columns,
                    record.len()
                )));
            }

            visit(&record)?;
            rows += 1;
        }

        Ok(rows)
    }
}

impl RecordReader<File> {
    /// Open a tab-separated file from disk
    pub fn open_tsv(path: &Path, columns: ColumnCount) -> Result<Self> {
        let file = open_file(path)?;
        Ok(Self::tsv(file, path.display().to_string(), columns))
    }
}

/// Tab-separated writer; callers write the header row themselves
pub fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new().delimiter(b'\t').from_writer(writer)
}

/// Open a file for reading with the path in the error message
pub fn open_file(path: &Path) -> Result<File> {
    File::open(path).context(format!("Failed to open {}", path.display()))
}

/// Create (or truncate) a file for writing with the path in the error message
pub fn create_file(path: &Path) -> Result<File> {
    File::create(path).context(format!("Failed to create {}", path.display()))
}
