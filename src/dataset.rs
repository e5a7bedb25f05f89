//! In-memory tabular dataset and CSV ingestion.

use std::fs;
use std::io::Read;
use std::mem::size_of;
use std::path::Path;

use foldhash::{HashSet, HashSetExt};
use tracing::debug;

use crate::encoding::decode_to_utf8;
use crate::error::{ProfileError, Result};
use crate::field_type::{ColumnKind, Value, parse_number};
use crate::options::ReadOptions;

/// A named column with its kind fixed at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name (unique within a dataset).
    pub name: String,
    /// Data type of the column.
    pub kind: ColumnKind,
    /// One cell per row; `None` is a null.
    pub cells: Vec<Option<Value>>,
}

impl Column {
    /// Build a column from typed cells, deriving its kind from the values.
    pub fn new(name: impl Into<String>, cells: Vec<Option<Value>>) -> Self {
        let kind = ColumnKind::of_values(cells.iter().flatten());
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Build a column from raw text fields, applying the numeric conversion rule.
    fn from_raw(name: String, raw: Vec<Option<String>>) -> Self {
        let kind = ColumnKind::of_raw(raw.iter().flatten().map(String::as_str));
        let cells = match kind {
            ColumnKind::Numeric => raw
                .into_iter()
                .map(|cell| cell.as_deref().and_then(parse_number).map(Value::Number))
                .collect(),
            _ => raw.into_iter().map(|cell| cell.map(Value::Text)).collect(),
        };
        Self { name, kind, cells }
    }
}

/// A dataset stored column-wise. All columns have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Dataset {
    /// Create an empty dataset with no columns.
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
            num_rows: 0,
        }
    }

    /// Build a dataset from columns.
    ///
    /// Returns `RaggedRow` if the columns differ in length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, |c| c.cells.len());
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != num_rows) {
            return Err(ProfileError::RaggedRow {
                record: num_rows.min(bad.cells.len()) + 1,
                expected: num_rows,
                found: bad.cells.len(),
            });
        }
        let names = columns.iter().map(|c| c.name.clone()).collect();
        let names = dedupe_names(names);
        let columns = columns
            .into_iter()
            .zip(names)
            .map(|(col, name)| Column { name, ..col })
            .collect();
        Ok(Self { columns, num_rows })
    }

    /// Build a dataset from row-major typed values.
    pub fn from_rows<S: Into<String>>(
        names: Vec<S>,
        rows: Vec<Vec<Option<Value>>>,
    ) -> Result<Self> {
        let width = names.len();
        let mut cells: Vec<Vec<Option<Value>>> =
            (0..width).map(|_| Vec::with_capacity(rows.len())).collect();

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(ProfileError::RaggedRow {
                    record: i + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col, value) in cells.iter_mut().zip(row) {
                col.push(value);
            }
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Self::from_columns(columns)
    }

    /// Load a dataset from a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProfileError::SourceNotFound(path.to_path_buf()));
        }
        let data = fs::read(path)?;
        debug!(path = %path.display(), bytes = data.len(), "read dataset");
        Self::from_csv_bytes(&data, options)
    }

    /// Load a dataset from a reader. The whole input is read into memory.
    pub fn from_reader<R: Read>(mut reader: R, options: &ReadOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_csv_bytes(&data, options)
    }

    /// Parse CSV bytes with a header row into a dataset.
    pub fn from_csv_bytes(data: &[u8], options: &ReadOptions) -> Result<Self> {
        let (data, encoding) = decode_to_utf8(data);
        if let Some(from) = encoding.transcoded_from {
            debug!(encoding = from, "transcoded input to UTF-8");
        }

        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(ProfileError::EmptyData);
        }

        let delimiter = options.delimiter.resolve(&data);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(&data[..]);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ProfileError::EmptyData);
        }
        let width = headers.len();
        let names = dedupe_names(headers.iter().map(str::to_string).collect());

        let estimated_rows = bytecount::count(&data, b'\n');
        let mut raw: Vec<Vec<Option<String>>> =
            (0..width).map(|_| Vec::with_capacity(estimated_rows)).collect();

        let mut record = csv::StringRecord::new();
        let mut num_rows = 0;
        while reader.read_record(&mut record)? {
            if record.len() > width {
                return Err(ProfileError::RaggedRow {
                    record: num_rows + 1,
                    expected: width,
                    found: record.len(),
                });
            }
            // Short records are padded with nulls
            for (i, col) in raw.iter_mut().enumerate() {
                let cell = record.get(i).filter(|field| !options.is_null(field));
                col.push(cell.map(str::to_string));
            }
            num_rows += 1;
        }

        let columns = names
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| Column::from_raw(name, cells))
            .collect();

        debug!(rows = num_rows, columns = width, delimiter = %(delimiter as char), "parsed dataset");
        Ok(Self { columns, num_rows })
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the dataset has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Columns in header order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.columns.iter().map(move |c| c.cells[index].as_ref())
    }

    /// Best-effort deep estimate of the in-memory size in bytes.
    ///
    /// Counts the dataset and column headers, every cell slot, and string heap
    /// capacity. Allocator overhead is not included.
    pub fn estimated_size_bytes(&self) -> usize {
        let mut total = size_of::<Self>();
        for col in &self.columns {
            total += size_of::<Column>() + col.name.capacity();
            total += col.cells.capacity() * size_of::<Option<Value>>();
            total += col
                .cells
                .iter()
                .map(|cell| match cell {
                    Some(Value::Text(s)) => s.capacity(),
                    _ => 0,
                })
                .sum::<usize>();
        }
        total
    }
}

/// Make column names unique by suffixing repeats with `.1`, `.2`, ...
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
