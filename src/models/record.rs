//! Input rows as read from delimited text.

use hashbrown::HashMap;
use std::sync::Arc;

use crate::error::{GeosieveError, Result};

/// Column names shared by every record of a set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        // First occurrence wins for duplicated column names
        for (idx, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        Self { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One input row: raw text values in header order plus its original position.
///
/// Records are immutable once read. Values missing from short rows are absent
/// rather than empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    index: usize,
    header: Arc<Header>,
    values: Vec<String>,
}

impl Record {
    pub fn new(index: usize, header: Arc<Header>, values: Vec<String>) -> Self {
        Self {
            index,
            header,
            values,
        }
    }

    /// Position of this record in the original input
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Raw value at a column position, `None` when the row is too short
    pub fn value_at(&self, position: usize) -> Option<&str> {
        self.values.get(position).map(String::as_str)
    }

    /// Raw value for a named column
    pub fn get(&self, field: &str) -> Option<&str> {
        self.header.position(field).and_then(|pos| self.value_at(pos))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Iterate `(field, value)` pairs in column order
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.header
            .names()
            .iter()
            .enumerate()
            .map(move |(pos, name)| (name.as_str(), self.value_at(pos)))
    }
}

/// An ordered collection of records sharing one header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    header: Arc<Header>,
    records: Vec<Record>,
}

impl RecordSet {
    /// Build a record set from a header and raw rows; indices follow row order.
    pub fn from_rows<H, R, V>(header: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = V>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let header = Arc::new(Header::new(header.into_iter().map(Into::into).collect()));
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                Record::new(
                    index,
                    Arc::clone(&header),
                    row.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { header, records }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a field name to its column position
    pub fn field_position(&self, field: &str) -> Result<usize> {
        self.header
            .position(field)
            .ok_or_else(|| GeosieveError::UnknownField {
                field: field.to_string(),
            })
    }
}
