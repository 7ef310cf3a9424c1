//! Flat tabular results.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Ordered `(column, value)` pairs for one row, before it joins a table.
pub type Record = Vec<(String, Value)>;

/// Rows with named columns.
///
/// Columns keep the order in which they first appeared. A row that never
/// supplied a column holds `null` there. Serializes as an array of objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        let mut row = vec![Value::Null; self.columns.len()];
        for (column, value) in record {
            let at = match self.index.get(&column) {
                Some(&at) => at,
                None => {
                    let at = self.columns.len();
                    self.index.insert(column.clone(), at);
                    self.columns.push(column);
                    for existing in &mut self.rows {
                        existing.push(Value::Null);
                    }
                    row.push(Value::Null);
                    at
                }
            };
            row[at] = value;
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let at = *self.index.get(column)?;
        self.rows.get(row).map(|r| &r[at])
    }

    /// Every value of one column, top to bottom.
    pub fn column(&self, column: &str) -> Option<Vec<&Value>> {
        let at = *self.index.get(column)?;
        Some(self.rows.iter().map(|r| &r[at]).collect())
    }

    /// Rows as JSON objects keyed by column name.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut table = Table::new();
        for record in iter {
            table.push(record);
        }
        table
    }
}

struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for values in &self.rows {
            seq.serialize_element(&RowRef {
                columns: &self.columns,
                values,
            })?;
        }
        seq.end()
    }
}
