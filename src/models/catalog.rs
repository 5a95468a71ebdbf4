use crate::error::{PtfError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three structural lines of a catalog response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogHeader {
    pub names: Vec<String>,
    pub types: Vec<String>,
    pub units: Vec<String>,
}

/// Header plus tokenized data rows, before any typing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCatalog {
    pub header: CatalogHeader,
    pub rows: Vec<Vec<String>>,
}

/// Row selection used by URL derivation and batch downloads
pub type RowPredicate<'a> = dyn Fn(&RowView<'_>) -> bool + 'a;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ColumnData {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Text,
}

impl ColumnData {
    fn coerce(values: &[String]) -> Self {
        if values.is_empty() {
            return ColumnData::Text;
        }

        if let Ok(ints) = values
            .iter()
            .map(|v| v.parse::<i64>())
            .collect::<std::result::Result<Vec<_>, _>>()
        {
            return ColumnData::Integer(ints);
        }

        let floats: Option<Vec<f64>> = values
            .iter()
            .map(|v| v.parse::<f64>().ok().filter(|f| f.is_finite()))
            .collect();

        match floats {
            Some(floats) => ColumnData::Float(floats),
            None => ColumnData::Text,
        }
    }

    fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Integer(_) => ColumnType::Integer,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Text => ColumnType::Text,
        }
    }

    fn select(&self, indices: &[usize]) -> Self {
        match self {
            ColumnData::Integer(v) => ColumnData::Integer(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Float(v) => ColumnData::Float(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Text => ColumnData::Text,
        }
    }
}

/// Numeric type a column adopts: integer or float only when every value
/// parses, text otherwise. Empty columns stay text.
pub fn classify_column(values: &[String]) -> ColumnType {
    ColumnData::coerce(values).column_type()
}

/// A single typed value borrowed from a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Integer(i64),
    Float(f64),
    Text(&'a str),
}

impl<'a> Cell<'a> {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Cell::Integer(v) => Some(v as f64),
            Cell::Float(v) => Some(v),
            Cell::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub declared_type: Option<String>,
    pub unit: Option<String>,
    raw: Vec<String>,
    data: ColumnData,
}

impl Column {
    pub fn new(name: String, raw: Vec<String>) -> Self {
        let data = ColumnData::coerce(&raw);
        Self {
            name,
            declared_type: None,
            unit: None,
            raw,
            data,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    /// Cell text exactly as it appeared in the response
    pub fn raw_values(&self) -> &[String] {
        &self.raw
    }

    pub fn cell(&self, index: usize) -> Option<Cell<'_>> {
        match &self.data {
            ColumnData::Integer(v) => v.get(index).map(|&x| Cell::Integer(x)),
            ColumnData::Float(v) => v.get(index).map(|&x| Cell::Float(x)),
            ColumnData::Text => self.raw.get(index).map(|s| Cell::Text(s.as_str())),
        }
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            declared_type: self.declared_type.clone(),
            unit: self.unit.clone(),
            raw: indices.iter().map(|&i| self.raw[i].clone()).collect(),
            data: self.data.select(indices),
        }
    }
}

/// Typed, column-oriented view of a catalog response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl CatalogTable {
    pub fn from_parsed(parsed: ParsedCatalog) -> Result<Self> {
        let ParsedCatalog { header, rows } = parsed;
        let width = header.names.len();

        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(PtfError::Parse(format!(
                    "Row {} has {} fields but the header declares {} columns",
                    i + 1,
                    row.len(),
                    width
                )));
            }
        }

        let row_count = rows.len();
        let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(row_count); width];
        for row in rows {
            for (col, value) in row.into_iter().enumerate() {
                cells[col].push(value);
            }
        }

        let columns = header
            .names
            .into_iter()
            .zip(cells)
            .enumerate()
            .map(|(i, (name, raw))| {
                let mut column = Column::new(name, raw);
                column.declared_type = header.types.get(i).filter(|t| !t.is_empty()).cloned();
                column.unit = header.units.get(i).filter(|u| !u.is_empty()).cloned();
                column
            })
            .collect();

        Ok(Self { columns, row_count })
    }

    pub fn num_rows(&self) -> usize {
        self.row_count
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| PtfError::ColumnNotFound {
            column: name.to_string(),
        })
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        (index < self.row_count).then_some(RowView { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        (0..self.row_count).map(move |index| RowView { table: self, index })
    }

    /// Rows matching `predicate`, in their original order. Column types are kept.
    pub fn filter<F>(&self, predicate: F) -> CatalogTable
    where
        F: Fn(&RowView<'_>) -> bool,
    {
        let selected: Vec<usize> = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.index)
            .collect();

        CatalogTable {
            columns: self.columns.iter().map(|c| c.select(&selected)).collect(),
            row_count: selected.len(),
        }
    }
}

/// Named-field view of one table row
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a CatalogTable,
    index: usize,
}

impl<'a> RowView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<Cell<'a>> {
        self.table.column(column).and_then(|c| c.cell(self.index))
    }

    pub fn raw(&self, column: &str) -> Option<&'a str> {
        self.table
            .column(column)
            .and_then(|c| c.raw.get(self.index))
            .map(String::as_str)
    }
}
