use crate::data::data_provider::DataProvider;
use crate::error::TableError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Represents the data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    String,
    Integer,
    Float,
    Boolean,
}

impl DataType {
    /// Tag used for this type in the JDF payload
    pub fn as_tag(&self) -> &'static str {
        match self {
            DataType::String => "str",
            DataType::Integer => "int",
            DataType::Float => "float",
            DataType::Boolean => "bool",
        }
    }

    /// Parse a JDF type tag; returns None for anything outside the closed set
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "str" => Some(DataType::String),
            "int" => Some(DataType::Integer),
            "float" => Some(DataType::Float),
            "bool" => Some(DataType::Boolean),
            _ => None,
        }
    }

    /// Default cell value for this type.
    ///
    /// Boolean cells default to `true`; existing files depend on this,
    /// so it stays even though the other defaults are zero-like.
    pub fn default_value(&self) -> DataValue {
        match self {
            DataType::String => DataValue::String(String::new()),
            DataType::Integer => DataValue::Integer(0),
            DataType::Float => DataValue::Float(0.0),
            DataType::Boolean => DataValue::Boolean(true),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// A single cell value in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl DataValue {
    /// Build a value of the requested type from user-entered text.
    /// Unparseable numeric/boolean text falls back to the type default.
    pub fn from_string(s: &str, data_type: DataType) -> Self {
        match data_type {
            DataType::String => DataValue::String(s.to_string()),
            DataType::Integer => s
                .parse::<i64>()
                .map(DataValue::Integer)
                .unwrap_or_else(|_| data_type.default_value()),
            DataType::Float => s
                .parse::<f64>()
                .map(DataValue::Float)
                .unwrap_or_else(|_| data_type.default_value()),
            DataType::Boolean => {
                let lower = s.to_lowercase();
                DataValue::Boolean(lower == "true" || lower == "1" || lower == "yes")
            }
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::String(_) => DataType::String,
            DataValue::Integer(_) => DataType::Integer,
            DataValue::Float(_) => DataType::Float,
            DataValue::Boolean(_) => DataType::Boolean,
        }
    }

    /// Truthiness used when converting to Boolean: the empty string,
    /// zero and false are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            DataValue::String(s) => !s.is_empty(),
            DataValue::Integer(i) => *i != 0,
            DataValue::Float(f) => *f != 0.0,
            DataValue::Boolean(b) => *b,
        }
    }

    /// Re-type this value. The conversion is lossy: strings are never
    /// parsed as numbers, they become `0`/`0.0`; floats truncate
    /// toward zero when narrowed to integers.
    pub fn coerce_to(&self, target: DataType) -> DataValue {
        match target {
            DataType::Boolean => DataValue::Boolean(self.is_truthy()),
            DataType::Integer => match self {
                DataValue::String(_) => DataValue::Integer(0),
                DataValue::Integer(i) => DataValue::Integer(*i),
                DataValue::Float(f) => DataValue::Integer(*f as i64),
                DataValue::Boolean(b) => DataValue::Integer(*b as i64),
            },
            DataType::Float => match self {
                DataValue::String(_) => DataValue::Float(0.0),
                DataValue::Integer(i) => DataValue::Float(*i as f64),
                DataValue::Float(f) => DataValue::Float(*f),
                DataValue::Boolean(b) => DataValue::Float(if *b { 1.0 } else { 0.0 }),
            },
            DataType::String => DataValue::String(self.to_string()),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Column metadata and definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumn {
    pub name: String,
    pub data_type: DataType,
}

impl DataColumn {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A row of data in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    /// Surrogate on-screen row number ("#" column). Never persisted;
    /// rewritten by [`DataTable::repair_row_indices`] after every
    /// row-count change.
    #[serde(skip)]
    pub index: usize,
    pub values: Vec<DataValue>,
}

impl DataRow {
    pub fn new(values: Vec<DataValue>) -> Self {
        Self { index: 0, values }
    }

    pub fn get(&self, index: usize) -> Option<&DataValue> {
        self.values.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut DataValue> {
        self.values.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Where to place a newly inserted column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnPosition {
    First,
    Last,
    /// Immediately before the named existing column
    Before(String),
    At(usize),
}

/// Which column a delete targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnSelector {
    First,
    Last,
    At(usize),
}

/// Where to place a newly inserted row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowPosition {
    Prepend,
    Append,
    At(usize),
    /// Immediately after the given row (the session passes its current
    /// selection here)
    AfterRow(usize),
}

/// Which row a delete targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowSelector {
    First,
    Last,
    At(usize),
}

/// The main DataTable structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<DataColumn>,
    pub rows: Vec<DataRow>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// (row_count, column_count)
    pub fn count(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_column(&self, name: &str) -> Option<&DataColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column names as a vector
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Get a value at specific row and column
    pub fn get_value(&self, row: usize, col: usize) -> Option<&DataValue> {
        self.rows.get(row)?.get(col)
    }

    /// Get a value by row index and column name
    pub fn get_value_by_name(&self, row: usize, col_name: &str) -> Option<&DataValue> {
        let col_idx = self.get_column_index(col_name)?;
        self.get_value(row, col_idx)
    }

    /// Get a single row as strings
    pub fn get_row_as_strings(&self, index: usize) -> Option<Vec<String>> {
        self.rows
            .get(index)
            .map(|row| row.values.iter().map(|value| value.to_string()).collect())
    }

    /// Convert to a vector of string vectors (for display/compatibility)
    pub fn to_string_table(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.values.iter().map(|v| v.to_string()).collect())
            .collect()
    }

    /// Append a pre-built row, validating arity and value types.
    pub fn add_row(&mut self, mut row: DataRow) -> Result<(), TableError> {
        self.check_row(&row.values)?;
        row.index = self.rows.len();
        self.rows.push(row);
        Ok(())
    }

    /// Insert a new column; every existing row gains the type default
    /// at the target position.
    pub fn insert_column(
        &mut self,
        position: ColumnPosition,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Result<usize, TableError> {
        let name = name.into();
        if self.get_column_index(&name).is_some() {
            return Err(TableError::DuplicateName(name));
        }
        let index = self.resolve_column_position(&position)?;

        self.columns
            .insert(index, DataColumn::new(name.as_str(), data_type));
        for row in &mut self.rows {
            row.values.insert(index, data_type.default_value());
        }
        debug!("inserted column '{}' ({}) at index {}", name, data_type, index);
        Ok(index)
    }

    /// Delete a column and its value in every row. Refused when only
    /// one column remains, so a table always has at least one column.
    pub fn delete_column(&mut self, selector: ColumnSelector) -> Result<usize, TableError> {
        if self.columns.len() == 1 {
            return Err(TableError::LastColumn);
        }
        let index = match selector {
            ColumnSelector::First => 0,
            ColumnSelector::Last => self.columns.len() - 1,
            ColumnSelector::At(index) => {
                self.check_index(index, self.columns.len())?;
                index
            }
        };

        self.columns.remove(index);
        for row in &mut self.rows {
            row.values.remove(index);
        }
        debug!("deleted column at index {}", index);
        Ok(index)
    }

    /// Rename a column. Renaming a column to its own current name is a
    /// no-op; any other collision is rejected.
    pub fn rename_column(
        &mut self,
        index: usize,
        new_name: impl Into<String>,
    ) -> Result<(), TableError> {
        self.check_index(index, self.columns.len())?;
        let new_name = new_name.into();
        if let Some(existing) = self.get_column_index(&new_name) {
            if existing != index {
                return Err(TableError::DuplicateName(new_name));
            }
        }
        self.columns[index].name = new_name;
        Ok(())
    }

    /// Re-type every value in a column using the lossy rules of
    /// [`DataValue::coerce_to`].
    pub fn convert_column(&mut self, index: usize, new_type: DataType) -> Result<(), TableError> {
        self.check_index(index, self.columns.len())?;

        for row in &mut self.rows {
            let converted = row.values[index].coerce_to(new_type);
            row.values[index] = converted;
        }
        self.columns[index].data_type = new_type;
        debug!("converted column {} to {}", index, new_type);
        Ok(())
    }

    /// Insert a row. With no values given, a default row is synthesized
    /// from each column's type default. Surrogate indices are repaired
    /// before returning.
    pub fn insert_row(
        &mut self,
        position: RowPosition,
        values: Option<Vec<DataValue>>,
    ) -> Result<usize, TableError> {
        let index = self.resolve_row_position(position)?;
        let values = match values {
            Some(values) => {
                self.check_row(&values)?;
                values
            }
            None => self.default_row(),
        };

        self.rows.insert(index, DataRow::new(values));
        self.repair_row_indices();
        debug!("inserted row at index {}", index);
        Ok(index)
    }

    /// Delete a row. Refused when only one row remains. Surrogate
    /// indices are repaired before returning.
    pub fn delete_row(&mut self, selector: RowSelector) -> Result<usize, TableError> {
        if self.rows.len() == 1 {
            return Err(TableError::LastRow);
        }
        let index = match selector {
            RowSelector::First => 0,
            RowSelector::Last => self.rows.len() - 1,
            RowSelector::At(index) => {
                self.check_index(index, self.rows.len())?;
                index
            }
        };

        self.rows.remove(index);
        self.repair_row_indices();
        debug!("deleted row at index {}", index);
        Ok(index)
    }

    /// Overwrite a whole row (paste-as-row).
    pub fn replace_row(&mut self, index: usize, values: Vec<DataValue>) -> Result<(), TableError> {
        self.check_index(index, self.rows.len())?;
        self.check_row(&values)?;
        self.rows[index].values = values;
        Ok(())
    }

    /// Overwrite a single cell (cell edit).
    pub fn set_value(&mut self, row: usize, col: usize, value: DataValue) -> Result<(), TableError> {
        self.check_index(row, self.rows.len())?;
        self.check_index(col, self.columns.len())?;
        let expected = self.columns[col].data_type;
        if value.data_type() != expected {
            return Err(TableError::TypeMismatch {
                column: col,
                expected,
                found: value.data_type(),
            });
        }
        self.rows[row].values[col] = value;
        Ok(())
    }

    /// Rewrite the surrogate row numbers to 0..n-1 in row order.
    /// Called internally by every row insertion/deletion.
    pub fn repair_row_indices(&mut self) {
        for (idx, row) in self.rows.iter_mut().enumerate() {
            row.index = idx;
        }
    }

    /// Generate a debug dump string for display
    pub fn debug_dump(&self, max_rows: usize) -> String {
        let mut output = String::new();

        output.push_str(&format!("Table: {}\n", self.name));
        output.push_str(&format!(
            "Rows: {} | Columns: {}\n",
            self.row_count(),
            self.column_count()
        ));

        output.push_str("\nColumns:\n");
        for column in &self.columns {
            output.push_str(&format!("  {} - {}\n", column.name, column.data_type));
        }

        if self.row_count() > 0 {
            let sample_size = max_rows.min(self.row_count());
            output.push_str(&format!("\nFirst {} rows:\n", sample_size));

            for row in self.rows.iter().take(sample_size) {
                output.push_str(&format!("  [{}]: ", row.index));
                for (col_idx, value) in row.values.iter().enumerate() {
                    if col_idx > 0 {
                        output.push_str(", ");
                    }
                    output.push_str(&value.to_string());
                }
                output.push('\n');
            }
        }

        output
    }

    fn default_row(&self) -> Vec<DataValue> {
        self.columns
            .iter()
            .map(|c| c.data_type.default_value())
            .collect()
    }

    fn check_index(&self, index: usize, len: usize) -> Result<(), TableError> {
        if index >= len {
            return Err(TableError::InvalidIndex { index, len });
        }
        Ok(())
    }

    fn check_row(&self, values: &[DataValue]) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::ArityMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        for (col, (value, column)) in values.iter().zip(&self.columns).enumerate() {
            if value.data_type() != column.data_type {
                return Err(TableError::TypeMismatch {
                    column: col,
                    expected: column.data_type,
                    found: value.data_type(),
                });
            }
        }
        Ok(())
    }

    fn resolve_column_position(&self, position: &ColumnPosition) -> Result<usize, TableError> {
        match position {
            ColumnPosition::First => Ok(0),
            ColumnPosition::Last => Ok(self.columns.len()),
            ColumnPosition::Before(name) => self
                .get_column_index(name)
                .ok_or_else(|| TableError::UnknownColumn(name.clone())),
            ColumnPosition::At(index) => {
                if *index > self.columns.len() {
                    return Err(TableError::InvalidIndex {
                        index: *index,
                        len: self.columns.len(),
                    });
                }
                Ok(*index)
            }
        }
    }

    fn resolve_row_position(&self, position: RowPosition) -> Result<usize, TableError> {
        match position {
            RowPosition::Prepend => Ok(0),
            RowPosition::Append => Ok(self.rows.len()),
            RowPosition::At(index) => {
                if index > self.rows.len() {
                    return Err(TableError::InvalidIndex {
                        index,
                        len: self.rows.len(),
                    });
                }
                Ok(index)
            }
            RowPosition::AfterRow(index) => {
                self.check_index(index, self.rows.len())?;
                Ok(index + 1)
            }
        }
    }
}

/// Implementation of DataProvider for DataTable
/// This allows the presentation layer to render a table without
/// knowing anything beyond the trait.
impl DataProvider for DataTable {
    fn get_row(&self, index: usize) -> Option<Vec<String>> {
        self.get_row_as_strings(index)
    }

    fn get_column_names(&self) -> Vec<String> {
        self.column_names()
    }

    fn get_row_count(&self) -> usize {
        self.row_count()
    }

    fn get_column_count(&self) -> usize {
        self.column_count()
    }
}
