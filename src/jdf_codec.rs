//! Reader/writer for the JDF on-disk format
//!
//! A JDF file is two lines of UTF-8 text: the literal `JDF1` tag and a
//! JSON array `[column_names, column_types, row1, row2, ...]`. The
//! surrogate row number is a presentation artifact and is never
//! written.

use crate::data::datatable::{DataColumn, DataRow, DataTable, DataType, DataValue};
use crate::error::LoadError;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

/// Magic/version tag on the first line of every JDF file
pub const JDF_MAGIC: &str = "JDF1";

/// Write a table to `path` in the JDF format. The destination file is
/// overwritten whole; no partial-write recovery is attempted.
pub fn save(table: &DataTable, path: impl AsRef<Path>) -> io::Result<()> {
    let payload = encode_payload(table);
    let body = serde_json::to_string(&payload)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let mut file = File::create(&path)?;
    writeln!(file, "{}", JDF_MAGIC)?;
    file.write_all(body.as_bytes())?;

    info!("saved {} rows to {:?}", table.row_count(), path.as_ref());
    Ok(())
}

/// Read a table from `path`. The file name (minus extension) becomes
/// the table name.
///
/// Fails closed: a payload whose rows do not match the declared
/// columns in arity or value type is rejected as [`LoadError::BadPayload`]
/// rather than silently producing an inconsistent table.
pub fn load(path: impl AsRef<Path>) -> Result<DataTable, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;

    let mut lines = text.splitn(2, '\n');
    let magic = lines.next().unwrap_or_default();
    if magic.trim() != JDF_MAGIC {
        return Err(LoadError::BadMagic);
    }
    let body = lines
        .next()
        .ok_or_else(|| LoadError::bad_payload("missing payload line"))?;
    let payload: JsonValue =
        serde_json::from_str(body.trim()).map_err(|e| LoadError::bad_payload(e.to_string()))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table");
    let table = decode_payload(&payload, name)?;

    debug!(
        "loaded {:?}: {} columns, {} rows",
        path,
        table.column_count(),
        table.row_count()
    );
    Ok(table)
}

fn encode_payload(table: &DataTable) -> JsonValue {
    let mut payload: Vec<JsonValue> = Vec::with_capacity(table.row_count() + 2);

    payload.push(JsonValue::Array(
        table
            .columns
            .iter()
            .map(|c| JsonValue::String(c.name.clone()))
            .collect(),
    ));
    payload.push(JsonValue::Array(
        table
            .columns
            .iter()
            .map(|c| JsonValue::String(c.data_type.as_tag().to_string()))
            .collect(),
    ));
    for row in &table.rows {
        payload.push(JsonValue::Array(
            row.values.iter().map(encode_value).collect(),
        ));
    }

    JsonValue::Array(payload)
}

fn encode_value(value: &DataValue) -> JsonValue {
    match value {
        DataValue::String(s) => JsonValue::String(s.clone()),
        DataValue::Integer(i) => JsonValue::from(*i),
        // non-finite floats have no JSON form and serialize as null
        DataValue::Float(f) => JsonValue::from(*f),
        DataValue::Boolean(b) => JsonValue::Bool(*b),
    }
}

fn decode_payload(payload: &JsonValue, name: &str) -> Result<DataTable, LoadError> {
    let items = payload
        .as_array()
        .ok_or_else(|| LoadError::bad_payload("payload is not an array"))?;
    if items.len() < 2 {
        return Err(LoadError::bad_payload(
            "payload must start with column names and column types",
        ));
    }

    let names = string_array(&items[0], "column names")?;
    let tags = string_array(&items[1], "column types")?;
    if names.len() != tags.len() {
        return Err(LoadError::bad_payload(format!(
            "{} column names but {} column types",
            names.len(),
            tags.len()
        )));
    }

    let mut table = DataTable::new(name);
    for (col_name, tag) in names.iter().zip(&tags) {
        if table.get_column_index(col_name).is_some() {
            return Err(LoadError::bad_payload(format!(
                "duplicate column name '{}'",
                col_name
            )));
        }
        let data_type = DataType::from_tag(tag)
            .ok_or_else(|| LoadError::bad_payload(format!("unknown column type tag '{}'", tag)))?;
        table.columns.push(DataColumn::new(col_name, data_type));
    }

    for (row_no, item) in items[2..].iter().enumerate() {
        let cells = item
            .as_array()
            .ok_or_else(|| LoadError::bad_payload(format!("row {} is not an array", row_no)))?;
        if cells.len() != table.column_count() {
            return Err(LoadError::bad_payload(format!(
                "row {} has {} values, expected {}",
                row_no,
                cells.len(),
                table.column_count()
            )));
        }

        let mut values = Vec::with_capacity(cells.len());
        for (cell, column) in cells.iter().zip(&table.columns) {
            values.push(decode_value(cell, column, row_no)?);
        }
        table
            .add_row(DataRow::new(values))
            .map_err(|e| LoadError::bad_payload(e.to_string()))?;
    }

    table.repair_row_indices();
    Ok(table)
}

fn decode_value(
    cell: &JsonValue,
    column: &DataColumn,
    row_no: usize,
) -> Result<DataValue, LoadError> {
    let mismatch = || {
        LoadError::bad_payload(format!(
            "row {}: value {} does not fit column '{}' ({})",
            row_no, cell, column.name, column.data_type
        ))
    };

    match column.data_type {
        DataType::String => cell
            .as_str()
            .map(|s| DataValue::String(s.to_string()))
            .ok_or_else(mismatch),
        DataType::Integer => cell.as_i64().map(DataValue::Integer).ok_or_else(mismatch),
        // integer literals are accepted in float columns; older files
        // wrote 0 rather than 0.0
        DataType::Float => cell.as_f64().map(DataValue::Float).ok_or_else(mismatch),
        DataType::Boolean => cell.as_bool().map(DataValue::Boolean).ok_or_else(mismatch),
    }
}

fn string_array(value: &JsonValue, what: &str) -> Result<Vec<String>, LoadError> {
    let items = value
        .as_array()
        .ok_or_else(|| LoadError::bad_payload(format!("{} is not an array", what)))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| LoadError::bad_payload(format!("{} must all be strings", what)))
        })
        .collect()
}
