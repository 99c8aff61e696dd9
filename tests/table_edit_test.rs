use jdf_editor::data::datatable::{
    ColumnPosition, ColumnSelector, DataColumn, DataRow, DataTable, DataType, DataValue,
    RowPosition, RowSelector,
};
use jdf_editor::error::TableError;
use jdf_editor::jdf_codec;
use tempfile::tempdir;

fn name_age_table() -> DataTable {
    let mut table = DataTable::new("people");
    table
        .columns
        .push(DataColumn::new("Name", DataType::String));
    table
        .columns
        .push(DataColumn::new("Age", DataType::Integer));
    table
        .add_row(DataRow::new(vec![
            DataValue::String("John".to_string()),
            DataValue::Integer(30),
        ]))
        .unwrap();
    table
}

#[test]
fn edit_convert_save_load_scenario() -> anyhow::Result<()> {
    // start: columns [(Name, str), (Age, int)], rows [["John", 30]]
    let mut table = name_age_table();

    // append a default row
    table.insert_row(RowPosition::Append, None)?;
    assert_eq!(table.count(), (2, 2));
    assert_eq!(
        table.rows[1].values,
        vec![DataValue::String(String::new()), DataValue::Integer(0)]
    );

    // convert the Age column to float
    table.convert_column(1, DataType::Float)?;
    assert_eq!(table.columns[1].data_type, DataType::Float);
    assert_eq!(table.rows[0].values[1], DataValue::Float(30.0));
    assert_eq!(table.rows[1].values[1], DataValue::Float(0.0));

    // the exact state survives a save/load cycle
    let dir = tempdir()?;
    let path = dir.path().join("people.jdf");
    jdf_codec::save(&table, &path)?;
    let loaded = jdf_codec::load(&path)?;

    assert_eq!(loaded.columns, table.columns);
    assert_eq!(loaded.rows, table.rows);
    Ok(())
}

#[test]
fn single_column_and_single_row_guards() {
    let mut table = DataTable::new("tiny");
    table
        .columns
        .push(DataColumn::new("Only", DataType::String));
    table
        .add_row(DataRow::new(vec![DataValue::String("x".to_string())]))
        .unwrap();

    let before = table.clone();
    assert_eq!(
        table.delete_column(ColumnSelector::First),
        Err(TableError::LastColumn)
    );
    assert_eq!(
        table.delete_row(RowSelector::First),
        Err(TableError::LastRow)
    );
    assert_eq!(table, before);
}

#[test]
fn surrogate_indices_track_any_edit_sequence() {
    let mut table = name_age_table();

    table.insert_row(RowPosition::Append, None).unwrap();
    table.insert_row(RowPosition::Prepend, None).unwrap();
    table.insert_row(RowPosition::At(2), None).unwrap();
    table.delete_row(RowSelector::First).unwrap();
    table.insert_row(RowPosition::AfterRow(1), None).unwrap();
    table.delete_row(RowSelector::At(2)).unwrap();

    let indices: Vec<usize> = table.rows.iter().map(|r| r.index).collect();
    let expected: Vec<usize> = (0..table.row_count()).collect();
    assert_eq!(indices, expected);
}

#[test]
fn boolean_column_insert_defaults_to_true() {
    let mut table = name_age_table();
    table.insert_row(RowPosition::Append, None).unwrap();
    table.insert_row(RowPosition::Append, None).unwrap();

    table
        .insert_column(ColumnPosition::Last, "Member", DataType::Boolean)
        .unwrap();

    assert_eq!(table.row_count(), 3);
    for row in &table.rows {
        assert_eq!(row.values[2], DataValue::Boolean(true));
    }
}

#[test]
fn string_column_conversion_never_parses_numbers() {
    let mut table = DataTable::new("conv");
    table.columns.push(DataColumn::new("Raw", DataType::String));
    for text in ["3", "abc", "7.5"] {
        table
            .add_row(DataRow::new(vec![DataValue::String(text.to_string())]))
            .unwrap();
    }

    let mut as_float = table.clone();
    as_float.convert_column(0, DataType::Float).unwrap();
    for row in &as_float.rows {
        assert_eq!(row.values[0], DataValue::Float(0.0));
    }

    table.convert_column(0, DataType::Integer).unwrap();
    for row in &table.rows {
        assert_eq!(row.values[0], DataValue::Integer(0));
    }
}

#[test]
fn failed_operations_leave_the_table_unchanged() {
    let mut table = name_age_table();
    let before = table.clone();

    assert!(table
        .insert_column(ColumnPosition::Last, "Name", DataType::String)
        .is_err());
    assert!(table.rename_column(0, "Age").is_err());
    assert!(table.insert_row(RowPosition::At(9), None).is_err());
    assert!(table
        .replace_row(0, vec![DataValue::Integer(1)])
        .is_err());
    assert!(table.convert_column(5, DataType::String).is_err());

    assert_eq!(table, before);
}
