//! Read-only data access trait
//!
//! The windowing layer renders tables through this trait without
//! knowing anything about the underlying model.

/// Core trait for read-only data access
pub trait DataProvider {
    /// Get a single row by index, stringified for display.
    /// Returns None if the index is out of bounds
    fn get_row(&self, index: usize) -> Option<Vec<String>>;

    /// Get the column names/headers
    fn get_column_names(&self) -> Vec<String>;

    /// Get the total number of rows
    fn get_row_count(&self) -> usize;

    /// Get the total number of columns
    fn get_column_count(&self) -> usize;

    /// Get multiple rows for efficient rendering
    fn get_visible_rows(&self, start: usize, count: usize) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let end = (start + count).min(self.get_row_count());

        for i in start..end {
            if let Some(row) = self.get_row(i) {
                rows.push(row);
            }
        }

        rows
    }

    /// Get a single cell value
    /// Returns None if row or column index is out of bounds
    fn get_cell_value(&self, row: usize, col: usize) -> Option<String> {
        self.get_row(row).and_then(|r| r.get(col).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock implementation for testing
    struct MockDataProvider {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    }

    impl DataProvider for MockDataProvider {
        fn get_row(&self, index: usize) -> Option<Vec<String>> {
            self.rows.get(index).cloned()
        }

        fn get_column_names(&self) -> Vec<String> {
            self.columns.clone()
        }

        fn get_row_count(&self) -> usize {
            self.rows.len()
        }

        fn get_column_count(&self) -> usize {
            self.columns.len()
        }
    }

    #[test]
    fn test_data_provider_basics() {
        let provider = MockDataProvider {
            columns: vec!["ID".to_string(), "Name".to_string()],
            rows: vec![
                vec!["1".to_string(), "Alice".to_string()],
                vec!["2".to_string(), "Bob".to_string()],
            ],
        };

        assert_eq!(provider.get_row_count(), 2);
        assert_eq!(provider.get_column_count(), 2);
        assert_eq!(provider.get_cell_value(1, 1), Some("Bob".to_string()));
        assert_eq!(provider.get_cell_value(5, 0), None);
    }

    #[test]
    fn test_get_visible_rows() {
        let provider = MockDataProvider {
            columns: vec!["Col1".to_string()],
            rows: (0..10).map(|i| vec![format!("Row{}", i)]).collect(),
        };

        let visible = provider.get_visible_rows(2, 3);
        assert_eq!(visible.len(), 3);
        assert_eq!(visible[0], vec!["Row2"]);
        assert_eq!(visible[2], vec!["Row4"]);
    }
}
