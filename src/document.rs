//! Document/session layer
//!
//! One [`Document`] per open table (one per tab); the
//! [`DocumentManager`] owns them all and tracks which one is current.
//! There is no process-wide state: the windowing layer holds a manager
//! and routes every operation through it.

use crate::config::Config;
use crate::data::datatable::{
    ColumnPosition, ColumnSelector, DataColumn, DataRow, DataTable, DataType, DataValue,
    RowPosition, RowSelector,
};
use crate::data::html_exporter::HtmlExporter;
use crate::error::{LoadError, TableError};
use crate::jdf_codec;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A single open table with its own file, selection and dirty state
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique identifier for this document
    pub id: usize,

    /// File path if loaded from (or saved to) disk
    pub file_path: Option<PathBuf>,

    /// Display name (file name, "Untitled1.jdf" until saved elsewhere)
    pub name: String,

    /// Whether this document has unsaved changes
    pub modified: bool,

    pub table: DataTable,

    /// Row the user currently has highlighted; drives the
    /// insert-here/delete-here operations
    pub selected_row: usize,
}

impl Document {
    /// Create a fresh document from the configured blank-table
    /// template (by default two string columns, Name/E-Mail, with one
    /// sample row).
    pub fn untitled(id: usize, number: usize, config: &Config) -> Self {
        let mut template = config.behavior.clone();
        if template.template_columns.is_empty() {
            // a table must have at least one column; fall back to the
            // built-in template
            template = crate::config::BehaviorConfig::default();
        }
        let name = format!("{}{}.jdf", template.untitled_prefix, number);

        let mut table = DataTable::new(format!("{}{}", template.untitled_prefix, number));
        for (i, col_name) in template.template_columns.iter().enumerate() {
            let data_type = template
                .template_types
                .get(i)
                .and_then(|tag| DataType::from_tag(tag))
                .unwrap_or(DataType::String);
            table.columns.push(DataColumn::new(col_name, data_type));
        }

        let values: Vec<DataValue> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| match template.template_row.get(i) {
                Some(text) => DataValue::from_string(text, column.data_type),
                None => column.data_type.default_value(),
            })
            .collect();
        table.rows.push(DataRow::new(values));
        table.repair_row_indices();

        debug!("created blank document '{}'", name);
        Self {
            id,
            file_path: None,
            name,
            modified: false,
            table,
            selected_row: 0,
        }
    }

    /// Load a document from a JDF file
    pub fn open(id: usize, path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let table = jdf_codec::load(&path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.jdf")
            .to_string();

        Ok(Self {
            id,
            file_path: Some(path),
            name,
            modified: false,
            table,
            selected_row: 0,
        })
    }

    /// Display name for the tab bar; modified documents get a marker
    pub fn display_name(&self) -> String {
        if self.modified {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Check if this document has a specific file open
    pub fn has_file(&self, path: &Path) -> bool {
        self.file_path.as_deref() == Some(path)
    }

    /// Save to the document's backing file. Fails when the document
    /// has never been saved; the caller should fall back to
    /// [`Document::save_as`] with a user-chosen path.
    pub fn save(&mut self) -> Result<String> {
        let path = self
            .file_path
            .clone()
            .ok_or_else(|| anyhow!("'{}' has no file path yet - use save as", self.name))?;

        jdf_codec::save(&self.table, &path)
            .with_context(|| format!("Failed to save {:?}", path))?;
        self.modified = false;

        info!("saved document '{}'", self.name);
        Ok(format!("File saved: {}", self.name))
    }

    /// Save under a new path and adopt it as the backing file
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<String> {
        let path = path.into();
        self.name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.jdf")
            .to_string();
        self.file_path = Some(path);
        self.save()
    }

    /// Render this document as a static HTML page and write it to disk
    pub fn export_html(&self, path: impl AsRef<Path>) -> Result<String> {
        let html = HtmlExporter::render(&self.name, &self.table.columns, &self.table.rows);
        std::fs::write(&path, html)
            .with_context(|| format!("Failed to write HTML file: {:?}", path.as_ref()))?;
        Ok(format!(
            "File exported: {}",
            path.as_ref().display()
        ))
    }

    // --- Selection ---

    pub fn select_row(&mut self, index: usize) {
        if index < self.table.row_count() {
            self.selected_row = index;
        }
    }

    // --- Mutations (every success marks the document dirty) ---

    pub fn insert_column(
        &mut self,
        position: ColumnPosition,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Result<usize, TableError> {
        let index = self.table.insert_column(position, name, data_type)?;
        self.modified = true;
        Ok(index)
    }

    pub fn delete_column(&mut self, selector: ColumnSelector) -> Result<usize, TableError> {
        let index = self.table.delete_column(selector)?;
        self.modified = true;
        Ok(index)
    }

    pub fn rename_column(
        &mut self,
        index: usize,
        new_name: impl Into<String>,
    ) -> Result<(), TableError> {
        self.table.rename_column(index, new_name)?;
        self.modified = true;
        Ok(())
    }

    pub fn convert_column(&mut self, index: usize, new_type: DataType) -> Result<(), TableError> {
        self.table.convert_column(index, new_type)?;
        self.modified = true;
        Ok(())
    }

    pub fn insert_row(
        &mut self,
        position: RowPosition,
        values: Option<Vec<DataValue>>,
    ) -> Result<usize, TableError> {
        let index = self.table.insert_row(position, values)?;
        self.modified = true;
        Ok(index)
    }

    /// Insert a default row just below the current selection
    pub fn insert_row_after_selection(&mut self) -> Result<usize, TableError> {
        self.insert_row(RowPosition::AfterRow(self.selected_row), None)
    }

    pub fn delete_row(&mut self, selector: RowSelector) -> Result<usize, TableError> {
        let index = self.table.delete_row(selector)?;
        self.modified = true;
        // keep the selection on a row that still exists
        self.selected_row = self.selected_row.min(self.table.row_count() - 1);
        Ok(index)
    }

    /// Delete the currently selected row
    pub fn delete_selected_row(&mut self) -> Result<usize, TableError> {
        self.delete_row(RowSelector::At(self.selected_row))
    }

    pub fn replace_row(&mut self, index: usize, values: Vec<DataValue>) -> Result<(), TableError> {
        self.table.replace_row(index, values)?;
        self.modified = true;
        Ok(())
    }

    /// Paste a whole row over the current selection
    pub fn replace_selected_row(&mut self, values: Vec<DataValue>) -> Result<(), TableError> {
        self.replace_row(self.selected_row, values)
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: DataValue) -> Result<(), TableError> {
        self.table.set_value(row, col, value)?;
        self.modified = true;
        Ok(())
    }
}

/// Manages the open documents and switching between them
pub struct DocumentManager {
    documents: Vec<Document>,
    current_index: usize,
    next_id: usize,
    untitled_count: usize,
}

impl DocumentManager {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            current_index: 0,
            next_id: 1,
            untitled_count: 1,
        }
    }

    /// Create a blank document and make it current
    pub fn new_untitled(&mut self, config: &Config) -> usize {
        let document = Document::untitled(self.next_id, self.untitled_count, config);
        self.next_id += 1;
        self.untitled_count += 1;

        let index = self.documents.len();
        self.documents.push(document);
        self.current_index = index;
        index
    }

    /// Open a JDF file as a new document and make it current. A path
    /// that is already open in another document is refused.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<usize> {
        let path = path.into();
        if self.find_by_path(&path).is_some() {
            return Err(anyhow!("{} is already open", path.display()));
        }

        let document = Document::open(self.next_id, &path)
            .with_context(|| format!("Error while loading {}", path.display()))?;
        self.next_id += 1;

        let index = self.documents.len();
        self.documents.push(document);
        self.current_index = index;
        Ok(index)
    }

    /// Get current document
    pub fn current(&self) -> Option<&Document> {
        self.documents.get(self.current_index)
    }

    /// Get current document mutably
    pub fn current_mut(&mut self) -> Option<&mut Document> {
        self.documents.get_mut(self.current_index)
    }

    /// Switch to next document (wraps around)
    pub fn next_document(&mut self) {
        if !self.documents.is_empty() {
            self.current_index = (self.current_index + 1) % self.documents.len();
        }
    }

    /// Switch to previous document (wraps around)
    pub fn prev_document(&mut self) {
        if !self.documents.is_empty() {
            if self.current_index == 0 {
                self.current_index = self.documents.len() - 1;
            } else {
                self.current_index -= 1;
            }
        }
    }

    /// Switch to document by index
    pub fn switch_to(&mut self, index: usize) {
        if index < self.documents.len() {
            self.current_index = index;
        }
    }

    /// Close current document, discarding unsaved state. The last
    /// remaining document is never closed here; quitting is the
    /// caller's decision.
    pub fn close_current(&mut self) -> bool {
        if self.documents.len() <= 1 {
            return false;
        }

        self.documents.remove(self.current_index);
        if self.current_index >= self.documents.len() {
            self.current_index = self.documents.len() - 1;
        }

        true
    }

    /// Find document by file path
    pub fn find_by_path(&self, path: &Path) -> Option<usize> {
        self.documents.iter().position(|d| d.has_file(path))
    }

    /// Get all documents for display
    pub fn all_documents(&self) -> &[Document] {
        &self.documents
    }

    /// Get current document index
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// True if any open document has unsaved changes (the quit-time
    /// check)
    pub fn has_unsaved_changes(&self) -> bool {
        self.documents.iter().any(|d| d.modified)
    }
}

impl Default for DocumentManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_untitled_template() {
        let config = Config::default();
        let document = Document::untitled(1, 1, &config);

        assert_eq!(document.name, "Untitled1.jdf");
        assert!(!document.modified);
        assert_eq!(document.table.column_names(), vec!["Name", "E-Mail"]);
        assert_eq!(document.table.count(), (1, 2));
        assert_eq!(
            document.table.get_value(0, 0),
            Some(&DataValue::String("John Smith".to_string()))
        );
    }

    #[test]
    fn test_mutation_sets_modified_failure_does_not() {
        let config = Config::default();
        let mut document = Document::untitled(1, 1, &config);

        assert_eq!(
            document.delete_row(RowSelector::Last),
            Err(TableError::LastRow)
        );
        assert!(!document.modified);

        document.insert_row(RowPosition::Append, None).unwrap();
        assert!(document.modified);
        assert_eq!(document.display_name(), "Untitled1.jdf*");
    }

    #[test]
    fn test_save_clears_modified() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::default();
        let mut document = Document::untitled(1, 1, &config);
        document.insert_row(RowPosition::Append, None).unwrap();

        // never saved: plain save has nowhere to go
        assert!(document.save().is_err());
        assert!(document.modified);

        let path = dir.path().join("saved.jdf");
        let message = document.save_as(&path)?;
        assert_eq!(message, "File saved: saved.jdf");
        assert!(!document.modified);
        assert_eq!(document.name, "saved.jdf");

        // subsequent plain saves reuse the adopted path
        document.insert_row(RowPosition::Append, None).unwrap();
        document.save()?;
        assert!(!document.modified);
        Ok(())
    }

    #[test]
    fn test_selection_relative_operations() {
        let config = Config::default();
        let mut document = Document::untitled(1, 1, &config);
        document.insert_row(RowPosition::Append, None).unwrap();
        document.insert_row(RowPosition::Append, None).unwrap();

        document.select_row(1);
        let index = document.insert_row_after_selection().unwrap();
        assert_eq!(index, 2);

        document.select_row(3);
        document.delete_selected_row().unwrap();
        // selection clamped back onto an existing row
        assert_eq!(document.selected_row, 2);
    }

    #[test]
    fn test_manager_open_refuses_duplicate_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.jdf");
        let config = Config::default();

        let mut manager = DocumentManager::new();
        manager.new_untitled(&config);
        manager.current_mut().unwrap().save_as(&path)?;

        let err = manager.open(&path).unwrap_err();
        assert!(err.to_string().contains("already open"));
        Ok(())
    }

    #[test]
    fn test_manager_navigation_wraps_and_close_guard() {
        let config = Config::default();
        let mut manager = DocumentManager::new();
        manager.new_untitled(&config);

        // sole document cannot be closed
        assert!(!manager.close_current());

        manager.new_untitled(&config);
        manager.new_untitled(&config);
        assert_eq!(manager.current_index(), 2);
        assert_eq!(manager.current().unwrap().name, "Untitled3.jdf");

        manager.next_document();
        assert_eq!(manager.current_index(), 0);
        manager.prev_document();
        assert_eq!(manager.current_index(), 2);

        assert!(manager.close_current());
        assert_eq!(manager.all_documents().len(), 2);
        assert_eq!(manager.current_index(), 1);
    }

    #[test]
    fn test_manager_unsaved_check() {
        let config = Config::default();
        let mut manager = DocumentManager::new();
        manager.new_untitled(&config);
        manager.new_untitled(&config);
        assert!(!manager.has_unsaved_changes());

        manager
            .current_mut()
            .unwrap()
            .insert_row(RowPosition::Append, None)
            .unwrap();
        assert!(manager.has_unsaved_changes());
    }
}
