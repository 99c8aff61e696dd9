use crate::data::datatable::{DataColumn, DataRow, DataTable};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Program name and version stamped into the page header
const GENERATOR: &str = concat!("JDFeditor v", env!("CARGO_PKG_VERSION"));

/// Stylesheet for the exported page: centred bordered table on a dark
/// background, dotted column separators.
const STYLE: &str = "\
body {text-align: center; background: #111; color: #FFF;}
.header {font-size: 13px; color: white; position: fixed; top: 10px; right: 20px;}
table {
    border-collapse: collapse;
    border-spacing: 0;
    border: 1px solid white;
    box-shadow: 1px 1px 5px white;
    margin-left: auto;
    margin-right: auto;
}
tr {
    border-top: 1px solid white;
    border-bottom: 1px solid white;
}
th {
    border-left: 1px dotted white;
    border-right: 1px dotted white;
}
td {
    padding: 6px;
    border-left: 1px dotted white;
    border-right: 1px dotted white;
}
";

/// Renders a table as a single self-contained static HTML page
pub struct HtmlExporter;

impl HtmlExporter {
    /// Render the page. Deterministic: identical input yields an
    /// identical document.
    pub fn render(title: &str, columns: &[DataColumn], rows: &[DataRow]) -> String {
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
        out.push_str(STYLE);
        out.push_str("</style>\n</head>\n<body>\n");
        out.push_str(&format!(
            "<p class=\"header\">Created with {}</p>\n",
            GENERATOR
        ));
        out.push_str(&format!(
            "<br><h1>Database: <span style=\"color:#28ADB5\">{}</span></h1>\n",
            escape(title)
        ));

        out.push_str("<table>\n<tr>");
        out.push_str("<th style=\"color: #1CFF00;\">#</th>");
        for column in columns {
            out.push_str(&format!(
                "<th>{} - {}</th>",
                escape(&column.name),
                column.data_type.as_tag()
            ));
        }
        out.push_str("</tr>\n");

        for (idx, row) in rows.iter().enumerate() {
            // alternate two background shades by row parity
            let shade = if idx % 2 == 0 { "#111111" } else { "#222222" };
            out.push_str(&format!("<tr style=\"background: {}\">", shade));
            out.push_str(&format!("<td style=\"color: #1CFF00;\">{}</td>", idx));
            for value in &row.values {
                out.push_str(&format!("<td>{}</td>", escape(&value.to_string())));
            }
            out.push_str("</tr>\n");
        }

        out.push_str("</table>\n</body>\n</html>\n");
        out
    }

    /// Render a table and write it to disk, returning a status message
    /// for the caller to surface.
    pub fn export(table: &DataTable, path: impl AsRef<Path>) -> Result<String> {
        let html = Self::render(&table.name, &table.columns, &table.rows);
        fs::write(&path, html)
            .with_context(|| format!("Failed to write HTML file: {:?}", path.as_ref()))?;

        info!("exported {} rows to {:?}", table.row_count(), path.as_ref());
        Ok(format!(
            "✓ Exported {} rows to HTML file: {}",
            table.row_count(),
            path.as_ref().display()
        ))
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
