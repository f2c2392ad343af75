//! HTML catalog renderer.
//!
//! Writes the endpoint records into a single static page driven by jQuery DataTables.
//! The page references its stylesheets and scripts by file name, so they must already
//! sit next to the output file; that is checked before anything is written.

use crate::error::{Error, Result};
use crate::extractor::{EndpointRecord, HttpMethod, ParameterInfo};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Support files the generated page loads from its own directory.
pub const REQUIRED_ASSETS: [&str; 7] = [
    "RowGroupingWithFixedColumn.js",
    "FixedColumns.js",
    "api_page.css",
    "api_table.css",
    "header.css",
    "jquery.dataTables.js",
    "jquery.js",
];

const STYLESHEETS: [&str; 3] = ["api_page.css", "header.css", "api_table.css"];

const SCRIPTS: [&str; 4] = [
    "jquery.js",
    "jquery.dataTables.js",
    "FixedColumns.js",
    "RowGroupingWithFixedColumn.js",
];

const COLUMNS: [&str; 10] = [
    "REST URI",
    "Method",
    "Resource Type",
    "Handler",
    "Parameters",
    "Data Format",
    "Responses",
    "Tags",
    "Markers",
    "Description",
];

/// Renders endpoint records as an HTML table.
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Writes the catalog page for `records` to `output_path`.
    ///
    /// The page is rendered completely in memory and written in one go, so a failure
    /// never leaves a truncated file behind. An existing file is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetMissing`] if `asset_dir` or any of [`REQUIRED_ASSETS`] is
    /// missing; the output file is not touched in that case.
    pub fn render(records: &[EndpointRecord], output_path: &Path, asset_dir: &Path) -> Result<PathBuf> {
        Self::check_assets(asset_dir)?;

        let document = Self::render_document(records);
        fs::write(output_path, &document)?;

        info!(
            "Wrote {} endpoints ({} bytes) to {}",
            records.len(),
            document.len(),
            output_path.display()
        );
        Ok(output_path.to_path_buf())
    }

    /// Verifies that every support file is present in `asset_dir`.
    pub fn check_assets(asset_dir: &Path) -> Result<()> {
        if !asset_dir.is_dir() {
            return Err(Error::AssetMissing(asset_dir.to_path_buf()));
        }

        for asset in REQUIRED_ASSETS {
            let path = asset_dir.join(asset);
            if !path.is_file() {
                return Err(Error::AssetMissing(path));
            }
        }

        debug!("All assets present in {}", asset_dir.display());
        Ok(())
    }

    /// Renders the complete page.
    pub fn render_document(records: &[EndpointRecord]) -> String {
        let mut html = String::new();

        html.push_str(
            "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">\n",
        );
        html.push_str("<html>\n<head>\n");

        html.push_str("<style type=\"text/css\">\n");
        for stylesheet in STYLESHEETS {
            html.push_str(&format!("@import \"{}\";\n", stylesheet));
        }
        html.push_str("</style>\n");

        for script in SCRIPTS {
            html.push_str(&format!(
                "<script type=\"text/javascript\" charset=\"utf-8\" src=\"{}\"></script>\n",
                script
            ));
        }
        html.push_str("</head>\n");

        html.push_str("<body id=\"dt_example\">\n");
        html.push_str(
            "<table cellpadding=\"0\" cellspacing=\"0\" border=\"0\" class=\"display\" id=\"endpoints\">\n",
        );
        html.push_str("<thead><tr>");
        for column in COLUMNS {
            html.push_str(&format!("<th>{}</th>", column));
        }
        html.push_str("</tr></thead>\n");

        html.push_str("<tbody>\n");
        for record in records {
            html.push_str(&Self::render_row(record));
            html.push('\n');
        }
        html.push_str("</tbody>\n");
        html.push_str("</table>\n");
        html.push_str("</body>\n</html>\n");

        html
    }

    /// Renders the `<tr>` for one record.
    pub fn render_row(record: &EndpointRecord) -> String {
        let mut row = format!("<tr class='{}'>", row_class(record.verb));

        row.push_str(&cell(&escape(&record.uri)));
        row.push_str(&cell(record.verb.as_str()));
        row.push_str(&cell(&escape(&record.owner_type)));
        row.push_str(&cell(&escape(&record.handler_name)));
        row.push_str(&small_cell(&parameters_cell(record)));
        row.push_str(&cell(&data_format_cell(record)));
        row.push_str(&cell(&responses_cell(record)));
        row.push_str(&cell(&tags_cell(record)));
        row.push_str(&small_cell(&lines(&record.markers)));
        row.push_str(&cell(&description_cell(record)));

        row.push_str("</tr>");
        row
    }
}

/// DataTables grade class per verb.
fn row_class(verb: HttpMethod) -> &'static str {
    match verb {
        HttpMethod::Get => "gradeA",
        HttpMethod::Post => "gradeU",
        HttpMethod::Put => "gradeC",
        HttpMethod::Delete => "gradeX",
    }
}

fn cell(content: &str) -> String {
    format!("<td>{}</td>", content)
}

fn small_cell(content: &str) -> String {
    format!("<td class='column-content-small'>{}</td>", content)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn joined(values: &[String]) -> String {
    values.iter().map(|v| escape(v)).collect::<Vec<_>>().join(", ")
}

fn lines(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("{}<br/>", escape(v)))
        .collect()
}

fn parameter_line(label: &str, parameter: &ParameterInfo) -> String {
    let mut line = if is_blank(&parameter.name) {
        format!("{}: {}", label, escape(&parameter.type_name))
    } else {
        format!(
            "{}: {{{}}} ({})",
            label,
            escape(parameter.name.as_deref().unwrap_or_default()),
            escape(&parameter.type_name)
        )
    };

    if !is_blank(&parameter.default_value) {
        let default = parameter.default_value.as_deref().unwrap_or_default();
        line.push_str(&format!(" Default = &quot;{}&quot;", escape(default)));
    }
    if !is_blank(&parameter.pattern) {
        let pattern = parameter.pattern.as_deref().unwrap_or_default();
        line.push_str(&format!(" Pattern = &quot;{}&quot;", escape(pattern)));
    }

    line.push_str("<br/>");
    line
}

fn parameters_cell(record: &EndpointRecord) -> String {
    let path = record.path_parameters.iter().map(|p| parameter_line("Path", p));
    let query = record.query_parameters.iter().map(|p| parameter_line("Query", p));
    let payload = record.payload_parameters.iter().map(|p| parameter_line("Payload", p));

    path.chain(query).chain(payload).collect()
}

fn data_format_cell(record: &EndpointRecord) -> String {
    let mut content = String::new();
    if !record.consumes.is_empty() {
        content.push_str(&format!("Consumes: {}<br/>", joined(&record.consumes)));
    }
    if !record.produces.is_empty() {
        content.push_str(&format!("Produces: {}", joined(&record.produces)));
    }
    content
}

fn responses_cell(record: &EndpointRecord) -> String {
    let mut content = format!("{}<br/>", escape(&record.return_type));
    if !record.success_responses.is_empty() {
        content.push_str(&format!("Success: {}<br/>", joined(&record.success_responses)));
    }
    if !record.failure_responses.is_empty() {
        content.push_str(&format!("Failure: {}", joined(&record.failure_responses)));
    }
    content
}

fn tags_cell(record: &EndpointRecord) -> String {
    record
        .tags
        .iter()
        .filter(|tag| !tag.trim().is_empty())
        .map(|tag| format!("@{}<br/>", escape(tag)))
        .collect()
}

fn description_cell(record: &EndpointRecord) -> String {
    let mut content = escape(record.summary.as_deref().unwrap_or_default());
    if !is_blank(&record.notes) {
        content.push_str("<br/>Note:");
        content.push_str(&escape(record.notes.as_deref().unwrap_or_default()));
    }
    content
}
