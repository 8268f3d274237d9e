//! Index page
//!
//! Server-rendered file manager page. Flash messages arrive as `notice` /
//! `error` query parameters set by the redirecting form handlers.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use cirrus_core::models::StoredFile;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    #[serde(default)]
    notice: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn file_row(file: &StoredFile) -> String {
    let name = escape_html(&file.name);
    format!(
        concat!(
            "<tr><td>{name}</td><td>{size}</td><td>{modified}</td><td>",
            "<a href=\"/download/{name}\">Download</a> ",
            "<form class=\"inline\" method=\"post\" action=\"/delete/{name}\">",
            "<button type=\"submit\">Delete</button></form>",
            "</td></tr>"
        ),
        name = name,
        size = escape_html(&file.size_formatted),
        modified = escape_html(&file.modified),
    )
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, HttpAppError> {
    let files = state.catalog.list_all().await.map_err(HttpAppError::from)?;

    let flash = match (&query.notice, &query.error) {
        (Some(n), _) => format!("<p class=\"notice\">{}</p>", escape_html(n)),
        (_, Some(e)) => format!("<p class=\"error\">{}</p>", escape_html(e)),
        _ => String::new(),
    };

    let rows: String = files.iter().map(file_row).collect();
    let table = if files.is_empty() {
        "<p>No files uploaded yet.</p>".to_string()
    } else {
        format!(
            concat!(
                "<table><thead><tr><th>Name</th><th>Size</th><th>Modified</th>",
                "<th>Actions</th></tr></thead><tbody>{}</tbody></table>"
            ),
            rows
        )
    };

    let page = format!(
        concat!(
            "<!DOCTYPE html><html><head><title>Cirrus File Manager</title>",
            "<style>",
            "body{{font-family:sans-serif;max-width:60rem;margin:2rem auto}}",
            "table{{border-collapse:collapse;width:100%}}",
            "td,th{{border:1px solid #ccc;padding:.4rem;text-align:left}}",
            ".notice{{color:green}}.error{{color:red}}.inline{{display:inline}}",
            "</style></head><body>",
            "<h1>Cirrus File Manager</h1>{flash}",
            "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">",
            "<input type=\"file\" name=\"file\" required> ",
            "<button type=\"submit\">Upload</button></form>",
            "{table}</body></html>"
        ),
        flash = flash,
        table = table,
    );

    Ok(Html(page))
}
