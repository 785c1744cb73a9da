use crate::error::ServerResult;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

/// Index page: project/version listing plus the upload form.
pub async fn get_index(State(state): State<Arc<AppState>>) -> ServerResult<Html<String>> {
    let store = state.store.clone();
    let projects = tokio::task::spawn_blocking(move || store.project_version_map()).await??;
    Ok(Html(render_index(&projects)))
}

/// Render the index page from the project -> versions mapping.
///
/// Project and version names come verbatim from user uploads and are
/// escaped before they reach the page.
fn render_index(projects: &BTreeMap<String, Vec<String>>) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         \t<title>DocBay</title>\n\
         </head>\n\
         <body>\n\
         \t<h1>Doc Bay</h1>\n\n\
         \t<h2>Projects</h2>\n\
         \t<ul>\n",
    );

    for (project, versions) in projects {
        let project = escape_html(project);
        let _ = write!(page, "\t\t<li>{project}\n\t\t\t<ul>\n");
        for version in versions {
            let version = escape_html(version);
            let _ = write!(
                page,
                "\t\t\t\t<li><a href=\"/{project}/{version}/\">{version}</a></li>\n"
            );
        }
        page.push_str("\t\t\t</ul>\n\t\t</li>\n");
    }

    page.push_str(
        "\t</ul>\n\n\
         \t<h2>Upload Docs</h2>\n\
         \t<form enctype=\"multipart/form-data\" action=\"/_/upload\" method=\"post\">\n\
         \t\t<label for=\"project\">Project</label>\n\
         \t\t<input type=\"text\" name=\"project\" id=\"project\" />\n\
         \t\t<br/>\n\
         \t\t<label for=\"version\">Version</label>\n\
         \t\t<input type=\"text\" name=\"version\" id=\"version\" />\n\
         \t\t<br/>\n\
         \t\t<label for=\"content\">Content</label>\n\
         \t\t<input type=\"file\" name=\"content\" />\n\
         \t\t<br/>\n\
         \t\t<input type=\"submit\" value=\"Upload\" />\n\
         \t</form>\n\
         </body>\n\
         </html>\n",
    );

    page
}

/// Minimal HTML entity escaping for text and attribute positions.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
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
