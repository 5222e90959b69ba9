//! Live preview document composition.

use crate::tree::Forest;

const PLACEHOLDER_DOCUMENT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Preview</title>
</head>
<body>
  <h1>No index.html found.</h1>
  <p>Create an 'index.html' file to see your web project preview.</p>
</body>
</html>"#;

const STYLESHEET_LINK: &str = r#"<link rel="stylesheet" href="style.css">"#;
const SCRIPT_TAG: &str = r#"<script src="script.js">"#;

/// Build the preview document from the root-level `index.html`,
/// `style.css` and `script.js`.
///
/// Without a non-empty `index.html` a placeholder page is used. Stylesheet
/// content is inlined before the first `</head>` unless the page already
/// links `style.css`; script content is inlined before the first `</body>`
/// unless the page already loads `script.js`.
pub fn compose_preview(files: &Forest) -> String {
    let root_file = |name: &str| {
        files
            .nodes()
            .iter()
            .find(|n| n.name == name && !n.is_folder())
            .and_then(|n| n.content())
            .filter(|c| !c.is_empty())
    };

    let mut html = root_file("index.html")
        .unwrap_or(PLACEHOLDER_DOCUMENT)
        .to_string();

    if let Some(css) = root_file("style.css") {
        if !html.contains(STYLESHEET_LINK) {
            html = html.replacen("</head>", &format!("<style>{css}</style>\n</head>"), 1);
        }
    }
    if let Some(js) = root_file("script.js") {
        if !html.contains(SCRIPT_TAG) {
            html = html.replacen("</body>", &format!("<script>{js}</script>\n</body>"), 1);
        }
    }

    html
}
