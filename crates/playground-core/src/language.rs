//! File-name extension to language tag lookup.

/// Tag for files whose extension is not recognized.
pub const PLAIN_TEXT: &str = "text";

/// Language tag for a file name, by its last extension (case-insensitive).
///
/// A name without a dot is treated as if the whole name were the extension,
/// so `"js"` maps to `javascript`.
pub fn language_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "json" => "json",
        "md" => "markdown",
        "swift" => "swift",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "go" => "go",
        "rs" => "rust",
        "php" => "php",
        "rb" => "ruby",
        "sh" => "bash",
        "yml" | "yaml" => "yaml",
        "xml" => "xml",
        "sql" => "sql",
        _ => PLAIN_TEXT,
    }
}

/// Whether files of this language render in the preview rather than the
/// terminal.
pub fn is_web_language(language: &str) -> bool {
    matches!(language, "html" | "css" | "javascript")
}
