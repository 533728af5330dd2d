// src/utils/html_debug.rs
use crate::utils::error::AppError;
use regex::Regex;
use std::path::Path;

/// Patterns highlighted in the annotated markup, with their highlight type.
pub const DEBUG_PATTERNS: [(&str, &str); 3] = [
    (r"(?i)<h1\b[^>]*>[^<]*", "heading"),
    (r"(?i)<(?:strong|b)\b[^>]*>[^<]+</(?:strong|b)>", "label"),
    (r"(?i)<p\b[^>]*>[^<]{1,49}:\s*</p>", "paragraph-label"),
];

/// Wraps each highlight span of `html` in a styled `<span>` and returns the page.
///
/// Highlights are applied in position order; one that overlaps an earlier
/// highlight is skipped.
pub fn render_debug_html(html: &str, highlights: &[(usize, usize, &str)]) -> String {
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".highlight-heading { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-label { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-paragraph-label { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    let mut last_pos = 0;
    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos {
            continue;
        }
        debug_html.push_str(&html[last_pos..start]);

        let css_class = match highlight_type {
            "heading" => "highlight-heading",
            "label" => "highlight-label",
            "paragraph-label" => "highlight-paragraph-label",
            _ => "highlight-custom",
        };
        debug_html.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type
        ));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
    }

    debug_html.push_str(&html[last_pos..]);
    debug_html.push_str("\n</body>\n</html>");
    debug_html
}

/// Writes an annotated copy of `html` with every match of `patterns` highlighted.
pub async fn write_debug_html(html: &str, path: &Path, patterns: &[(&str, &str)]) -> Result<usize, AppError> {
    let mut highlights = Vec::new();
    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;
        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *highlight_type));
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, render_debug_html(html, &highlights)).await?;

    tracing::info!("Saved debug HTML with {} highlight(s) to {}", highlights.len(), path.display());
    Ok(highlights.len())
}
